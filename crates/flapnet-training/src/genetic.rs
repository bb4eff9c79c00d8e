//! Population management and the generational loop.
//!
//! An [`EvolutionEngine`] owns a fixed-size population of [`Candidate`]s and
//! the single random stream of a training run. Scoring happens outside the
//! engine: the caller plays episodes with every candidate, hands the scores back
//! through [`EvolutionEngine::set_fitness_scores`], and then calls
//! [`EvolutionEngine::evolve`].
//!
//! # Generation Cycle
//!
//! 1. **Rank** - Candidates are shuffled, then stably sorted by fitness
//!    (descending), so ties are broken at random
//! 2. **Elitism** - The top `elite_size` candidates survive unchanged
//! 3. **Tournament selection** - Parents are the elites plus tournament
//!    winners until the parent set has `population_size` members
//! 4. **Reproduction** - Each offspring blends two distinct members of the
//!    parent set (see [`operators::crossover`]) and is mutated
//!    (see [`operators::mutate`])
//! 5. **Adaptation** - If enabled, mutation rate and strength react to the
//!    generation's best fitness (see [`AdaptiveMutation`])
//!
//! The new generation starts with every fitness unset.
//!
//! # Determinism
//!
//! Every random decision of a run (initial networks, episode seeds, tie-breaks,
//! tournaments, crossover and mutation) is drawn from the engine's stream. Two
//! engines built from the same [`Seed`] and fed the same scores produce
//! identical populations.

use flapnet_engine::Seed;
use flapnet_policy::PolicyNetwork;
use flapnet_stats::descriptive::DescriptiveStats;
use rand::{
    Rng,
    seq::{IndexedRandom as _, SliceRandom as _},
};
use rand_pcg::Pcg32;

use crate::{
    adaptive::AdaptiveMutation,
    config::{ConfigError, EvolutionConfig},
    operators,
};

/// Error raised when the engine is driven out of order or with bad scores.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum UsageError {
    #[display("candidate #{index} has no fitness score")]
    FitnessNotSet { index: usize },
    #[display("expected {expected} fitness scores, got {actual}")]
    ScoreCountMismatch { expected: usize, actual: usize },
    #[display("fitness score of candidate #{index} is not finite: {value}")]
    NonFiniteScore { index: usize, value: f32 },
}

/// A policy network and its fitness in the current generation.
#[derive(Debug, Clone)]
pub struct Candidate {
    network: PolicyNetwork,
    fitness: Option<f32>,
}

impl Candidate {
    #[must_use]
    pub fn new(network: PolicyNetwork) -> Self {
        Self {
            network,
            fitness: None,
        }
    }

    #[must_use]
    pub fn network(&self) -> &PolicyNetwork {
        &self.network
    }

    /// Fitness score, or `None` if this generation has not been scored yet.
    #[must_use]
    pub fn fitness(&self) -> Option<f32> {
        self.fitness
    }

    fn fitness_or_min(&self) -> f32 {
        self.fitness.unwrap_or(f32::MIN)
    }
}

/// Fitness statistics of one scored generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub generation: usize,
    pub best: f32,
    pub mean: f32,
    pub min: f32,
    pub median: f32,
    pub mutation_rate: f32,
    pub mutation_strength: f32,
}

/// Runs the genetic algorithm over a population of policy networks.
///
/// # Example
///
/// ```
/// use flapnet_engine::Seed;
/// use flapnet_training::{config::EvolutionConfig, genetic::EvolutionEngine};
///
/// let config = EvolutionConfig {
///     population_size: 6,
///     elite_size: 2,
///     tournament_size: 3,
///     ..EvolutionConfig::default()
/// };
/// let mut engine = EvolutionEngine::new(config, Seed::from_u64(1))?;
///
/// // evolving before scoring is an error
/// assert!(engine.evolve().is_err());
///
/// engine.set_fitness_scores(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0])?;
/// assert_eq!(engine.best_candidate().fitness(), Some(9.0));
/// engine.evolve()?;
///
/// assert_eq!(engine.generation(), 1);
/// assert_eq!(engine.current_population().len(), 6);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct EvolutionEngine {
    config: EvolutionConfig,
    candidates: Vec<Candidate>,
    generation: usize,
    mutation: AdaptiveMutation,
    rng: Pcg32,
}

impl EvolutionEngine {
    /// Validates `config` and creates a population of randomly initialized
    /// networks, drawn from a stream seeded by `seed`.
    pub fn new(config: EvolutionConfig, seed: Seed) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = seed.rng();
        let candidates = (0..config.population_size)
            .map(|_| Candidate::new(PolicyNetwork::random(&mut rng)))
            .collect();
        Ok(Self {
            config,
            candidates,
            generation: 0,
            mutation: AdaptiveMutation::new(config.mutation_rate, config.mutation_strength),
            rng,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Number of completed [`Self::evolve`] calls.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn current_population(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Networks of the current population, in population order.
    pub fn networks(&self) -> impl ExactSizeIterator<Item = &PolicyNetwork> {
        self.candidates.iter().map(Candidate::network)
    }

    #[must_use]
    pub fn mutation(&self) -> &AdaptiveMutation {
        &self.mutation
    }

    #[must_use]
    pub fn mutation_rate(&self) -> f32 {
        self.mutation.rate()
    }

    #[must_use]
    pub fn mutation_strength(&self) -> f32 {
        self.mutation.strength()
    }

    /// Draws one episode seed per candidate from the run's stream.
    ///
    /// Evaluating candidate `i` on seed `i` keeps a run reproducible even when
    /// the episodes are played concurrently.
    pub fn draw_episode_seeds(&mut self) -> Vec<Seed> {
        let rng = &mut self.rng;
        self.candidates.iter().map(|_| rng.random()).collect()
    }

    /// Assigns fitness scores in population order.
    ///
    /// On error no score is assigned.
    pub fn set_fitness_scores(&mut self, scores: &[f32]) -> Result<(), UsageError> {
        if scores.len() != self.candidates.len() {
            return Err(UsageError::ScoreCountMismatch {
                expected: self.candidates.len(),
                actual: scores.len(),
            });
        }
        if let Some((index, &value)) = scores.iter().enumerate().find(|(_, s)| !s.is_finite()) {
            return Err(UsageError::NonFiniteScore { index, value });
        }
        for (candidate, score) in self.candidates.iter_mut().zip(scores) {
            candidate.fitness = Some(*score);
        }
        Ok(())
    }

    /// Returns the candidate with the highest fitness (the earliest one on
    /// ties), or the first candidate if no fitness has been set.
    #[must_use]
    pub fn best_candidate(&self) -> &Candidate {
        self.candidates
            .iter()
            .filter(|c| c.fitness.is_some())
            .reduce(|best, c| if c.fitness > best.fitness { c } else { best })
            .unwrap_or(&self.candidates[0])
    }

    /// Fitness statistics of the current generation, or `None` if it has not
    /// been fully scored.
    #[must_use]
    pub fn summary(&self) -> Option<GenerationSummary> {
        let scores = self
            .candidates
            .iter()
            .map(Candidate::fitness)
            .collect::<Option<Vec<_>>>()?;
        let stats = DescriptiveStats::new(scores)?;
        Some(GenerationSummary {
            generation: self.generation,
            best: stats.max,
            mean: stats.mean,
            min: stats.min,
            median: stats.median,
            mutation_rate: self.mutation.rate(),
            mutation_strength: self.mutation.strength(),
        })
    }

    /// Replaces the scored population with the next generation.
    ///
    /// Fails without touching the population if any candidate is unscored.
    pub fn evolve(&mut self) -> Result<(), UsageError> {
        if let Some(index) = self.candidates.iter().position(|c| c.fitness.is_none()) {
            return Err(UsageError::FitnessNotSet { index });
        }
        if let Some(summary) = self.summary() {
            tracing::debug!(
                generation = summary.generation,
                best = summary.best,
                mean = summary.mean,
                median = summary.median,
                min = summary.min,
                "scored generation"
            );
        }

        let EvolutionConfig {
            population_size,
            elite_size,
            tournament_size,
            adaptive_mutation,
            ..
        } = self.config;

        let ranked = rank(&self.candidates, &mut self.rng);
        let best = ranked[0].fitness_or_min();

        let mut parents: Vec<&Candidate> = Vec::with_capacity(population_size);
        parents.extend(&ranked[..elite_size]);
        while parents.len() < population_size {
            parents.push(tournament_select(
                &self.candidates,
                tournament_size,
                &mut self.rng,
            ));
        }

        let mut next: Vec<Candidate> = parents[..elite_size]
            .iter()
            .map(|elite| Candidate::new(elite.network.clone()))
            .collect();
        while next.len() < population_size {
            let Some([p1, p2]) = parents.choose_multiple_array(&mut self.rng) else {
                unreachable!("parent set holds at least two candidates");
            };
            let mut child = operators::crossover(&p1.network, &p2.network, &mut self.rng);
            operators::mutate(
                &mut child,
                self.mutation.rate(),
                self.mutation.strength(),
                &mut self.rng,
            );
            next.push(Candidate::new(child));
        }

        if adaptive_mutation {
            self.mutation.adapt(best);
        }

        self.candidates = next;
        self.generation += 1;
        Ok(())
    }
}

/// Candidates sorted by fitness, best first, with ties in random order.
fn rank<'a, R>(candidates: &'a [Candidate], rng: &mut R) -> Vec<&'a Candidate>
where
    R: Rng + ?Sized,
{
    let mut ranked: Vec<&Candidate> = candidates.iter().collect();
    ranked.shuffle(rng);
    ranked.sort_by(|a, b| b.fitness_or_min().total_cmp(&a.fitness_or_min()));
    ranked
}

/// Samples `tournament_size` distinct candidates and returns the fittest.
///
/// # Panics
///
/// Panics if `tournament_size` is zero or `candidates` is empty.
fn tournament_select<'a, R>(
    candidates: &'a [Candidate],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Candidate
where
    R: Rng + ?Sized,
{
    assert!(tournament_size > 0);
    candidates
        .choose_multiple(rng, tournament_size)
        .max_by(|a, b| a.fitness_or_min().total_cmp(&b.fitness_or_min()))
        .expect("tournament is non-empty")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> EvolutionConfig {
        EvolutionConfig {
            population_size: 6,
            elite_size: 2,
            tournament_size: 3,
            ..EvolutionConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EvolutionConfig {
            population_size: 4,
            elite_size: 4,
            ..EvolutionConfig::default()
        };
        assert!(matches!(
            EvolutionEngine::new(config, Seed::from_u64(0)),
            Err(ConfigError::EliteTooLarge { .. })
        ));
    }

    #[test]
    fn test_new_population_is_unscored() {
        let engine = EvolutionEngine::new(EvolutionConfig::default(), Seed::from_u64(1)).unwrap();
        assert_eq!(engine.current_population().len(), 20);
        assert_eq!(engine.generation(), 0);
        assert!(engine.current_population().iter().all(|c| c.fitness().is_none()));
        assert!(engine.summary().is_none());
    }

    #[test]
    fn test_elites_survive_in_rank_order() {
        let mut engine = EvolutionEngine::new(small_config(), Seed::from_u64(2)).unwrap();
        let old: Vec<_> = engine.networks().cloned().collect();
        engine
            .set_fitness_scores(&[10.0, 50.0, 5.0, 30.0, 1.0, 20.0])
            .unwrap();
        engine.evolve().unwrap();

        let next = engine.current_population();
        assert_eq!(next[0].network(), &old[1]);
        assert_eq!(next[1].network(), &old[3]);
    }

    #[test]
    fn test_population_size_is_preserved() {
        let mut engine = EvolutionEngine::new(small_config(), Seed::from_u64(3)).unwrap();
        for generation in 0..5_u8 {
            let scores: Vec<f32> = (0..6_u8).map(|i| f32::from(i * generation)).collect();
            engine.set_fitness_scores(&scores).unwrap();
            engine.evolve().unwrap();
            assert_eq!(engine.current_population().len(), 6);
            assert!(engine.current_population().iter().all(|c| c.fitness().is_none()));
        }
        assert_eq!(engine.generation(), 5);
    }

    #[test]
    fn test_evolve_before_scoring_fails_without_changes() {
        let mut engine = EvolutionEngine::new(small_config(), Seed::from_u64(4)).unwrap();
        let before: Vec<_> = engine.networks().cloned().collect();
        assert_eq!(engine.evolve(), Err(UsageError::FitnessNotSet { index: 0 }));
        let after: Vec<_> = engine.networks().cloned().collect();
        assert_eq!(before, after);
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn test_rejected_scores_are_not_applied() {
        let mut engine = EvolutionEngine::new(small_config(), Seed::from_u64(5)).unwrap();
        assert_eq!(
            engine.set_fitness_scores(&[1.0, 2.0]),
            Err(UsageError::ScoreCountMismatch {
                expected: 6,
                actual: 2
            })
        );
        assert!(matches!(
            engine.set_fitness_scores(&[1.0, 2.0, f32::NAN, 4.0, 5.0, 6.0]),
            Err(UsageError::NonFiniteScore { index: 2, .. })
        ));
        assert!(engine.current_population().iter().all(|c| c.fitness().is_none()));
    }

    #[test]
    fn test_same_seed_same_run() {
        let scores = [4.0, 8.0, 15.0, 16.0, 23.0, 42.0];
        let run = || {
            let mut engine = EvolutionEngine::new(small_config(), Seed::from_u64(6)).unwrap();
            let mut seeds = vec![];
            for _ in 0..3 {
                seeds.push(engine.draw_episode_seeds());
                engine.set_fitness_scores(&scores).unwrap();
                engine.evolve().unwrap();
            }
            (engine.networks().cloned().collect::<Vec<_>>(), seeds)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = EvolutionEngine::new(small_config(), Seed::from_u64(7)).unwrap();
        let b = EvolutionEngine::new(small_config(), Seed::from_u64(8)).unwrap();
        assert_ne!(a.current_population()[0].network(), b.current_population()[0].network());
    }

    #[test]
    fn test_episode_seeds_one_per_candidate() {
        let mut engine = EvolutionEngine::new(small_config(), Seed::from_u64(9)).unwrap();
        let first = engine.draw_episode_seeds();
        let second = engine.draw_episode_seeds();
        assert_eq!(first.len(), 6);
        assert_ne!(first, second);
    }

    #[test]
    fn test_stagnation_escalates_mutation() {
        let mut engine = EvolutionEngine::new(small_config(), Seed::from_u64(10)).unwrap();
        let scores = [3.0; 6];

        // the first scored generation sets the baseline
        engine.set_fitness_scores(&scores).unwrap();
        engine.evolve().unwrap();

        for _ in 0..5 {
            let before = engine.mutation_rate();
            engine.set_fitness_scores(&scores).unwrap();
            engine.evolve().unwrap();
            assert_eq!(engine.mutation_rate(), before);
        }

        let before = engine.mutation_rate();
        engine.set_fitness_scores(&scores).unwrap();
        engine.evolve().unwrap();
        assert!(engine.mutation_rate() > before);
        assert_eq!(engine.mutation().stagnation_counter(), 6);
    }

    #[test]
    fn test_disabled_adaptation_keeps_mutation_fixed() {
        let config = EvolutionConfig {
            adaptive_mutation: false,
            ..small_config()
        };
        let mut engine = EvolutionEngine::new(config, Seed::from_u64(11)).unwrap();
        for _ in 0..10 {
            engine.set_fitness_scores(&[1.0; 6]).unwrap();
            engine.evolve().unwrap();
        }
        assert_eq!(engine.mutation_rate(), config.mutation_rate);
        assert_eq!(engine.mutation_strength(), config.mutation_strength);
    }

    #[test]
    fn test_best_candidate() {
        let mut engine = EvolutionEngine::new(small_config(), Seed::from_u64(12)).unwrap();
        let first = engine.current_population()[0].network().clone();
        assert_eq!(engine.best_candidate().network(), &first);

        engine
            .set_fitness_scores(&[1.0, 7.0, 3.0, 7.0, 0.0, 2.0])
            .unwrap();
        let best = engine.best_candidate();
        assert_eq!(best.fitness(), Some(7.0));
        assert_eq!(best.network(), engine.current_population()[1].network());
    }

    #[test]
    fn test_summary() {
        let mut engine = EvolutionEngine::new(small_config(), Seed::from_u64(13)).unwrap();
        engine
            .set_fitness_scores(&[1.0, 2.0, 3.0, 4.0, 5.0, 9.0])
            .unwrap();
        let summary = engine.summary().unwrap();
        assert_eq!(summary.generation, 0);
        assert_eq!(summary.best, 9.0);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.mean, 4.0);
        assert_eq!(summary.median, 3.5);
        assert_eq!(summary.mutation_rate, 0.2);
    }
}
