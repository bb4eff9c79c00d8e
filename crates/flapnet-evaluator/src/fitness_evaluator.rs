use std::{fmt, thread};

use flapnet_engine::{Episode, Renderer, Seed, Termination};
use flapnet_policy::PolicyNetwork;

/// Result of playing one episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeOutcome {
    /// Obstacles passed.
    pub score: usize,
    /// Steps simulated.
    pub steps: usize,
    /// How the episode ended, or `None` if it was cut off by the step limit.
    pub termination: Option<Termination>,
}

impl EpisodeOutcome {
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.termination.is_none()
    }

    /// The score as a fitness value.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.score as f32
    }
}

/// Scores policies by playing episodes with them.
///
/// Implementations must be shareable across threads so that a population can
/// be evaluated concurrently.
pub trait FitnessEvaluator: fmt::Debug + Send + Sync {
    /// Resets `episode` and plays it with `policy` until it terminates,
    /// passing every intermediate state to `renderer` if one is given.
    fn run(
        &self,
        policy: &PolicyNetwork,
        episode: &mut Episode,
        renderer: Option<&mut dyn Renderer>,
    ) -> EpisodeOutcome;

    /// Plays a fresh episode drawn from `seed`.
    fn play_episode(
        &self,
        policy: &PolicyNetwork,
        seed: Seed,
        renderer: Option<&mut dyn Renderer>,
    ) -> EpisodeOutcome {
        let mut episode = Episode::with_seed(seed);
        self.run(policy, &mut episode, renderer)
    }

    /// Returns the fitness of `policy` on the episode drawn from `seed`.
    fn evaluate(&self, policy: &PolicyNetwork, seed: Seed) -> f32 {
        self.play_episode(policy, seed, None).fitness()
    }
}

/// Plays episodes until they terminate or reach an optional step limit.
///
/// Without a limit, a policy that never dies would play forever; with one, such
/// an episode ends as truncated and keeps the score it reached.
///
/// # Example
///
/// ```
/// use flapnet_engine::Seed;
/// use flapnet_evaluator::{EpisodeFitnessEvaluator, FitnessEvaluator};
/// use flapnet_policy::PolicyNetwork;
///
/// let evaluator = EpisodeFitnessEvaluator::new(Some(5_000));
/// let policy = PolicyNetwork::random(&mut rand::rng());
/// let outcome = evaluator.play_episode(&policy, Seed::from_u64(1), None);
/// assert!(outcome.steps <= 5_000);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EpisodeFitnessEvaluator {
    step_limit: Option<usize>,
}

impl EpisodeFitnessEvaluator {
    #[must_use]
    pub const fn new(step_limit: Option<usize>) -> Self {
        Self { step_limit }
    }

    #[must_use]
    pub const fn step_limit(&self) -> Option<usize> {
        self.step_limit
    }
}

impl FitnessEvaluator for EpisodeFitnessEvaluator {
    fn run(
        &self,
        policy: &PolicyNetwork,
        episode: &mut Episode,
        mut renderer: Option<&mut dyn Renderer>,
    ) -> EpisodeOutcome {
        let mut observation = episode.reset();
        if let Some(renderer) = renderer.as_deref_mut() {
            renderer.render(&episode.snapshot());
        }

        loop {
            if self.step_limit.is_some_and(|limit| episode.steps() >= limit) {
                tracing::debug!(
                    steps = episode.steps(),
                    score = episode.score(),
                    "episode reached step limit"
                );
                break;
            }
            let flap = policy.decide(observation.as_array());
            let (next, terminated) = episode.step(flap);
            observation = next;
            if let Some(renderer) = renderer.as_deref_mut() {
                renderer.render(&episode.snapshot());
            }
            if terminated {
                break;
            }
        }

        EpisodeOutcome {
            score: episode.score(),
            steps: episode.steps(),
            termination: episode.termination(),
        }
    }
}

/// Evaluates every policy on its own seed, one scoped thread per policy.
///
/// The returned scores are in the same order as `policies`.
///
/// # Panics
///
/// Panics if `policies` and `seeds` differ in length.
pub fn evaluate_population<E>(
    evaluator: &E,
    policies: &[&PolicyNetwork],
    seeds: &[Seed],
) -> Vec<f32>
where
    E: FitnessEvaluator + ?Sized,
{
    assert_eq!(policies.len(), seeds.len(), "one seed is required per policy");
    let mut scores = vec![0.0; policies.len()];
    thread::scope(|s| {
        for ((score, policy), seed) in scores.iter_mut().zip(policies).zip(seeds) {
            s.spawn(move || {
                *score = evaluator.evaluate(policy, *seed);
            });
        }
    });
    scores
}

#[cfg(test)]
mod tests {
    use flapnet_policy::{Parameters, Tensor};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn constant_policy(value: f32) -> PolicyNetwork {
        let tensors = PolicyNetwork::layout()
            .into_iter()
            .map(|(name, shape)| Tensor::filled(name, shape, value))
            .collect();
        PolicyNetwork::from_parameters(Parameters::new(tensors)).unwrap()
    }

    #[derive(Default)]
    struct CountingRenderer {
        frames: usize,
        last_steps: usize,
    }

    impl Renderer for CountingRenderer {
        fn render(&mut self, snapshot: &flapnet_engine::EpisodeSnapshot<'_>) {
            self.frames += 1;
            self.last_steps = snapshot.steps;
        }
    }

    #[test]
    fn test_idle_policy_falls_to_floor() {
        // a zero network outputs exactly 0.5, which is not above the threshold
        let evaluator = EpisodeFitnessEvaluator::new(None);
        let outcome = evaluator.play_episode(&constant_policy(0.0), Seed::from_u64(1), None);
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.steps, 46);
        assert_eq!(outcome.termination, Some(Termination::Floor));
        assert!(!outcome.is_truncated());
    }

    #[test]
    fn test_always_flapping_policy_hits_an_obstacle() {
        let evaluator = EpisodeFitnessEvaluator::new(None);
        let outcome = evaluator.play_episode(&constant_policy(1.0), Seed::from_u64(2), None);
        assert_eq!(outcome.termination, Some(Termination::Collision));
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn test_step_limit_truncates() {
        let evaluator = EpisodeFitnessEvaluator::new(Some(10));
        let outcome = evaluator.play_episode(&constant_policy(0.0), Seed::from_u64(3), None);
        assert_eq!(outcome.steps, 10);
        assert!(outcome.is_truncated());
    }

    #[test]
    fn test_renderer_sees_every_state() {
        let evaluator = EpisodeFitnessEvaluator::new(None);
        let mut renderer = CountingRenderer::default();
        let outcome =
            evaluator.play_episode(&constant_policy(0.0), Seed::from_u64(4), Some(&mut renderer));
        assert_eq!(renderer.frames, outcome.steps + 1);
        assert_eq!(renderer.last_steps, outcome.steps);
    }

    #[test]
    fn test_run_resets_a_used_episode() {
        let evaluator = EpisodeFitnessEvaluator::new(None);
        let policy = constant_policy(0.0);
        let mut episode = Episode::with_seed(Seed::from_u64(5));
        let first = evaluator.run(&policy, &mut episode, None);
        let second = evaluator.run(&policy, &mut episode, None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_seed_same_fitness() {
        let mut rng = Pcg32::seed_from_u64(6);
        let policy = PolicyNetwork::random(&mut rng);
        let evaluator = EpisodeFitnessEvaluator::new(Some(2_000));
        let a = evaluator.play_episode(&policy, Seed::from_u64(7), None);
        let b = evaluator.play_episode(&policy, Seed::from_u64(7), None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_population_scores_keep_order() {
        let mut rng = Pcg32::seed_from_u64(8);
        let networks: Vec<_> = (0..6).map(|_| PolicyNetwork::random(&mut rng)).collect();
        let policies: Vec<_> = networks.iter().collect();
        let seeds: Vec<_> = (0..6).map(Seed::from_u64).collect();
        let evaluator = EpisodeFitnessEvaluator::new(Some(2_000));

        let scores = evaluate_population(&evaluator, &policies, &seeds);
        let expected: Vec<_> = policies
            .iter()
            .zip(&seeds)
            .map(|(policy, seed)| evaluator.evaluate(policy, *seed))
            .collect();
        assert_eq!(scores, expected);
    }
}
