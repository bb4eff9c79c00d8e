use std::{fs, path::PathBuf, time::Instant};

use anyhow::Context;
use flapnet_engine::Seed;
use flapnet_evaluator::{EpisodeFitnessEvaluator, evaluate_population};
use flapnet_training::{config::EvolutionConfig, genetic::EvolutionEngine};
use rand::Rng as _;

use crate::model::{
    policy_model::PolicyModel,
    training_log::{GenerationRecord, TrainingLog, TrainingParameters},
};

const FINAL_MODEL_FILE: &str = "final_best_model.json";
const TRAINING_LOG_FILE: &str = "training_log.json";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Maximum number of generations to run
    #[arg(long, default_value_t = 100)]
    generations: usize,
    /// Stop once a candidate reaches this score
    #[arg(long)]
    target_score: Option<f32>,
    /// Number of candidates per generation
    #[arg(long, default_value_t = 20)]
    population_size: usize,
    /// Probability of mutating each parameter value of an offspring
    #[arg(long, default_value_t = 0.2)]
    mutation_rate: f32,
    /// Scale of the Gaussian mutation noise
    #[arg(long, default_value_t = 0.3)]
    mutation_strength: f32,
    /// Number of top candidates kept unchanged
    #[arg(long, default_value_t = 4)]
    elite_size: usize,
    /// Number of candidates competing in each tournament
    #[arg(long, default_value_t = 5)]
    tournament_size: usize,
    /// Keep mutation rate and strength fixed
    #[arg(long)]
    no_adaptive_mutation: bool,
    /// Maximum steps per episode (0 for no limit)
    #[arg(long, default_value_t = 10_000)]
    step_limit: usize,
    /// Write the training log every this many generations
    #[arg(long, default_value_t = 10)]
    save_frequency: usize,
    /// Seed for the whole run (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Directory to save models to
    #[arg(long, default_value = "./models/")]
    models_dir: PathBuf,
    /// Training log path (defaults to `training_log.json` in the models directory)
    #[arg(long)]
    log: Option<PathBuf>,
}

impl TrainArg {
    fn evolution_config(&self) -> EvolutionConfig {
        EvolutionConfig {
            population_size: self.population_size,
            mutation_rate: self.mutation_rate,
            mutation_strength: self.mutation_strength,
            elite_size: self.elite_size,
            tournament_size: self.tournament_size,
            adaptive_mutation: !self.no_adaptive_mutation,
        }
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        generations,
        target_score,
        step_limit,
        save_frequency,
        seed,
        models_dir,
        log,
        ..
    } = arg;

    let config = arg.evolution_config();
    let seed = seed.map_or_else(|| rand::rng().random(), Seed::from_u64);
    let step_limit = (*step_limit > 0).then_some(*step_limit);
    let log_path = log
        .clone()
        .unwrap_or_else(|| models_dir.join(TRAINING_LOG_FILE));

    let mut engine = EvolutionEngine::new(config, seed).context("Invalid evolution settings")?;
    let evaluator = EpisodeFitnessEvaluator::new(step_limit);
    fs::create_dir_all(models_dir).with_context(|| {
        format!("Failed to create models directory: {}", models_dir.display())
    })?;

    let mut training_log = TrainingLog::new(TrainingParameters {
        evolution: config,
        generations: *generations,
        target_score: *target_score,
        step_limit,
        seed,
    });
    let mut best_model: Option<PolicyModel> = None;

    tracing::info!(
        %seed,
        population_size = config.population_size,
        generations,
        "starting training"
    );

    for _ in 0..*generations {
        let started = Instant::now();
        let generation = engine.generation();

        let seeds = engine.draw_episode_seeds();
        let policies: Vec<_> = engine.networks().collect();
        let scores = evaluate_population(&evaluator, &policies, &seeds);
        engine.set_fitness_scores(&scores)?;
        let summary = engine
            .summary()
            .context("Generation was not fully scored")?;

        let seconds = started.elapsed().as_secs_f64();
        tracing::info!(
            generation,
            best = summary.best,
            mean = summary.mean,
            rate = summary.mutation_rate,
            strength = summary.mutation_strength,
            seconds,
            "generation scored"
        );

        if training_log.record(GenerationRecord::new(&summary, scores, seconds)) {
            let model = PolicyModel::new(
                format!("generation {generation}"),
                engine.best_candidate().network(),
                generation,
                summary.best,
            );
            let path = models_dir.join(format!(
                "best_model_gen_{generation}_score_{:.0}.json",
                summary.best
            ));
            model.save(&path)?;
            tracing::info!(score = summary.best, path = %path.display(), "new best model");
            best_model = Some(model);
        }

        if (generation + 1).is_multiple_of(*save_frequency) {
            training_log.save(&log_path)?;
        }

        if target_score.is_some_and(|target| summary.best >= target) {
            tracing::info!(generation, score = summary.best, "target score reached");
            break;
        }

        engine.evolve()?;
    }

    let final_model = match best_model {
        Some(model) => PolicyModel {
            name: "final best".to_owned(),
            ..model
        },
        None => PolicyModel::new(
            "final best",
            engine.best_candidate().network(),
            engine.generation(),
            0.0,
        ),
    };
    let final_path = models_dir.join(FINAL_MODEL_FILE);
    final_model.save(&final_path)?;

    training_log.finish();
    training_log.save(&log_path)?;

    tracing::info!(
        generations = training_log.generations.len(),
        best_score = final_model.score,
        model = %final_path.display(),
        log = %log_path.display(),
        "training completed"
    );

    Ok(())
}
