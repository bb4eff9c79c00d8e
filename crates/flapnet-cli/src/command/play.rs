use std::{path::PathBuf, time::Duration};

use flapnet_engine::{Renderer, Seed};
use flapnet_evaluator::{EpisodeFitnessEvaluator, FitnessEvaluator as _};
use flapnet_stats::descriptive::DescriptiveStats;
use rand::Rng as _;

use crate::{model::policy_model::PolicyModel, render::TextRenderer};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Path to the model file (JSON format)
    #[arg(long)]
    model: PathBuf,
    /// Number of episodes to play
    #[arg(long, default_value_t = 1)]
    episodes: usize,
    /// Maximum steps per episode (0 for no limit)
    #[arg(long, default_value_t = 10_000)]
    step_limit: usize,
    /// Draw every step to stderr
    #[arg(long)]
    render: bool,
    /// Delay between rendered frames in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_delay: u64,
    /// Seed for the episodes (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        model,
        episodes,
        step_limit,
        render,
        frame_delay,
        seed,
    } = arg;

    let model = PolicyModel::open(model)?;
    let network = model.to_network()?;
    tracing::info!(
        name = %model.name,
        generation = model.generation,
        score = model.score,
        trained_at = %model.trained_at,
        "loaded model"
    );

    let evaluator = EpisodeFitnessEvaluator::new((*step_limit > 0).then_some(*step_limit));
    let mut renderer = render.then(|| TextRenderer::stderr(Duration::from_millis(*frame_delay)));
    let mut rng = seed
        .map_or_else(|| rand::rng().random(), Seed::from_u64)
        .rng();

    let mut scores = Vec::with_capacity(*episodes);
    for episode in 0..*episodes {
        let seed: Seed = rng.random();
        let outcome = evaluator.play_episode(
            &network,
            seed,
            renderer.as_mut().map(|r| r as &mut dyn Renderer),
        );
        match outcome.termination {
            Some(termination) => tracing::info!(
                episode,
                score = outcome.score,
                steps = outcome.steps,
                %termination,
                "episode finished"
            ),
            None => tracing::info!(
                episode,
                score = outcome.score,
                steps = outcome.steps,
                "episode reached the step limit"
            ),
        }
        scores.push(outcome.fitness());
    }

    if let Some(stats) = DescriptiveStats::new(scores) {
        tracing::info!(
            episodes = stats.count,
            best = stats.max,
            mean = stats.mean,
            median = stats.median,
            worst = stats.min,
            "play completed"
        );
    }

    Ok(())
}
