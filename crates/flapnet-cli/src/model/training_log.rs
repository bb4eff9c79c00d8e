use std::path::Path;

use chrono::{DateTime, Utc};
use flapnet_engine::Seed;
use flapnet_training::{config::EvolutionConfig, genetic::GenerationSummary};
use serde::{Deserialize, Serialize};

use crate::util;

/// Settings a training run was started with.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingParameters {
    #[serde(flatten)]
    pub evolution: EvolutionConfig,
    pub generations: usize,
    pub target_score: Option<f32>,
    pub step_limit: Option<usize>,
    pub seed: Seed,
}

/// Scores of one generation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationRecord {
    pub generation: usize,
    pub best_score: f32,
    pub average_score: f32,
    pub mutation_rate: f32,
    pub mutation_strength: f32,
    pub scores: Vec<f32>,
    pub seconds: f64,
}

impl GenerationRecord {
    pub fn new(summary: &GenerationSummary, scores: Vec<f32>, seconds: f64) -> Self {
        Self {
            generation: summary.generation,
            best_score: summary.best,
            average_score: summary.mean,
            mutation_rate: summary.mutation_rate,
            mutation_strength: summary.mutation_strength,
            scores,
            seconds,
        }
    }
}

/// Progress of a training run, rewritten periodically while it runs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingLog {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub parameters: TrainingParameters,
    pub generations: Vec<GenerationRecord>,
    pub best_score: Option<f32>,
}

impl TrainingLog {
    pub fn new(parameters: TrainingParameters) -> Self {
        Self {
            start_time: Utc::now(),
            end_time: None,
            parameters,
            generations: vec![],
            best_score: None,
        }
    }

    /// Appends a generation and returns `true` if it set a new best score.
    pub fn record(&mut self, record: GenerationRecord) -> bool {
        let improved = self.best_score.is_none_or(|best| record.best_score > best);
        if improved {
            self.best_score = Some(record.best_score);
        }
        self.generations.push(record);
        improved
    }

    pub fn finish(&mut self) {
        self.end_time = Some(Utc::now());
    }

    pub fn save<P>(&self, path: P) -> anyhow::Result<()>
    where
        P: AsRef<Path>,
    {
        util::save_json_file("training log", path, self)
    }
}
