//! Fitness evaluation: playing episodes with a policy and turning them into scores.
//!
//! - [`fitness_evaluator`] - The [`FitnessEvaluator`] trait, the step-capped
//!   [`EpisodeFitnessEvaluator`], and [`evaluate_population`] for scoring a whole
//!   generation on scoped threads
//!
//! # Architecture
//!
//! ```text
//! PolicyNetwork (flapnet-policy)
//!     ↓ decides flap / no flap
//! Episode (flapnet-engine)
//!     ↓ played to termination or step limit
//! FitnessEvaluator
//!     ↓ produces
//! Fitness Score (episode score)
//!     ↓ consumed by
//! EvolutionEngine (flapnet-training)
//! ```
//!
//! The evaluator never touches the evolution engine, and the evolution engine
//! never plays episodes: the driver hands the score vector from one to the other.
//!
//! # Randomness
//!
//! Every episode is seeded explicitly. Drawing one [`Seed`](flapnet_engine::Seed) per
//! candidate from the run's generator, in population order, keeps results
//! reproducible even though episodes run concurrently.

pub use self::fitness_evaluator::*;

pub mod fitness_evaluator;
