//! Training system that evolves policy networks with a genetic algorithm.
//!
//! # How Training Works
//!
//! 1. **Population** - Create a population of randomly initialized networks
//! 2. **Evaluation** - The driver plays one episode per candidate and reports
//!    the scores back
//! 3. **Selection** - Elites survive, tournaments pick the remaining parents
//! 4. **Reproduction** - Offspring are blended from two parents and mutated
//! 5. **Adaptation** - Mutation rate and strength follow the progress of the
//!    best score
//! 6. **Repeat** - Until the generation budget or a target score is reached
//!
//! # Modules
//!
//! - [`config`] - [`EvolutionConfig`](config::EvolutionConfig) and its validation
//! - [`genetic`] - [`EvolutionEngine`](genetic::EvolutionEngine), the owner of the
//!   population and of the run's random stream
//! - [`operators`] - Per-tensor blend crossover and Gaussian mutation
//! - [`adaptive`] - Stagnation-driven control of the mutation parameters
//!
//! # Example
//!
//! ```
//! use flapnet_engine::Seed;
//! use flapnet_evaluator::{EpisodeFitnessEvaluator, evaluate_population};
//! use flapnet_training::{config::EvolutionConfig, genetic::EvolutionEngine};
//!
//! let config = EvolutionConfig {
//!     population_size: 6,
//!     elite_size: 2,
//!     tournament_size: 3,
//!     ..EvolutionConfig::default()
//! };
//! let mut engine = EvolutionEngine::new(config, Seed::from_u64(7))?;
//! let evaluator = EpisodeFitnessEvaluator::new(Some(1_000));
//!
//! for _ in 0..3 {
//!     let seeds = engine.draw_episode_seeds();
//!     let policies: Vec<_> = engine.networks().collect();
//!     let scores = evaluate_population(&evaluator, &policies, &seeds);
//!     engine.set_fitness_scores(&scores)?;
//!     engine.evolve()?;
//! }
//! assert_eq!(engine.generation(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod adaptive;
pub mod config;
pub mod genetic;
pub mod operators;
