//! Deterministic side-scrolling simulation used to score flapping controllers.
//!
//! The crate has two layers:
//!
//! - [`core`] - Plain data: the playfield geometry, the [`Actor`], [`Obstacle`]s and
//!   the 128-bit [`Seed`] used to drive every random stream
//! - [`engine`] - The [`Episode`] state machine that advances one playthrough step by
//!   step, plus the read-only [`EpisodeSnapshot`] handed to [`Renderer`]s
//!
//! # Example
//!
//! ```
//! use flapnet_engine::{Episode, Seed};
//!
//! let mut episode = Episode::with_seed(Seed::from_u64(7));
//! let mut steps = 0;
//! loop {
//!     let (_observation, terminated) = episode.step(false);
//!     steps += 1;
//!     if terminated {
//!         break;
//!     }
//! }
//!
//! // Without flapping the actor falls to the floor.
//! assert!(!episode.actor().is_alive());
//! assert_eq!(episode.score(), 0);
//! assert_eq!(steps, 46);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
