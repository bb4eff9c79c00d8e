//! Episode state machine and the read-only views it exposes.
//!
//! - [`Episode`] - One playthrough: actor, obstacles, score and step counter
//! - [`Observation`] - The normalized four-value state summary fed to policies
//! - [`EpisodeSnapshot`] / [`Renderer`] - Read-only access for drawing
//!
//! # Step Order
//!
//! Every call to [`Episode::step`] performs, in order:
//!
//! 1. Optional flap (velocity set to the flap impulse)
//! 2. Gravity and position integration; ceiling clamps, floor kills
//! 3. Obstacle scrolling and removal of obstacles that left the playfield
//! 4. Obstacle spawning on a fixed cadence
//! 5. Collision check against every obstacle column
//! 6. Scoring of obstacles whose trailing edge moved behind the actor
//! 7. Observation of the next obstacle ahead
//!
//! A floor hit ends the step right after integration, so obstacles do not move
//! on the final step of such an episode.

pub use self::{episode::*, observation::*, render::*};

mod episode;
mod observation;
mod render;
