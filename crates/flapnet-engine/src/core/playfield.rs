//! Fixed dimensions and physics constants of the playfield.
//!
//! Coordinates follow screen conventions: `x` grows to the right and `y` grows
//! downward, so the ceiling is `y = 0` and the floor is [`PLAYFIELD_HEIGHT`].

/// Width of the visible playfield.
pub const PLAYFIELD_WIDTH: f32 = 400.0;
/// Height of the visible playfield.
pub const PLAYFIELD_HEIGHT: f32 = 600.0;

/// Velocity added to the actor on every step.
pub const GRAVITY: f32 = 0.25;
/// Vertical velocity the actor takes when it flaps (negative is upward).
pub const FLAP_VELOCITY: f32 = -5.0;

/// Horizontal distance every obstacle travels per step.
pub const OBSTACLE_SPEED: f32 = 3.0;
/// Number of steps between two obstacle spawns.
pub const OBSTACLE_SPAWN_INTERVAL: usize = 100;

/// Scale used to bring the actor velocity into roughly `[-1, 1]` for observations.
pub const VELOCITY_SCALE: f32 = 10.0;
