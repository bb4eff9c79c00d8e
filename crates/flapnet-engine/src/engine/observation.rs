use crate::core::{Actor, Obstacle, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH, VELOCITY_SCALE};

/// Number of values in an [`Observation`].
pub const OBSERVATION_LEN: usize = 4;

/// Normalized summary of the episode state as seen by a policy.
///
/// Values, in order:
///
/// 1. Actor `y` divided by the playfield height
/// 2. Actor velocity divided by [`VELOCITY_SCALE`]
/// 3. Next obstacle `x` divided by the playfield width
/// 4. Next obstacle gap center divided by the playfield height
///
/// When no obstacle lies ahead of the actor, the last two values fall back to
/// `1.0` (as far away as possible) and `0.5` (gap at mid-height).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation([f32; OBSERVATION_LEN]);

impl Observation {
    /// Distance value used when no obstacle is ahead.
    pub const NO_OBSTACLE_DISTANCE: f32 = 1.0;
    /// Gap value used when no obstacle is ahead.
    pub const NO_OBSTACLE_GAP: f32 = 0.5;

    /// Computes the observation for `actor` against the first obstacle (in spawn
    /// order) whose trailing edge is still ahead of the actor.
    #[must_use]
    pub fn new(actor: &Actor, obstacles: &[Obstacle]) -> Self {
        let next = obstacles.iter().find(|o| o.trailing_edge() > actor.x());
        let (distance, gap) = next.map_or(
            (Self::NO_OBSTACLE_DISTANCE, Self::NO_OBSTACLE_GAP),
            |o| (o.x() / PLAYFIELD_WIDTH, o.gap_center() / PLAYFIELD_HEIGHT),
        );
        Self([
            actor.y() / PLAYFIELD_HEIGHT,
            actor.velocity() / VELOCITY_SCALE,
            distance,
            gap,
        ])
    }

    #[must_use]
    pub const fn as_array(&self) -> &[f32; OBSERVATION_LEN] {
        &self.0
    }

    #[must_use]
    pub const fn height(&self) -> f32 {
        self.0[0]
    }

    #[must_use]
    pub const fn velocity(&self) -> f32 {
        self.0[1]
    }

    #[must_use]
    pub const fn obstacle_distance(&self) -> f32 {
        self.0[2]
    }

    #[must_use]
    pub const fn obstacle_gap(&self) -> f32 {
        self.0[3]
    }
}
