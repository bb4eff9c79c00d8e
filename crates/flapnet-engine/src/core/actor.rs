use super::{
    geometry::Rect,
    playfield::{FLAP_VELOCITY, GRAVITY, PLAYFIELD_HEIGHT},
};

/// Horizontal position of the actor's left edge. The actor never moves sideways.
pub const ACTOR_X: f32 = 50.0;
/// Width of the actor's bounding box.
pub const ACTOR_WIDTH: f32 = 30.0;
/// Height of the actor's bounding box.
pub const ACTOR_HEIGHT: f32 = 30.0;

/// Largest `y` the actor can occupy; reaching it means hitting the floor.
pub const ACTOR_MAX_Y: f32 = PLAYFIELD_HEIGHT - ACTOR_HEIGHT;

/// Outcome of integrating the actor for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum BoundaryContact {
    /// The actor stayed strictly inside the playfield.
    None,
    /// The actor hit the ceiling; its velocity was zeroed.
    Ceiling,
    /// The actor hit the floor and died.
    Floor,
}

/// The flapping actor: vertical position, vertical velocity and liveness.
///
/// `alive` is monotonic: once the actor hits the floor it stays dead.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    y: f32,
    velocity: f32,
    alive: bool,
}

impl Default for Actor {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor {
    /// Creates an actor at mid-height with zero velocity.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            y: PLAYFIELD_HEIGHT / 2.0,
            velocity: 0.0,
            alive: true,
        }
    }

    #[must_use]
    pub const fn x(&self) -> f32 {
        ACTOR_X
    }

    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub const fn velocity(&self) -> f32 {
        self.velocity
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Tilt in degrees derived from the velocity. Only meaningful for drawing.
    #[must_use]
    pub fn rotation(&self) -> f32 {
        (self.velocity * 2.0).clamp(-30.0, 90.0)
    }

    #[must_use]
    pub const fn bounding_box(&self) -> Rect {
        Rect::new(ACTOR_X, self.y, ACTOR_WIDTH, ACTOR_HEIGHT)
    }

    /// Replaces the current vertical velocity with the upward flap impulse.
    pub fn flap(&mut self) {
        self.velocity = FLAP_VELOCITY;
    }

    /// Applies gravity, moves the actor and resolves contact with the playfield bounds.
    pub fn integrate(&mut self) -> BoundaryContact {
        self.velocity += GRAVITY;
        self.y += self.velocity;

        if self.y <= 0.0 {
            self.y = 0.0;
            self.velocity = 0.0;
            return BoundaryContact::Ceiling;
        }
        if self.y >= ACTOR_MAX_Y {
            self.y = ACTOR_MAX_Y;
            self.alive = false;
            return BoundaryContact::Floor;
        }
        BoundaryContact::None
    }
}
