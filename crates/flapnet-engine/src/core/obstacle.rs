use rand::Rng;

use super::{
    geometry::Rect,
    playfield::{OBSTACLE_SPEED, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH},
};

/// Width of an obstacle column.
pub const OBSTACLE_WIDTH: f32 = 50.0;
/// Vertical size of the opening the actor has to fly through.
pub const OBSTACLE_GAP: f32 = 150.0;
/// Smallest possible `y` of the top edge of the gap.
pub const GAP_TOP_MIN: u16 = 100;
/// Largest possible `y` of the top edge of the gap (`height - gap - GAP_TOP_MIN`).
pub const GAP_TOP_MAX: u16 = 350;

/// A pair of columns with a gap between them, scrolling from right to left.
///
/// The gap position is fixed at spawn time. `passed` is set once, when the
/// trailing edge moves behind the actor, and never cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    x: f32,
    gap_top: f32,
    passed: bool,
}

impl Obstacle {
    /// Spawns an obstacle at the right edge of the playfield with a random gap.
    ///
    /// The gap top is drawn uniformly from the integers
    /// `GAP_TOP_MIN..=GAP_TOP_MAX`.
    pub fn spawn<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let gap_top = rng.random_range(GAP_TOP_MIN..=GAP_TOP_MAX);
        Self::new(PLAYFIELD_WIDTH, f32::from(gap_top))
    }

    #[must_use]
    pub const fn new(x: f32, gap_top: f32) -> Self {
        Self {
            x,
            gap_top,
            passed: false,
        }
    }

    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Horizontal position of the trailing (right) edge.
    #[must_use]
    pub fn trailing_edge(&self) -> f32 {
        self.x + OBSTACLE_WIDTH
    }

    #[must_use]
    pub const fn gap_top(&self) -> f32 {
        self.gap_top
    }

    #[must_use]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + OBSTACLE_GAP
    }

    #[must_use]
    pub fn gap_center(&self) -> f32 {
        self.gap_top + OBSTACLE_GAP / 2.0
    }

    #[must_use]
    pub const fn is_passed(&self) -> bool {
        self.passed
    }

    /// Marks the obstacle as passed. Returns `true` only the first time.
    pub fn mark_passed(&mut self) -> bool {
        !std::mem::replace(&mut self.passed, true)
    }

    pub fn advance(&mut self) {
        self.x -= OBSTACLE_SPEED;
    }

    #[must_use]
    pub fn is_off_screen(&self) -> bool {
        self.trailing_edge() < 0.0
    }

    /// Returns the `(top, bottom)` column rectangles surrounding the gap.
    #[must_use]
    pub fn columns(&self) -> (Rect, Rect) {
        let top = Rect::new(self.x, 0.0, OBSTACLE_WIDTH, self.gap_top);
        let bottom = Rect::new(
            self.x,
            self.gap_bottom(),
            OBSTACLE_WIDTH,
            PLAYFIELD_HEIGHT - self.gap_bottom(),
        );
        (top, bottom)
    }

    /// Returns `true` if `rect` strictly overlaps either column.
    #[must_use]
    pub fn collides_with(&self, rect: &Rect) -> bool {
        let (top, bottom) = self.columns();
        rect.overlaps(&top) || rect.overlaps(&bottom)
    }
}
