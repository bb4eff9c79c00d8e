use rand_pcg::Pcg32;

use crate::core::{Actor, OBSTACLE_SPAWN_INTERVAL, Obstacle, Seed};

use super::{EpisodeSnapshot, Observation};

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Termination {
    #[display("hit the floor")]
    Floor,
    #[display("hit an obstacle")]
    Collision,
}

/// One playthrough of the game, advanced by fixed time steps.
///
/// The episode owns its own pseudorandom stream, used only to place obstacle
/// gaps. Two episodes created from the same [`Seed`] and driven by the same
/// actions evolve identically.
///
/// # Example
///
/// ```
/// use flapnet_engine::{Episode, Seed};
///
/// let mut episode = Episode::with_seed(Seed::from_u64(1));
/// assert_eq!(episode.obstacles().len(), 1);
///
/// let (observation, terminated) = episode.step(true);
/// assert!(!terminated);
/// assert!(observation.velocity() < 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Episode {
    rng: Pcg32,
    actor: Actor,
    obstacles: Vec<Obstacle>,
    score: usize,
    steps: usize,
    spawn_timer: usize,
    termination: Option<Termination>,
}

impl Episode {
    /// Creates a freshly reset episode drawing obstacle gaps from `seed`.
    #[must_use]
    pub fn with_seed(seed: Seed) -> Self {
        let mut rng = seed.rng();
        let obstacles = vec![Obstacle::spawn(&mut rng)];
        Self {
            rng,
            actor: Actor::new(),
            obstacles,
            score: 0,
            steps: 0,
            spawn_timer: 0,
            termination: None,
        }
    }

    /// Starts a new playthrough: actor at mid-height with zero velocity, a single
    /// freshly spawned obstacle, and all counters cleared.
    ///
    /// The random stream is not rewound, so consecutive resets see new gaps.
    pub fn reset(&mut self) -> Observation {
        self.actor = Actor::new();
        self.obstacles.clear();
        self.obstacles.push(Obstacle::spawn(&mut self.rng));
        self.score = 0;
        self.steps = 0;
        self.spawn_timer = 0;
        self.termination = None;
        self.observation()
    }

    #[must_use]
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Obstacles in spawn order.
    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    #[must_use]
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.termination.is_some()
    }

    #[must_use]
    pub fn observation(&self) -> Observation {
        Observation::new(&self.actor, &self.obstacles)
    }

    #[must_use]
    pub fn snapshot(&self) -> EpisodeSnapshot<'_> {
        EpisodeSnapshot {
            actor: &self.actor,
            obstacles: &self.obstacles,
            score: self.score,
            steps: self.steps,
            termination: self.termination,
        }
    }

    /// Advances the episode by one step and returns the new observation and
    /// whether the episode has ended.
    ///
    /// Stepping an episode that already ended changes nothing.
    pub fn step(&mut self, flap: bool) -> (Observation, bool) {
        if self.is_terminated() {
            return (self.observation(), true);
        }
        self.steps += 1;

        if flap {
            self.actor.flap();
        }
        if self.actor.integrate().is_floor() {
            self.termination = Some(Termination::Floor);
            return (self.observation(), true);
        }

        for obstacle in &mut self.obstacles {
            obstacle.advance();
        }
        self.obstacles.retain(|o| !o.is_off_screen());

        self.spawn_timer += 1;
        if self.spawn_timer >= OBSTACLE_SPAWN_INTERVAL {
            self.obstacles.push(Obstacle::spawn(&mut self.rng));
            self.spawn_timer = 0;
        }

        let actor_box = self.actor.bounding_box();
        let actor_x = self.actor.x();
        for obstacle in &mut self.obstacles {
            if obstacle.collides_with(&actor_box) {
                self.termination = Some(Termination::Collision);
                break;
            }
            if obstacle.trailing_edge() < actor_x && obstacle.mark_passed() {
                self.score += 1;
            }
        }

        (self.observation(), self.is_terminated())
    }
}
