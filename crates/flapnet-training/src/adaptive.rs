//! Feedback control of the mutation parameters.
//!
//! After every generation the best fitness is compared with the previous one.
//! While it keeps improving, mutation rate and strength slowly anneal towards
//! [`MUTATION_FLOOR`] for fine-tuning. Once the best fitness has stayed exactly
//! the same for more than [`STAGNATION_LIMIT`] generations in a row, both are
//! raised towards [`MUTATION_CEILING`] to escape the plateau.
//!
//! Both values are clamped into `[MUTATION_FLOOR, MUTATION_CEILING]` on every
//! update, whatever they started at.

use serde::{Deserialize, Serialize};

/// Number of unchanged generations tolerated before escalating.
pub const STAGNATION_LIMIT: usize = 5;
/// Lower bound for mutation rate and strength.
pub const MUTATION_FLOOR: f32 = 0.05;
/// Upper bound for mutation rate and strength.
pub const MUTATION_CEILING: f32 = 0.5;

const ESCALATE_RATE_FACTOR: f32 = 1.2;
const ESCALATE_STRENGTH_FACTOR: f32 = 1.1;
const ANNEAL_FACTOR: f32 = 0.95;

/// What an [`AdaptiveMutation::adapt`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MutationAdjustment {
    /// The best fitness changed; rate and strength were annealed.
    Annealed,
    /// The best fitness is unchanged, but not for long enough to react.
    Stagnant { generations: usize },
    /// The best fitness has been unchanged for too long; rate and strength
    /// were raised.
    Escalated { generations: usize },
}

/// Current mutation parameters together with the stagnation history.
///
/// # Example
///
/// ```
/// use flapnet_training::adaptive::{AdaptiveMutation, MutationAdjustment};
///
/// let mut mutation = AdaptiveMutation::new(0.2, 0.3);
/// assert_eq!(mutation.adapt(10.0), MutationAdjustment::Annealed);
/// assert!(mutation.rate() < 0.2);
///
/// for _ in 0..5 {
///     assert!(mutation.adapt(10.0).is_stagnant());
/// }
/// assert!(mutation.adapt(10.0).is_escalated());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveMutation {
    rate: f32,
    strength: f32,
    previous_best: Option<f32>,
    stagnation_counter: usize,
}

impl AdaptiveMutation {
    #[must_use]
    pub const fn new(rate: f32, strength: f32) -> Self {
        Self {
            rate,
            strength,
            previous_best: None,
            stagnation_counter: 0,
        }
    }

    #[must_use]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    #[must_use]
    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Best fitness seen by the last [`Self::adapt`] call.
    #[must_use]
    pub fn previous_best(&self) -> Option<f32> {
        self.previous_best
    }

    /// Consecutive generations whose best fitness equalled the previous one.
    #[must_use]
    pub fn stagnation_counter(&self) -> usize {
        self.stagnation_counter
    }

    /// Updates rate and strength from the best fitness of the generation that
    /// was just scored.
    pub fn adapt(&mut self, best: f32) -> MutationAdjustment {
        let stagnant = self.previous_best == Some(best);
        self.previous_best = Some(best);

        if !stagnant {
            self.stagnation_counter = 0;
            self.rate = clamp_mutation(self.rate * ANNEAL_FACTOR);
            self.strength = clamp_mutation(self.strength * ANNEAL_FACTOR);
            return MutationAdjustment::Annealed;
        }

        self.stagnation_counter += 1;
        let generations = self.stagnation_counter;
        if generations <= STAGNATION_LIMIT {
            return MutationAdjustment::Stagnant { generations };
        }

        self.rate = clamp_mutation(self.rate * ESCALATE_RATE_FACTOR);
        self.strength = clamp_mutation(self.strength * ESCALATE_STRENGTH_FACTOR);
        tracing::debug!(
            generations,
            rate = self.rate,
            strength = self.strength,
            "escalated mutation after stagnation"
        );
        MutationAdjustment::Escalated { generations }
    }
}

fn clamp_mutation(value: f32) -> f32 {
    value.clamp(MUTATION_FLOOR, MUTATION_CEILING)
}
