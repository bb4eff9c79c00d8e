//! Genetic operators over network parameters.
//!
//! - **Crossover**: [`crossover`] blends two parents tensor by tensor with
//!   [`blend`], drawing one coefficient per tensor
//! - **Mutation**: [`mutate`] adds scaled Gaussian noise to individual values
//!
//! # Blend Granularity
//!
//! The blend coefficient `α` is drawn once per tensor, not per value and not
//! per offspring. Every value of a tensor moves by the same fraction between
//! the two parents, while different tensors of the same child mix differently.

use std::ops::RangeInclusive;

use flapnet_policy::PolicyNetwork;
use rand::Rng;
use rand_distr::StandardNormal;

/// Range the per-tensor blend coefficient is drawn from.
pub const BLEND_ALPHA_RANGE: RangeInclusive<f32> = 0.3..=0.7;

/// Sets every value of `child` to `alpha * child + (1 - alpha) * other`.
///
/// # Panics
///
/// Panics if the two slices differ in length.
///
/// # Example
///
/// ```
/// use flapnet_training::operators;
///
/// let mut child = vec![1.0; 4];
/// operators::blend(&mut child, &[0.0; 4], 0.5);
/// assert_eq!(child, [0.5; 4]);
/// ```
pub fn blend(child: &mut [f32], other: &[f32], alpha: f32) {
    assert_eq!(child.len(), other.len());
    for (x, y) in child.iter_mut().zip(other) {
        *x = alpha * *x + (1.0 - alpha) * y;
    }
}

/// Blends `other` into `child` tensor by tensor, with the coefficient for each
/// tensor produced by `alpha`.
pub fn blend_parameters<F>(child: &mut PolicyNetwork, other: &PolicyNetwork, mut alpha: F)
where
    F: FnMut() -> f32,
{
    for (c, o) in child.parameter_values_mut().zip(other.parameters()) {
        blend(c, o.values(), alpha());
    }
}

/// Creates a child whose every tensor is `α·p1 + (1-α)·p2`, with `α` drawn
/// uniformly from [`BLEND_ALPHA_RANGE`] for each tensor.
pub fn crossover<R>(p1: &PolicyNetwork, p2: &PolicyNetwork, rng: &mut R) -> PolicyNetwork
where
    R: Rng + ?Sized,
{
    let mut child = p1.clone();
    blend_parameters(&mut child, p2, || {
        rng.random_range(BLEND_ALPHA_RANGE)
    });
    child
}

/// Applies Gaussian mutation in place.
///
/// Each value, independently with probability `rate`, receives
/// `strength * N(0, 1)`. Weights and biases follow the same rule.
///
/// # Panics
///
/// Panics if `rate` is outside `[0, 1]`.
pub fn mutate<R>(network: &mut PolicyNetwork, rate: f32, strength: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let rate = f64::from(rate);
    for values in network.parameter_values_mut() {
        for value in values {
            if rng.random_bool(rate) {
                let noise: f32 = rng.sample(StandardNormal);
                *value += strength * noise;
            }
        }
    }
}
