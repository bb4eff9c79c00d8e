use arrayvec::ArrayVec;
use rand::Rng;

use crate::{
    activation::Activation,
    parameters::{ParameterShapeError, Parameters, Tensor},
};

/// Number of observation values the network reads.
pub const INPUT_SIZE: usize = 4;
/// Width of each hidden layer.
pub const HIDDEN_SIZE: usize = 16;
/// Number of network outputs.
pub const OUTPUT_SIZE: usize = 1;

/// Probability above which the policy decides to act.
pub const ACTION_THRESHOLD: f32 = 0.5;

const MAX_WIDTH: usize = HIDDEN_SIZE;

#[derive(Debug, Clone, Copy)]
struct LayerSpec {
    inputs: usize,
    outputs: usize,
    activation: Activation,
}

const LAYERS: [LayerSpec; 3] = [
    LayerSpec {
        inputs: INPUT_SIZE,
        outputs: HIDDEN_SIZE,
        activation: Activation::Tanh,
    },
    LayerSpec {
        inputs: HIDDEN_SIZE,
        outputs: HIDDEN_SIZE,
        activation: Activation::Tanh,
    },
    LayerSpec {
        inputs: HIDDEN_SIZE,
        outputs: OUTPUT_SIZE,
        activation: Activation::Sigmoid,
    },
];

/// Fully connected `4 -> 16 -> 16 -> 1` network producing a flap probability.
///
/// Parameters are stored as six tensors, one weight matrix (`[outputs, inputs]`,
/// row-major) and one bias vector per layer, named `layers.{i}.weight` and
/// `layers.{i}.bias`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyNetwork {
    params: Parameters,
}

impl PolicyNetwork {
    /// Names and shapes of the tensors, in order.
    #[must_use]
    pub fn layout() -> Vec<(String, Vec<usize>)> {
        LAYERS
            .iter()
            .enumerate()
            .flat_map(|(i, layer)| {
                [
                    (
                        format!("layers.{i}.weight"),
                        vec![layer.outputs, layer.inputs],
                    ),
                    (format!("layers.{i}.bias"), vec![layer.outputs]),
                ]
            })
            .collect()
    }

    /// Creates a network with every value drawn uniformly from
    /// `[-1/sqrt(fan_in), 1/sqrt(fan_in)]` for its layer.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let tensors = Self::layout()
            .into_iter()
            .zip(LAYERS.iter().flat_map(|layer| [layer, layer]))
            .map(|((name, shape), layer)| {
                #[expect(clippy::cast_precision_loss)]
                let bound = 1.0 / (layer.inputs as f32).sqrt();
                Tensor::from_fn(name, shape, |_| rng.random_range(-bound..=bound))
            })
            .collect();
        Self {
            params: Parameters::new(tensors),
        }
    }

    /// Creates a network from previously exported parameters.
    pub fn from_parameters(params: Parameters) -> Result<Self, ParameterShapeError> {
        params.check_layout(&Self::layout())?;
        Ok(Self { params })
    }

    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Mutable value slices, one per tensor in [`Self::layout`] order.
    pub fn parameter_values_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        self.params.values_mut_iter()
    }

    #[must_use]
    pub fn export_parameters(&self) -> Parameters {
        self.params.clone()
    }

    /// Replaces the parameters, rejecting any value whose layout differs from
    /// [`Self::layout`]. On error the network is left unchanged.
    pub fn import_parameters(&mut self, params: Parameters) -> Result<(), ParameterShapeError> {
        params.check_layout(&Self::layout())?;
        self.params = params;
        Ok(())
    }

    /// Runs the forward pass and returns the output probability in `[0, 1]`.
    #[must_use]
    pub fn infer(&self, input: &[f32; INPUT_SIZE]) -> f32 {
        let mut activations: ArrayVec<f32, MAX_WIDTH> = input.iter().copied().collect();
        for (layer, tensors) in LAYERS.iter().zip(self.params.as_slice().chunks_exact(2)) {
            let weights = tensors[0].values();
            let biases = tensors[1].values();
            activations = weights
                .chunks_exact(layer.inputs)
                .zip(biases)
                .map(|(row, bias)| {
                    let sum = row
                        .iter()
                        .zip(&activations)
                        .fold(*bias, |acc, (w, x)| acc + w * x);
                    layer.activation.apply(sum)
                })
                .collect();
        }
        activations[0]
    }

    /// Returns `true` if the output probability exceeds [`ACTION_THRESHOLD`].
    #[must_use]
    pub fn decide(&self, input: &[f32; INPUT_SIZE]) -> bool {
        self.infer(input) > ACTION_THRESHOLD
    }
}
