//! Fixed-topology feed-forward policy mapping observations to a flap probability.
//!
//! - [`network`] - [`PolicyNetwork`]: 4 inputs, two hidden layers of 16 `tanh` units,
//!   one `sigmoid` output
//! - [`parameters`] - [`Parameters`]: the ordered, named tensors that fully describe a
//!   network, used by the genetic operators and by persistence
//! - [`activation`] - Activation functions
//!
//! The forward pass is a pure function of the parameters and the input: the
//! network keeps no state between calls.
//!
//! # Example
//!
//! ```
//! use flapnet_policy::PolicyNetwork;
//!
//! let mut network = PolicyNetwork::random(&mut rand::rng());
//! let input = [0.5, 0.0, 1.0, 0.5];
//! let probability = network.infer(&input);
//! assert!((0.0..=1.0).contains(&probability));
//! assert_eq!(probability, network.infer(&input));
//!
//! let params = network.export_parameters();
//! network.import_parameters(params).unwrap();
//! ```

pub use self::{activation::*, network::*, parameters::*};

pub mod activation;
pub mod network;
pub mod parameters;
