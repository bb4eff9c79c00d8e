use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use flapnet_policy::{Parameters, PolicyNetwork};
use serde::{Deserialize, Serialize};

use crate::util;

/// A trained policy network as stored on disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub generation: usize,
    pub score: f32,
    pub parameters: Parameters,
}

impl PolicyModel {
    pub fn new(
        name: impl Into<String>,
        network: &PolicyNetwork,
        generation: usize,
        score: f32,
    ) -> Self {
        Self {
            name: name.into(),
            trained_at: Utc::now(),
            generation,
            score,
            parameters: network.export_parameters(),
        }
    }

    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        util::read_json_file("policy model", path)
    }

    pub fn save<P>(&self, path: P) -> anyhow::Result<()>
    where
        P: AsRef<Path>,
    {
        util::save_json_file("policy model", path, self)
    }

    /// Rebuilds the network, rejecting parameters of the wrong layout.
    pub fn to_network(&self) -> anyhow::Result<PolicyNetwork> {
        PolicyNetwork::from_parameters(self.parameters.clone())
            .with_context(|| format!("Model `{}` has invalid parameters", self.name))
    }
}

#[cfg(test)]
mod tests {
    use flapnet_policy::Tensor;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_model_json_roundtrip() {
        let mut rng = Pcg32::seed_from_u64(1);
        let network = PolicyNetwork::random(&mut rng);
        let model = PolicyModel::new("best", &network, 12, 34.0);

        let json = serde_json::to_string(&model).unwrap();
        let restored: PolicyModel = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.generation, 12);
        assert_eq!(restored.score, 34.0);
        assert_eq!(restored.to_network().unwrap(), network);
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut model = PolicyModel::new("broken", &PolicyNetwork::random(&mut rng), 0, 0.0);
        model.parameters =
            Parameters::new(vec![Tensor::filled("layers.0.weight", vec![2, 2], 0.0)]);
        let err = model.to_network().unwrap_err();
        assert!(err.to_string().contains("broken"));
    }
}
