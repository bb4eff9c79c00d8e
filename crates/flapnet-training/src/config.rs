//! Evolution parameters and their validation.

use serde::{Deserialize, Serialize};

/// Error raised when an [`EvolutionConfig`] cannot drive an evolution run.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("elite size {elite_size} must be smaller than population size {population_size}")]
    EliteTooLarge {
        elite_size: usize,
        population_size: usize,
    },
    #[display(
        "population size {population_size} leaves no room for offspring with elite size {elite_size} (need at least elite size + 2)"
    )]
    NoRoomForOffspring {
        elite_size: usize,
        population_size: usize,
    },
    #[display("tournament size must be at least 1")]
    EmptyTournament,
    #[display("tournament size {tournament_size} exceeds population size {population_size}")]
    TournamentTooLarge {
        tournament_size: usize,
        population_size: usize,
    },
    #[display("mutation rate {_0} must be within [0, 1]")]
    InvalidMutationRate(#[error(not(source))] f32),
    #[display("mutation strength {_0} must be finite and non-negative")]
    InvalidMutationStrength(#[error(not(source))] f32),
}

/// Parameters of the genetic algorithm.
///
/// # Example
///
/// ```
/// use flapnet_training::config::{ConfigError, EvolutionConfig};
///
/// let config = EvolutionConfig::default();
/// assert!(config.validate().is_ok());
///
/// let config = EvolutionConfig {
///     population_size: 4,
///     elite_size: 4,
///     ..EvolutionConfig::default()
/// };
/// assert!(matches!(config.validate(), Err(ConfigError::EliteTooLarge { .. })));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of candidates in every generation.
    pub population_size: usize,
    /// Probability of perturbing each parameter value of an offspring.
    pub mutation_rate: f32,
    /// Scale of the Gaussian noise added by a mutation.
    pub mutation_strength: f32,
    /// Number of top candidates carried over unchanged.
    pub elite_size: usize,
    /// Number of candidates competing in each tournament.
    pub tournament_size: usize,
    /// Whether mutation rate and strength react to stagnation.
    pub adaptive_mutation: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            mutation_rate: 0.2,
            mutation_strength: 0.3,
            elite_size: 4,
            tournament_size: 5,
            adaptive_mutation: true,
        }
    }
}

impl EvolutionConfig {
    /// Checks the invariants the evolution engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Self {
            population_size,
            mutation_rate,
            mutation_strength,
            elite_size,
            tournament_size,
            adaptive_mutation: _,
        } = *self;

        if elite_size >= population_size {
            return Err(ConfigError::EliteTooLarge {
                elite_size,
                population_size,
            });
        }
        if population_size < elite_size + 2 {
            return Err(ConfigError::NoRoomForOffspring {
                elite_size,
                population_size,
            });
        }
        if tournament_size < 1 {
            return Err(ConfigError::EmptyTournament);
        }
        if tournament_size > population_size {
            return Err(ConfigError::TournamentTooLarge {
                tournament_size,
                population_size,
            });
        }
        if !(0.0..=1.0).contains(&mutation_rate) {
            return Err(ConfigError::InvalidMutationRate(mutation_rate));
        }
        if !mutation_strength.is_finite() || mutation_strength < 0.0 {
            return Err(ConfigError::InvalidMutationStrength(mutation_strength));
        }
        Ok(())
    }
}
