use std::fmt::{self, Write as _};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 128-bit seed for every pseudorandom stream in a run.
///
/// A seed initializes a [`Pcg32`] generator. Episodes use one to place obstacle
/// gaps and the evolution engine uses one for selection, crossover and
/// mutation, so fixing the seed makes a whole run reproducible.
///
/// Seeds serialize as a 32-character hex string.
///
/// # Example
///
/// ```
/// use flapnet_engine::Seed;
/// use rand::Rng as _;
///
/// let seed: Seed = rand::rng().random();
/// let mut a = seed.rng();
/// let mut b = seed.rng();
/// assert_eq!(a.random::<u64>(), b.random::<u64>());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed([u8; 16]);

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({self})")
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for Seed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{self}").unwrap();
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for Seed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

/// Allows drawing seeds with `rng.random()`, which is how a run derives
/// independent per-episode streams from its own generator.
impl Distribution<Seed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Seed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        Seed(seed)
    }
}

impl Seed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Builds a seed from a small integer, convenient for command-line flags and tests.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Creates a fresh generator positioned at the start of this seed's stream.
    #[must_use]
    pub fn rng(&self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_random_seed() {
        let seed: Seed = rand::rng().random();
        let serialized = serde_json::to_string(&seed).unwrap();
        let deserialized: Seed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(seed, deserialized);
    }

    #[test]
    fn test_known_value_sequential_bytes() {
        let seed = Seed::from_bytes([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
    }

    #[test]
    fn test_from_u64_fills_low_bytes() {
        let seed = Seed::from_u64(0xff);
        assert_eq!(seed.to_string(), "000000000000000000000000000000ff");
    }

    #[test]
    fn test_deserialize_uppercase_hex() {
        let json = "\"0123456789ABCDEFFEDCBA9876543210\"";
        let deserialized: Seed = serde_json::from_str(json).unwrap();
        assert_eq!(deserialized.to_string(), "0123456789abcdeffedcba9876543210");
    }

    #[test]
    fn test_error_invalid_hex() {
        for json in [
            "\"ghijklmnopqrstuvwxyzghijklmnopqr\"",
            "\"0123456789abcdef0123456789abcde\"",
            "\"\"",
        ] {
            let result: Result<Seed, _> = serde_json::from_str(json);
            let err_msg = result.unwrap_err().to_string();
            assert!(err_msg.contains("invalid hex"), "{json}: {err_msg}");
        }
    }

    #[test]
    fn test_same_seed_same_stream() {
        let seed = Seed::from_u64(42);
        let mut a = seed.rng();
        let mut b = seed.rng();
        for _ in 0..20 {
            assert_eq!(a.random::<u32>(), b.random::<u32>());
        }
    }
}
