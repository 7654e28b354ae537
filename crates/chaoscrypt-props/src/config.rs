//! Suite configuration.
//!
//! Every field has a default, so a JSON file only needs the values it
//! changes:
//!
//! ```json
//! { "seed": 7, "cipher": { "rounds": 4, "model": "single_bit_flip" } }
//! ```

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::result::PassPolicy;
use crate::{chebyshev, cipher, hyperchaos, key_exchange, sbox};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Fixes the random generator. `None` seeds from the OS.
    pub seed: Option<u64>,
    pub sbox: SboxConfig,
    pub cipher: CipherConfig,
    pub key_exchange: KeyExchangeConfig,
    pub chebyshev: ChebyshevConfig,
    pub hyperchaos: HyperchaosConfig,
}

impl SuiteConfig {
    /// Random generator for one run: seeded when `seed` is set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SboxConfig {
    pub box_size: usize,
    /// Base secret; drawn at random when absent.
    pub shared_secret: Option<u64>,
    pub policy: PassPolicy,
}

impl Default for SboxConfig {
    fn default() -> Self {
        Self {
            box_size: sbox::DEFAULT_BOX_SIZE,
            shared_secret: None,
            policy: sbox::DEFAULT_POLICY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    /// Generate the cipher's S-box from this secret instead of the default.
    pub sbox_secret: Option<u64>,
    pub rounds: usize,
    pub block_size: usize,
    pub model: cipher::PlaintextModel,
    pub policy: PassPolicy,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            sbox_secret: None,
            rounds: cipher::DEFAULT_ROUNDS,
            block_size: cipher::DEFAULT_BLOCK_SIZE,
            model: cipher::PlaintextModel::default(),
            policy: cipher::DEFAULT_POLICY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyExchangeConfig {
    pub private_bits: u32,
    pub policy: PassPolicy,
}

impl Default for KeyExchangeConfig {
    fn default() -> Self {
        Self {
            private_bits: key_exchange::DEFAULT_PRIVATE_BITS,
            policy: key_exchange::DEFAULT_POLICY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChebyshevConfig {
    pub modulus: u64,
    /// Number of sample points `x` drawn from `[0, modulus)`.
    pub samples: usize,
    /// Degrees `2..=max_degree` are tested.
    pub max_degree: u64,
    /// Degree of the polynomial whose avalanche is measured.
    pub avalanche_degree: u64,
    pub bit_positions: Vec<usize>,
    pub policy: PassPolicy,
}

impl Default for ChebyshevConfig {
    fn default() -> Self {
        Self {
            modulus: chebyshev::DEFAULT_MODULUS,
            samples: chebyshev::DEFAULT_SAMPLES,
            max_degree: chebyshev::DEFAULT_MAX_DEGREE,
            avalanche_degree: chebyshev::DEFAULT_AVALANCHE_DEGREE,
            bit_positions: chebyshev::DEFAULT_BIT_POSITIONS.to_vec(),
            policy: crate::BIT_FLIP_POLICY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperchaosConfig {
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    /// Random initial states per test.
    pub samples: usize,
    /// State components perturbed by the byte avalanche test.
    pub positions: Vec<usize>,
    pub num_bytes: usize,
    pub skip: usize,
    pub policy: PassPolicy,
    /// Offset added to `x` by the sensitivity test.
    pub perturbation: f64,
    /// Euclidean distance at which two trajectories count as diverged.
    pub divergence_threshold: f64,
    pub time_limit: f64,
    pub time_points: usize,
    /// Sensitivity passes when the mean divergence time is below this.
    pub max_divergence_time: f64,
}

impl Default for HyperchaosConfig {
    fn default() -> Self {
        let (k1, k2, k3) = chaoscrypt_core::HyperchaosSystem::default().params();
        Self {
            k1,
            k2,
            k3,
            samples: hyperchaos::DEFAULT_SAMPLES,
            positions: hyperchaos::DEFAULT_POSITIONS.to_vec(),
            num_bytes: hyperchaos::DEFAULT_NUM_BYTES,
            skip: hyperchaos::DEFAULT_SKIP,
            policy: crate::BIT_FLIP_POLICY,
            perturbation: hyperchaos::DEFAULT_PERTURBATION,
            divergence_threshold: hyperchaos::DEFAULT_DIVERGENCE_THRESHOLD,
            time_limit: hyperchaos::DEFAULT_TIME_LIMIT,
            time_points: hyperchaos::DEFAULT_TIME_POINTS,
            max_divergence_time: hyperchaos::DEFAULT_MAX_DIVERGENCE_TIME,
        }
    }
}

impl HyperchaosConfig {
    pub fn system(&self) -> chaoscrypt_core::HyperchaosSystem {
        chaoscrypt_core::HyperchaosSystem::new(self.k1, self.k2, self.k3)
    }
}

/// Load a [`SuiteConfig`] from a JSON file.
pub fn load_from_path(path: &Path) -> std::io::Result<SuiteConfig> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str::<SuiteConfig>(&raw).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("failed to parse suite config JSON: {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "seed": 7, "cipher": {{ "rounds": 4, "model": "single_bit_flip" }} }}"#
        )
        .unwrap();
        let cfg = load_from_path(file.path()).unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.cipher.rounds, 4);
        assert_eq!(cfg.cipher.model, cipher::PlaintextModel::SingleBitFlip);
        assert_eq!(cfg.cipher.block_size, cipher::DEFAULT_BLOCK_SIZE);
        assert_eq!(cfg.sbox, SboxConfig::default());
        assert_eq!(cfg.key_exchange.private_bits, 8);
    }

    #[test]
    fn policies_are_configurable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "sbox": {{ "policy": {{ "kind": "band", "low": 10, "high": 90 }} }} }}"#
        )
        .unwrap();
        let cfg = load_from_path(file.path()).unwrap();
        assert_eq!(
            cfg.sbox.policy,
            PassPolicy::Band {
                low: 10.0,
                high: 90.0
            }
        );
    }

    #[test]
    fn malformed_file_is_invalid_data() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load_from_path(file.path()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_path(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let cfg = SuiteConfig {
            seed: Some(12345),
            ..SuiteConfig::default()
        };
        let a: u64 = cfg.rng().random();
        let b: u64 = cfg.rng().random();
        assert_eq!(a, b);
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = SuiteConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: SuiteConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
