//! Narrow interfaces between the measurement engine and the primitives.
//!
//! The avalanche and sensitivity tests never reach into a primitive's
//! internals. They construct primitives through a [`PrimitiveFactory`] and
//! observe them only through [`SBoxGenerator`], [`BlockCipher`] and
//! [`KeyExchange`]. Swapping the factory points the tests at a different
//! implementation.

use std::str::FromStr;

use num_bigint::BigUint;

use crate::PrimitiveError;

/// Entropy label understood by [`KeyExchange::simulate_exchange`].
///
/// Each label selects a distinct, small perturbation of Alice's key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntropyLabel {
    /// Baseline exchange every variation is compared against.
    AliceShared,
    BaselineEntropy1,
    BaselineEntropy2,
    BaselineEntropyA,
    BaselineEntropyB,
}

impl EntropyLabel {
    /// All labels, baseline first.
    pub const ALL: [EntropyLabel; 5] = [
        Self::AliceShared,
        Self::BaselineEntropy1,
        Self::BaselineEntropy2,
        Self::BaselineEntropyA,
        Self::BaselineEntropyB,
    ];

    /// The four perturbed labels, in measurement order.
    pub const VARIATIONS: [EntropyLabel; 4] = [
        Self::BaselineEntropy1,
        Self::BaselineEntropy2,
        Self::BaselineEntropyA,
        Self::BaselineEntropyB,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AliceShared => "alice_shared",
            Self::BaselineEntropy1 => "baseline_entropy1",
            Self::BaselineEntropy2 => "baseline_entropy2",
            Self::BaselineEntropyA => "baseline_entropyA",
            Self::BaselineEntropyB => "baseline_entropyB",
        }
    }
}

impl std::fmt::Display for EntropyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntropyLabel {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| PrimitiveError::UnknownLabel(s.to_string()))
    }
}

/// Static parameters of a key-exchange instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub modulus: BigUint,
    pub mod_bits: u64,
    pub param: BigUint,
    pub param_bits: u64,
    pub private_bits: u32,
    pub public_bits: u32,
}

/// Everything one simulated exchange produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeOutcome {
    pub label: EntropyLabel,
    pub alice_private: BigUint,
    pub alice_public: BigUint,
    pub alice_raw_public: BigUint,
    pub bob_private: BigUint,
    pub bob_public: BigUint,
    pub bob_raw_public: BigUint,
    /// Shared secret as computed by Alice.
    pub shared_secret: BigUint,
    /// Shared secret as computed by Bob.
    pub bob_shared: BigUint,
    /// Bit length of the modulus the exchange ran under.
    pub mod_bits: u64,
}

impl ExchangeOutcome {
    /// Both sides derived the same secret.
    pub fn matches(&self) -> bool {
        self.shared_secret == self.bob_shared
    }
}

/// Produces a substitution table from a secret.
pub trait SBoxGenerator {
    /// Number of entries the generated table will hold.
    fn box_size(&self) -> usize;

    /// Generate the table. Deterministic for a fixed secret.
    fn generate(&self) -> Result<Vec<u32>, PrimitiveError>;
}

/// Single-block encryption under a caller-supplied key.
pub trait BlockCipher {
    fn block_size(&self) -> usize;

    /// Encrypt exactly one block. Deterministic for fixed inputs; the output
    /// has `block_size()` bytes.
    fn encrypt(&self, plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, PrimitiveError>;
}

/// A Diffie-Hellman-like exchange that can be replayed per entropy label.
pub trait KeyExchange {
    fn system_info(&self) -> SystemInfo;

    fn simulate_exchange(&self, label: EntropyLabel) -> Result<ExchangeOutcome, PrimitiveError>;
}

/// Builds the primitives the measurement engine exercises.
pub trait PrimitiveFactory {
    fn sbox_generator(
        &self,
        secret: u64,
        box_size: usize,
    ) -> Result<Box<dyn SBoxGenerator>, PrimitiveError>;

    fn block_cipher(
        &self,
        sbox: &[u32],
        rounds: usize,
        block_size: usize,
    ) -> Result<Box<dyn BlockCipher>, PrimitiveError>;

    /// Key exchanges draw their modulus and parameters from `seed`.
    fn key_exchange(
        &self,
        private_bits: u32,
        seed: u64,
    ) -> Result<Box<dyn KeyExchange>, PrimitiveError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_strings() {
        for label in EntropyLabel::ALL {
            assert_eq!(label.as_str().parse::<EntropyLabel>().unwrap(), label);
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = "baseline_entropy".parse::<EntropyLabel>().unwrap_err();
        assert_eq!(err, PrimitiveError::UnknownLabel("baseline_entropy".into()));
    }

    #[test]
    fn variations_exclude_baseline() {
        assert!(!EntropyLabel::VARIATIONS.contains(&EntropyLabel::AliceShared));
        assert_eq!(EntropyLabel::VARIATIONS.len(), 4);
    }
}
