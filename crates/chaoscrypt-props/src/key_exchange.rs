//! Shared-secret sensitivity of a key exchange to tiny private-key changes.

use chaoscrypt_core::{EntropyLabel, PrimitiveFactory};
use rand::Rng;

use crate::PropsError;
use crate::difference::BitDifference;
use crate::result::{PassPolicy, SummaryStats, TestResult, TrialRecord};

pub const PROPERTY: &str = "dh_sensitivity";

pub const DEFAULT_PRIVATE_BITS: u32 = 8;

pub const DEFAULT_POLICY: PassPolicy = PassPolicy::Above { lower: 30.0 };

/// Run the baseline exchange, then one exchange per perturbed entropy
/// label, and compare each shared secret with the baseline bit by bit.
///
/// The exchange draws its modulus and parameters from a seed taken from
/// `rng`. The summary records `private_bits` and the modulus size of the
/// last variation.
pub fn test_dh_key_sensitivity<F, R>(
    factory: &F,
    private_bits: u32,
    policy: PassPolicy,
    rng: &mut R,
) -> Result<TestResult, PropsError>
where
    F: PrimitiveFactory + ?Sized,
    R: Rng + ?Sized,
{
    if private_bits < 2 {
        return Err(PropsError::invalid(format!(
            "private_bits must be at least 2, got {private_bits}"
        )));
    }
    let exchange = factory.key_exchange(private_bits, rng.random())?;
    let info = exchange.system_info();
    log::debug!(
        "{PROPERTY}: private_bits={} public_bits={} mod_bits={}",
        info.private_bits,
        info.public_bits,
        info.mod_bits
    );

    let baseline = exchange.simulate_exchange(EntropyLabel::AliceShared)?;
    if !baseline.matches() {
        log::warn!("{PROPERTY}: baseline exchange did not agree on a shared secret");
    }

    let mut tests = Vec::with_capacity(EntropyLabel::VARIATIONS.len());
    let mut mod_bits = info.mod_bits;
    for label in EntropyLabel::VARIATIONS {
        let outcome = exchange.simulate_exchange(label)?;
        let diff = BitDifference::integers(&baseline.shared_secret, &outcome.shared_secret);
        log::debug!(
            "{PROPERTY}: {label} differs in {}/{} bits",
            diff.difference_bits,
            diff.total_bits
        );
        mod_bits = outcome.mod_bits;
        tests.push(TrialRecord::KeyExchange {
            baseline_label: baseline.label.to_string(),
            variation_label: label.to_string(),
            baseline_shared: baseline.shared_secret.to_string(),
            variation_shared: outcome.shared_secret.to_string(),
            difference_bits: diff.difference_bits,
            total_bits: diff.total_bits,
            difference_percent: diff.difference_percent,
        });
    }

    TestResult::from_trials_with(PROPERTY, tests, policy, |summary| SummaryStats {
        private_bits: Some(private_bits),
        mod_bits: Some(mod_bits),
        ..summary
    })
}
