//! Runs the avalanche and sensitivity tests together.

use chaoscrypt_core::{HyperchaosPrimitives, PrimitiveFactory};
use rand::Rng;
use serde::Serialize;

use crate::PropsError;
use crate::cipher::{configured_sbox, test_block_cipher_avalanche};
use crate::config::SuiteConfig;
use crate::key_exchange::test_dh_key_sensitivity;
use crate::result::TestResult;
use crate::sbox::test_sbox_avalanche;

/// Results of one full run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    pub sbox_avalanche: TestResult,
    pub cipher_avalanche: TestResult,
    pub dh_sensitivity: TestResult,
    /// All three tests passed.
    pub all_passed: bool,
}

impl SuiteReport {
    /// The three results in run order.
    pub fn results(&self) -> [&TestResult; 3] {
        [&self.sbox_avalanche, &self.cipher_avalanche, &self.dh_sensitivity]
    }
}

/// A factory paired with the parameters to test it under.
pub struct CryptoSuite<F = HyperchaosPrimitives> {
    factory: F,
    config: SuiteConfig,
}

impl Default for CryptoSuite {
    fn default() -> Self {
        Self::new(HyperchaosPrimitives::default(), SuiteConfig::default())
    }
}

impl<F: PrimitiveFactory> CryptoSuite<F> {
    pub fn new(factory: F, config: SuiteConfig) -> Self {
        Self { factory, config }
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Run with a generator derived from the configured seed.
    pub fn run(&self) -> Result<SuiteReport, PropsError> {
        run_all_tests_with(&self.factory, &self.config, &mut self.config.rng())
    }

    pub fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SuiteReport, PropsError> {
        run_all_tests_with(&self.factory, &self.config, rng)
    }
}

/// Run the S-box, cipher and key-exchange tests on the hyperchaotic
/// primitives with default parameters and an OS-seeded generator.
pub fn run_all_tests() -> Result<SuiteReport, PropsError> {
    CryptoSuite::<HyperchaosPrimitives>::default().run()
}

/// Run the three tests in order: S-box, cipher, key exchange.
pub fn run_all_tests_with<F, R>(
    factory: &F,
    config: &SuiteConfig,
    rng: &mut R,
) -> Result<SuiteReport, PropsError>
where
    F: PrimitiveFactory + ?Sized,
    R: Rng + ?Sized,
{
    let sbox_avalanche = test_sbox_avalanche(
        factory,
        config.sbox.box_size,
        config.sbox.shared_secret,
        config.sbox.policy,
        rng,
    )?;

    let cipher_sbox = configured_sbox(factory, config.cipher.sbox_secret)?;
    let cipher_avalanche = test_block_cipher_avalanche(
        factory,
        cipher_sbox.as_deref(),
        config.cipher.rounds,
        config.cipher.block_size,
        config.cipher.model,
        config.cipher.policy,
        rng,
    )?;

    let dh_sensitivity = test_dh_key_sensitivity(
        factory,
        config.key_exchange.private_bits,
        config.key_exchange.policy,
        rng,
    )?;

    let all_passed = sbox_avalanche.passed && cipher_avalanche.passed && dh_sensitivity.passed;
    log::info!("suite: all_passed={all_passed}");
    Ok(SuiteReport {
        sbox_avalanche,
        cipher_avalanche,
        dh_sensitivity,
        all_passed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BrokenPrimitives, FixedPrimitives, HalfPrimitives};
    use crate::{cipher, key_exchange, sbox};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded(seed: u64) -> SuiteConfig {
        SuiteConfig {
            seed: Some(seed),
            ..SuiteConfig::default()
        }
    }

    #[test]
    fn run_all_returns_three_named_results() {
        let report = run_all_tests().unwrap();
        let names: Vec<&str> = report.results().iter().map(|r| r.property.as_str()).collect();
        assert_eq!(
            names,
            vec![sbox::PROPERTY, cipher::PROPERTY, key_exchange::PROPERTY]
        );
        assert!(report.results().iter().all(|r| !r.tests.is_empty()));
        assert_eq!(
            report.all_passed,
            report.results().iter().all(|r| r.passed)
        );
    }

    #[test]
    fn seeded_suite_is_reproducible() {
        let suite = CryptoSuite::new(HyperchaosPrimitives::default(), seeded(12345));
        assert_eq!(suite.run().unwrap(), suite.run().unwrap());
    }

    #[test]
    fn ideal_doubles_pass_everything() {
        let suite = CryptoSuite::new(HalfPrimitives, seeded(1));
        let report = suite.run().unwrap();
        assert!(report.all_passed);
    }

    #[test]
    fn constant_doubles_fail_everything() {
        let report = run_all_tests_with(&FixedPrimitives, &seeded(1), &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert!(report.results().iter().all(|r| !r.passed));
        assert!(!report.all_passed);
    }

    #[test]
    fn configured_cipher_sbox_secret_is_used() {
        let mut config = seeded(3);
        config.cipher.sbox_secret = Some(777);
        let report = CryptoSuite::new(HyperchaosPrimitives::default(), config)
            .run()
            .unwrap();
        assert_eq!(report.cipher_avalanche.tests.len(), cipher::DEFAULT_BLOCK_SIZE - 1);
    }

    #[test]
    fn primitive_failure_aborts_the_run() {
        let err = CryptoSuite::new(BrokenPrimitives, seeded(0)).run().unwrap_err();
        assert!(matches!(err, PropsError::Primitive(_)));
    }
}
