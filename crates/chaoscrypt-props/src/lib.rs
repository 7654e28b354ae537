//! Avalanche and key-sensitivity measurement for chaos-based primitives.
//!
//! Each test perturbs the input of a primitive by a controlled amount, runs
//! the primitive again, measures how many output bits changed and reduces the
//! trials to a [`TestResult`] with summary statistics and a pass/fail verdict.
//!
//! - [`test_sbox_avalanche`]: S-boxes from related secrets.
//! - [`test_block_cipher_avalanche`]: ciphertexts of random plaintexts.
//! - [`test_dh_key_sensitivity`]: shared secrets under perturbed private keys.
//! - [`run_all_tests`]: the three above, as a [`SuiteReport`].
//!
//! Primitives are reached only through [`chaoscrypt_core::PrimitiveFactory`],
//! so any implementation can be measured. The [`chebyshev`] and
//! [`hyperchaos`] modules test the underlying chaotic maps directly.
//!
//! ```no_run
//! use chaoscrypt_props::{CryptoSuite, SuiteConfig};
//! use chaoscrypt_core::HyperchaosPrimitives;
//!
//! let config = SuiteConfig { seed: Some(12345), ..SuiteConfig::default() };
//! let report = CryptoSuite::new(HyperchaosPrimitives::default(), config).run()?;
//! for result in report.results() {
//!     println!("{}: {:.2}% ({})", result.property, result.summary.avg_difference, result.passed);
//! }
//! # Ok::<(), chaoscrypt_props::PropsError>(())
//! ```

pub mod algebra;
pub mod avalanche;
pub mod chebyshev;
pub mod cipher;
pub mod config;
pub mod difference;
pub mod error;
pub mod hyperchaos;
pub mod key_exchange;
pub mod result;
pub mod sbox;
pub mod suite;

#[cfg(test)]
mod testing;

pub use avalanche::{test_avalanche, test_bit_flip_avalanche, test_perturbation_avalanche};
pub use chebyshev::{ChebyshevReport, run_chebyshev_tests};
pub use cipher::{PlaintextModel, configured_sbox, test_block_cipher_avalanche};
pub use config::{SuiteConfig, load_from_path};
pub use difference::{BitDifference, EntryDifference, table_difference};
pub use error::PropsError;
pub use hyperchaos::{HyperchaosReport, run_hyperchaos_tests};
pub use key_exchange::test_dh_key_sensitivity;
pub use result::{PassPolicy, SummaryStats, TestResult, TrialRecord};
pub use sbox::test_sbox_avalanche;
pub use suite::{CryptoSuite, SuiteReport, run_all_tests, run_all_tests_with};

/// Verdict for single-bit-flip avalanche tests: ideal diffusion is 50%.
pub const BIT_FLIP_POLICY: PassPolicy = PassPolicy::Band {
    low: 40.0,
    high: 60.0,
};
