//! Block cipher avalanche.
//!
//! The default model encrypts `block_size` independent random plaintexts and
//! compares every ciphertext with the first one. Two unrelated inputs to a
//! good cipher differ in about half their output bits, so the verdict is a
//! band around 50% rather than a lower bound.
//!
//! [`PlaintextModel::SingleBitFlip`] runs the stricter textbook variant:
//! one random plaintext, every bit flipped in turn.

use std::str::FromStr;

use chaoscrypt_core::PrimitiveFactory;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::PropsError;
use crate::avalanche::{test_avalanche, test_bit_flip_avalanche};
use crate::result::{PassPolicy, TestResult};

pub const PROPERTY: &str = "cipher_avalanche";

/// Secret of the S-box used when the caller supplies none.
pub const DEFAULT_SBOX_SECRET: u64 = 12345;
pub const DEFAULT_SBOX_SIZE: usize = 256;

/// Key every plaintext is encrypted under.
pub const TEST_KEY: &[u8] = b"testkey12";

pub const DEFAULT_ROUNDS: usize = 8;
pub const DEFAULT_BLOCK_SIZE: usize = 16;

pub const DEFAULT_POLICY: PassPolicy = PassPolicy::Band {
    low: 45.0,
    high: 55.0,
};

/// How plaintext variants are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaintextModel {
    /// `block_size` independent random blocks; block 0 is the baseline.
    #[default]
    IndependentBlocks,
    /// One random block, each of its `8 * block_size` bits flipped once.
    SingleBitFlip,
}

impl PlaintextModel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IndependentBlocks => "independent_blocks",
            Self::SingleBitFlip => "single_bit_flip",
        }
    }
}

impl std::fmt::Display for PlaintextModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaintextModel {
    type Err = PropsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "independent_blocks" | "independent" => Ok(Self::IndependentBlocks),
            "single_bit_flip" | "bit_flip" => Ok(Self::SingleBitFlip),
            other => Err(PropsError::invalid(format!("unknown plaintext model {other:?}"))),
        }
    }
}

/// Encrypt random plaintexts under [`TEST_KEY`] and score ciphertext
/// divergence.
///
/// With `sbox` of `None` the table is generated from
/// [`DEFAULT_SBOX_SECRET`]. Plaintexts are drawn from `rng`, so a seeded
/// generator reproduces the whole test.
pub fn test_block_cipher_avalanche<F, R>(
    factory: &F,
    sbox: Option<&[u32]>,
    rounds: usize,
    block_size: usize,
    model: PlaintextModel,
    policy: PassPolicy,
    rng: &mut R,
) -> Result<TestResult, PropsError>
where
    F: PrimitiveFactory + ?Sized,
    R: Rng + ?Sized,
{
    if rounds == 0 {
        return Err(PropsError::invalid("rounds must be positive"));
    }
    if block_size < 2 || block_size % 2 != 0 {
        return Err(PropsError::invalid(format!(
            "block_size must be even and at least 2, got {block_size}"
        )));
    }

    let generated;
    let sbox = match sbox {
        Some([]) => return Err(PropsError::invalid("sbox must not be empty")),
        Some(table) => table,
        None => {
            generated = factory
                .sbox_generator(DEFAULT_SBOX_SECRET, DEFAULT_SBOX_SIZE)?
                .generate()?;
            &generated[..]
        }
    };
    let cipher = factory.block_cipher(sbox, rounds, block_size)?;
    log::debug!("{PROPERTY}: rounds={rounds} block_size={block_size} model={model}");

    let encrypt = |pt: &Vec<u8>| cipher.encrypt(pt, TEST_KEY);
    match model {
        PlaintextModel::IndependentBlocks => {
            let plaintexts: Vec<Vec<u8>> = (0..block_size)
                .map(|_| random_block(block_size, rng))
                .collect();
            test_avalanche(PROPERTY, &plaintexts, encrypt, policy)
        }
        PlaintextModel::SingleBitFlip => {
            let plaintext = random_block(block_size, rng);
            let positions: Vec<usize> = (0..block_size * 8).collect();
            test_bit_flip_avalanche(PROPERTY, &[plaintext], &positions, encrypt, policy)
        }
    }
}

/// The cipher's S-box for a configured secret, or `None` to let
/// [`test_block_cipher_avalanche`] use its default table.
pub fn configured_sbox<F>(factory: &F, secret: Option<u64>) -> Result<Option<Vec<u32>>, PropsError>
where
    F: PrimitiveFactory + ?Sized,
{
    let Some(secret) = secret else {
        return Ok(None);
    };
    Ok(Some(factory.sbox_generator(secret, DEFAULT_SBOX_SIZE)?.generate()?))
}

fn random_block<R: RngCore + ?Sized>(block_size: usize, rng: &mut R) -> Vec<u8> {
    let mut block = vec![0u8; block_size];
    rng.fill_bytes(&mut block);
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BrokenPrimitives, FixedPrimitives, HalfPrimitives};
    use chaoscrypt_core::{HyperchaosPrimitives, PrimitiveError};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn run(
        factory: &dyn PrimitiveFactory,
        sbox: Option<&[u32]>,
        model: PlaintextModel,
        seed: u64,
    ) -> Result<TestResult, PropsError> {
        let mut rng = StdRng::seed_from_u64(seed);
        test_block_cipher_avalanche(
            factory,
            sbox,
            DEFAULT_ROUNDS,
            DEFAULT_BLOCK_SIZE,
            model,
            DEFAULT_POLICY,
            &mut rng,
        )
    }

    #[test]
    fn seeded_run_is_reproducible() {
        let f = HyperchaosPrimitives::default();
        let sbox: Vec<u32> = (0..256).collect();
        let a = run(&f, Some(&sbox), PlaintextModel::IndependentBlocks, 12345).unwrap();
        let b = run(&f, Some(&sbox), PlaintextModel::IndependentBlocks, 12345).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.tests.len(), DEFAULT_BLOCK_SIZE - 1);
    }

    #[test]
    fn default_sbox_is_generated() {
        let f = HyperchaosPrimitives::default();
        let r = run(&f, None, PlaintextModel::IndependentBlocks, 1).unwrap();
        assert_eq!(r.property, PROPERTY);
        assert!(r.tests.iter().all(|t| {
            let p = t.difference_percent();
            (0.0..=100.0).contains(&p)
        }));
    }

    #[test]
    fn bit_flip_model_covers_every_bit() {
        let f = HyperchaosPrimitives::default();
        let r = run(&f, None, PlaintextModel::SingleBitFlip, 2).unwrap();
        assert_eq!(r.tests.len(), DEFAULT_BLOCK_SIZE * 8);
    }

    #[test]
    fn half_flipping_cipher_passes() {
        let r = run(&HalfPrimitives, None, PlaintextModel::IndependentBlocks, 0).unwrap();
        assert_eq!(r.summary.avg_difference, 50.0);
        assert!(r.passed);
        let r = run(&HalfPrimitives, None, PlaintextModel::SingleBitFlip, 0).unwrap();
        assert_eq!(r.summary.avg_difference, 50.0);
        assert!(r.passed);
    }

    #[test]
    fn constant_cipher_fails() {
        let r = run(&FixedPrimitives, None, PlaintextModel::IndependentBlocks, 0).unwrap();
        assert_eq!(r.summary.avg_difference, 0.0);
        assert!(!r.passed);
    }

    #[test]
    fn bad_parameters_are_rejected() {
        let f = HyperchaosPrimitives::default();
        let mut rng = StdRng::seed_from_u64(0);
        let model = PlaintextModel::default();
        for (rounds, block_size) in [(0, 16), (8, 0), (8, 1), (8, 15)] {
            let err = test_block_cipher_avalanche(
                &f,
                None,
                rounds,
                block_size,
                model,
                DEFAULT_POLICY,
                &mut rng,
            )
            .unwrap_err();
            assert!(matches!(err, PropsError::InvalidArgument(_)), "{rounds}/{block_size}");
        }
        let err = run(&f, Some(&[][..]), model, 0).unwrap_err();
        assert!(matches!(err, PropsError::InvalidArgument(_)));
    }

    #[test]
    fn factory_errors_pass_through() {
        let err = run(&BrokenPrimitives, None, PlaintextModel::default(), 0).unwrap_err();
        assert_eq!(
            err,
            PropsError::Primitive(PrimitiveError::InvalidArgument("broken".into()))
        );
    }

    #[test]
    fn configured_sbox_follows_the_secret() {
        let f = HyperchaosPrimitives::default();
        assert_eq!(configured_sbox(&f, None).unwrap(), None);
        let table = configured_sbox(&f, Some(777)).unwrap().unwrap();
        let expected = f.sbox_generator(777, DEFAULT_SBOX_SIZE).unwrap().generate().unwrap();
        assert_eq!(table, expected);
        assert!(configured_sbox(&BrokenPrimitives, Some(1)).is_err());
    }

    #[test]
    fn model_names_parse() {
        for model in [PlaintextModel::IndependentBlocks, PlaintextModel::SingleBitFlip] {
            assert_eq!(model.as_str().parse::<PlaintextModel>().unwrap(), model);
        }
        assert!("rotate".parse::<PlaintextModel>().is_err());
    }
}
