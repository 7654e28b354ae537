//! Generic avalanche procedures.
//!
//! [`test_avalanche`] compares a transform's output on every variant input
//! against its output on the first (baseline) variant. [`test_bit_flip_avalanche`]
//! is the textbook form: flip one input bit at a time and compare.
//!
//! Transforms are plain closures returning `Result`. Any error they produce
//! is converted into [`PropsError`] and returned as-is.

use num_bigint::BigUint;

use crate::PropsError;
use crate::difference::BitDifference;
use crate::result::{PassPolicy, TestResult, TrialRecord};

/// How an input is rendered in a [`TrialRecord`].
pub trait TrialInput {
    fn describe(&self) -> String;
}

impl TrialInput for Vec<u8> {
    fn describe(&self) -> String {
        self.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl TrialInput for u64 {
    fn describe(&self) -> String {
        self.to_string()
    }
}

impl TrialInput for BigUint {
    fn describe(&self) -> String {
        self.to_string()
    }
}

impl TrialInput for [f64; 5] {
    fn describe(&self) -> String {
        let parts: Vec<String> = self.iter().map(|v| format!("{v:.6}")).collect();
        format!("[{}]", parts.join(", "))
    }
}

/// Bit-level distance between two outputs of the same transform.
pub trait Divergence {
    fn divergence(&self, other: &Self) -> BitDifference;
}

impl Divergence for Vec<u8> {
    fn divergence(&self, other: &Self) -> BitDifference {
        BitDifference::bytes(self, other)
    }
}

impl Divergence for BigUint {
    fn divergence(&self, other: &Self) -> BitDifference {
        BitDifference::integers(self, other)
    }
}

impl Divergence for u64 {
    fn divergence(&self, other: &Self) -> BitDifference {
        BitDifference::words(*self, *other)
    }
}

/// Inputs whose individual bits can be toggled.
pub trait BitFlip: Sized {
    /// Copy of `self` with bit `position` inverted, or `None` when the
    /// position lies outside the value's fixed width.
    fn flip_bit(&self, position: usize) -> Option<Self>;
}

impl BitFlip for Vec<u8> {
    /// Bit 0 is the most significant bit of byte 0.
    fn flip_bit(&self, position: usize) -> Option<Self> {
        let mut out = self.clone();
        let byte = out.get_mut(position / 8)?;
        *byte ^= 0x80 >> (position % 8);
        Some(out)
    }
}

impl BitFlip for u64 {
    fn flip_bit(&self, position: usize) -> Option<Self> {
        u32::try_from(position)
            .ok()
            .and_then(|p| 1u64.checked_shl(p))
            .map(|mask| self ^ mask)
    }
}

impl BitFlip for BigUint {
    /// Unbounded width: every position is valid.
    fn flip_bit(&self, position: usize) -> Option<Self> {
        Some(self ^ (BigUint::from(1u8) << position))
    }
}

/// Run `transform` on every variant and compare each output with the
/// baseline output (variant 0).
///
/// Needs at least two variants. The first transform error aborts the test.
pub fn test_avalanche<I, O, E, F>(
    property: &str,
    variants: &[I],
    transform: F,
    policy: PassPolicy,
) -> Result<TestResult, PropsError>
where
    I: TrialInput,
    O: Divergence,
    F: Fn(&I) -> Result<O, E>,
    PropsError: From<E>,
{
    let (baseline, rest) = match variants {
        [baseline, rest @ ..] if !rest.is_empty() => (baseline, rest),
        _ => {
            return Err(PropsError::invalid(format!(
                "{property}: need at least 2 variants, got {}",
                variants.len()
            )));
        }
    };

    let baseline_out = transform(baseline)?;
    let baseline_input = baseline.describe();
    let mut tests = Vec::with_capacity(rest.len());
    for (i, variant) in rest.iter().enumerate() {
        let diff = baseline_out.divergence(&transform(variant)?);
        log::debug!(
            "{property}: variant {} differs in {}/{} bits ({:.2}%)",
            i + 1,
            diff.difference_bits,
            diff.total_bits,
            diff.difference_percent
        );
        tests.push(TrialRecord::Avalanche {
            baseline_input: baseline_input.clone(),
            variant_input: variant.describe(),
            bit_position: None,
            difference_bits: diff.difference_bits,
            total_bits: diff.total_bits,
            difference_percent: diff.difference_percent,
        });
    }
    TestResult::from_trials(property, tests, policy)
}

/// For every `position` and every input, flip that bit and compare the
/// transform's outputs on the original and flipped input.
///
/// Positions outside an input's width are skipped. Fails when no trial
/// remains.
pub fn test_bit_flip_avalanche<I, O, E, F>(
    property: &str,
    inputs: &[I],
    positions: &[usize],
    transform: F,
    policy: PassPolicy,
) -> Result<TestResult, PropsError>
where
    I: TrialInput + BitFlip,
    O: Divergence,
    F: Fn(&I) -> Result<O, E>,
    PropsError: From<E>,
{
    test_perturbation_avalanche(property, inputs, positions, I::flip_bit, transform, policy)
}

/// [`test_bit_flip_avalanche`] with a caller-defined perturbation.
///
/// `perturb(input, position)` returns the modified input, or `None` to skip
/// that combination.
pub fn test_perturbation_avalanche<I, O, E, P, F>(
    property: &str,
    inputs: &[I],
    positions: &[usize],
    perturb: P,
    transform: F,
    policy: PassPolicy,
) -> Result<TestResult, PropsError>
where
    I: TrialInput,
    O: Divergence,
    P: Fn(&I, usize) -> Option<I>,
    F: Fn(&I) -> Result<O, E>,
    PropsError: From<E>,
{
    if inputs.is_empty() || positions.is_empty() {
        return Err(PropsError::invalid(format!(
            "{property}: need at least one input and one position"
        )));
    }

    let baselines = inputs
        .iter()
        .map(&transform)
        .collect::<Result<Vec<O>, E>>()?;

    let mut tests = Vec::new();
    for &position in positions {
        for (input, baseline_out) in inputs.iter().zip(&baselines) {
            let Some(modified) = perturb(input, position) else {
                continue;
            };
            let diff = baseline_out.divergence(&transform(&modified)?);
            log::debug!(
                "{property}: position {position} changes {}/{} output bits",
                diff.difference_bits,
                diff.total_bits
            );
            tests.push(TrialRecord::Avalanche {
                baseline_input: input.describe(),
                variant_input: modified.describe(),
                bit_position: Some(position),
                difference_bits: diff.difference_bits,
                total_bits: diff.total_bits,
                difference_percent: diff.difference_percent,
            });
        }
    }
    TestResult::from_trials(property, tests, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaoscrypt_core::PrimitiveError;
    use std::convert::Infallible;

    const BAND: PassPolicy = PassPolicy::Band {
        low: 40.0,
        high: 60.0,
    };

    fn identity(x: &Vec<u8>) -> Result<Vec<u8>, Infallible> {
        Ok(x.clone())
    }

    #[test]
    fn identity_transform_tracks_input_difference() {
        let variants = vec![vec![0x00, 0x00], vec![0xFF, 0x00], vec![0xFF, 0xFF]];
        let r = test_avalanche("identity", &variants, identity, BAND).unwrap();
        assert_eq!(r.tests.len(), 2);
        assert_eq!(r.tests[0].difference_percent(), 50.0);
        assert_eq!(r.tests[1].difference_percent(), 100.0);
        assert_eq!(r.summary.avg_difference, 75.0);
        assert!(!r.passed);
    }

    #[test]
    fn constant_transform_fails() {
        let variants = vec![vec![1u8], vec![2], vec![3]];
        let r = test_avalanche("constant", &variants, |_| Ok::<_, Infallible>(vec![7u8; 4]), BAND)
            .unwrap();
        assert_eq!(r.summary.max_difference, 0.0);
        assert!(!r.passed);
    }

    #[test]
    fn single_variant_is_rejected() {
        let err = test_avalanche("x", &[vec![0u8]], identity, BAND).unwrap_err();
        assert!(matches!(err, PropsError::InvalidArgument(_)));
        let err = test_avalanche::<Vec<u8>, _, _, _>("x", &[], identity, BAND).unwrap_err();
        assert!(matches!(err, PropsError::InvalidArgument(_)));
    }

    #[test]
    fn transform_error_is_propagated() {
        let variants = vec![vec![0u8], vec![1u8]];
        let err = test_avalanche(
            "x",
            &variants,
            |_| Err::<Vec<u8>, _>(PrimitiveError::InvalidPadding),
            BAND,
        )
        .unwrap_err();
        assert_eq!(err, PropsError::Primitive(PrimitiveError::InvalidPadding));
    }

    #[test]
    fn inputs_are_described() {
        let variants = vec![vec![0xABu8, 0x01], vec![0x00, 0x01]];
        let r = test_avalanche("x", &variants, identity, BAND).unwrap();
        match &r.tests[0] {
            TrialRecord::Avalanche {
                baseline_input,
                variant_input,
                ..
            } => {
                assert_eq!(baseline_input, "ab01");
                assert_eq!(variant_input, "0001");
            }
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn byte_flip_is_msb_first() {
        assert_eq!(vec![0u8, 0].flip_bit(0), Some(vec![0x80, 0]));
        assert_eq!(vec![0u8, 0].flip_bit(15), Some(vec![0, 0x01]));
        assert_eq!(vec![0u8, 0].flip_bit(16), None);
    }

    #[test]
    fn word_flip_respects_width() {
        assert_eq!(5u64.flip_bit(1), Some(7));
        assert_eq!(0u64.flip_bit(63), Some(1 << 63));
        assert_eq!(0u64.flip_bit(64), None);
    }

    #[test]
    fn bit_flip_through_identity_is_one_bit() {
        let inputs = vec![vec![0u8; 4], vec![0xFFu8; 4]];
        let r = test_bit_flip_avalanche("flip", &inputs, &[0, 9, 31, 40], identity, BAND).unwrap();
        // Position 40 is out of range for 4-byte inputs.
        assert_eq!(r.tests.len(), 6);
        assert!(r.tests.iter().all(|t| t.difference_percent() == 100.0 / 32.0));
    }

    #[test]
    fn bit_flip_with_no_valid_position_is_rejected() {
        let inputs = vec![vec![0u8]];
        let err = test_bit_flip_avalanche("flip", &inputs, &[8, 9], identity, BAND).unwrap_err();
        assert!(matches!(err, PropsError::InvalidArgument(_)));
    }

    #[test]
    fn custom_perturbation() {
        let inputs = vec![10u64, 20];
        let r = test_perturbation_avalanche(
            "shift",
            &inputs,
            &[1, 2],
            |x, p| (p == 1).then_some(x + 1),
            |x| Ok::<_, Infallible>(*x),
            BAND,
        )
        .unwrap();
        assert_eq!(r.tests.len(), 2);
        assert!(r.tests.iter().all(|t| matches!(
            t,
            TrialRecord::Avalanche {
                bit_position: Some(1),
                ..
            }
        )));
    }

    #[test]
    fn big_integer_flip() {
        let x = BigUint::from(1031u32);
        let flipped = x.flip_bit(0).unwrap();
        assert_eq!(flipped, BigUint::from(1030u32));
        assert_eq!(x.describe(), "1031");
    }
}
