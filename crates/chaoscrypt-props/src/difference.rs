//! Hamming distance and percentage difference between two outputs.
//!
//! Every percentage is `100 * differing / total` with `total` floored at 1,
//! so comparing empty or zero-valued outputs reports 0% rather than NaN.

use num_bigint::BigUint;
use serde::Serialize;

/// Bit-level difference between two values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BitDifference {
    /// Number of differing bit positions (Hamming distance).
    pub difference_bits: u64,
    /// Bit length the percentage is taken over.
    pub total_bits: u64,
    pub difference_percent: f64,
}

impl BitDifference {
    pub fn from_counts(difference_bits: u64, total_bits: u64) -> Self {
        let total_bits = total_bits.max(1);
        Self {
            difference_bits,
            total_bits,
            difference_percent: 100.0 * difference_bits as f64 / total_bits as f64,
        }
    }

    /// Compare two byte sequences; the shorter one is zero-padded.
    pub fn bytes(a: &[u8], b: &[u8]) -> Self {
        let len = a.len().max(b.len());
        let differing: u64 = (0..len)
            .map(|i| {
                let x = a.get(i).copied().unwrap_or(0);
                let y = b.get(i).copied().unwrap_or(0);
                u64::from((x ^ y).count_ones())
            })
            .sum();
        Self::from_counts(differing, len as u64 * 8)
    }

    /// Compare two non-negative integers over the larger operand's bit length.
    pub fn integers(a: &BigUint, b: &BigUint) -> Self {
        let differing = (a ^ b).count_ones();
        Self::from_counts(differing, a.bits().max(b.bits()))
    }

    /// [`integers`](Self::integers) for machine words.
    pub fn words(a: u64, b: u64) -> Self {
        let width = |v: u64| u64::from(u64::BITS - v.leading_zeros());
        Self::from_counts(u64::from((a ^ b).count_ones()), width(a).max(width(b)))
    }
}

/// Entry-level difference between two substitution tables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntryDifference {
    pub differing_entries: usize,
    pub total_entries: usize,
    pub difference_percent: f64,
}

/// Count table positions whose entries differ. Positions present in only
/// one table count as differing.
pub fn table_difference(a: &[u32], b: &[u32]) -> EntryDifference {
    let len = a.len().max(b.len());
    let differing = (0..len).filter(|&i| a.get(i) != b.get(i)).count();
    let total = len.max(1);
    EntryDifference {
        differing_entries: differing,
        total_entries: len,
        difference_percent: 100.0 * differing as f64 / total as f64,
    }
}
