//! Random big integers and probabilistic primality.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::Rng;

use crate::PrimitiveError;

const SMALL_PRIMES: [u32; 24] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Miller-Rabin rounds; error probability below 4^-32.
const MILLER_RABIN_ROUNDS: usize = 32;

/// Uniform integer with at most `bits` bits.
pub fn random_bits<R: Rng + ?Sized>(bits: u64, rng: &mut R) -> BigUint {
    if bits == 0 {
        return BigUint::zero();
    }
    let n_bytes = bits.div_ceil(8) as usize;
    let mut bytes = vec![0u8; n_bytes];
    rng.fill(&mut bytes[..]);
    let excess = n_bytes as u64 * 8 - bits;
    bytes[0] &= 0xFF >> excess;
    BigUint::from_bytes_be(&bytes)
}

/// Uniform integer in `[low, high]` (inclusive). Returns `low` when the range
/// is empty.
pub fn random_in_range<R: Rng + ?Sized>(low: &BigUint, high: &BigUint, rng: &mut R) -> BigUint {
    if high <= low {
        return low.clone();
    }
    let span = high - low + BigUint::one();
    let bits = span.bits();
    loop {
        let candidate = random_bits(bits, rng);
        if candidate < span {
            return low + candidate;
        }
    }
}

/// Probabilistic primality test: trial division, then Miller-Rabin.
pub fn is_probable_prime<R: Rng + ?Sized>(n: &BigUint, rng: &mut R) -> bool {
    let two = BigUint::from(2u32);
    if *n < two {
        return false;
    }
    if *n == two {
        return true;
    }
    if !n.bit(0) {
        return false;
    }
    for &p in &SMALL_PRIMES {
        let p = BigUint::from(p);
        if *n == p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    let n_minus_one = n - BigUint::one();
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;
    let upper = n - &two;

    'witness: for _ in 0..MILLER_RABIN_ROUNDS {
        let a = random_in_range(&two, &upper, rng);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Random prime with exactly `bits` bits.
pub fn random_prime<R: Rng + ?Sized>(bits: u64, rng: &mut R) -> Result<BigUint, PrimitiveError> {
    if bits < 2 {
        return Err(PrimitiveError::invalid("primes need at least 2 bits"));
    }
    let attempts = 200 * bits as usize;
    let top = BigUint::one() << (bits - 1);
    for _ in 0..attempts {
        let mut candidate = random_bits(bits, rng) | &top;
        if bits > 2 {
            candidate.set_bit(0, true);
        }
        if is_probable_prime(&candidate, rng) {
            return Ok(candidate);
        }
    }
    Err(PrimitiveError::PrimeSearchExhausted { bits, attempts })
}
