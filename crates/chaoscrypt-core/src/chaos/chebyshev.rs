//! Chebyshev polynomials over `Z/pZ`.
//!
//! `T_0(x) = 1`, `T_1(x) = x`, `T_n(x) = 2x T_{n-1}(x) - T_{n-2}(x)`.
//! The semigroup property `T_n(T_m(x)) = T_{nm}(x)` is what makes them usable
//! as a Diffie-Hellman style trapdoor.

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

/// Degrees up to this value use the linear recurrence; larger degrees use
/// matrix exponentiation.
const RECURRENCE_LIMIT: u64 = 100;

type Matrix = [[BigUint; 2]; 2];

/// Evaluator for `T_n(x) mod modulus`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChebyshevPoly {
    modulus: BigUint,
}

impl ChebyshevPoly {
    /// Moduli below 2 are raised to 2.
    pub fn new(modulus: BigUint) -> Self {
        let two = BigUint::from(2u32);
        Self {
            modulus: if modulus < two { two } else { modulus },
        }
    }

    pub fn from_u64(modulus: u64) -> Self {
        Self::new(BigUint::from(modulus))
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Compute `T_degree(x) mod modulus`.
    pub fn eval(&self, degree: &BigUint, x: &BigUint) -> BigUint {
        let x = x % &self.modulus;
        if degree.is_zero() {
            return BigUint::one() % &self.modulus;
        }
        if degree.is_one() {
            return x;
        }
        match degree.to_u64() {
            Some(d) if d <= RECURRENCE_LIMIT => self.recurrence(d, &x),
            _ => self.matrix_eval(degree, &x),
        }
    }

    /// Convenience wrapper for small moduli and degrees.
    pub fn eval_u64(&self, degree: u64, x: u64) -> u64 {
        self.eval(&BigUint::from(degree), &BigUint::from(x))
            .to_u64()
            .unwrap_or_default()
    }

    fn recurrence(&self, degree: u64, x: &BigUint) -> BigUint {
        let m = &self.modulus;
        let two_x = (x << 1u32) % m;
        let mut t0 = BigUint::one() % m;
        let mut t1 = x.clone();
        for _ in 2..=degree {
            let next = (&two_x * &t1 + m - &t0) % m;
            t0 = std::mem::replace(&mut t1, next);
        }
        t1
    }

    // [T_n, T_{n-1}] = M^(n-1) [x, 1] with M = [[2x, -1], [1, 0]].
    fn matrix_eval(&self, degree: &BigUint, x: &BigUint) -> BigUint {
        let m = &self.modulus;
        let step: Matrix = [
            [(x << 1u32) % m, m - BigUint::one()],
            [BigUint::one(), BigUint::zero()],
        ];
        let power = self.matrix_pow(step, &(degree - BigUint::one()));
        (x * &power[0][0] + &power[0][1]) % m
    }

    fn matrix_pow(&self, mut base: Matrix, exponent: &BigUint) -> Matrix {
        let mut result: Matrix = [
            [BigUint::one(), BigUint::zero()],
            [BigUint::zero(), BigUint::one()],
        ];
        for bit in 0..exponent.bits() {
            if exponent.bit(bit) {
                result = self.matrix_mul(&result, &base);
            }
            base = self.matrix_mul(&base, &base);
        }
        result
    }

    fn matrix_mul(&self, a: &Matrix, b: &Matrix) -> Matrix {
        let m = &self.modulus;
        let cell = |i: usize, j: usize| (&a[i][0] * &b[0][j] + &a[i][1] * &b[1][j]) % m;
        [[cell(0, 0), cell(0, 1)], [cell(1, 0), cell(1, 1)]]
    }
}
