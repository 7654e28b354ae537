//! Property tests for Chebyshev polynomials over a prime field.
//!
//! Composition of polynomials is the operation under test. An element is a
//! polynomial `T_n` represented by its degree and its values at a fixed set
//! of sample points; composing `T_a` with `T_b` evaluates `T_a` at the
//! values of `T_b`. The semigroup property says the result equals `T_{ab}`,
//! which is what the closure check verifies point by point.

use std::convert::Infallible;
use std::fmt;

use chaoscrypt_core::ChebyshevPoly;
use num_bigint::BigUint;
use rand::Rng;
use serde::Serialize;

use crate::PropsError;
use crate::algebra::{AlgebraResult, SemigroupResult};
use crate::algebra::{test_associativity, test_commutativity, test_semigroup};
use crate::avalanche::test_bit_flip_avalanche;
use crate::config::ChebyshevConfig;
use crate::result::TestResult;

pub const PROPERTY_AVALANCHE: &str = "chebyshev_avalanche";

pub const DEFAULT_MODULUS: u64 = 1031;
pub const DEFAULT_SAMPLES: usize = 15;
pub const DEFAULT_MAX_DEGREE: u64 = 30;
pub const DEFAULT_AVALANCHE_DEGREE: u64 = 17;
pub const DEFAULT_BIT_POSITIONS: [usize; 5] = [0, 1, 2, 4, 8];

/// `T_degree` sampled at the suite's points.
#[derive(Clone)]
pub struct Composition {
    degree: BigUint,
    values: Vec<BigUint>,
}

impl Composition {
    pub fn degree(&self) -> &BigUint {
        &self.degree
    }
}

/// Two compositions are equal when they agree at every sample point.
impl PartialEq for Composition {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl fmt::Debug for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T_{}", self.degree)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChebyshevReport {
    pub modulus: u64,
    pub x_values: Vec<u64>,
    pub degrees: Vec<u64>,
    pub semigroup: SemigroupResult,
    pub commutativity: AlgebraResult,
    pub associativity: AlgebraResult,
    pub avalanche: TestResult,
    pub passed: bool,
}

/// Composition algebra for one modulus and one set of sample points.
pub struct ChebyshevSuite {
    cheby: ChebyshevPoly,
    x_values: Vec<u64>,
}

impl ChebyshevSuite {
    pub fn new(modulus: u64, x_values: Vec<u64>) -> Self {
        Self {
            cheby: ChebyshevPoly::from_u64(modulus),
            x_values,
        }
    }

    /// Draw `count` sample points uniformly from `[0, modulus)`.
    pub fn with_random_points<R: Rng + ?Sized>(modulus: u64, count: usize, rng: &mut R) -> Self {
        let upper = modulus.max(2);
        let x_values = (0..count).map(|_| rng.random_range(0..upper)).collect();
        Self::new(modulus, x_values)
    }

    pub fn x_values(&self) -> &[u64] {
        &self.x_values
    }

    /// `T_degree` evaluated directly at every sample point.
    pub fn element(&self, degree: u64) -> Composition {
        self.direct(BigUint::from(degree))
    }

    fn direct(&self, degree: BigUint) -> Composition {
        let values = self
            .x_values
            .iter()
            .map(|&x| self.cheby.eval(&degree, &BigUint::from(x)))
            .collect();
        Composition { degree, values }
    }

    /// `T_a(T_b(x))` at every sample point.
    pub fn compose(&self, a: &Composition, b: &Composition) -> Composition {
        Composition {
            degree: &a.degree * &b.degree,
            values: b.values.iter().map(|v| self.cheby.eval(&a.degree, v)).collect(),
        }
    }

    /// The composite agrees with `T_{deg}` evaluated directly.
    pub fn is_member(&self, c: &Composition) -> bool {
        self.direct(c.degree.clone()).values == c.values
    }

    pub fn test_semigroup(&self, degrees: &[u64]) -> SemigroupResult {
        let elements = self.elements(degrees);
        test_semigroup(|a, b| self.compose(a, b), &elements, |c| self.is_member(c))
    }

    pub fn test_commutativity(&self, degrees: &[u64]) -> AlgebraResult {
        test_commutativity(|a, b| self.compose(a, b), &self.elements(degrees))
    }

    pub fn test_associativity(&self, degrees: &[u64]) -> AlgebraResult {
        test_associativity(|a, b| self.compose(a, b), &self.elements(degrees))
    }

    /// Flip single bits of each sample point and compare `T_degree` outputs.
    pub fn test_avalanche(
        &self,
        degree: u64,
        bit_positions: &[usize],
        policy: crate::PassPolicy,
    ) -> Result<TestResult, PropsError> {
        test_bit_flip_avalanche(
            PROPERTY_AVALANCHE,
            &self.x_values,
            bit_positions,
            |&x| Ok::<_, Infallible>(self.cheby.eval_u64(degree, x)),
            policy,
        )
    }

    fn elements(&self, degrees: &[u64]) -> Vec<Composition> {
        degrees.iter().map(|&d| self.element(d)).collect()
    }
}

/// Run the semigroup, commutativity, associativity and avalanche checks.
pub fn run_chebyshev_tests<R: Rng + ?Sized>(
    config: &ChebyshevConfig,
    rng: &mut R,
) -> Result<ChebyshevReport, PropsError> {
    if config.modulus < 2 {
        return Err(PropsError::invalid("chebyshev modulus must be at least 2"));
    }
    if config.samples == 0 {
        return Err(PropsError::invalid("chebyshev samples must be positive"));
    }
    if config.max_degree < 2 {
        return Err(PropsError::invalid("chebyshev max_degree must be at least 2"));
    }

    let suite = ChebyshevSuite::with_random_points(config.modulus, config.samples, rng);
    let degrees: Vec<u64> = (2..=config.max_degree).collect();
    log::debug!(
        "chebyshev: modulus={} points={:?} degrees 2..={}",
        config.modulus,
        suite.x_values(),
        config.max_degree
    );

    let semigroup = suite.test_semigroup(&degrees);
    let commutativity = suite.test_commutativity(&degrees);
    let associativity = suite.test_associativity(&degrees);
    let avalanche =
        suite.test_avalanche(config.avalanche_degree, &config.bit_positions, config.policy)?;
    let passed =
        semigroup.passed && commutativity.passed && associativity.passed && avalanche.passed;

    Ok(ChebyshevReport {
        modulus: config.modulus,
        x_values: suite.x_values,
        degrees,
        semigroup,
        commutativity,
        associativity,
        avalanche,
        passed,
    })
}
