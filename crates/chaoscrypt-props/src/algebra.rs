//! Algebraic laws of a binary operation, checked exhaustively over samples.

use std::fmt::Debug;

use serde::Serialize;

/// Failures recorded per law; the rest are only counted.
pub const MAX_RECORDED_FAILURES: usize = 5;

/// Associativity is cubic in the sample count, so only this many samples
/// are used for it.
pub const ASSOCIATIVITY_SAMPLES: usize = 5;

/// Outcome of checking one law.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgebraResult {
    pub property: String,
    pub passed: bool,
    pub total_tests: usize,
    pub failed_tests: usize,
    /// Fraction of checks that held; 0 when nothing was checked.
    pub pass_rate: f64,
    /// Up to [`MAX_RECORDED_FAILURES`] counterexamples.
    pub failures: Vec<String>,
}

impl AlgebraResult {
    fn new(property: &str) -> Self {
        Self {
            property: property.to_string(),
            passed: true,
            total_tests: 0,
            failed_tests: 0,
            pass_rate: 0.0,
            failures: Vec::new(),
        }
    }

    fn check(&mut self, holds: bool, describe: impl FnOnce() -> String) {
        self.total_tests += 1;
        if !holds {
            self.failed_tests += 1;
            self.passed = false;
            if self.failures.len() < MAX_RECORDED_FAILURES {
                self.failures.push(describe());
            }
        }
    }

    fn finish(mut self) -> Self {
        if self.total_tests > 0 {
            self.pass_rate =
                (self.total_tests - self.failed_tests) as f64 / self.total_tests as f64;
        }
        log::info!(
            "{}: {}/{} held",
            self.property,
            self.total_tests - self.failed_tests,
            self.total_tests
        );
        self
    }
}

/// A semigroup needs closure and associativity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemigroupResult {
    pub property: String,
    pub passed: bool,
    pub closure: AlgebraResult,
    pub associativity: AlgebraResult,
}

/// `a * b == b * a` for every unordered pair of distinct sample positions.
pub fn test_commutativity<T, F>(op: F, samples: &[T]) -> AlgebraResult
where
    T: PartialEq + Debug,
    F: Fn(&T, &T) -> T,
{
    let mut result = AlgebraResult::new("commutativity");
    for (i, a) in samples.iter().enumerate() {
        for b in &samples[i + 1..] {
            let ab = op(a, b);
            let ba = op(b, a);
            let holds = ab == ba;
            result.check(holds, || format!("a={a:?} b={b:?}: a*b={ab:?} b*a={ba:?}"));
        }
    }
    result.finish()
}

/// `(a * b) * c == a * (b * c)` over the first [`ASSOCIATIVITY_SAMPLES`]
/// samples.
pub fn test_associativity<T, F>(op: F, samples: &[T]) -> AlgebraResult
where
    T: PartialEq + Debug,
    F: Fn(&T, &T) -> T,
{
    let samples = &samples[..samples.len().min(ASSOCIATIVITY_SAMPLES)];
    let mut result = AlgebraResult::new("associativity");
    for a in samples {
        for b in samples {
            for c in samples {
                let left = op(&op(a, b), c);
                let right = op(a, &op(b, c));
                let holds = left == right;
                result.check(holds, || {
                    format!("a={a:?} b={b:?} c={c:?}: (a*b)*c={left:?} a*(b*c)={right:?}")
                });
            }
        }
    }
    result.finish()
}

/// `member(a * b)` for every ordered pair of samples.
pub fn test_closure<T, F, M>(op: F, samples: &[T], member: M) -> AlgebraResult
where
    T: Debug,
    F: Fn(&T, &T) -> T,
    M: Fn(&T) -> bool,
{
    let mut result = AlgebraResult::new("closure");
    for a in samples {
        for b in samples {
            let ab = op(a, b);
            let holds = member(&ab);
            result.check(holds, || format!("a={a:?} b={b:?}: a*b={ab:?} not a member"));
        }
    }
    result.finish()
}

pub fn test_semigroup<T, F, M>(op: F, samples: &[T], member: M) -> SemigroupResult
where
    T: PartialEq + Debug,
    F: Fn(&T, &T) -> T,
    M: Fn(&T) -> bool,
{
    let closure = test_closure(&op, samples, member);
    let associativity = test_associativity(&op, samples);
    SemigroupResult {
        property: "semigroup".to_string(),
        passed: closure.passed && associativity.passed,
        closure,
        associativity,
    }
}
