//! Property tests for the hyperchaotic attractor.

use std::convert::Infallible;

use chaoscrypt_core::HyperchaosSystem;
use chaoscrypt_core::chaos::State;
use rand::Rng;
use serde::Serialize;
use statrs::statistics::Statistics;

use crate::PropsError;
use crate::avalanche::test_perturbation_avalanche;
use crate::config::HyperchaosConfig;
use crate::result::TestResult;

pub const PROPERTY_BYTE_AVALANCHE: &str = "hyperchaos_byte_avalanche";

pub const DEFAULT_SAMPLES: usize = 5;
pub const DEFAULT_POSITIONS: [usize; 5] = [0, 1, 2, 3, 4];
pub const DEFAULT_NUM_BYTES: usize = 32;
pub const DEFAULT_SKIP: usize = 10;

/// Offset added to one state component by the byte avalanche test.
pub const STATE_NUDGE: f64 = 0.1;

pub const DEFAULT_PERTURBATION: f64 = 1e-10;
pub const DEFAULT_DIVERGENCE_THRESHOLD: f64 = 0.1;
pub const DEFAULT_TIME_LIMIT: f64 = 1.0;
pub const DEFAULT_TIME_POINTS: usize = 500;
pub const DEFAULT_MAX_DIVERGENCE_TIME: f64 = 0.5;

/// Samples kept in a [`SensitivityResult`].
const MAX_RECORDED_SAMPLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivitySample {
    pub original: State,
    pub modified: State,
    /// Distance between the two trajectories at the last time point.
    pub final_difference: f64,
    /// Time at which the distance first exceeded the threshold.
    pub divergence_time: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DivergenceSummary {
    pub avg_divergence_time: f64,
    pub min_divergence_time: f64,
    pub max_divergence_time: f64,
}

/// How fast a tiny change in the initial state grows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityResult {
    pub property: String,
    pub samples: Vec<SensitivitySample>,
    pub tested: usize,
    pub diverged: usize,
    /// Absent when no trajectory pair diverged within the time limit.
    pub summary: Option<DivergenceSummary>,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HyperchaosReport {
    pub params: (f64, f64, f64),
    pub byte_avalanche: TestResult,
    pub sensitivity: SensitivityResult,
    pub passed: bool,
}

/// Initial states with components uniform in `[-1, 1)`.
pub fn random_states<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<State> {
    (0..count)
        .map(|_| std::array::from_fn(|_| rng.random_range(-1.0..1.0)))
        .collect()
}

/// Nudge one state component at a time by [`STATE_NUDGE`] and compare the
/// derived byte streams.
pub fn test_byte_generation_avalanche(
    system: &HyperchaosSystem,
    states: &[State],
    config: &HyperchaosConfig,
) -> Result<TestResult, PropsError> {
    if config.num_bytes == 0 {
        return Err(PropsError::invalid("num_bytes must be positive"));
    }
    test_perturbation_avalanche(
        PROPERTY_BYTE_AVALANCHE,
        states,
        &config.positions,
        |state, index| {
            let mut nudged = *state;
            *nudged.get_mut(index)? += STATE_NUDGE;
            Some(nudged)
        },
        |state| Ok::<_, Infallible>(system.generate_bytes(state, config.num_bytes, config.skip)),
        config.policy,
    )
}

/// Add `config.perturbation` to `x` and time how long the two trajectories
/// take to move `config.divergence_threshold` apart.
pub fn test_sensitivity(
    system: &HyperchaosSystem,
    states: &[State],
    config: &HyperchaosConfig,
) -> Result<SensitivityResult, PropsError> {
    if states.is_empty() {
        return Err(PropsError::invalid("sensitivity needs at least one state"));
    }
    if config.time_points < 2 || config.time_limit <= 0.0 {
        return Err(PropsError::invalid(
            "sensitivity needs a positive time limit and at least 2 time points",
        ));
    }

    let span = (0.0, config.time_limit);
    let mut samples = Vec::new();
    let mut times = Vec::new();
    for state in states {
        let mut modified = *state;
        modified[0] += config.perturbation;

        let a = system.generate_sequence(state, span, config.time_points);
        let b = system.generate_sequence(&modified, span, config.time_points);
        let distances: Vec<f64> = a
            .points
            .iter()
            .zip(&b.points)
            .map(|(p, q)| euclidean(p, q))
            .collect();

        // The search starts after t0: the distance there is the perturbation.
        let divergence_time = distances
            .iter()
            .skip(1)
            .position(|&d| d > config.divergence_threshold)
            .map(|i| a.times[i + 1] - a.times[0]);
        if let Some(t) = divergence_time {
            times.push(t);
        }
        log::debug!("sensitivity: state {state:?} diverged at {divergence_time:?}");

        if samples.len() < MAX_RECORDED_SAMPLES {
            samples.push(SensitivitySample {
                original: *state,
                modified,
                final_difference: distances.last().copied().unwrap_or(0.0),
                divergence_time,
            });
        }
    }

    let summary = (!times.is_empty()).then(|| {
        let min = Statistics::min(times.iter());
        let max = Statistics::max(times.iter());
        DivergenceSummary {
            avg_divergence_time: Statistics::mean(times.iter()).clamp(min, max),
            min_divergence_time: min,
            max_divergence_time: max,
        }
    });
    let passed = summary.is_some_and(|s| s.avg_divergence_time < config.max_divergence_time);
    log::info!(
        "sensitivity: {}/{} pairs diverged -> {}",
        times.len(),
        states.len(),
        if passed { "pass" } else { "fail" }
    );

    Ok(SensitivityResult {
        property: "sensitivity".to_string(),
        samples,
        tested: states.len(),
        diverged: times.len(),
        summary,
        passed,
    })
}

/// Run the byte avalanche and sensitivity tests on `config.samples` random
/// initial states.
pub fn run_hyperchaos_tests<R: Rng + ?Sized>(
    config: &HyperchaosConfig,
    rng: &mut R,
) -> Result<HyperchaosReport, PropsError> {
    if config.samples == 0 {
        return Err(PropsError::invalid("hyperchaos samples must be positive"));
    }
    let system = config.system();
    let states = random_states(config.samples, rng);

    let byte_avalanche = test_byte_generation_avalanche(&system, &states, config)?;
    let sensitivity = test_sensitivity(&system, &states, config)?;
    let passed = byte_avalanche.passed && sensitivity.passed;
    Ok(HyperchaosReport {
        params: system.params(),
        byte_avalanche,
        sensitivity,
        passed,
    })
}

fn euclidean(a: &State, b: &State) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn random_states_are_in_range() {
        let mut rng = StdRng::seed_from_u64(4);
        let states = random_states(10, &mut rng);
        assert_eq!(states.len(), 10);
        assert!(states.iter().flatten().all(|v| (-1.0..1.0).contains(v)));
    }

    #[test]
    fn byte_avalanche_covers_positions() {
        let system = HyperchaosSystem::default();
        let states = random_states(3, &mut StdRng::seed_from_u64(1));
        let config = HyperchaosConfig::default();
        let r = test_byte_generation_avalanche(&system, &states, &config).unwrap();
        assert_eq!(r.tests.len(), 15);
        assert!(r.tests.iter().all(|t| {
            let p = t.difference_percent();
            (0.0..=100.0).contains(&p)
        }));
    }

    #[test]
    fn out_of_range_positions_are_skipped() {
        let system = HyperchaosSystem::default();
        let states = random_states(2, &mut StdRng::seed_from_u64(1));
        let config = HyperchaosConfig {
            positions: vec![0, 7],
            ..HyperchaosConfig::default()
        };
        let r = test_byte_generation_avalanche(&system, &states, &config).unwrap();
        assert_eq!(r.tests.len(), 2);
    }

    #[test]
    fn large_perturbation_diverges_immediately() {
        let system = HyperchaosSystem::default();
        let states = random_states(4, &mut StdRng::seed_from_u64(2));
        let config = HyperchaosConfig {
            perturbation: 1.0,
            ..HyperchaosConfig::default()
        };
        let r = test_sensitivity(&system, &states, &config).unwrap();
        assert_eq!(r.tested, 4);
        assert_eq!(r.samples.len(), MAX_RECORDED_SAMPLES);
        assert_eq!(r.diverged, 4);
        let s = r.summary.unwrap();
        assert!(s.min_divergence_time <= s.avg_divergence_time);
        assert!(s.avg_divergence_time <= s.max_divergence_time);
        assert!(r.passed);
    }

    #[test]
    fn zero_perturbation_never_diverges() {
        let system = HyperchaosSystem::default();
        let states = random_states(2, &mut StdRng::seed_from_u64(3));
        let config = HyperchaosConfig {
            perturbation: 0.0,
            ..HyperchaosConfig::default()
        };
        let r = test_sensitivity(&system, &states, &config).unwrap();
        assert_eq!(r.diverged, 0);
        assert!(r.summary.is_none());
        assert!(!r.passed);
    }

    #[test]
    fn seeded_run_is_reproducible() {
        let config = HyperchaosConfig::default();
        let a = run_hyperchaos_tests(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = run_hyperchaos_tests(&config, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.params, (1.0, 4.0, 1.2));
    }

    #[test]
    fn degenerate_config_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = HyperchaosConfig {
            samples: 0,
            ..HyperchaosConfig::default()
        };
        assert!(run_hyperchaos_tests(&config, &mut rng).is_err());
        let config = HyperchaosConfig {
            time_points: 1,
            ..HyperchaosConfig::default()
        };
        assert!(run_hyperchaos_tests(&config, &mut rng).is_err());
    }
}
