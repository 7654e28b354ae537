//! Result records shared by every property test.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::PropsError;

/// Percentage difference representing perfect diffusion.
pub const IDEAL_DIFFERENCE: f64 = 50.0;

/// How `avg_difference` is turned into a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PassPolicy {
    /// Pass when the average is strictly greater than `lower`.
    Above { lower: f64 },
    /// Pass when the average lies in `[low, high]`.
    Band { low: f64, high: f64 },
}

impl PassPolicy {
    pub fn evaluate(&self, avg_difference: f64) -> bool {
        match *self {
            Self::Above { lower } => avg_difference > lower,
            Self::Band { low, high } => (low..=high).contains(&avg_difference),
        }
    }
}

impl std::fmt::Display for PassPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Above { lower } => write!(f, "avg > {lower}%"),
            Self::Band { low, high } => write!(f, "{low}% <= avg <= {high}%"),
        }
    }
}

/// One comparison between a baseline run and a perturbed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrialRecord {
    /// Two S-boxes generated from related secrets.
    Sbox {
        base_secret: u64,
        modified_secret: u64,
        /// Table positions holding different values. Not a bit count.
        differing_entries: usize,
        box_size: usize,
        difference_percent: f64,
    },
    /// Outputs of one transform on a baseline and a variant input.
    Avalanche {
        baseline_input: String,
        variant_input: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        bit_position: Option<usize>,
        difference_bits: u64,
        total_bits: u64,
        difference_percent: f64,
    },
    /// Shared secrets of a baseline and a perturbed key exchange.
    KeyExchange {
        baseline_label: String,
        variation_label: String,
        baseline_shared: String,
        variation_shared: String,
        difference_bits: u64,
        total_bits: u64,
        difference_percent: f64,
    },
}

impl TrialRecord {
    pub fn difference_percent(&self) -> f64 {
        match self {
            Self::Sbox {
                difference_percent, ..
            }
            | Self::Avalanche {
                difference_percent, ..
            }
            | Self::KeyExchange {
                difference_percent, ..
            } => *difference_percent,
        }
    }

    /// `"differing/total"` in the trial's own unit (entries or bits).
    pub fn difference_fraction(&self) -> String {
        match self {
            Self::Sbox {
                differing_entries,
                box_size,
                ..
            } => format!("{differing_entries}/{box_size} entries"),
            Self::Avalanche {
                difference_bits,
                total_bits,
                ..
            }
            | Self::KeyExchange {
                difference_bits,
                total_bits,
                ..
            } => format!("{difference_bits}/{total_bits} bits"),
        }
    }
}

/// Aggregate statistics over the trials of one test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub avg_difference: f64,
    pub min_difference: f64,
    pub max_difference: f64,
    /// Population standard deviation of the trial percentages.
    pub std_deviation: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_bits: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mod_bits: Option<u64>,
}

impl SummaryStats {
    /// Summarize a set of percentages. `None` for an empty set.
    pub fn from_percentages(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let min = Statistics::min(values.iter());
        let max = Statistics::max(values.iter());
        let avg = Statistics::mean(values.iter()).clamp(min, max);
        Some(Self {
            avg_difference: avg,
            min_difference: min,
            max_difference: max,
            std_deviation: Statistics::population_std_dev(values.iter()),
            private_bits: None,
            mod_bits: None,
        })
    }

    /// Distance of the average from ideal diffusion, in percentage points.
    pub fn deviation_from_ideal(&self) -> f64 {
        (self.avg_difference - IDEAL_DIFFERENCE).abs()
    }
}

/// Outcome of one property test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    /// Property tag, e.g. `"sbox_avalanche"`.
    pub property: String,
    pub tests: Vec<TrialRecord>,
    pub summary: SummaryStats,
    pub passed: bool,
}

impl TestResult {
    /// Summarize `tests` and apply `policy`. Fails when there are no trials.
    pub fn from_trials(
        property: &str,
        tests: Vec<TrialRecord>,
        policy: PassPolicy,
    ) -> Result<Self, PropsError> {
        Self::from_trials_with(property, tests, policy, |summary| summary)
    }

    /// Like [`from_trials`](Self::from_trials), letting the caller attach
    /// context fields to the summary before the record is sealed.
    pub fn from_trials_with(
        property: &str,
        tests: Vec<TrialRecord>,
        policy: PassPolicy,
        annotate: impl FnOnce(SummaryStats) -> SummaryStats,
    ) -> Result<Self, PropsError> {
        let percentages: Vec<f64> = tests.iter().map(TrialRecord::difference_percent).collect();
        let summary = SummaryStats::from_percentages(&percentages)
            .map(annotate)
            .ok_or_else(|| PropsError::invalid(format!("{property}: no trials to summarize")))?;
        let passed = policy.evaluate(summary.avg_difference);
        log::info!(
            "{property}: avg={:.2}% min={:.2}% max={:.2}% over {} trials ({policy}) -> {}",
            summary.avg_difference,
            summary.min_difference,
            summary.max_difference,
            tests.len(),
            if passed { "pass" } else { "fail" }
        );
        Ok(Self {
            property: property.to_string(),
            tests,
            summary,
            passed,
        })
    }
}
