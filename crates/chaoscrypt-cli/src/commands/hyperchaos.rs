use chaoscrypt_props::hyperchaos::SensitivityResult;
use chaoscrypt_props::{HyperchaosReport, SuiteConfig, run_hyperchaos_tests};

use super::OutputOptions;

pub fn run(
    mut suite: SuiteConfig,
    params: Option<&[f64]>,
    samples: Option<usize>,
    num_bytes: Option<usize>,
    opts: &OutputOptions,
) {
    if let Some(&[k1, k2, k3]) = params {
        suite.hyperchaos.k1 = k1;
        suite.hyperchaos.k2 = k2;
        suite.hyperchaos.k3 = k3;
    }
    if let Some(v) = samples {
        suite.hyperchaos.samples = v;
    }
    if let Some(v) = num_bytes {
        suite.hyperchaos.num_bytes = v;
    }

    let report = run_hyperchaos_tests(&suite.hyperchaos, &mut suite.rng())
        .unwrap_or_else(|e| super::fail(e));
    super::finish(&report, report.passed, opts, print_report);
}

pub fn print_report(report: &HyperchaosReport) {
    let (k1, k2, k3) = report.params;
    println!("Hyperchaotic system k1={k1} k2={k2} k3={k3}\n");
    super::print_results_table(&[&report.byte_avalanche]);
    println!();
    print_sensitivity(&report.sensitivity);
    println!("\nOverall: {}", super::verdict(report.passed));
}

pub fn print_sensitivity(s: &SensitivityResult) {
    println!(
        "{}: {}/{} trajectory pairs diverged  {}",
        s.property,
        s.diverged,
        s.tested,
        super::verdict(s.passed)
    );
    match s.summary {
        Some(d) => println!(
            "  divergence time avg {:.4}  min {:.4}  max {:.4}",
            d.avg_divergence_time, d.min_divergence_time, d.max_divergence_time
        ),
        None => println!("  no pair diverged within the time limit"),
    }
}
