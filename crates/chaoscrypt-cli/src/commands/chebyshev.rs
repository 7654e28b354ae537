use chaoscrypt_props::algebra::AlgebraResult;
use chaoscrypt_props::{ChebyshevReport, SuiteConfig, run_chebyshev_tests};

use super::OutputOptions;

pub fn run(
    mut suite: SuiteConfig,
    modulus: Option<u64>,
    samples: Option<usize>,
    max_degree: Option<u64>,
    opts: &OutputOptions,
) {
    if let Some(v) = modulus {
        suite.chebyshev.modulus = v;
    }
    if let Some(v) = samples {
        suite.chebyshev.samples = v;
    }
    if let Some(v) = max_degree {
        suite.chebyshev.max_degree = v;
    }

    let report = run_chebyshev_tests(&suite.chebyshev, &mut suite.rng())
        .unwrap_or_else(|e| super::fail(e));
    super::finish(&report, report.passed, opts, print_report);
}

pub fn print_report(report: &ChebyshevReport) {
    println!(
        "Chebyshev composition mod {} at {} points, degrees {}..={}\n",
        report.modulus,
        report.x_values.len(),
        report.degrees.first().copied().unwrap_or_default(),
        report.degrees.last().copied().unwrap_or_default()
    );
    print_law(&report.semigroup.closure);
    print_law(&report.semigroup.associativity);
    print_law(&report.commutativity);
    print_law(&report.associativity);
    println!();
    super::print_results_table(&[&report.avalanche]);
    println!("\nOverall: {}", super::verdict(report.passed));
}

pub fn print_law(r: &AlgebraResult) {
    println!(
        "  {:<26} {:>5}/{:<5} {:>6.1}%  {}",
        r.property,
        r.total_tests - r.failed_tests,
        r.total_tests,
        r.pass_rate * 100.0,
        super::verdict(r.passed)
    );
    for failure in &r.failures {
        println!("      {failure}");
    }
}
