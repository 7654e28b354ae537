use std::fmt::Write as _;

use chaoscrypt_core::HyperchaosPrimitives;
use chaoscrypt_props::algebra::AlgebraResult;
use chaoscrypt_props::{
    ChebyshevReport, HyperchaosReport, SuiteConfig, SuiteReport, TestResult, run_all_tests_with,
    run_chebyshev_tests, run_hyperchaos_tests,
};
use serde::Serialize;

use super::OutputOptions;

/// Every suite from one run.
#[derive(Serialize)]
pub struct FullReport {
    pub seed: Option<u64>,
    pub crypto: SuiteReport,
    pub chebyshev: ChebyshevReport,
    pub hyperchaos: HyperchaosReport,
    pub all_passed: bool,
}

pub fn run(suite: SuiteConfig, opts: &OutputOptions) {
    let mut rng = suite.rng();
    let factory = HyperchaosPrimitives::default();

    let crypto =
        run_all_tests_with(&factory, &suite, &mut rng).unwrap_or_else(|e| super::fail(e));
    let chebyshev =
        run_chebyshev_tests(&suite.chebyshev, &mut rng).unwrap_or_else(|e| super::fail(e));
    let hyperchaos =
        run_hyperchaos_tests(&suite.hyperchaos, &mut rng).unwrap_or_else(|e| super::fail(e));
    let all_passed = crypto.all_passed && chebyshev.passed && hyperchaos.passed;
    let report = FullReport {
        seed: suite.seed,
        crypto,
        chebyshev,
        hyperchaos,
        all_passed,
    };

    if opts.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => super::fail(e),
        }
    } else {
        let mut rows: Vec<&TestResult> = report.crypto.results().to_vec();
        rows.push(&report.chebyshev.avalanche);
        rows.push(&report.hyperchaos.byte_avalanche);
        super::print_results_table(&rows);
        println!();
        super::chebyshev::print_law(&report.chebyshev.semigroup.closure);
        super::chebyshev::print_law(&report.chebyshev.commutativity);
        super::chebyshev::print_law(&report.chebyshev.associativity);
        super::hyperchaos::print_sensitivity(&report.hyperchaos.sensitivity);
        println!("\nOverall: {}", super::verdict(report.all_passed));
    }

    if let Some(path) = &opts.output_path {
        super::write_file(path, &generate_report(&report));
    }
    super::exit_on_verdict(report.all_passed, opts);
}

fn generate_report(report: &FullReport) -> String {
    let mut out = String::new();
    out.push_str("# chaoscrypt: Avalanche and Sensitivity Report\n\n");
    let _ = writeln!(out, "Generated: {}", unix_now());
    match report.seed {
        Some(seed) => {
            let _ = writeln!(out, "Seed: {seed}\n");
        }
        None => out.push_str("Seed: OS entropy\n\n"),
    }
    let _ = writeln!(out, "**Overall: {}**\n", super::verdict(report.all_passed));

    out.push_str("## Crypto primitives\n\n");
    summary_table(&mut out, &report.crypto.results());
    for r in report.crypto.results() {
        trial_table(&mut out, r);
    }

    let cheb = &report.chebyshev;
    let _ = writeln!(
        out,
        "## Chebyshev composition (mod {}, {} points)\n",
        cheb.modulus,
        cheb.x_values.len()
    );
    out.push_str("| Law | Held | Total | Rate | Result |\n");
    out.push_str("|-----|------|-------|------|--------|\n");
    for law in [
        &cheb.semigroup.closure,
        &cheb.semigroup.associativity,
        &cheb.commutativity,
        &cheb.associativity,
    ] {
        law_row(&mut out, law);
    }
    out.push('\n');
    summary_table(&mut out, &[&cheb.avalanche]);

    let hc = &report.hyperchaos;
    let (k1, k2, k3) = hc.params;
    let _ = writeln!(out, "## Hyperchaotic system (k1={k1}, k2={k2}, k3={k3})\n");
    summary_table(&mut out, &[&hc.byte_avalanche]);
    let s = &hc.sensitivity;
    let _ = writeln!(
        out,
        "- {}: {}/{} pairs diverged, {}",
        s.property,
        s.diverged,
        s.tested,
        super::verdict(s.passed)
    );
    if let Some(d) = s.summary {
        let _ = writeln!(
            out,
            "- Divergence time: avg {:.4}, min {:.4}, max {:.4}",
            d.avg_divergence_time, d.min_divergence_time, d.max_divergence_time
        );
    }
    out
}

fn summary_table(out: &mut String, results: &[&TestResult]) {
    out.push_str("| Property | Trials | Avg % | Min % | Max % | Std | Result |\n");
    out.push_str("|----------|--------|-------|-------|-------|-----|--------|\n");
    for r in results {
        let s = &r.summary;
        let _ = writeln!(
            out,
            "| {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {} |",
            r.property,
            r.tests.len(),
            s.avg_difference,
            s.min_difference,
            s.max_difference,
            s.std_deviation,
            super::verdict(r.passed)
        );
    }
    out.push('\n');
}

fn trial_table(out: &mut String, r: &TestResult) {
    let _ = writeln!(out, "### {}\n", r.property);
    out.push_str("| # | Difference | % |\n");
    out.push_str("|---|------------|---|\n");
    for (i, t) in r.tests.iter().enumerate() {
        let _ = writeln!(
            out,
            "| {} | {} | {:.2} |",
            i + 1,
            t.difference_fraction(),
            t.difference_percent()
        );
    }
    out.push('\n');
}

fn law_row(out: &mut String, law: &AlgebraResult) {
    let _ = writeln!(
        out,
        "| {} | {} | {} | {:.1}% | {} |",
        law.property,
        law.total_tests - law.failed_tests,
        law.total_tests,
        law.pass_rate * 100.0,
        super::verdict(law.passed)
    );
}

fn unix_now() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("Unix timestamp: {}", dur.as_secs())
}
