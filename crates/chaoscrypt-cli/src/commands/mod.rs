pub mod chebyshev;
pub mod crypto;
pub mod hyperchaos;
pub mod report;

use std::fmt::Display;
use std::path::Path;

use chaoscrypt_props::{SuiteConfig, TestResult};
use serde::Serialize;

/// How a command presents its results.
pub struct OutputOptions {
    /// JSON on stdout instead of the table.
    pub json: bool,
    pub output_path: Option<String>,
    /// Exit with status 2 on a failed verdict.
    pub fail_on_verdict: bool,
}

/// Print `Error: <message>` and exit with status 1.
pub fn fail(message: impl Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

/// Load the suite configuration, applying `--seed` on top of the file.
pub fn load_config(path: Option<&str>, seed: Option<u64>) -> SuiteConfig {
    let mut config = match path {
        Some(p) => chaoscrypt_props::load_from_path(Path::new(p))
            .unwrap_or_else(|e| fail(format!("failed to load config {p}: {e}"))),
        None => SuiteConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }
    config
}

/// Print `value` as JSON or through `render`, save the JSON when an output
/// path was given, then apply the verdict exit status.
pub fn finish<T: Serialize>(
    value: &T,
    passed: bool,
    opts: &OutputOptions,
    render: impl FnOnce(&T),
) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|e| fail(e));
    if opts.json {
        println!("{json}");
    } else {
        render(value);
    }

    if let Some(path) = &opts.output_path {
        write_file(path, &json);
    }
    exit_on_verdict(passed, opts);
}

pub fn write_file(path: &str, contents: &str) {
    if let Err(e) = std::fs::write(path, contents) {
        fail(format!("failed to write {path}: {e}"));
    }
    eprintln!("Results saved to: {path}");
}

pub fn exit_on_verdict(passed: bool, opts: &OutputOptions) {
    if opts.fail_on_verdict && !passed {
        std::process::exit(2);
    }
}

pub fn verdict(passed: bool) -> &'static str {
    if passed { "PASS" } else { "FAIL" }
}

/// One row per result: average, spread and verdict.
pub fn print_results_table(results: &[&TestResult]) {
    println!(
        "{:<28} {:>7} {:>8} {:>8} {:>8} {:>8}  {}",
        "Property", "Trials", "Avg %", "Min %", "Max %", "Std", "Result"
    );
    println!("{}", "-".repeat(80));
    for r in results {
        let s = &r.summary;
        println!(
            "{:<28} {:>7} {:>8.2} {:>8.2} {:>8.2} {:>8.2}  {}",
            r.property,
            r.tests.len(),
            s.avg_difference,
            s.min_difference,
            s.max_difference,
            s.std_deviation,
            verdict(r.passed)
        );
    }
}
