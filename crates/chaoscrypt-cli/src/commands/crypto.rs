use chaoscrypt_core::HyperchaosPrimitives;
use chaoscrypt_props::{
    PlaintextModel, SuiteConfig, TestResult, configured_sbox, run_all_tests_with,
    test_block_cipher_avalanche, test_dh_key_sensitivity, test_sbox_avalanche,
};

use super::OutputOptions;

pub struct CryptoCommandConfig<'a> {
    pub test: &'a str,
    pub box_size: Option<usize>,
    pub shared_secret: Option<u64>,
    pub sbox_secret: Option<u64>,
    pub rounds: Option<usize>,
    pub block_size: Option<usize>,
    pub model: Option<&'a str>,
    pub private_bits: Option<u32>,
}

pub fn run(mut suite: SuiteConfig, cfg: CryptoCommandConfig<'_>, opts: &OutputOptions) {
    apply_overrides(&mut suite, &cfg);
    let factory = HyperchaosPrimitives::default();
    let mut rng = suite.rng();

    if cfg.test == "all" {
        let report =
            run_all_tests_with(&factory, &suite, &mut rng).unwrap_or_else(|e| super::fail(e));
        super::finish(&report, report.all_passed, opts, |r| {
            println!("Crypto avalanche suite\n");
            super::print_results_table(&r.results());
            println!("\nOverall: {}", super::verdict(r.all_passed));
        });
        return;
    }

    let result = match cfg.test {
        "sbox" => test_sbox_avalanche(
            &factory,
            suite.sbox.box_size,
            suite.sbox.shared_secret,
            suite.sbox.policy,
            &mut rng,
        ),
        "cipher" => configured_sbox(&factory, suite.cipher.sbox_secret).and_then(|sbox| {
            test_block_cipher_avalanche(
                &factory,
                sbox.as_deref(),
                suite.cipher.rounds,
                suite.cipher.block_size,
                suite.cipher.model,
                suite.cipher.policy,
                &mut rng,
            )
        }),
        "dh" => test_dh_key_sensitivity(
            &factory,
            suite.key_exchange.private_bits,
            suite.key_exchange.policy,
            &mut rng,
        ),
        other => super::fail(format!("unknown test {other:?}")),
    }
    .unwrap_or_else(|e| super::fail(e));

    super::finish(&result, result.passed, opts, print_trials);
}

fn apply_overrides(suite: &mut SuiteConfig, cfg: &CryptoCommandConfig<'_>) {
    if let Some(v) = cfg.box_size {
        suite.sbox.box_size = v;
    }
    if cfg.shared_secret.is_some() {
        suite.sbox.shared_secret = cfg.shared_secret;
    }
    if cfg.sbox_secret.is_some() {
        suite.cipher.sbox_secret = cfg.sbox_secret;
    }
    if let Some(v) = cfg.rounds {
        suite.cipher.rounds = v;
    }
    if let Some(v) = cfg.block_size {
        suite.cipher.block_size = v;
    }
    if let Some(model) = cfg.model {
        suite.cipher.model = model
            .parse::<PlaintextModel>()
            .unwrap_or_else(|e| super::fail(e));
    }
    if let Some(v) = cfg.private_bits {
        suite.key_exchange.private_bits = v;
    }
}

fn print_trials(result: &TestResult) {
    println!("{}\n", result.property);
    for (i, trial) in result.tests.iter().enumerate() {
        println!(
            "  #{:<3} {:>7.2}%  {}",
            i + 1,
            trial.difference_percent(),
            trial.difference_fraction()
        );
    }
    println!();
    super::print_results_table(&[result]);
}
