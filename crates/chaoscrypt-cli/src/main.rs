//! CLI for chaoscrypt: avalanche and key-sensitivity tests for chaos-based primitives.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chaoscrypt")]
#[command(about = "chaoscrypt: avalanche and key-sensitivity tests for chaos-based primitives")]
#[command(version = chaoscrypt_core::VERSION)]
struct Cli {
    /// Suite configuration JSON. Every field is optional.
    #[arg(long, global = true)]
    config: Option<String>,

    /// Seed the random generator for a reproducible run
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print results as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    /// Exit with status 2 when any test fails
    #[arg(long, global = true)]
    fail_on_verdict: bool,

    /// Log verbosity: -v info, -vv debug (per trial), -vvv trace. RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Avalanche tests of the S-box generator, block cipher and key exchange
    Crypto {
        /// Which test to run
        #[arg(long, default_value = "all", value_parser = ["all", "sbox", "cipher", "dh"])]
        test: String,

        /// S-box size for the S-box test
        #[arg(long)]
        box_size: Option<usize>,

        /// Base secret for the S-box test (random when absent)
        #[arg(long)]
        shared_secret: Option<u64>,

        /// Generate the cipher's S-box from this secret
        #[arg(long)]
        sbox_secret: Option<u64>,

        /// Feistel rounds
        #[arg(long)]
        rounds: Option<usize>,

        /// Cipher block size in bytes (even)
        #[arg(long)]
        block_size: Option<usize>,

        /// Cipher plaintext model
        #[arg(long, value_parser = ["independent_blocks", "single_bit_flip"])]
        model: Option<String>,

        /// Private key size for the key-exchange test
        #[arg(long)]
        private_bits: Option<u32>,

        /// Write results as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Semigroup, commutativity, associativity and avalanche of Chebyshev composition
    Chebyshev {
        /// Prime modulus
        #[arg(long)]
        modulus: Option<u64>,

        /// Number of sample points
        #[arg(long)]
        samples: Option<usize>,

        /// Largest polynomial degree tested
        #[arg(long)]
        max_degree: Option<u64>,

        /// Write results as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Byte avalanche and initial-condition sensitivity of the hyperchaotic attractor
    Hyperchaos {
        /// System parameters k1, k2, k3
        #[arg(long, num_args = 3, value_names = ["K1", "K2", "K3"])]
        params: Option<Vec<f64>>,

        /// Random initial states
        #[arg(long)]
        samples: Option<usize>,

        /// Bytes generated per state
        #[arg(long)]
        num_bytes: Option<usize>,

        /// Write results as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Run every suite and print a summary; optionally write a markdown report
    Report {
        /// Output path for the markdown report
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let suite = commands::load_config(cli.config.as_deref(), cli.seed);
    let opts = |output: Option<String>| commands::OutputOptions {
        json: cli.json,
        output_path: output,
        fail_on_verdict: cli.fail_on_verdict,
    };

    match cli.command {
        Commands::Crypto {
            test,
            box_size,
            shared_secret,
            sbox_secret,
            rounds,
            block_size,
            model,
            private_bits,
            output,
        } => commands::crypto::run(
            suite,
            commands::crypto::CryptoCommandConfig {
                test: &test,
                box_size,
                shared_secret,
                sbox_secret,
                rounds,
                block_size,
                model: model.as_deref(),
                private_bits,
            },
            &opts(output),
        ),
        Commands::Chebyshev {
            modulus,
            samples,
            max_degree,
            output,
        } => commands::chebyshev::run(suite, modulus, samples, max_degree, &opts(output)),
        Commands::Hyperchaos {
            params,
            samples,
            num_bytes,
            output,
        } => commands::hyperchaos::run(
            suite,
            params.as_deref(),
            samples,
            num_bytes,
            &opts(output),
        ),
        Commands::Report { output } => commands::report::run(suite, &opts(output)),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
