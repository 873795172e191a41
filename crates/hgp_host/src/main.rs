mod generator;
mod info;
mod stats;
mod throughput;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use hgp_core::BpMethod;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hgp", about = "Hypergraph-product code construction and BP decoding")]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence when set).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Method {
    ProductSum,
    MinSum,
}

impl From<Method> for BpMethod {
    fn from(m: Method) -> Self {
        match m {
            Method::ProductSum => BpMethod::ProductSum,
            Method::MinSum => BpMethod::MinSum,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the product code and report its parameters.
    Info {
        #[arg(long)]
        h1: String,
        #[arg(long)]
        h2: String,
        /// Write hx.txt, hz.txt, lx.txt and lz.txt into this directory.
        #[arg(long)]
        out_dir: Option<String>,
    },
    /// Sample i.i.d. X errors and write their HZ syndromes.
    Gen {
        #[arg(long)]
        h1: String,
        #[arg(long)]
        h2: String,
        #[arg(long, default_value_t = 0.01)]
        p: f64,
        #[arg(long, default_value_t = 1000)]
        shots: usize,
        #[arg(long, default_value_t = 12345)]
        seed: u64,
        #[arg(long, default_value = "shots.b8")]
        syndromes: String,
        #[arg(long, default_value = "errors.b8")]
        errors: String,
    },
    /// Decode every shot of a syndrome file.
    Run {
        #[arg(long)]
        h1: String,
        #[arg(long)]
        h2: String,
        #[arg(short, long)]
        syndromes: String,
        /// Sampled errors, enabling the logical failure count.
        #[arg(short, long)]
        errors: Option<String>,
        #[arg(long, default_value_t = 0.01)]
        p: f64,
        #[arg(long, default_value_t = hgp_core::decoder::DEFAULT_MAX_ITERATIONS)]
        max_iter: usize,
        #[arg(long, value_enum, default_value_t = Method::ProductSum)]
        method: Method,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Info { h1, h2, out_dir } => {
            info::print_code_info(&h1, &h2, out_dir.as_deref())?;
        }
        Commands::Gen {
            h1,
            h2,
            p,
            shots,
            seed,
            syndromes,
            errors,
        } => {
            generator::generate_x_error_data(&h1, &h2, p, shots, seed, &syndromes, &errors)?;
        }
        Commands::Run {
            h1,
            h2,
            syndromes,
            errors,
            p,
            max_iter,
            method,
        } => {
            let settings = throughput::RunSettings {
                p,
                max_iterations: max_iter,
                method: method.into(),
            };
            throughput::run_decoding(&h1, &h2, &syndromes, errors.as_deref(), settings)?;
        }
    }
    Ok(())
}
