use crate::info::build_code;
use crate::stats::{DecodeStats, LatencyStats};
use anyhow::{Context, Result, bail};
use hgp_core::{BpConfig, BpDecoder, BpMethod, TannerGraph};
use hgp_io::loader;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug)]
pub struct RunSettings {
    pub p: f64,
    pub max_iterations: usize,
    pub method: BpMethod,
}

/// Decodes every recorded syndrome sequentially against HZ.
///
/// When the sampled errors are supplied, each correction is added to the
/// actual error and the residual is checked against the Z logicals.
pub fn run_decoding(
    h1: &str,
    h2: &str,
    syndrome_path: &str,
    error_path: Option<&str>,
    settings: RunSettings,
) -> Result<()> {
    let code = build_code(h1, h2)?;
    let hz = code.stabilizers().context("Stabilizers not compiled")?.hz();
    let logicals = code
        .calc_logical_operators()
        .context("Logical operator extraction failed")?;

    let graph = TannerGraph::from_matrix(hz);
    println!(
        "Tanner graph: {} checks, {} bits, {} edges",
        graph.num_checks(),
        graph.num_bits(),
        graph.num_edges()
    );

    println!("Loading shots from {}...", syndrome_path);
    let raw_bits = loader::load_b8_file(syndrome_path)
        .with_context(|| format!("Failed to read {}", syndrome_path))?;
    let shots = loader::slice_shots(&raw_bits, graph.num_checks());

    let errors = match error_path {
        Some(path) => {
            let raw = loader::load_b8_file(path)
                .with_context(|| format!("Failed to read {}", path))?;
            let errors = loader::slice_shots(&raw, code.n());
            if errors.len() != shots.len() {
                bail!(
                    "{} holds {} shots but {} holds {}",
                    path,
                    errors.len(),
                    syndrome_path,
                    shots.len()
                );
            }
            Some(errors)
        }
        None => None,
    };
    println!("Loaded {} shots.", shots.len());

    let config = BpConfig {
        method: settings.method,
        max_iterations: settings.max_iterations,
        ..BpConfig::default()
    };
    let decoder = BpDecoder::new(&graph, settings.p, config)?;
    info!(method = ?settings.method, max_iterations = settings.max_iterations, "decoding");

    let mut latency = LatencyStats::new();
    let mut stats = DecodeStats::default();
    let start = Instant::now();

    for (idx, syndrome) in shots.iter().enumerate() {
        let t0 = Instant::now();
        let outcome = decoder.decode(syndrome)?;
        latency.update(t0.elapsed());
        stats.record(outcome.converged, outcome.iterations);

        if let Some(errors) = &errors {
            let residual: Vec<u8> = errors[idx]
                .iter()
                .zip(&outcome.error)
                .map(|(a, b)| a ^ b)
                .collect();
            // A non-converged residual leaves a syndrome; count it as failed.
            if !outcome.converged || !logicals.flipped_logicals_x(&residual).is_empty() {
                stats.logical_failures += 1;
            }
        }
    }

    let seconds = start.elapsed().as_secs_f64();
    if stats.converged < stats.shots {
        warn!(
            failed = stats.shots - stats.converged,
            "some shots did not converge"
        );
    }

    println!("Results");
    println!("Time: {:.4} s", seconds);
    if seconds > 0.0 {
        println!("Throughput: {:.2} shots/s", stats.shots as f64 / seconds);
    }
    println!(
        "Converged: {}/{} ({:.4})",
        stats.converged,
        stats.shots,
        stats.rate(stats.converged)
    );
    println!(
        "Iterations: mean {:.3}, max {}",
        stats.mean_iterations(),
        stats.max_iterations_seen
    );
    if errors.is_some() {
        println!(
            "Logical failures: {}/{} ({:.4})",
            stats.logical_failures,
            stats.shots,
            stats.rate(stats.logical_failures)
        );
    }
    latency.print_report();

    Ok(())
}
