//! Test data generator for hypergraph-product decoding runs.
//!
//! Samples independent X errors on every qubit of a compiled code, measures
//! their HZ syndromes and writes both as packed .b8 files, one byte-aligned
//! record per shot.

use crate::info::build_code;
use anyhow::{Context, Result};
use hgp_io::loader;
use rand::prelude::*;

/// Generates error/syndrome pairs for an i.i.d. X-error channel.
///
/// # Arguments
///
/// * `h1`, `h2` - Classical code arguments (files or `rep:<n>` / `cycle:<n>`)
/// * `p` - Per-qubit X error probability
/// * `num_shots` - Number of shots to sample
/// * `seed` - RNG seed; equal seeds reproduce equal files
/// * `syndrome_path` - Output .b8 of HZ syndromes (rows(HZ) bits per shot)
/// * `error_path` - Output .b8 of sampled errors (N bits per shot)
pub fn generate_x_error_data(
    h1: &str,
    h2: &str,
    p: f64,
    num_shots: usize,
    seed: u64,
    syndrome_path: &str,
    error_path: &str,
) -> Result<()> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&p),
        "error probability {} is outside [0, 1]",
        p
    );
    let code = build_code(h1, h2)?;
    let hz = code.stabilizers().context("Stabilizers not compiled")?.hz();

    println!(
        "Generating {} shots on N={} qubits (p={}, seed={})...",
        num_shots,
        code.n(),
        p,
        seed
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let mut errors = Vec::with_capacity(num_shots);
    let mut syndromes = Vec::with_capacity(num_shots);
    let mut total_weight = 0usize;

    for _ in 0..num_shots {
        let error: Vec<u8> = (0..code.n()).map(|_| rng.gen_bool(p) as u8).collect();
        total_weight += error.iter().filter(|&&b| b == 1).count();
        syndromes.push(hz.mul_vec(&error));
        errors.push(error);
    }

    loader::save_b8_file(syndrome_path, &syndromes, hz.row_count())
        .with_context(|| format!("Failed to write {}", syndrome_path))?;
    loader::save_b8_file(error_path, &errors, code.n())
        .with_context(|| format!("Failed to write {}", error_path))?;

    let mean_weight = if num_shots == 0 {
        0.0
    } else {
        total_weight as f64 / num_shots as f64
    };
    println!("Mean error weight: {:.3}", mean_weight);
    println!("Done.");
    Ok(())
}
