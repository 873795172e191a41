//! Code construction and parameter reporting for the `info` subcommand.

use anyhow::{Context, Result};
use hgp_core::HgpCode;
use hgp_io::{loader, parser};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Loads both classical codes and compiles their hypergraph product.
///
/// `h1` and `h2` are check-matrix files or `rep:<n>` / `cycle:<n>`.
pub fn build_code(h1: &str, h2: &str) -> Result<HgpCode> {
    let code1 = loader::load_code(h1).with_context(|| format!("Failed to load code {}", h1))?;
    let code2 = loader::load_code(h2).with_context(|| format!("Failed to load code {}", h2))?;

    let start = Instant::now();
    let mut code = HgpCode::new(Arc::new(code1), Arc::new(code2));
    code.compile_stabilizer()
        .context("Stabilizer compilation failed")?;
    info!(
        n = code.n(),
        k = code.k(),
        elapsed = ?start.elapsed(),
        "compiled hypergraph product"
    );
    Ok(code)
}

pub fn print_code_info(h1: &str, h2: &str, out_dir: Option<&str>) -> Result<()> {
    let code = build_code(h1, h2)?;
    let ops = code
        .calc_logical_operators()
        .context("Logical operator extraction failed")?;
    let pair = code.stabilizers().context("Stabilizers not compiled")?;

    for (label, c) in [("H1", code.code1()), ("H2", code.code2())] {
        println!(
            "{}: n={} r={} d={} rank={} k={}",
            label,
            c.n(),
            c.r(),
            c.d(),
            c.rank(),
            c.dimension()
        );
    }
    println!("N = {}", code.n());
    println!("K = {}", code.k());
    println!("D <= {} (declared bound)", code.d());
    println!(
        "HX: {}x{} rank {}, HZ: {}x{} rank {}",
        pair.hx().row_count(),
        pair.hx().column_count(),
        pair.hx().rank(),
        pair.hz().row_count(),
        pair.hz().column_count(),
        pair.hz().rank()
    );
    println!("Logical operator pairs: {}", ops.count());

    if let Some(dir) = out_dir {
        let dir = Path::new(dir);
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        parser::save_matrix(dir.join("hx.txt"), pair.hx())?;
        parser::save_matrix(dir.join("hz.txt"), pair.hz())?;
        parser::save_matrix(dir.join("lx.txt"), ops.lx())?;
        parser::save_matrix(dir.join("lz.txt"), ops.lz())?;
        println!("Matrices written to {}", dir.display());
    }

    Ok(())
}
