//! Logical operators of a CSS code.
//!
//! X logicals are representatives of `ker(HZ) / rowspace(HX)` and Z
//! logicals of `ker(HX) / rowspace(HZ)`. After extracting both quotient
//! bases the solver runs a symplectic Gram–Schmidt pass so that the i-th X
//! logical anticommutes with the i-th Z logical and commutes with all
//! others.

use crate::bit_utils::BitPack;
use crate::gf2::{BitMatrix, RowReducer};
use crate::{HgpError, Result};
use tracing::debug;

/// Paired generating sets of X and Z logical operators.
///
/// Both matrices are `K × N`. Every row of `lx` commutes with every row of
/// `HZ`, every row of `lz` commutes with every row of `HX`, and
/// `lx · lzᵗ = I_K`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogicalOperators {
    lx: BitMatrix,
    lz: BitMatrix,
}

impl LogicalOperators {
    pub fn lx(&self) -> &BitMatrix {
        &self.lx
    }

    pub fn lz(&self) -> &BitMatrix {
        &self.lz
    }

    /// Number of logical qubits `K`.
    pub fn count(&self) -> usize {
        self.lx.row_count()
    }

    /// Logical qubits whose Z logical anticommutes with a residual X error.
    ///
    /// A residual X error (actual error plus correction) that leaves the
    /// syndrome trivial is a logical failure exactly when this is non-empty.
    pub fn flipped_logicals_x(&self, residual: &[u8]) -> Vec<usize> {
        flipped(&self.lz, residual)
    }

    /// Logical qubits whose X logical anticommutes with a residual Z error.
    pub fn flipped_logicals_z(&self, residual: &[u8]) -> Vec<usize> {
        flipped(&self.lx, residual)
    }
}

fn flipped(ops: &BitMatrix, residual: &[u8]) -> Vec<usize> {
    ops.mul_vec(residual)
        .into_iter()
        .enumerate()
        .filter_map(|(i, b)| (b == 1).then_some(i))
        .collect()
}

/// Representatives of `ker(commuting) / rowspace(stabilizers)`.
fn quotient_basis(stabilizers: &BitMatrix, commuting: &BitMatrix) -> Vec<Vec<u64>> {
    let mut reducer = RowReducer::from_matrix(stabilizers);
    let kernel = commuting.kernel();
    let mut basis = Vec::new();
    for v in kernel.rows() {
        let residue = reducer.reduce(v.to_vec());
        if BitPack::is_zero(&residue) {
            continue;
        }
        reducer.insert(residue.clone());
        basis.push(residue);
    }
    basis
}

/// Extracts and pairs logical operators for the stabilizer pair `(hx, hz)`.
///
/// # Arguments
///
/// * `hx` - X-type check matrix
/// * `hz` - Z-type check matrix on the same qubits
/// * `expected` - Number of logical qubits the construction promises
///
/// # Returns
///
/// The paired operator sets, or [`HgpError::DegenerateBasis`] if fewer (or
/// more) than `expected` independent symplectic pairs exist.
pub fn solve_logical_operators(
    hx: &BitMatrix,
    hz: &BitMatrix,
    expected: usize,
) -> Result<LogicalOperators> {
    let n = hx.column_count();
    let mut xs = quotient_basis(hx, hz);
    let mut zs = quotient_basis(hz, hx);
    debug!(x_candidates = xs.len(), z_candidates = zs.len(), expected, "logical quotient bases");

    let mut lx = BitMatrix::zeros(0, n);
    let mut lz = BitMatrix::zeros(0, n);

    while !xs.is_empty() {
        let x = xs.remove(0);
        let Some(partner) = zs.iter().position(|z| BitPack::dot(&x, z)) else {
            // Nothing left anticommutes with this X candidate.
            break;
        };
        let z = zs.remove(partner);

        for other in xs.iter_mut() {
            if BitPack::dot(other, &z) {
                BitPack::xor_into(other, &x);
            }
        }
        for other in zs.iter_mut() {
            if BitPack::dot(&x, other) {
                BitPack::xor_into(other, &z);
            }
        }

        lx.push_row(&x);
        lz.push_row(&z);
    }

    let found = lx.row_count();
    if found != expected || !xs.is_empty() || !zs.is_empty() {
        return Err(HgpError::DegenerateBasis { expected, found });
    }
    Ok(LogicalOperators { lx, lz })
}
