//! Hypergraph product of two classical codes.
//!
//! Given `H1` (`r1 × n1`) and `H2` (`r2 × n2`) the product code acts on
//! `N = n1·n2 + r1·r2` qubits split into two blocks:
//!
//! - primary block, qubit `(i, j)` with `i < n1`, `j < n2`, at index `i·n2 + j`
//! - dual block, qubit `(k, l)` with `k < r1`, `l < r2`, at index
//!   `n1·n2 + k·r2 + l`
//!
//! and the stabilizer check matrices are
//!
//! ```text
//! HX = [ H1 ⊗ I_n2  |  I_r1 ⊗ H2ᵗ ]      (r1·n2 rows)
//! HZ = [ I_n1 ⊗ H2  |  H1ᵗ ⊗ I_r2 ]      (n1·r2 rows)
//! ```

use crate::classical::ClassicalCode;
use crate::gf2::BitMatrix;
use crate::logical::{LogicalOperators, solve_logical_operators};
use crate::{HgpError, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Location of a qubit within the two-block layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QubitBlock {
    /// Qubit `(i, j)` of the `n1 × n2` block.
    Primary { i: usize, j: usize },
    /// Qubit `(k, l)` of the `r1 × r2` block.
    Dual { k: usize, l: usize },
}

/// CSS stabilizer check-matrix pair of a compiled code.
///
/// Only ever constructed after `HX·HZᵗ = 0` has been verified, so holders
/// of a `StabilizerPair` may rely on the orthogonality invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StabilizerPair {
    hx: BitMatrix,
    hz: BitMatrix,
}

impl StabilizerPair {
    /// Wraps an X/Z check-matrix pair after checking it.
    ///
    /// # Returns
    ///
    /// The pair, [`HgpError::Validation`] if the matrices act on different
    /// numbers of qubits, or [`HgpError::Construction`] if some X check
    /// anticommutes with some Z check.
    pub fn new(hx: BitMatrix, hz: BitMatrix) -> Result<Self> {
        if hx.column_count() != hz.column_count() {
            return Err(HgpError::Validation(format!(
                "HX acts on {} qubits but HZ on {}",
                hx.column_count(),
                hz.column_count()
            )));
        }
        let pair = Self { hx, hz };
        pair.verify_orthogonality()?;
        Ok(pair)
    }

    pub fn hx(&self) -> &BitMatrix {
        &self.hx
    }

    pub fn hz(&self) -> &BitMatrix {
        &self.hz
    }

    pub fn num_qubits(&self) -> usize {
        self.hx.column_count()
    }

    /// Checks `HX·HZᵗ ≡ 0 (mod 2)`.
    pub fn verify_orthogonality(&self) -> Result<()> {
        match self.hx.mul_transpose(&self.hz).first_one() {
            None => Ok(()),
            Some((row, column)) => Err(HgpError::Construction { row, column }),
        }
    }
}

/// Builds the hypergraph-product stabilizer pair of two check matrices.
///
/// The orthogonality check runs unconditionally before anything is
/// returned.
pub fn hypergraph_product(h1: &BitMatrix, h2: &BitMatrix) -> Result<StabilizerPair> {
    let (r1, n1) = h1.shape();
    let (r2, n2) = h2.shape();

    let hx = BitMatrix::hstack(
        &h1.kron(&BitMatrix::identity(n2)),
        &BitMatrix::identity(r1).kron(&h2.transposed()),
    )?;
    let hz = BitMatrix::hstack(
        &BitMatrix::identity(n1).kron(h2),
        &h1.transposed().kron(&BitMatrix::identity(r2)),
    )?;

    debug!(
        hx_rows = hx.row_count(),
        hz_rows = hz.row_count(),
        qubits = hx.column_count(),
        "assembled hypergraph product"
    );

    StabilizerPair::new(hx, hz)
}

/// Hypergraph product code of two classical codes.
///
/// Parameters `N`, `K` and `D` are available immediately; the stabilizer
/// matrices are populated by [`HgpCode::compile_stabilizer`].
///
/// `K` uses the ranks of the input check matrices. With
/// `k_i = n_i − rank(H_i)` and `kᵗ_i = r_i − rank(H_i)`,
/// `K = k1·k2 + kᵗ1·kᵗ2`; the second term vanishes unless both check
/// matrices carry redundant rows, so for full-rank inputs `K = k1·k2`.
/// `D = min(d1, d2)` is taken from the declared classical distances and is
/// only a bound estimate.
#[derive(Clone, Debug)]
pub struct HgpCode {
    code1: Arc<ClassicalCode>,
    code2: Arc<ClassicalCode>,
    num_qubits: usize,
    num_logicals: usize,
    distance_bound: usize,
    stabilizers: Option<StabilizerPair>,
}

impl HgpCode {
    /// Creates the product code description from two classical codes.
    ///
    /// Emits a warning for each input whose declared check count differs
    /// from the rank of its check matrix, since the naive `n − r` dimension
    /// would be wrong for that input.
    pub fn new(code1: Arc<ClassicalCode>, code2: Arc<ClassicalCode>) -> Self {
        for (label, code) in [("code1", &code1), ("code2", &code2)] {
            if !code.is_full_rank() {
                warn!(
                    code = label,
                    declared_r = code.r(),
                    rank = code.rank(),
                    "declared check count differs from rank; using k = n - rank"
                );
            }
        }

        let num_qubits = code1.n() * code2.n() + code1.r() * code2.r();
        // k1·k2 plus the term from redundant checks, k1ᵗ·k2ᵗ; the second
        // term vanishes unless both inputs are rank deficient.
        let num_logicals = code1.dimension() * code2.dimension()
            + code1.transpose_dimension() * code2.transpose_dimension();
        let distance_bound = code1.d().min(code2.d());

        Self {
            code1,
            code2,
            num_qubits,
            num_logicals,
            distance_bound,
            stabilizers: None,
        }
    }

    pub fn code1(&self) -> &Arc<ClassicalCode> {
        &self.code1
    }

    pub fn code2(&self) -> &Arc<ClassicalCode> {
        &self.code2
    }

    /// Number of physical qubits, `N = n1·n2 + r1·r2`.
    pub fn n(&self) -> usize {
        self.num_qubits
    }

    /// Number of logical qubits, `K = k1·k2 + kᵗ1·kᵗ2`.
    pub fn k(&self) -> usize {
        self.num_logicals
    }

    /// Declared distance bound `min(d1, d2)`; not an exact distance.
    pub fn d(&self) -> usize {
        self.distance_bound
    }

    /// Compiled stabilizer pair, if [`HgpCode::compile_stabilizer`] has run.
    pub fn stabilizers(&self) -> Option<&StabilizerPair> {
        self.stabilizers.as_ref()
    }

    /// Builds and stores `(HX, HZ)`.
    ///
    /// Idempotent: the inputs are immutable, so repeated calls rebuild
    /// bit-identical matrices. The pair is stored only after it passes the
    /// orthogonality check; on failure any previously stored pair is left
    /// untouched.
    pub fn compile_stabilizer(&mut self) -> Result<&StabilizerPair> {
        let pair = hypergraph_product(self.code1.check_matrix(), self.code2.check_matrix())?;
        debug_assert_eq!(pair.num_qubits(), self.num_qubits);
        Ok(self.stabilizers.insert(pair))
    }

    /// Computes paired X and Z logical operators.
    ///
    /// Fails with [`HgpError::PrecomputeMissing`] before the stabilizer pair
    /// has been compiled.
    pub fn calc_logical_operators(&self) -> Result<LogicalOperators> {
        let pair = self.stabilizers.as_ref().ok_or(HgpError::PrecomputeMissing)?;
        solve_logical_operators(pair.hx(), pair.hz(), self.num_logicals)
    }

    /// Index of primary-block qubit `(i, j)`.
    pub fn primary_index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.code1.n() && j < self.code2.n());
        i * self.code2.n() + j
    }

    /// Index of dual-block qubit `(k, l)`.
    pub fn dual_index(&self, k: usize, l: usize) -> usize {
        debug_assert!(k < self.code1.r() && l < self.code2.r());
        self.code1.n() * self.code2.n() + k * self.code2.r() + l
    }

    /// Inverse of [`HgpCode::primary_index`] and [`HgpCode::dual_index`].
    ///
    /// Returns `None` for indices outside `0..N`.
    pub fn qubit_block(&self, qubit: usize) -> Option<QubitBlock> {
        let n2 = self.code2.n();
        let primary = self.code1.n() * n2;
        if qubit < primary {
            Some(QubitBlock::Primary {
                i: qubit / n2,
                j: qubit % n2,
            })
        } else if qubit < self.num_qubits {
            let offset = qubit - primary;
            let r2 = self.code2.r();
            Some(QubitBlock::Dual {
                k: offset / r2,
                l: offset % r2,
            })
        } else {
            None
        }
    }
}
