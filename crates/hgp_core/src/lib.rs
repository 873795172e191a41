//! Hypergraph-product quantum LDPC codes and belief-propagation decoding.
//!
//! This crate builds CSS stabilizer codes from pairs of classical binary
//! linear codes, derives a symplectic basis of logical operators for the
//! result, and decodes measured syndromes with flooding-schedule belief
//! propagation over the check graph. All matrix arithmetic is over GF(2).

/// Packed bit helpers operating on `u64` word slices.
///
/// Provides the low-level get/set/toggle and word-wise XOR and parity
/// primitives that the dense GF(2) matrix and the codeword enumerator are
/// built on.
pub mod bit_utils;

/// Classical binary linear codes.
///
/// Holds a validated parity-check matrix together with its declared length,
/// check count and distance, and enumerates codewords from a null-space
/// basis when small enough to do so.
pub mod classical;

/// Belief-propagation decoder over a Tanner graph.
///
/// Implements sum-product and min-sum message passing in the LLR domain
/// with a synchronous flooding schedule. Non-convergence is reported in the
/// returned outcome rather than as an error.
pub mod decoder;

/// Dense binary matrices over GF(2).
///
/// Supplies the linear-algebra capability the rest of the crate consumes:
/// mod-2 products, Kronecker products, horizontal stacking, rank, row
/// echelon reduction and null-space bases.
pub mod gf2;

/// Tanner graph of a check matrix.
///
/// Bipartite check/bit adjacency stored as a compressed edge list. Built
/// once per matrix and shared read-only across any number of decode calls.
pub mod graph;

/// Hypergraph product construction.
///
/// Lays qubits out in a primary block and a dual block and assembles the
/// X and Z stabilizer check matrices from two classical codes, verifying
/// CSS orthogonality before the result is exposed.
pub mod hgp;

/// Logical operator solver.
///
/// Extracts X and Z logical operators as quotient bases of the stabilizer
/// kernels and pairs them symplectically so that `LX·LZᵗ = I`.
pub mod logical;

pub use classical::ClassicalCode;
pub use decoder::{BpConfig, BpDecoder, BpMethod, DecodeOutcome, bp_decode};
pub use gf2::BitMatrix;
pub use graph::TannerGraph;
pub use hgp::{HgpCode, QubitBlock, StabilizerPair, hypergraph_product};
pub use logical::{LogicalOperators, solve_logical_operators};

/// Error types returned by code construction, operator solving and decoding.
///
/// Decoder non-convergence is deliberately absent: a decode that runs out
/// of iterations is a normal outcome and is reported through
/// [`DecodeOutcome::converged`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HgpError {
    /// Input data has the wrong shape or contains values outside {0, 1}.
    ///
    /// Raised immediately at construction boundaries (classical codes,
    /// matrices built from rows, decoder channel parameters) and never
    /// deferred to a later operation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The compiled stabilizer pair violates `HX·HZᵗ = 0 (mod 2)`.
    ///
    /// This signals a defect in the product construction rather than bad
    /// input. The coordinates identify the first non-zero entry of the
    /// product matrix.
    #[error("stabilizer orthogonality violated at HX row {row}, HZ row {column}")]
    Construction { row: usize, column: usize },

    /// The logical operator solver could not reach the expected number of
    /// independent symplectic pairs.
    ///
    /// Indicates that the rank conditions assumed by the stabilizer
    /// construction do not hold for the supplied matrices.
    #[error("degenerate logical basis: expected {expected} pairs, found {found}")]
    DegenerateBasis { expected: usize, found: usize },

    /// Logical operators were requested before the stabilizer pair was
    /// compiled.
    #[error("stabilizer pair has not been compiled")]
    PrecomputeMissing,

    /// The syndrome length differs from the number of checks in the matrix.
    ///
    /// Syndromes with entries outside {0, 1} are reported as
    /// [`HgpError::Validation`] instead.
    #[error("invalid syndrome: expected length {expected}, found {found}")]
    InvalidSyndrome { expected: usize, found: usize },
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, HgpError>;
