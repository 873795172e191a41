//! Classical binary linear codes given by a parity-check matrix.

use crate::bit_utils::BitPack;
use crate::gf2::BitMatrix;
use crate::{HgpError, Result};

/// Classical binary linear code with a validated check matrix.
///
/// Stores the declared length `n`, check count `r`, minimum distance `d`,
/// and the `r × n` check matrix `H`. The declared distance is advisory; use
/// [`ClassicalCode::min_distance`] to verify it for small codes. Instances
/// are immutable after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassicalCode {
    n: usize,
    r: usize,
    d: usize,
    check_matrix: BitMatrix,
    rank: usize,
}

impl ClassicalCode {
    /// Creates a code from explicit 0/1 rows of its check matrix.
    ///
    /// # Arguments
    ///
    /// * `n` - Code length (must be positive)
    /// * `r` - Declared number of checks, `0 ≤ r ≤ n`
    /// * `d` - Declared minimum distance (at least 1)
    /// * `rows` - Check matrix rows; must be exactly `r` rows of `n` entries
    ///
    /// # Returns
    ///
    /// The code, or [`HgpError::Validation`] if any parameter or the matrix
    /// shape or entry domain is wrong.
    pub fn new(n: usize, r: usize, d: usize, rows: Vec<Vec<u8>>) -> Result<Self> {
        if rows.len() != r {
            return Err(HgpError::Validation(format!(
                "check matrix has {} rows, declared r = {}",
                rows.len(),
                r
            )));
        }
        let h = BitMatrix::from_rows(n, &rows)?;
        Self::from_matrix(n, r, d, h)
    }

    /// Creates a code from an already built check matrix.
    pub fn from_matrix(n: usize, r: usize, d: usize, check_matrix: BitMatrix) -> Result<Self> {
        if n == 0 {
            return Err(HgpError::Validation("code length n must be positive".into()));
        }
        if r > n {
            return Err(HgpError::Validation(format!(
                "declared r = {} exceeds n = {}",
                r, n
            )));
        }
        if d == 0 {
            return Err(HgpError::Validation("declared distance d must be at least 1".into()));
        }
        if check_matrix.shape() != (r, n) {
            return Err(HgpError::Validation(format!(
                "check matrix shape {:?} does not match (r, n) = ({}, {})",
                check_matrix.shape(),
                r,
                n
            )));
        }
        let rank = check_matrix.rank();
        Ok(Self {
            n,
            r,
            d,
            check_matrix,
            rank,
        })
    }

    /// Repetition code of length `n` with the open-chain checks
    /// `x_i + x_{i+1} = 0`.
    pub fn repetition(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(HgpError::Validation("code length n must be positive".into()));
        }
        let mut h = BitMatrix::zeros(n - 1, n);
        for i in 0..n - 1 {
            h.set((i, i), true);
            h.set((i, i + 1), true);
        }
        Self::from_matrix(n, n - 1, n, h)
    }

    /// Repetition code of length `n` with closed-ring checks. The check
    /// matrix is square with rank `n − 1`. Requires `n ≥ 2`.
    pub fn cycle(n: usize) -> Result<Self> {
        if n < 2 {
            return Err(HgpError::Validation("cycle code needs n >= 2".into()));
        }
        let mut h = BitMatrix::zeros(n, n);
        for i in 0..n {
            h.set((i, i), true);
            h.set((i, (i + 1) % n), true);
        }
        Self::from_matrix(n, n, n, h)
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn r(&self) -> usize {
        self.r
    }

    /// Declared minimum distance.
    pub fn d(&self) -> usize {
        self.d
    }

    pub fn check_matrix(&self) -> &BitMatrix {
        &self.check_matrix
    }

    /// GF(2) rank of the check matrix.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Code dimension `k = n − rank(H)`.
    pub fn dimension(&self) -> usize {
        self.n - self.rank
    }

    /// Dimension of the transpose code, `r − rank(H)`: the number of
    /// redundant checks.
    pub fn transpose_dimension(&self) -> usize {
        self.r - self.rank
    }

    pub fn is_full_rank(&self) -> bool {
        self.rank == self.r
    }

    /// Enumerates every codeword.
    ///
    /// Walks all `2^k` combinations of a null-space basis in Gray-code
    /// order, so consecutive codewords differ by one basis vector. Each
    /// call returns a fresh iterator starting from the zero codeword.
    pub fn codewords(&self) -> Codewords {
        Codewords::new(self.check_matrix.kernel())
    }

    /// Exact minimum distance, found by scanning all codewords.
    ///
    /// Returns `None` when the code has no non-zero codeword (k = 0).
    /// Cost is `2^k`, so this is only practical for small dimensions.
    pub fn min_distance(&self) -> Option<usize> {
        self.codewords()
            .map(|c| c.iter().filter(|&&b| b == 1).count())
            .filter(|&w| w > 0)
            .min()
    }
}

/// Iterator over the codewords of a classical code.
///
/// Produced by [`ClassicalCode::codewords`]. Yields `2^k` vectors of
/// length `n`, the first being zero.
#[derive(Clone, Debug)]
pub struct Codewords {
    basis: BitMatrix,
    current: Vec<u64>,
    next_index: u128,
    /// `None` once `2^k` no longer fits in a `u128`.
    total: Option<u128>,
}

impl Codewords {
    fn new(basis: BitMatrix) -> Self {
        let total = 1u128.checked_shl(basis.row_count() as u32);
        let current = vec![0; BitPack::words_for(basis.column_count())];
        Self {
            basis,
            current,
            next_index: 0,
            total,
        }
    }

    /// Number of codewords not yet yielded, if representable.
    pub fn remaining(&self) -> Option<u128> {
        self.total.map(|t| t - self.next_index)
    }
}

impl Iterator for Codewords {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        if self.total.is_some_and(|t| self.next_index >= t) {
            return None;
        }
        if self.next_index > 0 {
            let flip = self.next_index.trailing_zeros() as usize;
            BitPack::xor_into(&mut self.current, self.basis.row(flip));
        }
        self.next_index += 1;
        Some(BitPack::unpack(&self.current, self.basis.column_count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rejects_shape_mismatch() {
        let err = ClassicalCode::new(3, 2, 1, vec![vec![1, 1, 0]]).unwrap_err();
        assert!(matches!(err, HgpError::Validation(_)));
        let err = ClassicalCode::new(3, 1, 1, vec![vec![1, 1]]).unwrap_err();
        assert!(matches!(err, HgpError::Validation(_)));
    }

    #[test]
    fn rejects_non_binary_entries() {
        let err = ClassicalCode::new(2, 1, 1, vec![vec![1, 3]]).unwrap_err();
        assert!(matches!(err, HgpError::Validation(_)));
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(ClassicalCode::from_matrix(0, 0, 1, BitMatrix::zeros(0, 0)).is_err());
        assert!(ClassicalCode::from_matrix(2, 3, 1, BitMatrix::zeros(3, 2)).is_err());
        assert!(ClassicalCode::from_matrix(2, 1, 0, BitMatrix::zeros(1, 2)).is_err());
    }

    #[test]
    fn empty_check_matrix_is_allowed() {
        let code = ClassicalCode::from_matrix(3, 0, 1, BitMatrix::zeros(0, 3)).unwrap();
        assert_eq!(code.dimension(), 3);
        assert_eq!(code.codewords().count(), 8);
    }

    #[test]
    fn repetition_codewords() {
        let code = ClassicalCode::repetition(4).unwrap();
        let words: Vec<Vec<u8>> = code.codewords().collect();
        assert_eq!(words, vec![vec![0, 0, 0, 0], vec![1, 1, 1, 1]]);
        assert_eq!(code.min_distance(), Some(4));
    }

    #[test]
    fn cycle_code_is_rank_deficient() {
        let code = ClassicalCode::cycle(5).unwrap();
        assert_eq!(code.r(), 5);
        assert_eq!(code.rank(), 4);
        assert!(!code.is_full_rank());
        assert_eq!(code.dimension(), 1);
        assert_eq!(code.transpose_dimension(), 1);
    }

    #[test]
    fn hamming_code_enumeration_is_complete_and_valid() {
        let code = ClassicalCode::new(
            7,
            3,
            3,
            vec![
                vec![1, 0, 0, 1, 1, 0, 1],
                vec![0, 1, 0, 1, 0, 1, 1],
                vec![0, 0, 1, 0, 1, 1, 1],
            ],
        )
        .unwrap();
        let words: HashSet<Vec<u8>> = code.codewords().collect();
        assert_eq!(words.len(), 16);
        for w in &words {
            assert!(code.check_matrix().mul_vec(w).iter().all(|&s| s == 0));
        }
        assert_eq!(code.min_distance(), Some(3));
    }

    #[test]
    fn codewords_are_restartable() {
        let code = ClassicalCode::repetition(3).unwrap();
        let mut it = code.codewords();
        assert_eq!(it.remaining(), Some(2));
        it.next();
        let first: Vec<_> = code.codewords().collect();
        let second: Vec<_> = code.codewords().collect();
        assert_eq!(first, second);
        assert_eq!(it.count(), 1);
    }

    #[test]
    fn full_rank_code_has_no_distance() {
        let code = ClassicalCode::new(2, 2, 1, vec![vec![1, 0], vec![0, 1]]).unwrap();
        assert_eq!(code.dimension(), 0);
        assert_eq!(code.min_distance(), None);
        assert_eq!(code.codewords().count(), 1);
    }
}
