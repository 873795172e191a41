//! Dense binary matrices over GF(2).
//!
//! Rows are packed into `u64` words so that row additions, inner products
//! and weight counts run a word at a time. Bits beyond the column count in
//! the last word of each row are always zero, which lets equality and
//! zero-tests compare words directly.

use crate::bit_utils::BitPack;
use crate::{HgpError, Result};
use core::fmt;

/// Row-major binary matrix with packed rows.
///
/// Used for classical check matrices, the stabilizer pair of a hypergraph
/// product code and logical operator sets. Zero rows and zero columns are
/// both legal shapes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitMatrix {
    rows: usize,
    columns: usize,
    /// Number of `u64` words per row.
    stride: usize,
    data: Vec<u64>,
}

impl BitMatrix {
    /// Creates an all-zero matrix of the given shape.
    pub fn zeros(rows: usize, columns: usize) -> Self {
        let stride = BitPack::words_for(columns);
        Self {
            rows,
            columns,
            stride,
            data: vec![0; rows * stride],
        }
    }

    /// Creates the `dimension × dimension` identity matrix.
    pub fn identity(dimension: usize) -> Self {
        let mut m = Self::zeros(dimension, dimension);
        for i in 0..dimension {
            m.set((i, i), true);
        }
        m
    }

    /// Builds a matrix from explicit 0/1 rows.
    ///
    /// Every row must have exactly `columns` entries and every entry must be
    /// 0 or 1; anything else is rejected with [`HgpError::Validation`]. The
    /// column count is passed separately so that matrices with no rows keep
    /// their width.
    ///
    /// # Arguments
    ///
    /// * `columns` - Expected row length
    /// * `rows` - Row data, one `Vec<u8>` per row
    pub fn from_rows(columns: usize, rows: &[Vec<u8>]) -> Result<Self> {
        let mut m = Self::zeros(rows.len(), columns);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != columns {
                return Err(HgpError::Validation(format!(
                    "row {} has {} entries, expected {}",
                    r,
                    row.len(),
                    columns
                )));
            }
            for (c, &v) in row.iter().enumerate() {
                match v {
                    0 => {}
                    1 => m.set((r, c), true),
                    other => {
                        return Err(HgpError::Validation(format!(
                            "entry ({}, {}) is {}, expected 0 or 1",
                            r, c, other
                        )));
                    }
                }
            }
        }
        Ok(m)
    }

    /// Appends a packed row. `words` must hold exactly one row's worth of
    /// words with no bits set beyond the column count.
    pub fn push_row(&mut self, words: &[u64]) {
        debug_assert_eq!(words.len(), self.stride);
        self.data.extend_from_slice(words);
        self.rows += 1;
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Packed words of row `index`.
    pub fn row(&self, index: usize) -> &[u64] {
        &self.data[index * self.stride..(index + 1) * self.stride]
    }

    pub fn row_mut(&mut self, index: usize) -> &mut [u64] {
        &mut self.data[index * self.stride..(index + 1) * self.stride]
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u64]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }

    /// Row `index` unpacked into one byte per column.
    pub fn row_bits(&self, index: usize) -> Vec<u8> {
        BitPack::unpack(self.row(index), self.columns)
    }

    pub fn get(&self, (row, column): (usize, usize)) -> bool {
        assert!(row < self.rows && column < self.columns, "index out of bounds");
        BitPack::get(self.row(row), column)
    }

    pub fn set(&mut self, (row, column): (usize, usize), to: bool) {
        assert!(row < self.rows && column < self.columns, "index out of bounds");
        BitPack::set(self.row_mut(row), column, to);
    }

    pub fn is_zero(&self) -> bool {
        BitPack::is_zero(&self.data)
    }

    /// Total number of ones in the matrix.
    pub fn weight(&self) -> usize {
        BitPack::count_ones(&self.data)
    }

    /// Position of the first one in row-major order.
    pub fn first_one(&self) -> Option<(usize, usize)> {
        (0..self.rows).find_map(|r| BitPack::first_one(self.row(r)).map(|c| (r, c)))
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for w in 0..self.stride {
            self.data.swap(a * self.stride + w, b * self.stride + w);
        }
    }

    /// Adds row `from` into row `to` (mod 2).
    pub fn add_into_row(&mut self, to: usize, from: usize) {
        debug_assert_ne!(to, from);
        for w in 0..self.stride {
            let v = self.data[from * self.stride + w];
            self.data[to * self.stride + w] ^= v;
        }
    }

    pub fn transposed(&self) -> Self {
        let mut t = Self::zeros(self.columns, self.rows);
        for r in 0..self.rows {
            let row = self.row(r);
            for c in 0..self.columns {
                if BitPack::get(row, c) {
                    t.set((c, r), true);
                }
            }
        }
        t
    }

    /// Kronecker product `self ⊗ other`.
    ///
    /// Entry `((a·p + b), (i·q + j))` of the result is
    /// `self[a, i] · other[b, j]`, where `other` is `p × q`.
    pub fn kron(&self, other: &Self) -> Self {
        let (p, q) = other.shape();
        let mut out = Self::zeros(self.rows * p, self.columns * q);
        for a in 0..self.rows {
            for i in 0..self.columns {
                if !self.get((a, i)) {
                    continue;
                }
                for b in 0..p {
                    let src = other.row(b);
                    for j in 0..q {
                        if BitPack::get(src, j) {
                            out.set((a * p + b, i * q + j), true);
                        }
                    }
                }
            }
        }
        out
    }

    /// Horizontal concatenation `[left | right]`.
    ///
    /// Fails with [`HgpError::Validation`] if the row counts differ.
    pub fn hstack(left: &Self, right: &Self) -> Result<Self> {
        if left.rows != right.rows {
            return Err(HgpError::Validation(format!(
                "cannot stack {} rows beside {} rows",
                left.rows, right.rows
            )));
        }
        let mut out = Self::zeros(left.rows, left.columns + right.columns);
        for r in 0..left.rows {
            out.row_mut(r)[..left.stride].copy_from_slice(left.row(r));
            let src = right.row(r);
            for c in 0..right.columns {
                if BitPack::get(src, c) {
                    out.set((r, left.columns + c), true);
                }
            }
        }
        Ok(out)
    }

    /// Computes `self · otherᵗ (mod 2)`.
    ///
    /// Entry `(i, j)` is the GF(2) inner product of row `i` of `self` with
    /// row `j` of `other`, which is exactly the commutation test between an
    /// X-type and a Z-type check.
    ///
    /// # Panics
    ///
    /// Panics if the two matrices have different column counts.
    pub fn mul_transpose(&self, other: &Self) -> Self {
        assert_eq!(
            self.columns, other.columns,
            "mul_transpose needs equal column counts"
        );
        let mut out = Self::zeros(self.rows, other.rows);
        for i in 0..self.rows {
            let a = self.row(i);
            for j in 0..other.rows {
                if BitPack::dot(a, other.row(j)) {
                    out.set((i, j), true);
                }
            }
        }
        out
    }

    /// Computes `self · x (mod 2)` for a 0/1 vector `x`.
    ///
    /// # Panics
    ///
    /// Panics if `x.len()` differs from the column count.
    pub fn mul_vec(&self, x: &[u8]) -> Vec<u8> {
        assert_eq!(x.len(), self.columns, "vector length must equal column count");
        let packed = BitPack::pack(x);
        self.mul_packed(&packed)
    }

    /// Computes `self · x (mod 2)` for an already packed vector.
    pub fn mul_packed(&self, x: &[u64]) -> Vec<u8> {
        self.rows().map(|row| BitPack::dot(row, x) as u8).collect()
    }

    /// Reduces the matrix in place to reduced row echelon form.
    ///
    /// After the call the first `pivots.len()` rows are the non-zero rows,
    /// row `i` has its leading one in column `pivots[i]`, and every pivot
    /// column contains exactly one one.
    ///
    /// # Returns
    ///
    /// The pivot columns in increasing order; their count is the rank.
    pub fn echelonize(&mut self) -> Vec<usize> {
        let mut pivots = Vec::new();
        let mut next = 0;
        for c in 0..self.columns {
            if next == self.rows {
                break;
            }
            let Some(found) = (next..self.rows).find(|&r| BitPack::get(self.row(r), c)) else {
                continue;
            };
            self.swap_rows(next, found);
            for r in 0..self.rows {
                if r != next && BitPack::get(self.row(r), c) {
                    self.add_into_row(r, next);
                }
            }
            pivots.push(c);
            next += 1;
        }
        pivots
    }

    pub fn rank(&self) -> usize {
        self.clone().echelonize().len()
    }

    /// Basis of the null space `{x : self · x = 0}`.
    ///
    /// Returns a matrix whose `columns − rank` rows form the basis. Each
    /// basis vector has a single one among the free (non-pivot) columns.
    pub fn kernel(&self) -> Self {
        let mut rr = self.clone();
        let pivots = rr.echelonize();
        let mut is_pivot = vec![false; self.columns];
        for &p in &pivots {
            is_pivot[p] = true;
        }
        let free: Vec<usize> = (0..self.columns).filter(|&c| !is_pivot[c]).collect();
        let mut basis = Self::zeros(free.len(), self.columns);
        for (b, &f) in free.iter().enumerate() {
            basis.set((b, f), true);
            for (i, &p) in pivots.iter().enumerate() {
                if BitPack::get(rr.row(i), f) {
                    basis.set((b, p), true);
                }
            }
        }
        basis
    }
}

impl fmt::Debug for BitMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitMatrix {}x{}", self.rows, self.columns)?;
        fmt::Display::fmt(self, f)
    }
}

/// One line per row, `0`/`1` characters without separators.
impl fmt::Display for BitMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            let row = self.row(r);
            for c in 0..self.columns {
                f.write_str(if BitPack::get(row, c) { "1" } else { "0" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Incrementally built echelon basis of a row space.
///
/// Vectors are reduced in insertion order against the stored rows; each
/// stored row is kept zero at the pivots of all earlier rows, so a single
/// pass leaves a fully reduced residue.
#[derive(Clone, Debug)]
pub struct RowReducer {
    columns: usize,
    basis: Vec<(usize, Vec<u64>)>,
}

impl RowReducer {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            basis: Vec::new(),
        }
    }

    /// Seeds the reducer with every row of `m`.
    pub fn from_matrix(m: &BitMatrix) -> Self {
        let mut reducer = Self::new(m.column_count());
        for row in m.rows() {
            reducer.insert(row.to_vec());
        }
        reducer
    }

    pub fn rank(&self) -> usize {
        self.basis.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Residue of `v` modulo the current span.
    pub fn reduce(&self, mut v: Vec<u64>) -> Vec<u64> {
        for (pivot, row) in &self.basis {
            if BitPack::get(&v, *pivot) {
                BitPack::xor_into(&mut v, row);
            }
        }
        v
    }

    /// Adds `v` to the span. Returns `true` if it was independent of the
    /// vectors already present.
    pub fn insert(&mut self, v: Vec<u64>) -> bool {
        let v = self.reduce(v);
        match BitPack::first_one(&v) {
            Some(pivot) => {
                self.basis.push((pivot, v));
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(columns: usize, rows: &[&[u8]]) -> BitMatrix {
        let rows: Vec<Vec<u8>> = rows.iter().map(|r| r.to_vec()).collect();
        BitMatrix::from_rows(columns, &rows).unwrap()
    }

    #[test]
    fn from_rows_rejects_ragged_and_non_binary() {
        assert!(matches!(
            BitMatrix::from_rows(3, &[vec![1, 0]]),
            Err(HgpError::Validation(_))
        ));
        assert!(matches!(
            BitMatrix::from_rows(2, &[vec![1, 2]]),
            Err(HgpError::Validation(_))
        ));
    }

    #[test]
    fn kron_matches_block_layout() {
        let a = m(2, &[&[1, 1]]);
        let b = m(2, &[&[1, 0], &[0, 1]]);
        let k = a.kron(&b);
        assert_eq!(k, m(4, &[&[1, 0, 1, 0], &[0, 1, 0, 1]]));
    }

    #[test]
    fn kron_with_empty_factor_keeps_dimensions() {
        let a = BitMatrix::zeros(0, 3);
        let b = BitMatrix::identity(2);
        assert_eq!(a.kron(&b).shape(), (0, 6));
        assert_eq!(b.kron(&a).shape(), (0, 6));
    }

    #[test]
    fn hstack_places_right_block_after_left() {
        let left = m(2, &[&[1, 0], &[0, 1]]);
        let right = m(1, &[&[1], &[0]]);
        let s = BitMatrix::hstack(&left, &right).unwrap();
        assert_eq!(s, m(3, &[&[1, 0, 1], &[0, 1, 0]]));
        assert!(BitMatrix::hstack(&left, &BitMatrix::zeros(1, 1)).is_err());
    }

    #[test]
    fn rank_of_cycle_matrix_is_deficient() {
        let h = m(3, &[&[1, 1, 0], &[0, 1, 1], &[1, 0, 1]]);
        assert_eq!(h.rank(), 2);
        assert_eq!(h.kernel().row_count(), 1);
        assert_eq!(h.kernel().row_bits(0), vec![1, 1, 1]);
    }

    #[test]
    fn kernel_vectors_are_annihilated() {
        let h = m(5, &[&[1, 1, 0, 1, 0], &[0, 1, 1, 0, 1], &[1, 0, 1, 1, 1]]);
        let ker = h.kernel();
        assert_eq!(ker.row_count(), 5 - h.rank());
        assert!(h.mul_transpose(&ker).is_zero());
    }

    #[test]
    fn echelonize_reports_pivots() {
        let mut h = m(4, &[&[0, 1, 1, 0], &[0, 1, 0, 1], &[0, 0, 1, 1]]);
        let pivots = h.echelonize();
        assert_eq!(pivots, vec![1, 2]);
        assert!(BitPack::is_zero(h.row(2)));
    }

    #[test]
    fn row_reducer_detects_dependence() {
        let mut red = RowReducer::new(4);
        assert!(red.insert(BitPack::pack(&[1, 1, 0, 0])));
        assert!(red.insert(BitPack::pack(&[0, 1, 1, 0])));
        assert!(!red.insert(BitPack::pack(&[1, 0, 1, 0])));
        assert!(red.insert(BitPack::pack(&[0, 0, 0, 1])));
        assert_eq!(red.rank(), 3);
        assert!(BitPack::is_zero(&red.reduce(BitPack::pack(&[1, 0, 1, 1]))));
    }

    #[test]
    fn display_prints_rows() {
        let h = m(3, &[&[1, 0, 1], &[0, 1, 0]]);
        assert_eq!(h.to_string(), "101\n010\n");
    }
}
