//! Tanner graph representation of a binary check matrix.
//!
//! Implements the bipartite structure the belief-propagation decoder passes
//! messages over. Check nodes correspond to rows of the matrix, bit nodes
//! to columns, and an edge joins check `c` to bit `b` exactly when
//! `H[c, b] = 1`. The graph is immutable once built and may be shared across
//! threads for concurrent decoding.

use crate::gf2::BitMatrix;
use core::ops::Range;

/// Bipartite check/bit adjacency of a check matrix.
///
/// Edges are stored once, as `(check, bit)` pairs sorted by check and then
/// by bit, so that the edges of a check occupy a contiguous range. Each bit
/// keeps the list of edge indices that touch it. Decoders index their
/// per-edge message buffers by the position in this edge list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TannerGraph {
    /// Flat list of graph edges as (check, bit) pairs.
    ///
    /// Stored as u32 pairs to reduce memory footprint compared to usize
    /// pairs on 64-bit systems. Message buffers in the decoder are laid out
    /// in the same order.
    edges: Vec<(u32, u32)>,

    /// Edge range boundaries per check.
    ///
    /// The edges of check `c` are `edges[check_offsets[c]..check_offsets[c + 1]]`.
    check_offsets: Vec<usize>,

    /// Edge indices grouped by bit, in increasing check order.
    bit_edges: Vec<u32>,

    /// Boundaries into `bit_edges` per bit, analogous to `check_offsets`.
    bit_offsets: Vec<usize>,
}

impl TannerGraph {
    /// Builds the graph of a check matrix.
    ///
    /// Walks the matrix row by row, recording one edge per non-zero entry,
    /// then buckets the edge indices by bit. Cost is linear in the matrix
    /// size plus the number of edges.
    ///
    /// # Arguments
    ///
    /// * `h` - Check matrix; rows become check nodes, columns bit nodes
    ///
    /// # Panics
    ///
    /// Panics if the matrix has more than `u32::MAX` rows or columns.
    pub fn from_matrix(h: &BitMatrix) -> Self {
        let (num_checks, num_bits) = h.shape();
        assert!(
            num_checks <= u32::MAX as usize && num_bits <= u32::MAX as usize,
            "check matrix too large for u32 node indices"
        );

        let mut edges = Vec::with_capacity(h.weight());
        let mut check_offsets = Vec::with_capacity(num_checks + 1);
        let mut bit_degree = vec![0usize; num_bits];

        check_offsets.push(0);
        for c in 0..num_checks {
            for b in 0..num_bits {
                if h.get((c, b)) {
                    edges.push((c as u32, b as u32));
                    bit_degree[b] += 1;
                }
            }
            check_offsets.push(edges.len());
        }

        let mut bit_offsets = Vec::with_capacity(num_bits + 1);
        bit_offsets.push(0);
        for b in 0..num_bits {
            bit_offsets.push(bit_offsets[b] + bit_degree[b]);
        }

        let mut cursor = bit_offsets.clone();
        let mut bit_edges = vec![0u32; edges.len()];
        for (e, &(_, b)) in edges.iter().enumerate() {
            let slot = &mut cursor[b as usize];
            bit_edges[*slot] = e as u32;
            *slot += 1;
        }

        Self {
            edges,
            check_offsets,
            bit_edges,
            bit_offsets,
        }
    }

    pub fn num_checks(&self) -> usize {
        self.check_offsets.len() - 1
    }

    pub fn num_bits(&self) -> usize {
        self.bit_offsets.len() - 1
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// The `(check, bit)` endpoints of edge `e`.
    pub fn edge(&self, e: usize) -> (usize, usize) {
        let (c, b) = self.edges[e];
        (c as usize, b as usize)
    }

    /// Indices of the edges incident to check `c`.
    pub fn edges_of_check(&self, c: usize) -> Range<usize> {
        self.check_offsets[c]..self.check_offsets[c + 1]
    }

    /// Indices of the edges incident to bit `b`.
    pub fn edges_of_bit(&self, b: usize) -> &[u32] {
        &self.bit_edges[self.bit_offsets[b]..self.bit_offsets[b + 1]]
    }

    /// Bits constrained by check `c`, in increasing order.
    pub fn bits_of_check(&self, c: usize) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.edges[self.edges_of_check(c)]
            .iter()
            .map(|&(_, b)| b as usize)
    }

    /// Checks that constrain bit `b`, in increasing order.
    pub fn checks_of_bit(&self, b: usize) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.edges_of_bit(b)
            .iter()
            .map(move |&e| self.edges[e as usize].0 as usize)
    }

    pub fn check_degree(&self, c: usize) -> usize {
        self.check_offsets[c + 1] - self.check_offsets[c]
    }

    pub fn bit_degree(&self, b: usize) -> usize {
        self.bit_offsets[b + 1] - self.bit_offsets[b]
    }

    /// Computes `H · error (mod 2)`.
    ///
    /// # Arguments
    ///
    /// * `error` - One 0/1 entry per bit; non-zero entries count as ones
    ///
    /// # Returns
    ///
    /// One 0/1 entry per check.
    pub fn syndrome_of(&self, error: &[u8]) -> Vec<u8> {
        debug_assert_eq!(error.len(), self.num_bits());
        (0..self.num_checks())
            .map(|c| {
                self.bits_of_check(c)
                    .fold(0u8, |acc, b| acc ^ (error[b] != 0) as u8)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path4() -> BitMatrix {
        BitMatrix::from_rows(
            4,
            &[vec![1, 1, 0, 0], vec![0, 1, 1, 0], vec![0, 0, 1, 1]],
        )
        .unwrap()
    }

    #[test]
    fn neighbourhoods_match_matrix() {
        let g = TannerGraph::from_matrix(&path4());
        assert_eq!(g.num_checks(), 3);
        assert_eq!(g.num_bits(), 4);
        assert_eq!(g.num_edges(), 6);
        assert_eq!(g.bits_of_check(1).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(g.checks_of_bit(0).collect::<Vec<_>>(), vec![0]);
        assert_eq!(g.checks_of_bit(2).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(g.bit_degree(3), 1);
        assert_eq!(g.check_degree(2), 2);
    }

    #[test]
    fn bit_edges_point_back_to_bit() {
        let g = TannerGraph::from_matrix(&path4());
        for b in 0..g.num_bits() {
            for &e in g.edges_of_bit(b) {
                assert_eq!(g.edge(e as usize).1, b);
            }
        }
    }

    #[test]
    fn syndrome_matches_dense_product() {
        let h = path4();
        let g = TannerGraph::from_matrix(&h);
        let e = [1, 0, 1, 1];
        assert_eq!(g.syndrome_of(&e), h.mul_vec(&e));
    }

    #[test]
    fn empty_matrix_has_no_nodes() {
        let g = TannerGraph::from_matrix(&BitMatrix::zeros(0, 0));
        assert_eq!(g.num_checks(), 0);
        assert_eq!(g.num_bits(), 0);
        assert!(g.syndrome_of(&[]).is_empty());
    }
}
