use hgp_core::{
    BitMatrix, BpConfig, BpDecoder, BpMethod, ClassicalCode, HgpCode, HgpError, TannerGraph,
    bp_decode, hypergraph_product,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

fn arbitrary_code(max_n: usize) -> impl Strategy<Value = ClassicalCode> {
    (1..=max_n)
        .prop_flat_map(|n| (Just(n), 0..=n))
        .prop_flat_map(|(n, r)| {
            prop::collection::vec(prop::collection::vec(0u8..=1, n), r)
                .prop_map(move |rows| ClassicalCode::new(n, r, 1, rows).unwrap())
        })
}

fn chain3() -> Arc<ClassicalCode> {
    Arc::new(ClassicalCode::new(3, 2, 3, vec![vec![1, 1, 0], vec![0, 1, 1]]).unwrap())
}

proptest! {
    #[test]
    fn stabilizers_commute(c1 in arbitrary_code(5), c2 in arbitrary_code(5)) {
        let pair = hypergraph_product(c1.check_matrix(), c2.check_matrix()).unwrap();
        prop_assert!(pair.hx().mul_transpose(pair.hz()).is_zero());
        prop_assert_eq!(pair.hx().row_count(), c1.r() * c2.n());
        prop_assert_eq!(pair.hz().row_count(), c1.n() * c2.r());
    }

    #[test]
    fn parameters_follow_ranks(c1 in arbitrary_code(5), c2 in arbitrary_code(5)) {
        let (n1, r1, k1) = (c1.n(), c1.r(), c1.n() - c1.check_matrix().rank());
        let (n2, r2, k2) = (c2.n(), c2.r(), c2.n() - c2.check_matrix().rank());
        let full_rank = c1.is_full_rank() || c2.is_full_rank();
        let code = HgpCode::new(Arc::new(c1), Arc::new(c2));
        prop_assert_eq!(code.n(), n1 * n2 + r1 * r2);
        if full_rank {
            prop_assert_eq!(code.k(), k1 * k2);
        }
    }

    #[test]
    fn logical_operators_are_symplectic(c1 in arbitrary_code(4), c2 in arbitrary_code(4)) {
        let mut code = HgpCode::new(Arc::new(c1), Arc::new(c2));
        let (hx, hz) = {
            let pair = code.compile_stabilizer().unwrap();
            (pair.hx().clone(), pair.hz().clone())
        };
        let ops = code.calc_logical_operators().unwrap();

        // K also equals N - rank(HX) - rank(HZ).
        prop_assert_eq!(ops.count(), code.k());
        prop_assert_eq!(code.k(), code.n() - hx.rank() - hz.rank());
        prop_assert_eq!(ops.lx().mul_transpose(ops.lz()), BitMatrix::identity(code.k()));
        prop_assert!(hz.mul_transpose(ops.lx()).is_zero());
        prop_assert!(hx.mul_transpose(ops.lz()).is_zero());
    }

    #[test]
    fn compilation_is_idempotent(c1 in arbitrary_code(5), c2 in arbitrary_code(5)) {
        let mut code = HgpCode::new(Arc::new(c1), Arc::new(c2));
        let first = code.compile_stabilizer().unwrap().clone();
        let second = code.compile_stabilizer().unwrap().clone();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn converged_estimates_reproduce_syndrome(
        c in arbitrary_code(6),
        seed in any::<u64>(),
        method in prop_oneof![Just(BpMethod::ProductSum), Just(BpMethod::MinSum)],
    ) {
        let h = c.check_matrix();
        let graph = TannerGraph::from_matrix(h);
        let mut rng = StdRng::seed_from_u64(seed);
        let error: Vec<u8> = (0..h.column_count()).map(|_| rng.gen_bool(0.2) as u8).collect();
        let syndrome = h.mul_vec(&error);
        let config = BpConfig { method, max_iterations: 30, ..BpConfig::default() };
        let out = BpDecoder::new(&graph, 0.1, config).unwrap().decode(&syndrome).unwrap();
        prop_assert!(out.iterations <= 30);
        prop_assert_eq!(out.error.len(), h.column_count());
        if out.converged {
            prop_assert_eq!(h.mul_vec(&out.error), syndrome);
        }
    }
}

#[test]
fn thirteen_qubit_surface_code() {
    let mut code = HgpCode::new(chain3(), chain3());
    assert_eq!(code.n(), 13);
    let pair = code.compile_stabilizer().unwrap();

    // Direct computation of HX·HZᵗ entry by entry.
    for a in 0..pair.hx().row_count() {
        for b in 0..pair.hz().row_count() {
            let overlap = (0..13)
                .filter(|&q| pair.hx().get((a, q)) && pair.hz().get((b, q)))
                .count();
            assert_eq!(overlap % 2, 0, "HX row {a} and HZ row {b} anticommute");
        }
    }

    let ops = code.calc_logical_operators().unwrap();
    assert_eq!(ops.count(), 1);
}

#[test]
fn no_checks_on_first_code() {
    let empty = Arc::new(ClassicalCode::from_matrix(3, 0, 1, BitMatrix::zeros(0, 3)).unwrap());
    let also_empty = Arc::new(ClassicalCode::from_matrix(2, 0, 1, BitMatrix::zeros(0, 2)).unwrap());

    let mut code = HgpCode::new(empty.clone(), also_empty);
    assert_eq!(code.n(), 6);
    assert_eq!(code.k(), 6);
    assert_eq!(code.compile_stabilizer().unwrap().hx().row_count(), 0);

    let mut mixed = HgpCode::new(empty, chain3());
    assert_eq!(mixed.k(), 3);
    let pair = mixed.compile_stabilizer().unwrap();
    assert_eq!(pair.hx().shape(), (0, 9));
    assert_eq!(pair.hz().shape(), (6, 9));

    let out = bp_decode(pair.hx(), &[], 0.1, 10).unwrap();
    assert!(out.converged);
    assert_eq!(out.iterations, 0);
    assert!(out.error.iter().all(|&b| b == 0));
}

#[test]
fn path_code_single_flip() {
    let h = BitMatrix::from_rows(
        4,
        &[vec![1, 1, 0, 0], vec![0, 1, 1, 0], vec![0, 0, 1, 1]],
    )
    .unwrap();
    let out = bp_decode(&h, &[1, 0, 0], 0.05, 50).unwrap();
    assert!(out.converged);
    assert_eq!(out.weight(), 1);
    assert_eq!(out.error[0], 1);
    assert!(out.iterations <= 50);
}

#[test]
fn syndrome_length_is_checked_against_rows() {
    let h = BitMatrix::identity(3);
    assert_eq!(
        bp_decode(&h, &[0, 1], 0.05, 10).unwrap_err(),
        HgpError::InvalidSyndrome { expected: 3, found: 2 }
    );
}

#[test]
fn surface_code_corrects_single_primary_error() {
    let mut code = HgpCode::new(chain3(), chain3());
    let hz = code.compile_stabilizer().unwrap().hz().clone();
    let ops = code.calc_logical_operators().unwrap();
    let graph = TannerGraph::from_matrix(&hz);
    let decoder = BpDecoder::new(&graph, 0.05, BpConfig::default()).unwrap();

    let mut error = vec![0u8; code.n()];
    error[code.primary_index(1, 1)] = 1;
    let syndrome = graph.syndrome_of(&error);
    let out = decoder.decode(&syndrome).unwrap();
    assert!(out.converged);
    assert_eq!(out.error, error);
    let residual: Vec<u8> = error.iter().zip(&out.error).map(|(a, b)| a ^ b).collect();
    assert!(ops.flipped_logicals_x(&residual).is_empty());
}
