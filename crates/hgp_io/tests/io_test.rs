use hgp_core::{BitMatrix, HgpCode};
use hgp_io::{loader, parser};
use std::path::PathBuf;
use std::sync::Arc;

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hgp_io_{}_{}", std::process::id(), name))
}

#[test]
fn b8_files_preserve_shots() {
    let path = scratch("shots.b8");
    let shots = vec![
        vec![1, 0, 0, 1, 1, 0, 0, 0, 1],
        vec![0; 9],
        vec![1; 9],
    ];
    loader::save_b8_file(&path, &shots, 9).unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 6);

    let bits = loader::load_b8_file(&path).unwrap();
    assert_eq!(loader::slice_shots(&bits, 9), shots);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn missing_b8_file_is_reported() {
    let err = loader::load_b8_file(scratch("absent.b8")).unwrap_err();
    assert!(err.to_string().contains(".b8"));
}

#[test]
fn stabilizers_written_by_save_matrix_load_back() {
    let path = scratch("hx.txt");
    let mut code = HgpCode::new(
        Arc::new(loader::load_code("rep:3").unwrap()),
        Arc::new(loader::load_code("rep:3").unwrap()),
    );
    let hx = code.compile_stabilizer().unwrap().hx().clone();
    parser::save_matrix(&path, &hx).unwrap();

    let reloaded = parser::load_code_file(&path).unwrap();
    assert_eq!(reloaded.check_matrix(), &hx);
    assert_eq!(reloaded.n(), 13);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn check_matrix_file_with_header() {
    let path = scratch("hamming.txt");
    std::fs::write(
        &path,
        "# [7,4,3] Hamming\ncode 7 3 3\n1001101\n0101011\n0010111\n",
    )
    .unwrap();
    let code = loader::load_code(path.to_str().unwrap()).unwrap();
    assert_eq!(code.dimension(), 4);
    assert_eq!(code.min_distance(), Some(3));
    assert_eq!(
        code.check_matrix().row_bits(0),
        BitMatrix::from_rows(7, &[vec![1, 0, 0, 1, 1, 0, 1]]).unwrap().row_bits(0)
    );
    std::fs::remove_file(&path).unwrap();
}
