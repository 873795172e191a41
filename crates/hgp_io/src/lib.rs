//! I/O utilities for hypergraph-product code experiments.
//!
//! Provides functions for reading and writing classical check matrices in a
//! plain-text format and packed binary shot files (.b8) holding syndromes or
//! error patterns. These utilities handle file format parsing and conversion
//! to the core crate's data structures.

/// File loading utilities for binary shot data and code arguments.
///
/// Reads and writes .b8 files (one byte-aligned, LSB-first record per shot)
/// and resolves code arguments that name either a built-in family or a
/// check-matrix file.
pub mod loader;

/// Parser for check-matrix text files.
///
/// Parses optional `code <n> <r> <d>` headers and rows of 0/1 characters,
/// constructs validated ClassicalCode instances, and writes matrices back in
/// the same format.
pub mod parser;
