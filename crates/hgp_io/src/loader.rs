use crate::parser;
use anyhow::{Context, Result, bail};
use bitvec::prelude::*;
use hgp_core::ClassicalCode;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Loads a .b8 file (packed binary shot data).
pub fn load_b8_file<P: AsRef<Path>>(path: P) -> Result<BitVec<u8, Lsb0>> {
    let mut file = File::open(path).context("Failed to open .b8 file")?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;

    // Each byte holds eight consecutive bits, least significant first.
    let bits = BitVec::<u8, Lsb0>::from_vec(buffer);
    Ok(bits)
}

/// Splits raw bits into shots of `bits_per_shot` entries. Every shot starts
/// on a byte boundary; trailing bits of an incomplete record are dropped.
pub fn slice_shots(raw_bits: &BitVec<u8, Lsb0>, bits_per_shot: usize) -> Vec<Vec<u8>> {
    let bytes_per_shot = bits_per_shot.div_ceil(8);
    let stride_bits = bytes_per_shot * 8;

    if stride_bits == 0 {
        return Vec::new();
    }

    let num_shots = raw_bits.len() / stride_bits;
    let mut shots = Vec::with_capacity(num_shots);

    for i in 0..num_shots {
        let start = i * stride_bits;
        let end = start + bits_per_shot;

        let slice = &raw_bits[start..end];
        shots.push(slice.iter().map(|b| *b as u8).collect());
    }

    shots
}

/// Packs shots into the .b8 byte layout read by [`slice_shots`].
pub fn pack_shots(shots: &[Vec<u8>], bits_per_shot: usize) -> Result<Vec<u8>> {
    let bytes_per_shot = bits_per_shot.div_ceil(8);
    let mut bits: BitVec<u8, Lsb0> = BitVec::with_capacity(shots.len() * bytes_per_shot * 8);
    for (i, shot) in shots.iter().enumerate() {
        if shot.len() != bits_per_shot {
            bail!("shot {} has {} bits, expected {}", i, shot.len(), bits_per_shot);
        }
        bits.extend(shot.iter().map(|&b| b != 0));
        bits.resize((i + 1) * bytes_per_shot * 8, false);
    }
    Ok(bits.into_vec())
}

pub fn save_b8_file<P: AsRef<Path>>(path: P, shots: &[Vec<u8>], bits_per_shot: usize) -> Result<()> {
    let bytes = pack_shots(shots, bits_per_shot)?;
    let mut file = File::create(path).context("Failed to create .b8 file")?;
    file.write_all(&bytes)?;
    Ok(())
}

/// Resolves a code argument.
///
/// `rep:<n>` and `cycle:<n>` name the built-in repetition families; any
/// other value is read as a check-matrix file.
pub fn load_code(arg: &str) -> Result<ClassicalCode> {
    if let Some(n) = arg.strip_prefix("rep:") {
        let n: usize = n.parse().context("rep:<n> needs an integer length")?;
        return Ok(ClassicalCode::repetition(n)?);
    }
    if let Some(n) = arg.strip_prefix("cycle:") {
        let n: usize = n.parse().context("cycle:<n> needs an integer length")?;
        return Ok(ClassicalCode::cycle(n)?);
    }
    parser::load_code_file(arg)
}
