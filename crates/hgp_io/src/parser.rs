//! Parser for check-matrix text files.
//!
//! The format is line oriented:
//!
//! ```text
//! # optional comments
//! code 4 3 4
//! 1100
//! 0110
//! 0 0 1 1
//! ```
//!
//! The `code <n> <r> <d>` header is optional and must precede the rows.
//! Without it, `n` and `r` are taken from the body and `d` defaults to 1.
//! Entries may be separated by spaces or tabs.

use anyhow::{Context, Result, anyhow, bail};
use hgp_core::{BitMatrix, ClassicalCode};
use nom::IResult;
use nom::bytes::complete::tag;
use nom::character::complete::{digit1, one_of, space0, space1};
use nom::combinator::{all_consuming, map, map_res};
use nom::multi::many1;
use nom::sequence::{preceded, terminated};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Declared parameters from a `code` header line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeHeader {
    pub n: usize,
    pub r: usize,
    pub d: usize,
}

/// Contents of a check-matrix file before validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedMatrix {
    pub header: Option<CodeHeader>,
    pub rows: Vec<Vec<u8>>,
}

impl ParsedMatrix {
    /// Builds a ClassicalCode, letting the core crate validate shape and
    /// declared parameters.
    pub fn into_code(self) -> Result<ClassicalCode> {
        let header = match self.header {
            Some(h) => h,
            None => {
                let n = self
                    .rows
                    .first()
                    .map(|r| r.len())
                    .ok_or_else(|| anyhow!("matrix has no rows and no code header"))?;
                CodeHeader {
                    n,
                    r: self.rows.len(),
                    d: 1,
                }
            }
        };
        Ok(ClassicalCode::new(header.n, header.r, header.d, self.rows)?)
    }
}

fn number(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(input)
}

fn header(input: &str) -> IResult<&str, CodeHeader> {
    let (input, _) = tag("code")(input)?;
    let (input, n) = preceded(space1, number)(input)?;
    let (input, r) = preceded(space1, number)(input)?;
    let (input, d) = preceded(space1, number)(input)?;
    let (input, _) = space0(input)?;
    Ok((input, CodeHeader { n, r, d }))
}

fn row(input: &str) -> IResult<&str, Vec<u8>> {
    many1(terminated(map(one_of("01"), |c| (c == '1') as u8), space0))(input)
}

/// Parses check-matrix text.
///
/// # Arguments
///
/// * `input` - Full file contents
///
/// # Returns
///
/// The header (if any) and raw rows, or an error naming the first line
/// that is neither a comment, a header, nor a 0/1 row.
pub fn parse_check_matrix(input: &str) -> Result<ParsedMatrix> {
    let mut parsed = ParsedMatrix {
        header: None,
        rows: Vec::new(),
    };

    for (lineno, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if trimmed.starts_with("code") {
            if parsed.header.is_some() || !parsed.rows.is_empty() {
                bail!("line {}: header must appear once, before any row", lineno + 1);
            }
            let (_, h) = all_consuming(header)(trimmed)
                .map_err(|e| anyhow!("line {}: bad header: {}", lineno + 1, e))?;
            parsed.header = Some(h);
            continue;
        }

        let (_, bits) = all_consuming(row)(trimmed)
            .map_err(|e| anyhow!("line {}: bad row: {}", lineno + 1, e))?;
        parsed.rows.push(bits);
    }

    Ok(parsed)
}

/// Loads a check-matrix file and constructs a ClassicalCode.
pub fn load_code_file<P: AsRef<Path>>(path: P) -> Result<ClassicalCode> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to open check matrix {}", path.display()))?;
    parse_check_matrix(&text)
        .and_then(ParsedMatrix::into_code)
        .with_context(|| format!("Failed to parse check matrix {}", path.display()))
}

/// Renders a matrix in the text format, with an optional header.
pub fn format_matrix(matrix: &BitMatrix, header: Option<CodeHeader>) -> String {
    let mut out = String::new();
    if let Some(h) = header {
        out.push_str(&format!("code {} {} {}\n", h.n, h.r, h.d));
    }
    out.push_str(&matrix.to_string());
    out
}

/// Writes a matrix to `path` in the text format (no header).
pub fn save_matrix<P: AsRef<Path>>(path: P, matrix: &BitMatrix) -> Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(format_matrix(matrix, None).as_bytes())?;
    writer.flush()?;
    Ok(())
}
