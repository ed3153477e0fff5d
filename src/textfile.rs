//! Line-oriented text files used by the driver
//!
//! Input holds one number per line; blank lines are skipped. Output holds two
//! lines per pair, minimum index then maximum index, with no header.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::{PairedExtrema, PersistenceError, Result};

/// Suffix replacing the input extension in the result file name
pub const RESULT_SUFFIX: &str = "_res.txt";

/// Parse one input line. `line_no` is 1-based and only used for errors.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<f64>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| PersistenceError::Parse {
            line: line_no,
            content: trimmed.to_string(),
        })
}

/// Parse samples from in-memory text
pub fn parse_samples(text: &str) -> Result<Vec<f64>> {
    let mut samples = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if let Some(value) = parse_line(i + 1, line)? {
            samples.push(value);
        }
    }
    Ok(samples)
}

/// Read samples from the file at `path`
pub fn read_samples(path: &Path) -> Result<Vec<f64>> {
    let read_err = |source: io::Error| PersistenceError::Read {
        path: path.to_path_buf(),
        source,
    };

    let reader = BufReader::new(File::open(path).map_err(read_err)?);
    let mut samples = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(read_err)?;
        if let Some(value) = parse_line(i + 1, &line)? {
            samples.push(value);
        }
    }
    Ok(samples)
}

/// Write `pairs` in result-file layout
pub fn write_pairs<W: Write>(mut sink: W, pairs: &[PairedExtrema]) -> io::Result<()> {
    for p in pairs {
        writeln!(sink, "{}", p.min_index)?;
        writeln!(sink, "{}", p.max_index)?;
    }
    sink.flush()
}

/// Create or overwrite the result file at `path`
pub fn write_pairs_to_file(path: &Path, pairs: &[PairedExtrema]) -> Result<()> {
    let write_err = |source: io::Error| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    write_pairs(BufWriter::new(file), pairs).map_err(write_err)
}

/// `dir/data.txt` -> `dir/data_res.txt`
pub fn result_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{RESULT_SUFFIX}"))
}
