//! Delimited-line record reader.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ntm_model::{NtmError, Record, Result};
use tracing::debug;

/// Lines shorter than this (after trimming) are skipped as blank.
const MIN_LINE_LEN: usize = 2;

/// How input lines are split into fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Respect double quotes when splitting, so a quoted field may contain
    /// the delimiter. The plain mode splits on every comma.
    pub quote_aware: bool,
}

/// Records read from one file plus the physical line count.
#[derive(Debug, Clone)]
pub struct ReadResult {
    pub records: Vec<Record>,
    /// Number of physical lines consumed, including skipped blanks.
    pub lines_read: u64,
}

/// Read every record in `path`.
///
/// Each line is trimmed, upper-cased, and split into fields; the record
/// keeps its 1-based physical line number. Blank lines and `#` comment
/// lines are skipped but still counted.
pub fn read_records(path: &Path, options: ReadOptions) -> Result<ReadResult> {
    let file = File::open(path).map_err(|e| NtmError::io(path, e))?;
    read_records_from(BufReader::new(file), options, path)
}

/// Reader-based variant of [`read_records`]; `path` is used for error
/// context only.
pub fn read_records_from(
    reader: impl BufRead,
    options: ReadOptions,
    path: &Path,
) -> Result<ReadResult> {
    let mut records = Vec::new();
    let mut lines_read = 0u64;

    for line in reader.lines() {
        let line = line.map_err(|e| NtmError::io(path, e))?;
        lines_read += 1;

        let line = line.trim();
        if line.len() < MIN_LINE_LEN {
            debug!(line_no = lines_read, "skipping blank line");
            continue;
        }
        if line.starts_with('#') {
            debug!(line_no = lines_read, "skipping comment line");
            continue;
        }

        let line = line.to_uppercase();
        let fields = if options.quote_aware {
            split_quoted(&line)
        } else {
            split_plain(&line)
        };
        records.push(Record::new(fields, lines_read));
    }

    Ok(ReadResult {
        records,
        lines_read,
    })
}

fn split_plain(line: &str) -> Vec<String> {
    line.split(',').map(str::to_string).collect()
}

/// Quote-aware splitting via the `csv` reader; falls back to plain
/// splitting when a line is not parseable as CSV.
fn split_quoted(line: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    match reader.records().next() {
        Some(Ok(row)) => row.iter().map(str::to_string).collect(),
        _ => split_plain(line),
    }
}
