//! Extraction audit side channel.
//!
//! Each processed record is mirrored to one of two audit outputs so a
//! reviewer can validate the rules against real data: records where both a
//! species and a method were found land in `debug_extracted.csv`, the rest
//! in `debug_ignored.csv`. Rejected partial phrase matches are reported
//! here too. The sink is an explicit collaborator passed by the caller;
//! the caller decides when a run starts (and so when the outputs reset)
//! rather than inferring it from line numbers.
//!
//! Audit writes must never abort extraction: failures are logged and
//! swallowed. Single-threaded, append-only use only.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use ntm_model::{MentionMap, Record, Result};
use tracing::warn;

/// File receiving records with both a species and a method.
pub const EXTRACTED_FILE: &str = "debug_extracted.csv";

/// File receiving records where extraction found no usable pair.
pub const IGNORED_FILE: &str = "debug_ignored.csv";

/// Observer for per-record extraction outcomes and rejected matches.
pub trait AuditSink {
    /// Start a new run, truncating any prior outputs.
    fn begin_run(&mut self) -> Result<()> {
        Ok(())
    }

    /// One record has been fully processed.
    fn record_outcome(&mut self, record: &Record, species: &MentionMap, methods: &MentionMap);

    /// A `MYCOLIC ACID` phrase matched fewer than the required number of
    /// expected words and was rejected. `context` is the raw text scanned.
    fn phrase_skipped(&mut self, record: &Record, phrase_hits: usize, context: &str);
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAudit;

impl AuditSink for NoopAudit {
    fn record_outcome(&mut self, _record: &Record, _species: &MentionMap, _methods: &MentionMap) {}

    fn phrase_skipped(&mut self, _record: &Record, _phrase_hits: usize, _context: &str) {}
}

/// Filesystem sink writing the two audit CSV files under one directory.
#[derive(Debug)]
pub struct CsvAudit {
    extracted_path: PathBuf,
    ignored_path: PathBuf,
}

impl CsvAudit {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            extracted_path: dir.join(EXTRACTED_FILE),
            ignored_path: dir.join(IGNORED_FILE),
        }
    }

    fn append_row(path: &Path, row: &str) {
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| writeln!(file, "{row}"));
        if let Err(error) = result {
            warn!(path = %path.display(), %error, "audit write failed");
        }
    }
}

impl AuditSink for CsvAudit {
    fn begin_run(&mut self) -> Result<()> {
        for path in [&self.extracted_path, &self.ignored_path] {
            File::create(path).map_err(|e| ntm_model::NtmError::io(path, e))?;
        }
        Ok(())
    }

    fn record_outcome(&mut self, record: &Record, species: &MentionMap, methods: &MentionMap) {
        let row = format!(
            "{},[{}],[{}],{}",
            record.line_no(),
            species.joined_keys(),
            methods.joined_keys(),
            record.fields().join(",")
        );
        let path = if !species.is_empty() && !methods.is_empty() {
            &self.extracted_path
        } else {
            &self.ignored_path
        };
        Self::append_row(path, &row);
    }

    fn phrase_skipped(&mut self, record: &Record, phrase_hits: usize, context: &str) {
        warn!(
            patient_id = record.patient_id(),
            line_no = record.line_no(),
            phrase_hits,
            context,
            "skipping partial phrase match after MYCOLIC ACID"
        );
    }
}
