#![deny(unsafe_code)]

//! Rule-based extraction of diagnosed species and identification methods
//! from free-text diagnosis fields.
//!
//! The scanner is deliberately lexical: narrative text is upper-cased,
//! split into sentences and tokens, and matched against a small ordered set
//! of phrase rules (compound species lookahead, simple species intro words,
//! `BY`/`USING` method triggers). No statistical model is involved; every
//! match is explainable by a rule and carries the source line number of the
//! record it came from.

pub mod audit;
pub mod engine;
pub mod text;

pub use audit::{AuditSink, CsvAudit, NoopAudit};
pub use engine::{ExtractOptions, extract_record};
pub use text::{normalize_narrative, split_sentences, strip_token};
