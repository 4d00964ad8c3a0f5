//! The entity extraction engine.
//!
//! One call processes one record: pick the diagnosis column, split its text
//! into sentences, and run the ordered phrase rules over every token. The
//! result is a pair of [`MentionMap`]s (species, methods) keyed by
//! normalized entity name with source-line provenance.

use ntm_model::record::columns;
use ntm_model::{MentionMap, Record, is_recognized_method, methods::DEFAULT_METHOD};
use tracing::debug;

use crate::audit::AuditSink;
use crate::text::{normalize_narrative, split_sentences, strip_token, tokenize};

/// A record must carry at least this many fields to be scanned at all.
pub const MIN_FIELDS: usize = 11;

/// Species key prefix; every species key reads `"M. <NAME>"`.
const SPECIES_PREFIX: &str = "M.";

/// Intro tokens that announce a species name in the next token.
const SPECIES_INTROS: [&str; 3] = ["MYCOBACTERIUM", "M.", "M"];

/// Tokens that announce an identification method in the next token.
const METHOD_INTROS: [&str; 2] = ["BY", "USING"];

/// The order-insensitive phrase expected between `MYCOLIC ACID` and the
/// organism name; at least [`PHRASE_MIN_MATCHES`] of these must appear in
/// the four tokens after `ACID` or the compound match is rejected.
const RESEMBLES_PHRASE: [&str; 4] = ["PROFILE", "MOST", "CLOSELY", "RESEMBLES"];

/// Three of four tolerates one misspelled or dropped word.
const PHRASE_MIN_MATCHES: usize = 3;

/// Token alternatives for the consecutive `M AVIUM COMPLEX` window scanned
/// after a successful `MYCOLIC ACID ... RESEMBLES` phrase.
const AVIUM_COMPLEX_WINDOW: [&[&str]; 3] = [&["M", "M.", "MYCOBACTERIUM"], &["AVIUM"], &["COMPLEX"]];

/// Extraction mode flags, passed explicitly per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Discard matched methods that are not on the recognized allow-list.
    pub recognized_methods_only: bool,
}

/// Per-sentence species scanning state.
///
/// Species rules run only while `Scanning`. A successful compound-species
/// match ends species scanning for the rest of the sentence, as does a
/// rejected partial `MYCOLIC ACID` phrase (the trailing organism name in a
/// rejected phrase must not be credited as a simple mention). Method
/// scanning is unaffected by this state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpeciesScan {
    Scanning,
    Suppressed,
}

/// Extract species and method mentions from one record.
///
/// Records with fewer than [`MIN_FIELDS`] fields yield two empty maps
/// without touching the audit sink. The returned maps are a pure function
/// of the record and options; the audit sink is the only side effect.
pub fn extract_record(
    record: &Record,
    options: ExtractOptions,
    audit: &mut dyn AuditSink,
) -> (MentionMap, MentionMap) {
    let mut species = MentionMap::new();
    let mut methods = MentionMap::new();
    if record.len() < MIN_FIELDS {
        return (species, methods);
    }

    let line_no = record.line_no();
    let (text, diagnosis_col) = select_diagnosis_column(record);
    let text = normalize_narrative(text);

    // A negation anywhere in the field suppresses every sentence of it.
    let negated = text.contains("NEGATIVE") || text.contains("UNABLE");

    for sentence in split_sentences(&text) {
        if negated {
            debug!(line_no, "skipping negated diagnosis text");
            continue;
        }
        scan_sentence(
            sentence,
            record,
            options,
            &mut species,
            &mut methods,
            audit,
        );
    }

    // A species found in the primary column without an explicit method is
    // assumed to have been identified by GENPROBE.
    if !species.is_empty() && methods.is_empty() && diagnosis_col == columns::GENPROBE_TEXT {
        methods.note(DEFAULT_METHOD, line_no);
    }

    audit.record_outcome(record, &species, &methods);

    (species, methods)
}

/// First non-empty diagnosis column in fallback order, with its index.
/// Falls back to the last column (empty or not) when all are empty.
fn select_diagnosis_column(record: &Record) -> (&str, usize) {
    for &col in &columns::DIAGNOSIS_FALLBACK {
        let text = record.field_or_empty(col);
        if !text.is_empty() {
            return (text, col);
        }
    }
    (record.field_or_empty(columns::HPLC_2), columns::HPLC_2)
}

fn scan_sentence(
    sentence: &str,
    record: &Record,
    options: ExtractOptions,
    species: &mut MentionMap,
    methods: &mut MentionMap,
    audit: &mut dyn AuditSink,
) {
    let line_no = record.line_no();
    let words = tokenize(sentence);
    let token = |j: usize| words.get(j).map(|w| strip_token(w)).unwrap_or("");

    let mut state = SpeciesScan::Scanning;

    for i in 0..words.len() {
        let w = token(i);
        let next_word = token(i + 1);
        let third_word = token(i + 2);

        // Rule (a): "MYCOLIC ACID PROFILE MOST CLOSELY RESEMBLES ... M
        // AVIUM COMPLEX", tolerating one garbled phrase word.
        if state == SpeciesScan::Scanning && w == "MYCOLIC" && next_word == "ACID" {
            let phrase_hits = (i + 2..i + 6)
                .filter(|&j| RESEMBLES_PHRASE.contains(&token(j)))
                .count();
            if phrase_hits < PHRASE_MIN_MATCHES {
                let context = words.get(i + 2..).unwrap_or(&[]).join(" ");
                audit.phrase_skipped(record, phrase_hits, &context);
                state = SpeciesScan::Suppressed;
                continue;
            }

            let window_start = i + 3;
            let matched = (window_start..words.len()).any(|j| {
                AVIUM_COMPLEX_WINDOW
                    .iter()
                    .enumerate()
                    .all(|(k, alternatives)| alternatives.contains(&token(j + k)))
            });
            if matched {
                species.note(format!("{SPECIES_PREFIX} AVIUM_COMPLEX"), line_no);
                state = SpeciesScan::Suppressed;
            }
        }

        // Rule (b): an intro token followed by the species name, with the
        // two-token lookaheads promoting the recognized compound forms.
        if state == SpeciesScan::Scanning
            && SPECIES_INTROS.contains(&w)
            && !next_word.is_empty()
        {
            let species_name = match (next_word, third_word) {
                ("AVIUM", "COMPLEX") => "AVIUM_COMPLEX",
                ("ABSCESSUS", "GROUP") => "ABSCESSUS_GROUP",
                _ => next_word,
            };
            species.note(format!("{SPECIES_PREFIX} {species_name}"), line_no);
        }

        // Rule (c): method trigger, independent of the species state.
        if METHOD_INTROS.contains(&w)
            && (!options.recognized_methods_only || is_recognized_method(next_word))
        {
            methods.note(next_word, line_no);
        }
    }
}
