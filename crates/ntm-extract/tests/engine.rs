use ntm_extract::audit::{AuditSink, CsvAudit, EXTRACTED_FILE, IGNORED_FILE, NoopAudit};
use ntm_extract::engine::{ExtractOptions, extract_record};
use ntm_model::{MentionMap, Record};

/// Audit sink that remembers everything it was told, for assertions.
#[derive(Debug, Default)]
struct RecordingAudit {
    outcomes: Vec<(u64, bool)>,
    skips: Vec<(u64, usize, String)>,
}

impl AuditSink for RecordingAudit {
    fn record_outcome(&mut self, record: &Record, species: &MentionMap, methods: &MentionMap) {
        let extracted = !species.is_empty() && !methods.is_empty();
        self.outcomes.push((record.line_no(), extracted));
    }

    fn phrase_skipped(&mut self, record: &Record, phrase_hits: usize, context: &str) {
        self.skips
            .push((record.line_no(), phrase_hits, context.to_string()));
    }
}

/// Build an 18-column record with `text` in the given diagnosis column.
fn record_with_text(col: usize, text: &str, line_no: u64) -> Record {
    let mut fields = vec![String::new(); 18];
    fields[0] = "PATIENT1".to_string();
    fields[col] = text.to_uppercase();
    Record::new(fields, line_no)
}

fn extract(
    col: usize,
    text: &str,
    line_no: u64,
    options: ExtractOptions,
) -> (MentionMap, MentionMap) {
    extract_record(&record_with_text(col, text, line_no), options, &mut NoopAudit)
}

#[test]
fn short_records_yield_empty_maps_and_no_audit_row() {
    let record = Record::new(vec!["P1".to_string(); 10], 5);
    let mut audit = RecordingAudit::default();
    let (species, methods) = extract_record(&record, ExtractOptions::default(), &mut audit);
    assert!(species.is_empty());
    assert!(methods.is_empty());
    assert!(audit.outcomes.is_empty());
}

#[test]
fn compound_species_with_explicit_method() {
    let (species, methods) = extract(
        8,
        "MYCOBACTERIUM AVIUM COMPLEX IDENTIFIED BY GENPROBE",
        4,
        ExtractOptions::default(),
    );
    assert_eq!(species.lines("M. AVIUM_COMPLEX"), Some(&[4][..]));
    assert_eq!(species.len(), 1);
    assert_eq!(methods.lines("GENPROBE"), Some(&[4][..]));
    assert_eq!(methods.len(), 1);
}

#[test]
fn abscessus_group_promotion_and_using_trigger() {
    let (species, methods) = extract(
        8,
        "M ABSCESSUS GROUP ISOLATED USING 16S",
        9,
        ExtractOptions::default(),
    );
    assert_eq!(species.lines("M. ABSCESSUS_GROUP"), Some(&[9][..]));
    assert_eq!(methods.lines("16S"), Some(&[9][..]));
}

#[test]
fn trigger_ending_a_sentence_records_empty_method() {
    let (species, methods) = extract(9, "M AVIUM IDENTIFIED BY", 12, ExtractOptions::default());
    assert_eq!(species.lines("M. AVIUM"), Some(&[12][..]));
    assert_eq!(methods.lines(""), Some(&[12][..]));
    assert_eq!(methods.len(), 1);

    // The empty name is not on the allow-list, so the restricted mode
    // drops it (and outside the primary column no default applies).
    let (species, methods) = extract(
        9,
        "M AVIUM IDENTIFIED BY",
        12,
        ExtractOptions {
            recognized_methods_only: true,
        },
    );
    assert_eq!(species.lines("M. AVIUM"), Some(&[12][..]));
    assert!(methods.is_empty());
}

#[test]
fn negation_anywhere_suppresses_every_sentence() {
    let (species, methods) = extract(
        8,
        "CULTURE NEGATIVE. MYCOBACTERIUM AVIUM COMPLEX IDENTIFIED BY GENPROBE",
        2,
        ExtractOptions::default(),
    );
    assert!(species.is_empty());
    assert!(methods.is_empty());

    let (species, methods) = extract(
        8,
        "UNABLE TO IDENTIFY. M KANSASII FOUND BY RPOB",
        3,
        ExtractOptions::default(),
    );
    assert!(species.is_empty());
    assert!(methods.is_empty());
}

#[test]
fn mycolic_acid_resembles_full_phrase() {
    let record = record_with_text(
        8,
        "MYCOLIC ACID PROFILE MOST CLOSELY RESEMBLES M AVIUM COMPLEX",
        6,
    );
    let mut audit = RecordingAudit::default();
    let (species, _methods) = extract_record(&record, ExtractOptions::default(), &mut audit);
    assert_eq!(species.lines("M. AVIUM_COMPLEX"), Some(&[6][..]));
    assert_eq!(species.len(), 1);
    assert!(audit.skips.is_empty());
}

#[test]
fn mycolic_acid_partial_phrase_is_rejected_and_logged() {
    // Only MOST and RESEMBLES of the four expected phrase words appear.
    let record = record_with_text(8, "MYCOLIC ACID MOST RESEMBLES M AVIUM COMPLEX", 7);
    let mut audit = RecordingAudit::default();
    let (species, _methods) = extract_record(&record, ExtractOptions::default(), &mut audit);
    assert!(species.is_empty());
    assert_eq!(audit.skips.len(), 1);
    let (line_no, phrase_hits, context) = &audit.skips[0];
    assert_eq!(*line_no, 7);
    assert_eq!(*phrase_hits, 2);
    assert!(context.contains("RESEMBLES"));
}

#[test]
fn misspelled_phrase_word_is_tolerated() {
    // PROFILE garbled; 3 of 4 phrase words still match.
    let (species, _methods) = extract(
        8,
        "MYCOLIC ACID PROFLE MOST CLOSELY RESEMBLES M AVIUM COMPLEX",
        8,
        ExtractOptions::default(),
    );
    assert_eq!(species.lines("M. AVIUM_COMPLEX"), Some(&[8][..]));
}

#[test]
fn genprobe_default_applies_to_primary_column_only() {
    let (species, methods) = extract(8, "MYCOBACTERIUM KANSASII ISOLATED", 11, ExtractOptions::default());
    assert_eq!(species.lines("M. KANSASII"), Some(&[11][..]));
    assert_eq!(methods.lines("GENPROBE"), Some(&[11][..]));
    assert_eq!(methods.len(), 1);

    // The same text in a fallback column gets no synthetic method.
    let (species, methods) = extract(9, "MYCOBACTERIUM KANSASII ISOLATED", 12, ExtractOptions::default());
    assert_eq!(species.lines("M. KANSASII"), Some(&[12][..]));
    assert!(methods.is_empty());
}

#[test]
fn column_fallback_order_is_respected() {
    let mut fields = vec![String::new(); 18];
    fields[0] = "PATIENT1".to_string();
    fields[10] = "M GORDONAE SEEN BY BIOCHEMICALS".to_string();
    let record = Record::new(fields, 13);
    let (species, methods) = extract_record(&record, ExtractOptions::default(), &mut NoopAudit);
    assert_eq!(species.lines("M. GORDONAE"), Some(&[13][..]));
    assert_eq!(methods.lines("BIOCHEMICALS"), Some(&[13][..]));
}

#[test]
fn recognized_only_mode_filters_methods_but_not_species() {
    let options = ExtractOptions {
        recognized_methods_only: true,
    };
    let (species, methods) = extract(9, "M AVIUM IDENTIFIED BY SEQUENCING", 21, options);
    assert_eq!(species.lines("M. AVIUM"), Some(&[21][..]));
    assert!(methods.is_empty());

    let (_species, methods) = extract(9, "M AVIUM IDENTIFIED BY MALDI-TOF", 22, options);
    assert_eq!(methods.lines("MALDI-TOF"), Some(&[22][..]));
}

#[test]
fn multiple_simple_species_in_one_sentence_all_record() {
    let (species, _methods) = extract(
        8,
        "M FORTUITUM AND M CHELONAE PRESENT",
        31,
        ExtractOptions::default(),
    );
    assert_eq!(species.lines("M. FORTUITUM"), Some(&[31][..]));
    assert_eq!(species.lines("M. CHELONAE"), Some(&[31][..]));
}

#[test]
fn compound_match_suppresses_simple_species_for_rest_of_sentence() {
    // After the compound rule fires, the trailing M AVIUM COMPLEX tokens
    // must not produce a second (identical) simple mention, but a method in
    // the same sentence is still picked up.
    let (species, methods) = extract(
        8,
        "MYCOLIC ACID PROFILE MOST CLOSELY RESEMBLES M AVIUM COMPLEX CONFIRMED BY GENPROBE",
        41,
        ExtractOptions::default(),
    );
    assert_eq!(species.lines("M. AVIUM_COMPLEX"), Some(&[41][..]));
    assert_eq!(species.len(), 1);
    assert_eq!(methods.lines("GENPROBE"), Some(&[41][..]));
}

#[test]
fn suppression_resets_per_sentence() {
    let (species, _methods) = extract(
        8,
        "MYCOLIC ACID PROFILE MOST CLOSELY RESEMBLES M AVIUM COMPLEX. M KANSASII ALSO SEEN",
        42,
        ExtractOptions::default(),
    );
    assert!(species.contains_key("M. AVIUM_COMPLEX"));
    assert!(species.contains_key("M. KANSASII"));
}

#[test]
fn trailing_intro_token_without_species_name_is_ignored() {
    let (species, _methods) = extract(8, "ORGANISM CONSISTENT WITH M", 51, ExtractOptions::default());
    assert!(species.is_empty());
}

#[test]
fn leading_genus_abbreviation_stays_in_one_sentence() {
    let record = record_with_text(8, "M. AVIUM COMPLEX SEEN", 52);
    let (species, _methods) = extract_record(&record, ExtractOptions::default(), &mut NoopAudit);
    assert_eq!(species.lines("M. AVIUM_COMPLEX"), Some(&[52][..]));
}

#[test]
fn extraction_is_idempotent() {
    let record = record_with_text(8, "M AVIUM COMPLEX FOUND BY GENPROBE", 61);
    let options = ExtractOptions::default();
    let first = extract_record(&record, options, &mut NoopAudit);
    let second = extract_record(&record, options, &mut NoopAudit);
    assert_eq!(first, second);
}

#[test]
fn comma_marker_tokens_do_not_match_rules() {
    let (species, _methods) = extract(
        8,
        "SMEAR<COMMA> POSITIVE M AVIUM",
        71,
        ExtractOptions::default(),
    );
    assert_eq!(species.lines("M. AVIUM"), Some(&[71][..]));
}

#[test]
fn csv_audit_routes_records_by_outcome() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let mut audit = CsvAudit::new(dir.path());
    audit.begin_run().expect("begin run");

    extract_record(
        &record_with_text(8, "M AVIUM COMPLEX IDENTIFIED BY GENPROBE", 2),
        ExtractOptions::default(),
        &mut audit,
    );
    extract_record(
        &record_with_text(8, "NO GROWTH OBSERVED", 3),
        ExtractOptions::default(),
        &mut audit,
    );

    let extracted = std::fs::read_to_string(dir.path().join(EXTRACTED_FILE)).expect("read file");
    let ignored = std::fs::read_to_string(dir.path().join(IGNORED_FILE)).expect("read file");
    assert!(extracted.starts_with("2,[M. AVIUM_COMPLEX],[GENPROBE],"));
    assert!(ignored.starts_with("3,[],[],"));
}

#[test]
fn begin_run_truncates_previous_outputs() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let mut audit = CsvAudit::new(dir.path());
    audit.begin_run().expect("begin run");
    extract_record(
        &record_with_text(8, "NO GROWTH OBSERVED", 3),
        ExtractOptions::default(),
        &mut audit,
    );
    audit.begin_run().expect("begin run again");
    let ignored = std::fs::read_to_string(dir.path().join(IGNORED_FILE)).expect("read file");
    assert!(ignored.is_empty());
}
