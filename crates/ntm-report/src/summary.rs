//! Whole-run accumulation and summary counters.

use std::collections::BTreeSet;

use ntm_extract::audit::AuditSink;
use ntm_extract::engine::{ExtractOptions, extract_record};
use ntm_model::{MentionMap, Record};
use serde::Serialize;

/// Accumulate every mention in a patient's records, with no pairing
/// requirement: species and methods are merged independently across the
/// batch. This is the summary-mode counterpart to
/// [`crate::patient::process_patient`].
pub fn accumulate_patient(
    records: &[Record],
    options: ExtractOptions,
    audit: &mut dyn AuditSink,
) -> (MentionMap, MentionMap) {
    let mut species = MentionMap::new();
    let mut methods = MentionMap::new();
    for record in records {
        let (rec_species, rec_methods) = extract_record(record, options, audit);
        species.merge(&rec_species);
        methods.merge(&rec_methods);
    }
    (species, methods)
}

/// Counters and totals for one processing run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub lines_processed: u64,
    pub patients_processed: usize,
    pub unique_patient_ids: usize,
    pub diagnosed_patients: usize,
    pub undiagnosed_patients: usize,
    pub records_written: usize,
    /// Species mentions across the whole run.
    pub species: MentionMap,
    /// Method mentions across the whole run.
    pub methods: MentionMap,
    /// Patient ids for which no species was diagnosed.
    pub undiagnosed_ids: BTreeSet<String>,
}

impl RunSummary {
    /// Fold one patient's accumulated maps into the run totals.
    pub fn absorb_patient(&mut self, patient_id: &str, species: &MentionMap, methods: &MentionMap) {
        self.patients_processed += 1;
        if species.is_empty() {
            self.undiagnosed_patients += 1;
            self.undiagnosed_ids.insert(patient_id.to_string());
        } else {
            self.diagnosed_patients += 1;
        }
        self.species.merge(species);
        self.methods.merge(methods);
    }
}

/// One entity with its mention count, for count-ordered display.
#[derive(Debug, Clone, Serialize)]
pub struct CountedKey {
    pub count: usize,
    pub key: String,
    pub lines: Vec<u64>,
}

/// Map entries sorted ascending by mention count, then key.
pub fn counted_keys(map: &MentionMap) -> Vec<CountedKey> {
    let mut counted: Vec<CountedKey> = map
        .iter()
        .map(|(key, lines)| CountedKey {
            count: lines.len(),
            key: key.clone(),
            lines: lines.clone(),
        })
        .collect();
    counted.sort_by(|a, b| a.count.cmp(&b.count).then_with(|| a.key.cmp(&b.key)));
    counted
}
