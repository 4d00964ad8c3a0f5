//! Per-patient diagnosis aggregation.
//!
//! A patient's batch of records is reduced to a map from species to the
//! methods that identified it, with line-number provenance. Records that
//! yield a species but no method are skipped (and logged) rather than
//! guessed at; demographic columns are taken from the patient's last
//! record.

use std::collections::BTreeMap;

use ntm_extract::audit::AuditSink;
use ntm_extract::engine::{ExtractOptions, extract_record};
use ntm_model::record::columns;
use ntm_model::Record;
use serde::Serialize;
use tracing::warn;

/// Placeholder date used when a patient has no dated records.
const NO_DATE: &str = "NO DATE";

/// Rendering of absent demographic columns.
const INCOMPLETE: &str = "incomplete";

/// Methods and provenance for one diagnosed species.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpeciesDiagnosis {
    /// Identification methods in first-seen order, de-duplicated.
    pub methods: Vec<String>,
    /// Source lines mentioning the species, extended across records.
    pub lines: Vec<u64>,
}

/// Demographic columns of the patient's last record.
#[derive(Debug, Clone, Serialize)]
pub struct Demographics {
    pub age: String,
    pub gender: String,
    pub race: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub marital: String,
}

impl Demographics {
    fn from_record(record: &Record) -> Option<Self> {
        if record.len() <= columns::RACE {
            return None;
        }
        Some(Self {
            age: record.field_or_empty(columns::AGE).to_string(),
            gender: record.field_or_empty(columns::GENDER).to_string(),
            race: record.field_or_empty(columns::RACE).to_string(),
            city: record.field_or_empty(columns::CITY).to_string(),
            state: record.field_or_empty(columns::STATE).to_string(),
            zip: record.field_or_empty(columns::ZIP).to_string(),
            marital: record.field_or_empty(columns::MARITAL).to_string(),
        })
    }

    fn render(&self) -> String {
        [
            &self.age,
            &self.gender,
            &self.race,
            &self.city,
            &self.state,
            &self.zip,
            &self.marital,
        ]
        .map(String::as_str)
        .join(", ")
    }
}

/// A patient's combined diagnosis.
#[derive(Debug, Clone, Serialize)]
pub struct PatientDiagnosis {
    pub patient_id: String,
    /// Date of the patient's last dated record.
    pub record_date: String,
    pub species: BTreeMap<String, SpeciesDiagnosis>,
    pub demographics: Option<Demographics>,
}

/// One output row: a (species, method) pair for a patient.
#[derive(Debug, Clone, Serialize)]
pub struct PatientRow {
    pub patient_id: String,
    pub record_date: String,
    pub species: String,
    pub method: String,
    pub demographics: String,
}

impl PatientDiagnosis {
    pub fn is_undiagnosed(&self) -> bool {
        self.species.is_empty()
    }

    /// Number of (species, method) rows this diagnosis produces.
    pub fn records_written(&self) -> usize {
        self.species.values().map(|d| d.methods.len()).sum()
    }

    fn rendered_demographics(&self) -> String {
        self.demographics
            .as_ref()
            .map_or_else(|| INCOMPLETE.to_string(), Demographics::render)
    }

    /// One row per (species, method) pair; undiagnosed patients yield a
    /// single row with empty species and method when requested.
    pub fn rows(&self, include_undiagnosed: bool) -> Vec<PatientRow> {
        let demographics = self.rendered_demographics();
        if self.is_undiagnosed() {
            if include_undiagnosed {
                return vec![PatientRow {
                    patient_id: self.patient_id.clone(),
                    record_date: self.record_date.clone(),
                    species: String::new(),
                    method: String::new(),
                    demographics,
                }];
            }
            return Vec::new();
        }
        let mut rows = Vec::new();
        for (species, diagnosis) in &self.species {
            for method in &diagnosis.methods {
                rows.push(PatientRow {
                    patient_id: self.patient_id.clone(),
                    record_date: self.record_date.clone(),
                    species: species.clone(),
                    method: method.clone(),
                    demographics: demographics.clone(),
                });
            }
        }
        rows
    }
}

/// Combine one patient's records into a [`PatientDiagnosis`].
///
/// Records without a date column are skipped with a warning. Records whose
/// extraction yields no method contribute nothing; the skip is logged when
/// a species was present, since that is a record the rules could not pair.
pub fn process_patient(
    records: &[Record],
    options: ExtractOptions,
    audit: &mut dyn AuditSink,
) -> PatientDiagnosis {
    let patient_id = records
        .first()
        .map(|r| r.patient_id().to_string())
        .unwrap_or_default();
    let mut species: BTreeMap<String, SpeciesDiagnosis> = BTreeMap::new();
    let mut record_date = NO_DATE.to_string();

    for record in records {
        let Some(date) = record.field(columns::DATE) else {
            warn!(
                %patient_id,
                line_no = record.line_no(),
                "skipping record with no date field"
            );
            continue;
        };
        record_date = date.to_string();

        let (rec_species, rec_methods) = extract_record(record, options, audit);
        if rec_methods.is_empty() {
            if !rec_species.is_empty() {
                warn!(
                    %patient_id,
                    line_no = record.line_no(),
                    species = %rec_species.joined_keys(),
                    "skipping record with species but no method"
                );
            }
            continue;
        }

        for (name, lines) in &rec_species {
            let entry = species.entry(name.clone()).or_default();
            for method in rec_methods.keys() {
                if !entry.methods.iter().any(|m| m == method) {
                    entry.methods.push(method.to_string());
                }
            }
            entry.lines.extend_from_slice(lines);
        }
    }

    let demographics = records.last().and_then(Demographics::from_record);
    if let Some(last) = records.last() {
        check_age(last);
    }

    PatientDiagnosis {
        patient_id,
        record_date,
        species,
        demographics,
    }
}

/// The age column should parse as an integer; a bad value is worth a
/// warning but never fatal.
fn check_age(record: &Record) {
    let age = record.field(columns::AGE).unwrap_or("---");
    if age.parse::<i64>().is_err() {
        warn!(
            patient_id = record.patient_id(),
            line_no = record.line_no(),
            age,
            "bad age value"
        );
    }
}
