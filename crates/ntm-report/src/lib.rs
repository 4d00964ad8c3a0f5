#![deny(unsafe_code)]

//! Aggregation of per-record extraction results into per-patient
//! diagnoses and whole-run summaries.

pub mod patient;
pub mod summary;

pub use patient::{PatientDiagnosis, PatientRow, SpeciesDiagnosis, process_patient};
pub use summary::{CountedKey, RunSummary, accumulate_patient, counted_keys};
