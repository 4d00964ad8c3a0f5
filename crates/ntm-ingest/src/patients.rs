//! Grouping of consecutive records into per-patient batches.

use ntm_model::Record;

/// All consecutive records for one patient id, in input order.
///
/// The input data is expected to be grouped by patient; a patient id that
/// reappears later in the file starts a new batch, exactly as a streaming
/// group-by would see it.
#[derive(Debug, Clone)]
pub struct PatientBatch {
    pub patient_id: String,
    pub records: Vec<Record>,
}

/// Split records into batches of consecutive equal patient ids.
pub fn batch_by_patient(records: Vec<Record>) -> Vec<PatientBatch> {
    let mut batches: Vec<PatientBatch> = Vec::new();
    for record in records {
        let patient_id = record.patient_id().to_string();
        match batches.last_mut() {
            Some(batch) if batch.patient_id == patient_id => batch.records.push(record),
            _ => batches.push(PatientBatch {
                patient_id,
                records: vec![record],
            }),
        }
    }
    batches
}
