//! Input records: one row of the patient dataset plus its source line number.

use serde::Serialize;

/// Field indices used by the extraction and reporting layers.
///
/// These match the 2018 export layout of the source dataset. The four
/// diagnosis columns form a fixed fallback order: the first non-empty one
/// supplies the narrative text that is scanned for species and methods.
pub mod columns {
    /// Patient identifier.
    pub const PATIENT_ID: usize = 0;
    /// City of subject.
    pub const CITY: usize = 3;
    /// State of subject.
    pub const STATE: usize = 4;
    /// ZIP code of subject.
    pub const ZIP: usize = 5;
    /// Marital status of subject.
    pub const MARITAL: usize = 6;
    /// Record date.
    pub const DATE: usize = 7;
    /// GENPROBE identification text result (primary diagnosis column).
    pub const GENPROBE_TEXT: usize = 8;
    /// Identification text result (first fallback).
    pub const IDENT_TEXT: usize = 9;
    /// HPLC identification no. 1 text result (second fallback).
    pub const HPLC_1: usize = 10;
    /// HPLC identification no. 2 text result (third fallback).
    pub const HPLC_2: usize = 11;
    /// Current age of subject.
    pub const AGE: usize = 15;
    /// Gender of subject.
    pub const GENDER: usize = 16;
    /// Race of subject.
    pub const RACE: usize = 17;

    /// Diagnosis columns in fallback order.
    pub const DIAGNOSIS_FALLBACK: [usize; 4] = [GENPROBE_TEXT, IDENT_TEXT, HPLC_1, HPLC_2];
}

/// One row of the input dataset.
///
/// Fields are positionally significant and already upper-cased by the
/// reader. The line number is the 1-based physical line in the source file
/// and travels with the record as provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    fields: Vec<String>,
    line_no: u64,
}

impl Record {
    pub fn new(fields: Vec<String>, line_no: u64) -> Self {
        Self { fields, line_no }
    }

    pub fn line_no(&self) -> u64 {
        self.line_no
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field at `idx`, or `None` when the row is too short.
    pub fn field(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }

    /// Field at `idx`, or `""` when the row is too short.
    pub fn field_or_empty(&self, idx: usize) -> &str {
        self.field(idx).unwrap_or("")
    }

    /// Patient identifier (first column), or `""` for an empty row.
    pub fn patient_id(&self) -> &str {
        self.field_or_empty(columns::PATIENT_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_access_is_bounds_checked() {
        let rec = Record::new(vec!["P1".to_string(), "X".to_string()], 3);
        assert_eq!(rec.patient_id(), "P1");
        assert_eq!(rec.field(1), Some("X"));
        assert_eq!(rec.field(99), None);
        assert_eq!(rec.field_or_empty(99), "");
        assert_eq!(rec.line_no(), 3);
    }
}
