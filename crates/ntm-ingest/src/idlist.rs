//! External patient-id lists used to split a dataset into matching and
//! non-matching records.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ntm_model::{NtmError, Record, Result};

/// Read a CSV file whose first column holds a patient id per row.
/// Ids are trimmed and upper-cased.
pub fn read_id_file(path: &Path) -> Result<BTreeSet<String>> {
    let file = File::open(path).map_err(|e| NtmError::io(path, e))?;
    let mut ids = BTreeSet::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| NtmError::io(path, e))?;
        let id = line.split(',').next().unwrap_or("").trim().to_uppercase();
        if !id.is_empty() {
            ids.insert(id);
        }
    }
    Ok(ids)
}

/// Split records into those whose patient id is in `ids` and the rest,
/// preserving order within each side.
pub fn partition_by_ids(
    records: Vec<Record>,
    ids: &BTreeSet<String>,
) -> (Vec<Record>, Vec<Record>) {
    records
        .into_iter()
        .partition(|record| ids.contains(record.patient_id()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_by_membership() {
        let ids: BTreeSet<String> = ["A".to_string()].into_iter().collect();
        let records = vec![
            Record::new(vec!["A".to_string()], 1),
            Record::new(vec!["B".to_string()], 2),
        ];
        let (matching, rest) = partition_by_ids(records, &ids);
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].patient_id(), "A");
        assert_eq!(rest[0].patient_id(), "B");
    }
}
