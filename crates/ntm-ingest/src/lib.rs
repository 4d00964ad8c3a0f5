#![deny(unsafe_code)]

//! Record ingestion for the NTM extraction pipeline.
//!
//! Reads delimited patient data files into [`ntm_model::Record`]s with
//! 1-based physical line numbers, groups consecutive records into
//! per-patient batches, and filters record sets against an external list of
//! patient ids.

pub mod idlist;
pub mod patients;
pub mod reader;

pub use idlist::{partition_by_ids, read_id_file};
pub use patients::{PatientBatch, batch_by_patient};
pub use reader::{ReadOptions, ReadResult, read_records, read_records_from};
