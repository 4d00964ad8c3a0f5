//! Subcommand implementations.
//!
//! Each command returns its data; printing happens in `main` so the
//! implementations stay testable.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use ntm_extract::audit::{AuditSink, CsvAudit, NoopAudit};
use ntm_extract::engine::ExtractOptions;
use ntm_ingest::reader::{ReadOptions, ReadResult, read_records};
use ntm_ingest::{batch_by_patient, partition_by_ids, read_id_file};
use ntm_model::Record;
use ntm_report::patient::{PatientRow, process_patient};
use ntm_report::summary::{RunSummary, accumulate_patient};

use crate::cli::{FilterArgs, PerPatientArgs, SummaryArgs};

/// Result of the `per-patient` command: the output rows plus run counters.
pub struct PerPatientOutput {
    pub rows: Vec<PatientRow>,
    pub summary: RunSummary,
}

pub fn run_per_patient(args: &PerPatientArgs) -> Result<PerPatientOutput> {
    let span = info_span!("per_patient", input = %args.input.display());
    let _guard = span.enter();

    let options = ExtractOptions {
        recognized_methods_only: args.recognized_only,
    };
    let read = read_input(&args.input, args.quoted)?;
    let mut audit = open_audit(args.audit_dir.as_deref())?;

    let mut summary = RunSummary {
        lines_processed: read.lines_read,
        unique_patient_ids: unique_patient_count(&read.records),
        ..RunSummary::default()
    };
    let mut rows = Vec::new();

    for batch in batch_by_patient(read.records) {
        let diagnosis = process_patient(&batch.records, options, audit.as_mut());
        summary.patients_processed += 1;
        if diagnosis.is_undiagnosed() {
            summary.undiagnosed_patients += 1;
            summary.undiagnosed_ids.insert(batch.patient_id);
        } else {
            summary.diagnosed_patients += 1;
            summary.records_written += diagnosis.records_written();
        }
        rows.extend(diagnosis.rows(args.undiagnosed));
    }

    info!(
        patients = summary.patients_processed,
        diagnosed = summary.diagnosed_patients,
        rows = rows.len(),
        "per-patient extraction finished"
    );
    Ok(PerPatientOutput { rows, summary })
}

pub fn run_summary(args: &SummaryArgs) -> Result<RunSummary> {
    let span = info_span!("summary", input = %args.input.display());
    let _guard = span.enter();

    let options = ExtractOptions {
        recognized_methods_only: args.recognized_only,
    };
    let read = read_input(&args.input, args.quoted)?;
    let mut audit = open_audit(args.audit_dir.as_deref())?;

    let mut summary = RunSummary {
        lines_processed: read.lines_read,
        unique_patient_ids: unique_patient_count(&read.records),
        ..RunSummary::default()
    };

    for batch in batch_by_patient(read.records) {
        let (species, methods) = accumulate_patient(&batch.records, options, audit.as_mut());
        summary.absorb_patient(&batch.patient_id, &species, &methods);
    }

    info!(
        patients = summary.patients_processed,
        species = summary.species.len(),
        methods = summary.methods.len(),
        "summary accumulation finished"
    );
    Ok(summary)
}

pub fn run_filter(args: &FilterArgs) -> Result<Vec<Record>> {
    let ids = read_id_file(&args.ids)
        .with_context(|| format!("read id file {}", args.ids.display()))?;
    let read = read_input(&args.input, args.quoted)?;
    let (matching, rest) = partition_by_ids(read.records, &ids);
    let selected = if args.remove { rest } else { matching };
    info!(
        ids = ids.len(),
        selected = selected.len(),
        remove = args.remove,
        "filter finished"
    );
    Ok(selected)
}

fn read_input(path: &std::path::Path, quoted: bool) -> Result<ReadResult> {
    read_records(path, ReadOptions { quote_aware: quoted })
        .with_context(|| format!("read source data {}", path.display()))
}

fn open_audit(dir: Option<&std::path::Path>) -> Result<Box<dyn AuditSink>> {
    match dir {
        Some(dir) => {
            let mut audit = CsvAudit::new(dir);
            audit
                .begin_run()
                .with_context(|| format!("reset audit files in {}", dir.display()))?;
            Ok(Box::new(audit))
        }
        None => Ok(Box::new(NoopAudit)),
    }
}

fn unique_patient_count(records: &[Record]) -> usize {
    records
        .iter()
        .map(Record::patient_id)
        .collect::<BTreeSet<_>>()
        .len()
}
