//! Table and text rendering for command output.

use std::io::Write;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use ntm_model::MentionMap;
use ntm_report::patient::PatientRow;
use ntm_report::summary::{RunSummary, counted_keys};

/// How many line numbers to show per entity before truncating.
const MAX_LINES_SHOWN: usize = 20;

pub fn print_rows(rows: &[PatientRow]) {
    for row in rows {
        println!(
            "{}, {}, {}, {}, {}",
            row.patient_id, row.record_date, row.species, row.method, row.demographics
        );
    }
}

/// Count-ordered table of one mention map.
pub fn print_mention_table(title: &str, map: &MentionMap) {
    let mut table = Table::new();
    table.set_header(vec!["Count", title, "Lines"]);
    apply_table_style(&mut table);

    let mut total = 0usize;
    for counted in counted_keys(map) {
        total += counted.count;
        table.add_row(vec![
            Cell::new(counted.count),
            Cell::new(&counted.key),
            Cell::new(render_lines(&counted.lines)),
        ]);
    }
    table.add_row(vec![
        Cell::new(total),
        Cell::new("TOTAL"),
        Cell::new(""),
    ]);
    println!("{table}");
}

pub fn print_undiagnosed(summary: &RunSummary) {
    println!("No species diagnosed for patients:");
    for id in &summary.undiagnosed_ids {
        println!("\t{id}");
    }
}

/// Counters for the per-patient run, as a fixed-width block for stderr.
pub fn write_patient_counters(out: &mut impl Write, summary: &RunSummary) -> std::io::Result<()> {
    write_shared_counters(out, summary)?;
    writeln!(out, "Records written:        {:6}", summary.records_written)?;
    Ok(())
}

/// Counters for the summary run, including distinct entity counts.
pub fn write_summary_counters(out: &mut impl Write, summary: &RunSummary) -> std::io::Result<()> {
    write_shared_counters(out, summary)?;
    writeln!(out, "Species:                {:6}", summary.species.len())?;
    writeln!(out, "Methods:                {:6}", summary.methods.len())?;
    Ok(())
}

fn write_shared_counters(out: &mut impl Write, summary: &RunSummary) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Lines processed:        {:6}", summary.lines_processed)?;
    writeln!(out, "Patients processed:     {:6}", summary.patients_processed)?;
    writeln!(out, "Unique patient ids:     {:6}", summary.unique_patient_ids)?;
    writeln!(out, "Patients with diagnosis:{:6}", summary.diagnosed_patients)?;
    writeln!(out, "Patients w/o diagnosis: {:6}", summary.undiagnosed_patients)?;
    Ok(())
}

fn render_lines(lines: &[u64]) -> String {
    let mut rendered = lines
        .iter()
        .take(MAX_LINES_SHOWN)
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    if lines.len() > MAX_LINES_SHOWN {
        rendered.push_str(" ...");
    }
    rendered
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }
}
