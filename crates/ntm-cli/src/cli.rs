//! CLI argument definitions for the NTM extraction pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ntm",
    version,
    about = "NTM diagnosis extraction - structured species and methods from patient records",
    long_about = "Extract diagnosed mycobacterium species and laboratory identification\n\
                  methods from free-text diagnosis columns of delimited patient data.\n\
                  Rule-based: every match is explainable and carries its source line."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Emit one row per (species, method) pair found for each patient.
    PerPatient(PerPatientArgs),

    /// Print species and method counts plus run statistics.
    Summary(SummaryArgs),

    /// Split records by membership in an external patient-id list.
    Filter(FilterArgs),
}

#[derive(Parser)]
pub struct PerPatientArgs {
    /// Path to the delimited patient data file.
    #[arg(value_name = "SOURCE_DATA")]
    pub input: PathBuf,

    /// Only output methods on the recognized allow-list.
    #[arg(short = 'r', long = "recognized-only")]
    pub recognized_only: bool,

    /// Also output a row for patients without any diagnosis.
    #[arg(short = 'u', long = "undiagnosed")]
    pub undiagnosed: bool,

    /// Respect double quotes when splitting input lines.
    #[arg(long = "quoted")]
    pub quoted: bool,

    /// Write per-record audit files (debug_extracted.csv, debug_ignored.csv)
    /// into this directory.
    #[arg(long = "audit-dir", value_name = "DIR")]
    pub audit_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct SummaryArgs {
    /// Path to the delimited patient data file.
    #[arg(value_name = "SOURCE_DATA")]
    pub input: PathBuf,

    /// Print the per-species mention counts.
    #[arg(short = 's', long = "species")]
    pub species: bool,

    /// Print the per-method mention counts.
    #[arg(short = 'm', long = "methods")]
    pub methods: bool,

    /// Print the patients without a MYCOBACTERIUM diagnosis.
    #[arg(short = 'u', long = "undiagnosed")]
    pub undiagnosed: bool,

    /// Only count methods on the recognized allow-list.
    #[arg(short = 'r', long = "recognized-only")]
    pub recognized_only: bool,

    /// Emit the whole summary as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,

    /// Respect double quotes when splitting input lines.
    #[arg(long = "quoted")]
    pub quoted: bool,

    /// Write per-record audit files into this directory.
    #[arg(long = "audit-dir", value_name = "DIR")]
    pub audit_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct FilterArgs {
    /// Path to the delimited patient data file.
    #[arg(value_name = "SOURCE_DATA")]
    pub input: PathBuf,

    /// CSV file whose first column holds the patient ids to match.
    #[arg(long = "ids", value_name = "ID_FILE")]
    pub ids: PathBuf,

    /// Emit the non-matching records instead of the matching ones.
    #[arg(long = "remove")]
    pub remove: bool,

    /// Respect double quotes when splitting input lines.
    #[arg(long = "quoted")]
    pub quoted: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
