//! NTM diagnosis extraction CLI.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};

use ntm_cli::cli::{Cli, Command, LogFormatArg};
use ntm_cli::commands::{run_filter, run_per_patient, run_summary};
use ntm_cli::logging::{LogConfig, LogFormat, init_logging};
use ntm_cli::render;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::PerPatient(args) => match run_per_patient(&args) {
            Ok(output) => {
                render::print_rows(&output.rows);
                let _ = render::write_patient_counters(&mut io::stderr(), &output.summary);
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Summary(args) => match run_summary(&args) {
            Ok(summary) => {
                if args.json {
                    match serde_json::to_string_pretty(&summary) {
                        Ok(json) => println!("{json}"),
                        Err(error) => {
                            eprintln!("error: {error}");
                            std::process::exit(1);
                        }
                    }
                } else {
                    if args.species {
                        render::print_mention_table("Species", &summary.species);
                    }
                    if args.methods {
                        render::print_mention_table("Method", &summary.methods);
                    }
                    if args.undiagnosed {
                        render::print_undiagnosed(&summary);
                    }
                    let _ = render::write_summary_counters(&mut io::stdout(), &summary);
                }
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Filter(args) => match run_filter(&args) {
            Ok(records) => {
                for record in records {
                    println!("{}", record.fields().join(","));
                }
                0
            }
            Err(error) => report_error(&error),
        },
    };
    std::process::exit(exit_code);
}

fn report_error(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !cli.verbosity.is_present();
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
