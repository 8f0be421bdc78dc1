//! pdukit CLI - per-column SMS encoding and segment counts for spreadsheets

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use pdukit::io_html::SpecHtmlRenderOptions;
use pdukit::io_xlsx::SpecXlsxReadOptions;
use pdukit::sms::{
    EnumExtendedCharCost, SpecSmsSegmentPolicy, analyze_sms_text, encode_uri_component,
};
use pdukit::table::SpecTransformOptions;
use pdukit::{ProcessError, SpecProcessOptions, derive_default_output_path, process_xlsx_file};
use pdukit_log::{EnumLogLevel, SpecLogOptions, init_logging};
use tracing::{debug, error};

/// Message shown for an input sheet that cannot be expanded.
const C_MSG_INVALID_SHAPE: &str =
    "Invalid sheet structure. Ensure at least two rows and proper columns.";

#[derive(Parser)]
#[command(name = "pdukit")]
#[command(version)]
#[command(about = "Append URL-encoded text and SMS segment counts to every message column", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a workbook into value / encoded / PDU column triples
    Process {
        /// Input workbook (xlsx, xlsm, xlsb, xls, ods)
        input: PathBuf,

        /// Output workbook (defaults to `<input stem>_encoded.xlsx`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write an HTML preview to this path
        #[arg(long)]
        html: Option<PathBuf>,

        /// Input sheet (defaults to the first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Output sheet name
        #[arg(long, default_value = pdukit::io_xlsx::C_SHEET_NAME_DEFAULT)]
        out_sheet: String,

        /// Worker threads for row processing
        #[arg(long)]
        workers: Option<usize>,

        /// Segment cost of GSM-7 extension characters
        #[arg(long, value_enum, default_value_t = ExtendedCost::Single)]
        extended_cost: ExtendedCost,
    },

    /// Write only the HTML preview of the processed sheet
    View {
        /// Input workbook
        input: PathBuf,

        /// Output HTML file (defaults to `<input stem>_encoded.html`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Input sheet (defaults to the first sheet)
        #[arg(long)]
        sheet: Option<String>,
    },

    /// Print the segment analysis and encoded form of one text
    Inspect {
        /// Message text
        text: String,

        /// Segment cost of GSM-7 extension characters
        #[arg(long, value_enum, default_value_t = ExtendedCost::Single)]
        extended_cost: ExtendedCost,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExtendedCost {
    Single,
    Double,
}

impl From<ExtendedCost> for SpecSmsSegmentPolicy {
    fn from(value: ExtendedCost) -> Self {
        let rule_extended_cost = match value {
            ExtendedCost::Single => EnumExtendedCharCost::Single,
            ExtendedCost::Double => EnumExtendedCharCost::Double,
        };
        SpecSmsSegmentPolicy { rule_extended_cost }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&SpecLogOptions {
        level: EnumLogLevel::from_verbosity(cli.verbose, cli.quiet),
        ..SpecLogOptions::default()
    });

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_invalid_shape() => {
            debug!("{err}");
            eprintln!("{C_MSG_INVALID_SHAPE}");
            ExitCode::from(2)
        }
        Err(err) => {
            error!("{err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), ProcessError> {
    match command {
        Commands::Process {
            input,
            output,
            html,
            sheet,
            out_sheet,
            workers,
            extended_cost,
        } => {
            let options = SpecProcessOptions {
                read: SpecXlsxReadOptions {
                    sheet_name: sheet,
                    ..SpecXlsxReadOptions::default()
                },
                transform: SpecTransformOptions {
                    policy_segment: extended_cost.into(),
                    num_workers_max: workers,
                    ..SpecTransformOptions::default()
                },
                file_out: Some(output.unwrap_or_else(|| derive_default_output_path(&input, "xlsx"))),
                file_html: html,
                sheet_name_out: out_sheet,
                ..SpecProcessOptions::default()
            };
            let output = process_xlsx_file(&input, &options)?;
            for c_warning in output.report.warnings() {
                eprintln!("warning: {c_warning}");
            }
            println!("{}", output.report);
        }
        Commands::View {
            input,
            output,
            sheet,
        } => {
            let options = SpecProcessOptions {
                read: SpecXlsxReadOptions {
                    sheet_name: sheet,
                    ..SpecXlsxReadOptions::default()
                },
                file_html: Some(output.unwrap_or_else(|| derive_default_output_path(&input, "html"))),
                html: SpecHtmlRenderOptions::default(),
                ..SpecProcessOptions::default()
            };
            let output = process_xlsx_file(&input, &options)?;
            println!("{}", output.report);
        }
        Commands::Inspect {
            text,
            extended_cost,
        } => {
            let analysis = analyze_sms_text(&text, &extended_cost.into());
            println!("{analysis}");
            println!("[SMS] encoded={}", encode_uri_component(&text));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pdukit").chain(args.iter().copied()))
            .expect("parse")
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_process_defaults() {
        let cli = parse(&["process", "contacts.xlsx"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        let Commands::Process {
            input,
            output,
            html,
            sheet,
            out_sheet,
            workers,
            extended_cost,
        } = cli.command
        else {
            panic!("expected process");
        };
        assert_eq!(input, PathBuf::from("contacts.xlsx"));
        assert_eq!(output, None);
        assert_eq!(html, None);
        assert_eq!(sheet, None);
        assert_eq!(out_sheet, "Processed_Data");
        assert_eq!(workers, None);
        assert_eq!(extended_cost, ExtendedCost::Single);
        assert_eq!(
            SpecSmsSegmentPolicy::from(extended_cost),
            SpecSmsSegmentPolicy::default()
        );
    }

    #[test]
    fn test_process_all_flags() {
        let cli = parse(&[
            "process",
            "in.xlsx",
            "-o",
            "out.xlsx",
            "--html",
            "out.html",
            "--sheet",
            "Raw",
            "--out-sheet",
            "Done",
            "--workers",
            "4",
            "--extended-cost",
            "double",
        ]);
        let Commands::Process {
            output,
            html,
            sheet,
            out_sheet,
            workers,
            extended_cost,
            ..
        } = cli.command
        else {
            panic!("expected process");
        };
        assert_eq!(output, Some(PathBuf::from("out.xlsx")));
        assert_eq!(html, Some(PathBuf::from("out.html")));
        assert_eq!(sheet.as_deref(), Some("Raw"));
        assert_eq!(out_sheet, "Done");
        assert_eq!(workers, Some(4));
        assert_eq!(
            SpecSmsSegmentPolicy::from(extended_cost).rule_extended_cost,
            EnumExtendedCharCost::Double
        );
    }

    #[test]
    fn test_process_rejects_unknown_extended_cost() {
        let result = Cli::try_parse_from([
            "pdukit",
            "process",
            "in.xlsx",
            "--extended-cost",
            "triple",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_view_and_inspect() {
        let Commands::View {
            input,
            output,
            sheet,
        } = parse(&["view", "in.xlsx", "-o", "page.html", "--sheet", "S"]).command
        else {
            panic!("expected view");
        };
        assert_eq!(input, PathBuf::from("in.xlsx"));
        assert_eq!(output, Some(PathBuf::from("page.html")));
        assert_eq!(sheet.as_deref(), Some("S"));

        let Commands::Inspect {
            text,
            extended_cost,
        } = parse(&["inspect", "Hello {world}"]).command
        else {
            panic!("expected inspect");
        };
        assert_eq!(text, "Hello {world}");
        assert_eq!(extended_cost, ExtendedCost::Single);
    }

    #[test]
    fn test_global_verbosity_flags() {
        let cli = parse(&["-vv", "inspect", "hi"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);

        let cli = parse(&["view", "in.xlsx", "-q"]);
        assert!(cli.quiet);
        assert_eq!(
            EnumLogLevel::from_verbosity(cli.verbose, cli.quiet),
            EnumLogLevel::Error
        );
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["pdukit"]).is_err());
    }
}
