use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use timetable_extract::{
    ExtractOptions, ExtractionResult, OcrResult, extract_timetable, timetable_csv_string,
    write_timetable_csv,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "ocr2timetable",
    version,
    about = "Extract one day's class timetable from an OCR result dump"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract the requested day and print the result.
    Extract(ExtractArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// OCR result JSON path (full text, words with bounding boxes).
    #[arg(short, long)]
    input: PathBuf,

    /// Day to extract, as free text ("Mon", "wednesday").
    #[arg(short, long)]
    day: String,

    /// Output path; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// CSV delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Row bucketing tolerance override in pixels.
    #[arg(long)]
    row_tolerance: Option<f32>,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_options(args: &ExtractArgs) -> Result<ExtractOptions> {
    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    let mut options = ExtractOptions::default();
    if let Some(tolerance) = args.row_tolerance {
        options.row_tolerance_px = tolerance;
    }
    Ok(options)
}

fn run_extract(args: &ExtractArgs) -> Result<ExtractionResult> {
    let options = parse_options(args)?;

    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read OCR dump '{}'", args.input.display()))?;
    let ocr = OcrResult::from_json(&raw)
        .with_context(|| format!("failed to parse OCR dump '{}'", args.input.display()))?;

    extract_timetable(&ocr, &args.day, &options)
        .with_context(|| format!("failed to extract timetable for '{}'", args.day))
}

fn emit_output(result: &ExtractionResult, args: &ExtractArgs) -> Result<()> {
    match (&args.output, args.format) {
        (Some(path), OutputFormat::Csv) => {
            write_timetable_csv(path, &result.timetable, args.delimiter as u8)
                .with_context(|| format!("failed to write '{}'", path.display()))
        }
        (Some(path), OutputFormat::Json) => {
            let rendered =
                serde_json::to_string_pretty(result).context("failed to serialize result")?;
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write '{}'", path.display()))
        }
        (None, OutputFormat::Csv) => {
            let rendered = timetable_csv_string(&result.timetable, args.delimiter as u8)
                .context("failed to render CSV")?;
            println!("{rendered}");
            Ok(())
        }
        (None, OutputFormat::Json) => {
            let rendered =
                serde_json::to_string_pretty(result).context("failed to serialize result")?;
            println!("{rendered}");
            Ok(())
        }
    }
}

fn log_result(result: &ExtractionResult, verbose: bool) {
    if let Some(message) = &result.message {
        eprintln!("note: {message}");
    }
    if result.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", result.warnings.len());
    if verbose {
        for warning in &result.warnings {
            eprintln!(
                "  - {:?} day={:?} rows={:?}: {}",
                warning.code, warning.day, warning.row_count, warning.message
            );
        }
    }
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("timetable_extract=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => match run_extract(&args) {
            Ok(result) => {
                log_result(&result, args.verbose);
                if let Err(error) = emit_output(&result, &args) {
                    eprintln!("error: {error:#}");
                    return ExitCode::from(1);
                }

                if result.timetable.is_empty() {
                    ExitCode::from(2)
                } else {
                    ExitCode::SUCCESS
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}
