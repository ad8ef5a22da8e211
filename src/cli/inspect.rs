use std::borrow::Cow;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::core::report::LabReport;
use crate::parsing::lab_file::{inspect_lab_file, MAX_PARSE_BYTES};
use crate::parsing::text::read_path_prefix;

#[derive(Args)]
pub struct InspectArgs {
    /// Lab report file, plain text or gzip-compressed.
    /// Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Also list every [Header] key/value pair (text output)
    #[arg(long)]
    pub show_header: bool,
}

/// Execute inspect subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not a lab report.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: InspectArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let content = read_path_prefix(&args.input, MAX_PARSE_BYTES)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    if verbose {
        eprintln!(
            "Read {} bytes from {}",
            content.len(),
            args.input.display()
        );
    }

    let report = inspect_lab_file(&content)
        .with_context(|| format!("Cannot inspect {}", args.input.display()))?;

    if verbose && !report.has_metadata() {
        eprintln!("No well-known header fields found");
    }

    match format {
        OutputFormat::Text => print_text_report(&args, &report, verbose),
        OutputFormat::Json => print_json_report(&report)?,
        OutputFormat::Tsv => print_tsv_report(&args, &report),
    }

    Ok(())
}

fn print_text_report(args: &InspectArgs, report: &LabReport, verbose: bool) {
    println!("Lab Report: {}", args.input.display());
    println!("{}", "=".repeat(60));
    println!("{}", report.summary);

    println!();
    println!("  Sample ID:       {}", display_field(report.sample_id.as_ref()));
    println!(
        "  Processing Date: {}",
        display_field(report.processing_date.as_ref())
    );
    println!("  Gender:          {}", display_field(report.gender.as_ref()));
    println!("  SNPs:            {}", display_field(report.num_snps.as_ref()));

    println!("\nData columns ({}):", report.data_columns.len());
    for column in &report.data_columns {
        println!("  {column}");
    }

    if args.show_header || verbose {
        println!("\nHeader ({} keys):", report.header.len());
        for (key, value) in &report.header {
            println!("  {key}: {value}");
        }
    }
}

fn print_json_report(report: &LabReport) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn print_tsv_report(args: &InspectArgs, report: &LabReport) {
    println!("input\tsample_id\tprocessing_date\tgender\tnum_snps\tdata_columns\tsummary");
    let input = args.input.display().to_string();
    let columns = report.data_columns.join(",");
    let cells = [
        input.as_str(),
        report.sample_id.as_deref().unwrap_or(""),
        report.processing_date.as_deref().unwrap_or(""),
        report.gender.as_deref().unwrap_or(""),
        report.num_snps.as_deref().unwrap_or(""),
        columns.as_str(),
        report.summary.as_str(),
    ];
    let row: Vec<Cow<'_, str>> = cells.into_iter().map(tsv_cell).collect();
    println!("{}", row.join("\t"));
}

/// Header values keep everything after the first tab, so embedded tabs and
/// line breaks are replaced with spaces to keep one record per line
fn tsv_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\t', '\n', '\r']) {
        Cow::Owned(value.replace(['\t', '\n', '\r'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

fn display_field(value: Option<&String>) -> &str {
    value.map_or("-", String::as_str)
}
