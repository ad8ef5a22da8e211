use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::parsing::lab_file::{is_lab_file_format, DETECT_PREFIX_BYTES};
use crate::parsing::text::read_path_prefix;

#[derive(Args)]
pub struct DetectArgs {
    /// File to check, plain text or gzip-compressed.
    /// Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,
}

/// Execute detect subcommand, returning whether the input was recognized
///
/// # Errors
///
/// Returns an error if the input cannot be read.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: DetectArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<bool> {
    // The detector never looks past its prefix, so neither do we
    let content = read_path_prefix(&args.input, DETECT_PREFIX_BYTES)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let recognized = is_lab_file_format(&content);

    if verbose {
        eprintln!(
            "Checked first {} bytes of {}",
            content.len(),
            args.input.display()
        );
    }

    match format {
        OutputFormat::Text => {
            if recognized {
                println!("recognized");
            } else {
                println!("not recognized");
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "input": args.input.display().to_string(),
                "recognized": recognized,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("input\trecognized");
            println!("{}\t{recognized}", args.input.display());
        }
    }

    Ok(recognized)
}
