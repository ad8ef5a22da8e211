//! Command-line interface for lab-peek.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **inspect**: Recognize a lab report and print its metadata preview
//! - **detect**: Only check whether a file looks like a lab report
//! - **serve**: Start the upload web interface
//!
//! ## Usage
//!
//! ```text
//! # Preview a GSGT export
//! lab-peek inspect DSC042739.txt
//!
//! # Gzip-compressed input and stdin both work
//! zcat DSC042739.txt.gz | lab-peek inspect -
//!
//! # JSON output for scripting
//! lab-peek inspect DSC042739.txt --format json
//!
//! # Exit status tells whether the file is a lab report
//! lab-peek detect upload.txt && echo "lab report"
//!
//! # Start web UI
//! lab-peek serve --port 8080 --open
//! ```

use clap::{Parser, Subcommand};

pub mod detect;
pub mod inspect;

#[derive(Parser)]
#[command(name = "lab-peek")]
#[command(version)]
#[command(about = "Recognize GSGT lab report files and preview their metadata")]
#[command(
    long_about = "lab-peek checks whether a file is a two-section [Header]/[Data] lab report (such as a GenomeStudio GSGT export) and extracts a metadata preview from its first 100KB:\n- All [Header] key/value pairs\n- The [Data] table's column names\n- Sample ID, processing date, gender and SNP count"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recognize a lab report and print its metadata
    Inspect(inspect::InspectArgs),

    /// Check whether a file looks like a lab report (exit status 1 if not)
    Detect(detect::DetectArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
