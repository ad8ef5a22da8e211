//! # lab-peek
//!
//! A library for recognizing genotyping lab report files and extracting a
//! metadata preview from them.
//!
//! Lab reports such as Illumina GenomeStudio "GSGT" exports are text files
//! with a `[Header]` section of key/value lines followed by a `[Data]`
//! section holding a tab-delimited SNP table. Full exports run to tens of
//! megabytes, but everything needed to file one against a client (sample id,
//! processing date, gender, SNP count) sits in the first few lines.
//!
//! `lab-peek` reads at most the first 100KB, checks for the two section
//! markers, and returns the header map, the table's column names and a
//! one-line summary.
//!
//! ## Example
//!
//! ```rust
//! use lab_peek::{inspect_lab_file, LabFileError};
//!
//! let content = b"[Header]\nGender\tFemale\n[Data]\nSample ID\tSNP Name\nDSC042739\t1:103380393\n";
//! let report = inspect_lab_file(content).unwrap();
//! assert_eq!(report.summary, "Sample: DSC042739 · Gender: Female");
//!
//! assert_eq!(inspect_lab_file(b"rsid,genotype\n"), Err(LabFileError::NotRecognized));
//! ```
//!
//! ## Modules
//!
//! - [`core`]: The [`LabReport`] preview type
//! - [`parsing`]: Format detector, parser and bounded input readers
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: Web server for browser-based uploads

pub mod cli;
pub mod core;
pub mod parsing;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use crate::core::report::{HeaderMap, LabReport};
pub use crate::parsing::lab_file::{
    inspect_lab_file, is_lab_file_format, parse_lab_file, LabFileError,
};
