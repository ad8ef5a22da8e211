//! Parsers for lab report files.
//!
//! - [`lab_file`]: detector and metadata parser for `[Header]`/`[Data]` lab
//!   reports (Illumina GenomeStudio "GSGT" exports)
//! - [`text`]: bounded reading and permissive decoding of input prefixes
//!
//! ## Example
//!
//! ```rust
//! use lab_peek::parsing::lab_file::{inspect_lab_file, is_lab_file_format};
//!
//! let content = b"[Header]\nNum SNPs\t671521\n[Data]\nSample ID\tSNP Name\nDSC042739\t1:103380393\n";
//! assert!(is_lab_file_format(content));
//!
//! let report = inspect_lab_file(content).unwrap();
//! assert_eq!(report.sample_id.as_deref(), Some("DSC042739"));
//! assert_eq!(report.summary, "Sample: DSC042739 · SNPs: 671521");
//! ```

pub mod lab_file;
pub mod text;
