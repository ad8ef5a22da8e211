//! Core data types for lab report inspection.
//!
//! - [`LabReport`]: the metadata preview produced for a recognized lab file
//! - [`HeaderMap`]: key/value pairs from the `[Header]` section
//!
//! ## Well-known fields
//!
//! | Field | Header key | Fallback |
//! |-------|------------|----------|
//! | sample id | `Sample ID` | first column of the first data row |
//! | processing date | `Processing Date` | none |
//! | gender | `Gender` | none |
//! | SNP count | `Num SNPs` | `Total SNPs` |

pub mod report;

pub use report::{HeaderMap, LabReport};
