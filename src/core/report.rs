use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Header key holding the sample identifier
pub const SAMPLE_ID_KEY: &str = "Sample ID";
/// Header key holding the processing date, kept verbatim
pub const PROCESSING_DATE_KEY: &str = "Processing Date";
/// Header key holding the reported gender
pub const GENDER_KEY: &str = "Gender";
/// Preferred header key for the SNP count
pub const NUM_SNPS_KEY: &str = "Num SNPs";
/// Fallback header key for the SNP count
pub const TOTAL_SNPS_KEY: &str = "Total SNPs";

/// Summary used when none of the well-known fields could be derived
pub const NO_METADATA_SUMMARY: &str = "Lab file recognized (no header metadata).";

/// Separator placed between summary parts
pub const SUMMARY_SEPARATOR: &str = " · ";

/// Key/value pairs collected from the `[Header]` section
pub type HeaderMap = BTreeMap<String, String>;

/// Metadata preview extracted from a lab report file.
///
/// Every value is kept as the string found in the source text; nothing is
/// coerced to numbers or dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabReport {
    /// One-line human-readable description of the well-known fields
    pub summary: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_snps: Option<String>,

    /// All key/value pairs from the `[Header]` section
    pub header: HeaderMap,

    /// Column names of the `[Data]` table, in file order
    pub data_columns: Vec<String>,
}

impl LabReport {
    /// Build a report from the raw pieces collected by the scanner.
    ///
    /// `first_row` is the first data row of the `[Data]` table, if one was
    /// seen. It only feeds the `Sample ID` fallback and is not retained.
    #[must_use]
    pub fn from_sections(
        header: HeaderMap,
        data_columns: Vec<String>,
        first_row: Option<&[String]>,
    ) -> Self {
        let sample_id = header_value(&header, SAMPLE_ID_KEY).or_else(|| {
            first_row
                .and_then(|row| row.first())
                .filter(|value| !value.is_empty())
                .cloned()
        });
        let processing_date = header_value(&header, PROCESSING_DATE_KEY);
        let gender = header_value(&header, GENDER_KEY);
        let num_snps =
            header_value(&header, NUM_SNPS_KEY).or_else(|| header_value(&header, TOTAL_SNPS_KEY));

        let mut report = Self {
            summary: String::new(),
            sample_id,
            processing_date,
            gender,
            num_snps,
            header,
            data_columns,
        };
        report.summary = report.build_summary();
        report
    }

    /// True if at least one well-known field was derived
    #[must_use]
    pub fn has_metadata(&self) -> bool {
        self.sample_id.is_some()
            || self.processing_date.is_some()
            || self.gender.is_some()
            || self.num_snps.is_some()
    }

    fn build_summary(&self) -> String {
        let parts: Vec<String> = [
            ("Sample", &self.sample_id),
            ("Processed", &self.processing_date),
            ("Gender", &self.gender),
            ("SNPs", &self.num_snps),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}: {v}")))
        .collect();

        if parts.is_empty() {
            NO_METADATA_SUMMARY.to_string()
        } else {
            parts.join(SUMMARY_SEPARATOR)
        }
    }
}

/// Look up a header value, treating empty values as absent
fn header_value(header: &HeaderMap, key: &str) -> Option<String> {
    header.get(key).filter(|value| !value.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(pairs: &[(&str, &str)]) -> HeaderMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_summary_with_all_fields() {
        let report = LabReport::from_sections(
            header(&[
                ("Sample ID", "S1"),
                ("Processing Date", "1/2/2025"),
                ("Gender", "Male"),
                ("Num SNPs", "10"),
            ]),
            Vec::new(),
            None,
        );
        assert_eq!(
            report.summary,
            "Sample: S1 · Processed: 1/2/2025 · Gender: Male · SNPs: 10"
        );
    }

    #[test]
    fn test_summary_skips_missing_fields() {
        let report = LabReport::from_sections(header(&[("Gender", "Female")]), Vec::new(), None);
        assert_eq!(report.summary, "Gender: Female");
    }

    #[test]
    fn test_summary_without_metadata() {
        let report = LabReport::from_sections(HeaderMap::new(), Vec::new(), None);
        assert_eq!(report.summary, NO_METADATA_SUMMARY);
        assert!(!report.has_metadata());
    }

    #[test]
    fn test_empty_header_values_are_absent() {
        let report = LabReport::from_sections(
            header(&[("Gender", ""), ("Num SNPs", ""), ("Total SNPs", "42")]),
            Vec::new(),
            None,
        );
        assert_eq!(report.gender, None);
        assert_eq!(report.num_snps, Some("42".to_string()));
    }

    #[test]
    fn test_sample_id_prefers_header() {
        let row = vec!["ROW".to_string(), "x".to_string()];
        let report =
            LabReport::from_sections(header(&[("Sample ID", "HDR")]), Vec::new(), Some(row.as_slice()));
        assert_eq!(report.sample_id, Some("HDR".to_string()));

        let report = LabReport::from_sections(HeaderMap::new(), Vec::new(), Some(row.as_slice()));
        assert_eq!(report.sample_id, Some("ROW".to_string()));
    }

    #[test]
    fn test_json_field_names() {
        let report = LabReport::from_sections(
            header(&[("Num SNPs", "5")]),
            vec!["Sample ID".to_string()],
            None,
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["numSnps"], "5");
        assert_eq!(json["dataColumns"][0], "Sample ID");
        assert!(json.get("sampleId").is_none());
        assert!(json.get("processingDate").is_none());
    }
}
