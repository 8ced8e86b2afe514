//! Scan record model
//!
//! A `ScanRecord` is one CT scan episode for one patient, as delivered by the
//! input reader. Records are never mutated after they are read; derived values
//! live in [`super::ScoredScan`].

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

/// Names of the columns every input table must provide
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "patient_id",
    "diagnosis_date",
    "ct_date",
    "provider_type",
    "report_text",
    "symptom_diagnosis",
    "lungdisease_diagnosis",
    "xray_count",
];

/// Representation of a single CT scan episode
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRecord {
    /// Patient identifier
    pub patient_id: String,
    /// Date of the cancer diagnosis
    pub diagnosis_date: NaiveDate,
    /// Date the CT scan was performed
    pub ct_date: NaiveDate,
    /// Ordering provider department
    pub provider_type: String,
    /// Free-text radiology report
    pub report_text: String,
    /// Number of symptom diagnoses recorded before the scan
    pub symptom_diagnosis: f64,
    /// Number of lung disease diagnoses recorded before the scan
    pub lungdisease_diagnosis: f64,
    /// Number of chest X-rays before the scan
    pub xray_count: f64,
    /// Optional columns carried through to the output untouched
    pub extra: BTreeMap<String, String>,
}

impl ScanRecord {
    /// Create a new scan record with zeroed structured counts
    #[must_use]
    pub fn new(
        patient_id: impl Into<String>,
        diagnosis_date: NaiveDate,
        ct_date: NaiveDate,
        provider_type: impl Into<String>,
        report_text: impl Into<String>,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            diagnosis_date,
            ct_date,
            provider_type: provider_type.into(),
            report_text: report_text.into(),
            symptom_diagnosis: 0.0,
            lungdisease_diagnosis: 0.0,
            xray_count: 0.0,
            extra: BTreeMap::new(),
        }
    }

    /// Set the structured diagnosis and imaging counts
    #[must_use]
    pub fn with_counts(mut self, symptom: f64, lung_disease: f64, xray: f64) -> Self {
        self.symptom_diagnosis = symptom;
        self.lungdisease_diagnosis = lung_disease;
        self.xray_count = xray;
        self
    }

    /// Add a carried-through column value
    #[must_use]
    pub fn with_extra(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(column.into(), value.into());
        self
    }
}

/// A structured count field that may need clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountField {
    SymptomDiagnosis,
    LungDiseaseDiagnosis,
    XrayCount,
}

impl CountField {
    /// Column name of this field in the input table
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::SymptomDiagnosis => "symptom_diagnosis",
            Self::LungDiseaseDiagnosis => "lungdisease_diagnosis",
            Self::XrayCount => "xray_count",
        }
    }
}

impl fmt::Display for CountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// A non-fatal anomaly found in the input data
#[derive(Debug, Clone, PartialEq)]
pub struct DataQualityNotice {
    /// Position of the record in the input
    pub row: usize,
    /// Patient the record belongs to
    pub patient_id: String,
    /// Scan date of the record
    pub ct_date: NaiveDate,
    /// Field that was adjusted
    pub field: CountField,
    /// Value found in the input
    pub original: f64,
    /// Value used for feature derivation
    pub adjusted: f64,
}

impl fmt::Display for DataQualityNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let problem = if self.original.is_finite() {
            "negative"
        } else {
            "non-finite"
        };
        write!(
            f,
            "row {} (patient {}, scan {}): {problem} {} {} clamped to {}",
            self.row, self.patient_id, self.ct_date, self.field, self.original, self.adjusted
        )
    }
}
