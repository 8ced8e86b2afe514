//! Prediction and scored output models

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

use super::features::FeatureVector;

/// Indication assigned to a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanLabel {
    /// Routine post-treatment monitoring (positive class)
    Surveillance,
    /// Any other indication (negative class)
    OtherReasons,
}

impl ScanLabel {
    /// Label as written to output tables
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Surveillance => "Surveillance",
            Self::OtherReasons => "Other Reasons",
        }
    }

    #[must_use]
    pub const fn is_surveillance(self) -> bool {
        matches!(self, Self::Surveillance)
    }
}

impl fmt::Display for ScanLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calibrated model output for one scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Probability of surveillance, in [0, 1]
    pub probability: f64,
    /// Binarized label
    pub label: ScanLabel,
}

/// A fully processed scan: identity, derived features and prediction
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredScan {
    /// Position of the source record in the input
    pub row: usize,
    pub patient_id: String,
    pub ct_date: NaiveDate,
    /// Months since the patient's previous scan (0 for the first scan)
    pub diff_months: f64,
    pub features: FeatureVector,
    pub prediction: Prediction,
    /// Carried-through input columns
    pub extra: BTreeMap<String, String>,
}
