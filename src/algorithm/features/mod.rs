//! Feature assembly
//!
//! Combines the interval flag, structured-field derivations and keyphrase
//! counts into one feature vector per scan. The schema is fixed: the six EHR
//! features in [`EHR_FEATURES`] order followed by one column per dictionary
//! group.

use log::warn;

use crate::algorithm::interval::ScanInterval;
use crate::algorithm::keyphrase::{KeyphraseDictionary, KeyphraseFeaturizer};
use crate::error::{IndicationError, Result};
use crate::models::features::{
    EHR_FEATURES, LUNG_DISEASE_BINARY, PRIOR_CT_6MON, PROVIDER_MED, PROVIDER_ONC, SYMPTOM_BINARY,
    XRAY_COUNT,
};
use crate::models::{CountField, DataQualityNotice, FeatureVector, ScanRecord};

/// Structured counts after negative values are clamped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructuredCounts {
    pub symptom_diagnosis: f64,
    pub lungdisease_diagnosis: f64,
    pub xray_count: f64,
}

impl StructuredCounts {
    /// Clamp negative and non-finite counts of `record` to zero
    ///
    /// Each adjusted field yields a notice. Upper bounds are not enforced.
    #[must_use]
    pub fn from_record(row: usize, record: &ScanRecord) -> (Self, Vec<DataQualityNotice>) {
        let mut notices = Vec::new();
        let mut clamp = |field: CountField, value: f64| {
            if value < 0.0 || !value.is_finite() {
                let notice = DataQualityNotice {
                    row,
                    patient_id: record.patient_id.clone(),
                    ct_date: record.ct_date,
                    field,
                    original: value,
                    adjusted: 0.0,
                };
                warn!("Data quality: {notice}");
                notices.push(notice);
                0.0
            } else {
                value
            }
        };

        let counts = Self {
            symptom_diagnosis: clamp(CountField::SymptomDiagnosis, record.symptom_diagnosis),
            lungdisease_diagnosis: clamp(
                CountField::LungDiseaseDiagnosis,
                record.lungdisease_diagnosis,
            ),
            xray_count: clamp(CountField::XrayCount, record.xray_count),
        };
        (counts, notices)
    }
}

/// 1.0 when `haystack` contains `needle` ignoring case
fn contains_ignore_case(haystack: &str, needle: &str) -> f64 {
    if haystack.to_lowercase().contains(&needle.to_lowercase()) {
        1.0
    } else {
        0.0
    }
}

fn binary(value: f64) -> f64 {
    if value > 0.0 { 1.0 } else { 0.0 }
}

/// Builds feature vectors with a fixed schema
#[derive(Debug, Clone)]
pub struct FeatureAssembler<'a> {
    featurizer: KeyphraseFeaturizer<'a>,
    schema: Vec<String>,
}

impl<'a> FeatureAssembler<'a> {
    #[must_use]
    pub fn new(dictionary: &'a KeyphraseDictionary) -> Self {
        let schema = EHR_FEATURES
            .iter()
            .map(|name| (*name).to_string())
            .chain(dictionary.feature_names().map(str::to_string))
            .collect();

        Self {
            featurizer: KeyphraseFeaturizer::new(dictionary),
            schema,
        }
    }

    /// Feature names every assembled vector carries, in order
    #[must_use]
    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    /// Check that no dictionary group reuses a feature name
    ///
    /// A reused name would overwrite an earlier value and leave the vector
    /// shorter than the schema.
    pub fn ensure_distinct(&self) -> Result<()> {
        let duplicates: Vec<&str> = self
            .schema
            .iter()
            .enumerate()
            .filter(|(i, name)| self.schema[..*i].contains(*name))
            .map(|(_, name)| name.as_str())
            .collect();

        if duplicates.is_empty() {
            Ok(())
        } else {
            Err(IndicationError::schema(format!(
                "Keyphrase groups reuse feature names: {}",
                duplicates.join(", ")
            )))
        }
    }

    /// Check that every name in `required` is part of the schema
    pub fn ensure_produces<'n>(&self, required: impl IntoIterator<Item = &'n str>) -> Result<()> {
        let missing: Vec<&str> = required
            .into_iter()
            .filter(|name| !self.schema.iter().any(|s| s == name))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(IndicationError::schema(format!(
                "Model requires features the assembler never produces: {}",
                missing.join(", ")
            )))
        }
    }

    /// Assemble the feature vector of one scan
    pub fn assemble(
        &self,
        record: &ScanRecord,
        counts: &StructuredCounts,
        interval: &ScanInterval,
        text_of_interest: &str,
    ) -> Result<FeatureVector> {
        let mut features = FeatureVector::with_capacity(self.schema.len());
        features.insert(PRIOR_CT_6MON, f64::from(interval.prior_ct_flag));
        features.insert(
            PROVIDER_MED,
            contains_ignore_case(&record.provider_type, "Medicine"),
        );
        features.insert(
            PROVIDER_ONC,
            contains_ignore_case(&record.provider_type, "Oncology"),
        );
        features.insert(SYMPTOM_BINARY, binary(counts.symptom_diagnosis));
        features.insert(LUNG_DISEASE_BINARY, binary(counts.lungdisease_diagnosis));
        features.insert(XRAY_COUNT, counts.xray_count);
        self.featurizer.extend(text_of_interest, &mut features);

        if features.len() != self.schema.len()
            || features.names().zip(&self.schema).any(|(a, b)| a != b)
        {
            return Err(IndicationError::schema(format!(
                "Assembled features for patient {} do not match the feature schema",
                record.patient_id
            )));
        }

        Ok(features)
    }
}
