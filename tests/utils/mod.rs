use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use ct_indication::{FittedModel, ScanRecord};

/// A report with every section present and no list markers
pub const SAMPLE_REPORT: &str = "EXAM: CT CHEST WITH CONTRAST\n\
CLINICAL HISTORY: 67 years of age with NSCLC status post right upper lobectomy, restaging.\n\
COMPARISON: CT chest 01/02/2020.\n\
FINDINGS: Postsurgical changes of right upper lobectomy. No new pulmonary nodule.\n\
IMPRESSION: Stable postsurgical changes. No evidence of recurrent disease.\n\
I have personally reviewed the images and agree with the report above.";

#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A scan with neutral structured fields
#[must_use]
pub fn scan(patient_id: &str, ct_date: NaiveDate, report: &str) -> ScanRecord {
    ScanRecord::new(patient_id, date(2018, 6, 1), ct_date, "Radiology", report)
}

/// A model over the given coefficients
#[must_use]
pub fn model(intercept: f64, coefficients: &[(&str, f64)], cutoff: f64) -> FittedModel {
    let coefficients: BTreeMap<String, f64> = coefficients
        .iter()
        .map(|(name, weight)| ((*name).to_string(), *weight))
        .collect();
    FittedModel::new(intercept, coefficients, cutoff).unwrap()
}

/// Write an artifact file into `dir`
pub fn write_artifact(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
