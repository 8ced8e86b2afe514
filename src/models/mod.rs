//! Domain models for the CT indication pipeline
//!
//! Input records, feature vectors and scored outputs.

pub mod features;
pub mod prediction;
pub mod scan;

pub use features::{EHR_FEATURES, FeatureVector};
pub use prediction::{Prediction, ScanLabel, ScoredScan};
pub use scan::{CountField, DataQualityNotice, REQUIRED_COLUMNS, ScanRecord};
