//! Feature engineering and scoring for CT scan indications.
//!
//! Scan records are turned into fixed-width feature vectors (interval since
//! the previous scan, structured-field flags, keyphrase counts from segmented
//! radiology reports) and scored with a pretrained logistic model to label
//! each scan as surveillance or other reasons.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod utils;

// Re-export the most common types for easier use
pub use config::{DateFormatConfig, OutputConfig, PipelineConfig};
pub use error::{IndicationError, Result};
pub use models::{FeatureVector, Prediction, ScanLabel, ScanRecord, ScoredScan};
pub use pipeline::{Pipeline, PipelineOutput, RunSummary};

pub use algorithm::{
    FeatureAssembler, FittedModel, IntervalEngine, KeyphraseDictionary, KeyphraseFeaturizer,
    ReportSegmenter, ReportSegments, Scorer, SegmentAnchors,
};

// IO entry points
pub use utils::io::{read_scan_records, write_scored_scans};
