//! Feature engineering and scoring algorithms
//!
//! Components in data-flow order: interval computation over patient
//! timelines, report segmentation, keyphrase counting, feature assembly and
//! scoring.

pub mod features;
pub mod interval;
pub mod keyphrase;
pub mod scoring;
pub mod segment;

pub use features::{FeatureAssembler, StructuredCounts};
pub use interval::{IntervalEngine, ScanInterval};
pub use keyphrase::{KeyphraseDictionary, KeyphraseFeaturizer, KeyphraseGroup};
pub use scoring::{FittedModel, Scorer};
pub use segment::{ReportSegmenter, ReportSegments, SegmentAnchors};
