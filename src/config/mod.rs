//! Configuration for the CT indication pipeline.

use std::fmt;
use std::path::PathBuf;

use crate::algorithm::segment::SegmentAnchors;

/// Default gap, in 30-day months, above which a prior scan counts as distant
pub const DEFAULT_INTERVAL_THRESHOLD_MONTHS: f64 = 6.0;

/// Configuration for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Gap threshold for the `priorCT_6mon` flag, in 30-day months
    pub interval_threshold_months: f64,
    /// Probability cutoff overriding the model's stored cutoff
    pub cutoff_override: Option<f64>,
    /// Run per-record stages on the rayon thread pool
    pub parallel: bool,
    /// Anchor phrases used to segment reports
    pub anchors: SegmentAnchors,
    /// Where scored scans are written, if anywhere
    pub output: OutputConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            interval_threshold_months: DEFAULT_INTERVAL_THRESHOLD_MONTHS,
            cutoff_override: None,
            parallel: true,
            anchors: SegmentAnchors::default(),
            output: OutputConfig::default(),
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interval threshold in months
    #[must_use]
    pub fn with_threshold_months(mut self, months: f64) -> Self {
        self.interval_threshold_months = months;
        self
    }

    /// Override the model's binarization cutoff
    #[must_use]
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff_override = Some(cutoff);
        self
    }

    /// Process records on the current thread only
    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    #[must_use]
    pub fn with_anchors(mut self, anchors: SegmentAnchors) -> Self {
        self.anchors = anchors;
        self
    }

    /// Enable writing results to `path`
    #[must_use]
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = OutputConfig::to_path(path);
        self
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Configuration:")?;
        writeln!(
            f,
            "  Interval Threshold: {} months",
            self.interval_threshold_months
        )?;
        match self.cutoff_override {
            Some(cutoff) => writeln!(f, "  Cutoff: {cutoff} (override)")?,
            None => writeln!(f, "  Cutoff: model default")?,
        }
        writeln!(f, "  Parallel: {}", self.parallel)?;
        match (&self.output.enabled, &self.output.path) {
            (true, Some(path)) => writeln!(f, "  Output: {}", path.display())?,
            _ => writeln!(f, "  Output: disabled")?,
        }
        Ok(())
    }
}

/// Output destination toggle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether results are written at all
    pub enabled: bool,
    /// Destination file
    pub path: Option<PathBuf>,
}

impl OutputConfig {
    #[must_use]
    pub fn to_path(path: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            path: Some(path.into()),
        }
    }

    /// Destination to write to, when output is enabled and a path is set
    #[must_use]
    pub fn destination(&self) -> Option<&PathBuf> {
        if self.enabled { self.path.as_ref() } else { None }
    }
}

/// Configuration for date format handling in the input reader
#[derive(Debug, Clone)]
pub struct DateFormatConfig {
    /// Formats tried in order when a date column holds strings
    pub date_formats: Vec<String>,
}

impl Default for DateFormatConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".to_string(), // ISO format: 2023-01-15
                "%d-%m-%Y".to_string(), // European: 15-01-2023
                "%m/%d/%Y".to_string(), // US: 01/15/2023
                "%d.%m.%Y".to_string(), // 15.01.2023
                "%Y%m%d".to_string(),   // Compact: 20230115
            ],
        }
    }
}

impl DateFormatConfig {
    /// Parse a date string with the first matching format
    #[must_use]
    pub fn parse(&self, value: &str) -> Option<chrono::NaiveDate> {
        let value = value.trim();
        self.date_formats
            .iter()
            .find_map(|format| chrono::NaiveDate::parse_from_str(value, format).ok())
    }
}
