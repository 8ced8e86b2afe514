//! Run summary statistics

use std::fmt;
use std::time::Duration;

use rustc_hash::FxHashSet;

use crate::models::ScoredScan;

/// Counts describing a completed run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub scan_count: usize,
    pub patient_count: usize,
    pub surveillance_count: usize,
    pub other_count: usize,
    pub notice_count: usize,
    pub cutoff: f64,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Summarize scored scans
    #[must_use]
    pub fn from_scans(
        scans: &[ScoredScan],
        notice_count: usize,
        cutoff: f64,
        elapsed: Duration,
    ) -> Self {
        let patient_count = scans
            .iter()
            .map(|s| s.patient_id.as_str())
            .collect::<FxHashSet<_>>()
            .len();
        let surveillance_count = scans
            .iter()
            .filter(|s| s.prediction.label.is_surveillance())
            .count();

        Self {
            scan_count: scans.len(),
            patient_count,
            surveillance_count,
            other_count: scans.len() - surveillance_count,
            notice_count,
            cutoff,
            elapsed,
        }
    }

    /// Share of scans labelled surveillance
    #[must_use]
    pub fn surveillance_rate(&self) -> f64 {
        if self.scan_count == 0 {
            0.0
        } else {
            self.surveillance_count as f64 / self.scan_count as f64
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scoring Summary:")?;
        writeln!(f, "  Scans: {}", self.scan_count)?;
        writeln!(f, "  Patients: {}", self.patient_count)?;
        writeln!(
            f,
            "  Surveillance: {} ({:.1}%)",
            self.surveillance_count,
            self.surveillance_rate() * 100.0
        )?;
        writeln!(f, "  Other Reasons: {}", self.other_count)?;
        writeln!(f, "  Cutoff: {}", self.cutoff)?;
        writeln!(f, "  Data Quality Notices: {}", self.notice_count)?;
        writeln!(f, "  Elapsed: {:?}", self.elapsed)
    }
}
