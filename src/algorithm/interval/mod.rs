//! Per-patient scan interval computation
//!
//! Records are grouped by patient, ordered by scan date (stable, so same-day
//! scans keep their input order) and folded sequentially to get the gap since
//! each patient's previous scan.

use itertools::Itertools;
use log::debug;
use rustc_hash::FxHashMap;

use crate::models::ScanRecord;

/// Fixed month length used for interval arithmetic
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Interval features of a single scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanInterval {
    /// Months since the patient's previous scan, 0 for the first scan
    pub diff_months: f64,
    /// 1 when the previous scan is more than the threshold ago, or absent
    pub prior_ct_flag: u8,
}

impl ScanInterval {
    /// Interval of a patient's first scan
    ///
    /// The gap is zero yet the flag is set: a first scan has no recent prior.
    #[must_use]
    pub const fn first_scan() -> Self {
        Self {
            diff_months: 0.0,
            prior_ct_flag: 1,
        }
    }

    /// Interval of a follow-up scan
    #[must_use]
    pub fn follow_up(diff_months: f64, threshold_months: f64) -> Self {
        Self {
            diff_months,
            prior_ct_flag: u8::from(diff_months > threshold_months),
        }
    }
}

/// Computes scan intervals over complete patient timelines
#[derive(Debug, Clone, Copy)]
pub struct IntervalEngine {
    threshold_months: f64,
}

impl IntervalEngine {
    #[must_use]
    pub const fn new(threshold_months: f64) -> Self {
        Self { threshold_months }
    }

    #[must_use]
    pub const fn threshold_months(&self) -> f64 {
        self.threshold_months
    }

    /// Compute intervals for all records
    ///
    /// The returned vector is aligned with `records`: entry `i` belongs to
    /// `records[i]`, whatever the input order.
    #[must_use]
    pub fn compute(&self, records: &[ScanRecord]) -> Vec<ScanInterval> {
        let mut intervals = vec![ScanInterval::first_scan(); records.len()];

        for (patient_id, timeline) in patient_timelines(records) {
            debug!(
                "Patient {} has {} scans in timeline",
                patient_id,
                timeline.len()
            );

            for (previous, current) in timeline.iter().tuple_windows() {
                let days = (records[*current].ct_date - records[*previous].ct_date).num_days();
                intervals[*current] =
                    ScanInterval::follow_up(days as f64 / DAYS_PER_MONTH, self.threshold_months);
            }
        }

        intervals
    }
}

impl Default for IntervalEngine {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_INTERVAL_THRESHOLD_MONTHS)
    }
}

/// Group record indices by patient, each group ordered by scan date
///
/// Groups appear in order of each patient's first input row.
#[must_use]
pub fn patient_timelines(records: &[ScanRecord]) -> Vec<(&str, Vec<usize>)> {
    let mut positions: FxHashMap<&str, usize> = FxHashMap::default();
    let mut timelines: Vec<(&str, Vec<usize>)> = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let patient = record.patient_id.as_str();
        let slot = *positions.entry(patient).or_insert_with(|| {
            timelines.push((patient, Vec::new()));
            timelines.len() - 1
        });
        timelines[slot].1.push(index);
    }

    for (_, timeline) in &mut timelines {
        // sort_by_key is stable: same-day scans keep input order
        timeline.sort_by_key(|&index| records[index].ct_date);
    }

    timelines
}
