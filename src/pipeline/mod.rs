//! End-to-end scoring pipeline
//!
//! Intervals need each patient's complete timeline, so they are computed for
//! the whole batch first. Everything after that is per record and runs on the
//! rayon pool when the configuration allows it. The first error aborts the
//! run and no partial output is returned.

pub mod summary;

use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;

use crate::algorithm::{
    FeatureAssembler, FittedModel, IntervalEngine, KeyphraseDictionary, ReportSegmenter,
    ScanInterval, Scorer, StructuredCounts,
};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{DataQualityNotice, ScanRecord, ScoredScan};

pub use summary::RunSummary;

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// One scored scan per input record, in input order
    pub scans: Vec<ScoredScan>,
    /// Non-fatal data-quality notices
    pub notices: Vec<DataQualityNotice>,
    pub summary: RunSummary,
}

/// Feature extraction and scoring over a batch of scan records
///
/// The dictionary and model are read-only for the lifetime of the pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    dictionary: KeyphraseDictionary,
    model: FittedModel,
    segmenter: ReportSegmenter,
}

impl Pipeline {
    /// Create a pipeline, checking that the feature schema is closed and that
    /// the model only reads producible features
    pub fn new(
        config: PipelineConfig,
        dictionary: KeyphraseDictionary,
        model: FittedModel,
    ) -> Result<Self> {
        let assembler = FeatureAssembler::new(&dictionary);
        assembler.ensure_distinct()?;
        assembler.ensure_produces(model.feature_names())?;

        let segmenter = ReportSegmenter::new(config.anchors.clone());
        Ok(Self {
            config,
            dictionary,
            model,
            segmenter,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[must_use]
    pub const fn dictionary(&self) -> &KeyphraseDictionary {
        &self.dictionary
    }

    #[must_use]
    pub const fn model(&self) -> &FittedModel {
        &self.model
    }

    /// Feature names of every output vector, in order
    #[must_use]
    pub fn feature_schema(&self) -> Vec<String> {
        FeatureAssembler::new(&self.dictionary).schema().to_vec()
    }

    /// Process all records
    pub fn run(&self, records: &[ScanRecord]) -> Result<PipelineOutput> {
        let start = Instant::now();
        info!(
            "Scoring {} scan records ({})",
            records.len(),
            if self.config.parallel { "parallel" } else { "sequential" }
        );

        let intervals =
            IntervalEngine::new(self.config.interval_threshold_months).compute(records);
        debug!("Computed intervals for {} records", intervals.len());

        let assembler = FeatureAssembler::new(&self.dictionary);
        let scorer = Scorer::new(&self.model, self.config.cutoff_override);
        let process = |(row, (record, interval)): (usize, (&ScanRecord, &ScanInterval))| {
            self.process_record(row, record, interval, &assembler, &scorer)
        };

        let processed: Vec<(ScoredScan, Vec<DataQualityNotice>)> = if self.config.parallel {
            records
                .par_iter()
                .zip(intervals.par_iter())
                .enumerate()
                .map(process)
                .collect::<Result<_>>()?
        } else {
            records
                .iter()
                .zip(intervals.iter())
                .enumerate()
                .map(process)
                .collect::<Result<_>>()?
        };

        let mut scans = Vec::with_capacity(processed.len());
        let mut notices = Vec::new();
        for (scan, record_notices) in processed {
            scans.push(scan);
            notices.extend(record_notices);
        }

        let summary =
            RunSummary::from_scans(&scans, notices.len(), scorer.cutoff(), start.elapsed());
        info!(
            "Scored {} scans for {} patients in {:?}: {} surveillance, {} other",
            summary.scan_count,
            summary.patient_count,
            summary.elapsed,
            summary.surveillance_count,
            summary.other_count
        );

        Ok(PipelineOutput {
            scans,
            notices,
            summary,
        })
    }

    fn process_record(
        &self,
        row: usize,
        record: &ScanRecord,
        interval: &ScanInterval,
        assembler: &FeatureAssembler<'_>,
        scorer: &Scorer<'_>,
    ) -> Result<(ScoredScan, Vec<DataQualityNotice>)> {
        let (counts, notices) = StructuredCounts::from_record(row, record);
        let segments = self.segmenter.segment(&record.report_text);
        let features =
            assembler.assemble(record, &counts, interval, &segments.text_of_interest())?;
        let prediction = scorer.score(&features)?;

        let scan = ScoredScan {
            row,
            patient_id: record.patient_id.clone(),
            ct_date: record.ct_date,
            diff_months: interval.diff_months,
            features,
            prediction,
            extra: record.extra.clone(),
        };
        Ok((scan, notices))
    }
}
