//! Rule-based segmentation of radiology reports
//!
//! Reports follow a loose section order: clinical history, comparison,
//! findings, impression, then sign-off boilerplate. Each section is located
//! with case-sensitive literal anchor phrases. A section whose anchors are
//! missing or out of order comes back as an empty string.
//!
//! Boundary rules:
//! - history runs from the later of the end of the first `CLINICAL HISTORY:`
//!   and the end of the last `years of age`, up to the first `COMPARISON:`
//! - findings runs from the end of the first `FINDINGS:` up to the latest of
//!   the first `IMPRESSION:`, the first `Impression:` and the last `1. `
//! - impression starts `IMPRESSION:`-length past the findings end and runs to
//!   the later of the first consult and the first review boilerplate phrase
//!
//! A missing start anchor yields an empty section; a missing end anchor lets
//! the section run to the end of the report.

use std::cmp::max;

/// Anchor phrases used to locate report sections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentAnchors {
    pub clinical_history: String,
    pub patient_age: String,
    pub comparison: String,
    pub findings: String,
    pub impression_upper: String,
    pub impression_title: String,
    pub list_marker: String,
    pub consult_boilerplate: String,
    pub review_boilerplate: String,
}

impl Default for SegmentAnchors {
    fn default() -> Self {
        Self {
            clinical_history: "CLINICAL HISTORY:".to_string(),
            patient_age: "years of age".to_string(),
            comparison: "COMPARISON:".to_string(),
            findings: "FINDINGS:".to_string(),
            impression_upper: "IMPRESSION:".to_string(),
            impression_title: "Impression:".to_string(),
            list_marker: "1. ".to_string(),
            consult_boilerplate: "Consultation with the referring physician".to_string(),
            review_boilerplate: "I have personally reviewed the images".to_string(),
        }
    }
}

/// Sub-sections of one report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSegments {
    pub clinical_history: String,
    pub findings: String,
    pub impression: String,
}

impl ReportSegments {
    /// Whether no section was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clinical_history.is_empty() && self.findings.is_empty() && self.impression.is_empty()
    }

    /// Join the sections into the text searched for keyphrases
    #[must_use]
    pub fn text_of_interest(&self) -> String {
        format!(
            "{} {} {}",
            self.clinical_history, self.findings, self.impression
        )
    }
}

/// Splits reports into sections using a fixed set of anchors
#[derive(Debug, Clone, Default)]
pub struct ReportSegmenter {
    anchors: SegmentAnchors,
}

impl ReportSegmenter {
    #[must_use]
    pub const fn new(anchors: SegmentAnchors) -> Self {
        Self { anchors }
    }

    #[must_use]
    pub const fn anchors(&self) -> &SegmentAnchors {
        &self.anchors
    }

    /// Segment a single report
    #[must_use]
    pub fn segment(&self, report: &str) -> ReportSegments {
        let a = &self.anchors;

        let history_start = max(
            first_end(report, &a.clinical_history),
            last_end(report, &a.patient_age),
        );
        let history_end = report.find(a.comparison.as_str());

        let findings_start = first_end(report, &a.findings);
        let findings_end = max(
            max(
                report.find(a.impression_upper.as_str()),
                report.find(a.impression_title.as_str()),
            ),
            report.rfind(a.list_marker.as_str()),
        );

        let impression_start = findings_end.map(|end| end + a.impression_upper.len());
        let impression_end = max(
            report.find(a.consult_boilerplate.as_str()),
            report.find(a.review_boilerplate.as_str()),
        );

        ReportSegments {
            clinical_history: slice_between(report, history_start, history_end),
            findings: slice_between(report, findings_start, findings_end),
            impression: slice_between(report, impression_start, impression_end),
        }
    }
}

/// Byte position just past the first occurrence of `anchor`
fn first_end(text: &str, anchor: &str) -> Option<usize> {
    text.find(anchor).map(|pos| pos + anchor.len())
}

/// Byte position just past the last occurrence of `anchor`
fn last_end(text: &str, anchor: &str) -> Option<usize> {
    text.rfind(anchor).map(|pos| pos + anchor.len())
}

/// Trimmed text between two boundaries
///
/// Empty when the start is missing or not before the end. Boundaries that
/// fall past the end of the text or inside a character are clamped.
fn slice_between(text: &str, start: Option<usize>, end: Option<usize>) -> String {
    let Some(start) = start else {
        return String::new();
    };
    let end = end.unwrap_or(text.len()).min(text.len());
    if start >= end {
        return String::new();
    }

    let start = ceil_char_boundary(text, start);
    let end = floor_char_boundary(text, end);
    if start >= end {
        return String::new();
    }

    text[start..end].trim().to_string()
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
