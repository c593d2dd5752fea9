//! Analysis records and report generation.
//!
//! The sampling pipeline produces a sequence of [`AnalysisRecord`] values —
//! one per sampled frame that yielded OCR text and a successful
//! classification. [`generate_report`] then filters that sequence by a confidence
//! threshold into a [`Report`], the structure callers serialize and return.
//!
//! Report generation is a pure function of its inputs: running it twice over
//! the same records and threshold yields an identical report.

use std::collections::BTreeMap;

use serde::Serialize;

/// Default confidence threshold above which a category flags a frame.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// The analysis result for one sampled frame.
///
/// Only frames whose OCR text was non-empty produce a record; `text` is
/// therefore non-empty by construction. Records are immutable once created
/// and owned by the pipeline's result vector.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    /// Frame timestamp in seconds (`frame_index / frames_per_second`).
    pub timestamp_seconds: f64,
    /// Zero-based index of the frame in decode order.
    pub frame_index: u64,
    /// Text extracted from the frame, whitespace-trimmed, non-empty.
    pub text: String,
    /// Full label→score mapping reported by the classifier for this text.
    /// The key set is whatever the classifier returned — not a fixed global
    /// category list.
    pub scores: BTreeMap<String, f32>,
}

/// A flagged frame: an [`AnalysisRecord`] restricted to the categories that
/// exceeded the report threshold.
///
/// Serializes to the wire format
/// `{"timestamp": .., "frame_number": .., "text": .., "toxic_categories": {..}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedRecord {
    /// Frame timestamp in seconds.
    #[serde(rename = "timestamp")]
    pub timestamp_seconds: f64,
    /// Zero-based index of the frame in decode order.
    #[serde(rename = "frame_number")]
    pub frame_index: u64,
    /// Text extracted from the frame.
    pub text: String,
    /// Categories whose score strictly exceeded the threshold. Never empty —
    /// a record with nothing above threshold is dropped, not emitted empty.
    pub toxic_categories: BTreeMap<String, f32>,
}

/// Summary of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Report {
    /// Number of analysis records produced — i.e. how many sampled frames
    /// yielded analyzable text, **not** how many frames were decoded.
    pub total_frames_analyzed: usize,
    /// Flagged frames, preserving the original temporal order.
    pub flagged_content: Vec<FlaggedRecord>,
}

/// Filter analysis records by `threshold` into a [`Report`].
///
/// A category flags a frame only when its score is **strictly greater** than
/// the threshold; a score exactly equal to it does not. Records with no
/// exceeding category are dropped entirely.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
///
/// use frameguard::{AnalysisRecord, generate_report};
///
/// let record = AnalysisRecord {
///     timestamp_seconds: 0.3,
///     frame_index: 3,
///     text: "some text".to_string(),
///     scores: BTreeMap::from([("toxic".to_string(), 0.9)]),
/// };
///
/// let report = generate_report(&[record], 0.5);
/// assert_eq!(report.total_frames_analyzed, 1);
/// assert_eq!(report.flagged_content.len(), 1);
/// ```
pub fn generate_report(records: &[AnalysisRecord], threshold: f32) -> Report {
    let mut flagged_content = Vec::new();

    for record in records {
        let toxic_categories: BTreeMap<String, f32> = record
            .scores
            .iter()
            .filter(|&(_, &score)| score > threshold)
            .map(|(label, &score)| (label.clone(), score))
            .collect();

        if !toxic_categories.is_empty() {
            flagged_content.push(FlaggedRecord {
                timestamp_seconds: record.timestamp_seconds,
                frame_index: record.frame_index,
                text: record.text.clone(),
                toxic_categories,
            });
        }
    }

    Report {
        total_frames_analyzed: records.len(),
        flagged_content,
    }
}
