//! # frameguard
//!
//! Scan video files for toxic on-screen text.
//!
//! `frameguard` decodes a video with FFmpeg (via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate), samples its
//! frames at a configurable rate, extracts any on-screen text through an OCR
//! capability, classifies that text for harmful content, and produces a
//! structured report of flagged timestamps.
//!
//! ## Quick Start
//!
//! ```no_run
//! use frameguard::{
//!     AnalyzerConfig, KeywordClassifier, TesseractTextExtractor, VideoAnalyzer,
//! };
//!
//! let analyzer = VideoAnalyzer::with_config(
//!     Box::new(TesseractTextExtractor::new()),
//!     Box::new(KeywordClassifier::new()),
//!     AnalyzerConfig::new().with_sample_rate(0.5).with_threshold(0.5),
//! );
//!
//! let report = analyzer.analyze("upload.mp4")?;
//! for flagged in &report.flagged_content {
//!     println!(
//!         "frame {} at {:.2}s: {:?}",
//!         flagged.frame_index, flagged.timestamp_seconds, flagged.toxic_categories,
//!     );
//! }
//! # Ok::<(), frameguard::FrameGuardError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`FrameSource`] — opens a container and decodes frames lazily, one at a
//!   time, with a sequential frame index and cached [`VideoMetadata`].
//! - [`TextExtractor`] — the OCR capability seam. An OCR miss is an empty
//!   string, never an error. [`TesseractTextExtractor`] shells out to the
//!   system `tesseract` binary.
//! - [`TextClassifier`] — the classification capability seam, returning the
//!   model's full label→score mapping. [`RemoteClassifier`] calls a hosted
//!   inference endpoint; [`KeywordClassifier`] is an offline rule-based
//!   fallback.
//! - [`VideoAnalyzer`] — the sampling pipeline tying the above together;
//!   [`analyze_frames`] exposes its core loop over any frame sequence.
//! - [`generate_report`] — filters analysis records by a confidence
//!   threshold into the serializable [`Report`].
//! - [`YouTubeCommentSource`] / [`classify_comments`] — the sibling
//!   comment-scanning feature, sharing the classifier seam.
//!
//! Processing is single-threaded and synchronous: each
//! [`VideoAnalyzer::process_video`] call owns its decoder exclusively and
//! releases it on every exit path. There is no internal cancellation —
//! callers needing a timeout must impose one around the whole call.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system, and the
//! `tesseract` binary must be on `$PATH` when using
//! [`TesseractTextExtractor`].

pub mod classifier;
pub mod comments;
pub mod error;
pub mod ffmpeg;
pub mod metadata;
pub mod ocr;
pub mod pipeline;
pub mod report;
pub mod source;
mod utilities;

pub use classifier::{KeywordClassifier, RemoteClassifier, TextClassifier};
pub use comments::{CommentClassification, YouTubeCommentSource, classify_comments};
pub use error::FrameGuardError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use metadata::VideoMetadata;
pub use ocr::{TesseractTextExtractor, TextExtractor};
pub use pipeline::{AnalyzerConfig, DEFAULT_SAMPLE_RATE, VideoAnalyzer, analyze_frames};
pub use report::{AnalysisRecord, DEFAULT_THRESHOLD, FlaggedRecord, Report, generate_report};
pub use source::{DecodedFrame, FrameIterator, FrameSource};
