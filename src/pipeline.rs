//! The frame-sampling analysis pipeline.
//!
//! [`VideoAnalyzer`] drives a [`FrameSource`](crate::FrameSource) through the
//! full analysis: decode frames in order, select every Nth frame according to
//! the configured sample rate, run OCR on each selected frame, classify any
//! extracted text, and accumulate [`AnalysisRecord`]s. Memory stays
//! proportional to the number of records, never to the video length — frame
//! pixels are dropped as soon as a frame has been handled.
//!
//! Failure policy, per frame:
//!
//! - a decoder error is fatal and aborts the whole run with no partial
//!   result;
//! - an OCR miss (empty text) silently skips the frame;
//! - a classification failure drops that one frame from the results and
//!   processing continues.
//!
//! # Example
//!
//! ```no_run
//! use frameguard::{AnalyzerConfig, KeywordClassifier, TesseractTextExtractor, VideoAnalyzer};
//!
//! let config = AnalyzerConfig::new().with_sample_rate(1.0).with_threshold(0.5);
//! let analyzer = VideoAnalyzer::with_config(
//!     Box::new(TesseractTextExtractor::new()),
//!     Box::new(KeywordClassifier::new()),
//!     config,
//! );
//!
//! let report = analyzer.analyze("upload.mp4")?;
//! println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! # Ok::<(), frameguard::FrameGuardError>(())
//! ```

use std::num::NonZeroU64;
use std::path::Path;

use crate::classifier::TextClassifier;
use crate::error::FrameGuardError;
use crate::ocr::TextExtractor;
use crate::report::{AnalysisRecord, DEFAULT_THRESHOLD, Report, generate_report};
use crate::source::{DecodedFrame, FrameSource};

/// Default fraction of frames selected for analysis (every 2nd frame).
pub const DEFAULT_SAMPLE_RATE: f64 = 0.5;

/// Configuration for an analysis run.
///
/// Built in the usual chained style:
///
/// ```
/// use frameguard::AnalyzerConfig;
///
/// let config = AnalyzerConfig::new()
///     .with_sample_rate(1.0)
///     .with_threshold(0.8);
/// ```
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Fraction of frames to analyze, in `(0, 1]`. A rate of 0.5 analyzes
    /// every 2nd frame, 1.0 every frame. Defaults to 0.5.
    pub sample_rate: f64,
    /// Confidence threshold for report generation. Defaults to 0.5.
    pub threshold: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Set the fraction of frames to analyze.
    ///
    /// Validation happens when processing starts, not here — see
    /// [`sampling_interval`](AnalyzerConfig::sampling_interval).
    #[must_use]
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the report confidence threshold. Clamped to `[0, 1]`.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Resolve the sampling interval: frame `i` is analyzed iff
    /// `i % interval == 0`, where `interval = round(1 / sample_rate)`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGuardError::InvalidSampleRate`] if the rate lies
    /// outside `(0, 1]` (which also covers any value whose reciprocal would
    /// round to zero).
    pub fn sampling_interval(&self) -> Result<NonZeroU64, FrameGuardError> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 || self.sample_rate > 1.0 {
            return Err(FrameGuardError::InvalidSampleRate(self.sample_rate));
        }

        let interval = (1.0 / self.sample_rate).round() as u64;
        NonZeroU64::new(interval)
            .ok_or(FrameGuardError::InvalidSampleRate(self.sample_rate))
    }
}

/// Runs the OCR-and-classify pipeline over a video file.
///
/// Holds the two external capabilities behind their trait seams. The
/// analyzer itself is stateless between calls: each
/// [`process_video`](VideoAnalyzer::process_video) invocation owns its
/// decoder exclusively and releases it before returning, so separate videos
/// need separate invocations (and concurrent processing needs separate
/// analyzer instances).
pub struct VideoAnalyzer {
    extractor: Box<dyn TextExtractor>,
    classifier: Box<dyn TextClassifier>,
    config: AnalyzerConfig,
}

impl VideoAnalyzer {
    /// Create an analyzer with default configuration.
    pub fn new(extractor: Box<dyn TextExtractor>, classifier: Box<dyn TextClassifier>) -> Self {
        Self::with_config(extractor, classifier, AnalyzerConfig::new())
    }

    /// Create an analyzer with an explicit configuration.
    pub fn with_config(
        extractor: Box<dyn TextExtractor>,
        classifier: Box<dyn TextClassifier>,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            extractor,
            classifier,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Decode the video and produce one [`AnalysisRecord`] per sampled frame
    /// whose on-screen text was non-empty and classified successfully.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGuardError::InvalidSampleRate`] before any decoding if
    /// the configuration is unusable, [`FrameGuardError::FileOpen`] /
    /// [`FrameGuardError::NoVideoStream`] if the file cannot be opened, and
    /// [`FrameGuardError::VideoDecodeError`] if the stream fails mid-run —
    /// in which case no partial result is returned.
    pub fn process_video<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Vec<AnalysisRecord>, FrameGuardError> {
        // Configuration problems surface before the decoder is touched.
        let interval = self.config.sampling_interval()?;

        let mut source = FrameSource::open(path)?;
        let frames_per_second = source.frame_rate();
        if frames_per_second <= 0.0 {
            return Err(FrameGuardError::VideoDecodeError(
                "video stream reports no usable frame rate".to_string(),
            ));
        }

        log::info!(
            "Processing video: {} frames at {:.2} fps, sampling every {} frame(s)",
            source.total_frames(),
            frames_per_second,
            interval,
        );

        let frames = source.frames()?;
        analyze_frames(
            frames,
            frames_per_second,
            interval,
            self.extractor.as_ref(),
            self.classifier.as_ref(),
        )
    }

    /// Run the full analysis and generate the thresholded [`Report`].
    ///
    /// Equivalent to [`process_video`](VideoAnalyzer::process_video) followed
    /// by [`generate_report`] with the configured threshold.
    pub fn analyze<P: AsRef<Path>>(&self, path: P) -> Result<Report, FrameGuardError> {
        let records = self.process_video(path)?;
        Ok(generate_report(&records, self.config.threshold))
    }
}

/// The pipeline core: analyze an arbitrary sequence of decoded frames.
///
/// [`VideoAnalyzer::process_video`] feeds this from a
/// [`FrameIterator`](crate::FrameIterator); callers with frames from another
/// origin (or tests with synthetic frames) can drive it directly.
///
/// Frame `i` is analyzed iff `i % sampling_interval == 0`. Timestamps are
/// computed as `index / frames_per_second`. A frame-level `Err` in the input
/// sequence aborts the run; a classification failure drops that frame only.
pub fn analyze_frames<I>(
    frames: I,
    frames_per_second: f64,
    sampling_interval: NonZeroU64,
    extractor: &dyn TextExtractor,
    classifier: &dyn TextClassifier,
) -> Result<Vec<AnalysisRecord>, FrameGuardError>
where
    I: IntoIterator<Item = Result<DecodedFrame, FrameGuardError>>,
{
    let interval = sampling_interval.get();
    let mut records = Vec::new();

    for result in frames {
        let frame = result?;

        if frame.index % interval != 0 {
            continue;
        }

        let timestamp_seconds = frame.index as f64 / frames_per_second;
        let text = extractor.extract_text(&frame.image);
        log::debug!("Processed frame {} ({} chars of text)", frame.index, text.len());

        if text.is_empty() {
            // OCR miss — a normal outcome, the frame is simply not analyzable.
            continue;
        }

        match classifier.classify(&text) {
            Ok(scores) => records.push(AnalysisRecord {
                timestamp_seconds,
                frame_index: frame.index,
                text,
                scores,
            }),
            Err(error) => {
                // Named drop policy: one bad model call must not abort a
                // long video run, so the frame is excluded and we continue.
                log::warn!(
                    "Classification failed for frame {}, dropping it: {error}",
                    frame.index,
                );
            }
        }
    }

    Ok(records)
}
