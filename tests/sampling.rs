//! Sampling pipeline tests.
//!
//! These drive [`analyze_frames`] with synthetic frames and scripted
//! capability implementations, so no media fixtures or external tools are
//! required. Each synthetic frame encodes its index in its first pixel,
//! which the scripted extractor reads back to decide what text to "see".

use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroU64;

use frameguard::{
    AnalyzerConfig, DecodedFrame, FrameGuardError, TextClassifier, TextExtractor,
    analyze_frames, generate_report,
};
use image::{DynamicImage, Rgb, RgbImage};

fn synthetic_frame(index: u64) -> Result<DecodedFrame, FrameGuardError> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([index as u8, 0, 0])));
    Ok(DecodedFrame { index, image })
}

fn synthetic_video(frame_count: u64) -> Vec<Result<DecodedFrame, FrameGuardError>> {
    (0..frame_count).map(synthetic_frame).collect()
}

/// Returns scripted text for the frames listed, empty text otherwise.
struct ScriptedExtractor {
    texts: HashMap<u8, String>,
}

impl ScriptedExtractor {
    fn new(entries: &[(u64, &str)]) -> Self {
        Self {
            texts: entries
                .iter()
                .map(|(index, text)| (*index as u8, text.to_string()))
                .collect(),
        }
    }

    fn all_frames(text: &str) -> Self {
        Self {
            texts: (0..=u8::MAX).map(|index| (index, text.to_string())).collect(),
        }
    }
}

impl TextExtractor for ScriptedExtractor {
    fn extract_text(&self, image: &DynamicImage) -> String {
        let index = image.to_rgb8().get_pixel(0, 0)[0];
        self.texts.get(&index).cloned().unwrap_or_default()
    }
}

/// Returns the same score map for every input.
struct FixedClassifier {
    scores: BTreeMap<String, f32>,
}

impl FixedClassifier {
    fn new(entries: &[(&str, f32)]) -> Self {
        Self {
            scores: entries
                .iter()
                .map(|(label, score)| (label.to_string(), *score))
                .collect(),
        }
    }
}

impl TextClassifier for FixedClassifier {
    fn classify(&self, _text: &str) -> Result<BTreeMap<String, f32>, FrameGuardError> {
        Ok(self.scores.clone())
    }
}

/// Fails for one specific text, succeeds for everything else.
struct FlakyClassifier {
    fail_on: String,
    scores: BTreeMap<String, f32>,
}

impl TextClassifier for FlakyClassifier {
    fn classify(&self, text: &str) -> Result<BTreeMap<String, f32>, FrameGuardError> {
        if text == self.fail_on {
            Err(FrameGuardError::Classification(
                "model rejected input".to_string(),
            ))
        } else {
            Ok(self.scores.clone())
        }
    }
}

fn interval(value: u64) -> NonZeroU64 {
    NonZeroU64::new(value).expect("test interval is non-zero")
}

// ── sampling interval resolution ───────────────────────────────────

#[test]
fn sample_rate_one_samples_every_frame() {
    let config = AnalyzerConfig::new().with_sample_rate(1.0);
    assert_eq!(config.sampling_interval().unwrap().get(), 1);
}

#[test]
fn sample_rate_half_samples_every_second_frame() {
    let config = AnalyzerConfig::new().with_sample_rate(0.5);
    assert_eq!(config.sampling_interval().unwrap().get(), 2);
}

#[test]
fn sample_rate_third_rounds_to_three() {
    let config = AnalyzerConfig::new().with_sample_rate(0.3);
    assert_eq!(config.sampling_interval().unwrap().get(), 3);
}

#[test]
fn sample_rate_zero_is_invalid() {
    let config = AnalyzerConfig::new().with_sample_rate(0.0);
    assert!(matches!(
        config.sampling_interval(),
        Err(FrameGuardError::InvalidSampleRate(_)),
    ));
}

#[test]
fn sample_rate_negative_is_invalid() {
    let config = AnalyzerConfig::new().with_sample_rate(-0.5);
    assert!(config.sampling_interval().is_err());
}

#[test]
fn sample_rate_above_one_is_invalid() {
    let config = AnalyzerConfig::new().with_sample_rate(3.0);
    assert!(config.sampling_interval().is_err());
}

#[test]
fn sample_rate_nan_is_invalid() {
    let config = AnalyzerConfig::new().with_sample_rate(f64::NAN);
    assert!(config.sampling_interval().is_err());
}

#[test]
fn threshold_is_clamped() {
    let config = AnalyzerConfig::new().with_threshold(1.5);
    assert_eq!(config.threshold, 1.0);

    let config = AnalyzerConfig::new().with_threshold(-0.1);
    assert_eq!(config.threshold, 0.0);
}

// ── frame selection ────────────────────────────────────────────────

#[test]
fn sampled_indices_match_modulus_rule() {
    let extractor = ScriptedExtractor::all_frames("text on every frame");
    let classifier = FixedClassifier::new(&[("toxic", 0.9)]);

    for interval_value in [1u64, 2, 3, 5] {
        let records = analyze_frames(
            synthetic_video(20),
            10.0,
            interval(interval_value),
            &extractor,
            &classifier,
        )
        .expect("analysis should succeed");

        let sampled: Vec<u64> = records.iter().map(|r| r.frame_index).collect();
        let expected: Vec<u64> = (0..20).filter(|i| i % interval_value == 0).collect();
        assert_eq!(sampled, expected, "interval {interval_value}");
    }
}

#[test]
fn timestamps_are_index_over_fps() {
    let extractor = ScriptedExtractor::all_frames("text");
    let classifier = FixedClassifier::new(&[("toxic", 0.9)]);

    let records = analyze_frames(
        synthetic_video(12),
        24.0,
        interval(1),
        &extractor,
        &classifier,
    )
    .expect("analysis should succeed");

    for record in &records {
        let expected = record.frame_index as f64 / 24.0;
        assert!(
            (record.timestamp_seconds - expected).abs() < 1e-9,
            "frame {}: {} != {}",
            record.frame_index,
            record.timestamp_seconds,
            expected,
        );
    }
}

#[test]
fn frames_without_text_produce_no_records() {
    // Text on frames 2 and 4 only; everything else is an OCR miss.
    let extractor = ScriptedExtractor::new(&[(2, "first"), (4, "second")]);
    let classifier = FixedClassifier::new(&[("toxic", 0.6)]);

    let records = analyze_frames(
        synthetic_video(10),
        10.0,
        interval(1),
        &extractor,
        &classifier,
    )
    .expect("analysis should succeed");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].frame_index, 2);
    assert_eq!(records[1].frame_index, 4);
    assert_eq!(records[0].text, "first");
}

#[test]
fn unsampled_frames_are_never_extracted() {
    // Interval 2 with text only on an odd frame: nothing should be analyzed.
    let extractor = ScriptedExtractor::new(&[(3, "odd frame text")]);
    let classifier = FixedClassifier::new(&[("toxic", 0.9)]);

    let records = analyze_frames(
        synthetic_video(10),
        10.0,
        interval(2),
        &extractor,
        &classifier,
    )
    .expect("analysis should succeed");

    assert!(records.is_empty());
}

// ── failure semantics ──────────────────────────────────────────────

#[test]
fn decode_error_aborts_the_run() {
    let mut frames = synthetic_video(5);
    frames[2] = Err(FrameGuardError::VideoDecodeError(
        "corrupt packet".to_string(),
    ));

    let extractor = ScriptedExtractor::all_frames("text");
    let classifier = FixedClassifier::new(&[("toxic", 0.9)]);

    let result = analyze_frames(frames, 10.0, interval(1), &extractor, &classifier);
    assert!(matches!(
        result,
        Err(FrameGuardError::VideoDecodeError(_)),
    ));
}

#[test]
fn classification_failure_drops_only_that_frame() {
    // Scenario D: three candidate frames, the classifier rejects one.
    let extractor = ScriptedExtractor::new(&[(1, "fine"), (3, "poison"), (5, "also fine")]);
    let classifier = FlakyClassifier {
        fail_on: "poison".to_string(),
        scores: BTreeMap::from([("toxic".to_string(), 0.7)]),
    };

    let records = analyze_frames(
        synthetic_video(8),
        10.0,
        interval(1),
        &extractor,
        &classifier,
    )
    .expect("per-frame classification failures must not abort the run");

    assert_eq!(records.len(), 2);
    let indices: Vec<u64> = records.iter().map(|r| r.frame_index).collect();
    assert_eq!(indices, vec![1, 5]);
}

// ── end-to-end scenarios ───────────────────────────────────────────

#[test]
fn flagged_frame_appears_in_report() {
    // Scenario A: 10 frames at 10 fps, every frame sampled, text on frame 3
    // classified as toxic at 0.9.
    let extractor = ScriptedExtractor::new(&[(3, "you are horrible")]);
    let classifier = FixedClassifier::new(&[("toxic", 0.9)]);

    let records = analyze_frames(
        synthetic_video(10),
        10.0,
        interval(1),
        &extractor,
        &classifier,
    )
    .expect("analysis should succeed");

    let report = generate_report(&records, 0.5);
    assert!(report.total_frames_analyzed >= 1);
    assert_eq!(report.flagged_content.len(), 1);

    let flagged = &report.flagged_content[0];
    assert_eq!(flagged.frame_index, 3);
    assert!((flagged.timestamp_seconds - 0.3).abs() < 1e-9);
    assert_eq!(flagged.text, "you are horrible");
    assert_eq!(flagged.toxic_categories.get("toxic"), Some(&0.9));
}

#[test]
fn video_without_text_yields_empty_report() {
    // Scenario B: no frame contains extractable text.
    let extractor = ScriptedExtractor::new(&[]);
    let classifier = FixedClassifier::new(&[("toxic", 0.9)]);

    let records = analyze_frames(
        synthetic_video(10),
        10.0,
        interval(1),
        &extractor,
        &classifier,
    )
    .expect("analysis should succeed");

    let report = generate_report(&records, 0.5);
    assert_eq!(report.total_frames_analyzed, 0);
    assert!(report.flagged_content.is_empty());
}
