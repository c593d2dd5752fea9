//! FrameSource integration tests.
//!
//! Tests require a fixture video at `tests/fixtures/sample_video.mp4`
//! (any short clip works, e.g. generated with
//! `ffmpeg -f lavfi -i testsrc=duration=2:size=320x240:rate=10 sample_video.mp4`)
//! and are skipped when it is absent.

use std::path::Path;

use frameguard::FrameSource;

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

#[test]
fn metadata_is_cached_at_open() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let source = FrameSource::open(path).expect("Failed to open fixture");
    let metadata = source.metadata();

    assert!(metadata.width > 0);
    assert!(metadata.height > 0);
    assert!(metadata.frames_per_second > 0.0);
    assert!(metadata.frame_count > 0);
    assert_eq!(source.frame_rate(), metadata.frames_per_second);
    assert_eq!(source.total_frames(), metadata.frame_count);
}

#[test]
fn frame_indices_are_sequential_with_no_gaps() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut source = FrameSource::open(path).expect("Failed to open fixture");
    let iter = source.frames().expect("Failed to create iterator");

    let mut expected_index = 0u64;
    for result in iter {
        let frame = result.expect("Each frame should decode successfully");
        assert_eq!(frame.index, expected_index);
        expected_index += 1;
    }

    assert!(expected_index > 0, "Expected at least one decoded frame");
}

#[test]
fn frames_decode_to_source_resolution_rgb() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut source = FrameSource::open(path).expect("Failed to open fixture");
    let (width, height) = (source.metadata().width, source.metadata().height);

    let first = source
        .frames()
        .expect("Failed to create iterator")
        .next()
        .expect("Expected at least one frame")
        .expect("First frame should decode");

    assert_eq!(first.image.width(), width);
    assert_eq!(first.image.height(), height);
    assert!(first.image.as_rgb8().is_some(), "Frames decode to RGB8");
}

#[test]
fn source_can_be_reopened_after_iteration() {
    // Each analysis pass owns its decoder; a fresh open must always work.
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut source = FrameSource::open(path).expect("Failed to open fixture");
    let first_pass = source.frames().expect("iterator").count();
    drop(source);

    let mut source = FrameSource::open(path).expect("Failed to reopen fixture");
    let second_pass = source.frames().expect("iterator").count();

    assert_eq!(first_pass, second_pass);
}
