//! Video metadata types.
//!
//! This module defines the metadata structure returned by
//! [`FrameSource::metadata`](crate::FrameSource::metadata). Metadata is
//! extracted once when the file is opened and cached for the lifetime of the
//! source.

use std::time::Duration;

/// Metadata for the video stream of an opened media file.
///
/// Includes dimensions, frame rate, estimated frame count, and codec name.
///
/// # Example
///
/// ```no_run
/// use frameguard::FrameSource;
///
/// let source = FrameSource::open("input.mp4").unwrap();
/// let metadata = source.metadata();
/// println!("{} frames at {:.2} fps", metadata.frame_count, metadata.frames_per_second);
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second (may be approximate for variable-frame-rate content).
    ///
    /// Treated as constant for the duration of one video: every timestamp
    /// this crate computes is `frame_index / frames_per_second`.
    pub frames_per_second: f64,
    /// Estimated total number of frames, computed from duration and frame rate.
    pub frame_count: u64,
    /// Codec name (e.g. `"h264"`, `"vp9"`, `"av1"`).
    pub codec: String,
    /// Total duration of the media file.
    pub duration: Duration,
    /// Container format name (e.g. `"mp4"`, `"matroska"`).
    pub format: String,
}
