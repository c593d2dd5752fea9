//! Error types for the `frameguard` crate.
//!
//! This module defines [`FrameGuardError`], the unified error type returned by
//! all fallible operations in the crate. Variants split into two families:
//! fatal errors that abort an analysis run before or during processing
//! (resource and configuration problems), and the per-frame
//! [`Classification`](FrameGuardError::Classification) variant, which the
//! sampling pipeline recovers from locally.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `frameguard` operations.
///
/// Every public method that can fail returns `Result<T, FrameGuardError>`.
/// Variants carry enough context to diagnose the problem without needing
/// additional logging at the call site.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FrameGuardError {
    /// The media file could not be opened or decoded.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::FrameSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// A video frame could not be decoded. Aborts the whole analysis run —
    /// a corrupt stream produces no partial report.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// The configured sample rate does not resolve to a usable sampling
    /// interval. Raised before any frame is decoded.
    #[error("Invalid sample rate {0}: must be a fraction in (0, 1]")]
    InvalidSampleRate(f64),

    /// The text-classification capability failed for a piece of text.
    ///
    /// The sampling pipeline treats this as recoverable: the affected frame
    /// is dropped from the result sequence and processing continues.
    #[error("Text classification failed: {0}")]
    Classification(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate during frame conversion.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),

    /// An HTTP request to an external capability endpoint failed.
    #[error("HTTP request failed: {0}")]
    HttpError(String),
}

impl From<FfmpegError> for FrameGuardError {
    fn from(error: FfmpegError) -> Self {
        FrameGuardError::FfmpegError(error.to_string())
    }
}

impl From<reqwest::Error> for FrameGuardError {
    fn from(error: reqwest::Error) -> Self {
        FrameGuardError::HttpError(error.to_string())
    }
}
