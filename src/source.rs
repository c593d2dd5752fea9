//! Video frame source.
//!
//! [`FrameSource`] is the decoding entry point of the crate. It opens a media
//! file, locates the best video stream, caches [`VideoMetadata`], and hands
//! out a lazy [`FrameIterator`] that decodes frames one at a time in
//! presentation order.
//!
//! The demuxer and decoder contexts are owned by the source and the iterator
//! respectively, so dropping them — on any exit path, including an early
//! return from a failed analysis — releases the underlying FFmpeg resources.
//!
//! # Example
//!
//! ```no_run
//! use frameguard::FrameSource;
//!
//! let mut source = FrameSource::open("input.mp4")?;
//! println!("{:.2} fps", source.frame_rate());
//!
//! for result in source.frames()? {
//!     let frame = result?;
//!     println!("decoded frame {}", frame.index);
//! }
//! # Ok::<(), frameguard::FrameGuardError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Error as FfmpegError,
    Packet,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::error::FrameGuardError;
use crate::metadata::VideoMetadata;

/// A single decoded video frame.
///
/// `index` is a sequential, zero-based counter over decoded frames:
/// strictly increasing, one per frame, no gaps. Timestamps derive from it as
/// `index / frames_per_second`.
pub struct DecodedFrame {
    /// Zero-based position of this frame in decode order.
    pub index: u64,
    /// Frame pixels, converted to RGB8 at the source resolution.
    pub image: DynamicImage,
}

/// An opened video file, ready for sequential frame decoding.
///
/// Created via [`FrameSource::open`]. Holds the demuxer context and cached
/// metadata; the actual decoder is allocated per [`frames()`](FrameSource::frames)
/// call and released when the returned iterator is dropped.
pub struct FrameSource {
    /// The opened FFmpeg input (demuxer) context.
    pub(crate) input_context: Input,
    /// Cached metadata extracted at open time.
    pub(crate) metadata: VideoMetadata,
    /// Index of the best video stream.
    pub(crate) video_stream_index: usize,
    /// Path to the opened media file.
    pub(crate) file_path: PathBuf,
}

impl Debug for FrameSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FrameSource")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl FrameSource {
    /// Open a media file for frame decoding.
    ///
    /// Initializes FFmpeg (idempotent), opens the file, locates the best
    /// video stream, and caches its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`FrameGuardError::FileOpen`] if the file cannot be opened or
    /// decoded, and [`FrameGuardError::NoVideoStream`] if it contains no
    /// video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FrameGuardError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();

        // Initialise ffmpeg (safe to call multiple times).
        ffmpeg_next::init().map_err(|error| FrameGuardError::FileOpen {
            path: file_path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| FrameGuardError::FileOpen {
                path: file_path.clone(),
                reason: error.to_string(),
            })?;

        let video_stream_index = input_context
            .streams()
            .best(Type::Video)
            .map(|stream| stream.index())
            .ok_or(FrameGuardError::NoVideoStream)?;

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let format = input_context.format().name().to_string();

        let stream = input_context
            .stream(video_stream_index)
            .ok_or(FrameGuardError::NoVideoStream)?;
        let codec_parameters = stream.parameters();
        let decoder_context =
            CodecContext::from_parameters(codec_parameters).map_err(|error| {
                FrameGuardError::FileOpen {
                    path: file_path.clone(),
                    reason: format!("Failed to read video codec parameters: {error}"),
                }
            })?;
        let video_decoder =
            decoder_context
                .decoder()
                .video()
                .map_err(|error| FrameGuardError::FileOpen {
                    path: file_path.clone(),
                    reason: format!("Failed to create video decoder: {error}"),
                })?;

        let width = video_decoder.width();
        let height = video_decoder.height();

        // Compute frames per second from the stream's average frame rate.
        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 {
            frame_rate.numerator() as f64 / frame_rate.denominator() as f64
        } else {
            // Fallback: try the stream's rate field.
            let rate = stream.rate();
            if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            }
        };

        let frame_count = if frames_per_second > 0.0 {
            (duration.as_secs_f64() * frames_per_second) as u64
        } else {
            0
        };

        let codec_name = video_decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = VideoMetadata {
            width,
            height,
            frames_per_second,
            frame_count,
            codec: codec_name,
            duration,
            format,
        };

        log::debug!(
            "Opened {}: {} frames at {:.2} fps",
            file_path.display(),
            metadata.frame_count,
            metadata.frames_per_second,
        );

        Ok(Self {
            input_context,
            metadata,
            video_stream_index,
            file_path,
        })
    }

    /// Get a reference to the cached video metadata.
    ///
    /// Metadata is extracted once during [`open`](FrameSource::open) and does
    /// not require additional decoding.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Frames per second of the video stream.
    pub fn frame_rate(&self) -> f64 {
        self.metadata.frames_per_second
    }

    /// Estimated total number of frames in the video stream.
    pub fn total_frames(&self) -> u64 {
        self.metadata.frame_count
    }

    /// Create a lazy iterator over every frame of the video, in decode order.
    ///
    /// The iterator borrows this source mutably, so only one decode pass can
    /// be in flight at a time. Dropping the iterator releases the decoder.
    ///
    /// # Errors
    ///
    /// Returns an error if the video decoder cannot be set up.
    pub fn frames(&mut self) -> Result<FrameIterator<'_>, FrameGuardError> {
        FrameIterator::new(self)
    }
}

/// A lazy iterator over decoded video frames.
///
/// Frames are decoded one at a time as [`next()`](Iterator::next) is called —
/// each call reads just enough packets to produce the next frame, so memory
/// use is bounded by a single frame regardless of video length.
///
/// Created via [`FrameSource::frames`].
pub struct FrameIterator<'a> {
    source: &'a mut FrameSource,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    video_stream_index: usize,
    width: u32,
    height: u32,
    /// Sequential decode counter; becomes [`DecodedFrame::index`].
    next_index: u64,
    decoded_frame: VideoFrame,
    scaled_frame: VideoFrame,
    eof_sent: bool,
    done: bool,
}

impl<'a> FrameIterator<'a> {
    fn new(source: &'a mut FrameSource) -> Result<Self, FrameGuardError> {
        let video_stream_index = source.video_stream_index;
        let width = source.metadata.width;
        let height = source.metadata.height;

        let stream = source
            .input_context
            .stream(video_stream_index)
            .ok_or(FrameGuardError::NoVideoStream)?;
        let codec_parameters = stream.parameters();
        let decoder_context = CodecContext::from_parameters(codec_parameters)?;
        let decoder = decoder_context.decoder().video()?;

        let scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        Ok(Self {
            source,
            decoder,
            scaler,
            video_stream_index,
            width,
            height,
            next_index: 0,
            decoded_frame: VideoFrame::empty(),
            scaled_frame: VideoFrame::empty(),
            eof_sent: false,
            done: false,
        })
    }

    /// Scale and convert the current `decoded_frame` to a `DynamicImage`.
    fn convert_current_frame(&mut self) -> Result<DynamicImage, FrameGuardError> {
        self.scaler
            .run(&self.decoded_frame, &mut self.scaled_frame)?;

        let buffer =
            crate::utilities::frame_to_rgb_buffer(&self.scaled_frame, self.width, self.height);
        let image = RgbImage::from_raw(self.width, self.height, buffer).ok_or_else(|| {
            FrameGuardError::VideoDecodeError(
                "Failed to construct RGB image from decoded frame data".to_string(),
            )
        })?;
        Ok(DynamicImage::ImageRgb8(image))
    }
}

impl Iterator for FrameIterator<'_> {
    type Item = Result<DecodedFrame, FrameGuardError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            // Try to receive a frame the decoder has already produced.
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                match self.convert_current_frame() {
                    Ok(image) => {
                        let index = self.next_index;
                        self.next_index += 1;
                        return Some(Ok(DecodedFrame { index, image }));
                    }
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
            }

            // Decoder has no buffered frames. Feed it more packets.
            if self.eof_sent {
                // Already sent EOF and decoder is drained.
                self.done = true;
                return None;
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.source.input_context) {
                Ok(()) => {
                    if packet.stream() == self.video_stream_index {
                        if let Err(e) = self.decoder.send_packet(&packet) {
                            self.done = true;
                            return Some(Err(FrameGuardError::VideoDecodeError(e.to_string())));
                        }
                    }
                    // Non-video packets are silently skipped.
                }
                Err(FfmpegError::Eof) => {
                    if let Err(e) = self.decoder.send_eof() {
                        self.done = true;
                        return Some(Err(FrameGuardError::VideoDecodeError(e.to_string())));
                    }
                    self.eof_sent = true;
                }
                Err(_) => {
                    // Non-fatal read error — try the next packet.
                }
            }
        }
    }
}
