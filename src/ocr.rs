//! Text extraction from decoded frames.
//!
//! [`TextExtractor`] is the seam between the sampling pipeline and the OCR
//! capability. The contract is deliberately infallible: a frame with no
//! readable text is a normal outcome, not an error, so implementations
//! return the empty string on a miss and the pipeline simply moves on.
//!
//! [`TesseractTextExtractor`] is the bundled implementation. It invokes the
//! `tesseract` binary per frame, mirroring the usual deployment where the
//! OCR engine is installed system-wide and loaded once per process.

use std::{
    path::PathBuf,
    process::{Command, Stdio},
};

use image::{DynamicImage, ImageFormat};

/// Extracts on-screen text from a decoded video frame.
///
/// Implementations must trim surrounding whitespace and return the empty
/// string when no text is detected. Internal failures (I/O, subprocess)
/// should be logged and degrade to the empty string — an OCR miss never
/// fails the pipeline.
pub trait TextExtractor: Send + Sync {
    /// Run OCR on the frame and return the recognized text, trimmed.
    fn extract_text(&self, image: &DynamicImage) -> String;
}

/// OCR via the system `tesseract` binary.
///
/// Each frame is written to a scoped temporary PNG and passed to
/// `tesseract <png> stdout -l <language>`. The temp file is removed when the
/// handle drops, on success and failure alike.
///
/// # Example
///
/// ```no_run
/// use frameguard::{TesseractTextExtractor, TextExtractor};
/// use image::DynamicImage;
///
/// let ocr = TesseractTextExtractor::new().with_language("eng");
/// let frame = DynamicImage::new_rgb8(640, 480);
/// let text = ocr.extract_text(&frame);
/// assert!(text.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct TesseractTextExtractor {
    /// Path to the tesseract executable. Defaults to `tesseract` on `$PATH`.
    binary: PathBuf,
    /// Tesseract language code (e.g. `"eng"`).
    language: String,
}

impl TesseractTextExtractor {
    /// Create an extractor using `tesseract` from `$PATH` and English models.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            language: "eng".to_string(),
        }
    }

    /// Use an explicit path to the tesseract executable.
    #[must_use]
    pub fn with_binary<P: Into<PathBuf>>(mut self, binary: P) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set the tesseract language code. Defaults to `"eng"`.
    #[must_use]
    pub fn with_language<S: Into<String>>(mut self, language: S) -> Self {
        self.language = language.into();
        self
    }

    fn run_tesseract(&self, image: &DynamicImage) -> std::io::Result<String> {
        let temp_file = tempfile::Builder::new()
            .prefix("frameguard-frame-")
            .suffix(".png")
            .tempfile()?;

        image
            .save_with_format(temp_file.path(), ImageFormat::Png)
            .map_err(std::io::Error::other)?;

        let output = Command::new(&self.binary)
            .arg(temp_file.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stderr(Stdio::null())
            .output()?;

        if !output.status.success() {
            return Err(std::io::Error::other(format!(
                "tesseract exited with {}",
                output.status,
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for TesseractTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for TesseractTextExtractor {
    fn extract_text(&self, image: &DynamicImage) -> String {
        match self.run_tesseract(image) {
            Ok(text) => text,
            Err(error) => {
                // Treated as an OCR miss; the frame is skipped, not the run.
                log::warn!("OCR invocation failed: {error}");
                String::new()
            }
        }
    }
}
