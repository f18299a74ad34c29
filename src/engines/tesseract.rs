//! Tesseract engine driven through its command-line interface.
//!
//! The image is staged as a temporary PNG and handed to the executable
//! located at startup; recognized text comes back on stdout.

use crate::engine::{PageSegMode, TextRecognizer, ENGINE_MODE};
use crate::error::AppError;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Tesseract OCR engine invoked as a subprocess
pub struct TesseractCli {
    program: PathBuf,
}

impl TesseractCli {
    /// Wrap a located executable. Discovery happens in
    /// [`super::locate_tesseract`]; this constructor just records the
    /// result.
    pub fn new(program: PathBuf) -> Self {
        tracing::info!("Tesseract engine initialized ({})", program.display());
        Self { program }
    }
}

impl TextRecognizer for TesseractCli {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(&self, image: &DynamicImage, mode: PageSegMode) -> Result<String, AppError> {
        let staged = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .map_err(|e| AppError::Internal(format!("Failed to create temp file: {}", e)))?;

        image
            .save_with_format(staged.path(), image::ImageFormat::Png)
            .map_err(|e| AppError::RecognitionError(format!("Failed to stage image: {}", e)))?;

        let args = invocation_args(staged.path(), mode);
        tracing::debug!(
            "Running {} {}",
            self.program.display(),
            args.join(" ")
        );

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| {
                AppError::RecognitionError(format!(
                    "Failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::RecognitionError(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Argument list for one recognition call: read the staged file, write
/// to stdout, fixed engine mode, caller-selected segmentation mode.
fn invocation_args(image_path: &Path, mode: PageSegMode) -> Vec<String> {
    vec![
        image_path.display().to_string(),
        "stdout".to_string(),
        "--oem".to_string(),
        ENGINE_MODE.to_string(),
        "--psm".to_string(),
        mode.as_number().to_string(),
    ]
}
