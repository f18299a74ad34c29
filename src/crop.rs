//! Server-side application of the crop region selected in the UI.
//!
//! The interactive widget runs in the browser and posts the selected
//! rectangle; only the actual sub-image extraction happens here.

use crate::error::AppError;
use image::DynamicImage;
use serde::Deserialize;

/// Rectangle selected by the cropping widget, in pixel coordinates of
/// the uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Extract the selected sub-region as a new image. The region is
    /// clamped to the image bounds; a selection that clamps to nothing
    /// is rejected.
    pub fn apply(&self, image: &DynamicImage) -> Result<DynamicImage, AppError> {
        if self.x >= image.width() || self.y >= image.height() {
            return Err(AppError::InvalidRequest(format!(
                "crop origin ({}, {}) outside image bounds {}x{}",
                self.x,
                self.y,
                image.width(),
                image.height()
            )));
        }

        let width = self.width.min(image.width() - self.x);
        let height = self.height.min(image.height() - self.y);
        if width == 0 || height == 0 {
            return Err(AppError::InvalidRequest("empty crop region".to_string()));
        }

        Ok(image.crop_imm(self.x, self.y, width, height))
    }
}
