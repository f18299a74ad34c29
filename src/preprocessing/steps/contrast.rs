use crate::error::AppError;
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

/// Fixed enhancement factor
const FACTOR: f32 = 2.0;

/// Scale contrast by a factor of 2.0 around the image's own mean
/// luminance: out = mean + (in - mean) * 2.0, clamped per channel.
/// Alpha is left untouched.
pub fn apply(image: DynamicImage) -> Result<DynamicImage, AppError> {
    let Some(mean) = mean_luma(&image) else {
        // Zero-area image, nothing to scale
        return Ok(image);
    };

    match image {
        DynamicImage::ImageLuma8(gray) => {
            let scaled = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
                Luma([scale(gray.get_pixel(x, y).0[0], mean)])
            });
            Ok(DynamicImage::ImageLuma8(scaled))
        }
        other => {
            let rgba = other.to_rgba8();
            let scaled = RgbaImage::from_fn(rgba.width(), rgba.height(), |x, y| {
                let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
                Rgba([scale(r, mean), scale(g, mean), scale(b, mean), a])
            });
            Ok(DynamicImage::ImageRgba8(scaled))
        }
    }
}

/// Mean luminance rounded to the nearest integer, the pivot the scaling
/// is applied around. None for zero-area images.
fn mean_luma(image: &DynamicImage) -> Option<f32> {
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    let count = width as u64 * height as u64;
    if count == 0 {
        return None;
    }
    let sum: u64 = gray.pixels().map(|p| p.0[0] as u64).sum();
    Some((sum as f32 / count as f32).round())
}

fn scale(value: u8, mean: f32) -> u8 {
    (mean + (value as f32 - mean) * FACTOR).clamp(0.0, 255.0) as u8
}
