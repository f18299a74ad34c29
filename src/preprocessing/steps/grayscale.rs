use crate::error::AppError;
use image::DynamicImage;

/// Convert to single-channel luminance, discarding color.
pub fn apply(image: DynamicImage) -> Result<DynamicImage, AppError> {
    Ok(DynamicImage::ImageLuma8(image.to_luma8()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_grayscale_is_single_channel() {
        let img = RgbImage::from_pixel(10, 10, Rgb([200, 30, 90]));
        let result = apply(DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(result.color().channel_count(), 1);
    }

    #[test]
    fn test_luma_weighting_orders_primaries() {
        // Perceptual weighting: green reads brighter than red, red than blue
        let mut img = RgbImage::new(3, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        img.put_pixel(2, 0, Rgb([0, 0, 255]));

        let gray = apply(DynamicImage::ImageRgb8(img)).unwrap().to_luma8();
        let red = gray.get_pixel(0, 0).0[0];
        let green = gray.get_pixel(1, 0).0[0];
        let blue = gray.get_pixel(2, 0).0[0];

        assert!(green > red);
        assert!(red > blue);
    }

    #[test]
    fn test_preserves_dimensions() {
        let img = RgbImage::new(64, 48);
        let result = apply(DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(result.width(), 64);
        assert_eq!(result.height(), 48);
    }
}
