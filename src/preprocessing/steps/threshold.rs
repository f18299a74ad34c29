use crate::error::AppError;
use image::{DynamicImage, GrayImage, Luma};

/// Global binarization cut. Luminance at or above this value is on
/// (white), below is off (black).
const CUT: u8 = 128;

/// Binarize the image at a fixed global threshold.
///
/// Luminance is always re-derived from the incoming image, even when a
/// grayscale conversion already ran earlier in the pipeline, so this
/// step works the same whether or not that step was selected.
pub fn apply(image: DynamicImage) -> Result<DynamicImage, AppError> {
    Ok(DynamicImage::ImageLuma8(binarize(&image.to_luma8())))
}

fn binarize(gray: &GrayImage) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y).0[0] >= CUT {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_produces_only_two_values() {
        let img = GrayImage::from_fn(64, 4, |x, _| Luma([(x * 4) as u8]));
        let result = apply(DynamicImage::ImageLuma8(img)).unwrap().to_luma8();
        assert!(result.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn test_cut_is_inclusive_at_128() {
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(0, 0, Luma([127]));
        img.put_pixel(1, 0, Luma([128]));

        let result = apply(DynamicImage::ImageLuma8(img)).unwrap().to_luma8();
        assert_eq!(result.get_pixel(0, 0).0[0], 0);
        assert_eq!(result.get_pixel(1, 0).0[0], 255);
    }

    #[test]
    fn test_threshold_works_on_color_input() {
        use image::{Rgb, RgbImage};

        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([250, 250, 250]));
        img.put_pixel(1, 0, Rgb([10, 10, 10]));

        let result = apply(DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(result.color().channel_count(), 1);
        let gray = result.to_luma8();
        assert_eq!(gray.get_pixel(0, 0).0[0], 255);
        assert_eq!(gray.get_pixel(1, 0).0[0], 0);
    }
}
