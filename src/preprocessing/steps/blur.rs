use crate::error::AppError;
use image::DynamicImage;
use imageproc::filter::gaussian_blur_f32;

/// Blur standard deviation in pixel units
const SIGMA: f32 = 1.0;

/// Apply an isotropic Gaussian blur to whatever image the earlier
/// steps produced, keeping its pixel format.
pub fn apply(image: DynamicImage) -> Result<DynamicImage, AppError> {
    let blurred = match image {
        DynamicImage::ImageLuma8(img) => DynamicImage::ImageLuma8(gaussian_blur_f32(&img, SIGMA)),
        DynamicImage::ImageLumaA8(img) => {
            DynamicImage::ImageLumaA8(gaussian_blur_f32(&img, SIGMA))
        }
        DynamicImage::ImageRgb8(img) => DynamicImage::ImageRgb8(gaussian_blur_f32(&img, SIGMA)),
        DynamicImage::ImageRgba8(img) => DynamicImage::ImageRgba8(gaussian_blur_f32(&img, SIGMA)),
        other => DynamicImage::ImageRgba8(gaussian_blur_f32(&other.to_rgba8(), SIGMA)),
    };
    Ok(blurred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_blur_softens_an_edge() {
        // Hard step edge; after blurring, pixels next to the edge move
        // toward the opposite side
        let img = GrayImage::from_fn(20, 20, |x, _| {
            if x < 10 {
                Luma([0])
            } else {
                Luma([255])
            }
        });

        let result = apply(DynamicImage::ImageLuma8(img)).unwrap().to_luma8();
        let left_of_edge = result.get_pixel(9, 10).0[0];
        let right_of_edge = result.get_pixel(10, 10).0[0];

        assert!(left_of_edge > 0);
        assert!(right_of_edge < 255);
    }

    #[test]
    fn test_blur_keeps_format_and_dimensions() {
        let img = GrayImage::new(30, 12);
        let result = apply(DynamicImage::ImageLuma8(img)).unwrap();
        assert_eq!(result.color().channel_count(), 1);
        assert_eq!(result.width(), 30);
        assert_eq!(result.height(), 12);
    }

    #[test]
    fn test_uniform_image_stays_uniform() {
        let img = GrayImage::from_pixel(10, 10, Luma([77]));
        let result = apply(DynamicImage::ImageLuma8(img)).unwrap().to_luma8();
        let center = result.get_pixel(5, 5).0[0];
        assert!((center as i16 - 77).abs() <= 1);
    }
}
