use crate::error::AppError;
use image::DynamicImage;
use serde::Serialize;
use std::time::Instant;

use super::steps;

/// Which filters to run. Flags are independent; any subset is valid and
/// the application order is fixed regardless of which are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub contrast: bool,
    pub grayscale: bool,
    pub threshold: bool,
    pub blur: bool,
}

impl FilterSelection {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Timing information for a single preprocessing step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Result of preprocessing including timing stats
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessResult {
    /// Preprocessed image (not serialized)
    #[serde(skip)]
    pub image: DynamicImage,
    /// Total preprocessing time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

/// Preprocessing pipeline with a fixed step order:
/// contrast, grayscale, threshold, blur. Unselected steps are skipped.
pub struct Pipeline {
    selection: FilterSelection,
}

impl Pipeline {
    pub fn new(selection: FilterSelection) -> Self {
        Self { selection }
    }

    /// Run the selected steps over `image`. The caller's image is never
    /// mutated; the result always holds a new value.
    pub fn process(&self, image: &DynamicImage) -> Result<PreprocessResult, AppError> {
        let start = Instant::now();
        let mut timings = Vec::new();

        let mut img = image.clone();

        if self.selection.contrast {
            img = run_step("contrast", img, &mut timings, steps::contrast::apply)?;
        }

        if self.selection.grayscale {
            img = run_step("grayscale", img, &mut timings, steps::grayscale::apply)?;
        }

        if self.selection.threshold {
            img = run_step("threshold", img, &mut timings, steps::threshold::apply)?;
        }

        if self.selection.blur {
            img = run_step("blur", img, &mut timings, steps::blur::apply)?;

            // A bilevel image cannot hold the blur's intermediate grays;
            // re-binarize so thresholded output stays strictly two-valued.
            if self.selection.threshold {
                img = run_step("rebinarize", img, &mut timings, steps::threshold::apply)?;
            }
        }

        Ok(PreprocessResult {
            image: img,
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: timings,
        })
    }
}

fn run_step<F>(
    name: &str,
    img: DynamicImage,
    timings: &mut Vec<StepTiming>,
    step_fn: F,
) -> Result<DynamicImage, AppError>
where
    F: FnOnce(DynamicImage) -> Result<DynamicImage, AppError>,
{
    let step_start = Instant::now();
    let result = step_fn(img)?;
    timings.push(StepTiming {
        name: name.to_string(),
        time_ms: step_start.elapsed().as_millis() as u64,
    });
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 8) as u8, (y * 8) as u8, 128])
        }))
    }

    fn distinct_values(image: &DynamicImage) -> usize {
        let mut values: Vec<u8> = image.to_luma8().pixels().map(|p| p.0[0]).collect();
        values.sort_unstable();
        values.dedup();
        values.len()
    }

    #[test]
    fn test_no_flags_returns_identical_pixels() {
        let original = gradient_rgb(16, 16);
        let result = Pipeline::new(FilterSelection::none())
            .process(&original)
            .unwrap();
        assert_eq!(result.image.as_bytes(), original.as_bytes());
        assert!(result.steps.is_empty());
    }

    #[test]
    fn test_input_image_is_not_mutated() {
        let original = gradient_rgb(16, 16);
        let before = original.as_bytes().to_vec();

        let selection = FilterSelection {
            contrast: true,
            grayscale: true,
            threshold: true,
            blur: true,
        };
        Pipeline::new(selection).process(&original).unwrap();

        assert_eq!(original.as_bytes(), &before[..]);
    }

    #[test]
    fn test_threshold_alone_yields_bilevel() {
        let selection = FilterSelection {
            threshold: true,
            ..FilterSelection::default()
        };
        let result = Pipeline::new(selection).process(&gradient_rgb(32, 32)).unwrap();
        assert!(distinct_values(&result.image) <= 2);
        assert_eq!(result.image.color().channel_count(), 1);
    }

    #[test]
    fn test_threshold_stays_bilevel_with_all_flags() {
        let selection = FilterSelection {
            contrast: true,
            grayscale: true,
            threshold: true,
            blur: true,
        };
        let result = Pipeline::new(selection).process(&gradient_rgb(32, 32)).unwrap();
        assert!(distinct_values(&result.image) <= 2);
    }

    #[test]
    fn test_steps_run_in_fixed_order() {
        let selection = FilterSelection {
            contrast: true,
            grayscale: true,
            threshold: true,
            blur: true,
        };
        let result = Pipeline::new(selection).process(&gradient_rgb(16, 16)).unwrap();
        let names: Vec<&str> = result.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["contrast", "grayscale", "threshold", "blur", "rebinarize"]
        );
    }

    #[test]
    fn test_grayscale_then_threshold_rederives_luma() {
        // Same result whether or not grayscale ran first
        let input = gradient_rgb(16, 16);

        let with_gray = Pipeline::new(FilterSelection {
            grayscale: true,
            threshold: true,
            ..FilterSelection::default()
        })
        .process(&input)
        .unwrap();

        let without_gray = Pipeline::new(FilterSelection {
            threshold: true,
            ..FilterSelection::default()
        })
        .process(&input)
        .unwrap();

        assert_eq!(with_gray.image.as_bytes(), without_gray.image.as_bytes());
    }

    #[test]
    fn test_blur_without_threshold_keeps_grays() {
        let selection = FilterSelection {
            grayscale: true,
            blur: true,
            ..FilterSelection::default()
        };
        let result = Pipeline::new(selection).process(&gradient_rgb(32, 32)).unwrap();
        assert!(distinct_values(&result.image) > 2);
    }

    #[test]
    fn test_blank_image_survives_every_step() {
        let blank = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(4, 4, Luma([200])));
        let selection = FilterSelection {
            contrast: true,
            grayscale: true,
            threshold: true,
            blur: true,
        };
        let result = Pipeline::new(selection).process(&blank).unwrap();
        assert_eq!(result.image.width(), 4);
        assert!(result.image.to_luma8().pixels().all(|p| p.0[0] == 255));
    }
}
