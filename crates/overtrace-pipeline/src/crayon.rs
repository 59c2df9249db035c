//! Crayon drawing: flat, smoothed color held together by dark outlines.
//!
//! 1. Edge-preserving bilateral smoothing of the color image.
//! 2. Grayscale of the smoothed image.
//! 3. Local mean adaptive threshold: bright-ish pixels pass, pixels
//!    darker than their neighbourhood become line work.
//! 4. The threshold mask is ANDed with the smoothed color image.

use image::{GrayImage, Rgb, RgbImage};
use imageproc::contrast::adaptive_threshold;
use imageproc::filter::bilateral::{ColorDistance, bilateral_filter};

/// Bilateral window radius (a 9×9 window).
pub const BILATERAL_RADIUS: u8 = 4;
/// Bilateral range (color difference) sigma.
pub const BILATERAL_SIGMA_COLOR: f32 = 75.0;
/// Bilateral domain (distance) sigma.
pub const BILATERAL_SIGMA_SPACE: f32 = 75.0;
/// Adaptive threshold block radius (a 9×9 block).
pub const THRESHOLD_RADIUS: u32 = 4;
/// Constant subtracted from the local mean before comparing.
pub const THRESHOLD_OFFSET: i32 = 2;

/// Largest L1 distance between two RGB pixels.
const MAX_L1_DISTANCE: usize = 3 * 255;

/// Gaussian weight of the L1 (sum of absolute channel differences)
/// distance between two colors.
///
/// Weights are tabulated once per filter run, indexed by distance.
#[derive(Debug, Clone)]
pub struct GaussianL1ColorDistance {
    weights: Vec<f32>,
}

impl GaussianL1ColorDistance {
    /// Build the weight table for `sigma`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(sigma: f32) -> Self {
        let coeff = -0.5 / (sigma * sigma);
        let weights = (0..=MAX_L1_DISTANCE)
            .map(|d| {
                let d = d as f32;
                (d * d * coeff).exp()
            })
            .collect();
        Self { weights }
    }
}

impl ColorDistance<Rgb<u8>> for GaussianL1ColorDistance {
    fn color_distance(&self, pixel1: &Rgb<u8>, pixel2: &Rgb<u8>) -> f32 {
        let distance: usize = pixel1
            .0
            .iter()
            .zip(pixel2.0.iter())
            .map(|(a, b)| usize::from(a.abs_diff(*b)))
            .sum();
        self.weights[distance]
    }
}

/// Edge-preserving smoothing of a color image.
///
/// The window is `(2 * radius + 1)` square with replicated borders.
/// Channel averages are truncated, so flat regions may come out one
/// level darker.
#[must_use = "returns the smoothed image"]
pub fn bilateral_smooth(
    image: &RgbImage,
    radius: u8,
    sigma_color: f32,
    sigma_space: f32,
) -> RgbImage {
    if image.width() == 0 || image.height() == 0 {
        return image.clone();
    }
    bilateral_filter(
        image,
        radius,
        sigma_space,
        GaussianL1ColorDistance::new(sigma_color),
    )
}

/// Binary line mask: 255 where a pixel is brighter than its local mean
/// minus [`THRESHOLD_OFFSET`], 0 elsewhere.
#[must_use = "returns the binary mask"]
pub fn line_mask(gray: &GrayImage) -> GrayImage {
    // The library keeps pixels at or above `mean - delta`; one less
    // offset makes the comparison strict.
    adaptive_threshold(gray, THRESHOLD_RADIUS, THRESHOLD_OFFSET - 1)
}

/// Keep color where `mask` is non-zero, black elsewhere.
#[must_use = "returns the masked image"]
pub fn apply_mask(color: &RgbImage, mask: &GrayImage) -> RgbImage {
    RgbImage::from_fn(color.width(), color.height(), |x, y| {
        let m = mask.get_pixel(x, y).0[0];
        let p = color.get_pixel(x, y).0;
        Rgb(p.map(|c| c & m))
    })
}

/// Full crayon filter.
#[must_use = "returns the crayon image"]
pub fn crayon(image: &RgbImage) -> RgbImage {
    let smoothed = bilateral_smooth(
        image,
        BILATERAL_RADIUS,
        BILATERAL_SIGMA_COLOR,
        BILATERAL_SIGMA_SPACE,
    );
    let gray = crate::grayscale::to_gray(&smoothed);
    let mask = line_mask(&gray);
    apply_mask(&smoothed, &mask)
}
