//! Gaussian blur used by the outline and pencil-sketch filters.
//!
//! Wraps [`imageproc::filter::gaussian_blur_f32`]. Filters describe their
//! blur by an odd kernel size (5×5 before edge detection, 21×21 for the
//! sketch dodge layer); [`sigma_for_kernel`] turns that into the sigma
//! the underlying implementation expects.

use image::GrayImage;

/// Sigma of a Gaussian whose useful support is a `size`×`size` kernel.
///
/// Uses the conventional derivation `0.3 * ((size - 1) / 2 - 1) + 0.8`,
/// giving 1.1 for a 5×5 kernel and 3.5 for 21×21. Sizes below 3 are
/// treated as 3.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sigma_for_kernel(size: u32) -> f32 {
    let size = size.max(3) as f32;
    0.3f32.mul_add((size - 1.0) * 0.5 - 1.0, 0.8)
}

/// Apply Gaussian blur to a grayscale image.
///
/// Higher `sigma` values produce more smoothing. Non-positive sigma values
/// (zero or negative) return the image unchanged, since `imageproc`'s
/// underlying function panics on `sigma <= 0.0`.
#[must_use = "returns the blurred image"]
pub fn gaussian_blur(image: &GrayImage, sigma: f32) -> GrayImage {
    if sigma <= 0.0 || sigma.is_nan() {
        return image.clone();
    }

    imageproc::filter::gaussian_blur_f32(image, sigma)
}

/// Blur with the sigma equivalent of a `size`×`size` kernel.
#[must_use = "returns the blurred image"]
pub fn gaussian_blur_kernel(image: &GrayImage, size: u32) -> GrayImage {
    gaussian_blur(image, sigma_for_kernel(size))
}
