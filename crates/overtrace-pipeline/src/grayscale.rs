//! Image decoding and luminance conversion.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces the RGB
//! raster the pipeline works on, plus the single-channel conversions
//! used by the grayscale-based filters.

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::types::PipelineError;

/// Fixed-point BT.601 weights scaled by 2^14: R, G, B.
const LUMA_WEIGHTS: [u32; 3] = [4899, 9617, 1868];
const LUMA_SHIFT: u32 = 14;
const LUMA_ROUND: u32 = 1 << (LUMA_SHIFT - 1);

/// Decode raw image bytes into an RGB raster.
///
/// Supports whatever the `image` crate was built with (PNG, JPEG, BMP,
/// WebP). Alpha is dropped.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgb8())
}

/// Luminance of one RGB pixel: `0.299*R + 0.587*G + 0.114*B`, rounded.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn luminance(rgb: [u8; 3]) -> u8 {
    let sum = rgb[0] as u32 * LUMA_WEIGHTS[0]
        + rgb[1] as u32 * LUMA_WEIGHTS[1]
        + rgb[2] as u32 * LUMA_WEIGHTS[2]
        + LUMA_ROUND;
    // Weights sum to 2^14, so the shifted value never exceeds 255.
    (sum >> LUMA_SHIFT) as u8
}

/// Collapse an RGB image to a single luminance channel.
#[must_use = "returns the grayscale image"]
pub fn to_gray(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([luminance(image.get_pixel(x, y).0)])
    })
}

/// Replicate a single channel into all three RGB channels.
#[must_use = "returns the expanded RGB image"]
pub fn expand_to_rgb(image: &GrayImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let v = image.get_pixel(x, y).0[0];
        Rgb([v, v, v])
    })
}

/// Bitwise complement of every pixel.
#[must_use = "returns the inverted image"]
pub fn invert(image: &GrayImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([!image.get_pixel(x, y).0[0]])
    })
}
