//! Pencil sketch via a color-dodge blend.
//!
//! The grayscale image is divided by the inverse of a heavily blurred
//! copy of its own negative. Flat regions saturate to white while edges,
//! where the blurred negative differs from the local value, stay dark.

use image::{GrayImage, Luma};

/// Side length of the blur applied to the inverted image.
pub const BLUR_KERNEL: u32 = 21;

/// Scale applied to the dodge quotient.
const DODGE_SCALE: u32 = 256;

/// Color-dodge one pixel: `gray * 256 / (255 - blurred)`, rounded and
/// clamped to 255. A zero divisor yields 0.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn dodge(gray: u8, blurred_inverse: u8) -> u8 {
    let divisor = u32::from(255 - blurred_inverse);
    if divisor == 0 {
        return 0;
    }
    let quotient = (u32::from(gray) * DODGE_SCALE * 2 + divisor) / (divisor * 2);
    quotient.min(255) as u8
}

/// Render a single-channel pencil sketch of a grayscale image.
#[must_use = "returns the sketch image"]
pub fn pencil_sketch(gray: &GrayImage) -> GrayImage {
    let inverted = crate::grayscale::invert(gray);
    let blurred = crate::blur::gaussian_blur_kernel(&inverted, BLUR_KERNEL);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        Luma([dodge(gray.get_pixel(x, y).0[0], blurred.get_pixel(x, y).0[0])])
    })
}
