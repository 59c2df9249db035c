//! Geometry stage: quarter-turn rotation, flips, and percentage crop.
//!
//! Rotation comes first, then the flips, then the crop. Crop bounds are
//! computed against the post-rotation size, so "left" always means the
//! left edge of what the user currently sees.

use image::RgbImage;
use image::imageops;

use crate::types::{CropMargins, Rotation};

/// Pixel rectangle kept by a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    /// Left column (inclusive).
    pub x: u32,
    /// Top row (inclusive).
    pub y: u32,
    /// Width in pixels (non-zero).
    pub width: u32,
    /// Height in pixels (non-zero).
    pub height: u32,
}

/// Rotate clockwise by the given number of quarter turns.
///
/// Lossless: pixels are moved, never resampled.
#[must_use = "returns the rotated image"]
pub fn rotate(image: &RgbImage, rotation: Rotation) -> RgbImage {
    match rotation {
        Rotation::None => image.clone(),
        Rotation::Cw90 => imageops::rotate90(image),
        Rotation::Cw180 => imageops::rotate180(image),
        Rotation::Cw270 => imageops::rotate270(image),
    }
}

/// Mirror the image in place. The two flips commute.
pub fn flip(image: &mut RgbImage, horizontal: bool, vertical: bool) {
    if horizontal {
        imageops::flip_horizontal_in_place(image);
    }
    if vertical {
        imageops::flip_vertical_in_place(image);
    }
}

/// Pixel offset of a percentage margin along an axis of `extent` pixels.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn margin_pixels(extent: u32, percent: f64) -> u32 {
    let percent = if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    };
    (f64::from(extent) * percent / 100.0).floor() as u32
}

/// Compute the rectangle kept by `margins` on an image of the given size.
///
/// Returns `None` when the margins leave no pixels on either axis
/// (`left >= right` or `top >= bottom` after conversion to pixels). The
/// caller treats that as "skip the crop", not as an error.
#[must_use]
pub fn crop_rect(width: u32, height: u32, margins: &CropMargins) -> Option<CropRect> {
    let x0 = margin_pixels(width, margins.left);
    let x1 = width.saturating_sub(margin_pixels(width, margins.right));
    let y0 = margin_pixels(height, margins.top);
    let y1 = height.saturating_sub(margin_pixels(height, margins.bottom));

    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    Some(CropRect {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
    })
}

/// Crop by percentage margins, or return the image unchanged if the
/// margins are degenerate.
#[must_use = "returns the cropped image"]
pub fn crop(image: RgbImage, margins: &CropMargins) -> RgbImage {
    if margins.is_none() {
        return image;
    }

    match crop_rect(image.width(), image.height(), margins) {
        Some(rect) if (rect.width, rect.height) != image.dimensions() => {
            imageops::crop_imm(&image, rect.x, rect.y, rect.width, rect.height).to_image()
        }
        Some(_) => image,
        None => {
            tracing::debug!(
                width = image.width(),
                height = image.height(),
                ?margins,
                "crop margins leave no pixels; skipping crop"
            );
            image
        }
    }
}

/// Run the whole geometry stage: rotate, flip, crop.
#[must_use = "returns the oriented image"]
pub fn orient(
    image: &RgbImage,
    rotation: Rotation,
    flip_horizontal: bool,
    flip_vertical: bool,
    margins: &CropMargins,
) -> RgbImage {
    let mut rotated = rotate(image, rotation);
    flip(&mut rotated, flip_horizontal, flip_vertical);
    crop(rotated, margins)
}
