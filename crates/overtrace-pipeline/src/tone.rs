//! Per-pixel color transforms: sepia and negative.

use image::{Rgb, RgbImage};

/// Sepia mixing matrix; rows produce R, G, B from input (R, G, B).
pub const SEPIA_MATRIX: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Apply the sepia matrix to one pixel, clamping each channel to 255.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sepia_pixel(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(f32::from);
    SEPIA_MATRIX.map(|row| {
        let v = row[2].mul_add(b, row[0].mul_add(r, row[1] * g));
        v.round().min(255.0) as u8
    })
}

/// Warm brown tone.
#[must_use = "returns the sepia image"]
pub fn sepia(image: &RgbImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        Rgb(sepia_pixel(image.get_pixel(x, y).0))
    })
}

/// Complement every channel: `255 - v`.
#[must_use = "returns the negative image"]
pub fn negative(image: RgbImage) -> RgbImage {
    let mut out = image;
    for value in out.iter_mut() {
        *value = !*value;
    }
    out
}
