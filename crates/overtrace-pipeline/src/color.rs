//! Brightness/contrast correction.
//!
//! A per-channel linear map `out = clamp(contrast * in + brightness)`,
//! applied through a 256-entry lookup table since the map only depends
//! on the input byte.

use image::RgbImage;

/// Build the lookup table for a gain/bias pair.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn lookup_table(contrast: f32, brightness: i32) -> [u8; 256] {
    let bias = brightness as f32;
    std::array::from_fn(|v| {
        let mapped = contrast.mul_add(v as f32, bias).round();
        // NaN casts to 0, infinities saturate.
        mapped.clamp(0.0, 255.0) as u8
    })
}

/// Returns `true` if the gain/bias pair leaves every value unchanged.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_identity(contrast: f32, brightness: i32) -> bool {
    contrast == 1.0 && brightness == 0
}

/// Apply contrast (gain) and brightness (bias) to every channel.
#[must_use = "returns the corrected image"]
pub fn adjust(image: RgbImage, contrast: f32, brightness: i32) -> RgbImage {
    if is_identity(contrast, brightness) {
        return image;
    }

    let table = lookup_table(contrast, brightness);
    let mut out = image;
    for value in out.iter_mut() {
        *value = table[usize::from(*value)];
    }
    out
}
