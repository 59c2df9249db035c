//! Guide grid burned into the output.
//!
//! Evenly spaced vertical and horizontal one-pixel lines split the image
//! into `divisions`×`divisions` cells, helping the user keep proportions
//! while tracing. Lines are green on color output and mid-gray on
//! single-channel output.

use image::{Luma, Rgb};
use imageproc::drawing::draw_line_segment_mut;

use crate::types::OutputImage;

/// Line color on color images.
pub const COLOR_LINE: Rgb<u8> = Rgb([0, 255, 0]);
/// Line intensity on single-channel images.
pub const GRAY_LINE: Luma<u8> = Luma([128]);
/// Smallest accepted number of divisions.
pub const MIN_DIVISIONS: u32 = 2;

/// Pixel offsets of the interior grid lines along an axis.
///
/// Returns `divisions - 1` offsets, `floor(extent * i / divisions)`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn line_offsets(extent: u32, divisions: u32) -> Vec<u32> {
    let divisions = divisions.max(MIN_DIVISIONS);
    (1..divisions)
        .map(|i| (u64::from(extent) * u64::from(i) / u64::from(divisions)) as u32)
        .filter(|&offset| offset < extent)
        .collect()
}

/// Draw the grid onto `image` in place.
#[allow(clippy::cast_precision_loss)]
pub fn draw_grid(image: &mut OutputImage, divisions: u32) {
    let (w, h) = (image.width(), image.height());
    if w == 0 || h == 0 {
        return;
    }
    // One past the last pixel; out-of-bounds points are skipped when drawing.
    let right = w as f32;
    let bottom = h as f32;
    let columns = line_offsets(w, divisions);
    let rows = line_offsets(h, divisions);

    match image {
        OutputImage::Color(img) => {
            for &x in &columns {
                draw_line_segment_mut(img, (x as f32, 0.0), (x as f32, bottom), COLOR_LINE);
            }
            for &y in &rows {
                draw_line_segment_mut(img, (0.0, y as f32), (right, y as f32), COLOR_LINE);
            }
        }
        OutputImage::Gray(img) => {
            for &x in &columns {
                draw_line_segment_mut(img, (x as f32, 0.0), (x as f32, bottom), GRAY_LINE);
            }
            for &y in &rows {
                draw_line_segment_mut(img, (0.0, y as f32), (right, y as f32), GRAY_LINE);
            }
        }
    }
}
