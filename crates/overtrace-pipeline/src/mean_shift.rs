//! Mean-shift filtering for the "Abstract" look.
//!
//! Every pixel starts a search at its own position and color. Each
//! iteration gathers the pixels within `spatial_radius` (a square
//! window) whose color lies within `color_radius` (Euclidean, in RGB) of
//! the current color, then moves position and color to their mean. The
//! converged color is written back to the starting pixel, so regions of
//! similar color collapse to a shared flat tone.
//!
//! Cost is roughly `width * height * (2 * spatial_radius + 1)^2 *
//! max_iterations` color comparisons, so large radii on large images are
//! slow.

use image::{Rgb, RgbImage};

/// Parameters of a mean-shift run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanShiftParams {
    /// Half-size of the square search window, in pixels.
    pub spatial_radius: u32,
    /// Maximum Euclidean color distance of contributing pixels.
    pub color_radius: f32,
    /// Iteration cap per pixel.
    pub max_iterations: u32,
    /// Stop once the color moves by at most this much (L1).
    pub epsilon: f32,
}

impl Default for MeanShiftParams {
    fn default() -> Self {
        Self {
            spatial_radius: 21,
            color_radius: 51.0,
            max_iterations: 5,
            epsilon: 1.0,
        }
    }
}

/// Flatten color regions with mean-shift filtering.
#[must_use = "returns the filtered image"]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss
)]
pub fn mean_shift(image: &RgbImage, params: &MeanShiftParams) -> RgbImage {
    let (w, h) = image.dimensions();
    let radius = i64::from(params.spatial_radius);
    let color_radius_sq = params.color_radius * params.color_radius;

    RgbImage::from_fn(w, h, |x0, y0| {
        let (mut x, mut y) = (i64::from(x0), i64::from(y0));
        let mut color = image.get_pixel(x0, y0).0.map(f32::from);

        for _ in 0..params.max_iterations {
            let x_lo = (x - radius).max(0);
            let x_hi = (x + radius).min(i64::from(w) - 1);
            let y_lo = (y - radius).max(0);
            let y_hi = (y + radius).min(i64::from(h) - 1);

            let mut count = 0u32;
            let (mut sx, mut sy) = (0i64, 0i64);
            let mut sc = [0.0f32; 3];

            for ny in y_lo..=y_hi {
                for nx in x_lo..=x_hi {
                    let p = image.get_pixel(nx as u32, ny as u32).0;
                    let d: f32 = (0..3)
                        .map(|c| {
                            let diff = f32::from(p[c]) - color[c];
                            diff * diff
                        })
                        .sum();
                    if d <= color_radius_sq {
                        count += 1;
                        sx += nx;
                        sy += ny;
                        for c in 0..3 {
                            sc[c] += f32::from(p[c]);
                        }
                    }
                }
            }

            if count == 0 {
                break;
            }

            let n = count as f32;
            let new_x = (sx as f32 / n).round() as i64;
            let new_y = (sy as f32 / n).round() as i64;
            let new_color = sc.map(|s| s / n);
            let shift: f32 = (0..3).map(|c| (new_color[c] - color[c]).abs()).sum();

            let stopped = (new_x == x && new_y == y) || shift <= params.epsilon;
            x = new_x;
            y = new_y;
            color = new_color;
            if stopped {
                break;
            }
        }

        Rgb(color.map(|c| c.round().clamp(0.0, 255.0) as u8))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> MeanShiftParams {
        MeanShiftParams {
            spatial_radius: 3,
            ..MeanShiftParams::default()
        }
    }

    #[test]
    fn flat_image_is_unchanged() {
        let img = RgbImage::from_pixel(8, 6, Rgb([40, 80, 120]));
        assert_eq!(mean_shift(&img, &small_params()), img);
    }

    #[test]
    fn distant_colors_stay_separate() {
        let img = RgbImage::from_fn(10, 6, |x, _| {
            if x < 5 {
                Rgb([0, 0, 0])
            } else {
                Rgb([250, 250, 250])
            }
        });
        assert_eq!(mean_shift(&img, &small_params()), img);
    }

    #[test]
    fn small_noise_is_flattened() {
        let img = RgbImage::from_fn(9, 9, |x, y| {
            let v = if (x + y) % 2 == 0 { 100 } else { 106 };
            Rgb([v, v, v])
        });
        let out = mean_shift(&img, &small_params());
        // Checkerboard noise converges toward its mean, 103.
        for p in out.pixels() {
            for c in 0..3 {
                assert!(p.0[c].abs_diff(103) <= 1, "got {:?}", p.0);
            }
        }
    }

    #[test]
    fn dimensions_preserved() {
        let img = RgbImage::new(5, 3);
        assert_eq!(mean_shift(&img, &small_params()).dimensions(), (5, 3));
    }
}
