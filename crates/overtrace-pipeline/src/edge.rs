//! "Magic Outline": dark edge lines on a light background.
//!
//! Grayscale -> 5×5 Gaussian blur -> Canny -> invert. The result is a
//! binary single-channel image where edges are 0 and everything else is
//! 255, which reads as pencil lines when overlaid on paper.

use image::GrayImage;

/// Minimum effective Canny threshold.
///
/// Hysteresis grows edges through every neighbour above the low
/// threshold; a low threshold of zero would let a single strong edge
/// flood every non-flat region.
pub const MIN_THRESHOLD: f32 = 1.0;
const _: () = assert!(MIN_THRESHOLD > 0.0);

/// Side length of the smoothing kernel applied before edge detection.
pub const BLUR_KERNEL: u32 = 5;

/// Value of non-edge pixels in the outline output.
pub const BACKGROUND: u8 = 255;

/// Detect edges using the Canny algorithm.
///
/// Returns a binary image: 255 for edge pixels, 0 for non-edge.
///
/// An inverted pair is swapped rather than rejected, then both
/// thresholds are raised to at least [`MIN_THRESHOLD`].
#[must_use = "returns the binary edge map"]
pub fn canny(image: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    let (low, high) = if low_threshold > high_threshold {
        (high_threshold, low_threshold)
    } else {
        (low_threshold, high_threshold)
    };
    crate::canny::canny(image, low.max(MIN_THRESHOLD), high.max(MIN_THRESHOLD))
}

/// Invert a binary edge map (bitwise NOT).
///
/// Swaps edge pixels (255 → 0) and background pixels (0 → 255).
#[must_use = "returns the inverted edge map"]
pub fn invert_edge_map(edges: &GrayImage) -> GrayImage {
    crate::grayscale::invert(edges)
}

/// Full outline filter on a grayscale image.
#[must_use = "returns the outline image"]
pub fn outline(gray: &GrayImage, low: u16, high: u16) -> GrayImage {
    let blurred = crate::blur::gaussian_blur_kernel(gray, BLUR_KERNEL);
    let edges = canny(&blurred, f32::from(low), f32::from(high));
    invert_edge_map(&edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 20x20 image with a sharp vertical boundary at x = 10.
    fn sharp_edge_image() -> GrayImage {
        GrayImage::from_fn(20, 20, |x, _y| {
            if x < 10 {
                image::Luma([0])
            } else {
                image::Luma([255])
            }
        })
    }

    #[test]
    fn blank_image_produces_no_edges() {
        let img = GrayImage::from_fn(20, 20, |_, _| image::Luma([128]));
        let edges = canny(&img, 50.0, 150.0);
        let edge_count: u32 = edges.pixels().map(|p| u32::from(p.0[0] > 0)).sum();
        assert_eq!(edge_count, 0, "expected no edges in uniform image");
    }

    #[test]
    fn sharp_edge_detected() {
        let img = sharp_edge_image();
        let edges = canny(&img, 50.0, 150.0);
        let edge_count: u32 = edges.pixels().map(|p| u32::from(p.0[0] > 0)).sum();
        assert!(
            edge_count > 0,
            "expected edges at sharp boundary, found none"
        );
    }

    #[test]
    fn zero_low_threshold_is_clamped_to_min() {
        let img = sharp_edge_image();
        let edges_zero = canny(&img, 0.0, 150.0);
        let edges_min = canny(&img, MIN_THRESHOLD, 150.0);
        assert_eq!(edges_zero, edges_min);
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn inverted_thresholds_are_swapped() {
        let img = GrayImage::from_fn(24, 24, |x, y| image::Luma([((x * 7 + y * 3) % 256) as u8]));
        assert_eq!(canny(&img, 200.0, 100.0), canny(&img, 100.0, 200.0));
        assert_eq!(canny(&img, 60.0, 5.0), canny(&img, 5.0, 60.0));
    }

    #[test]
    fn swapped_pair_is_still_floored() {
        let img = sharp_edge_image();
        assert_eq!(canny(&img, 0.0, -10.0), canny(&img, MIN_THRESHOLD, MIN_THRESHOLD));
    }

    #[test]
    fn double_invert_is_identity() {
        let mut img = GrayImage::new(5, 5);
        img.put_pixel(2, 2, image::Luma([255]));
        let double_inverted = invert_edge_map(&invert_edge_map(&img));
        assert_eq!(img, double_inverted);
    }

    #[test]
    fn outline_of_flat_field_is_all_background() {
        let img = GrayImage::from_pixel(32, 24, image::Luma([128]));
        let out = outline(&img, 50, 150);
        assert!(out.pixels().all(|p| p.0[0] == BACKGROUND));
    }

    #[test]
    fn outline_draws_dark_line_on_step() {
        let out = outline(&sharp_edge_image(), 50, 150);
        let dark = out.pixels().filter(|p| p.0[0] == 0).count();
        assert!(dark > 0, "expected dark outline pixels");
        assert!(out.pixels().all(|p| p.0[0] == 0 || p.0[0] == BACKGROUND));
        // Far from the boundary stays background.
        assert_eq!(out.get_pixel(2, 10).0[0], BACKGROUND);
        assert_eq!(out.get_pixel(17, 10).0[0], BACKGROUND);
    }
}
