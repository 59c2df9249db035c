//! Canny edge detection on an already-smoothed grayscale image.
//!
//! `imageproc::edges::canny` applies its own σ=1.4 blur and its
//! hysteresis step can index past the image border
//! (<https://github.com/image-rs/imageproc/issues/705>). The outline
//! filter blurs explicitly with a 5×5 kernel first, so this module runs
//! only the remaining three steps:
//!
//! 1. Sobel gradients with an L1 magnitude `|gx| + |gy|`.
//! 2. Non-maximum suppression along the quantized gradient direction.
//! 3. Hysteresis: pixels above `high` seed edges, which grow through
//!    8-connected neighbours above `low`.
//!
//! Border pixels are never edges.

use image::{GrayImage, Luma};
use imageproc::definitions::Image;
use imageproc::filter::filter_clamped;
use imageproc::kernel;

/// Edge pixel value in the returned map.
pub const EDGE: u8 = 255;

/// Gradient direction quantized to the four neighbour axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Horizontal,
    Diagonal45,
    Vertical,
    Diagonal135,
}

impl Direction {
    /// `tan(22.5°)` and `tan(67.5°)` for sector classification.
    const TAN_22_5: f32 = 0.414_213_57;
    const TAN_67_5: f32 = 2.414_213_6;

    /// Quantize a gradient vector, with `y` pointing down the image.
    fn from_gradient(gx: f32, gy: f32) -> Self {
        let (ax, ay) = (gx.abs(), gy.abs());
        if ay <= ax * Self::TAN_22_5 {
            Self::Horizontal
        } else if ay >= ax * Self::TAN_67_5 {
            Self::Vertical
        } else if (gx > 0.0) == (gy > 0.0) {
            Self::Diagonal45
        } else {
            Self::Diagonal135
        }
    }

    /// Offsets of the two neighbours compared during suppression.
    const fn neighbours(self) -> [(i64, i64); 2] {
        match self {
            Self::Horizontal => [(-1, 0), (1, 0)],
            Self::Vertical => [(0, -1), (0, 1)],
            Self::Diagonal45 => [(-1, -1), (1, 1)],
            Self::Diagonal135 => [(1, -1), (-1, 1)],
        }
    }
}

/// Row-major gradient magnitude buffer with signed-offset lookups.
struct Magnitudes {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl Magnitudes {
    fn index(&self, x: usize, y: usize, dx: i64, dy: i64) -> Option<usize> {
        let nx = usize::try_from(i64::try_from(x).ok()? + dx).ok()?;
        let ny = usize::try_from(i64::try_from(y).ok()? + dy).ok()?;
        (nx < self.width && ny < self.height).then_some(ny * self.width + nx)
    }

    fn get(&self, x: usize, y: usize, dx: i64, dy: i64) -> f32 {
        self.index(x, y, dx, dy).map_or(0.0, |i| self.values[i])
    }
}

/// Detect edges, returning 255 for edge pixels and 0 elsewhere.
///
/// Expects `0 <= low <= high`; callers normalize the pair (see
/// [`crate::edge::canny`]).
#[must_use = "returns the binary edge map"]
pub fn canny(image: &GrayImage, low: f32, high: f32) -> GrayImage {
    let (w, h) = image.dimensions();
    let mut out = GrayImage::new(w, h);
    if w < 3 || h < 3 {
        return out;
    }

    let gx: Image<Luma<i16>> = filter_clamped(image, kernel::SOBEL_HORIZONTAL_3X3);
    let gy: Image<Luma<i16>> = filter_clamped(image, kernel::SOBEL_VERTICAL_3X3);

    let magnitudes = Magnitudes {
        width: w as usize,
        height: h as usize,
        values: gx
            .iter()
            .zip(gy.iter())
            .map(|(a, b)| f32::from(a.unsigned_abs()) + f32::from(b.unsigned_abs()))
            .collect(),
    };

    let thinned = suppress_non_maxima(&magnitudes, &gx, &gy);
    hysteresis(&thinned, &mut out, low, high);
    out
}

/// Keep only magnitudes that are local maxima across the edge.
fn suppress_non_maxima(
    magnitudes: &Magnitudes,
    gx: &Image<Luma<i16>>,
    gy: &Image<Luma<i16>>,
) -> Magnitudes {
    let (w, h) = (magnitudes.width, magnitudes.height);
    let mut thinned = vec![0.0f32; w * h];

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let i = y * w + x;
            let m = magnitudes.values[i];
            if m == 0.0 {
                continue;
            }
            let direction =
                Direction::from_gradient(f32::from(gx.as_raw()[i]), f32::from(gy.as_raw()[i]));
            let [(ax, ay), (bx, by)] = direction.neighbours();
            let a = magnitudes.get(x, y, ax, ay);
            let b = magnitudes.get(x, y, bx, by);
            // Ties keep the pixel on one side only so plateaus stay one pixel wide.
            if m > a && m >= b {
                thinned[i] = m;
            }
        }
    }

    Magnitudes {
        width: w,
        height: h,
        values: thinned,
    }
}

/// Grow strong edges through weak neighbours with an explicit stack.
fn hysteresis(thinned: &Magnitudes, out: &mut GrayImage, low: f32, high: f32) {
    let w = thinned.width;
    let edges: &mut [u8] = out;
    let mut stack = Vec::new();

    for (seed, &m) in thinned.values.iter().enumerate() {
        if m <= high || edges[seed] == EDGE {
            continue;
        }
        edges[seed] = EDGE;
        stack.push(seed);

        while let Some(i) = stack.pop() {
            let (x, y) = (i % w, i / w);
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let Some(n) = thinned.index(x, y, dx, dy) else {
                        continue;
                    };
                    let nm = thinned.values[n];
                    if nm > low && edges[n] != EDGE {
                        edges[n] = EDGE;
                        stack.push(n);
                    }
                }
            }
        }
    }
}
