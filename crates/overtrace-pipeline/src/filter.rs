//! Filter stage: dispatch on [`FilterMode`].
//!
//! Grayscale and edge detection produce single-channel output; every
//! other mode keeps three channels.

use image::RgbImage;

use crate::mean_shift::MeanShiftParams;
use crate::types::{FilterMode, OutputImage};

/// Apply the selected filter to a color-corrected image.
#[must_use = "returns the filtered image"]
pub fn apply_filter(image: RgbImage, mode: FilterMode) -> OutputImage {
    match mode {
        FilterMode::Original => OutputImage::Color(image),
        FilterMode::Grayscale => OutputImage::Gray(crate::grayscale::to_gray(&image)),
        FilterMode::EdgeDetection { low, high } => {
            let low = low.min(FilterMode::MAX_EDGE_THRESHOLD);
            let high = high.min(FilterMode::MAX_EDGE_THRESHOLD);
            let gray = crate::grayscale::to_gray(&image);
            OutputImage::Gray(crate::edge::outline(&gray, low, high))
        }
        FilterMode::PencilSketch => {
            let gray = crate::grayscale::to_gray(&image);
            let sketch = crate::sketch::pencil_sketch(&gray);
            OutputImage::Color(crate::grayscale::expand_to_rgb(&sketch))
        }
        FilterMode::Crayon => OutputImage::Color(crate::crayon::crayon(&image)),
        FilterMode::Abstract => OutputImage::Color(crate::mean_shift::mean_shift(
            &image,
            &MeanShiftParams::default(),
        )),
        FilterMode::Sepia => OutputImage::Color(crate::tone::sepia(&image)),
        FilterMode::Negative => OutputImage::Color(crate::tone::negative(image)),
    }
}
