//! overtrace-pipeline: Pure image transform pipeline (sans-IO).
//!
//! Prepares a reference image for tracing through:
//! geometry (rotate -> flip -> crop) -> brightness/contrast ->
//! one artistic filter -> optional guide grid.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and rasters. Serializing the output for display or
//! download lives in `overtrace-export`.

pub mod blur;
pub mod canny;
pub mod color;
pub mod crayon;
pub mod edge;
pub mod filter;
pub mod geometry;
pub mod grayscale;
pub mod grid;
pub mod mean_shift;
pub mod pipeline;
pub mod session;
pub mod sketch;
pub mod tone;
pub mod types;

pub use pipeline::Pipeline;
pub use session::Session;
pub use types::{
    CropMargins, Dimensions, FilterMode, GrayImage, OutputImage, PipelineError, RgbImage,
    Rotation, SourceImage, StagedResult, TransformParams,
};

/// Run every stage on `source` and return the final image.
///
/// # Pipeline steps
///
/// 1. Rotate by quarter turns, flip, crop by percentage margins
/// 2. Brightness/contrast correction
/// 3. The selected [`FilterMode`]
/// 4. Optional guide grid
///
/// Never fails: degenerate crops are skipped and every numeric step
/// clamps to the 8-bit range.
#[tracing::instrument(skip_all, fields(mode = %params.filter))]
#[must_use = "returns the transformed image"]
pub fn apply(source: &SourceImage, params: &TransformParams) -> OutputImage {
    let oriented = geometry::orient(
        source.as_rgb(),
        params.rotation,
        params.flip_horizontal,
        params.flip_vertical,
        &params.crop,
    );
    let corrected = color::adjust(oriented, params.contrast, params.brightness);
    let mut output = filter::apply_filter(corrected, params.filter);
    if params.grid {
        grid::draw_grid(&mut output, params.grid_divisions);
    }
    tracing::debug!(
        width = output.width(),
        height = output.height(),
        channels = output.channel_count(),
        "transform complete"
    );
    output
}

/// Like [`apply`], keeping every intermediate stage output.
#[must_use = "returns the staged result"]
pub fn apply_staged(source: &SourceImage, params: &TransformParams) -> StagedResult {
    Pipeline::new(source, params)
        .geometry()
        .correct_color()
        .filter()
        .grid()
        .into_result()
}

/// Decode uploaded bytes and run the full pipeline.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is unrecognized.
pub fn process(image_bytes: &[u8], params: &TransformParams) -> Result<OutputImage, PipelineError> {
    let source = SourceImage::decode(image_bytes)?;
    tracing::debug!(
        width = source.as_rgb().width(),
        height = source.as_rgb().height(),
        "decoded source image"
    );
    Ok(apply(&source, params))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    /// Create a PNG with a left-black / right-white split.
    fn sharp_edge_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, _y| {
            if x < width / 2 {
                image::Rgba([0, 0, 0, 255])
            } else {
                image::Rgba([255, 255, 255, 255])
            }
        });
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    #[allow(clippy::cast_possible_truncation)]
    fn numbered(width: u32, height: u32) -> SourceImage {
        SourceImage::from_rgb(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x * 3 + y * 5) % 256) as u8])
        }))
    }

    #[test]
    fn process_empty_input() {
        let result = process(&[], &TransformParams::default());
        assert!(matches!(result, Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn process_corrupt_input() {
        let result = process(&[0xFF, 0x00], &TransformParams::default());
        assert!(matches!(result, Err(PipelineError::ImageDecode(_))));
    }

    #[test]
    fn process_sharp_edge_outline() {
        let png = sharp_edge_png(40, 30);
        let params = TransformParams {
            filter: FilterMode::edge_detection(),
            ..TransformParams::default()
        };
        let out = process(&png, &params).unwrap();
        let gray = out.as_gray().unwrap();
        assert_eq!(gray.dimensions(), (40, 30));
        assert!(gray.pixels().any(|p| p.0[0] == 0), "expected an outline");
    }

    #[test]
    fn rotate_flip_negative_scenario() {
        let src = numbered(400, 300);
        let params = TransformParams {
            rotation: Rotation::Cw90,
            flip_horizontal: true,
            filter: FilterMode::Negative,
            ..TransformParams::default()
        };
        let out = apply(&src, &params);
        assert_eq!(out.dimensions(), Dimensions {
            width: 300,
            height: 400
        });

        let mut expected = image::imageops::rotate90(src.as_rgb());
        image::imageops::flip_horizontal_in_place(&mut expected);
        image::imageops::invert(&mut expected);
        assert_eq!(out, OutputImage::Color(expected));
    }

    #[test]
    fn magic_outline_on_flat_gray_is_all_background() {
        let src = SourceImage::from_rgb(RgbImage::from_pixel(64, 48, Rgb([128, 128, 128])));
        let params = TransformParams {
            filter: FilterMode::EdgeDetection {
                low: 50,
                high: 150,
            },
            ..TransformParams::default()
        };
        let out = apply(&src, &params);
        let gray = out.as_gray().unwrap();
        assert!(gray.pixels().all(|p| *p == Luma([edge::BACKGROUND])));
    }

    #[test]
    fn identity_params_reproduce_source() {
        let src = numbered(13, 7);
        let out = apply(&src, &TransformParams::default());
        assert_eq!(out, OutputImage::Color(src.as_rgb().clone()));
    }

    #[test]
    fn non_grayscale_modes_keep_three_channels() {
        let src = numbered(12, 9);
        for mode in FilterMode::ALL {
            let params = TransformParams {
                filter: mode,
                ..TransformParams::default()
            };
            let out = apply(&src, &params);
            let expected = if mode.is_single_channel() { 1 } else { 3 };
            assert_eq!(out.channel_count(), expected, "mode {mode}");
        }
    }

    #[test]
    fn invalid_crop_is_silently_skipped() {
        let src = numbered(20, 10);
        let params = TransformParams {
            crop: CropMargins {
                left: 60.0,
                right: 60.0,
                ..CropMargins::NONE
            },
            ..TransformParams::default()
        };
        assert_eq!(
            apply(&src, &params),
            OutputImage::Color(src.as_rgb().clone())
        );
    }

    #[test]
    fn color_correction_runs_before_filter() {
        // Brightening white-clamped pixels then negating gives black; the
        // reverse order would give 100.
        let src = SourceImage::from_rgb(RgbImage::from_pixel(2, 2, Rgb([200, 200, 200])));
        let params = TransformParams {
            brightness: 100,
            filter: FilterMode::Negative,
            ..TransformParams::default()
        };
        let out = apply(&src, &params);
        assert_eq!(out.as_color().unwrap().get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn staged_output_matches_apply() {
        let src = numbered(16, 12);
        let params = TransformParams {
            rotation: Rotation::Cw270,
            filter: FilterMode::Sepia,
            grid: true,
            ..TransformParams::default()
        };
        assert_eq!(apply_staged(&src, &params).output, apply(&src, &params));
    }

    #[test]
    fn staged_and_direct_agree_for_every_mode() {
        let src = numbered(24, 18);
        for filter in FilterMode::ALL {
            let params = TransformParams {
                rotation: Rotation::Cw90,
                flip_vertical: true,
                crop: CropMargins {
                    left: 10.0,
                    right: 0.0,
                    top: 5.0,
                    bottom: 20.0,
                },
                brightness: 15,
                contrast: 1.4,
                filter,
                grid: true,
                grid_divisions: 3,
                ..TransformParams::default()
            };
            assert_eq!(
                apply_staged(&src, &params).output,
                apply(&src, &params),
                "{filter}"
            );
        }
    }
}
