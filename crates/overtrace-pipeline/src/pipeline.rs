//! Incremental pipeline: advance stage-by-stage, inspecting each
//! intermediate result before continuing.
//!
//! Unlike [`crate::apply`] which runs every stage in one call,
//! [`Pipeline`] lets the caller drive execution one step at a time:
//!
//! ```rust
//! # use overtrace_pipeline::{Pipeline, SourceImage, TransformParams, RgbImage};
//! let source = SourceImage::from_rgb(RgbImage::new(4, 3));
//! let params = TransformParams::default();
//! let staged = Pipeline::new(&source, &params)
//!     .geometry()
//!     .correct_color()
//!     .filter()
//!     .grid()
//!     .into_result();
//! assert_eq!(staged.output.width(), 4);
//! ```
//!
//! Each stage method consumes `self` and returns the next pipeline state,
//! carrying all previously computed intermediates. No stage can fail:
//! degenerate parameters (an empty crop, out-of-range thresholds) are
//! clamped or skipped.

use crate::types::{
    Dimensions, OutputImage, RgbImage, SourceImage, StagedResult, TransformParams,
};

/// Entry point for staged execution.
pub struct Pipeline;

impl Pipeline {
    /// Start a pipeline run over `source` with `params`.
    #[allow(clippy::new_ret_no_self)]
    pub const fn new<'a>(source: &'a SourceImage, params: &'a TransformParams) -> Pending<'a> {
        Pending { source, params }
    }
}

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// Pipeline state before any processing has occurred.
///
/// Call [`geometry`](Self::geometry) to advance to the next stage.
#[must_use = "pipeline stages are consumed by advancing; call .geometry() to continue"]
pub struct Pending<'a> {
    source: &'a SourceImage,
    params: &'a TransformParams,
}

impl<'a> Pending<'a> {
    /// The source image.
    #[must_use]
    pub const fn source(&self) -> &SourceImage {
        self.source
    }

    /// Rotate, flip and crop, advancing to [`Oriented`].
    pub fn geometry(self) -> Oriented<'a> {
        let p = self.params;
        let oriented = crate::geometry::orient(
            self.source.as_rgb(),
            p.rotation,
            p.flip_horizontal,
            p.flip_vertical,
            &p.crop,
        );
        tracing::debug!(
            rotation = p.rotation.degrees(),
            flip_horizontal = p.flip_horizontal,
            flip_vertical = p.flip_vertical,
            width = oriented.width(),
            height = oriented.height(),
            "geometry applied"
        );
        Oriented {
            params: self.params,
            source_dimensions: self.source.dimensions(),
            oriented,
        }
    }
}

// ───────────────────────── Stage 1: Oriented ─────────────────────────

/// Pipeline state after the geometry stage.
///
/// Call [`correct_color`](Self::correct_color) to advance.
#[must_use = "pipeline stages are consumed by advancing; call .correct_color() to continue"]
pub struct Oriented<'a> {
    params: &'a TransformParams,
    source_dimensions: Dimensions,
    oriented: RgbImage,
}

impl<'a> Oriented<'a> {
    /// The rotated, flipped and cropped image.
    #[must_use]
    pub const fn oriented(&self) -> &RgbImage {
        &self.oriented
    }

    /// Apply brightness and contrast, advancing to [`Corrected`].
    pub fn correct_color(self) -> Corrected<'a> {
        let p = self.params;
        let corrected = crate::color::adjust(self.oriented.clone(), p.contrast, p.brightness);
        tracing::debug!(
            contrast = p.contrast,
            brightness = p.brightness,
            "color corrected"
        );
        Corrected {
            params: self.params,
            source_dimensions: self.source_dimensions,
            oriented: self.oriented,
            corrected,
        }
    }
}

// ───────────────────────── Stage 2: Corrected ────────────────────────

/// Pipeline state after brightness/contrast correction.
///
/// Call [`filter`](Self::filter) to advance.
#[must_use = "pipeline stages are consumed by advancing; call .filter() to continue"]
pub struct Corrected<'a> {
    params: &'a TransformParams,
    source_dimensions: Dimensions,
    oriented: RgbImage,
    corrected: RgbImage,
}

impl<'a> Corrected<'a> {
    /// The color-corrected image.
    #[must_use]
    pub const fn corrected(&self) -> &RgbImage {
        &self.corrected
    }

    /// Apply the selected filter mode, advancing to [`Filtered`].
    pub fn filter(self) -> Filtered<'a> {
        let mode = self.params.filter;
        let filtered = crate::filter::apply_filter(self.corrected.clone(), mode);
        tracing::debug!(%mode, channels = filtered.channel_count(), "filter applied");
        Filtered {
            params: self.params,
            source_dimensions: self.source_dimensions,
            oriented: self.oriented,
            corrected: self.corrected,
            filtered,
        }
    }
}

// ───────────────────────── Stage 3: Filtered ─────────────────────────

/// Pipeline state after the filter stage.
///
/// Call [`grid`](Self::grid) to advance.
#[must_use = "pipeline stages are consumed by advancing; call .grid() to continue"]
pub struct Filtered<'a> {
    params: &'a TransformParams,
    source_dimensions: Dimensions,
    oriented: RgbImage,
    corrected: RgbImage,
    filtered: OutputImage,
}

impl Filtered<'_> {
    /// The filter output.
    #[must_use]
    pub const fn filtered(&self) -> &OutputImage {
        &self.filtered
    }

    /// Burn in the guide grid when enabled, advancing to [`Gridded`].
    ///
    /// When the grid is disabled this is a pass-through.
    pub fn grid(self) -> Gridded {
        let mut output = self.filtered.clone();
        if self.params.grid {
            crate::grid::draw_grid(&mut output, self.params.grid_divisions);
            tracing::debug!(divisions = self.params.grid_divisions, "grid drawn");
        }
        Gridded {
            result: StagedResult {
                source_dimensions: self.source_dimensions,
                oriented: self.oriented,
                corrected: self.corrected,
                filtered: self.filtered,
                output,
            },
        }
    }
}

// ───────────────────────── Stage 4: Gridded ──────────────────────────

/// Final pipeline state.
#[must_use = "call .into_result() or .into_output() to take the pipeline output"]
pub struct Gridded {
    result: StagedResult,
}

impl Gridded {
    /// The final output image.
    #[must_use]
    pub const fn output(&self) -> &OutputImage {
        &self.result.output
    }

    /// Consume the pipeline and return every intermediate.
    #[must_use]
    pub fn into_result(self) -> StagedResult {
        self.result
    }

    /// Consume the pipeline and return only the final output.
    #[must_use]
    pub fn into_output(self) -> OutputImage {
        self.result.output
    }
}
