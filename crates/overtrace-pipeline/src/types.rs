//! Shared types for the overtrace transform pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can reference
/// single-channel output without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbImage` so downstream crates can reference color
/// output without depending on `image` directly.
pub use image::RgbImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// The uploaded reference image: an immutable three-channel raster.
///
/// Created once per upload and replaced wholesale when the user picks a
/// new image. The pipeline only ever reads from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage(RgbImage);

impl SourceImage {
    /// Decode uploaded image bytes (PNG, JPEG, BMP, WebP).
    ///
    /// Any alpha channel is discarded and palette or grayscale inputs are
    /// widened to RGB.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
    /// Returns [`PipelineError::ImageDecode`] if the format is
    /// unrecognized or the data is corrupt.
    pub fn decode(bytes: &[u8]) -> Result<Self, PipelineError> {
        crate::grayscale::decode_rgb(bytes).map(Self)
    }

    /// Wrap an already-decoded RGB raster.
    #[must_use]
    pub const fn from_rgb(image: RgbImage) -> Self {
        Self(image)
    }

    /// The underlying RGB raster.
    #[must_use]
    pub const fn as_rgb(&self) -> &RgbImage {
        &self.0
    }

    /// Source dimensions in pixels.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.0.width(),
            height: self.0.height(),
        }
    }
}

/// A clockwise quarter-turn rotation.
///
/// Serialized as degrees (`0`, `90`, `180`, `270`). Any integer is
/// accepted on input and normalized with `k = degrees / 90 mod 4`, so
/// `-90` and `450` become `Cw270` and `Cw90` respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Rotation {
    /// No rotation.
    #[default]
    None,
    /// 90° clockwise.
    Cw90,
    /// 180°.
    Cw180,
    /// 270° clockwise (90° counter-clockwise).
    Cw270,
}

impl Rotation {
    /// Normalize an angle in degrees to a quarter turn.
    ///
    /// Angles that are not multiples of 90 round toward zero within the
    /// quarter (`135` becomes `Cw90`).
    #[must_use]
    pub const fn from_degrees(degrees: i32) -> Self {
        Self::from_quarter_turns(degrees / 90)
    }

    /// Build a rotation from a (possibly negative) number of clockwise
    /// quarter turns.
    #[must_use]
    pub const fn from_quarter_turns(turns: i32) -> Self {
        match turns.rem_euclid(4) {
            1 => Self::Cw90,
            2 => Self::Cw180,
            3 => Self::Cw270,
            _ => Self::None,
        }
    }

    /// Number of clockwise quarter turns in `0..4`.
    #[must_use]
    pub const fn quarter_turns(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Cw90 => 1,
            Self::Cw180 => 2,
            Self::Cw270 => 3,
        }
    }

    /// The rotation in degrees, in `[0, 360)`.
    #[must_use]
    pub const fn degrees(self) -> i32 {
        self.quarter_turns() * 90
    }

    /// This rotation followed by one more clockwise quarter turn.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + 1)
    }

    /// This rotation followed by one counter-clockwise quarter turn.
    #[must_use]
    pub const fn counter_clockwise(self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() - 1)
    }
}

impl From<i32> for Rotation {
    fn from(degrees: i32) -> Self {
        Self::from_degrees(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Crop margins as percentages of the post-rotation width and height.
///
/// Each margin is clamped to `[0, 100]` when applied. Margins that leave
/// no pixels (`left + right >= 100` or `top + bottom >= 100`) cause the
/// crop step to be skipped rather than producing an empty image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CropMargins {
    /// Percentage removed from the left edge.
    pub left: f64,
    /// Percentage removed from the right edge.
    pub right: f64,
    /// Percentage removed from the top edge.
    pub top: f64,
    /// Percentage removed from the bottom edge.
    pub bottom: f64,
}

impl CropMargins {
    /// No cropping.
    pub const NONE: Self = Self {
        left: 0.0,
        right: 0.0,
        top: 0.0,
        bottom: 0.0,
    };

    /// Returns `true` if every margin is zero (or negative).
    #[must_use]
    pub fn is_none(&self) -> bool {
        [self.left, self.right, self.top, self.bottom]
            .iter()
            .all(|m| *m <= 0.0 || m.is_nan())
    }
}

/// The artistic filter applied after color correction.
///
/// Exactly one mode is active at a time. Only edge detection carries
/// parameters; every other mode is fully determined by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FilterMode {
    /// Identity.
    #[default]
    Original,
    /// Luminance-weighted collapse to a single channel.
    Grayscale,
    /// "Magic Outline": dark Canny edges on a light background.
    EdgeDetection {
        /// Hysteresis low threshold, `0..=500`.
        #[serde(default = "default_edge_low")]
        low: u16,
        /// Hysteresis high threshold, `0..=500`.
        #[serde(default = "default_edge_high")]
        high: u16,
    },
    /// Color-dodge pencil sketch.
    PencilSketch,
    /// Smoothed color masked by an adaptive-threshold line drawing.
    Crayon,
    /// Mean-shift region flattening.
    Abstract,
    /// Warm brown tone via a fixed color matrix.
    Sepia,
    /// Per-channel complement.
    Negative,
}

impl FilterMode {
    /// Default low threshold for [`FilterMode::EdgeDetection`].
    pub const DEFAULT_EDGE_LOW: u16 = 50;
    /// Default high threshold for [`FilterMode::EdgeDetection`].
    pub const DEFAULT_EDGE_HIGH: u16 = 150;
    /// Upper bound for either edge threshold.
    pub const MAX_EDGE_THRESHOLD: u16 = 500;

    /// Every mode, in the order a mode picker lists them.
    pub const ALL: [Self; 8] = [
        Self::Original,
        Self::Grayscale,
        Self::edge_detection(),
        Self::PencilSketch,
        Self::Crayon,
        Self::Abstract,
        Self::Sepia,
        Self::Negative,
    ];

    /// Edge detection with the default thresholds.
    #[must_use]
    pub const fn edge_detection() -> Self {
        Self::EdgeDetection {
            low: Self::DEFAULT_EDGE_LOW,
            high: Self::DEFAULT_EDGE_HIGH,
        }
    }

    /// The label shown to users for this mode.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::Grayscale => "Grayscale",
            Self::EdgeDetection { .. } => "Magic Outline",
            Self::PencilSketch => "Pencil Sketch",
            Self::Crayon => "Crayon Drawing",
            Self::Abstract => "Abstract",
            Self::Sepia => "Sepia",
            Self::Negative => "Negative",
        }
    }

    /// Whether this mode collapses the image to a single channel.
    #[must_use]
    pub const fn is_single_channel(self) -> bool {
        matches!(self, Self::Grayscale | Self::EdgeDetection { .. })
    }
}

const fn default_edge_low() -> u16 {
    FilterMode::DEFAULT_EDGE_LOW
}

const fn default_edge_high() -> u16 {
    FilterMode::DEFAULT_EDGE_HIGH
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilterMode {
    type Err = PipelineError;

    /// Parse a mode from its label or snake-case name, ignoring case.
    ///
    /// `"Magic Outline"`, `"Edge Detection"` and `"edge_detection"` all
    /// yield edge detection with the default thresholds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "original" => Ok(Self::Original),
            "grayscale" | "greyscale" => Ok(Self::Grayscale),
            "magicoutline" | "edgedetection" | "edgedetectionlineart" | "edges" => {
                Ok(Self::edge_detection())
            }
            "pencilsketch" | "sketch" => Ok(Self::PencilSketch),
            "crayondrawing" | "crayon" => Ok(Self::Crayon),
            "abstract" => Ok(Self::Abstract),
            "sepia" => Ok(Self::Sepia),
            "negative" => Ok(Self::Negative),
            _ => Err(PipelineError::UnknownFilter(s.to_owned())),
        }
    }
}

/// Every user-adjustable parameter of the transform pipeline.
///
/// Fields are independent; the only cross-field rule (crop margins must
/// leave some pixels) is handled by skipping the crop step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformParams {
    /// Clockwise quarter-turn rotation, applied first.
    pub rotation: Rotation,

    /// Mirror left-to-right after rotation.
    pub flip_horizontal: bool,

    /// Mirror top-to-bottom after rotation.
    pub flip_vertical: bool,

    /// Percentage margins removed after rotation and flips.
    pub crop: CropMargins,

    /// Additive bias applied after the contrast gain, roughly `-100..=100`.
    pub brightness: i32,

    /// Multiplicative gain, roughly `0.5..=3.0`.
    pub contrast: f32,

    /// Which artistic filter to apply.
    pub filter: FilterMode,

    /// Burn a guide grid into the output.
    pub grid: bool,

    /// Number of cells along each axis when `grid` is set.
    ///
    /// Values below 2 are treated as 2.
    pub grid_divisions: u32,
}

impl TransformParams {
    /// Default brightness bias.
    pub const DEFAULT_BRIGHTNESS: i32 = 0;
    /// Default contrast gain.
    pub const DEFAULT_CONTRAST: f32 = 1.0;
    /// Default grid divisions (a 3×3 rule-of-thirds grid).
    pub const DEFAULT_GRID_DIVISIONS: u32 = 3;
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            rotation: Rotation::None,
            flip_horizontal: false,
            flip_vertical: false,
            crop: CropMargins::NONE,
            brightness: Self::DEFAULT_BRIGHTNESS,
            contrast: Self::DEFAULT_CONTRAST,
            filter: FilterMode::Original,
            grid: false,
            grid_divisions: Self::DEFAULT_GRID_DIVISIONS,
        }
    }
}

/// A pipeline output raster.
///
/// The variant records the channel layout so later stages (grid color,
/// encoding) can branch without inspecting pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputImage {
    /// Three-channel RGB.
    Color(RgbImage),
    /// Single-channel intensity.
    Gray(GrayImage),
}

impl OutputImage {
    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        match self {
            Self::Color(img) => img.width(),
            Self::Gray(img) => img.width(),
        }
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        match self {
            Self::Color(img) => img.height(),
            Self::Gray(img) => img.height(),
        }
    }

    /// Dimensions in pixels.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Number of channels per pixel: 3 or 1.
    #[must_use]
    pub const fn channel_count(&self) -> u8 {
        match self {
            Self::Color(_) => 3,
            Self::Gray(_) => 1,
        }
    }

    /// Returns `true` for single-channel output.
    #[must_use]
    pub const fn is_gray(&self) -> bool {
        matches!(self, Self::Gray(_))
    }

    /// The color raster, if this is a color image.
    #[must_use]
    pub const fn as_color(&self) -> Option<&RgbImage> {
        match self {
            Self::Color(img) => Some(img),
            Self::Gray(_) => None,
        }
    }

    /// The intensity raster, if this is a single-channel image.
    #[must_use]
    pub const fn as_gray(&self) -> Option<&GrayImage> {
        match self {
            Self::Gray(img) => Some(img),
            Self::Color(_) => None,
        }
    }

    /// Convert to RGB, replicating intensity into all three channels for
    /// single-channel images.
    #[must_use]
    pub fn to_rgb(&self) -> RgbImage {
        match self {
            Self::Color(img) => img.clone(),
            Self::Gray(img) => crate::grayscale::expand_to_rgb(img),
        }
    }
}

/// Result of running the pipeline with every intermediate stage output
/// preserved.
///
/// Lets a preview UI show what each stage contributed, e.g. the
/// oriented image before a destructive filter is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedResult {
    /// Dimensions of the source image before any geometry.
    pub source_dimensions: Dimensions,
    /// Stage 1: rotated, flipped and cropped.
    pub oriented: RgbImage,
    /// Stage 2: brightness/contrast corrected.
    pub corrected: RgbImage,
    /// Stage 3: filter output.
    pub filtered: OutputImage,
    /// Stage 4: final output (grid burned in when enabled).
    pub output: OutputImage,
}

/// Errors that can occur before the pipeline runs.
///
/// The transform stages themselves never fail; only turning uploaded
/// bytes into a [`SourceImage`] and parsing user-facing names can.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// A filter name did not match any known mode.
    #[error("unknown filter mode: {0:?}")]
    UnknownFilter(String),
}
