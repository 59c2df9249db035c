//! Command-line arguments and their mapping onto [`TransformParams`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use overtrace_pipeline::{CropMargins, FilterMode, Rotation, TransformParams};

/// Prepare a reference image for tracing through a camera overlay.
///
/// Rotates, mirrors, crops and color-corrects the image, applies one
/// artistic filter and optionally a guide grid, then writes the result
/// as a PNG and (optionally) as a `data:` URI for the overlay surface.
#[derive(Debug, Parser)]
#[command(name = "overtrace", version)]
pub struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    pub image_path: PathBuf,

    /// Clockwise rotation in degrees, snapped to quarter turns.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub rotation: i32,

    /// Mirror left-to-right after rotating.
    #[arg(long)]
    pub flip_h: bool,

    /// Mirror top-to-bottom after rotating.
    #[arg(long)]
    pub flip_v: bool,

    /// Crop margins in percent as `LEFT,RIGHT,TOP,BOTTOM`.
    #[arg(long, value_name = "L,R,T,B", value_parser = parse_crop)]
    pub crop: Option<CropMargins>,

    /// Brightness bias added to every channel (nominally -100..=100).
    #[arg(long, default_value_t = TransformParams::DEFAULT_BRIGHTNESS, allow_negative_numbers = true)]
    pub brightness: i32,

    /// Contrast gain applied to every channel (nominally 0.5..=3.0).
    #[arg(long, default_value_t = TransformParams::DEFAULT_CONTRAST)]
    pub contrast: f32,

    /// Filter mode: original, grayscale, edge-detection (magic outline),
    /// pencil-sketch, crayon, abstract, sepia, negative.
    #[arg(long, default_value = "original")]
    pub mode: FilterMode,

    /// Edge detection low threshold.
    #[arg(long, default_value_t = FilterMode::DEFAULT_EDGE_LOW)]
    pub low: u16,

    /// Edge detection high threshold.
    #[arg(long, default_value_t = FilterMode::DEFAULT_EDGE_HIGH)]
    pub high: u16,

    /// Burn a guide grid into the output.
    #[arg(long)]
    pub grid: bool,

    /// Grid cells per axis.
    #[arg(long, default_value_t = TransformParams::DEFAULT_GRID_DIVISIONS)]
    pub grid_divisions: u32,

    /// Full transform parameters as a JSON string.
    ///
    /// When provided, all individual parameter flags are ignored.
    #[arg(long, conflicts_with = "params")]
    pub params_json: Option<String>,

    /// Full transform parameters from a TOML file.
    ///
    /// When provided, all individual parameter flags are ignored.
    #[arg(long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// Directory to write the download image into.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Also write the overlay data URI to this file (`-` for stdout).
    #[arg(long, value_name = "FILE")]
    pub data_uri: Option<PathBuf>,

    /// Log every pipeline stage.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build [`TransformParams`] from the arguments.
    ///
    /// `--params-json` and `--params` replace the individual flags
    /// entirely; otherwise the flags are assembled field by field.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON or TOML cannot be read or parsed.
    pub fn transform_params(&self) -> Result<TransformParams> {
        if let Some(ref json) = self.params_json {
            return serde_json::from_str(json).context("parsing --params-json");
        }
        if let Some(ref path) = self.params {
            return read_toml(path);
        }

        let filter = match self.mode {
            FilterMode::EdgeDetection { .. } => FilterMode::EdgeDetection {
                low: self.low,
                high: self.high,
            },
            other => other,
        };

        Ok(TransformParams {
            rotation: Rotation::from_degrees(self.rotation),
            flip_horizontal: self.flip_h,
            flip_vertical: self.flip_v,
            crop: self.crop.unwrap_or(CropMargins::NONE),
            brightness: self.brightness,
            contrast: self.contrast,
            filter,
            grid: self.grid,
            grid_divisions: self.grid_divisions,
        })
    }

    /// Whether the data URI goes to stdout rather than a file.
    #[must_use]
    pub fn data_uri_to_stdout(&self) -> bool {
        self.data_uri.as_deref() == Some(Path::new("-"))
    }
}

fn read_toml(path: &Path) -> Result<TransformParams> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Parse `L,R,T,B` percentages.
fn parse_crop(s: &str) -> Result<CropMargins, String> {
    let values = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid crop margin {part:?}: {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let [left, right, top, bottom] = values[..] else {
        return Err(format!(
            "expected 4 comma-separated margins, got {}",
            values.len()
        ));
    };
    Ok(CropMargins {
        left,
        right,
        top,
        bottom,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("overtrace").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_transform_params() {
        let cli = parse(&["photo.jpg"]);
        assert_eq!(cli.transform_params().unwrap(), TransformParams::default());
        assert_eq!(cli.out_dir, PathBuf::from("."));
        assert!(!cli.data_uri_to_stdout());
    }

    #[test]
    fn flags_assemble_params() {
        let cli = parse(&[
            "photo.jpg",
            "--rotation",
            "-90",
            "--flip-h",
            "--crop",
            "10, 20,0,5",
            "--brightness",
            "-30",
            "--contrast",
            "1.5",
            "--mode",
            "magic outline",
            "--low",
            "20",
            "--high",
            "90",
            "--grid",
            "--grid-divisions",
            "4",
        ]);
        let params = cli.transform_params().unwrap();
        assert_eq!(params.rotation, Rotation::Cw270);
        assert!(params.flip_horizontal);
        assert!(!params.flip_vertical);
        assert_eq!(params.crop, CropMargins {
            left: 10.0,
            right: 20.0,
            top: 0.0,
            bottom: 5.0
        });
        assert_eq!(params.brightness, -30);
        assert!((params.contrast - 1.5).abs() < f32::EPSILON);
        assert_eq!(params.filter, FilterMode::EdgeDetection { low: 20, high: 90 });
        assert!(params.grid);
        assert_eq!(params.grid_divisions, 4);
    }

    #[test]
    fn thresholds_ignored_for_other_modes() {
        let cli = parse(&["photo.jpg", "--mode", "sepia", "--low", "1"]);
        assert_eq!(cli.transform_params().unwrap().filter, FilterMode::Sepia);
    }

    #[test]
    fn json_overrides_flags() {
        let cli = parse(&[
            "photo.jpg",
            "--mode",
            "sepia",
            "--params-json",
            r#"{"rotation": 180, "filter": {"mode": "negative"}}"#,
        ]);
        let params = cli.transform_params().unwrap();
        assert_eq!(params.rotation, Rotation::Cw180);
        assert_eq!(params.filter, FilterMode::Negative);
        assert_eq!(params.brightness, TransformParams::DEFAULT_BRIGHTNESS);
    }

    #[test]
    fn bad_json_is_reported() {
        let cli = parse(&["photo.jpg", "--params-json", "{not json"]);
        let err = cli.transform_params().unwrap_err();
        assert!(format!("{err:#}").contains("--params-json"));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let result = Cli::try_parse_from(["overtrace", "photo.jpg", "--mode", "watercolor"]);
        assert!(result.is_err());
    }

    #[test]
    fn crop_needs_four_values() {
        assert!(parse_crop("1,2,3").is_err());
        assert!(parse_crop("1,2,3,x").is_err());
        assert_eq!(parse_crop("0,0,0,0").unwrap(), CropMargins::NONE);
    }

    #[test]
    fn dash_means_stdout() {
        let cli = parse(&["photo.jpg", "--data-uri", "-"]);
        assert!(cli.data_uri_to_stdout());
    }
}
