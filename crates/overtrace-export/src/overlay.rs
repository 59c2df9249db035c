//! Inline overlay encoder.
//!
//! The overlay surface takes an image as a string it can hand straight to
//! an `<img src>` or a camera texture, so the PNG bytes are base64-encoded
//! (standard alphabet, padded) behind a `data:` scheme prefix.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, RgbImage};
use overtrace_pipeline::OutputImage;

use crate::ExportError;

/// Scheme, media type and encoding that start every overlay string.
pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// A `data:image/png;base64,...` string ready for the overlay surface.
///
/// Always carries [`DATA_URI_PREFIX`]; built by [`encode`] or by parsing
/// an existing string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedOverlay(String);

impl EncodedOverlay {
    /// The full data URI.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The base64 payload after the prefix.
    #[must_use]
    pub fn payload(&self) -> &str {
        self.0.strip_prefix(DATA_URI_PREFIX).unwrap_or_default()
    }

    /// Take the underlying string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Decode the payload back into pixels.
    ///
    /// Gray output comes back as RGB with equal channels, matching what
    /// the overlay surface displays.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Base64`] if the payload is not base64 and
    /// [`ExportError::PngDecode`] if the bytes are not a PNG.
    pub fn decode(&self) -> Result<RgbImage, ExportError> {
        let bytes = STANDARD.decode(self.payload())?;
        let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .map_err(ExportError::PngDecode)?;
        Ok(image.to_rgb8())
    }
}

impl fmt::Display for EncodedOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EncodedOverlay {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<EncodedOverlay> for String {
    fn from(overlay: EncodedOverlay) -> Self {
        overlay.0
    }
}

impl FromStr for EncodedOverlay {
    type Err = ExportError;

    /// Accept an existing data URI. Only the prefix is checked; the
    /// payload is validated by [`EncodedOverlay::decode`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with(DATA_URI_PREFIX) {
            Ok(Self(s.to_owned()))
        } else {
            Err(ExportError::InvalidDataUri)
        }
    }
}

/// Encode `image` as a PNG data URI for the overlay surface.
///
/// # Errors
///
/// Returns [`ExportError::PngEncode`] if the PNG codec fails.
#[tracing::instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn encode(image: &OutputImage) -> Result<EncodedOverlay, ExportError> {
    let png = crate::png::to_png(image)?;
    let payload = STANDARD.encode(&png);
    let mut uri = String::with_capacity(DATA_URI_PREFIX.len() + payload.len());
    uri.push_str(DATA_URI_PREFIX);
    uri.push_str(&payload);
    tracing::debug!(chars = uri.len(), "encoded overlay");
    Ok(EncodedOverlay(uri))
}
