//! overtrace-export: Pure output serializers (sans-IO)
//!
//! Turns a pipeline [`OutputImage`](overtrace_pipeline::OutputImage) into
//! the two forms a front end needs: lossless PNG bytes for download and a
//! `data:image/png;base64,...` string for the tracing overlay. Nothing
//! here touches the filesystem.

pub mod overlay;
pub mod png;

pub use overlay::{DATA_URI_PREFIX, EncodedOverlay, encode};
pub use png::{DOWNLOAD_FILENAME, to_png};

/// Errors that can occur while serializing or parsing output images.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The PNG codec rejected the raster.
    #[error("failed to encode PNG: {0}")]
    PngEncode(#[source] image::ImageError),

    /// The string is not a PNG data URI.
    #[error("not a PNG data URI")]
    InvalidDataUri,

    /// The data URI payload is not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded payload is not a readable PNG.
    #[error("failed to decode PNG payload: {0}")]
    PngDecode(#[source] image::ImageError),
}
