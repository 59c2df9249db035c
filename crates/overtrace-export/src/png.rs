//! Lossless PNG serializer for the download button.
//!
//! Single-channel output is widened to RGB first so every file the user
//! saves has the same layout as the overlay.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use overtrace_pipeline::OutputImage;

use crate::ExportError;

/// File name offered for the downloaded image.
pub const DOWNLOAD_FILENAME: &str = "trace_image.png";

/// Encode `image` as an 8-bit RGB PNG.
///
/// # Errors
///
/// Returns [`ExportError::PngEncode`] if the codec rejects the raster
/// (for example a zero-sized image).
pub fn to_png(image: &OutputImage) -> Result<Vec<u8>, ExportError> {
    let rgb = image.to_rgb();
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(ExportError::PngEncode)?;
    tracing::debug!(
        width = rgb.width(),
        height = rgb.height(),
        bytes = buf.len(),
        "encoded PNG"
    );
    Ok(buf)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn output_starts_with_png_signature() {
        let out = OutputImage::Color(RgbImage::from_pixel(3, 2, Rgb([1, 2, 3])));
        let bytes = to_png(&out).unwrap();
        assert_eq!(bytes[..8], PNG_SIGNATURE);
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn color_pixels_survive() {
        let img = RgbImage::from_fn(4, 3, |x, y| Rgb([x as u8 * 50, y as u8 * 70, 9]));
        let bytes = to_png(&OutputImage::Color(img.clone())).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
        assert_eq!(decoded.to_rgb8(), img);
    }

    #[test]
    fn gray_is_widened_to_rgb() {
        let img = GrayImage::from_pixel(2, 2, Luma([77]));
        let bytes = to_png(&OutputImage::Gray(img)).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
        assert!(decoded.to_rgb8().pixels().all(|p| p.0 == [77, 77, 77]));
    }

    #[test]
    fn download_name_is_png() {
        assert!(
            std::path::Path::new(DOWNLOAD_FILENAME)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        );
    }
}
