//! Per-upload editing state.
//!
//! A [`Session`] pairs the uploaded image with the parameters the user
//! has dialed in. The rotate and flip buttons accumulate: pressing
//! "rotate" twice gives 180°, pressing "flip" twice undoes the flip.
//! The caller owns the session and re-renders after every change.

use crate::types::{OutputImage, PipelineError, SourceImage, TransformParams};

/// The current source image and its transform parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    source: SourceImage,
    params: TransformParams,
}

impl Session {
    /// Start a session with default parameters.
    #[must_use]
    pub fn new(source: SourceImage) -> Self {
        Self::with_params(source, TransformParams::default())
    }

    /// Start a session with explicit parameters.
    #[must_use]
    pub const fn with_params(source: SourceImage, params: TransformParams) -> Self {
        Self { source, params }
    }

    /// Decode uploaded bytes and start a session with default parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] or
    /// [`PipelineError::ImageDecode`] if the bytes are not an image.
    pub fn from_upload(bytes: &[u8]) -> Result<Self, PipelineError> {
        SourceImage::decode(bytes).map(Self::new)
    }

    /// Replace the source image, keeping the current parameters.
    ///
    /// The previous image is dropped.
    pub fn replace_source(&mut self, source: SourceImage) {
        self.source = source;
    }

    /// The current source image.
    #[must_use]
    pub const fn source(&self) -> &SourceImage {
        &self.source
    }

    /// The current parameters.
    #[must_use]
    pub const fn params(&self) -> &TransformParams {
        &self.params
    }

    /// Mutable access for sliders and pickers.
    pub const fn params_mut(&mut self) -> &mut TransformParams {
        &mut self.params
    }

    /// Add a clockwise quarter turn.
    pub const fn rotate_clockwise(&mut self) {
        self.params.rotation = self.params.rotation.clockwise();
    }

    /// Add a counter-clockwise quarter turn.
    pub const fn rotate_counter_clockwise(&mut self) {
        self.params.rotation = self.params.rotation.counter_clockwise();
    }

    /// Toggle the horizontal mirror.
    pub const fn toggle_flip_horizontal(&mut self) {
        self.params.flip_horizontal = !self.params.flip_horizontal;
    }

    /// Toggle the vertical mirror.
    pub const fn toggle_flip_vertical(&mut self) {
        self.params.flip_vertical = !self.params.flip_vertical;
    }

    /// Clear rotation and flips, leaving the other parameters alone.
    pub const fn reset_orientation(&mut self) {
        self.params.rotation = crate::types::Rotation::None;
        self.params.flip_horizontal = false;
        self.params.flip_vertical = false;
    }

    /// Run the full pipeline on the current state.
    #[must_use = "returns the rendered output"]
    pub fn render(&self) -> OutputImage {
        crate::apply(&self.source, &self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FilterMode, RgbImage, Rotation};
    use image::Rgb;

    #[allow(clippy::cast_possible_truncation)]
    fn session() -> Session {
        Session::new(SourceImage::from_rgb(RgbImage::from_fn(6, 4, |x, y| {
            Rgb([(x * 40) as u8, (y * 60) as u8, 7])
        })))
    }

    #[test]
    fn rotation_presses_accumulate() {
        let mut s = session();
        s.rotate_clockwise();
        s.rotate_clockwise();
        assert_eq!(s.params().rotation, Rotation::Cw180);
        s.rotate_counter_clockwise();
        assert_eq!(s.params().rotation, Rotation::Cw90);
        assert_eq!(s.render().dimensions().width, 4);
    }

    #[test]
    fn flip_presses_toggle() {
        let mut s = session();
        let before = s.render();
        s.toggle_flip_horizontal();
        assert!(s.params().flip_horizontal);
        assert_ne!(s.render(), before);
        s.toggle_flip_horizontal();
        assert_eq!(s.render(), before);
    }

    #[test]
    fn reset_orientation_keeps_filter() {
        let mut s = session();
        s.params_mut().filter = FilterMode::Negative;
        s.rotate_clockwise();
        s.toggle_flip_vertical();
        s.reset_orientation();
        assert_eq!(s.params().rotation, Rotation::None);
        assert!(!s.params().flip_vertical);
        assert_eq!(s.params().filter, FilterMode::Negative);
    }

    #[test]
    fn replace_source_keeps_params() {
        let mut s = session();
        s.rotate_clockwise();
        s.replace_source(SourceImage::from_rgb(RgbImage::new(10, 2)));
        assert_eq!(s.params().rotation, Rotation::Cw90);
        assert_eq!(s.render().dimensions().width, 2);
    }

    #[test]
    fn from_upload_rejects_garbage() {
        assert!(matches!(
            Session::from_upload(&[]),
            Err(PipelineError::EmptyInput)
        ));
        assert!(matches!(
            Session::from_upload(b"not an image"),
            Err(PipelineError::ImageDecode(_))
        ));
    }
}
