//! Unified error type for the lab-mosaic public API.
//!
//! [`MosaicError`] wraps every error in the crate so application code can
//! propagate with a single `?`.

use thiserror::Error;

use crate::color::ColorError;
use crate::matrix::MatrixError;
use crate::palette::PaletteError;

/// Unified error type for the lab-mosaic public API.
///
/// # Example
///
/// ```
/// use lab_mosaic::{LookupTableBuilder, MosaicError};
///
/// let err = LookupTableBuilder::new(0).unwrap_err();
/// assert!(matches!(err, MosaicError::InvalidBlockSize(0)));
/// ```
#[derive(Debug, Error)]
pub enum MosaicError {
    #[error("color error: {0}")]
    Color(#[from] ColorError),

    #[error("matrix error: {0}")]
    Matrix(#[from] MatrixError),

    #[error("palette error: {0}")]
    Palette(#[from] PaletteError),

    /// Block and tile sizes must be at least one pixel.
    #[error("invalid block size {0}: must be at least 1")]
    InvalidBlockSize(usize),

    /// Pixel buffer length does not match the declared dimensions.
    #[error("bitmap of {width}x{height} needs {} pixels, got {len}", .width * .height)]
    BitmapSize {
        width: usize,
        height: usize,
        len: usize,
    },

    /// A lookup table refers to a tile or color that doesn't exist.
    #[error("index {index} out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    /// A tile does not have the size the renderer was configured for.
    #[error("tile {index} is {width}x{height}, expected {expected}x{expected}")]
    TileSize {
        index: usize,
        width: usize,
        height: usize,
        expected: usize,
    },

    /// Every candidate texture was rejected.
    #[error("no valid textures: every candidate was transparent or too busy")]
    NoValidTextures,

    /// The worker pool could not be created.
    #[error("failed to start worker pool: {0}")]
    ThreadPool(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            MosaicError::InvalidBlockSize(0).to_string(),
            "invalid block size 0: must be at least 1"
        );
        assert_eq!(
            MosaicError::BitmapSize {
                width: 4,
                height: 2,
                len: 7
            }
            .to_string(),
            "bitmap of 4x2 needs 8 pixels, got 7"
        );
        assert_eq!(
            MosaicError::IndexOutOfRange { index: 5, len: 3 }.to_string(),
            "index 5 out of range for 3 entries"
        );
    }

    #[test]
    fn test_wraps_palette_error() {
        let err: MosaicError = PaletteError::EmptyPalette.into();
        assert!(matches!(err, MosaicError::Palette(PaletteError::EmptyPalette)));
        assert_eq!(err.to_string(), "palette error: palette must contain at least one color");
    }
}
