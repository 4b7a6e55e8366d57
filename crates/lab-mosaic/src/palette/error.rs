//! Error types for palette construction

use thiserror::Error;

use crate::color::ColorError;

/// Error type for palette validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    /// No colors provided. Matching needs at least one candidate.
    #[error("palette must contain at least one color")]
    EmptyPalette,

    /// Quantization grid step of zero.
    #[error("quantization grid step must be between 1 and 255, got {0}")]
    InvalidGridStep(usize),

    /// Preset name not recognised.
    #[error("unknown palette preset {0:?}")]
    UnknownPreset(String),

    /// Invalid hex color string
    #[error("invalid color: {0}")]
    ParseColor(#[from] ColorError),
}
