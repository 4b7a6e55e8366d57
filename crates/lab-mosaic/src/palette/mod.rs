//! Palette types and nearest-color matching
//!
//! A palette is either a fixed quantization grid, a curated preset, or the
//! average colors of a texture library. All three match the same way.

mod distance;
mod error;
mod palette;
mod presets;

pub use distance::{delta_e_2000, distance_squared, DistanceMetric};
pub use error::PaletteError;
pub use palette::Palette;
pub use presets::PresetPalette;
