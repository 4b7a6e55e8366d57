#![allow(clippy::excessive_precision, clippy::needless_range_loop, clippy::module_inception)]

//! lab-mosaic: CIE L\*a\*b\* color matching for texture mosaics
//!
//! This library converts pictures into perceptually uniform L\*a\*b\*,
//! averages them block by block, and matches each block against a palette:
//! a quantization grid, a curated preset, or the average colors of a texture
//! library. The resulting [`LookupTable`] drives the renderers.
//!
//! # Quick Start
//!
//! ```
//! use lab_mosaic::{render_quantized, Bitmap, CieLab, LookupTableBuilder, Palette, StdRgb};
//!
//! let palette = Palette::from_srgb(&[StdRgb::from_u8(255, 0, 0), StdRgb::from_u8(0, 0, 255)]).unwrap();
//! let source = Bitmap::filled(32, 32, StdRgb::from_u8(200, 50, 50));
//! let lab = source.map(CieLab::from);
//!
//! let table = LookupTableBuilder::new(16).unwrap().build(&lab, &palette);
//! assert_eq!((table.cols(), table.rows()), (2, 2));
//!
//! let picture = render_quantized(&table, &palette, 16).unwrap();
//! assert_eq!(picture.get(0, 0), StdRgb::from_u8(255, 0, 0));
//! ```
//!
//! # Color Pipeline
//!
//! ```text
//! StdRgb (u8, gamma encoded)
//!     |  linearize: 256-entry LUT, bit-identical to the IEC 61966-2-1 formula
//!     v
//! LinearRgb (f64, 0..=1)
//!     |  3x3 matrix derived from the sRGB primaries and the D65 white
//!     v
//! CieXyz
//!     |  cube root above epsilon = 216/24389, linear segment below
//!     v
//! CieLab  <-->  LchAb
//! ```
//!
//! The way back clips to the sRGB gamut after the inverse matrix, then
//! re-applies the gamma curve and rounds to 8 bits. For every `u8` value the
//! gamma round trip is exact.
//!
//! # Matching
//!
//! A block's representative color is the arithmetic mean of L\*, a\* and
//! b\* over its in-bounds pixels ([`block_average`]). Blocks at the right
//! and bottom edges may be partial; they are averaged over the pixels they
//! actually cover.
//!
//! Matching is a linear scan over the palette using squared Euclidean
//! distance ([`distance_squared`]). Ties go to the lowest index, so results
//! are deterministic even with duplicate palette entries. [`delta_e_2000`]
//! is available as an opt-in metric through [`DistanceMetric::Ciede2000`]
//! or any closure passed to [`Palette::closest_index_by`].
//!
//! # Concurrency
//!
//! [`LookupTableBuilder`] owns a rayon pool and processes one row of blocks
//! per task. Inputs are shared read-only and every task writes a disjoint
//! row of the output, so no locks are taken. The RGB <-> XYZ matrices are
//! derived once behind a `OnceLock` and shared by all threads.

mod bitmap;
pub mod color;
mod error;
mod lookup;
pub mod matrix;
mod palette;
mod render;
mod sampler;
mod texture;


pub use bitmap::{Bitmap, LabBitmap};
pub use color::{
    lab_to_srgb, srgb_to_lab, CieLab, CieXyz, ColorError, LchAb, LinearRgb, StdRgb, StdRgba,
    COLOR_TOLERANCE, REFERENCE_WHITE,
};
pub use error::MosaicError;
pub use lookup::{LookupTable, LookupTableBuilder};
pub use matrix::{Matrix, MatrixError};
pub use palette::{
    delta_e_2000, distance_squared, DistanceMetric, Palette, PaletteError, PresetPalette,
};
pub use render::{atlas_side, render_atlas, render_quantized, render_textured};
pub use sampler::{block_average, BlockSampler, ToLab};
pub use texture::{
    texture_palette, TextureTile, TextureValidator, TileVerdict, DEFAULT_DIFF_THRESHOLD,
    DEFAULT_TILE_SIZE,
};
