//! Color types and conversion utilities
//!
//! Each color space is its own value type, and conversions between adjacent
//! spaces are `From` impls backed by the free functions in this module.
//!
//! # Color Spaces
//!
//! - **StdRgb / StdRgba**: 8-bit gamma-encoded storage form. Use for I/O.
//! - **LinearRgb**: linear light, 0.0..=1.0.
//! - **CieXyz**: tristimulus values under the D65 [`REFERENCE_WHITE`].
//! - **CieLab**: perceptually uniform working space for averaging and matching.
//! - **LchAb**: polar Lab, for hue and chroma inspection.
//!
//! # Example
//!
//! ```
//! use lab_mosaic::{CieLab, StdRgb};
//!
//! let lab = CieLab::from(StdRgb::from_u8(200, 50, 50));
//! assert!(lab.a > 0.0); // reddish
//!
//! let back = StdRgb::from(lab);
//! assert_eq!(back, StdRgb::from_u8(200, 50, 50));
//! ```

mod convert;
mod error;
mod lab;
mod lch;
mod linear_rgb;
mod lut;
mod srgb;
mod transform;
mod xyz;

pub use convert::{
    apply_gamma, lab_to_srgb, lab_to_xyz, linearize, rgb_to_xyz, srgb_to_lab, xyz_to_lab,
    xyz_to_rgb,
};
pub use error::ColorError;
pub use lab::{CieLab, EPSILON, KAPPA};
pub use lch::LchAb;
pub use linear_rgb::LinearRgb;
pub use lut::{linear_to_srgb_exact, srgb_to_linear_exact};
pub use srgb::{StdRgb, StdRgba};
pub use transform::{Primaries, RgbXyzTransform, SRGB_PRIMARIES};
pub use xyz::{CieXyz, REFERENCE_WHITE};

/// Per-channel tolerance for `approx_eq`, in each space's native units.
pub const COLOR_TOLERANCE: f64 = 1.0;

#[inline]
fn all_within(a: [f64; 3], b: [f64; 3]) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (x - y).abs() < COLOR_TOLERANCE)
}
