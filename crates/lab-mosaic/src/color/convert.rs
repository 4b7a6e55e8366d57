//! Free conversion functions between adjacent color spaces
//!
//! The `From` impls on the color types delegate here. Naming follows the
//! pipeline: `linearize` and `apply_gamma` for the transfer curve,
//! `rgb_to_xyz` / `xyz_to_rgb` for the matrix step, `xyz_to_lab` /
//! `lab_to_xyz` for the CIE nonlinearity.

use super::lab::{CieLab, EPSILON, KAPPA};
use super::linear_rgb::LinearRgb;
use super::srgb::StdRgb;
use super::xyz::{CieXyz, REFERENCE_WHITE};

/// Decode the sRGB transfer curve.
#[inline]
pub fn linearize(srgb: StdRgb) -> LinearRgb {
    LinearRgb::from(srgb)
}

/// Encode with the sRGB transfer curve, rounding to 8 bits.
#[inline]
pub fn apply_gamma(linear: LinearRgb) -> StdRgb {
    StdRgb::from(linear)
}

/// Forward primaries matrix.
#[inline]
pub fn rgb_to_xyz(linear: LinearRgb) -> CieXyz {
    CieXyz::from(linear)
}

/// Inverse primaries matrix with gamut clipping.
#[inline]
pub fn xyz_to_rgb(xyz: CieXyz) -> LinearRgb {
    LinearRgb::from(xyz)
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

#[inline]
fn lab_f_inv(v: f64) -> f64 {
    let cubed = v * v * v;
    if cubed > EPSILON {
        cubed
    } else {
        (116.0 * v - 16.0) / KAPPA
    }
}

/// XYZ -> L\*a\*b\* relative to the D65 reference white.
pub fn xyz_to_lab(xyz: CieXyz) -> CieLab {
    let fx = lab_f(xyz.x / REFERENCE_WHITE.x);
    let fy = lab_f(xyz.y / REFERENCE_WHITE.y);
    let fz = lab_f(xyz.z / REFERENCE_WHITE.z);
    CieLab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// L\*a\*b\* -> XYZ.
///
/// The Y channel is recovered from L\* directly so the linear segment below
/// L\* = 8 is exact.
pub fn lab_to_xyz(lab: CieLab) -> CieXyz {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = fy + lab.a / 500.0;
    let fz = fy - lab.b / 200.0;

    let yr = if lab.l > KAPPA * EPSILON {
        fy * fy * fy
    } else {
        lab.l / KAPPA
    };

    CieXyz {
        x: lab_f_inv(fx) * REFERENCE_WHITE.x,
        y: yr * REFERENCE_WHITE.y,
        z: lab_f_inv(fz) * REFERENCE_WHITE.z,
    }
}

/// sRGB -> L\*a\*b\* in one step.
#[inline]
pub fn srgb_to_lab(srgb: StdRgb) -> CieLab {
    xyz_to_lab(rgb_to_xyz(linearize(srgb)))
}

/// L\*a\*b\* -> sRGB in one step, clipping colors outside the sRGB gamut.
#[inline]
pub fn lab_to_srgb(lab: CieLab) -> StdRgb {
    apply_gamma(xyz_to_rgb(lab_to_xyz(lab)))
}
