//! Gamma transfer functions and the 8-bit decode lookup table.
//!
//! Decoding 8-bit sRGB goes through a 256-entry table generated at compile
//! time by build.rs. Encoding uses the formula directly: linear values are
//! continuous, so a table indexed by quantized linear input would lose the
//! dark end of the curve.

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Linear-segment threshold on the encoded side of the sRGB curve.
const SRGB_DECODE_THRESHOLD: f64 = 0.04045;

/// Linear-segment threshold on the linear side of the sRGB curve.
const SRGB_ENCODE_THRESHOLD: f64 = 0.0031308;

/// IEC 61966-2-1 exact formula: normalized sRGB (0.0..=1.0) to linear.
#[inline]
pub fn srgb_to_linear_exact(srgb: f64) -> f64 {
    if srgb <= SRGB_DECODE_THRESHOLD {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

/// IEC 61966-2-1 exact formula: linear (0.0..=1.0) to normalized sRGB.
#[inline]
pub fn linear_to_srgb_exact(linear: f64) -> f64 {
    if linear <= SRGB_ENCODE_THRESHOLD {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Decode one 8-bit sRGB channel through the lookup table.
#[inline]
pub fn srgb_u8_to_linear(value: u8) -> f64 {
    SRGB_TO_LINEAR[value as usize]
}

/// Encode one linear channel to 8-bit sRGB.
///
/// Input is clamped to 0.0..=1.0 first (gamut clipping), the result is
/// scaled by 255 and rounded.
#[inline]
pub fn linear_to_srgb_u8(linear: f64) -> u8 {
    let encoded = linear_to_srgb_exact(linear.clamp(0.0, 1.0));
    (encoded * 255.0).round().clamp(0.0, 255.0) as u8
}
