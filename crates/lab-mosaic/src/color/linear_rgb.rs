//! Linear RGB color type
//!
//! Linear RGB is proportional to light power. It sits between the
//! gamma-encoded sRGB storage form and the CIE XYZ matrix transform.

use super::error::ColorError;
use super::lut::srgb_u8_to_linear;
use super::srgb::StdRgb;
use super::transform::RgbXyzTransform;
use super::xyz::CieXyz;

/// A color in linear RGB, every channel in 0.0..=1.0.
///
/// Fields are private so the range holds for every value: outside input is
/// validated by [`LinearRgb::try_new`], derived values go through
/// [`LinearRgb::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearRgb {
    r: f64,
    g: f64,
    b: f64,
}

impl LinearRgb {
    /// Create a linear RGB color, rejecting channels outside 0.0..=1.0.
    ///
    /// NaN is rejected as well.
    ///
    /// # Example
    /// ```
    /// use lab_mosaic::LinearRgb;
    /// assert!(LinearRgb::try_new(0.5, 0.25, 1.0).is_ok());
    /// assert!(LinearRgb::try_new(1.5, 0.0, 0.0).is_err());
    /// ```
    pub fn try_new(r: f64, g: f64, b: f64) -> Result<Self, ColorError> {
        Ok(Self {
            r: checked_channel("r", r)?,
            g: checked_channel("g", g)?,
            b: checked_channel("b", b)?,
        })
    }

    /// Create a linear RGB color, clipping each channel into 0.0..=1.0.
    ///
    /// This is the gamut-clipping step when a color computed from XYZ lies
    /// outside the sRGB gamut. NaN channels become 0.0.
    #[inline]
    pub fn clamped(r: f64, g: f64, b: f64) -> Self {
        let clip = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            r: clip(r),
            g: clip(g),
            b: clip(b),
        }
    }

    /// Red channel.
    #[inline]
    pub fn r(&self) -> f64 {
        self.r
    }

    /// Green channel.
    #[inline]
    pub fn g(&self) -> f64 {
        self.g
    }

    /// Blue channel.
    #[inline]
    pub fn b(&self) -> f64 {
        self.b
    }

    /// Channels as an array [R, G, B].
    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    /// Tolerance comparison on every channel.
    pub fn approx_eq(self, other: LinearRgb) -> bool {
        super::all_within(self.to_array(), other.to_array())
    }
}

fn checked_channel(channel: &'static str, value: f64) -> Result<f64, ColorError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ColorError::ChannelOutOfRange {
            channel,
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}

impl From<StdRgb> for LinearRgb {
    /// Decode the sRGB gamma curve through the 256-entry lookup table.
    fn from(srgb: StdRgb) -> Self {
        Self {
            r: srgb_u8_to_linear(srgb.r),
            g: srgb_u8_to_linear(srgb.g),
            b: srgb_u8_to_linear(srgb.b),
        }
    }
}

impl From<CieXyz> for LinearRgb {
    /// Inverse matrix transform, then clip into the sRGB gamut.
    fn from(xyz: CieXyz) -> Self {
        let [r, g, b] = RgbXyzTransform::srgb().to_rgb([xyz.x, xyz.y, xyz.z]);
        Self::clamped(r, g, b)
    }
}
