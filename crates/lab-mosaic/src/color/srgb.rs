//! 8-bit sRGB color types
//!
//! sRGB is the storage and display form. Channels are integers in 0..=255,
//! gamma-encoded. [`StdRgba`] adds the alpha channel carried by decoded
//! texture tiles.

use std::str::FromStr;

use super::error::ColorError;
use super::lab::CieLab;
use super::linear_rgb::LinearRgb;
use super::lut::linear_to_srgb_u8;

/// A gamma-encoded 8-bit sRGB color.
///
/// Every value of this type is in range by construction. Integer input from
/// outside the crate goes through [`StdRgb::try_new`], which rejects
/// channels outside 0..=255 instead of wrapping or clamping them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StdRgb {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

impl StdRgb {
    /// Black, used for padding in composited output.
    pub const BLACK: StdRgb = StdRgb::from_u8(0, 0, 0);

    /// White, the backdrop for alpha compositing.
    pub const WHITE: StdRgb = StdRgb::from_u8(255, 255, 255);

    /// Create an sRGB color from 8-bit channel values.
    ///
    /// # Example
    /// ```
    /// use lab_mosaic::StdRgb;
    /// let red = StdRgb::from_u8(255, 0, 0);
    /// assert_eq!(red.to_bytes(), [255, 0, 0]);
    /// ```
    #[inline]
    pub const fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create an sRGB color from wider integers, validating the range.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::ChannelOutOfRange`] if any channel is outside
    /// 0..=255.
    ///
    /// # Example
    /// ```
    /// use lab_mosaic::StdRgb;
    /// assert!(StdRgb::try_new(10, 20, 30).is_ok());
    /// assert!(StdRgb::try_new(256, 0, 0).is_err());
    /// ```
    pub fn try_new(r: i32, g: i32, b: i32) -> Result<Self, ColorError> {
        Ok(Self {
            r: checked_channel("r", r)?,
            g: checked_channel("g", g)?,
            b: checked_channel("b", b)?,
        })
    }

    /// Create an sRGB color from a byte array [R, G, B].
    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::from_u8(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array [R, G, B].
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Attach an alpha channel.
    #[inline]
    pub fn with_alpha(self, a: u8) -> StdRgba {
        StdRgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Tolerance comparison: every channel differs by less than
    /// [`COLOR_TOLERANCE`](super::COLOR_TOLERANCE).
    ///
    /// For 8-bit channels this is exact equality; the method exists so all
    /// color types share one comparison vocabulary in tests.
    pub fn approx_eq(self, other: StdRgb) -> bool {
        let close = |x: u8, y: u8| ((x as f64) - (y as f64)).abs() < super::COLOR_TOLERANCE;
        close(self.r, other.r) && close(self.g, other.g) && close(self.b, other.b)
    }
}

fn checked_channel(channel: &'static str, value: i32) -> Result<u8, ColorError> {
    u8::try_from(value).map_err(|_| ColorError::ChannelOutOfRange {
        channel,
        value: value as f64,
        min: 0.0,
        max: 255.0,
    })
}

impl From<LinearRgb> for StdRgb {
    /// Apply the sRGB gamma curve, scale to 0..=255 and round.
    fn from(linear: LinearRgb) -> Self {
        Self {
            r: linear_to_srgb_u8(linear.r()),
            g: linear_to_srgb_u8(linear.g()),
            b: linear_to_srgb_u8(linear.b()),
        }
    }
}

impl From<CieLab> for StdRgb {
    /// Lab -> XYZ -> linear RGB (gamut clipped) -> sRGB.
    fn from(lab: CieLab) -> Self {
        super::lab_to_srgb(lab)
    }
}

impl FromStr for StdRgb {
    type Err = ColorError;

    /// Parse an sRGB color from a hex string.
    ///
    /// Supports `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`. Parsing is
    /// case-insensitive; surrounding whitespace is trimmed.
    ///
    /// # Examples
    ///
    /// ```
    /// use lab_mosaic::StdRgb;
    ///
    /// let teal: StdRgb = "#008080".parse().unwrap();
    /// assert_eq!(teal, StdRgb::from_u8(0, 128, 128));
    ///
    /// let red: StdRgb = "f00".parse().unwrap();
    /// assert_eq!(red, StdRgb::from_u8(255, 0, 0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                // Each digit expands to a repeated pair (0xF -> 0xFF)
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::from_u8(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::from_u8(r, g, b))
            }
            _ => Err(ColorError::InvalidLength),
        }
    }
}

/// An 8-bit sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StdRgba {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
    /// Alpha channel, 255 = fully opaque
    pub a: u8,
}

impl StdRgba {
    /// Create an RGBA color from 8-bit channel values.
    #[inline]
    pub const fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// The color channels, ignoring alpha.
    #[inline]
    pub fn rgb(self) -> StdRgb {
        StdRgb::from_u8(self.r, self.g, self.b)
    }

    /// True when alpha is exactly 255.
    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Composite over an opaque backdrop.
    ///
    /// Fully opaque and fully transparent pixels short-circuit; everything
    /// else blends in integer sRGB, which is what image viewers show.
    pub fn over(self, backdrop: StdRgb) -> StdRgb {
        match self.a {
            255 => self.rgb(),
            0 => backdrop,
            a => {
                let a = a as u16;
                let blend = |fg: u8, bg: u8| ((fg as u16 * a + bg as u16 * (255 - a)) / 255) as u8;
                StdRgb::from_u8(
                    blend(self.r, backdrop.r),
                    blend(self.g, backdrop.g),
                    blend(self.b, backdrop.b),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_accepts_range() {
        assert_eq!(StdRgb::try_new(0, 0, 0).unwrap(), StdRgb::BLACK);
        assert_eq!(StdRgb::try_new(255, 255, 255).unwrap(), StdRgb::WHITE);
        assert_eq!(
            StdRgb::try_new(200, 50, 50).unwrap(),
            StdRgb::from_u8(200, 50, 50)
        );
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        let err = StdRgb::try_new(0, 256, 0).unwrap_err();
        assert!(matches!(
            err,
            ColorError::ChannelOutOfRange { channel: "g", .. }
        ));

        let err = StdRgb::try_new(-1, 0, 0).unwrap_err();
        assert!(matches!(
            err,
            ColorError::ChannelOutOfRange { channel: "r", .. }
        ));
        assert_eq!(
            err.to_string(),
            "channel r value -1 outside of range [0, 255]"
        );
    }

    #[test]
    fn test_hex_parsing() {
        let white: StdRgb = "#FFFFFF".parse().unwrap();
        assert_eq!(white, StdRgb::WHITE);

        let color: StdRgb = "#ABC".parse().unwrap();
        assert_eq!(color, StdRgb::from_u8(0xAA, 0xBB, 0xCC));

        let upper: StdRgb = "#ABCDEF".parse().unwrap();
        let lower: StdRgb = "  abcdef ".parse().unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_hex_parsing_errors() {
        assert!(matches!(
            "#GGG".parse::<StdRgb>(),
            Err(ColorError::InvalidHex(_))
        ));
        assert!(matches!(
            "#FFFF".parse::<StdRgb>(),
            Err(ColorError::InvalidLength)
        ));
        assert!(matches!("".parse::<StdRgb>(), Err(ColorError::InvalidLength)));
        assert!(matches!(
            "#ÿÿ".parse::<StdRgb>(),
            Err(ColorError::InvalidLength)
        ));
    }

    #[test]
    fn test_alpha_compositing() {
        let red = StdRgba::from_u8(255, 0, 0, 255);
        assert_eq!(red.over(StdRgb::WHITE), StdRgb::from_u8(255, 0, 0));

        let clear = StdRgba::from_u8(255, 0, 0, 0);
        assert_eq!(clear.over(StdRgb::WHITE), StdRgb::WHITE);

        let half = StdRgba::from_u8(0, 0, 0, 128);
        let blended = half.over(StdRgb::WHITE);
        assert_eq!(blended.r, blended.g);
        assert!(blended.r > 120 && blended.r < 135, "got {}", blended.r);
    }

    #[test]
    fn test_opacity() {
        assert!(StdRgb::from_u8(1, 2, 3).with_alpha(255).is_opaque());
        assert!(!StdRgb::from_u8(1, 2, 3).with_alpha(254).is_opaque());
    }
}
