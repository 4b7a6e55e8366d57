//! CIE L\*a\*b\* color type
//!
//! L\*a\*b\* is the working space for averaging and matching. Euclidean
//! distance in it approximates perceived color difference, which is what
//! texture and palette selection is judged on.

use super::lch::LchAb;
use super::srgb::StdRgb;
use super::xyz::CieXyz;

/// CIE threshold between the cube-root and linear segments, 216/24389.
pub const EPSILON: f64 = 216.0 / 24389.0;

/// Slope constant of the linear segment, 24389/27.
pub const KAPPA: f64 = 24389.0 / 27.0;

/// A color in CIE L\*a\*b\* relative to the D65 reference white.
///
/// For colors inside the sRGB gamut, `l` lies in 0.0..=100.0 and `a`, `b`
/// in roughly -128.0..=127.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CieLab {
    /// Lightness (0 = black, 100 = reference white)
    pub l: f64,
    /// Green (-) to red (+) axis
    pub a: f64,
    /// Blue (-) to yellow (+) axis
    pub b: f64,
}

impl CieLab {
    /// Create a Lab color.
    #[inline]
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    pub fn distance_squared(self, other: CieLab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }

    /// Channels as an array [L, a, b].
    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.l, self.a, self.b]
    }

    /// Tolerance comparison on every channel.
    pub fn approx_eq(self, other: CieLab) -> bool {
        super::all_within(self.to_array(), other.to_array())
    }
}

impl From<CieXyz> for CieLab {
    fn from(xyz: CieXyz) -> Self {
        super::convert::xyz_to_lab(xyz)
    }
}

impl From<StdRgb> for CieLab {
    /// sRGB -> linear RGB -> XYZ -> Lab.
    fn from(srgb: StdRgb) -> Self {
        super::convert::srgb_to_lab(srgb)
    }
}

impl From<LchAb> for CieLab {
    fn from(lch: LchAb) -> Self {
        let h = lch.h.to_radians();
        Self {
            l: lch.l,
            a: lch.c * h.cos(),
            b: lch.c * h.sin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cie_constants() {
        assert!((EPSILON - 0.008856).abs() < 1e-6);
        assert!((KAPPA - 903.3).abs() < 0.1);
        // The two segments meet at L = 8
        assert!((KAPPA * EPSILON - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_squared() {
        let a = CieLab::new(50.0, 10.0, -10.0);
        let b = CieLab::new(53.0, 14.0, -10.0);
        assert_eq!(a.distance_squared(b), 25.0);
        assert_eq!(b.distance_squared(a), 25.0);
        assert_eq!(a.distance_squared(a), 0.0);
    }

    #[test]
    fn test_approx_eq_tolerance() {
        let a = CieLab::new(50.0, 0.0, 0.0);
        assert!(a.approx_eq(CieLab::new(50.9, -0.9, 0.5)));
        assert!(!a.approx_eq(CieLab::new(51.0, 0.0, 0.0)));
    }

    #[test]
    fn test_known_srgb_values() {
        let white = CieLab::from(StdRgb::WHITE);
        assert!((white.l - 100.0).abs() < 1e-3, "L = {}", white.l);
        assert!(white.a.abs() < 1e-3 && white.b.abs() < 1e-3);

        let black = CieLab::from(StdRgb::BLACK);
        assert!(black.l.abs() < 1e-9);

        // Pure sRGB red: L 53.24, a 80.09, b 67.20
        let red = CieLab::from(StdRgb::from_u8(255, 0, 0));
        assert!((red.l - 53.24).abs() < 0.05, "L = {}", red.l);
        assert!((red.a - 80.09).abs() < 0.1, "a = {}", red.a);
        assert!((red.b - 67.20).abs() < 0.1, "b = {}", red.b);
    }
}
