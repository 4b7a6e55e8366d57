//! CIE 1931 XYZ tristimulus values

use super::lab::CieLab;
use super::linear_rgb::LinearRgb;
use super::transform::RgbXyzTransform;

/// A CIE XYZ color, scaled so the reference white has Y = 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CieXyz {
    /// X tristimulus value
    pub x: f64,
    /// Y tristimulus value (relative luminance)
    pub y: f64,
    /// Z tristimulus value
    pub z: f64,
}

/// The D65 reference white of sRGB. Shared by every conversion in the crate.
pub const REFERENCE_WHITE: CieXyz = CieXyz {
    x: 0.95047,
    y: 1.0,
    z: 1.08883,
};

impl CieXyz {
    /// Create an XYZ color.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Channels as an array [X, Y, Z].
    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Tolerance comparison on every channel.
    pub fn approx_eq(self, other: CieXyz) -> bool {
        super::all_within(self.to_array(), other.to_array())
    }
}

impl From<LinearRgb> for CieXyz {
    /// Forward sRGB primaries matrix.
    fn from(rgb: LinearRgb) -> Self {
        let [x, y, z] = RgbXyzTransform::srgb().to_xyz(rgb.to_array());
        Self { x, y, z }
    }
}

impl From<CieLab> for CieXyz {
    fn from(lab: CieLab) -> Self {
        super::convert::lab_to_xyz(lab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::StdRgb;

    #[test]
    fn test_white_maps_to_reference_white() {
        let xyz = CieXyz::from(LinearRgb::from(StdRgb::WHITE));
        assert!((xyz.x - REFERENCE_WHITE.x).abs() < 1e-9, "x = {}", xyz.x);
        assert!((xyz.y - REFERENCE_WHITE.y).abs() < 1e-9, "y = {}", xyz.y);
        assert!((xyz.z - REFERENCE_WHITE.z).abs() < 1e-9, "z = {}", xyz.z);
    }

    #[test]
    fn test_primary_luminance() {
        // Y row of the sRGB matrix: ~0.2126, 0.7152, 0.0722
        let red = CieXyz::from(LinearRgb::clamped(1.0, 0.0, 0.0));
        let green = CieXyz::from(LinearRgb::clamped(0.0, 1.0, 0.0));
        let blue = CieXyz::from(LinearRgb::clamped(0.0, 0.0, 1.0));
        assert!((red.y - 0.2126).abs() < 1e-3, "red Y = {}", red.y);
        assert!((green.y - 0.7152).abs() < 1e-3, "green Y = {}", green.y);
        assert!((blue.y - 0.0722).abs() < 1e-3, "blue Y = {}", blue.y);
    }

    #[test]
    fn test_xyz_non_negative_for_gamut_colors() {
        for &(r, g, b) in &[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.2, 0.9, 0.4)] {
            let xyz = CieXyz::from(LinearRgb::clamped(r, g, b));
            assert!(xyz.x >= 0.0 && xyz.y >= 0.0 && xyz.z >= 0.0);
        }
    }
}
