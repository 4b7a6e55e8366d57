//! Cylindrical L\*a\*b\* (LCh)

use super::lab::CieLab;

/// A Lab color in polar form: lightness, chroma and hue angle in degrees.
///
/// The hue is normalized to 0.0..360.0. A neutral color (a = b = 0) has no
/// defined hue; it is reported as 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LchAb {
    /// Lightness, same as L\*
    pub l: f64,
    /// Chroma, distance from the neutral axis
    pub c: f64,
    /// Hue angle in degrees, 0.0..360.0
    pub h: f64,
}

impl LchAb {
    /// Create an LCh color; the hue is wrapped into 0.0..360.0.
    pub fn new(l: f64, c: f64, h: f64) -> Self {
        Self {
            l,
            c,
            h: normalize_hue(h),
        }
    }

    /// Tolerance comparison on every channel.
    pub fn approx_eq(self, other: LchAb) -> bool {
        super::all_within([self.l, self.c, self.h], [other.l, other.c, other.h])
    }
}

fn normalize_hue(h: f64) -> f64 {
    let h = h.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative input
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

impl From<CieLab> for LchAb {
    fn from(lab: CieLab) -> Self {
        let c = lab.a.hypot(lab.b);
        let h = if lab.a == 0.0 && lab.b == 0.0 {
            0.0
        } else {
            normalize_hue(lab.b.atan2(lab.a).to_degrees())
        };
        Self { l: lab.l, c, h }
    }
}
