//! Color difference formulas
//!
//! Matching uses squared Euclidean distance in L\*a\*b\* by default. The
//! full CIEDE2000 difference is available for callers that want it, at
//! roughly an order of magnitude more work per comparison.

use std::f64::consts::PI;

use crate::color::CieLab;

/// Distance metric for palette matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Squared Euclidean distance in L\*a\*b\* (CIE76 squared).
    #[default]
    Euclidean,

    /// CIEDE2000 with kL = kC = kH = 1.
    Ciede2000,
}

impl DistanceMetric {
    /// Distance between `a` and `b` under this metric.
    #[inline]
    pub fn distance(self, a: CieLab, b: CieLab) -> f64 {
        match self {
            DistanceMetric::Euclidean => distance_squared(a, b),
            DistanceMetric::Ciede2000 => delta_e_2000(a, b),
        }
    }
}

/// `(L1-L2)^2 + (a1-a2)^2 + (b1-b2)^2`.
#[inline]
pub fn distance_squared(a: CieLab, b: CieLab) -> f64 {
    a.distance_squared(b)
}

// 25^7
const POW25_7: f64 = 6_103_515_625.0;

/// CIEDE2000 color difference (ΔE00), CIE Technical Report 142-2001.
pub fn delta_e_2000(lab1: CieLab, lab2: CieLab) -> f64 {
    let c1 = lab1.a.hypot(lab1.b);
    let c2 = lab2.a.hypot(lab2.b);
    let c_mean7 = ((c1 + c2) / 2.0).powi(7);
    let g = 0.5 * (1.0 - (c_mean7 / (c_mean7 + POW25_7)).sqrt());

    let a1p = lab1.a * (1.0 + g);
    let a2p = lab2.a * (1.0 + g);
    let c1p = a1p.hypot(lab1.b);
    let c2p = a2p.hypot(lab2.b);
    let h1p = hue_degrees(a1p, lab1.b);
    let h2p = hue_degrees(a2p, lab2.b);

    let dl = lab2.l - lab1.l;
    let dc = c2p - c1p;

    let chroma_product = c1p * c2p;
    let dh = if chroma_product == 0.0 {
        0.0
    } else {
        let d = h2p - h1p;
        if d > 180.0 {
            d - 360.0
        } else if d < -180.0 {
            d + 360.0
        } else {
            d
        }
    };
    let d_big_h = 2.0 * chroma_product.sqrt() * (dh.to_radians() / 2.0).sin();

    let l_mean = (lab1.l + lab2.l) / 2.0;
    let c_mean_p = (c1p + c2p) / 2.0;
    let h_mean = if chroma_product == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };

    let hr = h_mean.to_radians();
    let t = 1.0 - 0.17 * (hr - PI / 6.0).cos()
        + 0.24 * (2.0 * hr).cos()
        + 0.32 * (3.0 * hr + PI / 30.0).cos()
        - 0.20 * (4.0 * hr - 63f64.to_radians()).cos();

    let l50 = (l_mean - 50.0).powi(2);
    let sl = 1.0 + 0.015 * l50 / (20.0 + l50).sqrt();
    let sc = 1.0 + 0.045 * c_mean_p;
    let sh = 1.0 + 0.015 * c_mean_p * t;

    let d_theta = 30.0 * (-((h_mean - 275.0) / 25.0).powi(2)).exp();
    let c_mean_p7 = c_mean_p.powi(7);
    let rc = 2.0 * (c_mean_p7 / (c_mean_p7 + POW25_7)).sqrt();
    let rt = -(2.0 * d_theta).to_radians().sin() * rc;

    let tl = dl / sl;
    let tc = dc / sc;
    let th = d_big_h / sh;
    (tl * tl + tc * tc + th * th + rt * tc * th).sqrt()
}

fn hue_degrees(a: f64, b: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a).to_degrees();
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lab(l: f64, a: f64, b: f64) -> CieLab {
        CieLab::new(l, a, b)
    }

    // Reference pairs from Sharma, Wu & Dalal (2005), Table 1
    #[test]
    fn test_delta_e_2000_reference_pairs() {
        let cases = [
            (lab(50.0, 2.6772, -79.7751), lab(50.0, 0.0, -82.7485), 2.0425),
            (lab(50.0, 3.1571, -77.2803), lab(50.0, 0.0, -82.7485), 2.8615),
            (lab(50.0, -1.3802, -84.2814), lab(50.0, 0.0, -82.7485), 1.0000),
            (lab(50.0, 2.5, 0.0), lab(73.0, 25.0, -18.0), 27.1492),
            (lab(50.0, 2.5, 0.0), lab(50.0, 0.0, -2.5), 4.3065),
        ];
        for (i, (a, b, expected)) in cases.into_iter().enumerate() {
            let got = delta_e_2000(a, b);
            assert!(
                (got - expected).abs() < 1e-4,
                "pair {i}: got {got:.4}, expected {expected:.4}"
            );
        }
    }

    #[test]
    fn test_delta_e_2000_symmetry_and_identity() {
        let a = lab(62.0, -20.0, 35.0);
        let b = lab(40.0, 15.0, -5.0);
        assert!((delta_e_2000(a, b) - delta_e_2000(b, a)).abs() < 1e-9);
        assert_eq!(delta_e_2000(a, a), 0.0);
    }

    #[test]
    fn test_distance_squared_symmetry_and_identity() {
        let a = lab(30.0, 1.0, 2.0);
        let b = lab(70.0, -4.0, 9.0);
        assert_eq!(distance_squared(a, b), distance_squared(b, a));
        assert_eq!(distance_squared(a, a), 0.0);
        assert_eq!(distance_squared(a, b), 1600.0 + 25.0 + 49.0);
    }

    #[test]
    fn test_metric_dispatch() {
        let a = lab(50.0, 2.5, 0.0);
        let b = lab(50.0, 0.0, -2.5);
        assert_eq!(DistanceMetric::default(), DistanceMetric::Euclidean);
        assert_eq!(DistanceMetric::Euclidean.distance(a, b), 12.5);
        assert!((DistanceMetric::Ciede2000.distance(a, b) - 4.3065).abs() < 1e-4);
    }
}
