//! RGB <-> XYZ matrices derived from primaries
//!
//! The forward matrix is built from the chromaticities of the three
//! primaries and the reference white: the unscaled primaries matrix is
//! inverted, multiplied by the white column, and the result scales the
//! primaries column by column. The sRGB instance is derived once on first
//! use and shared read-only by every thread.

use std::sync::OnceLock;

use crate::matrix::{Matrix, MatrixError};

use super::xyz::{CieXyz, REFERENCE_WHITE};

/// Chromaticity coordinates (x, y) of the red, green and blue primaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primaries {
    pub red: (f64, f64),
    pub green: (f64, f64),
    pub blue: (f64, f64),
}

/// ITU-R BT.709 / sRGB primaries.
pub const SRGB_PRIMARIES: Primaries = Primaries {
    red: (0.64, 0.33),
    green: (0.30, 0.60),
    blue: (0.15, 0.06),
};

/// A forward/inverse pair of 3x3 RGB <-> XYZ matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbXyzTransform {
    forward: [[f64; 3]; 3],
    inverse: [[f64; 3]; 3],
}

static SRGB_TRANSFORM: OnceLock<RgbXyzTransform> = OnceLock::new();

impl RgbXyzTransform {
    /// Derive the transform for `primaries` under the `white` point.
    ///
    /// # Errors
    ///
    /// [`MatrixError::Singular`] when the primaries are degenerate (for
    /// example collinear), since the primaries matrix cannot be inverted.
    pub fn from_primaries(primaries: Primaries, white: CieXyz) -> Result<Self, MatrixError> {
        // Each column is (x/y, 1, (1-x-y)/y) for one primary
        let xyz_column = |(x, y): (f64, f64)| [x / y, 1.0, (1.0 - x - y) / y];
        let [r, g, b] = [
            xyz_column(primaries.red),
            xyz_column(primaries.green),
            xyz_column(primaries.blue),
        ];
        let unscaled = Matrix::from_rows(vec![
            vec![r[0], g[0], b[0]],
            vec![r[1], g[1], b[1]],
            vec![r[2], g[2], b[2]],
        ])?;

        let white = Matrix::column(&white.to_array());
        let scale = unscaled.invert()?.multiply(&white)?;
        let forward = unscaled.column_wise_scaling(&scale)?;
        let inverse = forward.invert()?;

        Ok(Self {
            forward: forward.to_array3()?,
            inverse: inverse.to_array3()?,
        })
    }

    /// The sRGB / D65 transform, derived on first call.
    pub fn srgb() -> &'static Self {
        SRGB_TRANSFORM.get_or_init(|| {
            Self::from_primaries(SRGB_PRIMARIES, REFERENCE_WHITE)
                .expect("sRGB primaries form an invertible matrix")
        })
    }

    /// Linear RGB -> XYZ.
    #[inline]
    pub fn to_xyz(&self, rgb: [f64; 3]) -> [f64; 3] {
        apply(&self.forward, rgb)
    }

    /// XYZ -> linear RGB, unclipped.
    #[inline]
    pub fn to_rgb(&self, xyz: [f64; 3]) -> [f64; 3] {
        apply(&self.inverse, xyz)
    }

    /// The forward matrix as a [`Matrix`].
    pub fn forward_matrix(&self) -> Matrix {
        to_matrix(&self.forward)
    }

    /// The inverse matrix as a [`Matrix`].
    pub fn inverse_matrix(&self) -> Matrix {
        to_matrix(&self.inverse)
    }
}

#[inline]
fn apply(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

fn to_matrix(rows: &[[f64; 3]; 3]) -> Matrix {
    let mut m = Matrix::new(3, 3);
    for (i, row) in rows.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            m.set(i, j, v);
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srgb_forward_matrix_values() {
        // Published sRGB D65 matrix (IEC 61966-2-1 rounded to 4 places)
        let expected = [
            [0.4124, 0.3576, 0.1805],
            [0.2126, 0.7152, 0.0722],
            [0.0193, 0.1192, 0.9505],
        ];
        let m = RgbXyzTransform::srgb().forward_matrix();
        for (i, row) in expected.iter().enumerate() {
            for (j, &e) in row.iter().enumerate() {
                assert!(
                    (m.get(i, j) - e).abs() < 5e-4,
                    "element ({i},{j}) = {} expected {e}",
                    m.get(i, j)
                );
            }
        }
    }

    #[test]
    fn test_forward_times_inverse_is_identity() {
        let t = RgbXyzTransform::srgb();
        let product = t.forward_matrix().multiply(&t.inverse_matrix()).unwrap();
        assert!(product.approx_eq(&Matrix::identity(3), 1e-12));
    }

    #[test]
    fn test_double_inverse_recovers_forward() {
        let forward = RgbXyzTransform::srgb().forward_matrix();
        let back = forward.invert().unwrap().invert().unwrap();
        assert!(back.approx_eq(&forward, 1e-12));
    }

    #[test]
    fn test_srgb_is_shared() {
        let a = RgbXyzTransform::srgb() as *const _;
        let b = RgbXyzTransform::srgb() as *const _;
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_primaries_fail() {
        // Three points on one line
        let collinear = Primaries {
            red: (0.2, 0.2),
            green: (0.3, 0.3),
            blue: (0.4, 0.4),
        };
        assert!(RgbXyzTransform::from_primaries(collinear, REFERENCE_WHITE).is_err());
    }
}
