//! Small dense matrix algebra
//!
//! Just enough linear algebra to derive and invert the RGB to XYZ transform:
//! product, column-wise scaling and Gauss-Jordan inversion. The type is
//! dimension generic; production use is 3x3.

use thiserror::Error;

/// Errors from matrix construction and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// Operand shapes are incompatible.
    #[error("dimension mismatch: {left_rows}x{left_cols} against {right_rows}x{right_cols}")]
    DimensionMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    /// Inversion requested for a non-square matrix.
    #[error("cannot invert a non-square {rows}x{cols} matrix")]
    NotSquare { rows: usize, cols: usize },

    /// A zero pivot was hit during elimination.
    #[error("singular matrix: zero pivot in column {column}")]
    Singular { column: usize },

    /// Row vectors of unequal length were passed to [`Matrix::from_rows`].
    #[error("ragged rows: row {row} has {len} values, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// A row-major dense matrix of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// A `rows x cols` matrix of zeros.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build a matrix from row vectors.
    ///
    /// # Errors
    ///
    /// [`MatrixError::Ragged`] if the rows differ in length.
    ///
    /// ```
    /// use lab_mosaic::Matrix;
    /// let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    /// assert_eq!(m.get(1, 0), 3.0);
    /// ```
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let expected = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * expected);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != expected {
                return Err(MatrixError::Ragged {
                    row,
                    len: values.len(),
                    expected,
                });
            }
            data.extend_from_slice(values);
        }
        Ok(Self {
            rows: rows.len(),
            cols: expected,
            data,
        })
    }

    /// The `n x n` identity.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::new(n, n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        m
    }

    /// A column vector.
    pub fn column(values: &[f64]) -> Self {
        Self {
            rows: values.len(),
            cols: 1,
            data: values.to_vec(),
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Element at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "matrix index out of bounds");
        self.data[row * self.cols + col]
    }

    /// Set the element at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.rows && col < self.cols, "matrix index out of bounds");
        self.data[row * self.cols + col] = value;
    }

    fn mismatch(&self, other: &Matrix) -> MatrixError {
        MatrixError::DimensionMismatch {
            left_rows: self.rows,
            left_cols: self.cols,
            right_rows: other.rows,
            right_cols: other.cols,
        }
    }

    /// Matrix product `self * other`.
    ///
    /// # Errors
    ///
    /// [`MatrixError::DimensionMismatch`] unless `self.cols() == other.rows()`.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        if self.cols != other.rows {
            return Err(self.mismatch(other));
        }
        let mut out = Matrix::new(self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let sum = (0..self.cols)
                    .map(|k| self.data[i * self.cols + k] * other.data[k * other.cols + j])
                    .sum();
                out.data[i * out.cols + j] = sum;
            }
        }
        Ok(out)
    }

    /// Inverse by Gauss-Jordan elimination on `[A | I]`.
    ///
    /// Rows are never swapped, so a zero on the diagonal fails even when a
    /// pivoting solver would succeed. Inputs here are well-conditioned
    /// primaries matrices.
    ///
    /// # Errors
    ///
    /// [`MatrixError::NotSquare`] for non-square input,
    /// [`MatrixError::Singular`] when a pivot is exactly zero.
    pub fn invert(&self) -> Result<Matrix, MatrixError> {
        if self.rows != self.cols {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let n = self.rows;
        let width = 2 * n;

        // Augmented [A | I], row-major with 2n columns
        let mut aug = vec![0.0; n * width];
        for i in 0..n {
            aug[i * width..i * width + n].copy_from_slice(&self.data[i * n..(i + 1) * n]);
            aug[i * width + n + i] = 1.0;
        }

        for col in 0..n {
            let pivot = aug[col * width + col];
            if pivot == 0.0 {
                return Err(MatrixError::Singular { column: col });
            }
            for v in &mut aug[col * width..(col + 1) * width] {
                *v /= pivot;
            }
            for row in 0..n {
                if row == col {
                    continue;
                }
                let factor = aug[row * width + col];
                if factor == 0.0 {
                    continue;
                }
                for k in 0..width {
                    aug[row * width + k] -= factor * aug[col * width + k];
                }
            }
        }

        let mut out = Matrix::new(n, n);
        for i in 0..n {
            out.data[i * n..(i + 1) * n].copy_from_slice(&aug[i * width + n..(i + 1) * width]);
        }
        Ok(out)
    }

    /// Multiply column `j` by `scale[j][0]`.
    ///
    /// # Errors
    ///
    /// [`MatrixError::DimensionMismatch`] unless `scale` has one row per
    /// column of `self`.
    pub fn column_wise_scaling(&self, scale: &Matrix) -> Result<Matrix, MatrixError> {
        if scale.rows != self.cols || scale.cols == 0 {
            return Err(self.mismatch(scale));
        }
        let mut out = self.clone();
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[i * self.cols + j] *= scale.data[j * scale.cols];
            }
        }
        Ok(out)
    }

    /// Copy out a 3x3 matrix as fixed-size rows for per-pixel transforms.
    ///
    /// # Errors
    ///
    /// [`MatrixError::DimensionMismatch`] unless the matrix is 3x3.
    pub fn to_array3(&self) -> Result<[[f64; 3]; 3], MatrixError> {
        if self.rows != 3 || self.cols != 3 {
            return Err(MatrixError::DimensionMismatch {
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: 3,
                right_cols: 3,
            });
        }
        let d = &self.data;
        Ok([[d[0], d[1], d[2]], [d[3], d[4], d[5]], [d[6], d[7], d[8]]])
    }

    /// True when every element differs from `other` by at most `tol`.
    pub fn approx_eq(&self, other: &Matrix, tol: f64) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).abs() <= tol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn m(rows: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_multiply() {
        let a = m(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let b = m(vec![vec![7.0, 8.0], vec![9.0, 10.0], vec![11.0, 12.0]]);
        let c = a.multiply(&b).unwrap();
        assert_eq!(c, m(vec![vec![58.0, 64.0], vec![139.0, 154.0]]));
    }

    #[test]
    fn test_multiply_dimension_mismatch() {
        let a = Matrix::new(2, 3);
        let b = Matrix::new(2, 3);
        assert_eq!(
            a.multiply(&b).unwrap_err(),
            MatrixError::DimensionMismatch {
                left_rows: 2,
                left_cols: 3,
                right_rows: 2,
                right_cols: 3
            }
        );
    }

    #[test]
    fn test_identity_is_neutral() {
        let a = m(vec![vec![2.0, -1.0], vec![0.5, 3.0]]);
        assert_eq!(a.multiply(&Matrix::identity(2)).unwrap(), a);
        assert_eq!(Matrix::identity(2).multiply(&a).unwrap(), a);
    }

    #[test]
    fn test_invert_known() {
        let a = m(vec![vec![4.0, 7.0], vec![2.0, 6.0]]);
        let inv = a.invert().unwrap();
        let expected = m(vec![vec![0.6, -0.7], vec![-0.2, 0.4]]);
        assert!(inv.approx_eq(&expected, 1e-12), "{inv:?}");
        assert!(a.multiply(&inv).unwrap().approx_eq(&Matrix::identity(2), 1e-12));
    }

    #[test]
    fn test_invert_twice_recovers_original() {
        let a = m(vec![
            vec![0.64, 0.30, 0.15],
            vec![0.33, 0.60, 0.06],
            vec![0.03, 0.10, 0.79],
        ]);
        let back = a.invert().unwrap().invert().unwrap();
        assert!(back.approx_eq(&a, 1e-12));
    }

    #[test]
    fn test_invert_singular() {
        let a = m(vec![vec![1.0, 2.0], vec![2.0, 4.0]]);
        assert_eq!(a.invert().unwrap_err(), MatrixError::Singular { column: 1 });
    }

    #[test]
    fn test_invert_zero_pivot_without_pivoting() {
        // Invertible, but the first pivot is zero and rows are not swapped
        let a = m(vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
        assert_eq!(a.invert().unwrap_err(), MatrixError::Singular { column: 0 });
    }

    #[test]
    fn test_invert_not_square() {
        assert_eq!(
            Matrix::new(2, 3).invert().unwrap_err(),
            MatrixError::NotSquare { rows: 2, cols: 3 }
        );
    }

    #[test]
    fn test_column_wise_scaling() {
        let a = m(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let s = Matrix::column(&[10.0, 0.5]);
        let scaled = a.column_wise_scaling(&s).unwrap();
        assert_eq!(scaled, m(vec![vec![10.0, 1.0], vec![30.0, 2.0]]));

        let bad = Matrix::column(&[1.0, 2.0, 3.0]);
        assert!(matches!(
            a.column_wise_scaling(&bad),
            Err(MatrixError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_ragged_rows() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            MatrixError::Ragged {
                row: 1,
                len: 1,
                expected: 2
            }
        );
        assert_eq!(
            err.to_string(),
            "ragged rows: row 1 has 1 values, expected 2"
        );
    }

    #[test]
    fn test_to_array3() {
        let a = Matrix::identity(3).to_array3().unwrap();
        assert_eq!(a, [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(Matrix::identity(2).to_array3().is_err());
    }
}
