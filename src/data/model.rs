use ndarray::Array2;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Raised when two matrices cannot be combined elementwise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error(
        "mask of shape {mask_rows}x{mask_cols} cannot be applied to data of shape {rows}x{cols}"
    )]
    MaskMismatch {
        rows: usize,
        cols: usize,
        mask_rows: usize,
        mask_cols: usize,
    },
}

// ---------------------------------------------------------------------------
// Matrix – the 2D grid being rendered
// ---------------------------------------------------------------------------

/// A dense row-major grid of `f64`, row 0 being the first line of the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    values: Array2<f64>,
}

impl Matrix {
    pub fn new(values: Array2<f64>) -> Self {
        Matrix { values }
    }

    /// Number of rows (lines in the source file).
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns (tokens per line).
    pub fn cols(&self) -> usize {
        self.values.ncols()
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Elementwise product with `mask`.
    ///
    /// The mask must either match the data's shape or broadcast to it
    /// (a single row, a single column, or a single value).
    pub fn masked(&self, mask: &Matrix) -> Result<Matrix, ShapeError> {
        let mask_view = mask
            .values
            .broadcast(self.values.raw_dim())
            .ok_or(ShapeError::MaskMismatch {
                rows: self.rows(),
                cols: self.cols(),
                mask_rows: mask.rows(),
                mask_cols: mask.cols(),
            })?;
        Ok(Matrix::new(&self.values * &mask_view))
    }

    /// Natural logarithm of every element. Non-positive values become
    /// `-inf` / `NaN` and are left for the renderer to treat as bad pixels.
    pub fn ln(&self) -> Matrix {
        Matrix::new(self.values.mapv(f64::ln))
    }

    /// Minimum and maximum over the finite elements, `None` if there are none.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Count of `NaN` and infinite elements.
    pub fn non_finite_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_finite()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn dimensions_follow_the_array() {
        let m = Matrix::new(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
    }

    #[test]
    fn mask_multiplies_elementwise() {
        let data = Matrix::new(array![[1.0, 2.0], [3.0, 4.0]]);
        let mask = Matrix::new(array![[0.0, 1.0], [2.0, 0.5]]);
        let out = data.masked(&mask).unwrap();
        assert_eq!(out.values(), &array![[0.0, 2.0], [6.0, 2.0]]);
    }

    #[test]
    fn single_row_mask_broadcasts_down_the_rows() {
        let data = Matrix::new(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let mask = Matrix::new(array![[1.0, 0.0, 2.0]]);
        let out = data.masked(&mask).unwrap();
        assert_eq!(out.values(), &array![[1.0, 0.0, 6.0], [4.0, 0.0, 12.0]]);
    }

    #[test]
    fn mismatched_mask_is_rejected() {
        let data = Matrix::new(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let mask = Matrix::new(array![[1.0, 0.0], [0.0, 1.0]]);
        let err = data.masked(&mask).unwrap_err();
        assert_eq!(
            err,
            ShapeError::MaskMismatch {
                rows: 2,
                cols: 3,
                mask_rows: 2,
                mask_cols: 2
            }
        );
        assert!(err.to_string().contains("2x2"));
    }

    #[test]
    fn log_of_non_positive_values_is_not_finite() {
        let m = Matrix::new(array![[1.0, 0.0, -1.0, std::f64::consts::E]]);
        let logged = m.ln();
        let v = logged.values();
        assert_eq!(v[[0, 0]], 0.0);
        assert_eq!(v[[0, 1]], f64::NEG_INFINITY);
        assert!(v[[0, 2]].is_nan());
        assert!((v[[0, 3]] - 1.0).abs() < 1e-12);
        assert_eq!(logged.non_finite_count(), 2);
    }

    #[test]
    fn finite_range_skips_bad_values() {
        let m = Matrix::new(array![[f64::NAN, 3.0], [f64::NEG_INFINITY, -2.0]]);
        assert_eq!(m.finite_range(), Some((-2.0, 3.0)));

        let all_bad = Matrix::new(array![[f64::NAN, f64::INFINITY]]);
        assert_eq!(all_bad.finite_range(), None);
    }
}
