//! Capability traits for fitted inference artifacts.
//!
//! These traits are the seams between the estimation pipeline and whatever
//! concrete fitted-artifact technology sits behind it. Any scaler/regressor
//! pair can be substituted as long as both orderings the artifacts were
//! fitted on are preserved (see [`crate::features`]).

use crate::error::Result;

/// A fitted per-column scaler mapping raw rows to normalized space and back.
///
/// Implementations must rescale each column independently, using only that
/// column's fitted statistics (e.g. standardization or min-max scaling).
/// The estimation pipeline reconstructs the calorie column from a row whose
/// other columns hold placeholder zeros; a transform that couples columns
/// (PCA and friends) would silently corrupt that reconstruction.
///
/// # Examples
///
/// ```
/// use kalori::prelude::*;
///
/// let scaler = StandardScaler::from_params(vec![2.0, 10.0], vec![1.0, 5.0]).unwrap();
/// let scaled = scaler.transform(&[3.0, 20.0]).unwrap();
/// assert!((scaled[0] - 1.0).abs() < 1e-6);
/// assert!((scaled[1] - 2.0).abs() < 1e-6);
///
/// let raw = scaler.inverse_transform(&scaled).unwrap();
/// assert!((raw[0] - 3.0).abs() < 1e-6);
/// ```
pub trait ColumnScaler {
    /// Number of columns the scaler was fitted on.
    fn n_columns(&self) -> usize;

    /// Maps a raw row to normalized space.
    ///
    /// # Errors
    ///
    /// Returns an error if the row length doesn't match the fitted column
    /// count.
    fn transform(&self, row: &[f32]) -> Result<Vec<f32>>;

    /// Maps a normalized row back to the original scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the row length doesn't match the fitted column
    /// count.
    fn inverse_transform(&self, row: &[f32]) -> Result<Vec<f32>>;
}

/// A fitted regression model mapping one feature row to one scalar.
pub trait Regressor {
    /// Number of features the model was fitted on.
    fn n_features(&self) -> usize;

    /// Predicts the target scalar for a single feature row.
    ///
    /// # Errors
    ///
    /// Returns an error if the row length doesn't match the fitted feature
    /// count.
    fn predict(&self, features: &[f32]) -> Result<f32>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KaloriError;

    // Minimal impls to exercise the trait objects the pipeline consumes.
    struct HalfScaler {
        n: usize,
    }

    impl ColumnScaler for HalfScaler {
        fn n_columns(&self) -> usize {
            self.n
        }

        fn transform(&self, row: &[f32]) -> Result<Vec<f32>> {
            if row.len() != self.n {
                return Err(KaloriError::DimensionMismatch {
                    expected: self.n,
                    actual: row.len(),
                });
            }
            Ok(row.iter().map(|v| v / 2.0).collect())
        }

        fn inverse_transform(&self, row: &[f32]) -> Result<Vec<f32>> {
            if row.len() != self.n {
                return Err(KaloriError::DimensionMismatch {
                    expected: self.n,
                    actual: row.len(),
                });
            }
            Ok(row.iter().map(|v| v * 2.0).collect())
        }
    }

    struct SumRegressor {
        n: usize,
    }

    impl Regressor for SumRegressor {
        fn n_features(&self) -> usize {
            self.n
        }

        fn predict(&self, features: &[f32]) -> Result<f32> {
            if features.len() != self.n {
                return Err(KaloriError::DimensionMismatch {
                    expected: self.n,
                    actual: features.len(),
                });
            }
            Ok(features.iter().sum())
        }
    }

    #[test]
    fn test_scaler_round_trip_through_trait_object() {
        let scaler: &dyn ColumnScaler = &HalfScaler { n: 3 };
        let scaled = scaler.transform(&[2.0, 4.0, 6.0]).expect("valid row");
        let raw = scaler.inverse_transform(&scaled).expect("valid row");
        assert_eq!(raw, vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_regressor_rejects_wrong_arity() {
        let model: &dyn Regressor = &SumRegressor { n: 4 };
        let err = model.predict(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            KaloriError::DimensionMismatch {
                expected: 4,
                actual: 2
            }
        ));
    }
}
