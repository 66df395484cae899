//! Calorie estimation pipeline over a fitted scaler/model pair.
//!
//! The pipeline bridges raw nutrient grams and the model's trained input
//! space: forward-scale a 5-column row with a zero-seeded calories slot,
//! predict from the reordered 4-feature subset, then undo the calorie
//! column's scaling by inverse-transforming a zero-filled row that carries
//! the prediction in position 0.

use crate::artifacts::ArtifactStore;
use crate::error::{KaloriError, Result};
use crate::features::{model_features, FeatureVector, NutrientInput, COL_CALORIES, SCALER_COLUMNS};
use crate::traits::{ColumnScaler, Regressor};
use std::sync::Arc;
use tracing::trace;

/// Estimates calories for nutrient inputs using a store's cached artifacts.
///
/// Cheap to clone; safe to share across threads once constructed.
///
/// # Examples
///
/// ```no_run
/// use kalori::prelude::*;
/// use std::sync::Arc;
///
/// let store = Arc::new(ArtifactStore::new(ArtifactPaths::from_env()));
/// let predictor = CaloriePredictor::new(store);
///
/// let input = NutrientInput::new(10.0, 20.0, 5.0, 3.0)?;
/// let kcal = predictor.estimate(&input)?;
/// assert!(kcal.is_finite());
/// # Ok::<(), kalori::error::KaloriError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CaloriePredictor {
    store: Arc<ArtifactStore>,
}

impl CaloriePredictor {
    /// Creates a predictor over a shared artifact store.
    #[must_use]
    pub fn new(store: Arc<ArtifactStore>) -> Self {
        Self { store }
    }

    /// Estimates the caloric content of one food item, in kcal.
    ///
    /// # Errors
    ///
    /// Returns [`KaloriError::ArtifactsUnavailable`] if the store's load
    /// failed, or [`KaloriError::Prediction`] if a pipeline stage fails.
    pub fn estimate(&self, input: &NutrientInput) -> Result<f32> {
        let artifacts = self.store.artifacts()?;
        estimate_with(artifacts.scaler(), artifacts.model(), input)
    }
}

/// The core boundary consumed by UI shells: raw macros in grams → estimated
/// kcal.
///
/// # Errors
///
/// Returns [`KaloriError::InvalidInput`] for negative or non-finite values,
/// [`KaloriError::ArtifactsUnavailable`] if loading failed, or
/// [`KaloriError::Prediction`] if a pipeline stage fails.
pub fn estimate_calories(
    store: &ArtifactStore,
    fat: f32,
    carb: f32,
    protein: f32,
    sugars: f32,
) -> Result<f32> {
    let input = NutrientInput::new(fat, carb, protein, sugars)?;
    let artifacts = store.artifacts()?;
    estimate_with(artifacts.scaler(), artifacts.model(), &input)
}

/// Runs the estimation pipeline over explicit artifacts.
///
/// The returned value is unrounded; display formatting is a shell concern.
///
/// # Errors
///
/// Returns [`KaloriError::Prediction`] naming the failing stage if the
/// scaler or model rejects its input or produces a non-finite estimate.
pub fn estimate_with(
    scaler: &dyn ColumnScaler,
    model: &dyn Regressor,
    input: &NutrientInput,
) -> Result<f32> {
    let features = FeatureVector::from_input(input);

    let scaled = scaler
        .transform(features.as_row())
        .map_err(|e| stage_error("transform", &e))?;

    let subset = model_features(&scaled)?;

    let prediction = model
        .predict(&subset)
        .map_err(|e| stage_error("predict", &e))?;

    // Only the calories slot is seeded; a per-column scaler reconstructs
    // column 0 from column-0 statistics alone, so the zero placeholders
    // never reach the result.
    let mut seeded = [0.0; SCALER_COLUMNS];
    seeded[COL_CALORIES] = prediction;

    let raw = scaler
        .inverse_transform(&seeded)
        .map_err(|e| stage_error("inverse_transform", &e))?;

    let estimate = raw
        .first()
        .copied()
        .ok_or_else(|| KaloriError::Prediction {
            stage: "inverse_transform",
            message: "empty row returned".to_string(),
        })?;

    if !estimate.is_finite() {
        return Err(KaloriError::Prediction {
            stage: "inverse_transform",
            message: format!("non-finite estimate {estimate}"),
        });
    }

    trace!(
        fat = input.fat,
        carb = input.carb,
        protein = input.protein,
        sugars = input.sugars,
        kcal = estimate,
        "estimate computed"
    );
    Ok(estimate)
}

fn stage_error(stage: &'static str, cause: &KaloriError) -> KaloriError {
    KaloriError::Prediction {
        stage,
        message: cause.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear_model::LinearRegression;
    use crate::preprocessing::StandardScaler;

    fn identity_scaler() -> StandardScaler {
        StandardScaler::from_params(vec![0.0; 5], vec![1.0; 5]).expect("valid params")
    }

    #[test]
    fn test_constant_model_under_identity_scaler() {
        let scaler = identity_scaler();
        let model = LinearRegression::from_params(vec![0.0; 4], 100.0).expect("valid params");
        let input = NutrientInput::new(10.0, 20.0, 5.0, 3.0).expect("valid input");

        let kcal = estimate_with(&scaler, &model, &input).expect("estimate");
        assert!((kcal - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_linear_model_under_identity_scaler() {
        // Model input order is [fat, carb, protein, sugars]: 2*fat + carb
        let scaler = identity_scaler();
        let model =
            LinearRegression::from_params(vec![2.0, 1.0, 0.0, 0.0], 0.0).expect("valid params");
        let input = NutrientInput::new(10.0, 20.0, 0.0, 0.0).expect("valid input");

        let kcal = estimate_with(&scaler, &model, &input).expect("estimate");
        assert!((kcal - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_third_model_feature_is_protein() {
        // A model reading only its 3rd feature must see protein (scaled-row
        // position 4), not sugars — the subset order swaps the two.
        let scaler = identity_scaler();
        let model =
            LinearRegression::from_params(vec![0.0, 0.0, 1.0, 0.0], 0.0).expect("valid params");
        let input = NutrientInput::new(0.0, 0.0, 7.0, 3.0).expect("valid input");

        let kcal = estimate_with(&scaler, &model, &input).expect("estimate");
        assert!((kcal - 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_placeholder_zeros_never_reach_result() {
        // Nonzero means on every non-calorie column; the inverse step must
        // still depend only on column-0 statistics and the prediction.
        let mean = vec![250.0, 5.0, 10.0, 2.0, 8.0];
        let std = vec![80.0, 2.0, 4.0, 1.0, 3.0];
        let scaler =
            StandardScaler::from_params(mean.clone(), std.clone()).expect("valid params");
        let model =
            LinearRegression::from_params(vec![1.0, 1.0, 1.0, 1.0], 0.5).expect("valid params");
        let input = NutrientInput::new(12.0, 30.0, 9.0, 4.0).expect("valid input");

        let kcal = estimate_with(&scaler, &model, &input).expect("estimate");

        // Direct arithmetic reconstruction of the column-0 inverse
        let row = FeatureVector::from_input(&input);
        let scaled = scaler.transform(row.as_row()).expect("transform");
        let prediction = model
            .predict(&model_features(&scaled).expect("subset"))
            .expect("predict");
        let expected = prediction * std[0] + mean[0];

        assert!(
            (kcal - expected).abs() < 1e-4,
            "pipeline {kcal} != reconstruction {expected}"
        );
    }

    #[test]
    fn test_determinism() {
        let scaler = StandardScaler::from_params(
            vec![250.0, 5.0, 10.0, 2.0, 8.0],
            vec![80.0, 2.0, 4.0, 1.0, 3.0],
        )
        .expect("valid params");
        let model =
            LinearRegression::from_params(vec![0.7, 1.3, -0.2, 0.4], 1.1).expect("valid params");
        let input = NutrientInput::new(11.0, 47.0, 6.5, 22.0).expect("valid input");

        let first = estimate_with(&scaler, &model, &input).expect("estimate");
        let second = estimate_with(&scaler, &model, &input).expect("estimate");
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_zero_input_is_finite() {
        let scaler = StandardScaler::from_params(
            vec![250.0, 5.0, 10.0, 2.0, 8.0],
            vec![80.0, 2.0, 4.0, 1.0, 3.0],
        )
        .expect("valid params");
        let model =
            LinearRegression::from_params(vec![0.7, 1.3, -0.2, 0.4], 1.1).expect("valid params");
        let input = NutrientInput::new(0.0, 0.0, 0.0, 0.0).expect("valid input");

        let kcal = estimate_with(&scaler, &model, &input).expect("estimate");
        assert!(kcal.is_finite());
    }

    #[test]
    fn test_schema_skew_surfaces_as_prediction_error() {
        // A 5-feature model slipped past pairing (estimate_with takes any
        // artifacts): predict must fail with the stage attached.
        let scaler = identity_scaler();
        let model = LinearRegression::from_params(vec![1.0; 5], 0.0).expect("valid params");
        let input = NutrientInput::new(1.0, 2.0, 3.0, 4.0).expect("valid input");

        let err = estimate_with(&scaler, &model, &input).unwrap_err();
        assert!(matches!(
            err,
            KaloriError::Prediction {
                stage: "predict",
                ..
            }
        ));
    }

    #[test]
    fn test_fat_column_stats_do_not_leak_into_result() {
        // Two scalers differing only in the fat column's statistics produce
        // different model inputs — but with a constant model the estimates
        // must agree exactly, proving the inverse step ignores column 1.
        let model = LinearRegression::from_params(vec![0.0; 4], 2.5).expect("valid params");
        let input = NutrientInput::new(10.0, 20.0, 5.0, 3.0).expect("valid input");

        let a = StandardScaler::from_params(
            vec![200.0, 5.0, 10.0, 2.0, 8.0],
            vec![60.0, 2.0, 4.0, 1.0, 3.0],
        )
        .expect("valid params");
        let b = StandardScaler::from_params(
            vec![200.0, 99.0, 10.0, 2.0, 8.0],
            vec![60.0, 17.0, 4.0, 1.0, 3.0],
        )
        .expect("valid params");

        let kcal_a = estimate_with(&a, &model, &input).expect("estimate");
        let kcal_b = estimate_with(&b, &model, &input).expect("estimate");
        assert_eq!(kcal_a.to_bits(), kcal_b.to_bits());
    }
}
