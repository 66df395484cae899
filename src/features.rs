//! Nutrient inputs and the fixed feature-column layout.
//!
//! Both artifact contracts live here. The scaler was fitted on the 5-column
//! order `[calories, fat, carb, sugars, protein]`; the model was fitted on
//! the 4-feature order `[fat, carb, protein, sugars]`. Neither ordering can
//! change without refitting the corresponding artifact.

use crate::error::{KaloriError, Result};
use serde::{Deserialize, Serialize};

/// Number of columns the scaler artifact was fitted on.
pub const SCALER_COLUMNS: usize = 5;

/// Number of features the model artifact was fitted on.
pub const MODEL_FEATURES: usize = 4;

/// Calories column (the prediction target).
pub const COL_CALORIES: usize = 0;
/// Fat column.
pub const COL_FAT: usize = 1;
/// Carbohydrate column.
pub const COL_CARB: usize = 2;
/// Sugars column.
pub const COL_SUGARS: usize = 3;
/// Protein column.
pub const COL_PROTEIN: usize = 4;

/// Four macronutrient measurements for one food item, in grams.
///
/// Values are validated once at construction: each must be finite and
/// non-negative. There is no upper bound; portion sanity is a shell concern.
///
/// # Examples
///
/// ```
/// use kalori::features::NutrientInput;
///
/// let input = NutrientInput::new(10.0, 20.0, 5.0, 3.0).unwrap();
/// assert_eq!(input.fat, 10.0);
///
/// assert!(NutrientInput::new(-1.0, 0.0, 0.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientInput {
    /// Fat (grams)
    pub fat: f32,
    /// Carbohydrate (grams)
    pub carb: f32,
    /// Protein (grams)
    pub protein: f32,
    /// Sugars (grams)
    pub sugars: f32,
}

impl NutrientInput {
    /// Creates a validated nutrient input.
    ///
    /// # Errors
    ///
    /// Returns [`KaloriError::InvalidInput`] if any value is negative, NaN,
    /// or infinite.
    pub fn new(fat: f32, carb: f32, protein: f32, sugars: f32) -> Result<Self> {
        check_nutrient("fat", fat)?;
        check_nutrient("carb", carb)?;
        check_nutrient("protein", protein)?;
        check_nutrient("sugars", sugars)?;
        Ok(Self {
            fat,
            carb,
            protein,
            sugars,
        })
    }
}

fn check_nutrient(field: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(KaloriError::InvalidInput { field, value });
    }
    Ok(())
}

/// A raw feature row in the scaler's fitted column order.
///
/// The calories slot is seeded with 0: the true value is the unknown being
/// predicted, and the placeholder only gives the row the shape the scaler
/// expects. Its scaled value is never consumed downstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f32; SCALER_COLUMNS]);

impl FeatureVector {
    /// Builds the 5-column row `[0, fat, carb, sugars, protein]` from a
    /// nutrient input.
    #[must_use]
    pub fn from_input(input: &NutrientInput) -> Self {
        let mut row = [0.0; SCALER_COLUMNS];
        row[COL_FAT] = input.fat;
        row[COL_CARB] = input.carb;
        row[COL_SUGARS] = input.sugars;
        row[COL_PROTEIN] = input.protein;
        Self(row)
    }

    /// Returns the row in fitted column order.
    #[must_use]
    pub fn as_row(&self) -> &[f32] {
        &self.0
    }
}

/// Extracts the model's input from a scaled row.
///
/// The model consumes `[fat, carb, protein, sugars]` — scaled-row positions
/// 1, 2, 4, 3. Protein and sugars are swapped relative to column order; this
/// is the model artifact's trained input contract.
///
/// # Errors
///
/// Returns an error if the scaled row is not exactly [`SCALER_COLUMNS`] wide.
pub fn model_features(scaled_row: &[f32]) -> Result<[f32; MODEL_FEATURES]> {
    if scaled_row.len() != SCALER_COLUMNS {
        return Err(KaloriError::DimensionMismatch {
            expected: SCALER_COLUMNS,
            actual: scaled_row.len(),
        });
    }
    Ok([
        scaled_row[COL_FAT],
        scaled_row[COL_CARB],
        scaled_row[COL_PROTEIN],
        scaled_row[COL_SUGARS],
    ])
}
