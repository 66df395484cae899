//! Linear regression inference over fitted coefficients.
//!
//! The model equation is `y = x · β + intercept`. Fitting lives with the
//! training pipeline that produced the artifact; this crate only evaluates
//! and (de)serializes fitted parameters.

use crate::error::{KaloriError, Result};
use crate::serialization::safetensors;
use crate::traits::Regressor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A fitted linear regression model.
///
/// # Examples
///
/// ```
/// use kalori::prelude::*;
///
/// // y = 2*x0 + x1
/// let model = LinearRegression::from_params(vec![2.0, 1.0], 0.0).unwrap();
/// let y = model.predict(&[10.0, 20.0]).unwrap();
/// assert!((y - 40.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Coefficients for features (excluding intercept).
    coefficients: Vec<f32>,
    /// Intercept (bias) term.
    intercept: f32,
}

impl LinearRegression {
    /// Creates a model from fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the coefficient vector is empty or any parameter
    /// is non-finite.
    pub fn from_params(coefficients: Vec<f32>, intercept: f32) -> Result<Self> {
        if coefficients.is_empty() {
            return Err("Model needs at least one coefficient".into());
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err("Model parameters must be finite".into());
        }
        Ok(Self {
            coefficients,
            intercept,
        })
    }

    /// Returns the coefficients (excluding intercept).
    #[must_use]
    pub fn coefficients(&self) -> &[f32] {
        &self.coefficients
    }

    /// Returns the intercept term.
    #[must_use]
    pub fn intercept(&self) -> f32 {
        self.intercept
    }

    /// Saves the model to a `SafeTensors` file.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn save_safetensors<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), String> {
        let mut tensors = BTreeMap::new();
        tensors.insert(
            "coefficients".to_string(),
            (self.coefficients.clone(), vec![self.coefficients.len()]),
        );
        tensors.insert("intercept".to_string(), (vec![self.intercept], vec![1]));
        safetensors::save_safetensors(path, &tensors)
    }

    /// Loads a model from a `SafeTensors` file.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the file lacks the expected
    /// `coefficients`/`intercept` tensors.
    pub fn load_safetensors<P: AsRef<Path>>(path: P) -> std::result::Result<Self, String> {
        let (metadata, raw_data) = safetensors::load_safetensors(path)?;

        let coef_meta = metadata
            .get("coefficients")
            .ok_or("Missing 'coefficients' tensor in SafeTensors file")?;
        let coefficients = safetensors::extract_tensor(&raw_data, coef_meta)?;

        let intercept_meta = metadata
            .get("intercept")
            .ok_or("Missing 'intercept' tensor in SafeTensors file")?;
        let intercept_data = safetensors::extract_tensor(&raw_data, intercept_meta)?;

        if intercept_data.len() != 1 {
            return Err(format!(
                "Expected intercept tensor to have 1 element, got {}",
                intercept_data.len()
            ));
        }

        Self::from_params(coefficients, intercept_data[0]).map_err(|e| e.to_string())
    }
}

impl Regressor for LinearRegression {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, features: &[f32]) -> Result<f32> {
        if features.len() != self.coefficients.len() {
            return Err(KaloriError::DimensionMismatch {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }

        let dot: f32 = features
            .iter()
            .zip(self.coefficients.iter())
            .map(|(x, c)| x * c)
            .sum();
        Ok(dot + self.intercept)
    }
}

/// Loads the regression model a `SafeTensors` artifact holds.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or decoded.
pub fn load_model<P: AsRef<Path>>(
    path: P,
) -> std::result::Result<Box<dyn Regressor + Send + Sync>, String> {
    Ok(Box::new(LinearRegression::load_safetensors(path)?))
}
