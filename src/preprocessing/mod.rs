//! Fitted scalers bridging raw nutrient rows and the model's input space.
//!
//! Both scalers here rescale each column independently with per-column
//! statistics, which is what lets the estimation pipeline reconstruct the
//! calorie column from a zero-seeded row (see [`crate::predictor`]).
//!
//! Training lives elsewhere; these types are built either from already
//! fitted parameters or from a `SafeTensors` artifact.
//!
//! # Example
//!
//! ```
//! use kalori::prelude::*;
//!
//! // z = (x - mean) / std, per column
//! let scaler = StandardScaler::from_params(vec![0.0, 10.0], vec![1.0, 2.0]).unwrap();
//! let scaled = scaler.transform(&[3.0, 14.0]).unwrap();
//! assert!((scaled[0] - 3.0).abs() < 1e-6);
//! assert!((scaled[1] - 2.0).abs() < 1e-6);
//! ```

use crate::error::{KaloriError, Result};
use crate::serialization::safetensors::{self, SafeTensorsMetadata};
use crate::traits::ColumnScaler;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Columns with spread below this are treated as constant and left unscaled.
const DEGENERATE_SPREAD: f32 = 1e-10;

/// Standardization scaler: `z = (x - mean) / std` per column.
///
/// Mirrors the statistics a standardization fit produces; construction from
/// parameters validates shape so every instance is usable for inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Mean of each column (from the original fit).
    mean: Vec<f32>,
    /// Standard deviation of each column (from the original fit).
    std: Vec<f32>,
}

impl StandardScaler {
    /// Creates a scaler from fitted per-column statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the vectors are empty, differ in length, or hold
    /// non-finite values.
    pub fn from_params(mean: Vec<f32>, std: Vec<f32>) -> Result<Self> {
        if mean.is_empty() {
            return Err("Scaler needs at least one column".into());
        }
        if mean.len() != std.len() {
            return Err(KaloriError::DimensionMismatch {
                expected: mean.len(),
                actual: std.len(),
            });
        }
        if mean.iter().chain(std.iter()).any(|v| !v.is_finite()) {
            return Err("Scaler statistics must be finite".into());
        }
        Ok(Self { mean, std })
    }

    /// Returns the mean of each column.
    #[must_use]
    pub fn mean(&self) -> &[f32] {
        &self.mean
    }

    /// Returns the standard deviation of each column.
    #[must_use]
    pub fn std(&self) -> &[f32] {
        &self.std
    }

    /// Saves the scaler to a `SafeTensors` file.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn save_safetensors<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), String> {
        let mut tensors = BTreeMap::new();
        tensors.insert("mean".to_string(), (self.mean.clone(), vec![self.mean.len()]));
        tensors.insert("std".to_string(), (self.std.clone(), vec![self.std.len()]));
        safetensors::save_safetensors(path, &tensors)
    }

    /// Loads a scaler from a `SafeTensors` file.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the file lacks the expected
    /// `mean`/`std` tensors.
    pub fn load_safetensors<P: AsRef<Path>>(path: P) -> std::result::Result<Self, String> {
        let (metadata, raw_data) = safetensors::load_safetensors(path)?;
        Self::from_tensors(&metadata, &raw_data)
    }

    fn from_tensors(
        metadata: &SafeTensorsMetadata,
        raw_data: &[u8],
    ) -> std::result::Result<Self, String> {
        let mean_meta = metadata
            .get("mean")
            .ok_or_else(|| "Missing 'mean' tensor in SafeTensors file".to_string())?;
        let mean = safetensors::extract_tensor(raw_data, mean_meta)?;

        let std_meta = metadata
            .get("std")
            .ok_or_else(|| "Missing 'std' tensor in SafeTensors file".to_string())?;
        let std = safetensors::extract_tensor(raw_data, std_meta)?;

        Self::from_params(mean, std).map_err(|e| e.to_string())
    }
}

impl ColumnScaler for StandardScaler {
    fn n_columns(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, row: &[f32]) -> Result<Vec<f32>> {
        if row.len() != self.mean.len() {
            return Err(KaloriError::DimensionMismatch {
                expected: self.mean.len(),
                actual: row.len(),
            });
        }

        Ok(row
            .iter()
            .enumerate()
            .map(|(j, &value)| {
                let centered = value - self.mean[j];
                if self.std[j] > DEGENERATE_SPREAD {
                    centered / self.std[j]
                } else {
                    centered
                }
            })
            .collect())
    }

    fn inverse_transform(&self, row: &[f32]) -> Result<Vec<f32>> {
        if row.len() != self.mean.len() {
            return Err(KaloriError::DimensionMismatch {
                expected: self.mean.len(),
                actual: row.len(),
            });
        }

        Ok(row
            .iter()
            .enumerate()
            .map(|(j, &value)| {
                let rescaled = if self.std[j] > DEGENERATE_SPREAD {
                    value * self.std[j]
                } else {
                    value
                };
                rescaled + self.mean[j]
            })
            .collect())
    }
}

/// Min-max scaler: maps each column from `[data_min, data_max]` to a target
/// range (default `[0, 1]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    /// Minimum of each column (from the original fit).
    data_min: Vec<f32>,
    /// Maximum of each column (from the original fit).
    data_max: Vec<f32>,
    /// Target minimum for scaling.
    feature_min: f32,
    /// Target maximum for scaling.
    feature_max: f32,
}

impl MinMaxScaler {
    /// Creates a scaler from fitted per-column bounds, targeting `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vectors are empty, differ in length, or hold
    /// non-finite values.
    pub fn from_params(data_min: Vec<f32>, data_max: Vec<f32>) -> Result<Self> {
        if data_min.is_empty() {
            return Err("Scaler needs at least one column".into());
        }
        if data_min.len() != data_max.len() {
            return Err(KaloriError::DimensionMismatch {
                expected: data_min.len(),
                actual: data_max.len(),
            });
        }
        if data_min
            .iter()
            .chain(data_max.iter())
            .any(|v| !v.is_finite())
        {
            return Err("Scaler statistics must be finite".into());
        }
        Ok(Self {
            data_min,
            data_max,
            feature_min: 0.0,
            feature_max: 1.0,
        })
    }

    /// Sets the target range for scaling.
    #[must_use]
    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.feature_min = min;
        self.feature_max = max;
        self
    }

    /// Returns the minimum of each column.
    #[must_use]
    pub fn data_min(&self) -> &[f32] {
        &self.data_min
    }

    /// Returns the maximum of each column.
    #[must_use]
    pub fn data_max(&self) -> &[f32] {
        &self.data_max
    }

    /// Saves the scaler to a `SafeTensors` file.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn save_safetensors<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), String> {
        let mut tensors = BTreeMap::new();
        tensors.insert(
            "data_min".to_string(),
            (self.data_min.clone(), vec![self.data_min.len()]),
        );
        tensors.insert(
            "data_max".to_string(),
            (self.data_max.clone(), vec![self.data_max.len()]),
        );
        tensors.insert(
            "feature_range".to_string(),
            (vec![self.feature_min, self.feature_max], vec![2]),
        );
        safetensors::save_safetensors(path, &tensors)
    }

    /// Loads a scaler from a `SafeTensors` file.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or the file lacks the expected
    /// `data_min`/`data_max` tensors.
    pub fn load_safetensors<P: AsRef<Path>>(path: P) -> std::result::Result<Self, String> {
        let (metadata, raw_data) = safetensors::load_safetensors(path)?;
        Self::from_tensors(&metadata, &raw_data)
    }

    fn from_tensors(
        metadata: &SafeTensorsMetadata,
        raw_data: &[u8],
    ) -> std::result::Result<Self, String> {
        let min_meta = metadata
            .get("data_min")
            .ok_or_else(|| "Missing 'data_min' tensor in SafeTensors file".to_string())?;
        let data_min = safetensors::extract_tensor(raw_data, min_meta)?;

        let max_meta = metadata
            .get("data_max")
            .ok_or_else(|| "Missing 'data_max' tensor in SafeTensors file".to_string())?;
        let data_max = safetensors::extract_tensor(raw_data, max_meta)?;

        let mut scaler = Self::from_params(data_min, data_max).map_err(|e| e.to_string())?;

        if let Some(range_meta) = metadata.get("feature_range") {
            let range = safetensors::extract_tensor(raw_data, range_meta)?;
            if range.len() != 2 {
                return Err(format!(
                    "Expected 'feature_range' tensor to have 2 elements, got {}",
                    range.len()
                ));
            }
            scaler = scaler.with_range(range[0], range[1]);
        }

        Ok(scaler)
    }
}

impl ColumnScaler for MinMaxScaler {
    fn n_columns(&self) -> usize {
        self.data_min.len()
    }

    fn transform(&self, row: &[f32]) -> Result<Vec<f32>> {
        if row.len() != self.data_min.len() {
            return Err(KaloriError::DimensionMismatch {
                expected: self.data_min.len(),
                actual: row.len(),
            });
        }

        let feature_range = self.feature_max - self.feature_min;
        Ok(row
            .iter()
            .enumerate()
            .map(|(j, &value)| {
                let data_range = self.data_max[j] - self.data_min[j];
                if data_range.abs() > DEGENERATE_SPREAD {
                    (value - self.data_min[j]) / data_range * feature_range + self.feature_min
                } else {
                    self.feature_min
                }
            })
            .collect())
    }

    fn inverse_transform(&self, row: &[f32]) -> Result<Vec<f32>> {
        if row.len() != self.data_min.len() {
            return Err(KaloriError::DimensionMismatch {
                expected: self.data_min.len(),
                actual: row.len(),
            });
        }

        let feature_range = self.feature_max - self.feature_min;
        if feature_range.abs() <= DEGENERATE_SPREAD {
            return Err("Degenerate target range, cannot invert".into());
        }

        Ok(row
            .iter()
            .enumerate()
            .map(|(j, &value)| {
                let data_range = self.data_max[j] - self.data_min[j];
                if data_range.abs() > DEGENERATE_SPREAD {
                    (value - self.feature_min) / feature_range * data_range + self.data_min[j]
                } else {
                    self.data_min[j]
                }
            })
            .collect())
    }
}

/// Loads whichever scaler layout a `SafeTensors` artifact holds.
///
/// Standardization artifacts carry `mean`/`std` tensors; min-max artifacts
/// carry `data_min`/`data_max`.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or matches neither layout.
pub fn load_scaler<P: AsRef<Path>>(
    path: P,
) -> std::result::Result<Box<dyn ColumnScaler + Send + Sync>, String> {
    let (metadata, raw_data) = safetensors::load_safetensors(path)?;

    if metadata.contains_key("mean") {
        Ok(Box::new(StandardScaler::from_tensors(&metadata, &raw_data)?))
    } else if metadata.contains_key("data_min") {
        Ok(Box::new(MinMaxScaler::from_tensors(&metadata, &raw_data)?))
    } else {
        Err(
            "Unrecognized scaler artifact: expected 'mean'/'std' or 'data_min'/'data_max' tensors"
                .to_string(),
        )
    }
}
