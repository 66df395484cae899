//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use kalori::prelude::*;
//! ```

pub use crate::artifacts::{ArtifactPaths, ArtifactStore, LoadedArtifacts};
pub use crate::error::{KaloriError, Result};
pub use crate::features::NutrientInput;
pub use crate::linear_model::LinearRegression;
pub use crate::predictor::{estimate_calories, CaloriePredictor};
pub use crate::preprocessing::{MinMaxScaler, StandardScaler};
pub use crate::tracker::DailyTracker;
pub use crate::traits::{ColumnScaler, Regressor};
