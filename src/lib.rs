//! Kalori: food calorie estimation from macronutrient measurements.
//!
//! A fitted per-column scaler and a fitted regression model, both loaded
//! from `SafeTensors` artifacts, turn four macronutrient quantities into one
//! calorie estimate. The pipeline's two ordering contracts — the scaler's
//! 5-column layout and the model's reordered 4-feature subset — live in
//! [`features`] and are reproduced exactly by [`predictor`].
//!
//! # Quick Start
//!
//! ```
//! use kalori::prelude::*;
//! use kalori::predictor::estimate_with;
//!
//! // Identity scaling plus a constant model: the estimate is the intercept.
//! let scaler = StandardScaler::from_params(vec![0.0; 5], vec![1.0; 5]).unwrap();
//! let model = LinearRegression::from_params(vec![0.0; 4], 100.0).unwrap();
//!
//! let input = NutrientInput::new(10.0, 20.0, 5.0, 3.0).unwrap();
//! let kcal = estimate_with(&scaler, &model, &input).unwrap();
//! assert!((kcal - 100.0).abs() < 1e-6);
//! ```
//!
//! Production callers go through an [`artifacts::ArtifactStore`] instead,
//! which reads both artifact files once and caches the pair process-wide:
//!
//! ```no_run
//! use kalori::prelude::*;
//!
//! let store = ArtifactStore::new(ArtifactPaths::from_env());
//! let kcal = estimate_calories(&store, 10.0, 20.0, 5.0, 3.0)?;
//! # Ok::<(), kalori::error::KaloriError>(())
//! ```
//!
//! # Modules
//!
//! - [`artifacts`]: load-once artifact store and path configuration
//! - [`error`]: crate-wide error type
//! - [`features`]: nutrient inputs and the fitted column/feature orderings
//! - [`linear_model`]: linear regression inference
//! - [`predictor`]: the estimation pipeline
//! - [`preprocessing`]: fitted scalers (standardization, min-max)
//! - [`serialization`]: `SafeTensors` artifact format
//! - [`tracker`]: shell-side daily intake accounting
//! - [`traits`]: scaler/regressor capability seams

pub mod artifacts;
pub mod error;
pub mod features;
pub mod linear_model;
pub mod predictor;
pub mod prelude;
pub mod preprocessing;
pub mod serialization;
pub mod tracker;
pub mod traits;

pub use error::{KaloriError, Result};
pub use features::NutrientInput;
pub use predictor::estimate_calories;
pub use traits::{ColumnScaler, Regressor};
