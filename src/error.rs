//! Error types for kalori operations.
//!
//! Provides rich error context for library consumers: which artifact file
//! failed, at which pipeline stage a prediction broke, and why.

use std::fmt;
use std::path::PathBuf;

/// Main error type for kalori operations.
///
/// Artifact errors (`ArtifactNotFound`, `ArtifactLoad`, `SchemaMismatch`)
/// are setup problems surfaced at load time; `ArtifactsUnavailable` and
/// `Prediction` are what an estimate call can return afterwards.
///
/// # Examples
///
/// ```
/// use kalori::error::KaloriError;
///
/// let err = KaloriError::DimensionMismatch {
///     expected: 5,
///     actual: 3,
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum KaloriError {
    /// An artifact file is missing at load time.
    ArtifactNotFound {
        /// Path that was probed
        path: PathBuf,
    },

    /// An artifact file exists but could not be decoded.
    ArtifactLoad {
        /// Path of the offending file
        path: PathBuf,
        /// Underlying cause
        message: String,
    },

    /// An estimate was requested while no valid artifacts are cached.
    ArtifactsUnavailable {
        /// Why the cached load failed
        reason: String,
    },

    /// A loaded artifact does not match the expected column/feature layout.
    SchemaMismatch {
        /// Which artifact ("scaler" or "model")
        artifact: &'static str,
        /// Expected column/feature count
        expected: usize,
        /// Count the artifact actually carries
        actual: usize,
    },

    /// A nutrient value is negative or not a finite number.
    InvalidInput {
        /// Field name ("fat", "carb", "protein", "sugars")
        field: &'static str,
        /// Offending value
        value: f32,
    },

    /// Transform or predict failed on well-typed input.
    Prediction {
        /// Pipeline stage ("transform", "predict", "inverse_transform")
        stage: &'static str,
        /// Underlying cause
        message: String,
    },

    /// Row length doesn't match the fitted column count.
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for KaloriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KaloriError::ArtifactNotFound { path } => {
                write!(f, "Artifact file not found: {}", path.display())
            }
            KaloriError::ArtifactLoad { path, message } => {
                write!(f, "Failed to load artifact {}: {message}", path.display())
            }
            KaloriError::ArtifactsUnavailable { reason } => {
                write!(f, "Artifacts unavailable: {reason}")
            }
            KaloriError::SchemaMismatch {
                artifact,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Schema mismatch in {artifact} artifact: expected {expected} columns, got {actual}"
                )
            }
            KaloriError::InvalidInput { field, value } => {
                write!(
                    f,
                    "Invalid nutrient value: {field} = {value}, expected a finite value >= 0"
                )
            }
            KaloriError::Prediction { stage, message } => {
                write!(f, "Prediction failed during {stage}: {message}")
            }
            KaloriError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Row dimension mismatch: expected {expected}, got {actual}"
                )
            }
            KaloriError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for KaloriError {}

impl From<&str> for KaloriError {
    fn from(msg: &str) -> Self {
        KaloriError::Other(msg.to_string())
    }
}

impl From<String> for KaloriError {
    fn from(msg: String) -> Self {
        KaloriError::Other(msg)
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, KaloriError>;
