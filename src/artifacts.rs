//! Artifact loading and the process-wide cached (scaler, model) pair.
//!
//! A store reads the two artifact files at most once. The first outcome —
//! the loaded pair or the failure — is cached for the store's lifetime, so
//! recovering after a fixed deployment means constructing a fresh store
//! rather than mutating this one.

use crate::error::{KaloriError, Result};
use crate::features::{MODEL_FEATURES, SCALER_COLUMNS};
use crate::linear_model;
use crate::preprocessing;
use crate::traits::{ColumnScaler, Regressor};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info};

/// Default scaler artifact file name.
pub const DEFAULT_SCALER_FILE: &str = "scaler_kalori.safetensors";

/// Default model artifact file name.
pub const DEFAULT_MODEL_FILE: &str = "model_kalori.safetensors";

/// Environment variable overriding the scaler artifact path.
pub const SCALER_PATH_ENV: &str = "KALORI_SCALER_PATH";

/// Environment variable overriding the model artifact path.
pub const MODEL_PATH_ENV: &str = "KALORI_MODEL_PATH";

/// Locations of the two artifact files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    /// Scaler artifact file.
    pub scaler: PathBuf,
    /// Model artifact file.
    pub model: PathBuf,
}

impl ArtifactPaths {
    /// Creates paths from explicit locations.
    #[must_use]
    pub fn new(scaler: impl Into<PathBuf>, model: impl Into<PathBuf>) -> Self {
        Self {
            scaler: scaler.into(),
            model: model.into(),
        }
    }

    /// Resolves paths from `KALORI_SCALER_PATH`/`KALORI_MODEL_PATH`, falling
    /// back to the default file names in the working directory.
    #[must_use]
    pub fn from_env() -> Self {
        let scaler = std::env::var_os(SCALER_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_SCALER_FILE), PathBuf::from);
        let model = std::env::var_os(MODEL_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_MODEL_FILE), PathBuf::from);
        Self { scaler, model }
    }

    /// Default file names inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            scaler: dir.join(DEFAULT_SCALER_FILE),
            model: dir.join(DEFAULT_MODEL_FILE),
        }
    }
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::from_env()
    }
}

/// A schema-checked scaler/model pair ready for inference.
pub struct LoadedArtifacts {
    scaler: Box<dyn ColumnScaler + Send + Sync>,
    model: Box<dyn Regressor + Send + Sync>,
}

impl LoadedArtifacts {
    /// Pairs a scaler and model, enforcing the fitted-layout guard: the
    /// scaler must carry [`SCALER_COLUMNS`] columns and the model
    /// [`MODEL_FEATURES`] features.
    ///
    /// # Errors
    ///
    /// Returns [`KaloriError::SchemaMismatch`] naming the offending artifact.
    pub fn new(
        scaler: Box<dyn ColumnScaler + Send + Sync>,
        model: Box<dyn Regressor + Send + Sync>,
    ) -> Result<Self> {
        if scaler.n_columns() != SCALER_COLUMNS {
            return Err(KaloriError::SchemaMismatch {
                artifact: "scaler",
                expected: SCALER_COLUMNS,
                actual: scaler.n_columns(),
            });
        }
        if model.n_features() != MODEL_FEATURES {
            return Err(KaloriError::SchemaMismatch {
                artifact: "model",
                expected: MODEL_FEATURES,
                actual: model.n_features(),
            });
        }
        Ok(Self { scaler, model })
    }

    /// The fitted scaler.
    #[must_use]
    pub fn scaler(&self) -> &(dyn ColumnScaler + Send + Sync) {
        self.scaler.as_ref()
    }

    /// The fitted model.
    #[must_use]
    pub fn model(&self) -> &(dyn Regressor + Send + Sync) {
        self.model.as_ref()
    }
}

impl std::fmt::Debug for LoadedArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedArtifacts")
            .field("scaler_columns", &self.scaler.n_columns())
            .field("model_features", &self.model.n_features())
            .finish()
    }
}

/// Load-once store for the artifact pair.
///
/// Cache population is single-flight: concurrent first callers trigger
/// exactly one read of the files and all observe the same cached outcome.
///
/// # Examples
///
/// ```no_run
/// use kalori::prelude::*;
///
/// let store = ArtifactStore::new(ArtifactPaths::from_env());
/// let artifacts = store.load()?;
/// assert_eq!(artifacts.scaler().n_columns(), 5);
/// # Ok::<(), kalori::error::KaloriError>(())
/// ```
#[derive(Debug)]
pub struct ArtifactStore {
    paths: ArtifactPaths,
    cell: OnceLock<Result<Arc<LoadedArtifacts>>>,
}

impl ArtifactStore {
    /// Creates a store over the given artifact locations. No I/O happens
    /// until the first [`load`](Self::load).
    #[must_use]
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            cell: OnceLock::new(),
        }
    }

    /// The configured artifact locations.
    #[must_use]
    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Returns the cached artifact pair, reading the files on first call.
    ///
    /// # Errors
    ///
    /// Returns [`KaloriError::ArtifactNotFound`], [`KaloriError::ArtifactLoad`],
    /// or [`KaloriError::SchemaMismatch`]. The failure is cached alongside
    /// success; repeated calls do not retry the filesystem.
    pub fn load(&self) -> Result<Arc<LoadedArtifacts>> {
        self.cell
            .get_or_init(|| match self.read_artifacts() {
                Ok(artifacts) => {
                    info!(
                        scaler = %self.paths.scaler.display(),
                        model = %self.paths.model.display(),
                        "artifacts loaded"
                    );
                    Ok(Arc::new(artifacts))
                }
                Err(e) => {
                    error!(error = %e, "artifact load failed");
                    Err(e)
                }
            })
            .clone()
    }

    /// Like [`load`](Self::load), but folds any load failure into
    /// [`KaloriError::ArtifactsUnavailable`] — the per-request view an
    /// estimate call needs.
    ///
    /// # Errors
    ///
    /// Returns [`KaloriError::ArtifactsUnavailable`] carrying the cached
    /// load failure as its reason.
    pub fn artifacts(&self) -> Result<Arc<LoadedArtifacts>> {
        self.load().map_err(|e| KaloriError::ArtifactsUnavailable {
            reason: e.to_string(),
        })
    }

    fn read_artifacts(&self) -> Result<LoadedArtifacts> {
        let scaler = Self::read_scaler(&self.paths.scaler)?;
        let model = Self::read_model(&self.paths.model)?;
        LoadedArtifacts::new(scaler, model)
    }

    fn read_scaler(path: &Path) -> Result<Box<dyn ColumnScaler + Send + Sync>> {
        debug!(path = %path.display(), "loading scaler artifact");
        if !path.exists() {
            return Err(KaloriError::ArtifactNotFound {
                path: path.to_path_buf(),
            });
        }
        preprocessing::load_scaler(path).map_err(|message| KaloriError::ArtifactLoad {
            path: path.to_path_buf(),
            message,
        })
    }

    fn read_model(path: &Path) -> Result<Box<dyn Regressor + Send + Sync>> {
        debug!(path = %path.display(), "loading model artifact");
        if !path.exists() {
            return Err(KaloriError::ArtifactNotFound {
                path: path.to_path_buf(),
            });
        }
        linear_model::load_model(path).map_err(|message| KaloriError::ArtifactLoad {
            path: path.to_path_buf(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear_model::LinearRegression;
    use crate::preprocessing::StandardScaler;

    fn write_fixture_pair(dir: &Path) -> ArtifactPaths {
        let paths = ArtifactPaths::in_dir(dir);
        StandardScaler::from_params(vec![0.0; 5], vec![1.0; 5])
            .expect("valid params")
            .save_safetensors(&paths.scaler)
            .expect("save scaler");
        LinearRegression::from_params(vec![0.0; 4], 100.0)
            .expect("valid params")
            .save_safetensors(&paths.model)
            .expect("save model");
        paths
    }

    #[test]
    fn test_load_succeeds_with_fixture_pair() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = ArtifactStore::new(write_fixture_pair(dir.path()));

        let artifacts = store.load().expect("load should succeed");
        assert_eq!(artifacts.scaler().n_columns(), 5);
        assert_eq!(artifacts.model().n_features(), 4);
    }

    #[test]
    fn test_load_is_cached() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = ArtifactStore::new(write_fixture_pair(dir.path()));

        let first = store.load().expect("first load");
        // Deleting the files after the first load must not matter
        std::fs::remove_file(&store.paths().scaler).expect("remove scaler");
        std::fs::remove_file(&store.paths().model).expect("remove model");
        let second = store.load().expect("second load");

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_missing_scaler_names_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = ArtifactStore::new(ArtifactPaths::in_dir(dir.path()));

        let err = store.load().unwrap_err();
        match &err {
            KaloriError::ArtifactNotFound { path } => {
                assert!(path.ends_with(DEFAULT_SCALER_FILE));
            }
            other => panic!("expected ArtifactNotFound, got {other:?}"),
        }

        // The per-request view reports unavailability, carrying the cause
        let err = store.artifacts().unwrap_err();
        match err {
            KaloriError::ArtifactsUnavailable { reason } => {
                assert!(reason.contains("scaler_kalori"));
            }
            other => panic!("expected ArtifactsUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_model_reports_load_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let paths = write_fixture_pair(dir.path());
        std::fs::write(&paths.model, b"not a safetensors file").expect("overwrite model");

        let store = ArtifactStore::new(paths);
        let err = store.load().unwrap_err();
        assert!(matches!(err, KaloriError::ArtifactLoad { .. }));
        assert!(err.to_string().contains(DEFAULT_MODEL_FILE));
    }

    #[test]
    fn test_schema_guard_rejects_narrow_scaler() {
        let dir = tempfile::tempdir().expect("temp dir");
        let paths = write_fixture_pair(dir.path());
        StandardScaler::from_params(vec![0.0; 3], vec![1.0; 3])
            .expect("valid params")
            .save_safetensors(&paths.scaler)
            .expect("overwrite scaler");

        let store = ArtifactStore::new(paths);
        let err = store.load().unwrap_err();
        assert!(matches!(
            err,
            KaloriError::SchemaMismatch {
                artifact: "scaler",
                expected: 5,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_concurrent_first_load_shares_one_pair() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = ArtifactStore::new(write_fixture_pair(dir.path()));

        let pairs: Vec<Arc<LoadedArtifacts>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| store.load().expect("load should succeed")))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("thread should not panic"))
                .collect()
        });

        for pair in &pairs[1..] {
            assert!(Arc::ptr_eq(&pairs[0], pair));
        }
    }
}
