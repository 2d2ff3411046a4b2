//! Loads the model artifact once per process and reports whether it is usable.

use crate::encoder::{producible_columns, EncodingStrategy, MissingColumns};
use crate::model::{ArtifactModel, ModelArtifact, ModelError, Regressor};
use crate::vocabulary::Vocabulary;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

/// Default artifact location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "model/house_price_model.json";

static MODEL_CACHE: OnceLock<ModelStatus> = OnceLock::new();

/// A model plus the input schema it was fit on.
pub struct LoadedModel {
    name: String,
    version: String,
    source: Option<PathBuf>,
    encoding: EncodingStrategy,
    features: Vec<String>,
    missing_columns: MissingColumns,
    regressor: Arc<dyn Regressor>,
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("source", &self.source)
            .field("encoding", &self.encoding)
            .field("features_len", &self.features.len())
            .field("missing_columns", &self.missing_columns)
            .finish()
    }
}

impl LoadedModel {
    /// Builds a model from a parsed artifact.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        let name = artifact.name.clone();
        let version = artifact.version.clone();
        let encoding = artifact.encoding;
        let features = artifact.features.clone();
        let missing_columns = artifact.missing_columns;
        let regressor = Arc::new(ArtifactModel::new(artifact)?);
        Ok(Self {
            name,
            version,
            source: None,
            encoding,
            features,
            missing_columns,
            regressor,
        })
    }

    /// Wraps an arbitrary regressor with an explicit input schema.
    pub fn with_regressor(
        encoding: EncodingStrategy,
        features: Vec<String>,
        missing_columns: MissingColumns,
        regressor: Arc<dyn Regressor>,
    ) -> Self {
        Self {
            name: String::from("custom"),
            version: String::new(),
            source: None,
            encoding,
            features,
            missing_columns,
            regressor,
        }
    }

    /// Reads, parses and validates the artifact at `path`.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(ModelError::Io)?;
        let mut model = Self::from_artifact(ModelArtifact::from_json(&raw)?)?;
        model.source = Some(path.to_path_buf());
        Ok(model)
    }

    /// Artifact name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Artifact version label.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Encoding the model's inputs need.
    pub fn encoding(&self) -> EncodingStrategy {
        self.encoding
    }

    /// Ordered training columns.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Column selection policy.
    pub fn missing_columns(&self) -> MissingColumns {
        self.missing_columns
    }

    /// The scoring backend.
    pub fn regressor(&self) -> &dyn Regressor {
        self.regressor.as_ref()
    }

    /// Model columns the encoder can never emit under `vocabulary`.
    pub fn unreachable_features(&self, vocabulary: &Vocabulary) -> Vec<&str> {
        let producible = producible_columns(self.encoding, vocabulary);
        self.features
            .iter()
            .filter(|feature| !producible.contains(*feature))
            .map(String::as_str)
            .collect()
    }
}

/// Outcome of the one-time model load.
#[derive(Clone, Debug)]
pub enum ModelStatus {
    /// The artifact loaded and validated.
    Loaded(Arc<LoadedModel>),
    /// The artifact is missing or unusable; the reason is shown to users.
    Unavailable(Arc<str>),
}

impl ModelStatus {
    /// Whether predictions can be served.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// The loaded model, if any.
    pub fn model(&self) -> Option<&Arc<LoadedModel>> {
        match self {
            Self::Loaded(model) => Some(model),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<LoadedModel> for ModelStatus {
    fn from(model: LoadedModel) -> Self {
        Self::Loaded(Arc::new(model))
    }
}

/// Loads the artifact at `path`, folding any failure into [`ModelStatus::Unavailable`].
pub fn load_model(path: &Path) -> ModelStatus {
    match LoadedModel::from_path(path) {
        Ok(model) => {
            info!(
                path = %path.display(),
                name = model.name(),
                version = model.version(),
                encoding = %model.encoding(),
                features = model.features().len(),
                "model loaded"
            );
            if model.encoding() == EncodingStrategy::Ordinal {
                warn!(
                    "ordinal artifact active: categorical columns are label-encoded per request \
                     and always encode to 0"
                );
            }
            model.into()
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "model unavailable");
            ModelStatus::Unavailable(Arc::from(err.to_string()))
        }
    }
}

/// Process-wide model, loaded from `path` on first call and cached afterwards.
///
/// Later calls return the first result regardless of `path`.
pub fn cached_model(path: &Path) -> &'static ModelStatus {
    MODEL_CACHE.get_or_init(|| load_model(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const ORDINAL_ARTIFACT: &str = r#"{
        "name": "toy",
        "version": "1",
        "encoding": "ordinal",
        "features": ["LotArea", "MSZoning", "GarageCars"],
        "estimator": { "type": "linear", "intercept": 5.0, "coefficients": [1.0, 1.0, 1.0] }
    }"#;

    #[test]
    fn loads_artifact_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(ORDINAL_ARTIFACT.as_bytes()).expect("write");

        let status = load_model(file.path());
        let model = status.model().expect("model loaded");
        assert_eq!(model.name(), "toy");
        assert_eq!(model.encoding(), EncodingStrategy::Ordinal);
        assert_eq!(model.regressor().n_features(), 3);
        assert_eq!(
            model.unreachable_features(&Vocabulary::with_exterior_count(6)),
            vec!["GarageCars"]
        );
    }

    #[test]
    fn missing_file_is_reported_not_raised() {
        let dir = tempfile::tempdir().expect("temp dir");
        let status = load_model(&dir.path().join("absent.json"));
        match status {
            ModelStatus::Unavailable(reason) => assert!(!reason.is_empty()),
            ModelStatus::Loaded(_) => panic!("absent artifact must not load"),
        }
    }

    #[test]
    fn undecodable_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"\x80\x04\x95pickle").expect("write");
        assert!(!load_model(file.path()).is_loaded());
    }

    #[test]
    fn cache_keeps_first_result() {
        let dir = tempfile::tempdir().expect("temp dir");
        let first = cached_model(&dir.path().join("missing.json"));
        let second = cached_model(Path::new(DEFAULT_MODEL_PATH));
        assert!(std::ptr::eq(first, second));
    }
}
