//! Model artifacts and the estimators they describe.
//!
//! An artifact is a JSON document naming the feature columns the estimator was fit on,
//! the encoding strategy its inputs need, and the estimator parameters themselves.

use crate::encoder::{EncodingStrategy, MissingColumns};
use serde::Deserialize;
use std::error::Error;
use std::fmt;

/// Anything that maps feature rows to scalar predictions.
pub trait Regressor: Send + Sync {
    /// Number of columns every row must carry.
    fn n_features(&self) -> usize;

    /// Scores each row, returning one value per row.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, PredictError>;
}

/// Deserialized model artifact.
#[derive(Clone, Debug, Deserialize)]
pub struct ModelArtifact {
    /// Human-readable model name.
    #[serde(default)]
    pub name: String,
    /// Free-form version label.
    #[serde(default)]
    pub version: String,
    /// Encoding the estimator's inputs were produced with.
    pub encoding: EncodingStrategy,
    /// Ordered training columns.
    pub features: Vec<String>,
    /// Treatment of columns the encoder cannot produce.
    #[serde(default)]
    pub missing_columns: MissingColumns,
    /// Estimator parameters.
    pub estimator: Estimator,
}

impl ModelArtifact {
    /// Parses and validates an artifact document.
    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let artifact: Self = serde_json::from_str(raw).map_err(ModelError::Parse)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Checks internal consistency between features and estimator parameters.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.features.is_empty() {
            return Err(ModelError::Invalid("artifact lists no features".to_string()));
        }
        self.estimator.validate(self.features.len())
    }
}

/// Supported estimator families.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    /// `intercept + Σ coefficient_i · x_i`.
    Linear(LinearModel),
    /// Ensemble of regression trees.
    TreeEnsemble(TreeEnsemble),
}

impl Estimator {
    fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        match self {
            Self::Linear(model) => model.validate(n_features),
            Self::TreeEnsemble(ensemble) => ensemble.validate(n_features),
        }
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        match self {
            Self::Linear(model) => model.predict_row(row),
            Self::TreeEnsemble(ensemble) => ensemble.predict_row(row),
        }
    }
}

/// Linear regression parameters.
#[derive(Clone, Debug, Deserialize)]
pub struct LinearModel {
    /// Bias term.
    pub intercept: f64,
    /// One weight per feature column.
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        if self.coefficients.len() != n_features {
            return Err(ModelError::Invalid(format!(
                "linear model has {} coefficients for {} features",
                self.coefficients.len(),
                n_features
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::Invalid(
                "linear model parameters must be finite".to_string(),
            ));
        }
        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(weight, value)| weight * value)
                .sum::<f64>()
    }
}

/// How per-tree outputs are combined.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Average of tree outputs (bagged forests).
    Mean,
    /// Scaled sum of tree outputs (boosted ensembles).
    Sum {
        /// Shrinkage applied to every tree.
        learning_rate: f64,
    },
}

/// Regression tree ensemble parameters.
#[derive(Clone, Debug, Deserialize)]
pub struct TreeEnsemble {
    /// Output combination rule.
    pub aggregation: Aggregation,
    /// Constant added to the combined output.
    #[serde(default)]
    pub base_score: f64,
    /// Member trees.
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("tree ensemble has no trees".to_string()));
        }
        if !self.base_score.is_finite() {
            return Err(ModelError::Invalid("base_score must be finite".to_string()));
        }
        if let Aggregation::Sum { learning_rate } = self.aggregation {
            if !learning_rate.is_finite() {
                return Err(ModelError::Invalid("learning_rate must be finite".to_string()));
            }
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(n_features)
                .map_err(|reason| ModelError::Invalid(format!("tree {idx}: {reason}")))?;
        }
        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.predict_row(row)).sum();
        let combined = match self.aggregation {
            Aggregation::Mean => total / self.trees.len() as f64,
            Aggregation::Sum { learning_rate } => total * learning_rate,
        };
        self.base_score + combined
    }
}

/// A single regression tree stored as a flat node array rooted at index 0.
#[derive(Clone, Debug, Deserialize)]
pub struct Tree {
    /// Nodes; children always sit at higher indices than their parent.
    pub nodes: Vec<Node>,
}

/// Tree node.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Routes rows with `row[feature] <= threshold` left, others right.
    Split {
        /// Feature column index.
        feature: usize,
        /// Split threshold.
        threshold: f64,
        /// Index of the left child.
        left: usize,
        /// Index of the right child.
        right: usize,
    },
    /// Terminal prediction.
    Leaf {
        /// Output value.
        value: f64,
    },
}

impl Tree {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(format!(
                            "node {idx} splits on feature {feature} of {n_features}"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {idx} has a non-finite threshold"));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("node {idx} points to invalid child {child}"));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("node {idx} has a non-finite leaf value"));
                    }
                }
            }
        }
        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

/// A validated artifact ready to score rows.
#[derive(Clone, Debug)]
pub struct ArtifactModel {
    artifact: ModelArtifact,
}

impl ArtifactModel {
    /// Wraps an artifact after validating it.
    pub fn new(artifact: ModelArtifact) -> Result<Self, ModelError> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    /// The underlying artifact description.
    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }
}

impl Regressor for ArtifactModel {
    fn n_features(&self) -> usize {
        self.artifact.features.len()
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, PredictError> {
        if rows.is_empty() {
            return Err(PredictError::EmptyBatch);
        }
        let expected = self.n_features();
        rows.iter()
            .map(|row| {
                if row.len() != expected {
                    return Err(PredictError::DimensionMismatch {
                        expected,
                        actual: row.len(),
                    });
                }
                if row.iter().any(|value| !value.is_finite()) {
                    return Err(PredictError::NonFiniteInput);
                }
                Ok(self.artifact.estimator.predict_row(row))
            })
            .collect()
    }
}

/// Errors raised while reading a model artifact.
#[derive(Debug)]
pub enum ModelError {
    /// The artifact file could not be read.
    Io(std::io::Error),
    /// The artifact is not valid JSON for the artifact schema.
    Parse(serde_json::Error),
    /// The artifact parsed but its parameters are inconsistent.
    Invalid(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Parse(err) => write!(f, "artifact is not a valid model document: {err}"),
            Self::Invalid(reason) => write!(f, "artifact is inconsistent: {reason}"),
        }
    }
}

impl Error for ModelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Errors raised while scoring rows.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictError {
    /// No rows were supplied.
    EmptyBatch,
    /// A row's width differs from the model's feature count.
    DimensionMismatch {
        /// Columns the model expects.
        expected: usize,
        /// Columns the row carried.
        actual: usize,
    },
    /// A row contained NaN or an infinity.
    NonFiniteInput,
    /// The estimator produced NaN or an infinity.
    NonFiniteOutput(f64),
    /// The estimator returned no value for the row.
    MissingOutput,
    /// Estimator-specific failure.
    Backend(String),
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBatch => write!(f, "no rows to score"),
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "row has {actual} features, model expects {expected}")
            }
            Self::NonFiniteInput => write!(f, "row contains a non-finite feature value"),
            Self::NonFiniteOutput(value) => write!(f, "model produced a non-finite value ({value})"),
            Self::MissingOutput => write!(f, "model returned no prediction"),
            Self::Backend(reason) => f.write_str(reason),
        }
    }
}

impl Error for PredictError {}
