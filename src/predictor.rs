//! Encode → predict → format for a single submitted record.

use crate::encoder::{encode, EncodeError};
use crate::loader::{LoadedModel, ModelStatus};
use crate::model::PredictError;
use crate::record::PropertyRecord;
use crate::variant::VariantProfile;
use crate::vocabulary::Vocabulary;
use serde::Serialize;
use std::error::Error;
use std::fmt;
use tracing::{info, warn};

/// Headline shown when encoding or scoring fails.
pub const PREDICTION_FAILED: &str =
    "⚠️ Prediction failed. Please make sure your model and input format are correct.";

/// Result of one submission, ready for rendering.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionOutcome {
    /// The model produced a price.
    Estimate {
        /// Raw model output.
        price: f64,
        /// Currency-formatted price.
        display: String,
    },
    /// No model is loaded; prediction was skipped.
    ModelUnavailable {
        /// Why loading failed.
        detail: String,
    },
    /// Encoding or scoring failed.
    Failed {
        /// Underlying error text.
        detail: String,
    },
}

impl PredictionOutcome {
    /// User-facing headline for the outcome.
    pub fn headline(&self) -> String {
        match self {
            Self::Estimate { display, .. } => format!("🏷️ Estimated House Price: {display}"),
            Self::ModelUnavailable { detail } => format!("Model file not found: {detail}"),
            Self::Failed { .. } => PREDICTION_FAILED.to_string(),
        }
    }
}

/// Errors raised between a record and a price.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionFailure {
    /// The record could not be shaped into the model's columns.
    Encode(EncodeError),
    /// The model rejected the row or returned an unusable value.
    Predict(PredictError),
}

impl fmt::Display for PredictionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "encoding failed: {err}"),
            Self::Predict(err) => write!(f, "prediction failed: {err}"),
        }
    }
}

impl Error for PredictionFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Predict(err) => Some(err),
        }
    }
}

/// Scores one record against `model`.
pub fn predict_price(
    record: &PropertyRecord,
    model: &LoadedModel,
    vocabulary: &Vocabulary,
) -> Result<f64, PredictionFailure> {
    let encoded = encode(record, model.encoding(), vocabulary);
    let row: Vec<f64> = encoded
        .select(model.features(), model.missing_columns())
        .map_err(PredictionFailure::Encode)?
        .into_iter()
        .map(|value| value.as_f64())
        .collect();
    let scores = model
        .regressor()
        .predict(&[row])
        .map_err(PredictionFailure::Predict)?;
    let price = scores
        .first()
        .copied()
        .ok_or(PredictionFailure::Predict(PredictError::MissingOutput))?;
    if !price.is_finite() {
        return Err(PredictionFailure::Predict(PredictError::NonFiniteOutput(
            price,
        )));
    }
    Ok(price)
}

/// Runs a submission end to end, never propagating failures.
pub fn estimate(
    record: &PropertyRecord,
    status: &ModelStatus,
    profile: &VariantProfile,
) -> PredictionOutcome {
    let model = match status {
        ModelStatus::Loaded(model) => model,
        ModelStatus::Unavailable(reason) => {
            return PredictionOutcome::ModelUnavailable {
                detail: reason.to_string(),
            }
        }
    };
    match predict_price(record, model, &profile.vocabulary) {
        Ok(price) => {
            let display = profile.currency.format(price);
            info!(variant = %profile.variant, price, "estimate served");
            PredictionOutcome::Estimate { price, display }
        }
        Err(err) => {
            warn!(variant = %profile.variant, error = %err, "prediction failed");
            PredictionOutcome::Failed {
                detail: err.to_string(),
            }
        }
    }
}
