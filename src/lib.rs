#![warn(missing_docs)]
//! Core library for the housecast price estimation form.

#[cfg(feature = "debug_logs")]
#[macro_export]
// This allows use of the `eprintln!` macro via `debug_log!` macro.
macro_rules! debug_log {
        ($($arg:tt)*) => {
            eprintln!($($arg)*);
        };
    }
#[cfg(not(feature = "debug_logs"))]
#[macro_export]
// This effectively disables the `eprintln!` macro, effectively removing it from the code during
// compilation.
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub mod animation;
pub mod config;
pub mod currency;
pub mod encoder;
pub mod form;
pub mod loader;
pub mod model;
pub mod predictor;
pub mod record;
pub mod render;
pub mod server;
pub mod session;
pub mod variant;
pub mod vocabulary;

pub use animation::AnimationSet;
pub use config::Cli;
pub use currency::Currency;
pub use encoder::{encode, EncodedFeatureVector, EncodingStrategy, FeatureValue, MissingColumns};
pub use loader::{cached_model, load_model, LoadedModel, ModelStatus};
pub use model::{ModelArtifact, ModelError, PredictError, Regressor};
pub use predictor::{estimate, predict_price, PredictionFailure, PredictionOutcome};
pub use record::PropertyRecord;
pub use server::{router, AppState};
pub use session::{SessionStore, UiMode};
pub use variant::{Variant, VariantProfile};
pub use vocabulary::{CategoricalField, Vocabulary};
