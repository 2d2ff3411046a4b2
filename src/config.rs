//! Command-line and environment configuration for the server.

use crate::animation::{DEFAULT_MAIN_ANIMATION, DEFAULT_SPLASH_ANIMATION};
use crate::loader::DEFAULT_MODEL_PATH;
use crate::session::DEFAULT_MAX_SESSIONS;
use crate::variant::{Variant, VariantProfile};
use crate::vocabulary::VocabularyError;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Server options.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "housecast",
    about = "Serve the house price estimation form over HTTP"
)]
pub struct Cli {
    /// Address to bind the HTTP server to (host:port).
    #[arg(long, env = "HOUSECAST_BIND", default_value = "127.0.0.1:8501")]
    pub bind: String,

    /// Model artifact loaded once at startup.
    #[arg(long, env = "HOUSECAST_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// Form variant to serve.
    #[arg(long, env = "HOUSECAST_VARIANT", value_enum, default_value_t = Variant::Classic)]
    pub variant: Variant,

    /// Optional JSON file overriding category lists, keyed by column name.
    #[arg(long, env = "HOUSECAST_VOCABULARY_FILE")]
    pub vocabulary_file: Option<PathBuf>,

    /// Sessions remembered before the least recently used one is dropped.
    #[arg(long, env = "HOUSECAST_MAX_SESSIONS", default_value_t = DEFAULT_MAX_SESSIONS)]
    pub max_sessions: usize,

    /// Lottie animation shown on the splash page.
    #[arg(long, env = "HOUSECAST_SPLASH_ANIMATION", default_value = DEFAULT_SPLASH_ANIMATION)]
    pub splash_animation_url: Url,

    /// Lottie animation shown beside the form header.
    #[arg(long, env = "HOUSECAST_MAIN_ANIMATION", default_value = DEFAULT_MAIN_ANIMATION)]
    pub main_animation_url: Url,

    /// Seconds before an animation download is abandoned.
    #[arg(long, env = "HOUSECAST_ANIMATION_TIMEOUT_SECS", default_value_t = 5)]
    pub animation_timeout_secs: u64,

    /// Skip animation downloads entirely.
    #[arg(long, default_value_t = false)]
    pub no_animations: bool,
}

impl Cli {
    /// Variant preset with any vocabulary override applied.
    pub fn build_profile(&self) -> Result<VariantProfile, VocabularyError> {
        let mut profile = VariantProfile::new(self.variant);
        if let Some(path) = &self.vocabulary_file {
            profile.vocabulary.apply_file(path)?;
        }
        Ok(profile)
    }

    /// Animation download timeout, at least one second.
    pub fn animation_timeout(&self) -> Duration {
        Duration::from_secs(self.animation_timeout_secs.max(1))
    }

    /// Animation sources to fetch, empty when downloads are disabled.
    pub fn animation_sources(&self) -> (Option<&Url>, Option<&Url>) {
        if self.no_animations {
            (None, None)
        } else {
            (Some(&self.splash_animation_url), Some(&self.main_animation_url))
        }
    }
}
