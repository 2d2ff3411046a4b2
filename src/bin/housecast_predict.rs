use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use housecast::loader::DEFAULT_MODEL_PATH;
use housecast::{estimate, load_model, PredictionOutcome, PropertyRecord, Variant, VariantProfile};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Score a single property from the command line.
#[derive(Parser, Debug)]
#[command(
    name = "housecast-predict",
    about = "Estimate one house price with the same pipeline the form uses"
)]
struct Args {
    /// Model artifact to score with.
    #[arg(long, env = "HOUSECAST_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    model_path: PathBuf,

    /// Variant whose vocabulary and currency apply.
    #[arg(long, env = "HOUSECAST_VARIANT", value_enum, default_value_t = Variant::Classic)]
    variant: Variant,

    /// Optional JSON file overriding category lists.
    #[arg(long, env = "HOUSECAST_VOCABULARY_FILE")]
    vocabulary_file: Option<PathBuf>,

    /// Print the outcome as JSON instead of a headline.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Building class code (20-190).
    #[arg(long, default_value_t = 60)]
    subclass_code: i64,

    /// Zoning classification, e.g. RL or FV.
    #[arg(long, default_value = "RL")]
    zoning: String,

    /// Lot area in square feet (at least 1000).
    #[arg(long, default_value_t = 8000.0)]
    lot_area: f64,

    /// Lot configuration, e.g. Inside or Corner.
    #[arg(long, default_value = "Inside")]
    lot_config: String,

    /// Dwelling type, e.g. 1Fam or Duplex.
    #[arg(long, default_value = "1Fam")]
    building_type: String,

    /// Overall condition rating (1-10).
    #[arg(long, default_value_t = 5)]
    overall_condition: i64,

    /// Construction year (1800-2025).
    #[arg(long, default_value_t = 2000)]
    year_built: i64,

    /// Remodel year (1800-2025).
    #[arg(long, default_value_t = 2000)]
    year_remodeled: i64,

    /// Exterior covering material.
    #[arg(long, default_value = "VinylSd")]
    exterior_material: String,

    /// Type 2 finished basement area in square feet.
    #[arg(long, default_value_t = 0.0)]
    basement_finished_area_2: f64,

    /// Total basement area in square feet.
    #[arg(long, default_value_t = 800.0)]
    total_basement_area: f64,
}

impl Args {
    fn record(&self) -> PropertyRecord {
        PropertyRecord {
            subclass_code: self.subclass_code,
            zoning: self.zoning.clone(),
            lot_area: self.lot_area,
            lot_config: self.lot_config.clone(),
            building_type: self.building_type.clone(),
            overall_condition: self.overall_condition,
            year_built: self.year_built,
            year_remodeled: self.year_remodeled,
            exterior_material: self.exterior_material.clone(),
            basement_finished_area_2: self.basement_finished_area_2,
            total_basement_area: self.total_basement_area,
        }
        .clamped()
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("housecast=warn".parse()?))
        .init();

    let args = Args::parse();
    let mut profile = VariantProfile::new(args.variant);
    if let Some(path) = &args.vocabulary_file {
        profile
            .vocabulary
            .apply_file(path)
            .with_context(|| format!("failed to read vocabulary {}", path.display()))?;
    }

    let status = load_model(&args.model_path);
    let outcome = estimate(&args.record(), &status, &profile);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("failed to encode outcome")?
        );
    } else {
        println!("{}", outcome.headline());
    }

    match outcome {
        PredictionOutcome::Estimate { .. } => Ok(()),
        PredictionOutcome::ModelUnavailable { detail } => bail!("model unavailable: {detail}"),
        PredictionOutcome::Failed { detail } => bail!("{detail}"),
    }
}
