use std::net::SocketAddr;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use housecast::session::SessionStore;
use housecast::{cached_model, router, AnimationSet, AppState, Cli};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("housecast=info".parse()?))
        .init();

    let cli = Cli::parse();
    ensure!(cli.max_sessions > 0, "--max-sessions must be at least 1");
    let profile = cli
        .build_profile()
        .context("failed to build vocabulary for the selected variant")?;

    let model = cached_model(&cli.model_path).clone();
    if let Some(loaded) = model.model() {
        if loaded.encoding() != profile.expected_encoding {
            warn!(
                variant = %profile.variant,
                artifact = %loaded.encoding(),
                expected = %profile.expected_encoding,
                "artifact encoding differs from the variant's bundled model; using the artifact's"
            );
        }
        let unreachable = loaded.unreachable_features(&profile.vocabulary);
        if !unreachable.is_empty() {
            warn!(
                columns = ?unreachable,
                policy = ?loaded.missing_columns(),
                "artifact expects columns the encoder never produces"
            );
        }
    }

    let (splash_url, main_url) = cli.animation_sources();
    let animations = AnimationSet::fetch(splash_url, main_url, cli.animation_timeout()).await;

    let state = AppState::new(
        profile,
        model,
        animations,
        SessionStore::new(cli.max_sessions),
    );
    let app = router(state);

    let addr: SocketAddr = cli
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", cli.bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(variant = %cli.variant, "housecast listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server shutdown")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
