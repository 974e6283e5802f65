use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use healthboard_core::{CoreConfig, Feature, FeatureFlags, DEFAULT_DATA_DIR};

mod api;

/// Main entry point for the healthboard REST server
///
/// Resolves configuration once, builds the flag resolver and appointment cache, performs an
/// initial appointment load and serves the page's REST API.
///
/// # Environment Variables
/// - `HEALTHBOARD_REST_ADDR`: server address (default: "0.0.0.0:3000")
/// - `HEALTHBOARD_DATA_DIR`: directory holding `appointments.yaml` and `legacy_flags.yaml`
///   (default: "health_data")
/// - `HEALTHBOARD_FEATURES`: comma separated features (default: "live_capture,appointments")
///
/// # Errors
/// Returns an error if:
/// - the logging configuration cannot be initialised,
/// - the feature list names an unknown feature,
/// - the legacy flags file cannot be parsed, or
/// - the server address cannot be bound.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("healthboard_run=info".parse()?)
                .add_directive("healthboard_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("HEALTHBOARD_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let data_dir = std::env::var("HEALTHBOARD_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    let features = FeatureFlags::from_env_value(std::env::var("HEALTHBOARD_FEATURES").ok())?;

    let cfg = Arc::new(CoreConfig::new(PathBuf::from(data_dir), features)?);
    tracing::info!(
        "++ Using data dir {} (features: {})",
        cfg.data_dir().display(),
        features.enabled().join(",")
    );

    let state = api::AppState::build(cfg.clone())?;
    if features.is_enabled(Feature::Appointments) {
        if let Err(e) = state.initial_load().await {
            tracing::warn!("initial appointment load failed: {}", e);
        }
    }

    tracing::info!("++ Starting healthboard REST on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, api::router(state)).await?;

    Ok(())
}
