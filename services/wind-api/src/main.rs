//! Wind data query API service.
//!
//! Serves per-location wind-vector samples from persisted trixel indexes:
//! dataset discovery, decimated overviews, radius-bounded trixel lookups,
//! and batch per-trixel sample retrieval.

use anyhow::Result;
use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use clap::Parser;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use wind_api::handlers;
use wind_api::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "wind-api")]
#[command(about = "Wind sample query API over trixel indexes")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .json()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting wind data query API");

    // Load all persisted indexes before accepting traffic
    let state = Arc::new(AppState::new().await?);

    let app = Router::new()
        .route("/datasets", get(handlers::datasets_handler))
        .route("/simplified", get(handlers::simplified_handler))
        .route("/trixels-in-radius", get(handlers::trixels_in_radius_handler))
        .route(
            "/detailed-by-trixel-names",
            post(handlers::detailed_by_trixel_names_handler),
        )
        // Health and monitoring
        .route("/health", get(handlers::health_handler))
        .route("/ready", get(handlers::ready_handler))
        .route("/metrics", get(handlers::metrics_handler))
        // Admin
        .route("/admin/reload", post(handlers::reload_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = args.listen.parse()?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
