mod cli;
mod config;
mod db;
mod handlers;

use std::net::Ipv4Addr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use color_eyre::Result;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use handlers::{list_evaluations, submit_evaluation, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = cli::CliArgs::parse();
    args.apply_env_overrides();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("greenmap_server=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = config::init_server_config()?;
    let pool = db::create_database_pool(&config.database_url).await?;
    let state = Arc::new(AppState { pool });

    let app = Router::new()
        .route("/evaluate", post(submit_evaluation))
        .route("/evaluations/:green_id", get(list_evaluations))
        .layer(cors_layer(&config.cors_origin)?)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.port)).await?;
    info!(port = config.port, "evaluation store listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// A `*` origin allows everything; anything else must parse as a single
/// exact origin.
fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let layer = if origin == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let value = origin
            .parse::<HeaderValue>()
            .map_err(|_| color_eyre::eyre::eyre!("invalid CORS_ORIGIN: {origin}"))?;
        CorsLayer::new()
            .allow_origin(AllowOrigin::exact(value))
            .allow_methods(Any)
            .allow_headers(Any)
    };
    Ok(layer)
}
