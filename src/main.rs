use std::sync::Arc;

mod app;
mod assets;
mod auth;
mod config;
mod db;
mod error;
mod master_data;
#[cfg(test)]
mod memory;
mod pagination;
mod routes;
mod state;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "asset_tracker=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(AppConfig::from_env()?);
    let pool = db::connect(&config).await?;

    if let Err(e) = db::migrate(&pool).await {
        tracing::warn!(error = %e, "migrations failed; continuing");
    }

    let state = AppState::from_pool(config.clone(), pool);

    // a partially seeded store is left as is
    if let Err(e) = master_data::seed::seed_reference_data(&state).await {
        tracing::error!(error = ?e, "reference data initialization failed");
    }

    let app = app::build_app(state);
    app::serve(app, &config).await
}
