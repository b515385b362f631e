use std::sync::Arc;

use anyhow::Context;

mod api;
mod app;
mod auth;
mod config;
mod error;
mod profiles;
mod state;
mod store;
mod users;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("loading configuration")?;
    init_tracing(&config);

    let config = Arc::new(config);
    let (state, store) = AppState::init(config.clone()).await?;

    sqlx::migrate!("./migrations")
        .run(store.pool())
        .await
        .context("running migrations")?;

    let app = app::build_app(state);
    let served = app::serve(app, &config.http.host, config.http.port).await;

    store.pool().close().await;
    tracing::info!("database pool closed");
    served
}

fn init_tracing(config: &AppConfig) {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "eshop_user=debug,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
        || config.env.is_production();

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
    tracing::info!(env = ?config.env, "configuration loaded");
}
