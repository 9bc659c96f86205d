//! Hearthware panel composition root.

#![forbid(unsafe_code)]

mod dto;
mod error;
mod handlers;
mod middleware;
mod panel_config;
mod panel_router;
mod panel_services;
mod state;

use hearthware_core::AppError;
use tracing::info;

use crate::panel_config::{PanelConfig, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = PanelConfig::load()?;
    let address = config.socket_address()?;
    let app_state = panel_services::build_app_state(&config).await?;
    let app = panel_router::build_router(app_state, config.frontend_url.as_str())?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(%address, "hearthware-panel listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("panel server failed: {error}")))
}
