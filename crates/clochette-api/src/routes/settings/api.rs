//! Settings API endpoints - JSON API

use axum::{extract::State, response::Json};
use clochette_config::Config;

use crate::AppState;

/// API: Effective configuration
pub async fn api_settings(State(state): State<AppState>) -> Json<Config> {
    Json(state.config.clone())
}
