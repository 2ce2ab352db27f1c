//! Liveness and service info

use crate::error::ApiError;
use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    restaurants: u64,
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let restaurants = state
        .service
        .count()
        .await
        .map_err(|e| ApiError::from_service(e, "counting restaurants"))?;

    Ok(Json(HealthResponse {
        status: "ok",
        restaurants,
    }))
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    version: &'static str,
    store: &'static str,
    cache: Option<&'static str>,
    use_cache: bool,
}

/// Which backends this instance was started with
pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION"),
        store: state.service.store_backend(),
        cache: state.service.cache_backend(),
        use_cache: state.service.cache_enabled(),
    })
}
