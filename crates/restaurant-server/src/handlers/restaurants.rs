//! Restaurant handlers

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use restaurant_core::{
    CreateRestaurantRequest, ListQuery, RatingRequest, RestaurantView, StatusResponse,
};
use tracing::info;

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRestaurantRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    info!("Create restaurant: {}", req.name);

    state
        .service
        .create(req)
        .await
        .map_err(|e| ApiError::from_service(e, "adding restaurant"))?;

    Ok(Json(StatusResponse::ok()))
}

pub async fn get(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<RestaurantView>, ApiError> {
    state
        .service
        .get(&name)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service(e, "fetching restaurant"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state
        .service
        .delete(&name)
        .await
        .map_err(|e| ApiError::from_service(e, "deleting restaurant"))?;

    Ok(Json(StatusResponse::ok()))
}

pub async fn rate(
    State(state): State<AppState>,
    Json(req): Json<RatingRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    state
        .service
        .rate(&req.name, req.rating)
        .await
        .map_err(|e| ApiError::from_service(e, "updating rating"))?;

    Ok(Json(StatusResponse::ok()))
}

pub async fn by_cuisine(
    State(state): State<AppState>,
    Path(cuisine): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<RestaurantView>>, ApiError> {
    state
        .service
        .top_by_cuisine(&cuisine, query.limit)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service(e, "fetching restaurants by cuisine"))
}

pub async fn by_region(
    State(state): State<AppState>,
    Path(region): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<RestaurantView>>, ApiError> {
    state
        .service
        .top_by_region(&region, None, query.limit)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service(e, "fetching restaurants by region"))
}

pub async fn by_region_and_cuisine(
    State(state): State<AppState>,
    Path((region, cuisine)): Path<(String, String)>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<RestaurantView>>, ApiError> {
    state
        .service
        .top_by_region(&region, Some(cuisine.as_str()), query.limit)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service(e, "fetching restaurants by region and cuisine"))
}
