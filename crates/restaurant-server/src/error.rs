//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use restaurant_core::{RestaurantError, StatusResponse};

/// Error returned by every handler, rendered as `{success: false, message}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Upstream failures are logged here and hidden behind a generic message
    pub fn from_service(err: RestaurantError, context: &str) -> Self {
        match err {
            RestaurantError::Conflict(_) => Self {
                status: StatusCode::CONFLICT,
                message: "Restaurant already exists".to_string(),
            },
            RestaurantError::NotFound(message) => Self {
                status: StatusCode::NOT_FOUND,
                message,
            },
            other => {
                tracing::error!("Error {}: {}", context, other);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: format!("Error {}", context),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(StatusResponse::failure(self.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let conflict =
            ApiError::from_service(RestaurantError::Conflict("R1".into()), "adding restaurant");
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        let missing = ApiError::from_service(
            RestaurantError::restaurant_not_found("R1"),
            "fetching restaurant",
        );
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.message, "Restaurant not found: R1");

        let upstream =
            ApiError::from_service(RestaurantError::Store("disk full".into()), "updating rating");
        assert_eq!(upstream.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upstream.message, "Error updating rating");
    }
}
