//! Request and response bodies

use serde::{de, Deserialize, Deserializer, Serialize};
use std::num::IntErrorKind;

/// Body of `POST /restaurants`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub region: String,
    pub cuisine: String,
}

/// Body of `POST /restaurants/rating`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRequest {
    pub name: String,
    pub rating: f64,
}

/// Query string of the listing endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// Out-of-range integers saturate instead of failing; only non-numeric
    /// input is rejected
    #[serde(default, deserialize_with = "saturating_limit")]
    pub limit: Option<i64>,
}

fn saturating_limit<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    match raw.trim().parse::<i64>() {
        Ok(n) => Ok(Some(n)),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(Some(i64::MAX)),
            IntErrorKind::NegOverflow => Ok(Some(i64::MIN)),
            _ => Err(de::Error::custom(format!("invalid limit: {}", raw))),
        },
    }
}

/// Outcome of a mutation, or the body of a failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
