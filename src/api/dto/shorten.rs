//! DTOs for the link shortening endpoint.

use axum::{
    Json,
    extract::{FromRequest, Request},
    http::header,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::error::AppError;

/// Request to shorten a single URL.
///
/// Accepted either as JSON (`{"url": "..."}` with `Content-Type:
/// application/json`) or as the raw request body, in which case the whole
/// body, minus surrounding whitespace, is the URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The target URL. Absolute-URL checks happen in the service.
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,
}

impl<S> FromRequest<S> for ShortenRequest
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if is_json {
            let Json(payload) = Json::<ShortenRequest>::from_request(req, state)
                .await
                .map_err(|e| {
                    AppError::bad_request("Invalid JSON body", json!({ "reason": e.body_text() }))
                })?;
            return Ok(payload);
        }

        let body = String::from_request(req, state).await.map_err(|e| {
            AppError::bad_request("Invalid request body", json!({ "reason": e.body_text() }))
        })?;

        Ok(ShortenRequest {
            url: body.trim().to_string(),
        })
    }
}

/// The shortened link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub id: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
    pub short_url: String,
    pub stats_url: String,
    /// `false` when the target had already been shortened.
    pub is_new: bool,
}
