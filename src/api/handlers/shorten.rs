//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::application::services::Shortened;
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL, reusing the existing identifier if the target is known.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "http://example.com" }
/// ```
///
/// A body without a JSON content type is taken as the URL itself:
///
/// ```bash
/// curl -X POST localhost:1234/api/shorten -d 'http://example.com'
/// ```
///
/// # Response
///
/// - **201 Created** for a new link, **200 OK** if the target was already shortened
/// - `Location: {base}/go.to/{id}`
/// - `Link: <{base}/api/stats/{id}>; rel="stats"`
///
/// ```json
/// {
///   "id": "ab12_",
///   "target": "http://example.com",
///   "created_at": "2024-01-01T00:00:00Z",
///   "short_url": "http://0.0.0.0:1234/go.to/ab12_",
///   "stats_url": "http://0.0.0.0:1234/api/stats/ab12_",
///   "is_new": true
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is missing or not a valid absolute URL.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: ShortenRequest,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let Shortened { link, is_new } = state.link_service.find_or_create(&payload.url).await?;

    let short_url = state.link_service.short_url(&state.base_url, &link.id);
    let stats_url = format!("{}/api/stats/{}", state.base_url, link.id);

    let status = if is_new {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    let headers = [
        (header::LOCATION, short_url.clone()),
        (header::LINK, format!("<{stats_url}>; rel=\"stats\"")),
    ];

    let body = ShortenResponse {
        id: link.id,
        target: link.target,
        created_at: link.created_at,
        short_url,
        stats_url,
        is_new,
    };

    Ok((status, headers, Json(body)))
}
