//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::id_generator::is_well_formed_id;

/// Returns a link together with its click count.
///
/// # Endpoint
///
/// `GET /api/stats/{id}`
///
/// # Response
///
/// ```json
/// {
///   "id": "ab12_",
///   "target": "http://example.com",
///   "created_at": "2024-01-01T00:00:00Z",
///   "clicks": 3
/// }
/// ```
///
/// Clicks still queued in the click pipeline are not included yet.
///
/// # Errors
///
/// Returns 404 Not Found if the identifier is malformed or unknown.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    if !is_well_formed_id(&id) {
        return Err(AppError::not_found(
            "Statistics not found",
            json!({ "id": id }),
        ));
    }

    let stats = state.stats_service.get_stats(&id).await?;

    Ok(Json(stats.into()))
}
