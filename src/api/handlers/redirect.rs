//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::id_generator::is_well_formed_id;

/// Redirects a short identifier to its target.
///
/// # Endpoint
///
/// `GET /go.to/{id}`
///
/// # Click Tracking
///
/// After a successful lookup the identifier is queued on the click pipeline.
/// The response never waits for the counter update and a dropped click is
/// invisible to the client.
///
/// # Errors
///
/// Returns 404 Not Found if the identifier is malformed or unknown.
pub async fn redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    if !is_well_formed_id(&id) {
        debug!(id = %id, "Malformed identifier");
        return Err(AppError::not_found(
            "Short link not found",
            json!({ "id": id }),
        ));
    }

    let link = state.link_service.get_link(&id).await?;

    debug!(id = %link.id, target = %link.target, "Redirecting");
    state.click_sender.record(link.id);

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, link.target)]))
}
