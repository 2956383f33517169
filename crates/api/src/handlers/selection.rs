//! Handlers for asset selection promotion and discard.
//!
//! Both writes append ledger notes; the active listing is a projection over
//! the shot's full note history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use slate_core::ledger::validate_image_ref;
use slate_core::types::DbId;
use slate_db::models::selection::{DiscardSelection, PromoteSelection};
use slate_db::repositories::SelectionRepo;

use crate::error::AppResult;
use crate::handlers::shot::ensure_shot_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/shots/{shot_id}/selections
///
/// Promote a generated asset into the shot's working set. The assigned
/// selection number is unique per shot and never recycled.
pub async fn promote(
    State(state): State<AppState>,
    Path(shot_id): Path<DbId>,
    Json(input): Json<PromoteSelection>,
) -> AppResult<impl IntoResponse> {
    ensure_shot_exists(&state.pool, shot_id).await?;
    validate_image_ref(&input.image_ref)?;

    let promoted = SelectionRepo::promote(&state.pool, shot_id, &input).await?;

    tracing::info!(
        shot_id,
        selection_id = promoted.selection_id,
        selection_number = promoted.selection_number,
        "Asset selection promoted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: promoted })))
}

/// POST /api/v1/shots/{shot_id}/selections/{id}/discard
///
/// Discard a promoted selection by appending a discard note. The original
/// promotion note stays in the ledger.
pub async fn discard(
    State(state): State<AppState>,
    Path((shot_id, selection_id)): Path<(DbId, DbId)>,
    Json(input): Json<DiscardSelection>,
) -> AppResult<impl IntoResponse> {
    ensure_shot_exists(&state.pool, shot_id).await?;

    let note = SelectionRepo::discard(&state.pool, shot_id, selection_id, &input).await?;

    tracing::info!(
        shot_id,
        selection_id,
        reason = input.reason.as_str(),
        "Asset selection discarded"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}

/// GET /api/v1/shots/{shot_id}/selections/active
///
/// The shot's currently active selections, in promotion order. An empty
/// list is a normal answer, not an error.
pub async fn list_active(
    State(state): State<AppState>,
    Path(shot_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_shot_exists(&state.pool, shot_id).await?;

    let selections = SelectionRepo::list_active(&state.pool, shot_id).await?;
    Ok(Json(DataResponse { data: selections }))
}
