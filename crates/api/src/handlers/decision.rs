//! Handlers for the shot decision lifecycle.
//!
//! Locking runs the in-memory state machine end to end: the shot's current
//! state is loaded, tentatively approved, and locked, and only the resulting
//! `LockDecision` reaches storage. A reload can therefore only ever observe
//! undecided or decided, never the grace window.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use slate_core::decision::DecisionView;
use slate_core::types::DbId;
use slate_db::models::decision_note::LockDecisionRequest;
use slate_db::repositories::DecisionRepo;

use crate::error::AppResult;
use crate::handlers::shot::ensure_shot_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the note history listing.
#[derive(Debug, Deserialize)]
pub struct NotesQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response payload for a revoke.
#[derive(Debug, Serialize)]
pub struct RevokeResult {
    /// Whether a decision reference was actually cleared.
    pub revoked: bool,
}

/// GET /api/v1/shots/{shot_id}/decision
///
/// The shot's decision state rebuilt from storage. Fails with a 500
/// `DATA_INTEGRITY` error if the store holds a decision reference without
/// its approval note.
pub async fn load(
    State(state): State<AppState>,
    Path(shot_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let decision = DecisionRepo::load(&state.pool, shot_id).await?;
    Ok(Json(DataResponse {
        data: DecisionView::from(decision),
    }))
}

/// PUT /api/v1/shots/{shot_id}/decision
///
/// Lock the shot's decision to a take. The reference update and the
/// approval note land in one transaction; a shot that is already decided
/// answers 409.
pub async fn lock(
    State(state): State<AppState>,
    Path(shot_id): Path<DbId>,
    Json(input): Json<LockDecisionRequest>,
) -> AppResult<impl IntoResponse> {
    let current = DecisionRepo::load(&state.pool, shot_id).await?;
    let lock = current
        .tentatively_approve(input.approved_take_id)?
        .lock(shot_id, input.project_id, input.text)?;

    DecisionRepo::persist(&state.pool, &lock).await?;

    tracing::info!(
        shot_id,
        approved_take_id = lock.approved_take_id,
        "Shot decision locked"
    );

    let decided = DecisionRepo::load(&state.pool, shot_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: DecisionView::from(decided),
        }),
    ))
}

/// DELETE /api/v1/shots/{shot_id}/decision
///
/// Revoke the shot's decision. The approval notes stay in the ledger;
/// revoking an undecided shot is a harmless no-op.
pub async fn revoke(
    State(state): State<AppState>,
    Path(shot_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_shot_exists(&state.pool, shot_id).await?;

    let revoked = DecisionRepo::revoke(&state.pool, shot_id).await?;
    if revoked {
        tracing::info!(shot_id, "Shot decision revoked");
    }

    Ok(Json(DataResponse {
        data: RevokeResult { revoked },
    }))
}

/// GET /api/v1/shots/{shot_id}/notes
///
/// The shot's full ledger history, newest first, bodies left raw.
pub async fn list_notes(
    State(state): State<AppState>,
    Path(shot_id): Path<DbId>,
    Query(query): Query<NotesQuery>,
) -> AppResult<impl IntoResponse> {
    ensure_shot_exists(&state.pool, shot_id).await?;

    let notes = DecisionRepo::list_notes(&state.pool, shot_id, query.limit, query.offset).await?;
    Ok(Json(DataResponse { data: notes }))
}
