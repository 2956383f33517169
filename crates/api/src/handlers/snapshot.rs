//! Handlers for take snapshots: save, history, latest, and branch.
//!
//! Saving always appends; nothing here can modify or remove an existing
//! snapshot. Branching forks a historical snapshot into a brand-new take
//! and leaves the source take's history untouched.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use slate_core::error::CoreError;
use slate_core::types::DbId;
use slate_db::models::take_snapshot::{BranchRequest, CreateTakeSnapshot, SaveSnapshotRequest};
use slate_db::repositories::{TakeRepo, TakeSnapshotRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::take::find_take;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the history listing.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// POST /api/v1/takes/{take_id}/snapshots
///
/// Append a snapshot of the take's working state. Two identical saves
/// produce two distinct history rows.
pub async fn save(
    State(state): State<AppState>,
    Path(take_id): Path<DbId>,
    Json(input): Json<SaveSnapshotRequest>,
) -> AppResult<impl IntoResponse> {
    let take = find_take(&state.pool, take_id).await?;
    if take.shot_id != input.shot_id {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Take {take_id} belongs to shot {}, not shot {}",
            take.shot_id, input.shot_id
        ))));
    }

    let create = CreateTakeSnapshot {
        project_id: input.project_id,
        scene_id: input.scene_id,
        shot_id: input.shot_id,
        take_id,
        payload: input.payload,
        reason: input.reason,
        created_by: input.created_by,
    };

    let snapshot = TakeSnapshotRepo::save(&state.pool, &create).await?;

    tracing::info!(
        take_id,
        snapshot_id = snapshot.id,
        reason = %snapshot.reason,
        "Snapshot saved"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: snapshot })))
}

/// GET /api/v1/takes/{take_id}/snapshots
///
/// List the take's snapshot history, newest first, without payloads.
pub async fn list_history(
    State(state): State<AppState>,
    Path(take_id): Path<DbId>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<impl IntoResponse> {
    find_take(&state.pool, take_id).await?;

    let history = TakeSnapshotRepo::list_history(&state.pool, take_id, query.limit).await?;
    Ok(Json(DataResponse { data: history }))
}

/// GET /api/v1/takes/{take_id}/snapshots/latest
///
/// The take's most recent snapshot, or `null` if it has never been saved.
/// A never-saved take is an empty canvas, not an error.
pub async fn latest(
    State(state): State<AppState>,
    Path(take_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_take(&state.pool, take_id).await?;

    let snapshot = TakeSnapshotRepo::find_latest_for_take(&state.pool, take_id).await?;
    Ok(Json(DataResponse { data: snapshot }))
}

/// GET /api/v1/snapshots/{id}
///
/// Get a single snapshot by ID, payload included.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let snapshot = TakeSnapshotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Snapshot",
            id,
        }))?;

    Ok(Json(DataResponse { data: snapshot }))
}

/// POST /api/v1/snapshots/{id}/branch
///
/// Fork a new take from a historical snapshot. The response carries the
/// new take and its seed snapshot; the seed's `reason` records what
/// storage actually accepted.
pub async fn branch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<BranchRequest>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        slate_core::take::validate_take_name(name)?;
    }
    slate_core::snapshot::validate_created_by(&input.created_by)?;

    let branched = TakeRepo::branch_from_snapshot(
        &state.pool,
        id,
        input.name.as_deref(),
        &input.created_by,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Snapshot",
        id,
    }))?;

    tracing::info!(
        snapshot_id = id,
        new_take_id = branched.take.id,
        seed_snapshot_id = branched.snapshot.id,
        "Branched new take from snapshot"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: branched })))
}
