//! Handlers for the `/takes` resource and shot-scoped take listings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use slate_core::error::CoreError;
use slate_core::take::{validate_take_name, validate_take_status};
use slate_core::types::DbId;
use slate_db::models::take::{CreateTake, Take, UpdateTake};
use slate_db::repositories::TakeRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::shot::ensure_shot_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/shots/{shot_id}/takes
///
/// List a shot's takes in order-index order. Soft-deleted takes are hidden.
pub async fn list_by_shot(
    State(state): State<AppState>,
    Path(shot_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_shot_exists(&state.pool, shot_id).await?;

    let takes = TakeRepo::list_by_shot(&state.pool, shot_id).await?;
    Ok(Json(DataResponse { data: takes }))
}

/// POST /api/v1/shots/{shot_id}/takes
///
/// Create a new take under a shot. The order index is assigned by storage.
pub async fn create(
    State(state): State<AppState>,
    Path(shot_id): Path<DbId>,
    Json(input): Json<CreateTake>,
) -> AppResult<impl IntoResponse> {
    ensure_shot_exists(&state.pool, shot_id).await?;

    validate_take_name(&input.name)?;
    if let Some(status) = &input.status {
        validate_take_status(status)?;
    }

    let take = TakeRepo::create(&state.pool, shot_id, &input).await?;

    tracing::info!(shot_id, take_id = take.id, "Take created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: take })))
}

/// GET /api/v1/takes/{id}
///
/// Get a single take by ID.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let take = find_take(&state.pool, id).await?;
    Ok(Json(DataResponse { data: take }))
}

/// PUT /api/v1/takes/{id}
///
/// Update a take's metadata. Only the supplied fields change; the content
/// history in `take_snapshots` is untouched.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTake>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_take_name(name)?;
    }
    if let Some(status) = &input.status {
        validate_take_status(status)?;
    }

    let take = TakeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Take", id }))?;

    tracing::info!(take_id = id, "Take updated");

    Ok(Json(DataResponse { data: take }))
}

/// DELETE /api/v1/takes/{id}
///
/// Soft-delete a take. Its snapshots stay in history and its order index
/// is never reused.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = TakeRepo::soft_delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Take", id }));
    }

    tracing::info!(take_id = id, "Take soft-deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Load a take or fail with `NotFound`.
pub async fn find_take(pool: &slate_db::DbPool, take_id: DbId) -> Result<Take, AppError> {
    TakeRepo::find_by_id(pool, take_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Take",
            id: take_id,
        }))
}
