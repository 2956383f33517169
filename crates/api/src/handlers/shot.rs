//! Handlers for the `/shots` resource and scene-scoped shot listings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use slate_core::error::CoreError;
use slate_core::types::DbId;
use slate_db::models::shot::{CreateShot, Shot};
use slate_db::repositories::ShotRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::scene::ensure_scene_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/scenes/{scene_id}/shots
///
/// List a scene's shots, oldest first.
pub async fn list_by_scene(
    State(state): State<AppState>,
    Path(scene_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_scene_exists(&state.pool, scene_id).await?;

    let shots = ShotRepo::list_by_scene(&state.pool, scene_id).await?;
    Ok(Json(DataResponse { data: shots }))
}

/// POST /api/v1/scenes/{scene_id}/shots
///
/// Create a new shot under a scene.
pub async fn create(
    State(state): State<AppState>,
    Path(scene_id): Path<DbId>,
    Json(input): Json<CreateShot>,
) -> AppResult<impl IntoResponse> {
    ensure_scene_exists(&state.pool, scene_id).await?;

    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Shot name must not be empty".to_string(),
        ));
    }

    let shot = ShotRepo::create(&state.pool, scene_id, &input).await?;

    tracing::info!(scene_id, shot_id = shot.id, "Shot created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: shot })))
}

/// GET /api/v1/shots/{id}
///
/// Get a single shot by ID, including its decision reference.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let shot = find_shot(&state.pool, id).await?;
    Ok(Json(DataResponse { data: shot }))
}

/// Load a shot or fail with `NotFound`.
pub async fn find_shot(pool: &slate_db::DbPool, shot_id: DbId) -> Result<Shot, AppError> {
    ShotRepo::find_by_id(pool, shot_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Shot",
            id: shot_id,
        }))
}

/// Verify that a shot exists, returning `NotFound` otherwise.
pub async fn ensure_shot_exists(pool: &slate_db::DbPool, shot_id: DbId) -> Result<(), AppError> {
    find_shot(pool, shot_id).await?;
    Ok(())
}
