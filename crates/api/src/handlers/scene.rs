//! Handlers for the `/scenes` resource and project-scoped scene listings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use slate_core::error::CoreError;
use slate_core::types::DbId;
use slate_db::models::scene::CreateScene;
use slate_db::repositories::SceneRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::project::ensure_project_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/scenes
///
/// List a project's scenes, oldest first.
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;

    let scenes = SceneRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: scenes }))
}

/// POST /api/v1/projects/{project_id}/scenes
///
/// Create a new scene under a project.
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateScene>,
) -> AppResult<impl IntoResponse> {
    ensure_project_exists(&state.pool, project_id).await?;

    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Scene name must not be empty".to_string(),
        ));
    }

    let scene = SceneRepo::create(&state.pool, project_id, &input).await?;

    tracing::info!(project_id, scene_id = scene.id, "Scene created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: scene })))
}

/// GET /api/v1/scenes/{id}
///
/// Get a single scene by ID.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let scene = SceneRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Scene", id }))?;

    Ok(Json(DataResponse { data: scene }))
}

/// Verify that a scene exists, returning `NotFound` otherwise.
pub async fn ensure_scene_exists(pool: &slate_db::DbPool, scene_id: DbId) -> Result<(), AppError> {
    SceneRepo::find_by_id(pool, scene_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Scene",
            id: scene_id,
        }))?;
    Ok(())
}
