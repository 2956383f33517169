//! Route definitions for the `/projects` resource.
//!
//! Also nests project-scoped scene routes under `/projects/{project_id}/scenes`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{project, scene};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
///
/// GET    /{project_id}/scenes       -> list_by_project
/// POST   /{project_id}/scenes       -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/{id}", get(project::get_by_id))
        .route(
            "/{project_id}/scenes",
            get(scene::list_by_project).post(scene::create),
        )
}
