//! Route definitions for the `/scenes` resource.
//!
//! Also nests scene-scoped shot routes under `/scenes/{scene_id}/shots`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{scene, shot};
use crate::state::AppState;

/// Routes mounted at `/scenes`.
///
/// ```text
/// GET    /{id}                  -> get_by_id
///
/// GET    /{scene_id}/shots      -> list_by_scene
/// POST   /{scene_id}/shots      -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(scene::get_by_id))
        .route(
            "/{scene_id}/shots",
            get(shot::list_by_scene).post(shot::create),
        )
}
