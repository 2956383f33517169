//! Route definitions for the `/shots` resource.
//!
//! Shots carry the decision surface: the decision state machine endpoints,
//! the raw ledger history, and the selection promotion/discard operations.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{decision, selection, shot, take};
use crate::state::AppState;

/// Routes mounted at `/shots`.
///
/// ```text
/// GET    /{id}                             -> get_by_id
///
/// GET    /{shot_id}/takes                  -> list_by_shot
/// POST   /{shot_id}/takes                  -> create
///
/// GET    /{shot_id}/decision               -> load
/// PUT    /{shot_id}/decision               -> lock
/// DELETE /{shot_id}/decision               -> revoke
/// GET    /{shot_id}/notes                  -> list_notes
///
/// POST   /{shot_id}/selections             -> promote
/// GET    /{shot_id}/selections/active      -> list_active
/// POST   /{shot_id}/selections/{id}/discard -> discard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(shot::get_by_id))
        .route(
            "/{shot_id}/takes",
            get(take::list_by_shot).post(take::create),
        )
        .route(
            "/{shot_id}/decision",
            get(decision::load)
                .put(decision::lock)
                .delete(decision::revoke),
        )
        .route("/{shot_id}/notes", get(decision::list_notes))
        .route("/{shot_id}/selections", post(selection::promote))
        .route("/{shot_id}/selections/active", get(selection::list_active))
        .route(
            "/{shot_id}/selections/{id}/discard",
            post(selection::discard),
        )
}
