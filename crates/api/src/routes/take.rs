//! Route definitions for the `/takes` resource.
//!
//! Take-scoped snapshot routes live here too: saving always appends, and
//! history/latest are read-only views over the append-only store.

use axum::routing::get;
use axum::Router;

use crate::handlers::{snapshot, take};
use crate::state::AppState;

/// Routes mounted at `/takes`.
///
/// ```text
/// GET    /{id}                          -> get_by_id
/// PUT    /{id}                          -> update
/// DELETE /{id}                          -> delete (soft)
///
/// POST   /{take_id}/snapshots           -> save
/// GET    /{take_id}/snapshots           -> list_history
/// GET    /{take_id}/snapshots/latest    -> latest
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(take::get_by_id).put(take::update).delete(take::delete),
        )
        .route(
            "/{take_id}/snapshots",
            get(snapshot::list_history).post(snapshot::save),
        )
        .route("/{take_id}/snapshots/latest", get(snapshot::latest))
}
