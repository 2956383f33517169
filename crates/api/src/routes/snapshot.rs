//! Route definitions for the `/snapshots` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::snapshot;
use crate::state::AppState;

/// Routes mounted at `/snapshots`.
///
/// ```text
/// GET    /{id}           -> get_by_id
/// POST   /{id}/branch    -> branch
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(snapshot::get_by_id))
        .route("/{id}/branch", post(snapshot::branch))
}
