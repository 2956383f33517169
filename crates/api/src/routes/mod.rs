pub mod health;
pub mod project;
pub mod scene;
pub mod shot;
pub mod snapshot;
pub mod take;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                    list, create
/// /projects/{id}                               get
/// /projects/{project_id}/scenes                list, create
///
/// /scenes/{id}                                 get
/// /scenes/{scene_id}/shots                     list, create
///
/// /shots/{id}                                  get
/// /shots/{shot_id}/takes                       list, create
/// /shots/{shot_id}/decision                    load (GET), lock (PUT), revoke (DELETE)
/// /shots/{shot_id}/notes                       full ledger history (GET)
/// /shots/{shot_id}/selections                  promote (POST)
/// /shots/{shot_id}/selections/active           active projection (GET)
/// /shots/{shot_id}/selections/{id}/discard     discard (POST)
///
/// /takes/{id}                                  get, update, soft-delete
/// /takes/{take_id}/snapshots                   save (POST), history (GET)
/// /takes/{take_id}/snapshots/latest            latest snapshot or null (GET)
///
/// /snapshots/{id}                              get
/// /snapshots/{id}/branch                       branch a new take (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/scenes", scene::router())
        .nest("/shots", shot::router())
        .nest("/takes", take::router())
        .nest("/snapshots", snapshot::router())
}
