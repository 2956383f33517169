//! Scene entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use slate_core::types::{DbId, Timestamp};

/// A scene row from the `scenes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scene {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new scene. The parent project comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScene {
    pub name: String,
    pub description: Option<String>,
}
