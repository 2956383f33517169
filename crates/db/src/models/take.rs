//! Take entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use slate_core::types::{DbId, Timestamp};

/// A take row from the `takes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Take {
    pub id: DbId,
    pub shot_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    /// Position among the shot's takes. Assigned once at insert and kept
    /// through soft deletion, so indexes are never reused.
    pub order_index: i32,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new take. The parent shot comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTake {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `draft` if omitted.
    pub status: Option<String>,
}

/// DTO for updating an existing take. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTake {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}
