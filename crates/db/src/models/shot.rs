//! Shot entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use slate_core::types::{DbId, Timestamp};

/// A shot row from the `shots` table.
///
/// `approved_take_id` is the decision reference: `NULL` means undecided.
/// It is only ever written through the decision repository so the paired
/// approval note cannot be skipped.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Shot {
    pub id: DbId,
    pub scene_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub approved_take_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new shot. The parent scene comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShot {
    pub name: String,
    pub description: Option<String>,
}
