//! Decision note (ledger row) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use slate_core::types::{DbId, Timestamp};

/// A row from the append-only `decision_notes` table.
///
/// `body` is kept raw here; interpreting it is the job of
/// `slate_core::ledger`, and rows with foreign bodies must still load.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DecisionNote {
    pub id: DbId,
    pub project_id: Option<DbId>,
    pub parent_type: String,
    pub parent_id: DbId,
    pub body: serde_json::Value,
    pub created_at: Timestamp,
}

/// Request body for locking a shot decision. The shot comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct LockDecisionRequest {
    pub project_id: DbId,
    pub approved_take_id: DbId,
    pub text: Option<String>,
}
