//! Selection promotion/discard DTOs.
//!
//! Selections are not a table of their own: a selection *is* a promotion
//! note in `decision_notes`, identified by that note's id. These DTOs cover
//! the ledger operations around them.

use serde::{Deserialize, Serialize};
use slate_core::ledger::DiscardReason;
use slate_core::types::DbId;

/// Request body for promoting a generated asset into a shot's working set.
#[derive(Debug, Clone, Deserialize)]
pub struct PromoteSelection {
    pub project_id: Option<DbId>,
    pub image_ref: String,
    pub take_id: Option<DbId>,
    pub node_id: Option<String>,
    pub prompt_snapshot: Option<serde_json::Value>,
}

/// Request body for discarding a previously promoted selection.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscardSelection {
    pub project_id: Option<DbId>,
    pub reason: DiscardReason,
}

/// Outcome of a promotion: the ledger id of the new note and the shot-scoped
/// display number it was assigned.
#[derive(Debug, Clone, Serialize)]
pub struct PromotedSelection {
    pub selection_id: DbId,
    pub selection_number: i32,
}
