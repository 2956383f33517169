//! Take snapshot models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use slate_core::snapshot::SnapshotReason;
use slate_core::types::{DbId, Timestamp};

use crate::models::take::Take;

/// A row from the `take_snapshots` table. Immutable once written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TakeSnapshot {
    pub id: DbId,
    pub project_id: DbId,
    pub scene_id: DbId,
    pub shot_id: DbId,
    pub take_id: DbId,
    /// Full working state of the take at capture time, opaque to this layer.
    pub payload: serde_json::Value,
    pub reason: String,
    pub created_by: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTakeSnapshot {
    pub project_id: DbId,
    pub scene_id: DbId,
    pub shot_id: DbId,
    pub take_id: DbId,
    pub payload: serde_json::Value,
    pub reason: SnapshotReason,
    pub created_by: String,
}

/// Request body for the save-snapshot endpoint. The take comes from the
/// route; the body carries the rest of the identifying ids.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveSnapshotRequest {
    pub project_id: DbId,
    pub scene_id: DbId,
    pub shot_id: DbId,
    pub payload: serde_json::Value,
    pub reason: SnapshotReason,
    pub created_by: String,
}

/// Request body for branching a new take off a snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchRequest {
    /// Optional explicit name; defaults to one derived from the snapshot's
    /// capture time.
    pub name: Option<String>,
    pub created_by: String,
}

/// Compact history listing entry; omits the payload on purpose.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SnapshotHistoryEntry {
    pub id: DbId,
    pub reason: String,
    pub created_by: String,
    pub created_at: Timestamp,
}

/// Result of branching a take from a snapshot: the new take plus its seed
/// snapshot (whose `reason` records what storage actually accepted).
#[derive(Debug, Clone, Serialize)]
pub struct BranchFromSnapshot {
    pub take: Take,
    pub snapshot: TakeSnapshot,
}
