//! Repository for the append-only `take_snapshots` table.
//!
//! Saving always inserts; there is no update path, and the table's trigger
//! would reject one anyway. "Latest" is purely a read-side question.

use sqlx::PgPool;
use slate_core::pagination::{clamp_limit, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
use slate_core::snapshot::{validate_created_by, validate_snapshot_ids, validate_snapshot_payload};
use slate_core::types::DbId;

use crate::error::DbError;
use crate::models::take_snapshot::{CreateTakeSnapshot, SnapshotHistoryEntry, TakeSnapshot};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, scene_id, shot_id, take_id, payload, reason, created_by, created_at";

/// Provides insert and read operations for take snapshots.
pub struct TakeSnapshotRepo;

impl TakeSnapshotRepo {
    /// Insert a snapshot, returning the stored row.
    ///
    /// The input is validated before anything touches the database: all four
    /// hierarchy ids must be positive, the payload must not be JSON `null`,
    /// and `created_by` must be non-blank. Identical consecutive payloads
    /// still produce distinct rows; the history records every save, not
    /// every change.
    pub async fn save(
        pool: &PgPool,
        input: &CreateTakeSnapshot,
    ) -> Result<TakeSnapshot, DbError> {
        validate_snapshot_ids(input.project_id, input.scene_id, input.shot_id, input.take_id)?;
        validate_snapshot_payload(&input.payload)?;
        validate_created_by(&input.created_by)?;

        let query = format!(
            "INSERT INTO take_snapshots
                (project_id, scene_id, shot_id, take_id, payload, reason, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let snapshot = sqlx::query_as::<_, TakeSnapshot>(&query)
            .bind(input.project_id)
            .bind(input.scene_id)
            .bind(input.shot_id)
            .bind(input.take_id)
            .bind(&input.payload)
            .bind(input.reason.as_str())
            .bind(&input.created_by)
            .fetch_one(pool)
            .await?;
        Ok(snapshot)
    }

    /// Find a snapshot by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TakeSnapshot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM take_snapshots WHERE id = $1");
        sqlx::query_as::<_, TakeSnapshot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The most recent snapshot for a take, or `None` if it has never been
    /// saved. Ties on `created_at` break toward the higher id, i.e. the
    /// later insert.
    pub async fn find_latest_for_take(
        pool: &PgPool,
        take_id: DbId,
    ) -> Result<Option<TakeSnapshot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM take_snapshots
             WHERE take_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, TakeSnapshot>(&query)
            .bind(take_id)
            .fetch_optional(pool)
            .await
    }

    /// List a take's snapshot history newest first, without payloads.
    pub async fn list_history(
        pool: &PgPool,
        take_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<SnapshotHistoryEntry>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT);
        let query = "SELECT id, reason, created_by, created_at
             FROM take_snapshots
             WHERE take_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2";
        sqlx::query_as::<_, SnapshotHistoryEntry>(query)
            .bind(take_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
