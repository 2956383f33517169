//! Repository for the `takes` table, including branch-from-snapshot.
//!
//! Takes are soft-deleted: `deleted_at` hides a row from reads but its
//! `order_index` slot stays occupied, which is what lets the unique
//! constraint guarantee indexes are never reused.

use sqlx::PgPool;
use slate_core::snapshot::SnapshotReason;
use slate_core::take::branch_display_name;
use slate_core::types::DbId;

use crate::models::take::{CreateTake, Take, UpdateTake};
use crate::models::take_snapshot::{BranchFromSnapshot, TakeSnapshot};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, shot_id, name, description, status, order_index, deleted_at, created_at, updated_at";

/// Snapshot columns used by the branch operation.
const SNAPSHOT_COLUMNS: &str =
    "id, project_id, scene_id, shot_id, take_id, payload, reason, created_by, created_at";

/// How many times an insert is retried when a concurrent writer grabs the
/// same order index. Collisions need two writers hitting one shot in the
/// same instant, so one or two retries clear them in practice.
const MAX_ORDER_INDEX_ATTEMPTS: u32 = 3;

/// Provides CRUD and branching operations for takes.
pub struct TakeRepo;

impl TakeRepo {
    // ── Standard CRUD ────────────────────────────────────────────────

    /// Insert a new take, assigning the next free order index for the shot.
    ///
    /// The index subselect runs inside the INSERT so two concurrent creates
    /// cannot read the same MAX; if they still collide on the unique
    /// constraint, the insert is retried with a fresh index.
    pub async fn create(
        pool: &PgPool,
        shot_id: DbId,
        input: &CreateTake,
    ) -> Result<Take, sqlx::Error> {
        let query = format!(
            "INSERT INTO takes (shot_id, name, description, status, order_index)
             VALUES (
                $1, $2, $3, COALESCE($4, 'draft'),
                (SELECT COALESCE(MAX(order_index), -1) + 1 FROM takes WHERE shot_id = $1)
             )
             RETURNING {COLUMNS}"
        );
        let mut attempts = MAX_ORDER_INDEX_ATTEMPTS;
        loop {
            let result = sqlx::query_as::<_, Take>(&query)
                .bind(shot_id)
                .bind(&input.name)
                .bind(&input.description)
                .bind(&input.status)
                .fetch_one(pool)
                .await;
            match result {
                Err(err) if attempts > 1 && is_order_index_conflict(&err) => {
                    attempts -= 1;
                    tracing::debug!(shot_id, "Order index taken by a concurrent insert, retrying");
                }
                other => return other,
            }
        }
    }

    /// Find a take by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Take>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM takes WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Take>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a shot's takes in creation order. Excludes soft-deleted rows.
    pub async fn list_by_shot(pool: &PgPool, shot_id: DbId) -> Result<Vec<Take>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM takes
             WHERE shot_id = $1 AND deleted_at IS NULL
             ORDER BY order_index ASC"
        );
        sqlx::query_as::<_, Take>(&query)
            .bind(shot_id)
            .fetch_all(pool)
            .await
    }

    /// Update a take. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTake,
    ) -> Result<Option<Take>, sqlx::Error> {
        let query = format!(
            "UPDATE takes SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                status = COALESCE($4, status)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Take>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a take. Returns `true` if a live row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE takes SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted take. Returns `true` if a row was revived.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE takes SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Branching ────────────────────────────────────────────────────

    /// Create a new take seeded from an existing snapshot.
    ///
    /// The new take lands in the snapshot's shot with the next order index
    /// and a fresh snapshot row whose payload is copied verbatim from the
    /// source; the source take and its history are untouched. Returns `None`
    /// if the snapshot does not exist.
    ///
    /// The seed snapshot is recorded with reason `restore_from_snapshot`;
    /// if storage refuses that reason, the whole transaction is retried once
    /// with the fallback reason so the branch itself never fails over a
    /// bookkeeping label.
    pub async fn branch_from_snapshot(
        pool: &PgPool,
        snapshot_id: DbId,
        name: Option<&str>,
        created_by: &str,
    ) -> Result<Option<BranchFromSnapshot>, sqlx::Error> {
        let mut reason = SnapshotReason::RestoreFromSnapshot;
        let mut attempts = MAX_ORDER_INDEX_ATTEMPTS;
        loop {
            let result = Self::branch_once(pool, snapshot_id, name, created_by, reason).await;
            match result {
                Err(err) if attempts > 1 && is_order_index_conflict(&err) => {
                    attempts -= 1;
                    tracing::debug!(
                        snapshot_id,
                        "Order index taken by a concurrent insert, retrying branch"
                    );
                }
                Err(err) if reason != SnapshotReason::FALLBACK && is_reason_check_violation(&err) => {
                    tracing::warn!(
                        snapshot_id,
                        rejected = reason.as_str(),
                        fallback = SnapshotReason::FALLBACK.as_str(),
                        "Storage rejected the seed snapshot reason, retrying with fallback"
                    );
                    reason = SnapshotReason::FALLBACK;
                }
                other => return other,
            }
        }
    }

    /// One attempt at the branch transaction: read the source snapshot,
    /// insert the take, insert the seed snapshot, commit. Any error rolls
    /// the whole attempt back, so a failed attempt leaves no trace.
    async fn branch_once(
        pool: &PgPool,
        snapshot_id: DbId,
        name: Option<&str>,
        created_by: &str,
        reason: SnapshotReason,
    ) -> Result<Option<BranchFromSnapshot>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {SNAPSHOT_COLUMNS} FROM take_snapshots WHERE id = $1");
        let source = sqlx::query_as::<_, TakeSnapshot>(&select)
            .bind(snapshot_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(source) = source else {
            return Ok(None);
        };

        let take_name = match name {
            Some(custom) => custom.to_string(),
            None => branch_display_name(source.created_at),
        };

        let insert_take = format!(
            "INSERT INTO takes (shot_id, name, status, order_index)
             VALUES (
                $1, $2, 'draft',
                (SELECT COALESCE(MAX(order_index), -1) + 1 FROM takes WHERE shot_id = $1)
             )
             RETURNING {COLUMNS}"
        );
        let take = sqlx::query_as::<_, Take>(&insert_take)
            .bind(source.shot_id)
            .bind(&take_name)
            .fetch_one(&mut *tx)
            .await?;

        let insert_snapshot = format!(
            "INSERT INTO take_snapshots
                (project_id, scene_id, shot_id, take_id, payload, reason, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {SNAPSHOT_COLUMNS}"
        );
        let snapshot = sqlx::query_as::<_, TakeSnapshot>(&insert_snapshot)
            .bind(source.project_id)
            .bind(source.scene_id)
            .bind(source.shot_id)
            .bind(take.id)
            .bind(&source.payload)
            .bind(reason.as_str())
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(BranchFromSnapshot { take, snapshot }))
    }
}

/// True when an insert lost the order-index race for its shot.
fn is_order_index_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some("uq_takes_shot_id_order_index")
        }
        _ => false,
    }
}

/// True when storage's CHECK constraint refused the snapshot reason.
fn is_reason_check_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23514")
                && db_err.constraint() == Some("ck_take_snapshots_reason")
        }
        _ => false,
    }
}
