//! Repository for selection promotions and discards in the decision ledger.
//!
//! A selection is a promotion note; discarding appends a counter-note
//! rather than touching the original. Selection numbers come from the
//! `selection_counters` table: the upsert-increment runs inside the
//! promotion transaction, so concurrent promotions serialize on the
//! shot's counter row and numbers are unique, monotonic, and never
//! recycled after a discard.

use sqlx::types::Json;
use sqlx::PgPool;

use slate_core::ledger::{
    active_selections, ActiveSelection, LedgerRecord, NoteDocument, NoteEvent, PARENT_TYPE_SHOT,
};
use slate_core::types::DbId;

use crate::models::decision_note::DecisionNote;
use crate::models::selection::{DiscardSelection, PromoteSelection, PromotedSelection};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, parent_type, parent_id, body, created_at";

/// Provides ledger operations for promoted selections.
pub struct SelectionRepo;

impl SelectionRepo {
    /// Promote an asset into a shot's working set, assigning the next
    /// selection number for that shot.
    pub async fn promote(
        pool: &PgPool,
        shot_id: DbId,
        input: &PromoteSelection,
    ) -> Result<PromotedSelection, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (selection_number,): (i32,) = sqlx::query_as(
            "INSERT INTO selection_counters (shot_id, last_number)
             VALUES ($1, 1)
             ON CONFLICT (shot_id)
             DO UPDATE SET last_number = selection_counters.last_number + 1
             RETURNING last_number",
        )
        .bind(shot_id)
        .fetch_one(&mut *tx)
        .await?;

        let body = NoteDocument::new(NoteEvent::PromoteAsset {
            selection_number,
            image_ref: input.image_ref.clone(),
            take_id: input.take_id,
            node_id: input.node_id.clone(),
            prompt_snapshot: input.prompt_snapshot.clone(),
        });
        let query = format!(
            "INSERT INTO decision_notes (project_id, parent_type, parent_id, body)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let note = sqlx::query_as::<_, DecisionNote>(&query)
            .bind(input.project_id)
            .bind(PARENT_TYPE_SHOT)
            .bind(shot_id)
            .bind(Json(body))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(PromotedSelection {
            selection_id: note.id,
            selection_number,
        })
    }

    /// Append a discard note for a selection. No validation that the
    /// selection exists or is still active: a stray discard is inert in
    /// the projection, and the ledger records what the user did either way.
    pub async fn discard(
        pool: &PgPool,
        shot_id: DbId,
        selection_id: DbId,
        input: &DiscardSelection,
    ) -> Result<DecisionNote, sqlx::Error> {
        let body = NoteDocument::new(NoteEvent::DiscardPromoteAsset {
            selection_id,
            reason: input.reason,
        });
        let query = format!(
            "INSERT INTO decision_notes (project_id, parent_type, parent_id, body)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DecisionNote>(&query)
            .bind(input.project_id)
            .bind(PARENT_TYPE_SHOT)
            .bind(shot_id)
            .bind(Json(body))
            .fetch_one(pool)
            .await
    }

    /// Project the shot's currently active selections from its full ledger.
    pub async fn list_active(
        pool: &PgPool,
        shot_id: DbId,
    ) -> Result<Vec<ActiveSelection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM decision_notes
             WHERE parent_type = $1 AND parent_id = $2
             ORDER BY created_at ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, DecisionNote>(&query)
            .bind(PARENT_TYPE_SHOT)
            .bind(shot_id)
            .fetch_all(pool)
            .await?;

        let records: Vec<LedgerRecord> = rows
            .into_iter()
            .map(|note| LedgerRecord {
                id: note.id,
                created_at: note.created_at,
                body: note.body,
            })
            .collect();
        Ok(active_selections(&records))
    }
}
