//! Repository for shot decisions: the `shots.approved_take_id` reference
//! plus its approval notes in the `decision_notes` ledger.
//!
//! Writes go through [`DecisionRepo::persist`], which takes a `LockDecision`
//! (only obtainable by locking the state machine) and updates the reference
//! and appends the note in one transaction. The reference and the note
//! therefore appear together or not at all.

use sqlx::types::Json;
use sqlx::PgPool;

use slate_core::decision::{ApprovalNote, DecisionState, LockDecision};
use slate_core::error::CoreError;
use slate_core::ledger::{
    parse_note_body, NoteDocument, NoteEvent, KIND_APPROVAL_LOCK, PARENT_TYPE_SHOT,
};
use slate_core::pagination::{
    clamp_limit, clamp_offset, DEFAULT_NOTE_LIMIT, MAX_NOTE_LIMIT,
};
use slate_core::types::DbId;

use crate::error::DbError;
use crate::models::decision_note::DecisionNote;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, parent_type, parent_id, body, created_at";

/// Provides persistence and projection for shot decisions.
pub struct DecisionRepo;

impl DecisionRepo {
    /// Write a locked decision: point the shot at its approved take and
    /// append the approval note, atomically.
    ///
    /// The take must be a live row belonging to the shot being decided.
    /// Every failure path rolls the whole transaction back, so no reader
    /// can ever observe the reference without its note or vice versa.
    pub async fn persist(
        pool: &PgPool,
        decision: &LockDecision,
    ) -> Result<DecisionNote, DbError> {
        let mut tx = pool.begin().await?;

        let take: Option<(DbId,)> =
            sqlx::query_as("SELECT shot_id FROM takes WHERE id = $1 AND deleted_at IS NULL")
                .bind(decision.approved_take_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((take_shot_id,)) = take else {
            return Err(DbError::Core(CoreError::NotFound {
                entity: "Take",
                id: decision.approved_take_id,
            }));
        };
        if take_shot_id != decision.shot_id {
            return Err(DbError::Core(CoreError::Validation(format!(
                "Take {} belongs to shot {take_shot_id}, not shot {}",
                decision.approved_take_id, decision.shot_id
            ))));
        }

        let updated = sqlx::query("UPDATE shots SET approved_take_id = $2 WHERE id = $1")
            .bind(decision.shot_id)
            .bind(decision.approved_take_id)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(DbError::Core(CoreError::NotFound {
                entity: "Shot",
                id: decision.shot_id,
            }));
        }

        let body = NoteDocument::new(NoteEvent::ApprovalLock {
            approved_take_id: decision.approved_take_id,
            text: decision.text.clone(),
        });
        let query = format!(
            "INSERT INTO decision_notes (project_id, parent_type, parent_id, body)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let note = sqlx::query_as::<_, DecisionNote>(&query)
            .bind(decision.project_id)
            .bind(PARENT_TYPE_SHOT)
            .bind(decision.shot_id)
            .bind(Json(body))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(note)
    }

    /// Rebuild a shot's decision state from storage.
    ///
    /// An unknown shot is `NotFound`; a shot whose decision reference has no
    /// surviving approval note is `Integrity` — the two must not be confused,
    /// one is an empty answer and the other a corrupted store.
    pub async fn load(pool: &PgPool, shot_id: DbId) -> Result<DecisionState, DbError> {
        let shot: Option<(Option<DbId>,)> =
            sqlx::query_as("SELECT approved_take_id FROM shots WHERE id = $1")
                .bind(shot_id)
                .fetch_optional(pool)
                .await?;
        let Some((approved_take_id,)) = shot else {
            return Err(DbError::Core(CoreError::NotFound {
                entity: "Shot",
                id: shot_id,
            }));
        };

        let query = format!(
            "SELECT {COLUMNS} FROM decision_notes
             WHERE parent_type = $1 AND parent_id = $2 AND body->>'kind' = $3
             ORDER BY created_at ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, DecisionNote>(&query)
            .bind(PARENT_TYPE_SHOT)
            .bind(shot_id)
            .bind(KIND_APPROVAL_LOCK)
            .fetch_all(pool)
            .await?;

        let notes = rows.iter().map(approval_note_from_row).collect();
        Ok(DecisionState::from_storage(shot_id, approved_take_id, notes)?)
    }

    /// Clear a shot's decision reference. The approval notes stay in the
    /// ledger. Returns `false` if the shot was not decided (or not found),
    /// so revoking twice is harmless.
    pub async fn revoke(pool: &PgPool, shot_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE shots SET approved_take_id = NULL
             WHERE id = $1 AND approved_take_id IS NOT NULL",
        )
        .bind(shot_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a shot's full note history (all kinds), newest first.
    pub async fn list_notes(
        pool: &PgPool,
        shot_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<DecisionNote>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_NOTE_LIMIT, MAX_NOTE_LIMIT);
        let offset = clamp_offset(offset);
        let query = format!(
            "SELECT {COLUMNS} FROM decision_notes
             WHERE parent_type = $1 AND parent_id = $2
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, DecisionNote>(&query)
            .bind(PARENT_TYPE_SHOT)
            .bind(shot_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}

/// View a ledger row as an approval note. Rows whose body no longer parses
/// still count as evidence of a decision, just without detail.
fn approval_note_from_row(note: &DecisionNote) -> ApprovalNote {
    let (approved_take_id, text) = match parse_note_body(&note.body) {
        Some(NoteDocument {
            event:
                NoteEvent::ApprovalLock {
                    approved_take_id,
                    text,
                },
            ..
        }) => (Some(approved_take_id), text),
        _ => (None, None),
    };
    ApprovalNote {
        note_id: note.id,
        approved_take_id,
        text,
        created_at: note.created_at,
    }
}
