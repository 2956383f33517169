//! Note-body schema and projections for the append-only decision ledger.
//!
//! Ledger rows live in the `decision_notes` table; their JSONB bodies are
//! versioned, `kind`-tagged event documents defined here. Correction happens
//! by appending (a discard note cancels an earlier promotion note), never by
//! rewriting, so any "current" view is a pure function over the ordered
//! history. Readers skip bodies they cannot parse: a foreign or future note
//! kind must not break existing projections.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Schema constants
// ---------------------------------------------------------------------------

/// Current note-body schema version, stored in the `v` field.
pub const NOTE_SCHEMA_VERSION: i32 = 1;

/// The only parent type carrying decisions today.
pub const PARENT_TYPE_SHOT: &str = "shot";

/// `kind` tag for approval-lock notes; used by SQL filters and must stay in
/// sync with the serde tag on [`NoteEvent::ApprovalLock`].
pub const KIND_APPROVAL_LOCK: &str = "approval_lock";

// ---------------------------------------------------------------------------
// Note bodies
// ---------------------------------------------------------------------------

/// A versioned note body: `{"v": 1, "kind": "...", ...event fields}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteDocument {
    #[serde(rename = "v")]
    pub schema: i32,
    #[serde(flatten)]
    pub event: NoteEvent,
}

impl NoteDocument {
    /// Wrap an event in the current schema version.
    pub fn new(event: NoteEvent) -> Self {
        NoteDocument {
            schema: NOTE_SCHEMA_VERSION,
            event,
        }
    }
}

/// The events the ledger records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoteEvent {
    /// A shot decision was locked to a take.
    ApprovalLock {
        approved_take_id: DbId,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    /// A generated asset was promoted into the shot's working set.
    PromoteAsset {
        selection_number: i32,
        image_ref: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        take_id: Option<DbId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        node_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        prompt_snapshot: Option<serde_json::Value>,
    },
    /// An earlier promotion was cancelled. The promotion note stays in the
    /// ledger; this note hides it from the active projection.
    DiscardPromoteAsset {
        selection_id: DbId,
        reason: DiscardReason,
    },
}

/// Why a promotion was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    /// The user undid the promotion right after making it.
    Undo,
    /// The user removed the selection deliberately later on.
    Manual,
}

impl DiscardReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscardReason::Undo => "undo",
            DiscardReason::Manual => "manual",
        }
    }
}

/// Parse a raw JSONB body into a known note document.
///
/// Returns `None` for bodies that are missing the version tag, carry an
/// unknown `kind`, or do not match the event schema. Callers treat such rows
/// as opaque history and skip them.
pub fn parse_note_body(body: &serde_json::Value) -> Option<NoteDocument> {
    serde_json::from_value(body.clone()).ok()
}

// ---------------------------------------------------------------------------
// Selection projection
// ---------------------------------------------------------------------------

/// A ledger row as loaded from storage, oldest-first by `(created_at, id)`.
#[derive(Debug, Clone)]
pub struct LedgerRecord {
    pub id: DbId,
    pub created_at: Timestamp,
    pub body: serde_json::Value,
}

/// A promotion that has not been discarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveSelection {
    pub selection_id: DbId,
    pub selection_number: i32,
    pub image_ref: String,
    pub take_id: Option<DbId>,
    pub node_id: Option<String>,
    pub prompt_snapshot: Option<serde_json::Value>,
    pub promoted_at: Timestamp,
}

/// Project the active selections for one shot from its full note history.
///
/// Promotions enter in ledger order; a discard note removes the promotion it
/// names. Discards that name a selection twice, or one that never existed,
/// are inert. Unparseable bodies are skipped.
pub fn active_selections(records: &[LedgerRecord]) -> Vec<ActiveSelection> {
    let mut promoted: Vec<ActiveSelection> = Vec::new();
    let mut discarded: HashSet<DbId> = HashSet::new();

    for record in records {
        let Some(doc) = parse_note_body(&record.body) else {
            continue;
        };
        match doc.event {
            NoteEvent::PromoteAsset {
                selection_number,
                image_ref,
                take_id,
                node_id,
                prompt_snapshot,
            } => {
                promoted.push(ActiveSelection {
                    selection_id: record.id,
                    selection_number,
                    image_ref,
                    take_id,
                    node_id,
                    prompt_snapshot,
                    promoted_at: record.created_at,
                });
            }
            NoteEvent::DiscardPromoteAsset { selection_id, .. } => {
                discarded.insert(selection_id);
            }
            NoteEvent::ApprovalLock { .. } => {}
        }
    }

    promoted.retain(|s| !discarded.contains(&s.selection_id));
    promoted
}

/// Validate the image reference recorded with a promotion.
pub fn validate_image_ref(image_ref: &str) -> Result<(), crate::error::CoreError> {
    if image_ref.trim().is_empty() {
        return Err(crate::error::CoreError::Validation(
            "Selection image_ref must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(secs: u32) -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, secs).unwrap()
    }

    fn record(id: DbId, secs: u32, body: serde_json::Value) -> LedgerRecord {
        LedgerRecord {
            id,
            created_at: at(secs),
            body,
        }
    }

    fn promote_body(number: i32, image_ref: &str) -> serde_json::Value {
        serde_json::to_value(NoteDocument::new(NoteEvent::PromoteAsset {
            selection_number: number,
            image_ref: image_ref.to_string(),
            take_id: None,
            node_id: None,
            prompt_snapshot: None,
        }))
        .unwrap()
    }

    fn discard_body(selection_id: DbId) -> serde_json::Value {
        serde_json::to_value(NoteDocument::new(NoteEvent::DiscardPromoteAsset {
            selection_id,
            reason: DiscardReason::Undo,
        }))
        .unwrap()
    }

    // -- body shape ----------------------------------------------------------

    #[test]
    fn test_approval_lock_body_shape() {
        let body = serde_json::to_value(NoteDocument::new(NoteEvent::ApprovalLock {
            approved_take_id: 42,
            text: Some("locked".to_string()),
        }))
        .unwrap();

        assert_eq!(body["v"], json!(NOTE_SCHEMA_VERSION));
        assert_eq!(body["kind"], json!(KIND_APPROVAL_LOCK));
        assert_eq!(body["approved_take_id"], json!(42));
        assert_eq!(body["text"], json!("locked"));
    }

    #[test]
    fn test_optional_fields_omitted_when_absent() {
        let body = promote_body(1, "img://a");
        assert!(body.get("take_id").is_none());
        assert!(body.get("prompt_snapshot").is_none());
    }

    #[test]
    fn test_parse_known_body_roundtrips() {
        let doc = NoteDocument::new(NoteEvent::DiscardPromoteAsset {
            selection_id: 7,
            reason: DiscardReason::Manual,
        });
        let body = serde_json::to_value(&doc).unwrap();
        assert_eq!(parse_note_body(&body), Some(doc));
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        let body = json!({"v": 1, "kind": "render_finished", "job": 9});
        assert_eq!(parse_note_body(&body), None);
    }

    #[test]
    fn test_parse_rejects_untagged_body() {
        assert_eq!(parse_note_body(&json!({"text": "plain old note"})), None);
        assert_eq!(parse_note_body(&json!("not even an object")), None);
    }

    // -- projection ----------------------------------------------------------

    #[test]
    fn test_discard_hides_only_named_promotion() {
        let records = vec![
            record(1, 0, promote_body(1, "img://a")),
            record(2, 1, promote_body(2, "img://b")),
            record(3, 2, discard_body(1)),
        ];

        let active = active_selections(&records);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].selection_id, 2);
        assert_eq!(active[0].selection_number, 2);
        assert_eq!(active[0].image_ref, "img://b");
    }

    #[test]
    fn test_duplicate_and_unknown_discards_are_inert() {
        let records = vec![
            record(1, 0, promote_body(1, "img://a")),
            record(2, 1, discard_body(1)),
            record(3, 2, discard_body(1)),
            record(4, 3, discard_body(999)),
        ];
        assert!(active_selections(&records).is_empty());
    }

    #[test]
    fn test_projection_skips_foreign_bodies() {
        let records = vec![
            record(1, 0, json!({"v": 3, "kind": "from_the_future"})),
            record(2, 1, json!(null)),
            record(3, 2, promote_body(1, "img://a")),
        ];

        let active = active_selections(&records);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].selection_id, 3);
    }

    #[test]
    fn test_projection_preserves_ledger_order() {
        let records = vec![
            record(5, 0, promote_body(1, "img://a")),
            record(6, 1, promote_body(2, "img://b")),
            record(7, 2, promote_body(3, "img://c")),
        ];

        let numbers: Vec<i32> = active_selections(&records)
            .iter()
            .map(|s| s.selection_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_approval_notes_do_not_appear_as_selections() {
        let records = vec![record(
            1,
            0,
            serde_json::to_value(NoteDocument::new(NoteEvent::ApprovalLock {
                approved_take_id: 9,
                text: None,
            }))
            .unwrap(),
        )];
        assert!(active_selections(&records).is_empty());
    }

    #[test]
    fn test_validate_image_ref() {
        assert!(validate_image_ref("asset://renders/12.png").is_ok());
        assert!(validate_image_ref(" ").is_err());
    }
}
