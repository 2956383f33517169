//! The shot decision state machine.
//!
//! A shot is UNDECIDED until someone tentatively approves a take, which
//! opens a short GRACE window (the user can still cancel or retarget), and
//! only an explicit lock produces a DECIDED state. GRACE is purely an
//! in-memory phase: storage only ever sees the outcome of [`DecisionState::lock`],
//! so a crash during the window leaves the shot undecided.
//!
//! A decided shot always carries at least one approval note. Storage that
//! says "decided" without a surviving note is corrupt, and loading it fails
//! with [`CoreError::Integrity`] rather than guessing.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

/// Wire name for [`DecisionState::Undecided`].
pub const STATE_UNDECIDED: &str = "undecided";

/// Wire name for [`DecisionState::Grace`].
pub const STATE_GRACE: &str = "grace";

/// Wire name for [`DecisionState::Decided`].
pub const STATE_DECIDED: &str = "decided";

/// An approval-lock note as seen by the decision layer.
///
/// Fields other than the id and timestamp are best-effort: a note whose body
/// cannot be parsed still counts as evidence that a decision was recorded,
/// it just carries no detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalNote {
    pub note_id: DbId,
    pub approved_take_id: Option<DbId>,
    pub text: Option<String>,
    pub created_at: Timestamp,
}

/// Where a shot stands in its decision lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionState {
    /// No take has been chosen.
    Undecided,
    /// A take was tentatively approved; nothing has been persisted.
    Grace { pending_take_id: DbId },
    /// A take is locked in, backed by one or more approval notes
    /// (oldest first).
    Decided {
        approved_take_id: DbId,
        notes: Vec<ApprovalNote>,
    },
}

impl DecisionState {
    /// Rebuild the state from what storage holds for a shot.
    ///
    /// `approved_take_id` is the shot's decision reference; `notes` are its
    /// approval-lock notes oldest first. A reference without any note is a
    /// broken invariant and fails loudly. GRACE can never come back from
    /// storage because it is never written.
    pub fn from_storage(
        shot_id: DbId,
        approved_take_id: Option<DbId>,
        notes: Vec<ApprovalNote>,
    ) -> Result<DecisionState, CoreError> {
        match approved_take_id {
            None => Ok(DecisionState::Undecided),
            Some(take_id) => {
                if notes.is_empty() {
                    return Err(CoreError::Integrity(format!(
                        "Shot {shot_id} references approved take {take_id} \
                         but has no approval note"
                    )));
                }
                Ok(DecisionState::Decided {
                    approved_take_id: take_id,
                    notes,
                })
            }
        }
    }

    /// Tentatively approve a take, entering (or retargeting) the grace
    /// window. Rejected when the shot is already decided.
    pub fn tentatively_approve(self, take_id: DbId) -> Result<DecisionState, CoreError> {
        match self {
            DecisionState::Undecided | DecisionState::Grace { .. } => {
                Ok(DecisionState::Grace {
                    pending_take_id: take_id,
                })
            }
            DecisionState::Decided {
                approved_take_id, ..
            } => Err(CoreError::Conflict(format!(
                "Shot already has approved take {approved_take_id}; revoke it before approving another"
            ))),
        }
    }

    /// Abandon the grace window. Any other state passes through unchanged.
    pub fn cancel(self) -> DecisionState {
        match self {
            DecisionState::Grace { .. } => DecisionState::Undecided,
            other => other,
        }
    }

    /// Confirm the tentative approval, producing the only value the
    /// persistence layer accepts for writing a decision.
    pub fn lock(
        self,
        shot_id: DbId,
        project_id: DbId,
        text: Option<String>,
    ) -> Result<LockDecision, CoreError> {
        match self {
            DecisionState::Grace { pending_take_id } => Ok(LockDecision {
                shot_id,
                project_id,
                approved_take_id: pending_take_id,
                text,
            }),
            DecisionState::Undecided => Err(CoreError::Conflict(
                "No tentative approval to lock".to_string(),
            )),
            DecisionState::Decided {
                approved_take_id, ..
            } => Err(CoreError::Conflict(format!(
                "Shot already has approved take {approved_take_id}"
            ))),
        }
    }

    pub fn is_decided(&self) -> bool {
        matches!(self, DecisionState::Decided { .. })
    }
}

/// A confirmed decision, ready to persist.
///
/// Only [`DecisionState::lock`] produces one, which keeps half-finished
/// grace-window state out of the database.
#[derive(Debug, Clone)]
pub struct LockDecision {
    pub shot_id: DbId,
    pub project_id: DbId,
    pub approved_take_id: DbId,
    pub text: Option<String>,
}

// ---------------------------------------------------------------------------
// Wire view
// ---------------------------------------------------------------------------

/// Serializable snapshot of a decision state for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionView {
    pub state: &'static str,
    pub approved_take_id: Option<DbId>,
    pub notes: Vec<ApprovalNote>,
}

impl From<DecisionState> for DecisionView {
    fn from(state: DecisionState) -> Self {
        match state {
            DecisionState::Undecided => DecisionView {
                state: STATE_UNDECIDED,
                approved_take_id: None,
                notes: Vec::new(),
            },
            DecisionState::Grace { pending_take_id } => DecisionView {
                state: STATE_GRACE,
                approved_take_id: Some(pending_take_id),
                notes: Vec::new(),
            },
            DecisionState::Decided {
                approved_take_id,
                notes,
            } => DecisionView {
                state: STATE_DECIDED,
                approved_take_id: Some(approved_take_id),
                notes,
            },
        }
    }
}
