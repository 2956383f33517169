//! Take status values, name validation, and branch naming.
//!
//! A take is one versioned attempt at a shot. Takes move through a small
//! status lifecycle and keep a per-shot ordering index assigned at insert
//! time and never reused, even after soft deletion.

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Freshly created take, still being worked on.
pub const STATUS_DRAFT: &str = "draft";

/// Take put forward for review as a possible answer to the shot.
pub const STATUS_CANDIDATE: &str = "candidate";

/// Take chosen as the shot's answer.
pub const STATUS_SELECTED: &str = "selected";

/// Take passed over during review.
pub const STATUS_REJECTED: &str = "rejected";

/// All valid take status values.
pub const TAKE_STATUSES: &[&str] = &[
    STATUS_DRAFT,
    STATUS_CANDIDATE,
    STATUS_SELECTED,
    STATUS_REJECTED,
];

/// Maximum allowed length for a take name.
pub const MAX_TAKE_NAME_LENGTH: usize = 100;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a take name: must be non-empty, trimmed, and within
/// [`MAX_TAKE_NAME_LENGTH`].
pub fn validate_take_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Take name must not be empty".to_string(),
        ));
    }
    if trimmed.len() != name.len() {
        return Err(CoreError::Validation(
            "Take name must not have leading or trailing whitespace".to_string(),
        ));
    }
    if name.len() > MAX_TAKE_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Take name must not exceed {MAX_TAKE_NAME_LENGTH} characters, got {}",
            name.len()
        )));
    }
    Ok(())
}

/// Validate that a status string is one of the accepted values.
pub fn validate_take_status(status: &str) -> Result<(), CoreError> {
    if TAKE_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid take status '{status}'. Must be one of: {}",
            TAKE_STATUSES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Branch naming
// ---------------------------------------------------------------------------

/// Default display name for a take branched from a snapshot, derived from
/// the source snapshot's capture time: `Take (from 14:32)`.
pub fn branch_display_name(snapshot_created_at: Timestamp) -> String {
    format!("Take (from {})", snapshot_created_at.format("%H:%M"))
}
