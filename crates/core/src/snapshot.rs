//! Snapshot reasons and save-time validation.
//!
//! A snapshot is an immutable capture of a take's full working state. Every
//! snapshot records why it was taken; the reason vocabulary is closed and
//! mirrored by a CHECK constraint in storage.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Reasons
// ---------------------------------------------------------------------------

/// Why a snapshot was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotReason {
    /// User explicitly saved.
    ManualSave,
    /// Capture taken as part of publishing a take.
    Publish,
    /// Automatic periodic capture.
    Checkpoint,
    /// Seed copied from another take during duplication.
    DuplicateSeed,
    /// Seed written for a take branched from an older snapshot.
    RestoreFromSnapshot,
}

impl SnapshotReason {
    /// Reason recorded when a more specific one is refused by storage.
    pub const FALLBACK: SnapshotReason = SnapshotReason::ManualSave;

    /// The stable string form stored in the `reason` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotReason::ManualSave => "manual_save",
            SnapshotReason::Publish => "publish",
            SnapshotReason::Checkpoint => "checkpoint",
            SnapshotReason::DuplicateSeed => "duplicate_seed",
            SnapshotReason::RestoreFromSnapshot => "restore_from_snapshot",
        }
    }
}

impl std::fmt::Display for SnapshotReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All valid reason strings, in the order the storage CHECK lists them.
pub const SNAPSHOT_REASONS: &[&str] = &[
    "manual_save",
    "publish",
    "checkpoint",
    "duplicate_seed",
    "restore_from_snapshot",
];

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate the four identifying ids a snapshot must carry.
pub fn validate_snapshot_ids(
    project_id: DbId,
    scene_id: DbId,
    shot_id: DbId,
    take_id: DbId,
) -> Result<(), CoreError> {
    for (field, id) in [
        ("project_id", project_id),
        ("scene_id", scene_id),
        ("shot_id", shot_id),
        ("take_id", take_id),
    ] {
        if id <= 0 {
            return Err(CoreError::Validation(format!(
                "Snapshot {field} must be a positive id, got {id}"
            )));
        }
    }
    Ok(())
}

/// Validate a snapshot payload.
///
/// An empty object, empty array, or empty string is a legitimate working
/// state and passes. Only an absent payload (JSON `null`) is rejected.
pub fn validate_snapshot_payload(payload: &serde_json::Value) -> Result<(), CoreError> {
    if payload.is_null() {
        return Err(CoreError::Validation(
            "Snapshot payload must be present (empty object/array/string are allowed, null is not)"
                .to_string(),
        ));
    }
    Ok(())
}

/// Validate the identity string recorded with a snapshot.
pub fn validate_created_by(created_by: &str) -> Result<(), CoreError> {
    if created_by.trim().is_empty() {
        return Err(CoreError::Validation(
            "Snapshot created_by must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reason_strings_match_serde_names() {
        for &s in SNAPSHOT_REASONS {
            let reason: SnapshotReason =
                serde_json::from_value(serde_json::Value::String(s.to_string())).unwrap();
            assert_eq!(reason.as_str(), s);
        }
    }

    #[test]
    fn test_unknown_reason_fails_deserialization() {
        let result: Result<SnapshotReason, _> = serde_json::from_value(json!("autosave"));
        assert!(result.is_err());
    }

    #[test]
    fn test_fallback_is_manual_save() {
        assert_eq!(SnapshotReason::FALLBACK, SnapshotReason::ManualSave);
    }

    #[test]
    fn test_ids_must_be_positive() {
        assert!(validate_snapshot_ids(1, 2, 3, 4).is_ok());
        let err = validate_snapshot_ids(1, 0, 3, 4).unwrap_err();
        assert!(err.to_string().contains("scene_id"));
        assert!(validate_snapshot_ids(1, 2, 3, -7).is_err());
    }

    #[test]
    fn test_null_payload_rejected() {
        assert!(validate_snapshot_payload(&serde_json::Value::Null).is_err());
    }

    #[test]
    fn test_empty_payloads_accepted() {
        assert!(validate_snapshot_payload(&json!({})).is_ok());
        assert!(validate_snapshot_payload(&json!([])).is_ok());
        assert!(validate_snapshot_payload(&json!("")).is_ok());
    }

    #[test]
    fn test_created_by_must_not_be_blank() {
        assert!(validate_created_by("artist-7").is_ok());
        assert!(validate_created_by("  ").is_err());
    }
}
