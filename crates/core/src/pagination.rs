//! Pagination defaults and clamping shared by the API and repository layers.

/// Default number of history entries per page.
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;

/// Maximum number of history entries per page.
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Default number of ledger notes per page.
pub const DEFAULT_NOTE_LIMIT: i64 = 50;

/// Maximum number of ledger notes per page.
pub const MAX_NOTE_LIMIT: i64 = 200;

/// Clamp an optional user-supplied limit into `[1, max]`, falling back to
/// `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp an optional user-supplied offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
