//! Repository error type for operations that enforce domain rules.
//!
//! Plain CRUD methods return `sqlx::Error` directly and signal absence with
//! `Ok(None)`. Operations that can also fail a domain invariant while
//! reading or writing (decision loads, for example) return [`DbError`] so
//! the caller can tell a broken store apart from a driver failure.

use slate_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
