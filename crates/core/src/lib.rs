//! Pure domain logic for the slate versioning backend.
//!
//! This crate has no database or HTTP dependencies. It defines the shared
//! vocabulary (ids, errors, status values), the decision state machine, and
//! the note-body schema for the append-only decision ledger, so the DB and
//! API layers agree on semantics without depending on each other.

pub mod decision;
pub mod error;
pub mod ledger;
pub mod pagination;
pub mod snapshot;
pub mod take;
pub mod types;

pub use error::CoreError;
