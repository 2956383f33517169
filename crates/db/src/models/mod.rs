//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) where patching exists

pub mod decision_note;
pub mod project;
pub mod scene;
pub mod selection;
pub mod shot;
pub mod take;
pub mod take_snapshot;
