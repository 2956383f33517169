use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Stored data contradicts an invariant the schema cannot express (for
    /// example a decided shot with no surviving approval note). Unlike
    /// `NotFound`, this means the database itself is in a bad state and the
    /// read cannot be trusted.
    #[error("Data integrity violation: {0}")]
    Integrity(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
