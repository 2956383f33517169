//! Shared response envelope for API handlers.
//!
//! Every successful response wraps its payload in `{ "data": ... }`.
//! Handlers return [`DataResponse`] rather than ad-hoc
//! `serde_json::json!({ "data": ... })` so the payload type is checked at
//! compile time and serialization stays consistent.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
