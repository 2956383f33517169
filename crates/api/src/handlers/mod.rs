//! HTTP request handlers, grouped by resource.

pub mod decision;
pub mod project;
pub mod scene;
pub mod selection;
pub mod shot;
pub mod snapshot;
pub mod take;
