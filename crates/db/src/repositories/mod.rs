//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Plain lookups signal absence
//! with `Ok(None)`; only invariant-checking operations use `DbError`.

pub mod decision_repo;
pub mod project_repo;
pub mod scene_repo;
pub mod selection_repo;
pub mod shot_repo;
pub mod take_repo;
pub mod take_snapshot_repo;

pub use decision_repo::DecisionRepo;
pub use project_repo::ProjectRepo;
pub use scene_repo::SceneRepo;
pub use selection_repo::SelectionRepo;
pub use shot_repo::ShotRepo;
pub use take_repo::TakeRepo;
pub use take_snapshot_repo::TakeSnapshotRepo;
