//! Integration tests for the append-only snapshot store.
//!
//! Exercises the `TakeSnapshotRepo` against a real database:
//! - Save validates ids and payload before writing
//! - Identical saves produce distinct history rows
//! - `find_latest_for_take` returns the newest row or `None`
//! - History listing is newest-first, limited, and stable across calls

use assert_matches::assert_matches;
use serde_json::json;
use sqlx::PgPool;

use slate_core::error::CoreError;
use slate_core::snapshot::SnapshotReason;
use slate_db::error::DbError;
use slate_db::models::project::CreateProject;
use slate_db::models::scene::CreateScene;
use slate_db::models::shot::CreateShot;
use slate_db::models::take::CreateTake;
use slate_db::models::take_snapshot::CreateTakeSnapshot;
use slate_db::repositories::{ProjectRepo, SceneRepo, ShotRepo, TakeRepo, TakeSnapshotRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build the project -> scene -> shot -> take hierarchy.
/// Returns (project_id, scene_id, shot_id, take_id).
async fn setup_take(pool: &PgPool, suffix: &str) -> (i64, i64, i64, i64) {
    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            name: format!("SN_P_{suffix}"),
            description: None,
        },
    )
    .await
    .unwrap();
    let scene = SceneRepo::create(
        pool,
        project.id,
        &CreateScene {
            name: format!("SN_SC_{suffix}"),
            description: None,
        },
    )
    .await
    .unwrap();
    let shot = ShotRepo::create(
        pool,
        scene.id,
        &CreateShot {
            name: format!("SN_SH_{suffix}"),
            description: None,
        },
    )
    .await
    .unwrap();
    let take = TakeRepo::create(
        pool,
        shot.id,
        &CreateTake {
            name: format!("SN_T_{suffix}"),
            description: None,
            status: None,
        },
    )
    .await
    .unwrap();
    (project.id, scene.id, shot.id, take.id)
}

fn snapshot_input(
    ids: (i64, i64, i64, i64),
    payload: serde_json::Value,
    reason: SnapshotReason,
) -> CreateTakeSnapshot {
    CreateTakeSnapshot {
        project_id: ids.0,
        scene_id: ids.1,
        shot_id: ids.2,
        take_id: ids.3,
        payload,
        reason,
        created_by: "tester".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Save validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_save_rejects_non_positive_ids(pool: PgPool) {
    let ids = setup_take(&pool, "vid").await;
    let mut input = snapshot_input(ids, json!({}), SnapshotReason::ManualSave);
    input.scene_id = 0;

    let err = TakeSnapshotRepo::save(&pool, &input).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));

    // Nothing was written.
    let history = TakeSnapshotRepo::list_history(&pool, ids.3, None).await.unwrap();
    assert!(history.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_save_rejects_null_payload(pool: PgPool) {
    let ids = setup_take(&pool, "vnull").await;
    let input = snapshot_input(ids, serde_json::Value::Null, SnapshotReason::ManualSave);

    let err = TakeSnapshotRepo::save(&pool, &input).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_save_rejects_blank_created_by(pool: PgPool) {
    let ids = setup_take(&pool, "vby").await;
    let mut input = snapshot_input(ids, json!({}), SnapshotReason::ManualSave);
    input.created_by = "  ".to_string();

    let err = TakeSnapshotRepo::save(&pool, &input).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_save_accepts_empty_array_payload(pool: PgPool) {
    let ids = setup_take(&pool, "vempty").await;
    let snapshot = TakeSnapshotRepo::save(
        &pool,
        &snapshot_input(ids, json!([]), SnapshotReason::ManualSave),
    )
    .await
    .unwrap();

    assert_eq!(snapshot.payload, json!([]));
    assert_eq!(snapshot.reason, "manual_save");
}

// ---------------------------------------------------------------------------
// Save semantics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_identical_saves_produce_distinct_rows(pool: PgPool) {
    let ids = setup_take(&pool, "dup").await;
    let input = snapshot_input(ids, json!({"nodes": [1, 2]}), SnapshotReason::Checkpoint);

    let first = TakeSnapshotRepo::save(&pool, &input).await.unwrap();
    let second = TakeSnapshotRepo::save(&pool, &input).await.unwrap();

    assert_ne!(first.id, second.id);

    let history = TakeSnapshotRepo::list_history(&pool, ids.3, None).await.unwrap();
    assert_eq!(history.len(), 2);
}

// ---------------------------------------------------------------------------
// Latest
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_latest_returns_newest_snapshot(pool: PgPool) {
    let ids = setup_take(&pool, "latest").await;

    TakeSnapshotRepo::save(&pool, &snapshot_input(ids, json!({"rev": 1}), SnapshotReason::ManualSave))
        .await
        .unwrap();
    let newer = TakeSnapshotRepo::save(
        &pool,
        &snapshot_input(ids, json!({"rev": 2}), SnapshotReason::Publish),
    )
    .await
    .unwrap();

    let latest = TakeSnapshotRepo::find_latest_for_take(&pool, ids.3)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, newer.id);
    assert_eq!(latest.payload, json!({"rev": 2}));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_latest_for_unsaved_take_is_none(pool: PgPool) {
    let ids = setup_take(&pool, "unsaved_a").await;
    let other = setup_take(&pool, "unsaved_b").await;

    TakeSnapshotRepo::save(&pool, &snapshot_input(ids, json!([]), SnapshotReason::ManualSave))
        .await
        .unwrap();

    // The unrelated take has never been saved; an empty canvas, not an error.
    let latest = TakeSnapshotRepo::find_latest_for_take(&pool, other.3).await.unwrap();
    assert!(latest.is_none());
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_history_is_newest_first_and_limited(pool: PgPool) {
    let ids = setup_take(&pool, "hist").await;

    for rev in 0..5 {
        TakeSnapshotRepo::save(
            &pool,
            &snapshot_input(ids, json!({"rev": rev}), SnapshotReason::Checkpoint),
        )
        .await
        .unwrap();
    }

    let history = TakeSnapshotRepo::list_history(&pool, ids.3, Some(3)).await.unwrap();
    assert_eq!(history.len(), 3);
    for pair in history.windows(2) {
        assert!(
            (pair[0].created_at, pair[0].id) >= (pair[1].created_at, pair[1].id),
            "history must be newest first"
        );
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_history_listing_is_stable(pool: PgPool) {
    let ids = setup_take(&pool, "stable").await;

    for rev in 0..3 {
        TakeSnapshotRepo::save(
            &pool,
            &snapshot_input(ids, json!({"rev": rev}), SnapshotReason::ManualSave),
        )
        .await
        .unwrap();
    }

    let first = TakeSnapshotRepo::list_history(&pool, ids.3, None).await.unwrap();
    let second = TakeSnapshotRepo::list_history(&pool, ids.3, None).await.unwrap();

    let first_ids: Vec<i64> = first.iter().map(|e| e.id).collect();
    let second_ids: Vec<i64> = second.iter().map(|e| e.id).collect();
    assert_eq!(first_ids, second_ids, "repeated listings must be identical");
}
