//! Integration tests for branching a new take from a historical snapshot.
//!
//! Exercises `TakeRepo::branch_from_snapshot` against a real database:
//! - The new take is a draft with the next order index and a derived name
//! - The seed snapshot copies the source payload verbatim
//! - The source take and its history are untouched
//! - A missing source snapshot yields `None`
//! - A rejected seed reason falls back to `manual_save` instead of failing

use serde_json::json;
use sqlx::PgPool;

use slate_core::snapshot::SnapshotReason;
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
            name: format!("BR_P_{suffix}"),
            description: None,
        },
    )
    .await
    .unwrap();
    let scene = SceneRepo::create(
        pool,
        project.id,
        &CreateScene {
            name: format!("BR_SC_{suffix}"),
            description: None,
        },
    )
    .await
    .unwrap();
    let shot = ShotRepo::create(
        pool,
        scene.id,
        &CreateShot {
            name: format!("BR_SH_{suffix}"),
            description: None,
        },
    )
    .await
    .unwrap();
    let take = TakeRepo::create(
        pool,
        shot.id,
        &CreateTake {
            name: format!("BR_T_{suffix}"),
            description: None,
            status: None,
        },
    )
    .await
    .unwrap();
    (project.id, scene.id, shot.id, take.id)
}

async fn save_snapshot(
    pool: &PgPool,
    ids: (i64, i64, i64, i64),
    payload: serde_json::Value,
) -> slate_db::models::take_snapshot::TakeSnapshot {
    TakeSnapshotRepo::save(
        pool,
        &CreateTakeSnapshot {
            project_id: ids.0,
            scene_id: ids.1,
            shot_id: ids.2,
            take_id: ids.3,
            payload,
            reason: SnapshotReason::ManualSave,
            created_by: "tester".to_string(),
        },
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Branching
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_branch_creates_draft_take_with_seed_snapshot(pool: PgPool) {
    let ids = setup_take(&pool, "basic").await;
    let payload = json!({"nodes": [{"id": "n1"}], "edges": []});
    let source = save_snapshot(&pool, ids, payload.clone()).await;

    let branched = TakeRepo::branch_from_snapshot(&pool, source.id, None, "tester")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(branched.take.shot_id, ids.2);
    assert_eq!(branched.take.status, "draft");
    assert_eq!(branched.take.order_index, 1, "source take holds index 0");

    assert_eq!(branched.snapshot.take_id, branched.take.id);
    assert_eq!(branched.snapshot.payload, payload);
    assert_eq!(branched.snapshot.reason, "restore_from_snapshot");
    assert_ne!(branched.snapshot.id, source.id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_branch_derives_name_from_snapshot_time(pool: PgPool) {
    let ids = setup_take(&pool, "name").await;
    let source = save_snapshot(&pool, ids, json!([])).await;

    let branched = TakeRepo::branch_from_snapshot(&pool, source.id, None, "tester")
        .await
        .unwrap()
        .unwrap();

    let expected = format!("Take (from {})", source.created_at.format("%H:%M"));
    assert_eq!(branched.take.name, expected);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_branch_honours_custom_name(pool: PgPool) {
    let ids = setup_take(&pool, "custom").await;
    let source = save_snapshot(&pool, ids, json!([])).await;

    let branched = TakeRepo::branch_from_snapshot(&pool, source.id, Some("Alt ending"), "tester")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(branched.take.name, "Alt ending");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_branch_leaves_source_take_untouched(pool: PgPool) {
    let ids = setup_take(&pool, "iso").await;
    save_snapshot(&pool, ids, json!({"rev": 1})).await;
    let source_latest = save_snapshot(&pool, ids, json!({"rev": 2})).await;

    TakeRepo::branch_from_snapshot(&pool, source_latest.id, None, "tester")
        .await
        .unwrap()
        .unwrap();

    // The source take's latest snapshot and history length are unchanged.
    let latest = TakeSnapshotRepo::find_latest_for_take(&pool, ids.3)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, source_latest.id);
    assert_eq!(latest.payload, json!({"rev": 2}));

    let history = TakeSnapshotRepo::list_history(&pool, ids.3, None).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_branch_from_older_snapshot_copies_that_payload(pool: PgPool) {
    let ids = setup_take(&pool, "older").await;
    let older = save_snapshot(&pool, ids, json!({"rev": 1})).await;
    save_snapshot(&pool, ids, json!({"rev": 2})).await;

    let branched = TakeRepo::branch_from_snapshot(&pool, older.id, None, "tester")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        branched.snapshot.payload,
        json!({"rev": 1}),
        "the branch seeds from the chosen snapshot, not the latest"
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_branch_from_missing_snapshot_is_none(pool: PgPool) {
    setup_take(&pool, "missing").await;

    let result = TakeRepo::branch_from_snapshot(&pool, 999_999, None, "tester")
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_branch_falls_back_when_storage_rejects_reason(pool: PgPool) {
    let ids = setup_take(&pool, "fallback").await;
    let payload = json!({"nodes": [{"id": "n1"}]});
    let source = save_snapshot(&pool, ids, payload.clone()).await;

    // Tighten the reason CHECK so 'restore_from_snapshot' is no longer
    // accepted, as an older schema revision would refuse it.
    sqlx::query("ALTER TABLE take_snapshots DROP CONSTRAINT ck_take_snapshots_reason")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "ALTER TABLE take_snapshots ADD CONSTRAINT ck_take_snapshots_reason
         CHECK (reason IN ('manual_save', 'publish', 'checkpoint', 'duplicate_seed'))",
    )
    .execute(&pool)
    .await
    .unwrap();

    let branched = TakeRepo::branch_from_snapshot(&pool, source.id, None, "tester")
        .await
        .unwrap()
        .unwrap();

    // The branch still succeeds, recorded under the fallback reason.
    assert_eq!(branched.snapshot.reason, "manual_save");
    assert_eq!(branched.snapshot.payload, payload);
    assert_eq!(branched.take.status, "draft");
    assert_eq!(branched.take.order_index, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_repeated_branches_get_increasing_indexes(pool: PgPool) {
    let ids = setup_take(&pool, "multi").await;
    let source = save_snapshot(&pool, ids, json!([])).await;

    let first = TakeRepo::branch_from_snapshot(&pool, source.id, Some("Branch A"), "tester")
        .await
        .unwrap()
        .unwrap();
    let second = TakeRepo::branch_from_snapshot(&pool, source.id, Some("Branch B"), "tester")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.take.order_index, 1);
    assert_eq!(second.take.order_index, 2);
}
