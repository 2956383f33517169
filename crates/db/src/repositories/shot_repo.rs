//! Repository for the `shots` table.
//!
//! `approved_take_id` is deliberately absent from every write here; the
//! decision reference is owned by `DecisionRepo` so it can never change
//! without an accompanying ledger note.

use sqlx::PgPool;
use slate_core::types::DbId;

use crate::models::shot::{CreateShot, Shot};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, scene_id, name, description, approved_take_id, created_at, updated_at";

/// Provides CRUD operations for shots.
pub struct ShotRepo;

impl ShotRepo {
    /// Insert a new shot under a scene, returning the created row.
    pub async fn create(
        pool: &PgPool,
        scene_id: DbId,
        input: &CreateShot,
    ) -> Result<Shot, sqlx::Error> {
        let query = format!(
            "INSERT INTO shots (scene_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(scene_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a shot by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Shot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shots WHERE id = $1");
        sqlx::query_as::<_, Shot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all shots for a scene, oldest first.
    pub async fn list_by_scene(pool: &PgPool, scene_id: DbId) -> Result<Vec<Shot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shots
             WHERE scene_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Shot>(&query)
            .bind(scene_id)
            .fetch_all(pool)
            .await
    }
}
