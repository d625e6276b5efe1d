//! Snapshot service: named tactical board snapshots per owner.
//!
//! DESIGN
//! ======
//! A snapshot row holds the whole scene as JSONB. Creating a snapshot fixes
//! its name; later saves replace only the scene. Rows are listed newest
//! first by creation time.
//!
//! Concurrent saves to the same snapshot from two sessions are
//! last-write-wins: updates carry no version and the later write replaces
//! the scene silently.

use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tactics::persist::BoardSnapshot;
use tactics::scene::{Scene, SceneError};
use tracing::info;
use uuid::Uuid;

/// Longest accepted snapshot name, in characters.
pub const MAX_NAME_LEN: usize = 120;

const SELECT_COLUMNS: &str =
    "id, owner_id, name, scene, (EXTRACT(EPOCH FROM created_at) * 1000)::BIGINT AS created_at_ms";

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot not found: {0}")]
    NotFound(Uuid),
    #[error("snapshot {0} belongs to another user")]
    Forbidden(Uuid),
    #[error("invalid snapshot name: {0}")]
    InvalidName(&'static str),
    #[error("invalid scene: {0}")]
    InvalidScene(#[from] SceneError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Trim `raw` and check it is usable as a snapshot name.
///
/// # Errors
///
/// Returns [`SnapshotError::InvalidName`] for blank or over-long names.
pub fn normalize_name(raw: &str) -> Result<String, SnapshotError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(SnapshotError::InvalidName("name is empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(SnapshotError::InvalidName("name is too long"));
    }
    Ok(name.to_owned())
}

fn row_to_snapshot(row: &sqlx::postgres::PgRow) -> Result<BoardSnapshot, sqlx::Error> {
    let Json(scene): Json<Scene> = row.try_get("scene")?;
    Ok(BoardSnapshot {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        scene,
        created_at: row.try_get("created_at_ms")?,
    })
}

/// All snapshots owned by `owner_id`, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails or a stored scene no longer
/// decodes.
pub async fn list_snapshots(pool: &PgPool, owner_id: Uuid) -> Result<Vec<BoardSnapshot>, SnapshotError> {
    let rows = sqlx::query(&format!(
        "SELECT {SELECT_COLUMNS} FROM tactical_boards WHERE owner_id = $1 ORDER BY created_at DESC, id"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(row_to_snapshot)
        .collect::<Result<Vec<_>, _>>()
        .map_err(SnapshotError::from)
}

/// Create a snapshot for `owner_id`.
///
/// # Errors
///
/// Returns [`SnapshotError::InvalidName`] or [`SnapshotError::InvalidScene`]
/// before touching the database, or a database error if the insert fails.
pub async fn create_snapshot(
    pool: &PgPool,
    owner_id: Uuid,
    name: &str,
    scene: &Scene,
) -> Result<BoardSnapshot, SnapshotError> {
    let name = normalize_name(name)?;
    scene.validate()?;

    let row = sqlx::query(&format!(
        "INSERT INTO tactical_boards (id, owner_id, name, scene) VALUES ($1, $2, $3, $4) RETURNING {SELECT_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(&name)
    .bind(Json(scene))
    .fetch_one(pool)
    .await?;

    let snapshot = row_to_snapshot(&row)?;
    info!(snapshot_id = %snapshot.id, %owner_id, name = %snapshot.name, "snapshot created");
    Ok(snapshot)
}

/// Replace the scene of snapshot `id`. The name is never changed.
///
/// # Errors
///
/// Returns [`SnapshotError::NotFound`] if no such snapshot exists,
/// [`SnapshotError::Forbidden`] if it belongs to someone else, or
/// [`SnapshotError::InvalidScene`] if the scene fails validation.
pub async fn update_snapshot_scene(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
    scene: &Scene,
) -> Result<(), SnapshotError> {
    scene.validate()?;

    let result = sqlx::query(
        "UPDATE tactical_boards SET scene = $1, updated_at = clock_timestamp() WHERE id = $2 AND owner_id = $3",
    )
    .bind(Json(scene))
    .bind(id)
    .bind(owner_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        let exists = sqlx::query("SELECT 1 FROM tactical_boards WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .is_some();
        return Err(if exists { SnapshotError::Forbidden(id) } else { SnapshotError::NotFound(id) });
    }

    info!(snapshot_id = %id, %owner_id, "snapshot scene updated");
    Ok(())
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;
