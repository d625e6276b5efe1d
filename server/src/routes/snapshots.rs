//! Tactical board snapshot routes.
//!
//! Every route requires a session; the caller may only see and write their
//! own snapshots.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tactics::persist::BoardSnapshot;
use tactics::scene::Scene;
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::services::snapshot::{self, SnapshotError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSnapshotBody {
    /// Must match the caller when present.
    pub owner_id: Option<Uuid>,
    pub name: String,
    pub scene: Scene,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSnapshotBody {
    pub scene: Scene,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

/// A request may name an owner, but only the caller's own.
pub(crate) fn check_owner(requested: Option<Uuid>, caller: Uuid) -> Result<(), StatusCode> {
    match requested {
        Some(owner) if owner != caller => Err(StatusCode::FORBIDDEN),
        _ => Ok(()),
    }
}

/// `GET /api/tactical-boards?owner_id=` — list the caller's snapshots, newest first.
pub async fn list_snapshots(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<BoardSnapshot>>, StatusCode> {
    check_owner(query.owner_id, auth.user.id)?;
    let rows = snapshot::list_snapshots(&state.pool, auth.user.id)
        .await
        .map_err(snapshot_error_to_status)?;
    Ok(Json(rows))
}

/// `POST /api/tactical-boards` — create a named snapshot.
pub async fn create_snapshot(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateSnapshotBody>,
) -> Result<(StatusCode, Json<CreatedResponse>), StatusCode> {
    check_owner(body.owner_id, auth.user.id)?;
    let row = snapshot::create_snapshot(&state.pool, auth.user.id, &body.name, &body.scene)
        .await
        .map_err(snapshot_error_to_status)?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: row.id })))
}

/// `PATCH /api/tactical-boards/{id}` — overwrite a snapshot's scene.
pub async fn update_snapshot(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateSnapshotBody>,
) -> Result<StatusCode, StatusCode> {
    snapshot::update_snapshot_scene(&state.pool, id, auth.user.id, &body.scene)
        .await
        .map_err(snapshot_error_to_status)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn snapshot_error_to_status(err: SnapshotError) -> StatusCode {
    match err {
        SnapshotError::NotFound(_) => StatusCode::NOT_FOUND,
        SnapshotError::Forbidden(_) => StatusCode::FORBIDDEN,
        SnapshotError::InvalidName(_) | SnapshotError::InvalidScene(_) => StatusCode::BAD_REQUEST,
        SnapshotError::Database(e) => {
            tracing::error!(error = %e, "snapshot query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
#[path = "snapshots_test.rs"]
mod tests;
