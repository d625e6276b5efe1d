//! Session validation.
//!
//! Sessions are opaque tokens issued by the sign-in flow and stored in the
//! `sessions` table. This service only resolves a token to its user; expired
//! or unknown tokens resolve to `None`.

use sqlx::{PgPool, Row};
use uuid::Uuid;

/// User row returned from session validation. Serialized as the body of
/// `GET /api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SessionUser {
    /// Unique user identifier; owner id of the user's snapshots.
    pub id: Uuid,
    /// Display name.
    pub name: String,
}

/// Validate a session token and return the associated user.
///
/// # Errors
///
/// Returns the database error if the lookup itself fails.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<SessionUser>, sqlx::Error> {
    let row = sqlx::query(
        r"SELECT u.id, u.name
          FROM sessions s
          JOIN users u ON u.id = s.user_id
          WHERE s.token = $1 AND s.expires_at > now()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| SessionUser { id: r.get("id"), name: r.get("name") }))
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
