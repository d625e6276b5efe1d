use super::*;

// =============================================================================
// SessionUser
// =============================================================================

#[test]
fn session_user_serializes_as_current_user() {
    let user = SessionUser { id: Uuid::nil(), name: "charlie".into() };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json, serde_json::json!({ "id": "00000000-0000-0000-0000-000000000000", "name": "charlie" }));
}

#[test]
fn session_user_body_decodes_on_the_board_side() {
    let user = SessionUser { id: Uuid::new_v4(), name: "dana".into() };
    let json = serde_json::to_string(&user).unwrap();
    let decoded: tactics::persist::CurrentUser = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded.id, user.id);
    assert_eq!(decoded.name, "dana");
}

// =============================================================================
// validate_session (live database)
// =============================================================================

#[cfg(feature = "live-db-tests")]
async fn insert_session(pool: &PgPool, token: &str, user_id: Uuid, ttl: &str) {
    sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, now() + $3::interval)")
        .bind(token)
        .bind(user_id)
        .bind(ttl)
        .execute(pool)
        .await
        .expect("insert session should succeed");
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn validate_session_resolves_live_token_only() {
    use crate::state::test_helpers;

    let pool = test_helpers::integration_pool().await;
    let user_id = test_helpers::seed_user(&pool, "Coach").await;
    insert_session(&pool, "live-token", user_id, "1 hour").await;
    insert_session(&pool, "stale-token", user_id, "-1 hour").await;

    let user = validate_session(&pool, "live-token")
        .await
        .expect("validate should succeed")
        .expect("live token should resolve");
    assert_eq!(user, SessionUser { id: user_id, name: "Coach".into() });

    assert!(validate_session(&pool, "stale-token").await.unwrap().is_none());
    assert!(validate_session(&pool, "unknown").await.unwrap().is_none());
}
