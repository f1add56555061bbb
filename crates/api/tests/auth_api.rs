//! HTTP-level integration tests for authentication and the current-user
//! endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_auth, post_json, seed_user};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_username_returns_tokens(pool: PgPool) {
    seed_user(&pool, "alice").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({"username": "alice", "password": "Correct-Horse1!"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["access_token"].is_string());
    assert!(json["data"]["refresh_token"].is_string());
    assert_eq!(json["data"]["user"]["username"], "alice");
    // Credential state never leaves the server.
    assert!(json["data"]["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_email_identifier(pool: PgPool) {
    seed_user(&pool, "bob").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({"username": "bob@example.com", "password": "Correct-Horse1!"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_wrong_password_returns_401(pool: PgPool) {
    seed_user(&pool, "carol").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({"username": "carol", "password": "not-the-password"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_rotates_the_token(pool: PgPool) {
    seed_user(&pool, "dave").await;

    let app = common::build_test_app(pool.clone());
    let login = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({"username": "dave", "password": "Correct-Horse1!"}),
    )
    .await;
    let login_body = body_json(login).await;
    let refresh_token = login_body["data"]["refresh_token"].as_str().unwrap().to_string();

    // First refresh succeeds.
    let app = common::build_test_app(pool.clone());
    let refreshed = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({"refresh_token": refresh_token}),
    )
    .await;
    assert_eq!(refreshed.status(), StatusCode::OK);

    // The presented token was rotated away; replaying it fails.
    let app = common::build_test_app(pool);
    let replayed = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({"refresh_token": refresh_token}),
    )
    .await;
    assert_eq!(replayed.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_invalidates_refresh_token(pool: PgPool) {
    let (_, token) = seed_user(&pool, "erin").await;

    let app = common::build_test_app(pool.clone());
    let login = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({"username": "erin", "password": "Correct-Horse1!"}),
    )
    .await;
    let login_body = body_json(login).await;
    let refresh_token = login_body["data"]["refresh_token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool.clone());
    let logout = post_auth(app, "/api/v1/auth/logout", &token).await;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let refreshed = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({"refresh_token": refresh_token}),
    )
    .await;
    assert_eq!(refreshed.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn me_requires_authentication(pool: PgPool) {
    let (_, token) = seed_user(&pool, "frank").await;

    let app = common::build_test_app(pool.clone());
    let anonymous = common::get(app, "/api/v1/users/me").await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "frank");
}
