//! Shared helpers for HTTP-level integration tests.
//!
//! Mirrors the router construction in `main.rs` so tests exercise the
//! same middleware stack production uses, with a stub media store in
//! place of S3.

// Each test binary compiles this module separately and uses a different
// subset of the helpers.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use clipstream_api::auth::jwt::{generate_access_token, JwtConfig};
use clipstream_api::auth::password::hash_password;
use clipstream_api::config::ServerConfig;
use clipstream_api::routes;
use clipstream_api::state::AppState;
use clipstream_cloud::{MediaKind, MediaStore, MediaStoreError, StoredMedia};
use clipstream_core::types::DbId;
use clipstream_db::models::user::CreateUser;
use clipstream_db::models::video::{CreateVideo, Video};
use clipstream_db::repositories::{UserRepo, VideoRepo};

/// Media store stub: fabricates URLs, performs no I/O.
pub struct NullMediaStore;

#[async_trait]
impl MediaStore for NullMediaStore {
    async fn upload(&self, path: &Path, kind: MediaKind) -> Result<StoredMedia, MediaStoreError> {
        let key = format!("test/{}", path.file_name().unwrap().to_string_lossy());
        Ok(StoredMedia {
            url: format!("https://media.test/{key}"),
            public_id: key,
            duration_secs: match kind {
                MediaKind::Video => Some(12.0),
                MediaKind::Image => None,
            },
        })
    }

    async fn delete(&self, _public_id: &str) -> Result<(), MediaStoreError> {
        Ok(())
    }
}

/// Build a test `ServerConfig` with safe defaults and a known JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: std::env::temp_dir()
            .join("clipstream-test-uploads")
            .to_string_lossy()
            .into_owned(),
        default_page_size: 10,
        max_page_size: 50,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
        media: Arc::new(NullMediaStore),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Insert a user and mint an access token for them.
pub async fn seed_user(pool: &PgPool, username: &str) -> (DbId, String) {
    let password_hash = hash_password("Correct-Horse1!").expect("hashing should succeed");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            full_name: format!("{username} Tester"),
            email: format!("{username}@example.com"),
            password_hash,
            avatar_url: format!("https://media.test/avatars/{username}.png"),
            cover_image_url: None,
        },
    )
    .await
    .expect("user insert should succeed");

    let token =
        generate_access_token(user.id, &test_config().jwt).expect("token generation should succeed");
    (user.id, token)
}

/// Insert a published video owned by `owner_id`.
pub async fn seed_video(pool: &PgPool, owner_id: DbId, title: &str) -> Video {
    VideoRepo::create(
        pool,
        &CreateVideo {
            owner_id,
            video_url: format!("https://media.test/videos/{title}.mp4"),
            video_public_id: format!("videos/{title}"),
            thumbnail_url: format!("https://media.test/thumbs/{title}.png"),
            thumbnail_public_id: format!("thumbs/{title}"),
            title: title.to_string(),
            description: format!("Description for {title}"),
            duration_secs: 42.0,
        },
    )
    .await
    .expect("video insert should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(
        Request::get(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::post(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    app.oneshot(
        Request::post(uri)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(
        Request::post(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    app.oneshot(
        Request::patch(uri)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn patch_auth(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(
        Request::patch(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(
        Request::delete(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
