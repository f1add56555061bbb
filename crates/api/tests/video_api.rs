//! HTTP-level integration tests for video listing, pagination contracts,
//! search escaping, visibility, view side effects, and cascade deletion.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, get_auth, patch_auth, post_auth, post_json_auth, seed_user,
    seed_video,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Pagination envelope
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn pagination_envelope_reports_ceiling_pages(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "uploader").await;
    for i in 0..15 {
        seed_video(&pool, owner, &format!("video-{i:02}")).await;
    }

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/videos?page=2&limit=10").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["total_items"], 15);
    assert_eq!(json["data"]["total_pages"], 2);
    assert_eq!(json["data"]["current_page"], 2);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 5);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn empty_result_is_an_empty_envelope_not_an_error(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/videos?page=5&limit=10").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 0);
    assert_eq!(json["data"]["total_items"], 0);
    assert_eq!(json["data"]["total_pages"], 0);
    assert_eq!(json["data"]["current_page"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn page_beyond_total_is_404_when_items_exist(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "uploader").await;
    seed_video(&pool, owner, "only-video").await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/videos?page=3&limit=10").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn limit_above_ceiling_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/videos?page=1&limit=51").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_sort_key_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/videos?sort_by=owner").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Search escaping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn search_matches_percent_literally(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "uploader").await;
    seed_video(&pool, owner, "100% legit speedrun").await;
    seed_video(&pool, owner, "100x legit speedrun").await;

    // `%` is URL-encoded as %25; it must match only the literal title.
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/videos/search?q=100%25%20legit").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["total_items"], 1);
    assert_eq!(json["data"]["items"][0]["title"], "100% legit speedrun");
}

// ---------------------------------------------------------------------------
// Publish-status visibility
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unpublished_videos_are_owner_only(pool: PgPool) {
    let (owner, owner_token) = seed_user(&pool, "creator").await;
    let (_, other_token) = seed_user(&pool, "visitor").await;
    let video = seed_video(&pool, owner, "draft-video").await;

    // Unpublish it.
    let app = common::build_test_app(pool.clone());
    let response = patch_auth(
        app,
        &format!("/api/v1/videos/{}/publish", video.id),
        &owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Gone from the public catalog.
    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/videos").await).await;
    assert_eq!(json["data"]["total_items"], 0);

    // The owner's channel listing still shows it to the owner...
    let app = common::build_test_app(pool.clone());
    let json = body_json(
        get_auth(
            app,
            &format!("/api/v1/channels/{owner}/videos"),
            &owner_token,
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["total_items"], 1);

    // ...but not to anyone else.
    let app = common::build_test_app(pool);
    let json = body_json(
        get_auth(
            app,
            &format!("/api/v1/channels/{owner}/videos"),
            &other_token,
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["total_items"], 0);
}

// ---------------------------------------------------------------------------
// View side effects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn every_fetch_counts_a_view_but_history_is_a_set(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "creator").await;
    let (viewer, viewer_token) = seed_user(&pool, "watcher").await;
    let video = seed_video(&pool, owner, "watch-me").await;

    for _ in 0..3 {
        let app = common::build_test_app(pool.clone());
        let response = get_auth(app, &format!("/api/v1/videos/{}", video.id), &viewer_token).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let views: i64 = sqlx::query_scalar("SELECT views FROM videos WHERE id = $1")
        .bind(video.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(views, 3, "every fetch counts a view");

    let history: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM watch_history WHERE user_id = $1")
            .bind(viewer)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(history, 1, "watch history has set semantics");
}

// ---------------------------------------------------------------------------
// Cascade deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_a_video_cascades_everywhere(pool: PgPool) {
    let (owner, owner_token) = seed_user(&pool, "creator").await;
    let (_, fan_token) = seed_user(&pool, "fan").await;
    let video = seed_video(&pool, owner, "doomed-video").await;

    // Fan likes the video, comments on it, likes the comment, watches it.
    let app = common::build_test_app(pool.clone());
    post_auth(app, &format!("/api/v1/videos/{}/like", video.id), &fan_token).await;

    let app = common::build_test_app(pool.clone());
    let comment = body_json(
        post_json_auth(
            app,
            &format!("/api/v1/videos/{}/comments", video.id),
            &fan_token,
            serde_json::json!({"content": "great video"}),
        )
        .await,
    )
    .await;
    let comment_id = comment["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    post_auth(app, &format!("/api/v1/comments/{comment_id}/like"), &fan_token).await;

    let app = common::build_test_app(pool.clone());
    get_auth(app, &format!("/api/v1/videos/{}", video.id), &fan_token).await;

    // Owner puts it in a playlist.
    let app = common::build_test_app(pool.clone());
    let playlist = body_json(
        post_json_auth(
            app,
            "/api/v1/playlists",
            &owner_token,
            serde_json::json!({"title": "My reel", "description": "Favourites"}),
        )
        .await,
    )
    .await;
    let playlist_id = playlist["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    post_auth(
        app,
        &format!("/api/v1/playlists/{playlist_id}/videos/{}", video.id),
        &owner_token,
    )
    .await;

    // Delete the video.
    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/videos/{}", video.id), &owner_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Nothing referencing the video survives.
    let likes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes")
        .fetch_one(&pool)
        .await
        .unwrap();
    let comments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
        .fetch_one(&pool)
        .await
        .unwrap();
    let memberships: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM playlist_videos")
        .fetch_one(&pool)
        .await
        .unwrap();
    let history: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM watch_history")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!((likes, comments, memberships, history), (0, 0, 0, 0));
}

// ---------------------------------------------------------------------------
// Detail fetch
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn get_missing_video_returns_404(pool: PgPool) {
    let (_, token) = seed_user(&pool, "watcher").await;
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/videos/999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn detail_includes_owner_summary_and_counters(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "creator").await;
    let (_, viewer_token) = seed_user(&pool, "watcher").await;
    let video = seed_video(&pool, owner, "counted").await;

    let app = common::build_test_app(pool.clone());
    post_auth(app, &format!("/api/v1/videos/{}/like", video.id), &viewer_token).await;

    let app = common::build_test_app(pool);
    let json = body_json(
        get_auth(app, &format!("/api/v1/videos/{}", video.id), &viewer_token).await,
    )
    .await;
    assert_eq!(json["data"]["owner_username"], "creator");
    assert_eq!(json["data"]["like_count"], 1);
    assert_eq!(json["data"]["is_liked"], true);
    assert!(json["data"].get("video_public_id").is_none(), "projection allow-list");
}
