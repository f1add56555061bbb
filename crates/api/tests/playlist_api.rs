//! HTTP-level integration tests for playlists: privacy defaults,
//! membership paging, and channel statistics.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, get, get_auth, patch_auth, post_auth, post_json_auth, seed_user, seed_video,
};
use sqlx::PgPool;

async fn create_playlist(pool: &PgPool, token: &str, title: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json_auth(
            app,
            "/api/v1/playlists",
            token,
            serde_json::json!({"title": title, "description": "A test playlist"}),
        )
        .await,
    )
    .await;
    created["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Privacy
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn playlists_are_private_by_default(pool: PgPool) {
    let (owner, owner_token) = seed_user(&pool, "alice").await;
    let (_, other_token) = seed_user(&pool, "bob").await;
    create_playlist(&pool, &owner_token, "T").await;

    // Accessor B sees an empty envelope.
    let app = common::build_test_app(pool.clone());
    let json = body_json(
        get_auth(
            app,
            &format!("/api/v1/channels/{owner}/playlists"),
            &other_token,
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["total_items"], 0);
    assert_eq!(json["data"]["current_page"], 0);

    // The owner sees the playlist.
    let app = common::build_test_app(pool);
    let json = body_json(
        get_auth(
            app,
            &format!("/api/v1/channels/{owner}/playlists"),
            &owner_token,
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["total_items"], 1);
    assert_eq!(json["data"]["items"][0]["title"], "T");
    assert_eq!(json["data"]["items"][0]["is_public"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn private_playlist_detail_is_hidden_from_others(pool: PgPool) {
    let (_, owner_token) = seed_user(&pool, "alice").await;
    let (_, other_token) = seed_user(&pool, "bob").await;
    let playlist_id = create_playlist(&pool, &owner_token, "Secret mix").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/playlists/{playlist_id}"), &other_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/playlists/{playlist_id}"), &owner_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn visibility_toggle_flips_public(pool: PgPool) {
    let (_, owner_token) = seed_user(&pool, "alice").await;
    let playlist_id = create_playlist(&pool, &owner_token, "Going public").await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(
        patch_auth(
            app,
            &format!("/api/v1/playlists/{playlist_id}/visibility"),
            &owner_token,
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["is_public"], true);

    // Public playlists are searchable.
    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/playlists/search?q=Going").await).await;
    assert_eq!(json["data"]["total_items"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn search_never_returns_private_playlists(pool: PgPool) {
    let (_, owner_token) = seed_user(&pool, "alice").await;
    create_playlist(&pool, &owner_token, "Hidden gems").await;

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/playlists/search?q=gems").await).await;
    assert_eq!(json["data"]["total_items"], 0);
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn membership_page_slices_before_visibility_filtering(pool: PgPool) {
    let (owner, owner_token) = seed_user(&pool, "curator").await;
    let (_, viewer_token) = seed_user(&pool, "viewer").await;
    let playlist_id = create_playlist(&pool, &owner_token, "Mixed bag").await;

    let visible = seed_video(&pool, owner, "public-one").await;
    let hidden = seed_video(&pool, owner, "drafted").await;
    let also_visible = seed_video(&pool, owner, "public-two").await;

    for video_id in [visible.id, hidden.id, also_visible.id] {
        let app = common::build_test_app(pool.clone());
        let response = post_auth(
            app,
            &format!("/api/v1/playlists/{playlist_id}/videos/{video_id}"),
            &owner_token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // Unpublish the middle entry and make the playlist public.
    let app = common::build_test_app(pool.clone());
    patch_auth(app, &format!("/api/v1/videos/{}/publish", hidden.id), &owner_token).await;
    let app = common::build_test_app(pool.clone());
    patch_auth(
        app,
        &format!("/api/v1/playlists/{playlist_id}/visibility"),
        &owner_token,
    )
    .await;

    // The total counts raw membership; the page drops what the viewer
    // cannot see.
    let app = common::build_test_app(pool.clone());
    let json = body_json(
        get_auth(app, &format!("/api/v1/playlists/{playlist_id}"), &viewer_token).await,
    )
    .await;
    assert_eq!(json["data"]["videos"]["total_items"], 3);
    let titles: Vec<_> = json["data"]["videos"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["public-one", "public-two"]);

    // The owner sees the full membership in order.
    let app = common::build_test_app(pool);
    let json = body_json(
        get_auth(app, &format!("/api/v1/playlists/{playlist_id}"), &owner_token).await,
    )
    .await;
    let titles: Vec<_> = json["data"]["videos"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["public-one", "drafted", "public-two"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn adding_a_video_twice_is_a_conflict(pool: PgPool) {
    let (owner, owner_token) = seed_user(&pool, "curator").await;
    let playlist_id = create_playlist(&pool, &owner_token, "No dupes").await;
    let video = seed_video(&pool, owner, "once-only").await;

    let uri = format!("/api/v1/playlists/{playlist_id}/videos/{}", video.id);
    let app = common::build_test_app(pool.clone());
    assert_eq!(
        post_auth(app, &uri, &owner_token).await.status(),
        StatusCode::CREATED
    );

    let app = common::build_test_app(pool);
    assert_eq!(
        post_auth(app, &uri, &owner_token).await.status(),
        StatusCode::CONFLICT
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn only_the_owner_mutates_a_playlist(pool: PgPool) {
    let (owner, owner_token) = seed_user(&pool, "curator").await;
    let (_, intruder_token) = seed_user(&pool, "intruder").await;
    let playlist_id = create_playlist(&pool, &owner_token, "Keep out").await;
    let video = seed_video(&pool, owner, "mine").await;

    let app = common::build_test_app(pool);
    let response = post_auth(
        app,
        &format!("/api/v1/playlists/{playlist_id}/videos/{}", video.id),
        &intruder_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Channel statistics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn channel_stats_merge_all_metrics(pool: PgPool) {
    let (channel, channel_token) = seed_user(&pool, "channel").await;
    let (_, fan_token) = seed_user(&pool, "fan").await;

    let first = seed_video(&pool, channel, "stat-one").await;
    seed_video(&pool, channel, "stat-two").await;

    // A view, a like, a comment, a subscription, a public playlist.
    let app = common::build_test_app(pool.clone());
    get_auth(app, &format!("/api/v1/videos/{}", first.id), &fan_token).await;
    let app = common::build_test_app(pool.clone());
    post_auth(app, &format!("/api/v1/videos/{}/like", first.id), &fan_token).await;
    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        &format!("/api/v1/videos/{}/comments", first.id),
        &fan_token,
        serde_json::json!({"content": "nice"}),
    )
    .await;
    let app = common::build_test_app(pool.clone());
    post_auth(
        app,
        &format!("/api/v1/channels/{channel}/subscription"),
        &fan_token,
    )
    .await;
    let playlist_id = create_playlist(&pool, &channel_token, "Showcase").await;
    let app = common::build_test_app(pool.clone());
    patch_auth(
        app,
        &format!("/api/v1/playlists/{playlist_id}/visibility"),
        &channel_token,
    )
    .await;

    let app = common::build_test_app(pool);
    let json = body_json(
        get_auth(app, &format!("/api/v1/channels/{channel}/stats"), &fan_token).await,
    )
    .await;
    assert_eq!(json["data"]["views"], 1);
    assert_eq!(json["data"]["published_videos"], 2);
    assert_eq!(json["data"]["total_duration_secs"], 84.0);
    assert_eq!(json["data"]["likes"], 1);
    assert_eq!(json["data"]["comments"], 1);
    assert_eq!(json["data"]["subscribers"], 1);
    assert_eq!(json["data"]["public_playlists"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stats_for_a_missing_channel_are_404(pool: PgPool) {
    let (_, token) = seed_user(&pool, "fan").await;
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/channels/999999/stats", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Watch history endpoint
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn watch_history_lists_most_recent_first(pool: PgPool) {
    let (owner, _) = seed_user(&pool, "creator").await;
    let (_, viewer_token) = seed_user(&pool, "viewer").await;
    let first = seed_video(&pool, owner, "watched-first").await;
    let second = seed_video(&pool, owner, "watched-second").await;

    for video_id in [first.id, second.id] {
        let app = common::build_test_app(pool.clone());
        get_auth(app, &format!("/api/v1/videos/{video_id}"), &viewer_token).await;
    }

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/users/me/history", &viewer_token).await).await;
    assert_eq!(json["data"]["total_items"], 2);
    assert_eq!(json["data"]["items"][0]["title"], "watched-second");
}
