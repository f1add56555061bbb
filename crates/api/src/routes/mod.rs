pub mod auth;
pub mod channels;
pub mod comments;
pub mod health;
pub mod playlists;
pub mod posts;
pub mod users;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       register (public, multipart)
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
///
/// /users/me                            current profile
/// /users/me/history                    watch history (paginated)
/// /users/me/subscriptions              subscribed channels
/// /users/me/likes/videos               liked videos (paginated)
/// /users/{username}/posts              posts by username (paginated)
///
/// /videos                              list published, publish (multipart)
/// /videos/search                       title search
/// /videos/{id}                         get (counts a view), update, delete
/// /videos/{id}/thumbnail               replace thumbnail (multipart)
/// /videos/{id}/publish                 toggle publish flag
/// /videos/{id}/comments                list, add
/// /videos/{id}/like                    toggle like
///
/// /comments/{id}                       update, delete (owner only)
/// /comments/{id}/like                  toggle like
///
/// /posts                               create
/// /posts/{id}                          get, update, delete
/// /posts/{id}/like                     toggle like
///
/// /playlists                           create (private by default)
/// /playlists/search                    public title search
/// /playlists/{id}                      detail + membership page, update, delete
/// /playlists/{id}/visibility           toggle public/private
/// /playlists/{id}/videos/{video_id}    add, remove membership
///
/// /channels/{id}/videos                channel listing (owner sees drafts)
/// /channels/{id}/stats                 statistics summary
/// /channels/{id}/subscribers           subscriber summaries
/// /channels/{id}/subscription          toggle subscription
/// /channels/{id}/playlists             channel playlists
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(videos::router())
        .merge(comments::router())
        .merge(posts::router())
        .merge(playlists::router())
        .merge(channels::router())
}
