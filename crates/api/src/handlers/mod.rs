pub mod auth;
pub mod comments;
pub mod likes;
pub mod playlists;
pub mod posts;
pub mod stats;
pub mod subscriptions;
pub mod users;
pub mod videos;
