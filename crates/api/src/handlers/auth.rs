//! Handlers for the `/auth` resource (register, login, refresh, logout).

use std::sync::LazyLock;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use clipstream_cloud::MediaKind;
use clipstream_core::error::CoreError;
use clipstream_db::models::user::{CreateUser, UserProfile};
use clipstream_db::repositories::UserRepo;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::upload::{stage_field, StagedFile};

static FULL_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("static regex"));
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("static regex"));

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Text fields of the multipart `POST /auth/register` body.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, message = "Full name must be at least 3 characters long"),
        regex(
            path = *FULL_NAME_RE,
            message = "Full name must not contain anything other than alphabet and spaces"
        )
    )]
    pub full_name: String,
    #[validate(
        length(min = 3, message = "Username must be at least 3 characters long"),
        regex(
            path = *USERNAME_RE,
            message = "Username must not contain anything other than alphabet and number"
        )
    )]
    pub username: String,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(custom(function = strong_password))]
    pub password: String,
}

fn strong_password(password: &str) -> Result<(), validator::ValidationError> {
    validate_password_strength(password).map_err(|msg| {
        let mut err = validator::ValidationError::new("weak_password");
        err.message = Some(msg.into());
        err
    })
}

/// Request body for `POST /auth/login`. The identifier may be a username
/// or an email address.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserProfile,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Multipart: `full_name`, `username`, `email`, `password` text fields,
/// an `avatar` file (required), and a `cover_image` file (optional).
pub async fn register(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UserProfile>>)> {
    let mut request = RegisterRequest::default();
    let mut avatar: Option<StagedFile> = None;
    let mut cover_image: Option<StagedFile> = None;

    // 1. Drain the multipart body: text fields into the DTO, files to the
    //    staging dir.
    let staged = loop {
        match multipart.next_field().await {
            Err(err) => break Err(AppError::BadRequest(format!("malformed multipart body: {err}"))),
            Ok(None) => break Ok(()),
            Ok(Some(mut field)) => {
                let name = field.name().unwrap_or_default().to_string();
                match name.as_str() {
                    "full_name" => request.full_name = read_text(field).await?,
                    "username" => request.username = read_text(field).await?,
                    "email" => request.email = read_text(field).await?,
                    "password" => request.password = read_text(field).await?,
                    "avatar" => {
                        avatar = Some(stage_field(&state.config.upload_dir, &mut field).await?)
                    }
                    "cover_image" => {
                        cover_image =
                            Some(stage_field(&state.config.upload_dir, &mut field).await?)
                    }
                    other => {
                        tracing::debug!(field = other, "ignoring unknown multipart field");
                    }
                }
            }
        }
    };

    // 2. Validate before anything durable happens; staged files are
    //    removed on every early exit.
    let validation = staged.and_then(|()| {
        request
            .validate()
            .map_err(|errs| AppError::BadRequest(errs.to_string()))
    });
    let avatar = match (validation, avatar) {
        (Err(err), staged_avatar) => {
            remove_staged(staged_avatar.as_ref(), cover_image.as_ref()).await;
            return Err(err);
        }
        (Ok(()), None) => {
            remove_staged(None, cover_image.as_ref()).await;
            return Err(AppError::Core(CoreError::Validation(
                "Avatar is required".into(),
            )));
        }
        (Ok(()), Some(avatar)) => avatar,
    };

    // 3. Upload profile media.
    let uploaded_avatar = state.media.upload(&avatar.path, MediaKind::Image).await;
    avatar.remove().await;
    let uploaded_avatar = match uploaded_avatar {
        Ok(media) => media,
        Err(err) => {
            remove_staged(None, cover_image.as_ref()).await;
            return Err(err.into());
        }
    };

    let uploaded_cover = match cover_image {
        None => None,
        Some(staged) => {
            let uploaded = state.media.upload(&staged.path, MediaKind::Image).await;
            staged.remove().await;
            match uploaded {
                Ok(media) => Some(media),
                Err(err) => {
                    delete_media(&state, &uploaded_avatar.public_id).await;
                    return Err(err.into());
                }
            }
        }
    };

    // 4. Hash the password and insert. A failed insert releases the
    //    uploaded media again.
    let password_hash = hash_password(&request.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        username: request.username,
        full_name: request.full_name,
        email: request.email,
        password_hash,
        avatar_url: uploaded_avatar.url.clone(),
        cover_image_url: uploaded_cover.as_ref().map(|media| media.url.clone()),
    };

    match UserRepo::create(&state.pool, &input).await {
        Ok(user) => Ok((
            StatusCode::CREATED,
            Json(DataResponse::new(UserProfile::from(user))),
        )),
        Err(err) => {
            delete_media(&state, &uploaded_avatar.public_id).await;
            if let Some(cover) = &uploaded_cover {
                delete_media(&state, &cover.public_id).await;
            }
            Err(err.into())
        }
    }
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    if input.username.trim().is_empty() || input.password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Username and password are required".into(),
        )));
    }

    let user = UserRepo::find_by_username_or_email(&state.pool, input.username.trim())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    let response = issue_tokens(&state, user).await?;
    Ok(Json(DataResponse::new(response)))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens. The
/// stored hash rotates, so the presented token is single-use.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    if input.refresh_token.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Refresh token is required".into(),
        )));
    }

    let token_hash = hash_refresh_token(&input.refresh_token);
    let user = UserRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let response = issue_tokens(&state, user).await?;
    Ok(Json(DataResponse::new(response)))
}

/// POST /api/v1/auth/logout
///
/// Clear the stored refresh-token hash. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    UserRepo::set_refresh_token_hash(&state.pool, auth.user_id, None).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate access + refresh tokens, persist the rotated refresh hash,
/// and build the response.
async fn issue_tokens(
    state: &AppState,
    user: clipstream_db::models::user::User,
) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    UserRepo::set_refresh_token_hash(&state.pool, user.id, Some(&refresh_hash)).await?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in,
        user: UserProfile::from(user),
    })
}

/// Read a text field, rejecting oversized values early.
async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed multipart body: {e}")))
}

async fn remove_staged(avatar: Option<&StagedFile>, cover: Option<&StagedFile>) {
    if let Some(staged) = avatar {
        staged.remove().await;
    }
    if let Some(staged) = cover {
        staged.remove().await;
    }
}

/// Best-effort rollback of an uploaded object.
async fn delete_media(state: &AppState, public_id: &str) {
    if let Err(err) = state.media.delete(public_id).await {
        tracing::warn!(public_id, error = %err, "failed to roll back uploaded media");
    }
}
