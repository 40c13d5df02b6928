/// Authentication endpoints
///
/// - `POST /auth/register`: create an account and receive tokens
/// - `POST /auth/login`: exchange credentials for tokens
/// - `POST /auth/refresh`: exchange a refresh token for a new access token
/// - `GET /auth/me`, `PUT /auth/me`, `DELETE /auth/me`: the caller's profile

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Json,
};
use axum::{extract::State, http::StatusCode, Extension};
use decisionlog_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::user::{CreateUser, UpdateUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(
        min = 8,
        max = 128,
        message = "Password must be between 8 and 128 characters"
    ))]
    pub password: String,

    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Returned by register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Profile changes; an empty string clears the field
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub full_name: Option<String>,

    #[validate(length(max = 512, message = "Avatar URL must be at most 512 characters"))]
    pub avatar_url: Option<String>,
}

fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn issue_tokens(state: &AppState, user: User) -> ApiResult<AuthResponse> {
    let pair = jwt::issue_token_pair(user.id, state.jwt_secret())?;

    Ok(AuthResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        token_type: "bearer",
        user,
    })
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    password::validate_password_strength(&req.password)
        .map_err(|e| ApiError::invalid_field("password", e))?;

    let email = req.email.trim().to_string();

    if User::email_exists(&state.db, &email).await? {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email,
            password_hash,
            full_name: req.full_name.filter(|n| !n.trim().is_empty()),
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(issue_tokens(&state, user)?))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = User::find_by_email(&state.db, req.email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login failed: wrong password");
        return Err(invalid());
    }

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(issue_tokens(&state, user)?))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse {
        access_token,
        token_type: "bearer",
    }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    // A valid token for a deleted account is no longer a valid identity
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    Ok(Json(user))
}

pub async fn update_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let update = UpdateUser {
        password_hash: None,
        full_name: clearable(req.full_name),
        avatar_url: clearable(req.avatar_url),
    };

    let user = if update.is_empty() {
        User::find_by_id(&state.db, auth.user_id).await?
    } else {
        User::update(&state.db, auth.user_id, update).await?
    };

    let user = user.ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    Ok(Json(user))
}

pub async fn delete_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<StatusCode> {
    if !User::delete(&state.db, auth.user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %auth.user_id, "User account deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let ok = RegisterRequest {
            email: "a@example.com".to_string(),
            password: "decide2024".to_string(),
            full_name: None,
        };
        assert!(ok.validate().is_ok());

        let bad = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            full_name: None,
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_clearable() {
        assert_eq!(clearable(None), None);
        assert_eq!(clearable(Some("  ".to_string())), Some(None));
        assert_eq!(clearable(Some(" Ada ".to_string())), Some(Some("Ada".to_string())));
    }
}
