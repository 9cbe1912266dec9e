use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::{get_jwt_token, hash_password_argon2, verify_password_argon2, AuthUser},
    config::AppConfig,
    data_formats::{
        required, AuthResponse, LoginRequest, MessageWrapper, RegisterRequest, UserResponse,
    },
    db_helpers::{get_profile_by_id_in_db, get_user_by_name, insert_user, NewUser},
    errors::RequestError,
    extractors::JsonBody,
    JsonResponse,
};

use super::JsonResult;

// ----------------- Auth Handlers -----------------
pub async fn register_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(config): Extension<Arc<AppConfig>>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<JsonResponse<AuthResponse>, RequestError> {
    let name = required(request.name);
    let password = request.password.filter(|password| !password.is_empty());
    let (name, password) = match (name, password) {
        (Some(name), Some(password)) => (name, password),
        _ => return Err(RequestError::BadRequest("Name and password are required")),
    };

    let password = hash_password_argon2(password).await?;
    let user = insert_user(
        &pool,
        NewUser {
            name,
            email: required(request.email),
            password,
            avatar: required(request.avatar),
            bio: request.bio.unwrap_or_default(),
        },
    )
    .await
    .map_err(|e| e.on_unique_violation("Username or email already exists"))?;

    let token = get_jwt_token(&user.id, &config)?;
    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(AuthResponse::new(user, token))))
}

pub async fn login_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(config): Extension<Arc<AppConfig>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> JsonResult<AuthResponse> {
    let name = required(request.name);
    let password = request.password.filter(|password| !password.is_empty());
    let (name, password) = match (name, password) {
        (Some(name), Some(password)) => (name, password),
        _ => return Err(RequestError::BadRequest("Name and password are required")),
    };

    let user = get_user_by_name(&pool, &name)
        .await?
        .ok_or(RequestError::NotAuthorized("Invalid credentials"))?;
    if !verify_password_argon2(password, user.password.clone()).await? {
        return Err(RequestError::NotAuthorized("Invalid credentials"));
    }

    let token = get_jwt_token(&user.id, &config)?;
    Ok(Json(AuthResponse::new(user, token)))
}

pub async fn get_current_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
) -> JsonResult<UserResponse> {
    let profile = get_profile_by_id_in_db(&pool, &user.id)
        .await?
        .ok_or(RequestError::NotFound("User not found"))?;
    Ok(Json(UserResponse::new(profile, true)))
}

/// Tokens are stateless; the client simply drops its copy.
pub async fn logout_user() -> Json<MessageWrapper> {
    Json(MessageWrapper::new("Logged out successfully"))
}
