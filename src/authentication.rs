use std::sync::Arc;

use crate::config::AppConfig;
use crate::db_helpers::get_user_by_id;
use crate::errors::RequestError;
use anyhow::{Context, Result};
use argon2::PasswordVerifier;
use argon2::{password_hash::SaltString, Argon2, PasswordHash};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use time::OffsetDateTime;

#[derive(Debug, Serialize, Deserialize)]
struct AuthClaim {
    id: String,
    exp: i64,
}

pub struct AuthUser {
    pub id: String,
}

pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    pub fn get_id(&self) -> Option<&str> {
        self.0.as_ref().map(|a| a.id.as_str())
    }
}

fn app_config(parts: &Parts) -> Result<Arc<AppConfig>, RequestError> {
    parts
        .extensions
        .get::<Arc<AppConfig>>()
        .cloned()
        .ok_or_else(|| {
            tracing::error!("AppConfig extension missing from router");
            RequestError::ServerError
        })
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync + 'static,
{
    type Rejection = RequestError;
    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let header = match parts.headers.get("Authorization") {
            Some(header) => header,
            None => return Ok(MaybeUser(None)),
        };
        let header = header.to_str().map_err(|_| {
            tracing::debug!("authorization header is not valid ascii");
            RequestError::Forbidden("Invalid or expired token")
        })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            tracing::debug!("authorization header without bearer prefix");
            RequestError::Forbidden("Invalid or expired token")
        })?;

        let config = app_config(parts)?;
        let id = verify_jwt_token(token, &config.jwt_secret)?;

        Ok(MaybeUser(Some(AuthUser { id })))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync + 'static,
{
    type Rejection = RequestError;
    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let user = match MaybeUser::from_request_parts(parts, state).await? {
            MaybeUser(Some(user)) => user,
            MaybeUser(None) => return Err(RequestError::NotAuthorized("Access token required")),
        };
        // Tokens stay valid after their account is deleted.
        let pool = parts
            .extensions
            .get::<Arc<SqlitePool>>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("SqlitePool extension missing from router");
                RequestError::ServerError
            })?;
        if get_user_by_id(&pool, &user.id).await?.is_none() {
            tracing::debug!(user_id = %user.id, "token for a deleted user");
            return Err(RequestError::NotAuthorized("User no longer exists"));
        }
        Ok(user)
    }
}

pub fn get_jwt_token(id: &str, config: &AppConfig) -> Result<String> {
    let expiry_date = OffsetDateTime::now_utc() + time::Duration::days(config.jwt_expiry_days);
    let claim = AuthClaim {
        id: id.to_owned(),
        exp: expiry_date.unix_timestamp(),
    };

    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claim,
        &jsonwebtoken::EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .context("Failed to generate jwt token")
}

pub fn verify_jwt_token(token: &str, jwt_secret: &str) -> Result<String, RequestError> {
    let token_data = jsonwebtoken::decode::<AuthClaim>(
        token,
        &jsonwebtoken::DecodingKey::from_secret(jwt_secret.as_ref()),
        &jsonwebtoken::Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "rejected jwt");
        RequestError::Forbidden("Invalid or expired token")
    })?;
    let claim = token_data.claims;
    if claim.exp < OffsetDateTime::now_utc().unix_timestamp() {
        return Err(RequestError::Forbidden("Invalid or expired token"));
    }
    Ok(claim.id)
}

pub async fn verify_password_argon2(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        let hash = PasswordHash::new(hash.as_str())
            .map_err(|_| anyhow::anyhow!("Stored password hash is malformed"))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok())
    })
    .await
    .context("Failed to verify password")?
}

pub async fn hash_password_argon2(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(rand::thread_rng());
        let hash = PasswordHash::generate(Argon2::default(), password, salt.as_salt())
            .map_err(|_| anyhow::anyhow!("Failed to hash password"))?;
        Ok(hash.to_string())
    })
    .await
    .context("Failed to hash password")?
}
