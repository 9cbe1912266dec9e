mod authentication;
pub mod config;
mod data_formats;
mod db_helpers;
mod errors;
mod extractors;
mod handlers;
pub mod models;

use anyhow::Context;
pub use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
use config::AppConfig;
pub use data_formats::*;
pub use errors::RequestErrorJson;
use handlers::*;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub type JsonResponse<T> = (StatusCode, Json<T>);

const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub async fn run_app(config: AppConfig) -> Result<()> {
    let address = config.socket_addr();
    let app = build_app(config).await?;
    tracing::info!(%address, "OUTDOG API server listening");
    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await
        .context("Server stopped unexpectedly")?;
    Ok(())
}

/// Opens the database and wires the router with its shared state and layers.
pub async fn build_app(config: AppConfig) -> Result<Router> {
    let db = init_db(&config.database_url).await?;
    Ok(make_router()
        .layer(Extension(Arc::new(db)))
        .layer(Extension(Arc::new(config)))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http()))
}

pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        tracing::info!(db_url, "creating database");
        Sqlite::create_database(db_url)
            .await
            .with_context(|| format!("Failed to create database {db_url}"))?;
    } else {
        tracing::debug!(db_url, "database already exists");
    }
    let pool = SqlitePool::connect(db_url)
        .await
        .with_context(|| format!("Failed to connect to {db_url}"))?;
    tracing::info!("running migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("migrations completed");
    Ok(pool)
}

pub fn make_router() -> Router {
    Router::new()
        .route("/health", get(health))
        // auth
        .route("/api/auth/register", post(register_user))
        .route("/api/auth/login", post(login_user))
        .route("/api/auth/me", get(get_current_user))
        .route("/api/auth/logout", post(logout_user))
        // users
        .route(
            "/api/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route(
            "/api/users/:id/follow",
            post(follow_user).delete(unfollow_user),
        )
        .route("/api/users/:id/followers", get(get_followers))
        .route("/api/users/:id/following", get(get_following))
        .route("/api/users/:id/posts", get(get_user_posts))
        // posts
        .route("/api/posts", get(list_posts).post(create_post))
        .route(
            "/api/posts/:id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/posts/:id/like", post(like_post).delete(unlike_post))
        .route(
            "/api/posts/:id/comments",
            get(get_comments).post(create_comment),
        )
        // comments, reachable under both prefixes
        .route(
            "/api/posts/comments/:id",
            put(update_comment).delete(delete_comment),
        )
        .route(
            "/api/posts/comments/:id/like",
            post(like_comment).delete(unlike_comment),
        )
        .route(
            "/api/comments/:id",
            put(update_comment).delete(delete_comment),
        )
        .route(
            "/api/comments/:id/like",
            post(like_comment).delete(unlike_comment),
        )
        // shop
        .route("/api/products", get(list_products))
        .route("/api/products/:id", get(get_product))
        .route("/api/cart", get(get_cart).delete(clear_cart))
        .route("/api/cart/items", post(add_cart_item))
        .route(
            "/api/cart/items/:id",
            put(update_cart_item).delete(remove_cart_item),
        )
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/:id", get(get_order))
        .route("/api/orders/:id/status", put(update_order_status))
        .route("/api/orders/:id/review", post(review_order))
        // messages
        .route("/api/messages", post(send_message))
        .route("/api/messages/sessions", get(list_sessions))
        .route("/api/messages/sessions/:id", get(get_session_messages))
        .route("/api/messages/:id/read", put(mark_message_read))
        .route("/api/messages/read/:id", put(mark_message_read))
        // notifications
        .route("/api/notifications", get(list_notifications))
        .route(
            "/api/notifications/unread-count",
            get(unread_notification_count),
        )
        .route("/api/notifications/read-all", put(mark_all_notifications_read))
        .route("/api/notifications/:id/read", put(mark_notification_read))
        .route("/api/notifications/read/:id", put(mark_notification_read))
        // search
        .route("/api/search", get(search))
        .fallback(not_found)
}
