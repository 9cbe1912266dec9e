use axum::{http::Uri, Json};

use crate::{errors::RequestError, HealthWrapper};

mod auth;
mod cart;
mod comments;
mod messages;
mod notifications;
mod orders;
mod posts;
mod products;
mod search;
mod users;

pub use auth::*;
pub use cart::*;
pub use comments::*;
pub use messages::*;
pub use notifications::*;
pub use orders::*;
pub use posts::*;
pub use products::*;
pub use search::*;
pub use users::*;

type JsonResult<T> = Result<Json<T>, RequestError>;

// ----------------- Helper Handlers -----------------
pub async fn health() -> Json<HealthWrapper> {
    Json(HealthWrapper {
        status: "ok".to_string(),
        message: "OUTDOG API Server is running".to_string(),
    })
}

pub async fn not_found(uri: Uri) -> RequestError {
    tracing::debug!(%uri, "no route matched");
    RequestError::NotFound("Route not found")
}
