use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use thiserror::Error;

use crate::JsonResponse;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("{0}")]
    NotAuthorized(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("Internal Server Error")]
    ServerError,
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct RequestErrorJson {
    pub error: String,
}

impl RequestErrorJson {
    pub fn new(error: &str) -> RequestErrorJson {
        RequestErrorJson {
            error: error.to_string(),
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl From<JsonRejection> for RequestError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "rejected request body");
        RequestError::BadRequest("Invalid JSON body")
    }
}

impl From<PathRejection> for RequestError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "rejected path parameter");
        RequestError::BadRequest("Invalid path parameter")
    }
}

impl From<QueryRejection> for RequestError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "rejected query string");
        RequestError::BadRequest("Invalid query parameters")
    }
}

impl RequestError {
    /// Turns a SQLite unique-constraint failure into a 409 with `message`.
    pub fn on_unique_violation(self, message: &'static str) -> Self {
        let is_unique_violation = matches!(
            &self,
            RequestError::DatabaseError(sqlx::Error::Database(e))
                if e.message().contains("UNIQUE constraint failed")
        );
        if is_unique_violation {
            RequestError::Conflict(message)
        } else {
            self
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RequestError::NotAuthorized(_) => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden(_) => StatusCode::FORBIDDEN,
            RequestError::NotFound(_) => StatusCode::NOT_FOUND,
            RequestError::Conflict(_) => StatusCode::CONFLICT,
            RequestError::ServerError
            | RequestError::DatabaseError(_)
            | RequestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_json_response(&self) -> JsonResponse<RequestErrorJson> {
        let status_code = self.status_code();
        let json = match self {
            RequestError::BadRequest(message)
            | RequestError::NotAuthorized(message)
            | RequestError::Forbidden(message)
            | RequestError::NotFound(message)
            | RequestError::Conflict(message) => RequestErrorJson::new(message),
            RequestError::ServerError => RequestErrorJson::new("Internal Server Error"),
            RequestError::DatabaseError(e) => {
                tracing::error!(error = %e, "database error");
                RequestErrorJson::new("Internal Server Error")
            }
            RequestError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                RequestErrorJson::new("Internal Server Error")
            }
        };
        (status_code, Json(json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_message() {
        let (status, Json(body)) =
            RequestError::Conflict("Already liked this post").to_json_response();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error, "Already liked this post");

        let (status, _) = RequestError::Forbidden("nope").to_json_response();
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn internal_errors_are_not_echoed() {
        let error = RequestError::Internal(anyhow::anyhow!("secret detail"));
        let (status, Json(body)) = error.to_json_response();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal Server Error");
    }

    #[test]
    fn non_unique_errors_pass_through() {
        let error = RequestError::DatabaseError(sqlx::Error::RowNotFound)
            .on_unique_violation("duplicate");
        assert!(matches!(error, RequestError::DatabaseError(_)));
    }
}
