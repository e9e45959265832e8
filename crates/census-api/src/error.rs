//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use census_models::ValidationError;
use serde::Serialize;
use thiserror::Error;

use crate::services::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

const PARTICIPANT_NOT_FOUND: &str = "Participant not found";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{error}")]
    NotFound {
        error: String,
        message: Option<String>,
    },

    #[error("{error}: {message}")]
    BadRequest { error: String, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Duplicate entry")]
    Duplicate,

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn participant_not_found() -> Self {
        Self::NotFound {
            error: PARTICIPANT_NOT_FOUND.to_string(),
            message: None,
        }
    }

    pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Duplicate => StatusCode::CONFLICT,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::Unauthorized(msg) => ErrorResponse::with_message("Unauthorized", msg),
            ApiError::Forbidden(msg) => ErrorResponse::with_message("Forbidden", msg),
            ApiError::NotFound { error, message } => ErrorResponse {
                error: error.clone(),
                message: message.clone(),
            },
            ApiError::BadRequest { error, message } => ErrorResponse::with_message(error, message),
            ApiError::Validation(e) => ErrorResponse::new(e.to_string()),
            ApiError::Duplicate => ErrorResponse::with_message(
                "Duplicate entry",
                "A participant with the same email already exists.",
            ),
            ApiError::RateLimited => ErrorResponse::new("Rate limited"),
            ApiError::Internal(msg) => ErrorResponse::with_message("Internal error", msg),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::NotFound => ApiError::participant_not_found(),
            StoreError::Duplicate => ApiError::Duplicate,
            StoreError::Invalid(e) => ApiError::Validation(*e),
            StoreError::NoActiveWork => ApiError::NotFound {
                error: "Work details not found".to_string(),
                message: Some(err.to_string()),
            },
            StoreError::NoActiveHome => ApiError::NotFound {
                error: "Home details not found".to_string(),
                message: Some(err.to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    fn with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: Some(message.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

/// A 500 body without any detail.
pub(crate) fn redacted_internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal error")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::participant_not_found().status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Duplicate.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::from(ValidationError::InvalidDob).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::forbidden("no").status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_store_errors_map_to_bodies() {
        let body = ApiError::from(StoreError::NoActiveHome).body();
        assert_eq!(body.error, "Home details not found");
        assert_eq!(
            body.message.as_deref(),
            Some("No active home details available for this participant")
        );

        let body = ApiError::from(StoreError::Invalid(ValidationError::MissingWork)).body();
        assert_eq!(body.error, "Missing fields in work");
        assert!(body.message.is_none());
    }

    #[test]
    fn test_internal_error_carries_detail() {
        let body = ApiError::internal("signer failed").body();
        assert_eq!(body.error, "Internal error");
        assert_eq!(body.message.as_deref(), Some("signer failed"));
    }
}
