use super::handler::ApiResponse;
use crate::application_port::{AuthError, ContentError};
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("Validation Error")]
    ValidationError,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Access denied. No token provided.")]
    MissingToken,
    #[error("Malformed token")]
    MalformedToken,
    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,
    #[error("Route not found")]
    NotFound,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    fn status(self) -> StatusCode {
        match self {
            ApiErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ApiErrorCode::InvalidCredentials
            | ApiErrorCode::MissingToken
            | ApiErrorCode::MalformedToken => StatusCode::UNAUTHORIZED,
            ApiErrorCode::InvalidOrExpiredToken => StatusCode::FORBIDDEN,
            ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Rejection payload: the taxonomy code plus a human-readable detail line
/// (validation failures would be useless without one).
#[derive(Debug)]
pub struct ApiRejection {
    pub code: ApiErrorCode,
    pub message: String,
}

impl reject::Reject for ApiRejection {}

impl ApiRejection {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::ValidationError,
            message: message.into(),
        }
    }

    fn internal<E: std::fmt::Display>(error: E) -> Self {
        warn!("internal error: {error}");
        ApiErrorCode::InternalError.into()
    }
}

impl From<ApiErrorCode> for ApiRejection {
    fn from(code: ApiErrorCode) -> Self {
        Self {
            code,
            message: code.to_string(),
        }
    }
}

impl From<AuthError> for ApiRejection {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => ApiErrorCode::InvalidCredentials.into(),
            AuthError::MissingToken => ApiErrorCode::MissingToken.into(),
            AuthError::MalformedToken => ApiErrorCode::MalformedToken.into(),
            AuthError::InvalidOrExpiredToken => ApiErrorCode::InvalidOrExpiredToken.into(),
            AuthError::Store(e) | AuthError::InternalError(e) => ApiRejection::internal(e),
        }
    }
}

impl From<ContentError> for ApiRejection {
    fn from(error: ContentError) -> Self {
        match error {
            ContentError::Validation(message) => ApiRejection::validation(message),
            ContentError::Store(e) | ContentError::InternalError(e) => ApiRejection::internal(e),
        }
    }
}

/// Shorthand for bailing out of a handler.
pub fn reject_with(error: impl Into<ApiRejection>) -> Rejection {
    reject::custom(error.into())
}

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let (code, message) = if let Some(rejection) = err.find::<ApiRejection>() {
        (rejection.code, rejection.message.clone())
    } else if err.is_not_found() {
        (ApiErrorCode::NotFound, ApiErrorCode::NotFound.to_string())
    } else if let Some(e) = err.find::<warp::body::BodyDeserializeError>() {
        (ApiErrorCode::ValidationError, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (ApiErrorCode::ValidationError, e.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (ApiErrorCode::NotFound, "method not allowed".to_string())
    } else {
        warn!("unhandled rejection: {err:?}");
        (
            ApiErrorCode::InternalError,
            format!("Unhandled error: {err:?}"),
        )
    };

    let json = warp::reply::json(&ApiResponse::<()>::err(code, message));
    Ok(warp::reply::with_status(json, code.status()))
}
