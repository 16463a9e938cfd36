use super::error::*;
use super::validate;
use crate::application_port::{
    AccessGrant, AuthError, AuthService, AuthTokens, ContentService, ContentUpdate, LoginInput,
    SeedOutcome,
};
use crate::domain_model::{PaginationLimits, Subject};
use crate::server::Server;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub subject: Subject,
    pub tokens: AuthTokens,
}

pub async fn login(
    body: LoginRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if body.username.trim().is_empty() || body.password.is_empty() {
        return Err(reject_with(ApiRejection::validation(
            "username and password are required",
        )));
    }

    let login_result = auth_service
        .login(LoginInput {
            username: body.username,
            password: body.password,
        })
        .await
        .map_err(|e| reject_with(ApiRejection::from(e)))?;

    info!(subject = %login_result.subject, "login successful");
    Ok(warp::reply::json(&ApiResponse::ok(LoginResponse {
        subject: login_result.subject,
        tokens: login_result.tokens,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn refresh(
    body: RefreshRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if body.refresh_token.is_empty() {
        return Err(reject_with(ApiRejection::validation(
            "refresh token is required",
        )));
    }

    let grant: AccessGrant = auth_service
        .refresh(&body.refresh_token)
        .await
        .map_err(|e| reject_with(ApiRejection::from(e)))?;

    Ok(warp::reply::json(&ApiResponse::ok(grant)))
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse;

pub async fn logout(
    body: RefreshRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    auth_service
        .logout(&body.refresh_token)
        .await
        .map_err(|e| reject_with(ApiRejection::from(e)))?;

    Ok(warp::reply::json(&ApiResponse::ok(LogoutResponse)))
}

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn get_content(
    query: ContentQuery,
    limits: PaginationLimits,
    content_service: Arc<dyn ContentService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let request = validate::validate_pagination(query.page, query.limit, limits)
        .map_err(|msg| reject_with(ApiRejection::validation(msg)))?;

    let page = content_service
        .get_content(request)
        .await
        .map_err(|e| reject_with(ApiRejection::from(e)))?;

    // Bare page body, not the envelope: this is the public read endpoint and
    // the cached value is the response.
    Ok(warp::reply::json(&page))
}

#[derive(Debug, Deserialize)]
pub struct ContentUpdateRequest {
    pub team: Option<Vec<crate::domain_model::TeamMember>>,
    pub careers: Option<Vec<crate::domain_model::JobPosting>>,
}

#[derive(Debug, Serialize)]
pub struct ContentUpdateResponse;

pub async fn update_content(
    subject: Subject,
    body: ContentUpdateRequest,
    content_service: Arc<dyn ContentService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let mut update = ContentUpdate {
        team: body.team,
        careers: body.careers,
    };
    validate::sanitize_update(&mut update);
    validate::validate_update(&update)
        .map_err(|msg| reject_with(ApiRejection::validation(msg)))?;

    content_service
        .update_content(update)
        .await
        .map_err(|e| reject_with(ApiRejection::from(e)))?;

    info!(subject = %subject, "content updated");
    Ok(warp::reply::json(&ApiResponse::ok(ContentUpdateResponse)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub team: usize,
    pub careers: usize,
}

pub async fn health(server: Arc<Server>) -> Result<impl warp::Reply, warp::Rejection> {
    let counts = server
        .content_service
        .counts()
        .await
        .map_err(|e| reject_with(ApiRejection::from(e)))?;

    Ok(warp::reply::json(&HealthResponse {
        status: "ok",
        uptime_secs: server.uptime_secs(),
        team: counts.team,
        careers: counts.careers,
    }))
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: &'static str,
}

pub async fn seed(server: Arc<Server>) -> Result<impl warp::Reply, warp::Rejection> {
    let outcome = server
        .content_service
        .seed(server.seed_data())
        .await
        .map_err(|e| reject_with(ApiRejection::from(e)))?;

    let message = match outcome {
        SeedOutcome::Seeded => "content store seeded",
        SeedOutcome::AlreadyPopulated => "content store already has data",
    };
    Ok(warp::reply::json(&ApiResponse::ok(SeedResponse { message })))
}

/// Pull the bearer token out of an Authorization header value that may be
/// absent entirely.
pub fn bearer_token(header: Option<String>) -> Result<String, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;
    match header.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(AuthError::MalformedToken),
    }
}
