use crate::domain_model::{Subject, TokenKind};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("missing token")]
    MissingToken,
    #[error("malformed token")]
    MalformedToken,
    #[error("invalid or expired token")]
    InvalidOrExpiredToken,
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub subject: Subject,
    pub tokens: AuthTokens,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessToken(pub String);

#[derive(Debug, Clone, Serialize)]
pub struct RefreshToken(pub String);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_expires_at: DateTime<Utc>,
}

/// Result of a successful refresh: a fresh access token, nothing else. The
/// refresh token stays valid until it expires or is revoked.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    pub access_token: AccessToken,
    pub access_token_expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub subject: Subject,
    pub kind: TokenKind,
    pub expires_at: DateTime<Utc>,
    pub jti: String,
}

/// Signs and verifies self-contained tokens. Verification here is purely
/// cryptographic; whether a refresh token is still registered is the session
/// store's business.
#[async_trait::async_trait]
pub trait TokenCodec: Send + Sync {
    async fn issue_access_token(
        &self,
        subject: &Subject,
    ) -> Result<(AccessToken, DateTime<Utc>), AuthError>;
    async fn issue_refresh_token(
        &self,
        subject: &Subject,
    ) -> Result<(RefreshToken, DateTime<Utc>), AuthError>;
    async fn verify_access_token(&self, token: &AccessToken) -> Result<TokenClaims, AuthError>;
    async fn verify_refresh_token(&self, token: &RefreshToken) -> Result<TokenClaims, AuthError>;
}

/// Checks presented credentials against the configured admin identity.
/// Implementations must not reveal whether the username or the password was
/// the wrong half.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError>;
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError>;
    /// Mint a new access token against a live refresh token. Multi-use: the
    /// registration survives until natural expiry or logout.
    async fn refresh(&self, refresh_token: &str) -> Result<AccessGrant, AuthError>;
    /// Idempotent; succeeds whether or not the token was registered.
    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError>;
    async fn verify_access(&self, token: &str) -> Result<Subject, AuthError>;
}
