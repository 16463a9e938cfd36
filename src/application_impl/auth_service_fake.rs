use crate::application_port::*;
use crate::domain_model::Subject;
use chrono::{Duration, Utc};

#[derive(Debug)]
pub struct FakeAuthService;

impl FakeAuthService {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FakeAuthService {
    fn default() -> Self {
        Self::new()
    }
}

// Minimal fake for wiring and frontend work: any credentials log in, tokens
// are transparent strings, nothing is registered or revoked.
#[async_trait::async_trait]
impl AuthService for FakeAuthService {
    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError> {
        let now = Utc::now();
        Ok(LoginResult {
            subject: Subject(request.username.clone()),
            tokens: AuthTokens {
                access_token: AccessToken(format!("fake-access-token:{}", request.username)),
                refresh_token: RefreshToken(format!("fake-refresh-token:{}", request.username)),
                access_token_expires_at: now + Duration::hours(1),
                refresh_token_expires_at: now + Duration::days(7),
            },
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AccessGrant, AuthError> {
        match refresh_token.strip_prefix("fake-refresh-token:") {
            Some(username) => Ok(AccessGrant {
                access_token: AccessToken(format!("fake-access-token:{username}")),
                access_token_expires_at: Utc::now() + Duration::hours(1),
            }),
            None => Err(AuthError::InvalidOrExpiredToken),
        }
    }

    async fn logout(&self, _refresh_token: &str) -> Result<(), AuthError> {
        Ok(())
    }

    async fn verify_access(&self, token: &str) -> Result<Subject, AuthError> {
        match token.strip_prefix("fake-access-token:") {
            Some(username) => Ok(Subject(username.to_string())),
            None => Err(AuthError::MalformedToken),
        }
    }
}
