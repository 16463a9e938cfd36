use crate::application_port::{
    AccessGrant, AccessToken, AuthError, AuthService, AuthTokens, CredentialStore, LoginInput,
    LoginResult, RefreshToken, TokenClaims, TokenCodec,
};
use crate::domain_model::{Subject, TokenKind};
use crate::domain_port::{SessionRecord, SessionStore};
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

/// Credential check against the single configured admin identity. Both halves
/// are compared as SHA-256 digests in constant time, so neither the timing
/// nor the error reveals which half was wrong. The original deployment
/// compared plaintext directly; the digest comparison is the deliberate
/// redesign at this boundary.
pub struct AdminCredentialStore {
    user_digest: [u8; 32],
    pass_digest: [u8; 32],
}

impl AdminCredentialStore {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            user_digest: Sha256::digest(username.as_bytes()).into(),
            pass_digest: Sha256::digest(password.as_bytes()).into(),
        }
    }
}

fn ct_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[async_trait::async_trait]
impl CredentialStore for AdminCredentialStore {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let user_ok = ct_eq(&Sha256::digest(username.as_bytes()).into(), &self.user_digest);
        let pass_ok = ct_eq(&Sha256::digest(password.as_bytes()).into(), &self.pass_digest);
        // Bitwise and, not short-circuit: both digests are always compared.
        Ok(user_ok & pass_ok)
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub signing_key: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    kind: TokenKind,
    exp: i64,
    iat: i64,
    iss: String,
    aud: String,
    jti: String,
}

fn encode_token(
    subject: &Subject,
    kind: TokenKind,
    ttl: Duration,
    cfg: &JwtConfig,
) -> Result<(String, DateTime<Utc>), AuthError> {
    let iat_dt = Utc::now();
    let exp_dt = iat_dt + ttl;
    let claims = Claims {
        sub: subject.0.clone(),
        kind,
        exp: exp_dt.timestamp(),
        iat: iat_dt.timestamp(),
        iss: cfg.issuer.clone(),
        aud: cfg.audience.clone(),
        jti: Uuid::new_v4().to_string(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(&cfg.signing_key),
    )
    .map_err(|e| AuthError::InternalError(e.to_string()))?;
    Ok((token, exp_dt))
}

fn decode_token(token: &str, cfg: &JwtConfig) -> Result<Claims, AuthError> {
    let mut v = Validation::new(Algorithm::HS256);
    v.validate_exp = true;
    v.set_audience(&[cfg.audience.clone()]);
    v.set_issuer(&[cfg.issuer.clone()]);
    let data = decode::<Claims>(token, &DecodingKey::from_secret(&cfg.signing_key), &v).map_err(
        |e| match e.kind() {
            ErrorKind::ExpiredSignature
            | ErrorKind::InvalidSignature
            | ErrorKind::ImmatureSignature => AuthError::InvalidOrExpiredToken,
            _ => AuthError::MalformedToken,
        },
    )?;
    Ok(data.claims)
}

/// HS256 JWT codec. Claims carry the subject, the token kind, and a jti so
/// two logins in the same second still produce distinct token strings.
pub struct JwtHs256Codec {
    cfg: JwtConfig,
}

impl JwtHs256Codec {
    pub fn new(cfg: JwtConfig) -> Self {
        JwtHs256Codec { cfg }
    }

    fn into_claims(&self, claims: Claims) -> TokenClaims {
        TokenClaims {
            subject: Subject(claims.sub),
            kind: claims.kind,
            expires_at: Utc
                .timestamp_opt(claims.exp, 0)
                .single()
                .unwrap_or_else(Utc::now),
            jti: claims.jti,
        }
    }
}

#[async_trait::async_trait]
impl TokenCodec for JwtHs256Codec {
    async fn issue_access_token(
        &self,
        subject: &Subject,
    ) -> Result<(AccessToken, DateTime<Utc>), AuthError> {
        let (token, exp_dt) = encode_token(subject, TokenKind::Access, self.cfg.access_ttl, &self.cfg)?;
        Ok((AccessToken(token), exp_dt))
    }

    async fn issue_refresh_token(
        &self,
        subject: &Subject,
    ) -> Result<(RefreshToken, DateTime<Utc>), AuthError> {
        let (token, exp_dt) =
            encode_token(subject, TokenKind::Refresh, self.cfg.refresh_ttl, &self.cfg)?;
        Ok((RefreshToken(token), exp_dt))
    }

    async fn verify_access_token(&self, token: &AccessToken) -> Result<TokenClaims, AuthError> {
        let claims = decode_token(&token.0, &self.cfg)?;
        if claims.kind != TokenKind::Access {
            return Err(AuthError::MalformedToken);
        }
        Ok(self.into_claims(claims))
    }

    async fn verify_refresh_token(&self, token: &RefreshToken) -> Result<TokenClaims, AuthError> {
        let claims = decode_token(&token.0, &self.cfg)?;
        if claims.kind != TokenKind::Refresh {
            return Err(AuthError::MalformedToken);
        }
        Ok(self.into_claims(claims))
    }
}

pub struct RealAuthService {
    credentials: Arc<dyn CredentialStore>,
    token_codec: Arc<dyn TokenCodec>,
    session_store: Arc<dyn SessionStore>,
}

impl RealAuthService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        token_codec: Arc<dyn TokenCodec>,
        session_store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            credentials,
            token_codec,
            session_store,
        }
    }

    fn ttl_until(until: DateTime<Utc>) -> Duration {
        let secs = (until - Utc::now()).num_seconds();
        Duration::from_secs(if secs <= 0 { 1 } else { secs as u64 })
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError> {
        let LoginInput { username, password } = request;

        if !self.credentials.verify(&username, &password).await? {
            warn!("rejected login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        let subject = Subject(username);
        let (access_token, access_exp) = self.token_codec.issue_access_token(&subject).await?;
        let (refresh_token, refresh_exp) = self.token_codec.issue_refresh_token(&subject).await?;

        self.session_store
            .register(
                &refresh_token.0,
                SessionRecord {
                    subject: subject.clone(),
                    kind: TokenKind::Refresh,
                },
                Self::ttl_until(refresh_exp),
            )
            .await?;

        Ok(LoginResult {
            subject,
            tokens: AuthTokens {
                access_token,
                refresh_token,
                access_token_expires_at: access_exp,
                refresh_token_expires_at: refresh_exp,
            },
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AccessGrant, AuthError> {
        // Registry first: an unregistered or expired token is rejected before
        // any cryptography happens.
        let record = self
            .session_store
            .lookup(refresh_token)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        // Then the token's own signature and kind, against a forged string
        // that somehow matched a registration key.
        let claims = self
            .token_codec
            .verify_refresh_token(&RefreshToken(refresh_token.to_string()))
            .await?;
        if claims.subject != record.subject {
            return Err(AuthError::MalformedToken);
        }

        let (access_token, access_exp) = self
            .token_codec
            .issue_access_token(&record.subject)
            .await?;

        Ok(AccessGrant {
            access_token,
            access_token_expires_at: access_exp,
        })
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.session_store.revoke(refresh_token).await
    }

    async fn verify_access(&self, token: &str) -> Result<Subject, AuthError> {
        let claims = self
            .token_codec
            .verify_access_token(&AccessToken(token.to_string()))
            .await?;
        Ok(claims.subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_memory::{ExpiringStore, MemorySessionStore};

    fn service() -> RealAuthService {
        let codec = JwtHs256Codec::new(JwtConfig {
            issuer: "crewdeck.test".to_string(),
            audience: "crewdeck-admin".to_string(),
            access_ttl: Duration::from_secs(3600),
            refresh_ttl: Duration::from_secs(7 * 24 * 3600),
            signing_key: b"test-secret".to_vec(),
        });
        RealAuthService::new(
            Arc::new(AdminCredentialStore::new("admin", "password123")),
            Arc::new(codec),
            Arc::new(MemorySessionStore::new(Arc::new(ExpiringStore::new()))),
        )
    }

    fn login_input(username: &str, password: &str) -> LoginInput {
        LoginInput {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn login_issues_both_tokens() {
        let svc = service();
        let result = svc.login(login_input("admin", "password123")).await.unwrap();
        assert_eq!(result.subject.0, "admin");
        assert!(result.tokens.access_token_expires_at < result.tokens.refresh_token_expires_at);
    }

    #[tokio::test]
    async fn wrong_user_and_wrong_password_look_the_same() {
        let svc = service();
        let a = svc.login(login_input("nobody", "password123")).await;
        let b = svc.login(login_input("admin", "wrong")).await;
        assert!(matches!(a, Err(AuthError::InvalidCredentials)));
        assert!(matches!(b, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn refresh_mints_a_new_access_token() {
        let svc = service();
        let login = svc.login(login_input("admin", "password123")).await.unwrap();
        let grant = svc.refresh(&login.tokens.refresh_token.0).await.unwrap();
        assert_ne!(grant.access_token.0, login.tokens.access_token.0);
        assert!(grant.access_token_expires_at >= login.tokens.access_token_expires_at);
        // Multi-use: the same refresh token keeps working.
        svc.refresh(&login.tokens.refresh_token.0).await.unwrap();
    }

    #[tokio::test]
    async fn refresh_rejects_unregistered_token() {
        let svc = service();
        let err = svc.refresh("not-a-registered-token").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidOrExpiredToken));
    }

    #[tokio::test]
    async fn registered_access_token_still_fails_the_kind_check() {
        let codec = Arc::new(JwtHs256Codec::new(JwtConfig {
            issuer: "crewdeck.test".to_string(),
            audience: "crewdeck-admin".to_string(),
            access_ttl: Duration::from_secs(3600),
            refresh_ttl: Duration::from_secs(7 * 24 * 3600),
            signing_key: b"test-secret".to_vec(),
        }));
        let store = Arc::new(MemorySessionStore::new(Arc::new(ExpiringStore::new())));
        let svc = RealAuthService::new(
            Arc::new(AdminCredentialStore::new("admin", "password123")),
            codec.clone(),
            store.clone(),
        );

        let login = svc.login(login_input("admin", "password123")).await.unwrap();
        // Plant the access token in the registry; the embedded-kind check is
        // the remaining line of defense and must reject it.
        store
            .register(
                &login.tokens.access_token.0,
                SessionRecord {
                    subject: Subject("admin".to_string()),
                    kind: TokenKind::Refresh,
                },
                Duration::from_secs(60),
            )
            .await
            .unwrap();
        let err = svc.refresh(&login.tokens.access_token.0).await.unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken));
    }

    #[tokio::test]
    async fn unregistered_access_token_is_rejected_at_the_registry() {
        let svc = service();
        let login = svc.login(login_input("admin", "password123")).await.unwrap();
        let err = svc.refresh(&login.tokens.access_token.0).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidOrExpiredToken));
    }

    #[tokio::test]
    async fn logout_makes_refresh_fail_before_natural_expiry() {
        let svc = service();
        let login = svc.login(login_input("admin", "password123")).await.unwrap();
        svc.logout(&login.tokens.refresh_token.0).await.unwrap();
        let err = svc.refresh(&login.tokens.refresh_token.0).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidOrExpiredToken));
        // Logout stays idempotent afterwards.
        svc.logout(&login.tokens.refresh_token.0).await.unwrap();
    }

    #[tokio::test]
    async fn two_logins_yield_independent_refresh_tokens() {
        let svc = service();
        let first = svc.login(login_input("admin", "password123")).await.unwrap();
        let second = svc.login(login_input("admin", "password123")).await.unwrap();
        assert_ne!(first.tokens.refresh_token.0, second.tokens.refresh_token.0);

        svc.logout(&first.tokens.refresh_token.0).await.unwrap();
        assert!(svc.refresh(&first.tokens.refresh_token.0).await.is_err());
        svc.refresh(&second.tokens.refresh_token.0).await.unwrap();
    }

    #[tokio::test]
    async fn verify_access_accepts_valid_and_rejects_garbage() {
        let svc = service();
        let login = svc.login(login_input("admin", "password123")).await.unwrap();
        let subject = svc.verify_access(&login.tokens.access_token.0).await.unwrap();
        assert_eq!(subject.0, "admin");

        let err = svc.verify_access("garbage").await.unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken));
    }

    #[tokio::test]
    async fn verify_access_rejects_refresh_token() {
        let svc = service();
        let login = svc.login(login_input("admin", "password123")).await.unwrap();
        let err = svc
            .verify_access(&login.tokens.refresh_token.0)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken));
    }
}
