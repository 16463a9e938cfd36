use crate::application_port::AuthError;
use crate::domain_model::{Subject, TokenKind};
use std::time::Duration;

/// What the registry remembers about an outstanding refresh token. The token
/// string itself is the capability; the record only ties it back to an
/// identity and its kind.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub subject: Subject,
    pub kind: TokenKind,
}

/// Registry of live refresh tokens. A token is valid iff it is present and
/// unexpired here; losing the registry (process restart) invalidates every
/// outstanding refresh token, which callers must tolerate.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Register a refresh token with its remaining lifetime.
    async fn register(
        &self,
        token: &str,
        record: SessionRecord,
        ttl: Duration,
    ) -> Result<(), AuthError>;

    /// Look a token up without consuming it. `None` covers both
    /// never-registered and expired registrations.
    async fn lookup(&self, token: &str) -> Result<Option<SessionRecord>, AuthError>;

    /// Drop a registration. Idempotent; revoking an absent token is not an
    /// error and must not be distinguishable from revoking a live one.
    async fn revoke(&self, token: &str) -> Result<(), AuthError>;
}
