use crate::application_port::AuthError;
use crate::domain_port::{SessionRecord, SessionStore};
use crate::infra_memory::ExpiringStore;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;

/// Refresh-token registry over an [`ExpiringStore`]. Tokens are keyed by
/// their SHA-256 digest so the raw capability string never sits in memory
/// longer than the request that carried it.
pub struct MemorySessionStore {
    store: Arc<ExpiringStore<SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new(store: Arc<ExpiringStore<SessionRecord>>) -> Self {
        Self { store }
    }

    fn key(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn register(
        &self,
        token: &str,
        record: SessionRecord,
        ttl: Duration,
    ) -> Result<(), AuthError> {
        self.store.put(Self::key(token), record, ttl);
        Ok(())
    }

    async fn lookup(&self, token: &str) -> Result<Option<SessionRecord>, AuthError> {
        Ok(self.store.get_if_live(&Self::key(token)))
    }

    async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        self.store.remove(&Self::key(token));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::{Subject, TokenKind};
    use tokio::time::advance;

    fn record() -> SessionRecord {
        SessionRecord {
            subject: Subject("admin".to_string()),
            kind: TokenKind::Refresh,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn registered_token_is_live_until_ttl() {
        let store = MemorySessionStore::new(Arc::new(ExpiringStore::new()));
        store
            .register("tok-1", record(), Duration::from_secs(60))
            .await
            .unwrap();

        let found = store.lookup("tok-1").await.unwrap();
        assert!(matches!(found, Some(r) if r.subject.0 == "admin"));

        advance(Duration::from_secs(60)).await;
        assert!(store.lookup("tok-1").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn revoke_is_final_and_idempotent() {
        let store = MemorySessionStore::new(Arc::new(ExpiringStore::new()));
        store
            .register("tok-1", record(), Duration::from_secs(60))
            .await
            .unwrap();

        store.revoke("tok-1").await.unwrap();
        assert!(store.lookup("tok-1").await.unwrap().is_none());
        store.revoke("tok-1").await.unwrap();
        store.revoke("never-registered").await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_tokens_are_independent() {
        let store = MemorySessionStore::new(Arc::new(ExpiringStore::new()));
        store
            .register("tok-1", record(), Duration::from_secs(60))
            .await
            .unwrap();
        store
            .register("tok-2", record(), Duration::from_secs(60))
            .await
            .unwrap();

        store.revoke("tok-1").await.unwrap();
        assert!(store.lookup("tok-1").await.unwrap().is_none());
        assert!(store.lookup("tok-2").await.unwrap().is_some());
    }
}
