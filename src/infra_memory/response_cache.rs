use crate::domain_model::{ContentPage, PageRequest};
use crate::infra_memory::ExpiringStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// TTL cache of paginated content responses, keyed by the canonical
/// pagination signature. Bounded and oldest-inserted-first: a page that keeps
/// being read is still evicted before a page inserted after it.
pub struct ResponseCache {
    store: Arc<ExpiringStore<ContentPage>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            store: Arc::new(ExpiringStore::with_capacity(max_entries)),
            ttl,
        }
    }

    pub fn get(&self, request: PageRequest) -> Option<ContentPage> {
        self.store.get_if_live(&request.signature())
    }

    pub fn put(&self, request: PageRequest, page: ContentPage) {
        self.store.put(request.signature(), page, self.ttl);
    }

    /// Drop every cached page. The write path calls this before reporting
    /// success so the next read cannot observe pre-write data; reads already
    /// in flight may still return a previously cached page within its TTL.
    pub fn invalidate_all(&self) {
        let dropped = self.store.len();
        self.store.clear();
        debug!(dropped, "response cache invalidated");
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Store handle for wiring the background sweeper.
    pub fn store(&self) -> Arc<ExpiringStore<ContentPage>> {
        self.store.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::Pagination;
    use tokio::time::advance;

    fn page_of(page: u32, limit: u32) -> ContentPage {
        ContentPage {
            team: vec![],
            careers: vec![],
            pagination: Pagination {
                page,
                limit,
                total_team: 0,
                total_careers: 0,
                total_pages_team: 0,
                total_pages_careers: 0,
            },
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hit_within_ttl_then_expires() {
        let cache = ResponseCache::new(50, Duration::from_secs(300));
        let req = PageRequest { page: 1, limit: 10 };
        cache.put(req, page_of(1, 10));

        advance(Duration::from_secs(299)).await;
        assert!(cache.get(req).is_some());

        advance(Duration::from_secs(1)).await;
        assert!(cache.get(req).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn full_cache_evicts_first_inserted_signature() {
        let cache = ResponseCache::new(2, Duration::from_secs(300));
        let first = PageRequest { page: 1, limit: 10 };
        let second = PageRequest { page: 2, limit: 10 };
        let third = PageRequest { page: 3, limit: 10 };

        cache.put(first, page_of(1, 10));
        cache.put(second, page_of(2, 10));
        // Touching the first entry must not save it.
        assert!(cache.get(first).is_some());
        cache.put(third, page_of(3, 10));

        assert!(cache.get(first).is_none());
        assert!(cache.get(second).is_some());
        assert!(cache.get(third).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_all_misses_every_signature() {
        let cache = ResponseCache::new(50, Duration::from_secs(300));
        for page in 1..=5 {
            let req = PageRequest { page, limit: 10 };
            cache.put(req, page_of(page, 10));
        }
        cache.invalidate_all();
        for page in 1..=5 {
            assert!(cache.get(PageRequest { page, limit: 10 }).is_none());
        }
        assert_eq!(cache.len(), 0);
    }
}
