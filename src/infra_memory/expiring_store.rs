use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> Entry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug)]
struct Inner<V> {
    entries: HashMap<String, Entry<V>>,
    /// Insertion order, oldest first. Re-inserting an existing key keeps its
    /// original position; the queue and the map always hold the same keys.
    order: VecDeque<String>,
}

/// TTL-keyed map with lazy-expiry reads and optional capacity bound.
///
/// A lookup on an expired-but-unswept entry behaves exactly like a lookup on
/// a deleted key, so correctness never depends on the sweeper having run; the
/// periodic sweep only bounds memory. Cardinality is small (tens of refresh
/// tokens, a few dozen cached pages), so one coarse lock is enough.
#[derive(Debug)]
pub struct ExpiringStore<V> {
    inner: Mutex<Inner<V>>,
    capacity: Option<usize>,
}

impl<V: Clone> ExpiringStore<V> {
    pub fn new() -> Self {
        Self::with_capacity_opt(None)
    }

    /// A store that holds at most `capacity` entries, evicting the
    /// oldest-inserted entry to admit a new key once full.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_opt(Some(capacity))
    }

    fn with_capacity_opt(capacity: Option<usize>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity,
        }
    }

    /// Insert or replace. Always succeeds; at capacity the oldest-inserted
    /// entry is evicted first.
    pub fn put(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let expires_at = Instant::now() + ttl;
        let mut inner = self.lock();

        if inner.entries.contains_key(&key) {
            inner.entries.insert(key, Entry { value, expires_at });
            return;
        }

        if let Some(capacity) = self.capacity {
            if inner.entries.len() >= capacity {
                if let Some(oldest) = inner.order.pop_front() {
                    inner.entries.remove(&oldest);
                }
            }
        }

        inner.order.push_back(key.clone());
        inner.entries.insert(key, Entry { value, expires_at });
    }

    /// Return the value only while `now < expires_at`.
    pub fn get_if_live(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let inner = self.lock();
        inner
            .entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    /// Idempotent removal.
    pub fn remove(&self, key: &str) {
        let mut inner = self.lock();
        if inner.entries.remove(key).is_some() {
            inner.order.retain(|k| k != key);
        }
    }

    /// Drop every expired entry. Returns how many were reclaimed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut inner = self.lock();
        let before = inner.entries.len();
        let Inner { entries, order } = &mut *inner;
        entries.retain(|_, entry| entry.is_live(now));
        let removed = before - entries.len();
        if removed > 0 {
            order.retain(|k| entries.contains_key(k));
        }
        removed
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<V>> {
        // Writers cannot leave the map inconsistent mid-operation, so a
        // poisoned lock only means a panic elsewhere; keep serving.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<V: Clone> Default for ExpiringStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `store.sweep()` on a fixed period until `cancel` fires. Foreground
/// lookups never wait on this task beyond the lock for one scan pass.
pub fn spawn_sweeper<V>(
    store: Arc<ExpiringStore<V>>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    V: Clone + Send + 'static,
{
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval fires immediately; skip the first tick so the period
        // counts from spawn.
        tick.tick().await;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tick.tick() => {
                    let removed = store.sweep();
                    if removed > 0 {
                        debug!(removed, remaining = store.len(), "swept expired entries");
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, Duration};

    #[tokio::test(start_paused = true)]
    async fn lookup_honors_ttl_without_sweep() {
        let store = ExpiringStore::new();
        store.put("k", 42u32, Duration::from_secs(60));

        advance(Duration::from_secs(59)).await;
        assert_eq!(store.get_if_live("k"), Some(42));

        advance(Duration::from_secs(1)).await;
        // Expired but never swept: must read as absent.
        assert_eq!(store.get_if_live("k"), None);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_removes_only_expired_entries() {
        let store = ExpiringStore::new();
        store.put("old", 1u32, Duration::from_secs(10));
        store.put("fresh", 2u32, Duration::from_secs(100));

        advance(Duration::from_secs(10)).await;
        assert_eq!(store.sweep(), 1);
        assert_eq!(store.get_if_live("old"), None);
        assert_eq!(store.get_if_live("fresh"), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn capacity_evicts_oldest_inserted_first() {
        let store = ExpiringStore::with_capacity(3);
        for (i, key) in ["a", "b", "c"].iter().enumerate() {
            store.put(*key, i as u32, Duration::from_secs(60));
        }
        // Read "a" so eviction provably ignores access recency.
        assert_eq!(store.get_if_live("a"), Some(0));

        store.put("d", 3, Duration::from_secs(60));
        assert_eq!(store.get_if_live("a"), None);
        assert_eq!(store.get_if_live("b"), Some(1));
        assert_eq!(store.get_if_live("d"), Some(3));
        assert_eq!(store.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn replacement_keeps_insertion_position() {
        let store = ExpiringStore::with_capacity(2);
        store.put("a", 1u32, Duration::from_secs(60));
        store.put("b", 2, Duration::from_secs(60));
        // Re-inserting "a" must not make it the newest entry.
        store.put("a", 10, Duration::from_secs(60));

        store.put("c", 3, Duration::from_secs(60));
        assert_eq!(store.get_if_live("a"), None);
        assert_eq!(store.get_if_live("b"), Some(2));
        assert_eq!(store.get_if_live("c"), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn replacement_refreshes_ttl() {
        let store = ExpiringStore::new();
        store.put("k", 1u32, Duration::from_secs(10));
        advance(Duration::from_secs(8)).await;
        store.put("k", 2, Duration::from_secs(10));
        advance(Duration::from_secs(8)).await;
        assert_eq!(store.get_if_live("k"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn remove_is_idempotent() {
        let store = ExpiringStore::new();
        store.put("k", 1u32, Duration::from_secs(60));
        store.remove("k");
        store.remove("k");
        store.remove("never-there");
        assert_eq!(store.get_if_live("k"), None);
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_drops_everything() {
        let store = ExpiringStore::new();
        store.put("a", 1u32, Duration::from_secs(60));
        store.put("b", 2, Duration::from_secs(60));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.get_if_live("a"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn background_sweeper_reclaims_and_stops_on_cancel() {
        let store = Arc::new(ExpiringStore::new());
        store.put("k", 1u32, Duration::from_secs(5));

        let cancel = CancellationToken::new();
        let handle = spawn_sweeper(store.clone(), Duration::from_secs(10), cancel.clone());

        advance(Duration::from_secs(11)).await;
        // Let the sweeper task run its tick.
        tokio::task::yield_now().await;
        assert_eq!(store.len(), 0);

        cancel.cancel();
        handle.await.expect("sweeper task panicked");
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_ignores_entries_inserted_after_it_started() {
        let store = ExpiringStore::new();
        store.put("stale", 1u32, Duration::from_secs(1));
        advance(Duration::from_secs(2)).await;
        store.put("new", 2, Duration::from_secs(60));
        store.sweep();
        assert_eq!(store.get_if_live("new"), Some(2));
    }
}
