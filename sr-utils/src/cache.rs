//! Bounded, expiring caches for profiles, textures and built models.
//!
//! Every key maps to a shared `OnceCell`, so concurrent requests for the same
//! key wait on a single fetch/build instead of racing each other.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::OnceCell;

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct Entry<V> {
    cell: Arc<OnceCell<V>>,
    inserted: Instant,
    stamp: u64,
}

impl<V> Entry<V> {
    /// Still being computed by a caller that holds the cell.
    fn is_pending(&self) -> bool {
        !self.cell.initialized() && Arc::strong_count(&self.cell) > 1
    }
}

struct CacheInner<K, V> {
    entries: HashMap<K, Entry<V>>,
    /// Use stamp -> key, oldest first.
    recency: BTreeMap<u64, K>,
    next_stamp: u64,
}

impl<K: Eq + Hash + Clone, V> CacheInner<K, V> {
    fn stamp(&mut self) -> u64 {
        self.next_stamp += 1;
        self.next_stamp
    }

    fn touch(&mut self, key: &K) {
        let stamp = self.stamp();
        if let Some(entry) = self.entries.get_mut(key) {
            let old = std::mem::replace(&mut entry.stamp, stamp);
            self.recency.remove(&old);
            self.recency.insert(stamp, key.clone());
        }
    }

    fn put(&mut self, key: K, cell: Arc<OnceCell<V>>, inserted: Instant) {
        self.remove(&key);
        let stamp = self.stamp();
        self.recency.insert(stamp, key.clone());
        self.entries.insert(
            key,
            Entry {
                cell,
                inserted,
                stamp,
            },
        );
    }

    fn remove(&mut self, key: &K) {
        if let Some(entry) = self.entries.remove(key) {
            self.recency.remove(&entry.stamp);
        }
    }

    /// Drops least recently used entries until `capacity` is met. Pending
    /// entries are skipped, so the cache can run over while they finish.
    fn evict_to(&mut self, capacity: usize) {
        let excess = self.entries.len().saturating_sub(capacity);
        if excess == 0 {
            return;
        }
        let victims: Vec<u64> = self
            .recency
            .iter()
            .filter(|(_, key)| self.entries.get(*key).is_none_or(|e| !e.is_pending()))
            .map(|(&stamp, _)| stamp)
            .take(excess)
            .collect();
        for stamp in victims {
            if let Some(key) = self.recency.remove(&stamp) {
                self.entries.remove(&key);
            }
        }
    }
}

pub struct TtlLruCache<K, V> {
    capacity: usize,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    inner: Mutex<CacheInner<K, V>>,
}

impl<K, V> TtlLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self::with_clock(capacity, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(capacity: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            clock,
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                recency: BTreeMap::new(),
                next_stamp: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner<K, V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_live(&self, entry: &Entry<V>, now: Instant) -> bool {
        entry.is_pending() || now.saturating_duration_since(entry.inserted) < self.ttl
    }

    /// Returns a live, initialized value.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut inner = self.lock();
        let (live, value) = match inner.entries.get(key) {
            Some(entry) => (self.is_live(entry, now), entry.cell.get().cloned()),
            None => return None,
        };
        if !live {
            inner.remove(key);
            return None;
        }
        if value.is_some() {
            inner.touch(key);
        }
        value
    }

    pub fn insert(&self, key: K, value: V) {
        let now = self.clock.now();
        let mut inner = self.lock();
        inner.put(key, Arc::new(OnceCell::new_with(Some(value))), now);
        inner.evict_to(self.capacity);
    }

    /// Returns the cached value for `key`, running `init` at most once per
    /// key at a time. A failed `init` leaves the key empty for the next caller
    /// and takes no room in the cache.
    pub async fn get_or_try_init<F, Fut, E>(&self, key: K, init: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = {
            let now = self.clock.now();
            let mut inner = self.lock();
            let live = inner
                .entries
                .get(&key)
                .filter(|entry| self.is_live(entry, now))
                .map(|entry| Arc::clone(&entry.cell));
            match live {
                Some(cell) => {
                    inner.touch(&key);
                    cell
                }
                None => {
                    let cell = Arc::new(OnceCell::new());
                    inner.put(key.clone(), Arc::clone(&cell), now);
                    cell
                }
            }
        };

        match cell.get_or_try_init(init).await {
            Ok(value) => {
                let value = value.clone();
                self.lock().evict_to(self.capacity);
                Ok(value)
            }
            Err(e) => {
                self.forget_failed(&key, &cell);
                Err(e)
            }
        }
    }

    /// Removes the entry behind a failed init unless another caller is
    /// still waiting on the same cell.
    fn forget_failed(&self, key: &K, cell: &Arc<OnceCell<V>>) {
        let mut inner = self.lock();
        let abandoned = inner.entries.get(key).is_some_and(|entry| {
            Arc::ptr_eq(&entry.cell, cell)
                && !cell.initialized()
                && Arc::strong_count(cell) <= 2
        });
        if abandoned {
            inner.remove(key);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.recency.clear();
    }
}
