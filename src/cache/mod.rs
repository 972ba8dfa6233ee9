//! Query cache with request deduplication
//!
//! Entries are addressed by a structured [`CacheKey`] and invalidated either
//! by exact key or by a [`CacheTag`] naming an entity type (optionally for one
//! tenant). Concurrent loads of the same key share one fetch, and a result
//! younger than the dedupe interval is served without calling the fetcher.
//!
//! A fetch that completes after its key was invalidated still returns its
//! result to its own caller, but the result is not stored and
//! [`QueryCache::fetch_tracked`] reports it as no longer current.
//!
//! Invalidated keys are dropped from the cache. Expired keys nobody is using
//! are pruned whenever a new key is added.

use crate::core::RealEstateId;
use anyhow::{Result, anyhow};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Default window during which identical requests are deduplicated
pub const DEFAULT_DEDUPE_INTERVAL: Duration = Duration::from_millis(2_000);

/// Identity of one cached query
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub entity_type: String,
    pub tenant: RealEstateId,
    pub params: BTreeMap<String, String>,
}

impl CacheKey {
    pub fn new(entity_type: impl Into<String>, tenant: RealEstateId) -> Self {
        Self {
            entity_type: entity_type.into(),
            tenant,
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_params(mut self, params: &BTreeMap<String, String>) -> Self {
        self.params
            .extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Whether this key falls under `tag`
    pub fn has_tag(&self, tag: &CacheTag) -> bool {
        match tag {
            CacheTag::Entity(entity_type) => &self.entity_type == entity_type,
            CacheTag::EntityTenant(entity_type, tenant) => {
                &self.entity_type == entity_type && &self.tenant == tenant
            }
        }
    }
}

/// Group of keys invalidated together
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheTag {
    /// Every key of an entity type, across tenants
    Entity(String),
    /// Every key of an entity type for one tenant
    EntityTenant(String, RealEstateId),
}

impl CacheTag {
    pub fn entity(entity_type: impl Into<String>) -> Self {
        CacheTag::Entity(entity_type.into())
    }

    pub fn entity_tenant(entity_type: impl Into<String>, tenant: RealEstateId) -> Self {
        CacheTag::EntityTenant(entity_type.into(), tenant)
    }
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
    generation: u64,
}

#[derive(Default)]
struct Slot {
    generation: AtomicU64,
    entry: Mutex<Option<Entry>>,
}

impl Slot {
    fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// Result of [`QueryCache::fetch_tracked`]
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<V> {
    pub value: V,
    /// False when the key was invalidated while the fetch was running
    pub current: bool,
}

/// Shared query cache
pub struct QueryCache {
    dedupe_interval: Duration,
    slots: RwLock<HashMap<CacheKey, Arc<Slot>>>,
}

impl QueryCache {
    pub fn new(dedupe_interval: Duration) -> Self {
        Self {
            dedupe_interval,
            slots: RwLock::new(HashMap::new()),
        }
    }

    pub fn dedupe_interval(&self) -> Duration {
        self.dedupe_interval
    }

    /// Return the cached value for `key` or run `fetcher` to produce it
    ///
    /// Callers of the same key are serialized on the key's slot, so a burst
    /// of identical loads performs a single fetch and the rest read its
    /// result. Errors are returned to the caller and never cached.
    pub async fn fetch<V, F, Fut>(&self, key: &CacheKey, fetcher: F) -> Result<V>
    where
        V: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        self.fetch_tracked(key, fetcher)
            .await
            .map(|fetched| fetched.value)
    }

    /// Like [`fetch`](Self::fetch), also telling whether the value is current
    pub async fn fetch_tracked<V, F, Fut>(&self, key: &CacheKey, fetcher: F) -> Result<Fetched<V>>
    where
        V: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let slot = self.slot(key)?;
        let mut entry = slot.entry.lock().await;
        let generation = slot.generation.load(Ordering::SeqCst);

        if let Some(cached) = entry.as_ref() {
            let fresh = cached.generation == generation
                && cached.fetched_at.elapsed() < self.dedupe_interval;
            if fresh {
                if let Some(value) = cached.value.downcast_ref::<V>() {
                    tracing::debug!(entity = %key.entity_type, tenant = %key.tenant, "cache hit");
                    return Ok(Fetched {
                        value: value.clone(),
                        current: true,
                    });
                }
            }
        }

        tracing::debug!(entity = %key.entity_type, tenant = %key.tenant, "cache miss");
        let value = fetcher().await?;

        let current = slot.generation.load(Ordering::SeqCst) == generation;
        if current {
            *entry = Some(Entry {
                value: Arc::new(value.clone()),
                fetched_at: Instant::now(),
                generation,
            });
        } else {
            tracing::debug!(
                entity = %key.entity_type,
                tenant = %key.tenant,
                "key invalidated during fetch, result not stored"
            );
        }

        Ok(Fetched { value, current })
    }

    /// Stored value for `key` regardless of age, if still valid
    pub async fn peek<V>(&self, key: &CacheKey) -> Option<V>
    where
        V: Clone + Send + Sync + 'static,
    {
        let slot = self.existing_slot(key)?;
        let entry = slot.entry.lock().await;
        let generation = slot.generation.load(Ordering::SeqCst);

        entry
            .as_ref()
            .filter(|cached| cached.generation == generation)
            .and_then(|cached| cached.value.downcast_ref::<V>().cloned())
    }

    /// Invalidate and drop exactly one key
    pub fn invalidate_key(&self, key: &CacheKey) {
        let Ok(mut slots) = self.slots.write() else {
            return;
        };
        if let Some(slot) = slots.remove(key) {
            slot.invalidate();
            tracing::debug!(entity = %key.entity_type, tenant = %key.tenant, "cache key invalidated");
        }
    }

    /// Invalidate and drop every key under `tag`, returning how many were hit
    pub fn invalidate_tag(&self, tag: &CacheTag) -> usize {
        let Ok(mut slots) = self.slots.write() else {
            return 0;
        };

        let mut count = 0;
        slots.retain(|key, slot| {
            if key.has_tag(tag) {
                slot.invalidate();
                count += 1;
                false
            } else {
                true
            }
        });
        tracing::debug!(?tag, count, "cache tag invalidated");
        count
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.slots.read().map(|slots| slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn existing_slot(&self, key: &CacheKey) -> Option<Arc<Slot>> {
        self.slots.read().ok()?.get(key).cloned()
    }

    fn slot(&self, key: &CacheKey) -> Result<Arc<Slot>> {
        if let Some(slot) = self.existing_slot(key) {
            return Ok(slot);
        }

        let mut slots = self
            .slots
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        if !slots.contains_key(key) {
            Self::prune(&mut slots, self.dedupe_interval);
        }
        Ok(slots.entry(key.clone()).or_default().clone())
    }

    /// Drop keys that no caller holds and whose value expired or never came
    fn prune(slots: &mut HashMap<CacheKey, Arc<Slot>>, max_age: Duration) {
        let before = slots.len();
        slots.retain(|_, slot| {
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.entry.try_lock() {
                Ok(entry) => entry
                    .as_ref()
                    .is_some_and(|cached| cached.fetched_at.elapsed() < max_age),
                Err(_) => true,
            }
        });
        let pruned = before - slots.len();
        if pruned > 0 {
            tracing::debug!(pruned, "expired cache keys pruned");
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUPE_INTERVAL)
    }
}
