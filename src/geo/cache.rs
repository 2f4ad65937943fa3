//! Geocode cache with TTL and LRU eviction.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::{AddressResult, GeoPoint, GeocodeError, ReverseGeocoder};

pub const DEFAULT_CACHE_ENTRIES: usize = 1024;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Caches successful lookups of an inner geocoder per exact coordinate pair.
///
/// Failures are never cached.
pub struct CachedGeocoder<G> {
    inner: G,
    entries: RwLock<HashMap<(u64, u64), CacheEntry>>,
    max_entries: usize,
    ttl: Duration,
}

struct CacheEntry {
    value: AddressResult,
    inserted_at: Instant,
    last_accessed: Instant,
}

impl<G> CachedGeocoder<G> {
    pub fn new(inner: G) -> Self {
        Self::with_limits(inner, DEFAULT_CACHE_ENTRIES, DEFAULT_CACHE_TTL)
    }

    pub fn with_limits(inner: G, max_entries: usize, ttl: Duration) -> Self {
        Self {
            inner,
            entries: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn lookup(&self, key: (u64, u64)) -> Option<AddressResult> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get_mut(&key)?;
        if entry.inserted_at.elapsed() > self.ttl {
            entries.remove(&key);
            return None;
        }
        entry.last_accessed = Instant::now();
        Some(entry.value.clone())
    }

    fn insert(&self, key: (u64, u64), value: AddressResult) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let ttl = self.ttl;
        entries.retain(|_, e| e.inserted_at.elapsed() <= ttl);

        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            if let Some(lru_key) = entries
                .iter()
                .min_by_key(|(_, e)| e.last_accessed)
                .map(|(k, _)| *k)
            {
                entries.remove(&lru_key);
            }
        }

        let now = Instant::now();
        entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
                last_accessed: now,
            },
        );
    }
}

fn cache_key(point: GeoPoint) -> (u64, u64) {
    (point.longitude.to_bits(), point.latitude.to_bits())
}

#[async_trait]
impl<G: ReverseGeocoder> ReverseGeocoder for CachedGeocoder<G> {
    async fn resolve(&self, point: GeoPoint) -> Result<AddressResult, GeocodeError> {
        let key = cache_key(point);
        if let Some(hit) = self.lookup(key) {
            return Ok(hit);
        }
        let value = self.inner.resolve(point).await?;
        self.insert(key, value.clone());
        Ok(value)
    }
}
