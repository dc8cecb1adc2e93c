use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::mf2::Document;

pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_CAPACITY: usize = 512;

struct Entry {
    document: Arc<Document>,
    created: Instant,
}

/// Expiring, bounded cache of parsed documents keyed by normalized URL.
///
/// Entries older than the TTL count as misses and are evicted on lookup.
/// When full, the oldest entry is evicted to make room.
pub struct FetchCache {
    entries: Mutex<HashMap<String, Entry>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for FetchCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}

impl FetchCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<Document>> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&self, key: &str, document: Arc<Document>) {
        self.insert_at(key, document, Instant::now())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<Arc<Document>> {
        let mut entries = self.entries.lock().ok()?;

        let age = match entries.get(key) {
            Some(entry) => now.saturating_duration_since(entry.created),
            None => {
                tracing::debug!("MISS {}", key);
                return None;
            }
        };

        if age < self.ttl {
            tracing::debug!("HIT {} - {:?}", key, age);
            entries.get(key).map(|e| e.document.clone())
        } else {
            tracing::debug!("EXPIRE {}", key);
            entries.remove(key);
            None
        }
    }

    fn insert_at(&self, key: &str, document: Arc<Document>, now: Instant) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };

        if !entries.contains_key(key) && entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.created)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key.to_string(),
            Entry {
                document,
                created: now,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mf2::Microformat;

    fn doc(kind: &str) -> Arc<Document> {
        Arc::new(Document {
            items: vec![Microformat::new(kind)],
        })
    }

    #[test]
    fn test_hit_and_miss() {
        let cache = FetchCache::default();
        assert!(cache.get("https://example.com/").is_none());

        cache.insert("https://example.com/", doc("h-entry"));
        let hit = cache.get("https://example.com/").unwrap();
        assert!(hit.items[0].is("h-entry"));
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = FetchCache::new(Duration::from_secs(600), 10);
        let start = Instant::now();
        cache.insert_at("https://example.com/", doc("h-entry"), start);

        assert!(cache
            .get_at("https://example.com/", start + Duration::from_secs(599))
            .is_some());
        assert!(cache
            .get_at("https://example.com/", start + Duration::from_secs(600))
            .is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = FetchCache::new(Duration::from_secs(600), 2);
        let start = Instant::now();
        cache.insert_at("a", doc("h-entry"), start);
        cache.insert_at("b", doc("h-entry"), start + Duration::from_secs(1));
        cache.insert_at("c", doc("h-entry"), start + Duration::from_secs(2));

        assert_eq!(cache.len(), 2);
        assert!(cache.get_at("a", start + Duration::from_secs(3)).is_none());
        assert!(cache.get_at("b", start + Duration::from_secs(3)).is_some());
        assert!(cache.get_at("c", start + Duration::from_secs(3)).is_some());
    }

    #[test]
    fn test_refresh_replaces_entry() {
        let cache = FetchCache::new(Duration::from_secs(600), 1);
        cache.insert("a", doc("h-entry"));
        cache.insert("a", doc("h-card"));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("a").unwrap().items[0].is("h-card"));
    }
}
