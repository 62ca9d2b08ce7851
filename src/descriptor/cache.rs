//! Descriptor cache: spawner key to live catalog entry
//!
//! Populated lazily by search and resolution, never explicitly cleared.
//! Entries hold weak handles; the moment a lookup finds its backing entry
//! dead, the entry is removed and the key is free to be re-discovered.
//! There is no proactive sweep.

use crate::catalog::{Handle, NodeTemplate};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Cache performance counters
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    /// Stale entries removed on lookup
    pub evictions: usize,
}

impl CacheStats {
    /// Hit ratio over all lookups so far
    pub fn hit_ratio(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }
}

/// Key-to-entry map with lazy self-healing eviction
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: HashMap<String, Handle<NodeTemplate>>,
    stats: CacheStats,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a key for the given entry. Empty keys violate the cache
    /// invariant and are dropped with a warning instead of stored.
    pub fn insert(&mut self, key: impl Into<String>, entry: &Arc<NodeTemplate>) {
        let key = key.into();
        if key.is_empty() {
            warn!("descriptor cache: refusing empty spawner key");
            return;
        }
        self.entries.insert(key, Handle::from_arc(entry));
    }

    /// Looks up a key, upgrading the weak handle. A dead entry is evicted
    /// on the spot and reported as a miss.
    pub fn lookup(&mut self, key: &str) -> Option<Arc<NodeTemplate>> {
        match self.entries.get(key) {
            Some(handle) => match handle.get() {
                Some(entry) => {
                    self.stats.hits += 1;
                    Some(entry)
                }
                None => {
                    debug!("descriptor cache: evicting stale key '{}'", key);
                    self.entries.remove(key);
                    self.stats.evictions += 1;
                    self.stats.misses += 1;
                    None
                }
            },
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Number of keys currently stored, stale or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MemberSpec, TemplateKind};

    fn entry(name: &str) -> Arc<NodeTemplate> {
        Arc::new(NodeTemplate::new(
            name,
            "Utilities",
            TemplateKind::CallableMember(MemberSpec::new(name).owned_by("SystemLibrary")),
        ))
    }

    #[test]
    fn test_hit_and_miss() {
        let mut cache = DescriptorCache::new();
        let trace = entry("Trace");
        cache.insert("SystemLibrary::Trace", &trace);

        assert!(cache.lookup("SystemLibrary::Trace").is_some());
        assert!(cache.lookup("SystemLibrary::Missing").is_none());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_ratio() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_stale_entry_self_heals() {
        let mut cache = DescriptorCache::new();
        let trace = entry("Trace");
        cache.insert("SystemLibrary::Trace", &trace);

        // The catalog drops its entry; the cached handle goes stale
        drop(trace);

        assert!(cache.lookup("SystemLibrary::Trace").is_none());
        assert_eq!(cache.stats().evictions, 1);
        // The stale key is gone, not just dead
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_empty_key_is_refused() {
        let mut cache = DescriptorCache::new();
        let trace = entry("Trace");
        cache.insert("", &trace);
        assert!(cache.is_empty());
    }
}
