//! Bounded cache of built renderables
//!
//! Glyphs are keyed by their full token text plus the fingerprints of the
//! glyph source and token transform, so a hash collision can never hand out
//! another token's glyph.

use std::hash::Hash;
use std::rc::Rc;

use hashbrown::HashMap;

use digiclock_types::DEFAULT_CACHE_ENTRIES;

use crate::renderable::Renderable;

/// Identity of a built glyph
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    pub text: String,
    /// Fingerprint of the glyph source configuration
    pub source: u64,
    /// Fingerprint of the token transform (0 for none)
    pub transform: u64,
}

struct CachedRenderable {
    renderable: Rc<Renderable>,
    /// LRU tracking: set from the access counter on each hit
    last_used: u64,
}

/// Hit/miss counters since creation or the last `clear`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// LRU cache of shared renderables
pub struct RenderableCache<K = GlyphKey> {
    entries: HashMap<K, CachedRenderable>,
    max_entries: usize,
    access_counter: u64,
    stats: CacheStats,
}

impl<K: Hash + Eq + Clone> RenderableCache<K> {
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: HashMap::with_capacity(max_entries.min(DEFAULT_CACHE_ENTRIES)),
            max_entries,
            access_counter: 0,
            stats: CacheStats::default(),
        }
    }

    pub fn get(&mut self, key: &K) -> Option<Rc<Renderable>> {
        self.access_counter += 1;
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used = self.access_counter;
                self.stats.hits += 1;
                Some(entry.renderable.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: K, renderable: Rc<Renderable>) {
        self.access_counter += 1;
        self.entries.insert(
            key,
            CachedRenderable {
                renderable,
                last_used: self.access_counter,
            },
        );
        self.evict_lru_if_needed();
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }

    /// Evict least recently used entries if cache is too large
    fn evict_lru_if_needed(&mut self) {
        if self.entries.len() <= self.max_entries {
            return;
        }

        // Drop the oldest quarter, always keeping the newest entry
        let target_size = (self.max_entries * 3 / 4).max(1);
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.last_used))
            .collect();
        entries.sort_by_key(|(_, last_used)| *last_used);

        let excess = self.entries.len() - target_size;
        for (key, _) in entries.into_iter().take(excess) {
            self.entries.remove(&key);
        }
        self.stats.evictions += excess as u64;

        tracing::debug!(
            evicted = excess,
            remaining = self.entries.len(),
            "Renderable cache trimmed"
        );
    }
}

impl<K: Hash + Eq + Clone> Default for RenderableCache<K> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_ENTRIES)
    }
}
