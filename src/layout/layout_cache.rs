use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use xxhash_rust::xxh3::xxh3_64;

use crate::models::{ItemGroup, LayoutResult};

/// Maximum number of cached layouts to keep in memory.
const MAX_CACHE_ENTRIES: usize = 8;

/// Key for the layout cache.
///
/// Widths are kept exact: unlike row breaks, a full layout at a neighbouring
/// width is not reusable.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct CacheKey {
    width_bits: u64,
    list_hash: u64,
    params_hash: u64,
}

impl CacheKey {
    pub fn new(
        container_width: f64,
        list_hash: u64,
        grid_gap: f64,
        group_spacing: f64,
        min_aspect_ratio: f64,
        grouped: bool,
    ) -> Self {
        let mut params = Vec::with_capacity(25);
        params.extend_from_slice(&grid_gap.to_bits().to_le_bytes());
        params.extend_from_slice(&group_spacing.to_bits().to_le_bytes());
        params.extend_from_slice(&min_aspect_ratio.to_bits().to_le_bytes());
        params.push(grouped as u8);

        Self {
            width_bits: container_width.to_bits(),
            list_hash,
            params_hash: xxh3_64(&params),
        }
    }
}

/// Memoizes complete layouts so that resizing back to a previous width is O(1).
///
/// Shareable between controllers: several grids showing the same collection on
/// one page hit the same entries.
pub struct LayoutCache {
    cache: Mutex<LruCache<CacheKey, Arc<LayoutResult>>>,
}

impl LayoutCache {
    /// Creates a new empty layout cache.
    pub fn new() -> Self {
        Self::with_capacity(MAX_CACHE_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Computes a fast hash of the grouped item list.
    ///
    /// The hash covers (id + aspect ratio) of every item in order, plus group
    /// boundaries, so any change to the collection or its order invalidates entries.
    pub fn compute_list_hash(groups: &[ItemGroup]) -> u64 {
        let capacity: usize = groups.iter().map(|g| g.items.len() * 24 + 8).sum();
        let mut hasher_input = Vec::with_capacity(capacity);

        for group in groups {
            hasher_input.extend_from_slice(&(group.items.len() as u64).to_le_bytes());
            for item in &group.items {
                hasher_input.extend_from_slice(item.id.as_bytes());
                hasher_input.push(0);
                hasher_input.extend_from_slice(&item.aspect_ratio.to_bits().to_le_bytes());
            }
        }

        xxh3_64(&hasher_input)
    }

    /// Returns the cached layout, marking it most recently used.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<LayoutResult>> {
        self.cache.lock().get(key).cloned()
    }

    /// Stores a layout, evicting the least recently used entry at capacity.
    pub fn set(&self, key: CacheKey, layout: Arc<LayoutResult>) {
        self.cache.lock().put(key, layout);
    }

    /// Clears the entire cache.
    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    /// Returns the number of cached layouts.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}
