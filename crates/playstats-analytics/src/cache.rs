//! Memoization of loaded datasets, keyed by input content.

use crate::ingest::resolve_format;
use crate::loader::{load_bytes, read_input, LoadOptions};
use crate::model::Dataset;
use moka::sync::Cache;
use playstats_common::Result;
use playstats_config::InputFormat;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Identity of one load: what was read and how it was interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetKey {
    /// Hex SHA-256 of the input bytes.
    pub digest: String,
    /// Resolved input format.
    pub format: InputFormat,
    /// IANA name of the analysis time zone.
    pub time_zone: &'static str,
}

impl DatasetKey {
    /// Computes the key for `bytes` loaded with `options`.
    pub fn new(bytes: &[u8], path: Option<&Path>, options: &LoadOptions) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self {
            digest: hex::encode(hasher.finalize()),
            format: resolve_format(options.format, path, bytes),
            time_zone: options.time_zone.name(),
        }
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.digest.get(..12).unwrap_or(&self.digest);
        write!(f, "{short}/{}/{}", self.format, self.time_zone)
    }
}

/// Hit and miss counters.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheMetrics {
    /// Lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that had to load.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

/// Bounded cache of normalized datasets.
///
/// Identical content with identical options yields the same `Arc`. Failed
/// loads are not stored.
pub struct DatasetCache {
    cache: Cache<DatasetKey, Arc<Dataset>>,
    metrics: CacheMetrics,
}

impl DatasetCache {
    /// Cache holding at most `capacity` datasets.
    pub fn new(capacity: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(capacity).build(),
            metrics: CacheMetrics::default(),
        }
    }

    /// Returns the cached dataset for this content, loading it on a miss.
    #[instrument(skip(self, bytes, options), fields(bytes = bytes.len()))]
    pub fn get_or_load(
        &self,
        bytes: &[u8],
        path: Option<&Path>,
        options: &LoadOptions,
    ) -> Result<Arc<Dataset>> {
        let key = DatasetKey::new(bytes, path, options);
        if let Some(dataset) = self.cache.get(&key) {
            self.metrics.hits.fetch_add(1, Ordering::Relaxed);
            debug!(%key, "Dataset cache hit");
            return Ok(dataset);
        }

        self.metrics.misses.fetch_add(1, Ordering::Relaxed);
        debug!(%key, "Dataset cache miss");
        let dataset = Arc::new(load_bytes(bytes, path, options)?);
        self.cache.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Reads `path` and returns its dataset through the cache.
    pub fn load_path(&self, path: &Path, options: &LoadOptions) -> Result<Arc<Dataset>> {
        let bytes = read_input(path)?;
        self.get_or_load(&bytes, Some(path), options)
    }

    /// Hit and miss counters.
    pub const fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Drops every cached dataset.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new(8)
    }
}

impl fmt::Debug for DatasetCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetCache")
            .field("entries", &self.cache.entry_count())
            .field("metrics", &self.metrics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;

    const CSV: &str = "ts,ms_played,track_name\n2024-01-01T00:00:00Z,1000,A\n";

    #[test]
    fn test_same_content_same_arc() {
        let cache = DatasetCache::new(4);
        let options = LoadOptions::default();
        let first = cache.get_or_load(CSV.as_bytes(), None, &options).unwrap();
        let second = cache.get_or_load(CSV.as_bytes(), None, &options).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.metrics().hits(), 1);
        assert_eq!(cache.metrics().misses(), 1);
    }

    #[test]
    fn test_time_zone_is_part_of_key() {
        let cache = DatasetCache::new(4);
        let utc = cache
            .get_or_load(CSV.as_bytes(), None, &LoadOptions::default())
            .unwrap();
        let tokyo = LoadOptions {
            time_zone: chrono_tz::Asia::Tokyo,
            ..LoadOptions::default()
        };
        let local = cache.get_or_load(CSV.as_bytes(), None, &tokyo).unwrap();
        assert!(!Arc::ptr_eq(&utc, &local));
        assert_eq!(local.time_zone(), chrono_tz::Asia::Tokyo);
        assert_eq!(utc.time_zone(), Tz::UTC);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = DatasetCache::new(4);
        let bad = b"ts,ms_played\nnope,1\n";
        assert!(cache.get_or_load(bad, None, &LoadOptions::default()).is_err());
        assert!(cache.get_or_load(bad, None, &LoadOptions::default()).is_err());
        assert_eq!(cache.metrics().misses(), 2);
        assert_eq!(cache.metrics().hits(), 0);
    }

    #[test]
    fn test_key_display_and_digest() {
        let key = DatasetKey::new(b"abc", None, &LoadOptions::default());
        assert_eq!(
            key.digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(key.to_string(), "ba7816bf8f01/csv/UTC");
    }
}
