//! Measured BxDF Cache

use super::*;
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Cached result of loading a path. `None` records a file with an invalid
/// structure so it is not rebuilt.
type CacheEntry = Option<Arc<MeasuredBxDFData>>;

/// Registry of measured BRDF data keyed by file path. Each path is built at
/// most once; later lookups read an immutable snapshot without locking.
/// Entries are never evicted.
pub struct MeasuredBxDFCache {
    /// Resident entries.
    entries: ArcSwap<HashMap<String, CacheEntry>>,

    /// Per path locks held while a path is being built.
    build_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl MeasuredBxDFCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(HashMap::new()),
            build_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the data for a path, loading it on first use. Concurrent
    /// first requests for the same path wait for a single build. Load errors
    /// are returned to the caller and not cached.
    ///
    /// * `path` - The file path.
    pub fn get_or_load(&self, path: &str) -> Result<CacheEntry, String> {
        if let Some(entry) = self.entries.load().get(path) {
            return Ok(entry.clone());
        }

        let build_lock = self.build_lock(path)?;
        let _guard = build_lock
            .lock()
            .map_err(|_| format!("{}: measured BRDF build lock poisoned", path))?;

        // Another thread may have finished the build while we waited.
        if let Some(entry) = self.entries.load().get(path) {
            return Ok(entry.clone());
        }

        debug!("{}: loading measured BRDF", path);
        let result = MeasuredBxDFData::from_file(path).map(|data| data.map(Arc::new));
        if let Ok(entry) = &result {
            self.entries.rcu(|entries| {
                let mut entries = HashMap::clone(entries);
                entries.insert(String::from(path), entry.clone());
                entries
            });
        }

        if let Ok(mut locks) = self.build_locks.lock() {
            locks.remove(path);
        }
        result
    }

    /// Returns the build lock for a path.
    ///
    /// * `path` - The file path.
    fn build_lock(&self, path: &str) -> Result<Arc<Mutex<()>>, String> {
        let mut locks = self
            .build_locks
            .lock()
            .map_err(|_| String::from("measured BRDF cache poisoned"))?;
        Ok(Arc::clone(locks.entry(String::from(path)).or_default()))
    }

    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    /// Returns `true` if nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    /// Returns `true` if the path has been loaded, including files that
    /// turned out to be invalid.
    ///
    /// * `path` - The file path.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.load().contains_key(path)
    }
}

impl Default for MeasuredBxDFCache {
    /// Returns an empty cache.
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the process wide measured BRDF cache.
pub fn measured_bxdf_cache() -> &'static MeasuredBxDFCache {
    static CACHE: OnceLock<MeasuredBxDFCache> = OnceLock::new();
    CACHE.get_or_init(MeasuredBxDFCache::new)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::super::measured_fixture::*;
    use super::*;
    use crate::tensor::writer::*;
    use std::fs;
    use std::thread;

    #[test]
    fn loads_once() {
        let path = write_isotropic_brdf("cache_loads_once");
        let cache = MeasuredBxDFCache::new();
        assert!(cache.is_empty());

        let a = cache.get_or_load(&path).unwrap().unwrap();

        // The file is gone but the resident entry is returned.
        fs::remove_file(&path).ok();
        let b = cache.get_or_load(&path).unwrap().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&path));
    }

    #[test]
    fn concurrent_requests_share_one_build() {
        let path = write_isotropic_brdf("cache_concurrent");
        let cache = Arc::new(MeasuredBxDFCache::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let path = path.clone();
                thread::spawn(move || cache.get_or_load(&path).unwrap().unwrap())
            })
            .collect();
        let results: Vec<Arc<MeasuredBxDFData>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        for r in results.iter() {
            assert!(Arc::ptr_eq(r, &results[0]));
        }
        assert_eq!(cache.len(), 1);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn invalid_file_is_cached_as_none() {
        let path = temp_path("cache_invalid");
        write_tensor_file(
            &path,
            &[FieldSpec::new("description", crate::tensor::TensorType::UInt8, &[1], vec![0])],
        )
        .unwrap();

        let cache = MeasuredBxDFCache::new();
        assert!(cache.get_or_load(&path).unwrap().is_none());
        assert!(cache.contains(&path));

        fs::remove_file(&path).ok();
        assert!(cache.get_or_load(&path).unwrap().is_none());
    }

    #[test]
    fn load_errors_are_not_cached() {
        let path = temp_path("cache_missing");
        let cache = MeasuredBxDFCache::new();
        assert!(cache.get_or_load(&path).is_err());
        assert!(!cache.contains(&path));
        assert!(cache.is_empty());
    }

    #[test]
    fn global_cache_is_shared() {
        assert!(std::ptr::eq(measured_bxdf_cache(), measured_bxdf_cache()));
    }
}
