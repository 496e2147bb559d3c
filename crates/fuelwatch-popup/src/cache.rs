//! Resource cache mapping fetch keys to local object-URL handles
//!
//! One cache per popup instance. Handles are created at most once per key,
//! live until teardown, and are released exactly once through the injected
//! [`HandleReleaser`].

use std::collections::{HashMap, HashSet};

use fuelwatch_net::{FetchKey, HttpRequest};

/// Locally-dereferenceable reference to fetched binary content.
///
/// In the browser build the URL is a blob object-URL; releasing it revokes
/// the URL and frees the underlying blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceHandle {
    /// The request this handle materializes
    pub key: FetchKey,
    /// Local URL addressing the fetched payload
    pub url: String,
}

/// Releases a handle's backing resource.
///
/// Injected rather than baked in so the core stays testable without a
/// browser: the WASM layer revokes object URLs, tests record the calls.
pub trait HandleReleaser {
    /// Release the resource behind `url`. Called exactly once per handle.
    fn release(&self, url: &str);
}

/// Outcome of asking the cache for a key.
#[derive(Clone, Debug)]
pub enum FetchDecision {
    /// Already cached; the handle's URL can be displayed immediately
    Hit(String),
    /// Not cached and not in flight; the caller must perform this request
    /// and report back via `complete_fetch` or `fail_fetch`
    Start(HttpRequest),
    /// A fetch for this key is already in flight; nothing to do
    InFlight,
}

/// Cache of fetched statistics resources, keyed by request identity.
///
/// Unbounded by design: a popup touches a handful of keys per session and
/// `teardown` is the only eviction point.
pub struct ResourceCache {
    /// Materialized handles by key
    entries: HashMap<FetchKey, ResourceHandle>,
    /// Keys with a fetch currently in flight
    in_flight: HashSet<FetchKey>,
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            in_flight: HashSet::new(),
        }
    }

    /// Pure lookup, no side effects
    pub fn get(&self, key: &FetchKey) -> Option<&ResourceHandle> {
        self.entries.get(key)
    }

    /// Decide what to do for `key`.
    ///
    /// Returns `Start` exactly once per key until that fetch settles;
    /// concurrent identical-key triggers get `InFlight` and piggyback on
    /// the pending fetch instead of duplicating it.
    pub fn begin_fetch(&mut self, key: &FetchKey, base_url: &str) -> FetchDecision {
        if let Some(handle) = self.entries.get(key) {
            return FetchDecision::Hit(handle.url.clone());
        }
        if self.in_flight.contains(key) {
            return FetchDecision::InFlight;
        }
        self.in_flight.insert(key.clone());
        FetchDecision::Start(key.to_request(base_url))
    }

    /// Store the materialized handle for a settled fetch.
    ///
    /// If a duplicate materialization races in, the incoming URL is released
    /// immediately and the existing handle wins; the cache never leaks a
    /// handle it was given.
    pub fn complete_fetch(
        &mut self,
        key: FetchKey,
        url: String,
        releaser: &dyn HandleReleaser,
    ) -> &ResourceHandle {
        self.in_flight.remove(&key);
        if self.entries.contains_key(&key) {
            releaser.release(&url);
        } else {
            self.entries
                .insert(key.clone(), ResourceHandle { key: key.clone(), url });
        }
        &self.entries[&key]
    }

    /// Clear the in-flight mark for a failed fetch; nothing is stored, so a
    /// retry on the same key performs a fresh fetch.
    pub fn fail_fetch(&mut self, key: &FetchKey) {
        self.in_flight.remove(key);
    }

    /// Release every owned handle. Idempotent: handles are drained on the
    /// first call, so repeated teardowns release nothing twice.
    pub fn teardown(&mut self, releaser: &dyn HandleReleaser) {
        for (_, handle) in self.entries.drain() {
            releaser.release(&handle.url);
        }
        self.in_flight.clear();
    }

    /// Number of cached handles
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache holds no handles
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuelwatch_net::{FuelType, StatsEndpoint};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingReleaser {
        released: RefCell<Vec<String>>,
    }

    impl HandleReleaser for RecordingReleaser {
        fn release(&self, url: &str) {
            self.released.borrow_mut().push(url.to_string());
        }
    }

    fn key() -> FetchKey {
        FetchKey::new(StatsEndpoint::StatisticalGraphs, 7, FuelType::Diesel)
    }

    #[test]
    fn test_single_start_per_key() {
        let mut cache = ResourceCache::new();

        assert!(matches!(
            cache.begin_fetch(&key(), "https://stats.example"),
            FetchDecision::Start(_)
        ));
        // Second trigger while in flight piggybacks
        assert!(matches!(
            cache.begin_fetch(&key(), "https://stats.example"),
            FetchDecision::InFlight
        ));
    }

    #[test]
    fn test_hit_after_completion() {
        let mut cache = ResourceCache::new();
        let releaser = RecordingReleaser::default();

        cache.begin_fetch(&key(), "https://stats.example");
        cache.complete_fetch(key(), "blob:a".to_string(), &releaser);

        match cache.begin_fetch(&key(), "https://stats.example") {
            FetchDecision::Hit(url) => assert_eq!(url, "blob:a"),
            other => panic!("expected Hit, got {:?}", other),
        }
        assert!(releaser.released.borrow().is_empty());
    }

    #[test]
    fn test_duplicate_materialization_is_released() {
        let mut cache = ResourceCache::new();
        let releaser = RecordingReleaser::default();

        cache.begin_fetch(&key(), "https://stats.example");
        cache.complete_fetch(key(), "blob:a".to_string(), &releaser);
        let handle = cache.complete_fetch(key(), "blob:b".to_string(), &releaser);

        // The first handle wins, the duplicate is released immediately
        assert_eq!(handle.url, "blob:a");
        assert_eq!(*releaser.released.borrow(), vec!["blob:b".to_string()]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failure_allows_retry() {
        let mut cache = ResourceCache::new();

        cache.begin_fetch(&key(), "https://stats.example");
        cache.fail_fetch(&key());

        assert!(matches!(
            cache.begin_fetch(&key(), "https://stats.example"),
            FetchDecision::Start(_)
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_teardown_releases_each_handle_once() {
        let mut cache = ResourceCache::new();
        let releaser = RecordingReleaser::default();

        let other = FetchKey::new(StatsEndpoint::StatisticalData, 7, FuelType::Diesel);
        cache.begin_fetch(&key(), "https://stats.example");
        cache.complete_fetch(key(), "blob:a".to_string(), &releaser);
        cache.begin_fetch(&other, "https://stats.example");
        cache.complete_fetch(other, "blob:b".to_string(), &releaser);

        cache.teardown(&releaser);
        cache.teardown(&releaser);
        cache.teardown(&releaser);

        let mut released = releaser.released.borrow().clone();
        released.sort();
        assert_eq!(released, vec!["blob:a".to_string(), "blob:b".to_string()]);
        assert!(cache.is_empty());
    }
}
