#![forbid(unsafe_code)]

//! Key-guarded memoization.
//!
//! [`Memo`] stores the last computed value together with the key it was
//! computed from. [`Memo::get_or_compute`] runs the computation only when the
//! key differs from the stored one (or after [`Memo::invalidate`]); otherwise
//! it hands back the cached value. Views call it on every render, while the
//! computation itself runs only when its declared inputs changed.
//!
//! Keys should be cheap to compare: generation counters and small `Copy`
//! snapshots rather than the data itself.

/// Cached value guarded by a dependency key.
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    entry: Option<(K, V)>,
    computations: u64,
    hits: u64,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entry: None,
            computations: 0,
            hits: 0,
        }
    }
}

impl<K: PartialEq, V: Clone> Memo<K, V> {
    /// Create an empty memo.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, computing it first if the key
    /// changed since the last call.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some((cached_key, value)) = &self.entry
            && *cached_key == key
        {
            self.hits += 1;
            return value.clone();
        }
        let value = compute();
        self.computations += 1;
        self.entry = Some((key, value.clone()));
        value
    }

    /// Peek at the cached value without computing.
    #[must_use]
    pub fn cached(&self) -> Option<&V> {
        self.entry.as_ref().map(|(_, v)| v)
    }

    /// Whether `key` would be served from cache.
    #[must_use]
    pub fn is_fresh(&self, key: &K) -> bool {
        self.entry.as_ref().is_some_and(|(k, _)| k == key)
    }

    /// Drop the cached value; the next call recomputes.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Number of times the computation ran.
    #[must_use]
    pub fn computations(&self) -> u64 {
        self.computations
    }

    /// Number of calls served from cache.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }
}
