//! Keyed cache for list fetches with in-flight deduplication and
//! predicate-based invalidation.

use std::{collections::HashMap, fmt};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    scope: String,
    params: String,
}

impl QueryKey {
    pub fn new(scope: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            params: params.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn params(&self) -> &str {
        &self.params
    }

    pub fn starts_with(&self, scope: &str) -> bool {
        self.scope == scope
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.scope)
        } else {
            write!(f, "{}?{}", self.scope, self.params)
        }
    }
}

/// Entries kept before least-recently-used inactive lists are dropped.
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

struct CacheEntry<T> {
    value: Option<T>,
    stale: bool,
    in_flight: bool,
    invalidated_in_flight: bool,
    last_used: u64,
}

impl<T> CacheEntry<T> {
    fn empty() -> Self {
        Self {
            value: None,
            stale: false,
            in_flight: false,
            invalidated_in_flight: false,
            last_used: 0,
        }
    }
}

pub struct QueryCache<T> {
    entries: HashMap<QueryKey, CacheEntry<T>>,
    capacity: usize,
    tick: u64,
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl<T> QueryCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            tick: 0,
        }
    }

    pub fn get(&self, key: &QueryKey) -> Option<&T> {
        self.entries.get(key).and_then(|entry| entry.value.as_ref())
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Absent entries count as stale.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        match self.entries.get(key) {
            Some(entry) => entry.value.is_none() || entry.stale,
            None => true,
        }
    }

    pub fn is_in_flight(&self, key: &QueryKey) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.in_flight)
    }

    fn entry_mut(&mut self, key: &QueryKey) -> &mut CacheEntry<T> {
        self.tick += 1;
        let tick = self.tick;
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(CacheEntry::empty);
        entry.last_used = tick;
        entry
    }

    /// Claims a fetch for `key`. Returns `false` when one is already running
    /// or a fresh value is cached. A successful claim consumes any earlier
    /// invalidation.
    pub fn begin_fetch(&mut self, key: &QueryKey) -> bool {
        let entry = self.entry_mut(key);
        if entry.in_flight || (entry.value.is_some() && !entry.stale) {
            return false;
        }
        entry.in_flight = true;
        entry.stale = false;
        entry.invalidated_in_flight = false;
        true
    }

    /// Stores a fetched value under exactly `key`. An entry invalidated while
    /// this fetch was running stays stale.
    pub fn complete(&mut self, key: &QueryKey, value: T) {
        let entry = self.entry_mut(key);
        entry.value = Some(value);
        entry.in_flight = false;
        entry.stale = entry.invalidated_in_flight;
        entry.invalidated_in_flight = false;
    }

    /// Releases the in-flight claim. Any previously cached value is kept but
    /// stays stale so the next claim retries.
    pub fn fail(&mut self, key: &QueryKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.in_flight = false;
            entry.stale = true;
            entry.invalidated_in_flight = false;
        }
    }

    pub fn invalidate<F>(&mut self, predicate: F) -> Vec<QueryKey>
    where
        F: Fn(&QueryKey) -> bool,
    {
        let mut invalidated = Vec::new();
        for (key, entry) in self.entries.iter_mut() {
            if predicate(key) {
                entry.stale = true;
                if entry.in_flight {
                    entry.invalidated_in_flight = true;
                }
                invalidated.push(key.clone());
            }
        }
        invalidated
    }

    pub fn invalidate_scope(&mut self, scope: &str) -> Vec<QueryKey> {
        self.invalidate(|key| key.starts_with(scope))
    }

    /// Drops stale lists other than `active`, then evicts the least recently
    /// used ones until the cache is back within capacity. Entries with a fetch
    /// in flight are never removed. Returns the number of evicted entries.
    pub fn prune(&mut self, active: &QueryKey) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|key, entry| key == active || entry.in_flight || !entry.stale);

        while self.entries.len() > self.capacity {
            let oldest = self
                .entries
                .iter()
                .filter(|(key, entry)| *key != active && !entry.in_flight)
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }

        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
