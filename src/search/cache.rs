//! Bounded cache of query results with insertion-ordered eviction
use crate::provider::Item;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Maps exact query text to the results fetched for it.
///
/// Backed by an [`LruCache`] that is only ever read through `peek` and
/// refreshed through `peek_mut`, so recency never moves and the entry
/// evicted on overflow is always the oldest-inserted one.
pub struct QueryCache {
    entries: LruCache<String, Vec<Item>>,
}

impl QueryCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Cached results for `query`, if any. Does not affect eviction order.
    pub fn lookup(&self, query: &str) -> Option<&[Item]> {
        self.entries.peek(query).map(Vec::as_slice)
    }

    /// Store `results` under `query` and return the evicted query, if any.
    ///
    /// An existing entry has its value replaced in place and keeps its
    /// position in the eviction order.
    pub fn insert(&mut self, query: String, results: Vec<Item>) -> Option<String> {
        if let Some(existing) = self.entries.peek_mut(&query) {
            *existing = results;
            return None;
        }
        self.entries.push(query, results).map(|(evicted, _)| evicted)
    }

    pub fn contains(&self, query: &str) -> bool {
        self.entries.contains(query)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Cached queries, oldest first.
    pub fn queries(&self) -> Vec<&str> {
        self.entries.iter().rev().map(|(k, _)| k.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize) -> QueryCache {
        QueryCache::new(NonZeroUsize::new(capacity).unwrap())
    }

    fn items(title: &str) -> Vec<Item> {
        vec![Item::new(1, title, 1.0)]
    }

    #[test]
    fn lookup_is_exact_match() {
        let mut cache = cache(4);
        cache.insert("shoe".into(), items("Shoe"));

        assert!(cache.lookup("shoe").is_some());
        assert!(cache.lookup("Shoe").is_none());
        assert!(cache.lookup("sho").is_none());
    }

    #[test]
    fn evicts_oldest_inserted_when_full() {
        let mut cache = cache(2);
        assert_eq!(cache.insert("a".into(), items("a")), None);
        assert_eq!(cache.insert("b".into(), items("b")), None);
        assert_eq!(cache.insert("c".into(), items("c")), Some("a".to_string()));

        assert_eq!(cache.queries(), vec!["b", "c"]);
        assert!(!cache.contains("a"));
    }

    #[test]
    fn lookups_do_not_refresh_recency() {
        let mut cache = cache(2);
        cache.insert("a".into(), items("a"));
        cache.insert("b".into(), items("b"));

        // A true LRU would now evict "b".
        assert!(cache.lookup("a").is_some());
        cache.insert("c".into(), items("c"));

        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
    }

    #[test]
    fn reinsert_refreshes_value_without_reordering() {
        let mut cache = cache(2);
        cache.insert("a".into(), items("old"));
        cache.insert("b".into(), items("b"));
        assert_eq!(cache.insert("a".into(), items("new")), None);

        assert_eq!(cache.lookup("a").unwrap()[0].title, "new");
        assert_eq!(cache.len(), 2);

        cache.insert("c".into(), items("c"));
        assert_eq!(cache.queries(), vec!["b", "c"]);
    }

    #[test]
    fn empty_result_lists_are_cached() {
        let mut cache = cache(1);
        cache.insert("zzz".into(), Vec::new());
        assert_eq!(cache.lookup("zzz"), Some(&[][..]));
        assert_eq!(cache.capacity(), 1);
    }
}
