use proptest::prelude::*;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use typeahead::search::cache::QueryCache;
use typeahead::Item;

fn results(query: &str) -> Vec<Item> {
    vec![Item::new(query.len() as u64, query, 1.0)]
}

proptest! {
    #[test]
    fn overflow_drops_exactly_the_oldest_queries(capacity in 1usize..12, extra in 1usize..12) {
        let mut cache = QueryCache::new(NonZeroUsize::new(capacity).unwrap());
        let total = capacity + extra;

        for i in 0..total {
            cache.insert(format!("q{i}"), results("x"));
            prop_assert!(cache.len() <= capacity);
        }

        prop_assert_eq!(cache.len(), capacity);
        for i in 0..extra {
            let query = format!("q{i}");
            prop_assert!(!cache.contains(&query));
        }
        for i in extra..total {
            let query = format!("q{i}");
            prop_assert!(cache.contains(&query));
        }
    }

    #[test]
    fn eviction_order_is_insertion_order(
        capacity in 1usize..6,
        ops in prop::collection::vec((0u8..10, any::<bool>()), 1..60),
    ) {
        let mut cache = QueryCache::new(NonZeroUsize::new(capacity).unwrap());
        let mut model: VecDeque<String> = VecDeque::new();

        for (key, read_first) in ops {
            let query = format!("k{key}");
            if read_first {
                // Reads must not influence eviction.
                let _ = cache.lookup(&query);
            }
            cache.insert(query.clone(), results(&query));

            if !model.contains(&query) {
                if model.len() == capacity {
                    model.pop_front();
                }
                model.push_back(query);
            }

            let expected: Vec<&str> = model.iter().map(String::as_str).collect();
            prop_assert_eq!(cache.queries(), expected);
        }
    }
}
