use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};
use std::sync::Arc;

#[derive(Clone)]
pub struct Metrics {
    pub queries_received: IntCounter,
    pub evaluations: IntCounter,
    pub cache_hits: IntCounter,
    pub cache_misses: IntCounter,
    pub fetches_dispatched: IntCounter,
    pub fetch_errors: IntCounter,
    pub replies_discarded: IntCounter,
    registry: Arc<Registry>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn counter(name: &str, help: &str) -> IntCounter {
    IntCounter::with_opts(Opts::new(name, help)).expect("static counter options are valid")
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let queries_received = counter("queries_received", "Number of query changes received");
        let evaluations = counter(
            "evaluations",
            "Number of debounced evaluations that actually ran",
        );
        let cache_hits = counter("cache_hits", "Number of evaluations answered from the cache");
        let cache_misses = counter("cache_misses", "Number of evaluations that missed the cache");
        let fetches_dispatched =
            counter("fetches_dispatched", "Number of provider lookups dispatched");
        let fetch_errors = counter("fetch_errors", "Number of provider lookups that failed");
        let replies_discarded = counter(
            "replies_discarded",
            "Number of superseded or cancelled replies dropped without effect",
        );

        registry.register(Box::new(queries_received.clone())).ok();
        registry.register(Box::new(evaluations.clone())).ok();
        registry.register(Box::new(cache_hits.clone())).ok();
        registry.register(Box::new(cache_misses.clone())).ok();
        registry.register(Box::new(fetches_dispatched.clone())).ok();
        registry.register(Box::new(fetch_errors.clone())).ok();
        registry.register(Box::new(replies_discarded.clone())).ok();

        Metrics {
            queries_received,
            evaluations,
            cache_hits,
            cache_misses,
            fetches_dispatched,
            fetch_errors,
            replies_discarded,
            registry: Arc::new(registry),
        }
    }

    pub fn gather(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if encoder.encode(&metric_families, &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gather_renders_registered_counters() {
        let metrics = Metrics::new();
        metrics.cache_hits.inc();
        metrics.cache_hits.inc();
        metrics.fetches_dispatched.inc();

        let text = metrics.gather();
        assert!(text.contains("cache_hits 2"));
        assert!(text.contains("fetches_dispatched 1"));
        assert!(text.contains("replies_discarded 0"));
    }
}
