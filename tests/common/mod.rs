use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use typeahead::{Item, ProviderError, SearchProvider};

enum Reply {
    Items(Vec<Item>),
    Fail,
    Cancel,
}

/// Provider with per-query replies and latencies that records every lookup.
///
/// Queries without a script answer with a single item titled after the
/// query.
pub struct ScriptedProvider {
    scripts: HashMap<String, (Reply, Duration)>,
    default_latency: Duration,
    calls: Mutex<Vec<String>>,
    finished: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            default_latency: Duration::from_millis(100),
            calls: Mutex::new(Vec::new()),
            finished: AtomicUsize::new(0),
        }
    }

    pub fn reply(mut self, query: &str, items: Vec<Item>, latency: Duration) -> Self {
        self.scripts
            .insert(query.to_string(), (Reply::Items(items), latency));
        self
    }

    pub fn fail(mut self, query: &str, latency: Duration) -> Self {
        self.scripts.insert(query.to_string(), (Reply::Fail, latency));
        self
    }

    pub fn cancel(mut self, query: &str) -> Self {
        self.scripts
            .insert(query.to_string(), (Reply::Cancel, Duration::ZERO));
        self
    }

    /// Queries looked up so far, in dispatch order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Lookups that ran to completion instead of being aborted.
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for ScriptedProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Item>, ProviderError> {
        self.calls.lock().unwrap().push(query.to_string());

        let (reply, latency) = match self.scripts.get(query) {
            Some((reply, latency)) => (Some(reply), *latency),
            None => (None, self.default_latency),
        };
        tokio::time::sleep(latency).await;
        self.finished.fetch_add(1, Ordering::SeqCst);

        match reply {
            Some(Reply::Items(items)) => Ok(items.iter().take(limit).cloned().collect()),
            Some(Reply::Fail) => Err(ProviderError::Transport("connection reset".into())),
            Some(Reply::Cancel) => Err(ProviderError::Cancelled),
            None => Ok(vec![Item::new(0, query, 1.0)]),
        }
    }
}

pub fn item(id: u64, title: &str, price: f64) -> Item {
    Item::new(id, title, price)
}
