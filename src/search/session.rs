//! Search orchestration state machine
//!
//! A session owns its cache, debounce timer and request controller outright
//! and runs as a single task, so nothing here is shared or locked. Every
//! query change disarms the previous evaluation and invalidates the live
//! lookup; whichever query was current when typing paused is the only one
//! whose results can ever be published.
use super::cache::QueryCache;
use super::debounce::DebounceScheduler;
use super::request::{Completion, FetchOutcome, RequestController};
use super::{SearchState, SearchStatus};
use crate::config::EngineConfig;
use crate::metrics::Metrics;
use crate::provider::SearchProvider;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

#[derive(Debug)]
pub(crate) enum Command {
    SetQuery { query: String, revision: u64 },
    Clear { revision: u64 },
    Shutdown,
}

pub(crate) struct SearchSession {
    provider: Arc<dyn SearchProvider>,
    max_results: usize,
    cache: QueryCache,
    debounce: DebounceScheduler,
    requests: RequestController,
    state: SearchState,
    state_tx: watch::Sender<SearchState>,
    metrics: Arc<Metrics>,
}

impl SearchSession {
    pub(crate) fn new(
        config: &EngineConfig,
        provider: Arc<dyn SearchProvider>,
        metrics: Arc<Metrics>,
        state_tx: watch::Sender<SearchState>,
    ) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self {
            provider,
            max_results: config.max_results,
            cache: QueryCache::new(config.capacity()?),
            debounce: DebounceScheduler::new(config.debounce()),
            requests: RequestController::new(),
            state: SearchState::default(),
            state_tx,
            metrics,
        })
    }

    pub(crate) async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        info!(
            "Search session started (debounce {:?}, cache capacity {})",
            self.debounce.delay(),
            self.cache.capacity()
        );

        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(Command::SetQuery { query, revision }) => {
                        self.on_query_change(query, revision)
                    }
                    Some(Command::Clear { revision }) => self.on_clear(revision),
                    Some(Command::Shutdown) | None => break,
                },
                query = self.debounce.fired() => self.evaluate(query),
                completion = self.requests.completion() => self.on_completion(completion),
            }
        }

        self.teardown();
    }

    fn on_query_change(&mut self, query: String, revision: u64) {
        self.metrics.queries_received.inc();
        if self.requests.cancel() {
            self.metrics.replies_discarded.inc();
        }
        self.debounce.schedule(query.clone());
        self.state.query = query;
        self.state.input_revision = revision;
        self.publish();
    }

    fn on_clear(&mut self, revision: u64) {
        self.state.results.clear();
        self.on_query_change(String::new(), revision);
    }

    fn evaluate(&mut self, raw: String) {
        self.metrics.evaluations.inc();
        let query = raw.trim();

        if query.is_empty() {
            self.state.results.clear();
            self.state.status = SearchStatus::Success;
            self.publish();
            return;
        }

        if let Some(hit) = self.cache.lookup(query) {
            debug!("Cache hit for {:?} ({} items)", query, hit.len());
            self.metrics.cache_hits.inc();
            self.state.results = hit.to_vec();
            self.state.status = SearchStatus::Success;
            self.publish();
            return;
        }

        self.metrics.cache_misses.inc();
        self.dispatch(query.to_string());
    }

    fn dispatch(&mut self, query: String) {
        self.state.status = SearchStatus::Loading;

        let token = self.requests.issue(query.clone());
        let provider = Arc::clone(&self.provider);
        let limit = self.max_results;
        let task = tokio::spawn(async move { provider.search(&query, limit).await });
        self.requests.attach(&token, task);

        self.metrics.fetches_dispatched.inc();
        debug!(
            "Dispatched lookup #{} for {:?}",
            token.generation(),
            token.query()
        );
        self.publish();
    }

    fn on_completion(&mut self, completion: Completion) {
        let Completion { token, outcome } = completion;

        if !self.requests.settle(&token) {
            debug!(
                "Discarding reply for superseded lookup #{} ({:?})",
                token.generation(),
                token.query()
            );
            self.metrics.replies_discarded.inc();
            return;
        }

        match outcome {
            FetchOutcome::Found(items) => {
                debug!("Lookup for {:?} returned {} items", token.query(), items.len());
                if let Some(evicted) = self.cache.insert(token.query().to_string(), items.clone()) {
                    debug!("Cache full, evicted {evicted:?}");
                }
                self.state.results = items;
                self.state.status = SearchStatus::Success;
            }
            FetchOutcome::Failed(err) => {
                warn!("Lookup for {:?} failed: {err}", token.query());
                self.metrics.fetch_errors.inc();
                self.state.status = SearchStatus::Error;
            }
            FetchOutcome::Cancelled => {
                debug!("Lookup for {:?} was cancelled", token.query());
                self.metrics.replies_discarded.inc();
            }
        }
        self.publish();
    }

    fn teardown(&mut self) {
        self.debounce.cancel();
        self.requests.cancel();
        self.publish();
        info!("Search session closed");
    }

    fn publish(&mut self) {
        self.state.pending = self.debounce.is_armed() || self.requests.has_live();
        self.state_tx.send_replace(self.state.clone());
    }
}
