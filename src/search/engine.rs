//! Session construction and the handle given to the presentation layer
use super::session::{Command, SearchSession};
use super::SearchState;
use crate::config::EngineConfig;
use crate::error::{Result, TypeaheadError};
use crate::metrics::Metrics;
use crate::provider::SearchProvider;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Validated engine settings plus the metrics shared by its sessions.
pub struct SearchEngine {
    config: EngineConfig,
    metrics: Arc<Metrics>,
}

impl SearchEngine {
    /// Create a new search engine. Invalid settings are rejected here rather
    /// than surfacing on the first query.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_metrics(config, Arc::new(Metrics::new()))
    }

    pub fn with_metrics(config: EngineConfig, metrics: Arc<Metrics>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, metrics })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Spawn a session answering from `provider`. Each session gets its own
    /// empty cache. Must be called within a tokio runtime.
    pub fn start(&self, provider: Arc<dyn SearchProvider>) -> Result<SearchHandle> {
        let (state_tx, state_rx) = watch::channel(SearchState::default());
        let session = SearchSession::new(&self.config, provider, self.metrics(), state_tx)?;
        let (commands, command_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(session.run(command_rx));

        Ok(SearchHandle {
            commands,
            state: state_rx,
            revision: 0,
            metrics: self.metrics(),
            task,
        })
    }
}

/// Presentation-side end of a session.
///
/// Dropping the handle tears the session down just like
/// [`shutdown`](Self::shutdown), without waiting for it.
pub struct SearchHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SearchState>,
    revision: u64,
    metrics: Arc<Metrics>,
    task: JoinHandle<()>,
}

impl SearchHandle {
    /// Report the input box's new content.
    pub fn set_query(&mut self, query: impl Into<String>) -> Result<()> {
        self.revision += 1;
        self.send(Command::SetQuery {
            query: query.into(),
            revision: self.revision,
        })
    }

    /// Empty the input box, hiding current results right away.
    pub fn clear(&mut self) -> Result<()> {
        self.revision += 1;
        self.send(Command::Clear {
            revision: self.revision,
        })
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| TypeaheadError::SessionClosed)
    }

    /// Latest published state.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Wait until every input sent so far has been processed and no
    /// evaluation or lookup is outstanding.
    pub async fn settled(&mut self) -> Result<SearchState> {
        let revision = self.revision;
        let state = self
            .state
            .wait_for(|state| state.input_revision >= revision && !state.pending)
            .await
            .map_err(|_| TypeaheadError::SessionClosed)?;
        Ok(state.clone())
    }

    /// Cancel the pending evaluation and any live lookup, then wait for the
    /// session task to finish.
    pub async fn shutdown(self) -> Result<()> {
        // Already gone is fine.
        let _ = self.commands.send(Command::Shutdown);
        self.task
            .await
            .map_err(|e| TypeaheadError::Other(format!("search session task failed: {e}")))
    }
}
