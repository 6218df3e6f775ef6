//! Ownership of the single in-flight provider lookup of a session
use crate::provider::{Item, ProviderError};
use std::future;
use tokio::task::{JoinError, JoinHandle};

/// Identifies one dispatched lookup.
///
/// Tokens are compared by generation; a reply is only acted upon while its
/// token is still the live one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    generation: u64,
    query: String,
}

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// How a lookup ended.
#[derive(Debug)]
pub enum FetchOutcome {
    Found(Vec<Item>),
    Failed(ProviderError),
    /// Aborted or abandoned; carries no information for the user.
    Cancelled,
}

impl FetchOutcome {
    fn from_join(joined: Result<Result<Vec<Item>, ProviderError>, JoinError>) -> Self {
        match joined {
            Ok(Ok(items)) => FetchOutcome::Found(items),
            Ok(Err(err)) if err.is_cancellation() => FetchOutcome::Cancelled,
            Ok(Err(err)) => FetchOutcome::Failed(err),
            Err(err) if err.is_cancelled() => FetchOutcome::Cancelled,
            Err(err) => FetchOutcome::Failed(ProviderError::Panicked(err.to_string())),
        }
    }
}

/// A settled lookup, tagged with the token it was issued under.
#[derive(Debug)]
pub struct Completion {
    pub token: RequestToken,
    pub outcome: FetchOutcome,
}

struct InFlight {
    generation: u64,
    query: String,
    task: Option<JoinHandle<Result<Vec<Item>, ProviderError>>>,
}

pub struct RequestController {
    generation: u64,
    live: Option<InFlight>,
}

impl Default for RequestController {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestController {
    pub fn new() -> Self {
        Self {
            generation: 0,
            live: None,
        }
    }

    /// Cancel the live token, if any, and hand out a fresh one for `query`.
    pub fn issue(&mut self, query: impl Into<String>) -> RequestToken {
        self.cancel();
        self.generation += 1;
        let query = query.into();
        self.live = Some(InFlight {
            generation: self.generation,
            query: query.clone(),
            task: None,
        });
        RequestToken {
            generation: self.generation,
            query,
        }
    }

    /// Bind the task performing the lookup to `token`.
    ///
    /// A task for a token that is no longer live is aborted straight away.
    pub fn attach(
        &mut self,
        token: &RequestToken,
        task: JoinHandle<Result<Vec<Item>, ProviderError>>,
    ) {
        match self.live.as_mut() {
            Some(live) if live.generation == token.generation => {
                if let Some(previous) = live.task.replace(task) {
                    previous.abort();
                }
            }
            _ => task.abort(),
        }
    }

    pub fn is_live(&self, token: &RequestToken) -> bool {
        self.live
            .as_ref()
            .is_some_and(|live| live.generation == token.generation)
    }

    pub fn has_live(&self) -> bool {
        self.live.is_some()
    }

    /// Retire `token` because its lookup settled.
    ///
    /// Returns false when the token had already been superseded or
    /// cancelled, in which case the reply must be ignored.
    pub fn settle(&mut self, token: &RequestToken) -> bool {
        if !self.is_live(token) {
            return false;
        }
        self.live = None;
        true
    }

    /// Invalidate the live token and abort its task. Returns whether a token
    /// was live.
    pub fn cancel(&mut self) -> bool {
        match self.live.take() {
            Some(live) => {
                log::debug!(
                    "Cancelling lookup #{} for {:?}",
                    live.generation,
                    live.query
                );
                if let Some(task) = live.task {
                    task.abort();
                }
                true
            }
            None => false,
        }
    }

    /// Resolve when the live lookup's task finishes.
    ///
    /// Never resolves while no task is attached. Cancel safe; the token stays
    /// live until [`settle`](Self::settle) or [`cancel`](Self::cancel).
    pub async fn completion(&mut self) -> Completion {
        let Some(live) = self.live.as_mut() else {
            return future::pending().await;
        };
        let Some(task) = live.task.as_mut() else {
            return future::pending().await;
        };
        let joined = task.await;
        // The handle must not be polled again once it has produced output.
        live.task = None;
        Completion {
            token: RequestToken {
                generation: live.generation,
                query: live.query.clone(),
            },
            outcome: FetchOutcome::from_join(joined),
        }
    }
}
