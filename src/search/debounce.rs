//! Trailing debounce of query changes
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

struct Pending {
    query: String,
    deadline: Instant,
}

/// Holds at most one armed evaluation. Re-arming replaces the previous one,
/// so only the query scheduled last ever fires.
pub struct DebounceScheduler {
    delay: Duration,
    pending: Option<Pending>,
}

impl DebounceScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel whatever is armed and arm `query` to fire after the delay.
    pub fn schedule(&mut self, query: String) {
        if let Some(previous) = self.pending.take() {
            log::trace!("Debounce reset, dropping {:?}", previous.query);
        }
        self.pending = Some(Pending {
            query,
            deadline: Instant::now() + self.delay,
        });
    }

    /// Disarm. Returns whether something was armed.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Resolve with the armed query once its quiet period has elapsed.
    ///
    /// Never resolves while nothing is armed. Cancel safe: dropping the
    /// future before it resolves leaves the armed query in place.
    pub async fn fired(&mut self) -> String {
        let deadline = match &self.pending {
            Some(pending) => pending.deadline,
            None => return std::future::pending().await,
        };
        sleep_until(deadline).await;
        match self.pending.take() {
            Some(pending) => pending.query,
            None => std::future::pending().await,
        }
    }
}
