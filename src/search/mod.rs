//! Incremental search engine turning keystrokes into a minimal set of lookups
pub mod cache;
pub mod debounce;
pub mod engine;
pub mod request;
mod session;

use crate::provider::Item;
use std::fmt;

pub use engine::{SearchEngine, SearchHandle};

/// Lifecycle of the most recent evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchStatus {
    /// Nothing evaluated yet.
    #[default]
    Idle,
    /// A lookup was dispatched. If the provider abandons it, the status stays
    /// here with `pending == false`; check `pending` before showing a spinner.
    Loading,
    Success,
    Error,
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStatus::Idle => write!(f, "idle"),
            SearchStatus::Loading => write!(f, "loading"),
            SearchStatus::Success => write!(f, "success"),
            SearchStatus::Error => write!(f, "error"),
        }
    }
}

/// Snapshot published to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Latest text entered, as supplied.
    pub query: String,
    pub status: SearchStatus,
    /// Results of the last evaluation that reached `Success`.
    pub results: Vec<Item>,
    /// An evaluation is armed or a lookup is live.
    pub pending: bool,
    /// Sequence number of the last input the session has processed.
    pub input_revision: u64,
}

impl SearchState {
    /// Whether a results container should be visible: there is something to
    /// list, a lookup is running, or the last one failed.
    pub fn shows_panel(&self) -> bool {
        !self.results.is_empty()
            || matches!(self.status, SearchStatus::Loading | SearchStatus::Error)
    }
}
