pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod provider;
pub mod search;

pub use crate::config::{Config, EngineConfig, ProviderConfig};
pub use crate::error::{Result, TypeaheadError};
pub use crate::metrics::Metrics;
pub use crate::provider::{CatalogProvider, Item, ProviderError, SearchProvider};
pub use crate::search::{SearchEngine, SearchHandle, SearchState, SearchStatus};
pub use clap::Parser;
