//! Remote search provider seam
//!
//! The engine never talks to a transport directly. Anything able to answer a
//! text query with an ordered list of [`Item`]s can back a search session.
pub mod catalog;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use catalog::CatalogProvider;

/// One row of a search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub title: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Item {
    pub fn new(id: u64, title: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            description: None,
            thumbnail: None,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  ${}", self.title, self.price)
    }
}

/// Failure of a single lookup.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("lookup task panicked: {0}")]
    Panicked(String),

    /// The lookup was abandoned on purpose. Never reported as a failure.
    #[error("lookup cancelled")]
    Cancelled,
}

impl ProviderError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ProviderError::Cancelled)
    }
}

/// A lookup service returning matching items for a text query.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Return at most `limit` items matching `query`, best first.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Item>, ProviderError>;
}
