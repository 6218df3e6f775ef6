//! In-memory product catalog answering lookups like the remote endpoint
use super::{Item, ProviderError, SearchProvider};
use async_trait::async_trait;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Response body of the product search endpoint.
#[derive(Debug, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Item>,
}

/// Decode a `{"products": [...]}` body.
pub fn decode_products(body: &str) -> Result<Vec<Item>, ProviderError> {
    let response: ProductsResponse = serde_json::from_str(body)?;
    Ok(response.products)
}

pub struct CatalogProvider {
    items: Vec<Item>,
    latency: Duration,
}

impl CatalogProvider {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            latency: Duration::ZERO,
        }
    }

    /// Load a catalog file in the endpoint's response shape.
    pub fn from_path(path: &Path) -> crate::error::Result<Self> {
        let body = fs::read_to_string(path)?;
        let products = decode_products(&body)?;
        log::info!("Loaded {} products from {}", products.len(), path.display());
        Ok(Self::new(products))
    }

    /// A small built-in catalog for trying the engine out.
    pub fn sample() -> Self {
        let mut items = vec![
            Item::new(1, "Running Shoe", 89.99),
            Item::new(2, "Leather Shoe", 120.0),
            Item::new(3, "Shoe Polish", 6.5),
            Item::new(4, "Wireless Headphones", 59.0),
            Item::new(5, "Phone Case", 12.0),
            Item::new(6, "Smartphone Stand", 18.75),
            Item::new(7, "Mechanical Keyboard", 74.0),
            Item::new(8, "Desk Lamp", 32.0),
        ];
        items[0].description = Some("Lightweight shoe for daily runs".to_string());
        items[3].description = Some("Over-ear, noise cancelling".to_string());
        Self::new(items)
    }

    /// Delay every answer, simulating a slow endpoint.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn matches(item: &Item, needle: &str) -> bool {
        item.title.to_lowercase().contains(needle)
            || item
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

#[async_trait]
impl SearchProvider for CatalogProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Item>, ProviderError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let needle = query.to_lowercase();
        Ok(self
            .items
            .iter()
            .filter(|item| Self::matches(item, &needle))
            .take(limit)
            .cloned()
            .collect())
    }
}
