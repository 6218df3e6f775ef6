use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Reads the input box's successive values from stdin, one per line, and
/// renders what the search engine publishes.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Product catalog in the endpoint's `{"products": [...]}` shape
    #[clap(long, value_parser)]
    pub catalog: Option<PathBuf>,

    /// Config file to use instead of the default search locations
    #[clap(long, value_parser)]
    pub config: Option<PathBuf>,

    #[clap(long, value_parser)]
    pub debounce_ms: Option<u64>,

    #[clap(long, value_parser)]
    pub cache_capacity: Option<usize>,

    #[clap(long, value_parser)]
    pub max_results: Option<usize>,

    /// Simulated provider latency
    #[clap(long, value_parser)]
    pub latency_ms: Option<u64>,

    #[clap(long, value_parser, default_value_t = false)]
    pub verbose: bool,

    #[clap(long, value_parser)]
    pub log: Option<PathBuf>,

    /// Save the merged configuration to this path and exit
    #[clap(long, value_parser)]
    pub write_config: Option<PathBuf>,

    /// Print engine metrics on exit
    #[clap(long, value_parser, default_value_t = false)]
    pub metrics: bool,
}

impl Cli {
    /// Overlay command-line values on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(catalog) = &self.catalog {
            config.provider.catalog = Some(catalog.clone());
        }
        if let Some(latency_ms) = self.latency_ms {
            config.provider.latency_ms = latency_ms;
        }
        if let Some(debounce_ms) = self.debounce_ms {
            config.engine.debounce_ms = debounce_ms;
        }
        if let Some(cache_capacity) = self.cache_capacity {
            config.engine.cache_capacity = cache_capacity;
        }
        if let Some(max_results) = self.max_results {
            config.engine.max_results = max_results;
        }
    }
}
