use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TypeaheadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] crate::provider::ProviderError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Search session is closed")]
    SessionClosed,

    #[error("An unexpected error occurred: {0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TypeaheadError>;
