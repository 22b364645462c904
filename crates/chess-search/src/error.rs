use thiserror::Error;

/// Errors returned by the search entry points.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
