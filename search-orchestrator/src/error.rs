//! Error types for the search-orchestrator crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Raw query text never appears in messages.

/// Errors that can occur while building, dispatching, or assembling a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The transport returned no usable response for a dispatched query.
    #[error("incomplete response: {0}")]
    TransportIncomplete(String),

    /// The transport failed while dispatching a query.
    #[error("transport error: {0}")]
    Transport(String),

    /// A single-document lookup found nothing, or a malformed document.
    #[error("document not found: {0}")]
    DocumentNotFound(String),

    /// A registered query modifier does not provide the modifier capability.
    #[error("query modifier contract violation: {0}")]
    ModifierContractViolation(String),

    /// Facet configuration cannot be applied to the response.
    #[error("invalid facet configuration: {0}")]
    InvalidFacetConfiguration(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error while loading or saving configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for search-orchestrator results.
pub type Result<T> = std::result::Result<T, SearchError>;
