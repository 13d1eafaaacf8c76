//! Trait definition for the search engine transport.
//!
//! Connection management, wire format, timeouts, and retries all live
//! behind [`Transport`]. The orchestrator only hands it a finished
//! [`Query`] and receives a parsed [`ResponseAdapter`].

use crate::error::SearchError;
use crate::types::{Query, ResponseAdapter};

/// Dispatches queries to a remote search engine.
///
/// All implementations must be `Send + Sync` so one transport can be
/// shared by several request-scoped orchestrators.
pub trait Transport: Send + Sync {
    /// Send `query` to the engine and return its reply.
    ///
    /// # Arguments
    ///
    /// * `query` — The fully built and modified query.
    /// * `offset` — Zero-based index of the first requested document.
    /// * `limit` — Maximum number of documents, or `None` for the engine default.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the engine answered without a usable response body.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Transport`] if the request itself fails.
    fn dispatch(
        &self,
        query: &Query,
        offset: usize,
        limit: Option<usize>,
    ) -> impl std::future::Future<Output = Result<Option<ResponseAdapter>, SearchError>> + Send;

    /// Human-readable name of the engine behind this transport.
    fn name(&self) -> &str {
        "search-engine"
    }
}
