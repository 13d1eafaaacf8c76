//! # search-orchestrator
//!
//! Query execution and result assembly between a user's search request and
//! a remote search engine.
//!
//! This crate builds the query, hands it to a pluggable [`Transport`], and
//! turns the engine's reply into a structured [`SearchResultSet`]. It does
//! not index, rank, or store anything, and it does not speak any wire
//! protocol itself.
//!
//! ## Design
//!
//! - Before/after hooks, query modifiers, and search components come from
//!   an explicit [`HookRegistry`] injected at construction
//! - Responses are parsed by priority-selected [`ResultParser`]s
//! - Engine-collapsed duplicates are re-expanded into parent + variant trees
//! - Zero-hit searches with spelling suggestions are retried within a fixed budget
//! - Each [`SearchOrchestrator`] keeps exactly one "last result set"
//!
//! ## Concurrency
//!
//! An orchestrator runs one search at a time and is not synchronised.
//! Scope one orchestrator per request or session.

pub mod component;
pub mod config;
pub mod error;
pub mod hooks;
pub mod orchestrator;
pub mod parser;
pub mod query_builder;
pub mod transport;
pub mod types;

pub use component::{ComponentHost, QueryAware, RequestAware, SearchAware, SearchComponent};
pub use config::{FacetConfig, SearchConfig, SpellcheckConfig, VariantsConfig};
pub use error::{Result, SearchError};
pub use hooks::{AfterSearchHook, BeforeSearchHook, HookRegistry, QueryModifier, SearchPlugin};
pub use orchestrator::search::{used_offset, SearchOrchestrator};
pub use parser::{DefaultResultParser, ResultParser, ResultParserRegistry};
pub use query_builder::{DefaultQueryBuilder, QueryBuilder};
pub use transport::Transport;
pub use types::{
    Document, ExpandedGroup, Facet, FacetOption, Query, ResponseAdapter, SearchHandle,
    SearchRequest, SearchResult, SearchResultSet,
};

/// Run a single search with a throwaway orchestrator.
///
/// Convenience wrapper for callers that need neither hooks nor the
/// last-result slot.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid, and otherwise
/// the same errors as [`SearchOrchestrator::search`].
///
/// # Examples
///
/// ```no_run
/// # async fn example(transport: impl search_orchestrator::Transport) -> search_orchestrator::Result<()> {
/// use search_orchestrator::{SearchConfig, SearchRequest};
///
/// let request = SearchRequest::with_query("typo3 extension").page(2);
/// let result_set = search_orchestrator::search(transport, SearchConfig::default(), request).await?;
/// for result in &result_set.results {
///     println!("{}: {}", result.id, result.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search<T: Transport>(
    transport: T,
    config: SearchConfig,
    request: SearchRequest,
) -> Result<SearchResultSet> {
    SearchOrchestrator::new(transport, config)?
        .search(request)
        .await
}
