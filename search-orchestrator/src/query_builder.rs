//! Query construction from raw user text and configuration.

use crate::config::SearchConfig;
use crate::types::{Query, SearchRequest};

/// Builds the outgoing [`Query`] for a search or a document lookup.
pub trait QueryBuilder: Send + Sync {
    /// Build a full search query.
    ///
    /// `extra_filters` are the request's filter parameters; configured
    /// filters are added on top of them.
    fn build_search_query(
        &self,
        raw_text: &str,
        page_size: usize,
        request: &SearchRequest,
        config: &SearchConfig,
    ) -> Query;

    /// Start a plain query for `text`, used for single-document lookups.
    fn new_search_query(&self, text: &str) -> Query {
        Query::new(text)
    }

    /// The filter expressions `build_search_query` applies for `request`.
    fn additional_filters(&self, request: &SearchRequest, config: &SearchConfig) -> Vec<String>;
}

/// Builds queries from configuration alone: return fields, configured
/// filters, then request filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultQueryBuilder;

impl QueryBuilder for DefaultQueryBuilder {
    fn build_search_query(
        &self,
        raw_text: &str,
        page_size: usize,
        request: &SearchRequest,
        config: &SearchConfig,
    ) -> Query {
        let mut query = Query::new(raw_text.trim());
        query.set_rows(page_size);
        for field in &config.return_fields {
            query.add_return_field(field.as_str());
        }
        for filter in self.additional_filters(request, config) {
            query.add_filter(filter);
        }
        query
    }

    fn additional_filters(&self, request: &SearchRequest, config: &SearchConfig) -> Vec<String> {
        let mut filters: Vec<String> = Vec::new();
        let configured = config.additional_filters.values();
        let requested = request.additional_filters().values();
        for filter in configured.chain(requested) {
            let filter = filter.trim();
            if !filter.is_empty() && !filters.iter().any(|f| f == filter) {
                filters.push(filter.to_owned());
            }
        }
        filters
    }
}
