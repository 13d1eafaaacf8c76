//! Core search orchestrator: request → query → dispatch → result set.
//!
//! One [`SearchOrchestrator`] owns exactly one "last result set" slot and
//! is meant to be scoped to a single request or session. It is not
//! synchronised; callers serving concurrent requests create one
//! orchestrator per request.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::hooks::HookRegistry;
use crate::parser::{parse_document, ResultParserRegistry};
use crate::query_builder::{DefaultQueryBuilder, QueryBuilder};
use crate::transport::Transport;
use crate::types::{SearchHandle, SearchRequest, SearchResult, SearchResultSet};

use super::autocorrect::AutoCorrector;
use super::reconcile::reconcile;
use super::variants::expand_variants;

/// Zero-based offset of the first document on `page` (1-based).
///
/// Page 0 is treated as page 1.
pub fn used_offset(page: usize, results_per_page: usize) -> usize {
    page.saturating_sub(1).saturating_mul(results_per_page)
}

/// Sequences one search from request to finished result set.
pub struct SearchOrchestrator<T: Transport> {
    transport: T,
    config: SearchConfig,
    hooks: HookRegistry,
    parsers: ResultParserRegistry,
    query_builder: Box<dyn QueryBuilder>,
    handle: SearchHandle,
    last_result_set: Option<SearchResultSet>,
}

impl<T: Transport> SearchOrchestrator<T> {
    /// Create an orchestrator with no hooks and the default parser and query builder.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` fails validation.
    pub fn new(transport: T, config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let handle = SearchHandle::new(transport.name());
        let parsers = ResultParserRegistry::with_default(&config.identifier_field);
        Ok(Self {
            transport,
            config,
            hooks: HookRegistry::new(),
            parsers,
            query_builder: Box::new(DefaultQueryBuilder),
            handle,
            last_result_set: None,
        })
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_result_parsers(mut self, parsers: ResultParserRegistry) -> Self {
        self.parsers = parsers;
        self
    }

    pub fn with_query_builder(mut self, builder: impl QueryBuilder + 'static) -> Self {
        self.query_builder = Box::new(builder);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn handle(&self) -> &SearchHandle {
        &self.handle
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    /// The result set returned by the most recent `search()` call, searched or not.
    pub fn last_result_set(&self) -> Option<&SearchResultSet> {
        self.last_result_set.as_ref()
    }

    /// True if a search has run and its raw query was blank.
    pub fn last_search_was_executed_with_empty_query_string(&self) -> bool {
        self.last_result_set
            .as_ref()
            .is_some_and(|rs| rs.has_searched && rs.request.raw_query_is_empty_string())
    }

    /// Run a search for `request`.
    ///
    /// # Pipeline
    ///
    /// 1. Bind an empty result set to the request
    /// 2. Run before-search hooks
    /// 3. Short-circuit (not searched) when the query text is unusable
    /// 4. Build the query
    /// 5. Initialise search components
    /// 6. Apply query modifiers
    /// 7. Dispatch at `(page - 1) * per_page`
    /// 8. Force the total to zero when the page size is zero
    /// 9. Parse the response
    /// 10. Expand variants
    /// 11. Reconcile results and facets
    /// 12. Retry with spelling suggestions on zero hits
    /// 13. Run after-search hooks
    /// 14. Remember the result set as the last one
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::TransportIncomplete`] if the engine gives no
    /// usable response, and propagates transport, modifier, parser, and
    /// facet errors unchanged.
    pub async fn search(&mut self, request: SearchRequest) -> Result<SearchResultSet, SearchError> {
        let result_set = self.execute(request).await?;
        if !result_set.has_searched {
            self.last_result_set = Some(result_set.clone());
            return Ok(result_set);
        }
        // 12. Auto-correct
        let result_set = self.auto_correct(result_set).await?;
        // 13. After-search hooks
        let result_set = self.hooks.run_after_search(result_set);
        // 14. Record
        self.last_result_set = Some(result_set.clone());
        Ok(result_set)
    }

    /// Look up a single document by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::DocumentNotFound`] if the engine returns no
    /// document, a document without identifier, or a different document.
    pub async fn get_document_by_id(&mut self, id: &str) -> Result<SearchResult, SearchError> {
        let mut query = self
            .query_builder
            .new_search_query(id)
            .restrict_to_field(self.config.identifier_field.as_str());
        query.set_rows(1);

        tracing::debug!(field = %self.config.identifier_field, "document lookup");
        let response = self
            .transport
            .dispatch(&query, 0, Some(1))
            .await?
            .ok_or_else(|| SearchError::TransportIncomplete("document lookup".into()))?;

        response
            .documents
            .first()
            .and_then(|doc| {
                parse_document(doc, &self.config.identifier_field, self.config.use_raw_documents)
            })
            .filter(|result| result.id == id)
            .ok_or_else(|| SearchError::DocumentNotFound(id.to_owned()))
    }

    /// Steps 1–11 for one request.
    async fn execute(&mut self, request: SearchRequest) -> Result<SearchResultSet, SearchError> {
        let per_page = request
            .requested_results_per_page()
            .unwrap_or(self.config.results_per_page);
        let page = request.requested_page().max(1);

        // 1. Bind
        let result_set = SearchResultSet::new(self.handle.clone(), request, page, per_page);
        // 2. Before-search hooks may rewrite the request or paging
        let mut result_set = self.hooks.run_before_search(result_set);
        let request = result_set.request.clone();
        let (page, per_page) = (result_set.page, result_set.results_per_page);

        // 3. Short-circuit
        if self.should_skip(&request) {
            tracing::debug!("search skipped: no usable query text");
            result_set.has_searched = false;
            return Ok(result_set);
        }

        let raw_text = request
            .raw_query()
            .unwrap_or(self.config.initial_query.as_str());
        // 4. Build
        tracing::trace!(query = raw_text, "building search query");
        let query = self
            .query_builder
            .build_search_query(raw_text, per_page, &request, &self.config);

        // 5. Components see the query before any modifier touches it
        self.hooks
            .components_mut()
            .initialize_components(&self.config, &query, &request, &self.handle);

        // 6. Modify
        let mut query = self.hooks.apply_query_modifiers(query)?;
        let offset = used_offset(page, per_page);
        query.set_offset(offset);

        // 7. Dispatch
        tracing::debug!(offset, limit = per_page, "dispatching search query");
        let response = self
            .transport
            .dispatch(&query, offset, Some(per_page))
            .await?
            .ok_or_else(|| {
                SearchError::TransportIncomplete(format!("search on {}", self.handle.engine))
            })?;

        // 8. Forced zero
        result_set.all_result_count = if per_page == 0 { 0 } else { response.num_found };
        result_set.has_searched = true;
        result_set.response = Some(response);
        // 9. Parse
        self.parsers
            .parse(&mut result_set, self.config.use_raw_documents)?;
        result_set.used_additional_filters =
            self.query_builder.additional_filters(&request, &self.config);
        result_set.query = Some(query);
        tracing::debug!(
            count = result_set.results.len(),
            total = result_set.all_result_count,
            "response parsed"
        );

        // 10. Variants
        expand_variants(
            &mut result_set,
            &self.config.variants,
            &self.config.identifier_field,
            self.config.use_raw_documents,
        );
        // 11. Reconcile
        reconcile(&mut result_set, &self.config.facets)?;
        tracing::debug!(
            with_variants = result_set.result_count_with_variants(),
            facets = result_set.facets.len(),
            "result set assembled"
        );

        Ok(result_set)
    }

    /// A corrected retry: a complete, independent pipeline run.
    async fn run_attempt(&mut self, request: SearchRequest) -> Result<SearchResultSet, SearchError> {
        let result_set = self.execute(request).await?;
        if !result_set.has_searched {
            self.last_result_set = Some(result_set.clone());
            return Ok(result_set);
        }
        let result_set = self.hooks.run_after_search(result_set);
        self.last_result_set = Some(result_set.clone());
        Ok(result_set)
    }

    async fn auto_correct(
        &mut self,
        result_set: SearchResultSet,
    ) -> Result<SearchResultSet, SearchError> {
        let mut corrector = AutoCorrector::new(&self.config.spellcheck);
        let suggestions = corrector.begin(&result_set);
        if suggestions.is_empty() {
            return Ok(result_set);
        }

        let original_request = result_set.request.clone();
        let original = original_request.raw_query();
        let mut latest = result_set;
        for (attempt, suggestion) in suggestions.iter().enumerate() {
            tracing::debug!(attempt = attempt + 1, "retrying with spelling suggestion");
            let corrected = original_request.with_replaced_query(suggestion);
            let attempted = self.run_attempt(corrected).await?;
            if attempted.all_result_count > 0 {
                tracing::info!(attempt = attempt + 1, "search auto-corrected");
                return Ok(AutoCorrector::mark_corrected(attempted, original, suggestion));
            }
            if attempted.has_searched {
                latest = attempted;
            }
        }
        tracing::debug!(attempts = suggestions.len(), "auto-correction exhausted");
        Ok(latest)
    }

    fn should_skip(&self, request: &SearchRequest) -> bool {
        if request.raw_query_is_null() && !self.config.initial_search_enabled {
            return true;
        }
        request.raw_query_is_empty_string() && !self.config.allow_empty_query
    }
}

impl<T: Transport> std::fmt::Debug for SearchOrchestrator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("handle", &self.handle)
            .field("hooks", &self.hooks)
            .field("parsers", &self.parsers)
            .finish_non_exhaustive()
    }
}
