//! Core types: requests, queries, engine responses, and assembled result sets.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A raw engine document: field name to JSON value.
pub type Document = serde_json::Map<String, Value>;

/// A user's search intent for one interaction.
///
/// The raw query distinguishes "absent" (`None`) from "present but empty".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    raw_query: Option<String>,
    page: usize,
    results_per_page: Option<usize>,
    additional_filters: BTreeMap<String, String>,
}

impl SearchRequest {
    /// A request without any query string.
    pub fn new() -> Self {
        Self::default()
    }

    /// A request for the given raw query string.
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            raw_query: Some(query.into()),
            ..Self::default()
        }
    }

    /// Sets the requested page (1-based; 0 is treated as the first page).
    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Overrides the configured results per page for this request.
    pub fn results_per_page(mut self, per_page: usize) -> Self {
        self.results_per_page = Some(per_page);
        self
    }

    /// Adds a named filter parameter.
    pub fn filter(mut self, name: impl Into<String>, expression: impl Into<String>) -> Self {
        self.additional_filters.insert(name.into(), expression.into());
        self
    }

    pub fn raw_query(&self) -> Option<&str> {
        self.raw_query.as_deref()
    }

    pub fn requested_page(&self) -> usize {
        self.page
    }

    pub fn requested_results_per_page(&self) -> Option<usize> {
        self.results_per_page
    }

    pub fn additional_filters(&self) -> &BTreeMap<String, String> {
        &self.additional_filters
    }

    /// True when no query string was supplied at all.
    pub fn raw_query_is_null(&self) -> bool {
        self.raw_query.is_none()
    }

    /// True when a query string was supplied but is blank.
    pub fn raw_query_is_empty_string(&self) -> bool {
        self.raw_query
            .as_deref()
            .is_some_and(|q| q.trim().is_empty())
    }

    /// Copy of this request with the raw query replaced.
    pub(crate) fn with_replaced_query(&self, query: &str) -> Self {
        Self {
            raw_query: Some(query.to_owned()),
            ..self.clone()
        }
    }
}

/// The outgoing engine query. Built fresh for every dispatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    query_string: String,
    query_fields: Vec<String>,
    filters: Vec<String>,
    return_fields: Vec<String>,
    sort: Option<String>,
    rows: usize,
    offset: usize,
}

impl Query {
    pub fn new(query_string: impl Into<String>) -> Self {
        Self {
            query_string: query_string.into(),
            ..Self::default()
        }
    }

    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    pub fn set_query_string(&mut self, query_string: impl Into<String>) {
        self.query_string = query_string.into();
    }

    /// Restricts matching to a single field. Replaces earlier restrictions.
    pub fn restrict_to_field(mut self, field: impl Into<String>) -> Self {
        self.query_fields = vec![field.into()];
        self
    }

    pub fn query_fields(&self) -> &[String] {
        &self.query_fields
    }

    /// Adds a filter expression. Filters form an ordered set.
    pub fn add_filter(&mut self, filter: impl Into<String>) {
        let filter = filter.into();
        if !self.filters.contains(&filter) {
            self.filters.push(filter);
        }
    }

    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    pub fn add_return_field(&mut self, field: impl Into<String>) {
        let field = field.into();
        if !self.return_fields.contains(&field) {
            self.return_fields.push(field);
        }
    }

    pub fn return_fields(&self) -> &[String] {
        &self.return_fields
    }

    pub fn set_sort(&mut self, sort: impl Into<String>) {
        self.sort = Some(sort.into());
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn set_rows(&mut self, rows: usize) {
        self.rows = rows;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Documents collapsed beneath one group head by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpandedGroup {
    /// How many other members the group has in total.
    pub num_found: usize,
    /// The members the engine actually returned.
    pub documents: Vec<Document>,
}

/// Parsed engine reply. Read-only once produced by the transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseAdapter {
    /// Total number of matching documents.
    pub num_found: u64,
    /// Documents of the requested page, in engine order.
    pub documents: Vec<Document>,
    /// Collapsed group members keyed by the group head's grouping value.
    pub expanded: HashMap<String, ExpandedGroup>,
    /// Spell-check suggestions in engine order.
    pub spelling_suggestions: Vec<String>,
    /// Facet counts: field to ordered `(value, count)` pairs.
    pub facet_fields: BTreeMap<String, Vec<(String, u64)>>,
}

/// One normalised hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub result_type: String,
    pub title: String,
    pub fields: Document,
    /// Whether this result was collapsed beneath another one.
    pub is_variant: bool,
    /// Identifier of the parent result. Never owns the parent.
    pub variant_parent: Option<String>,
    /// Attached variants. Always empty on a variant.
    pub variants: Vec<SearchResult>,
    /// Total variants the engine reported; may exceed `variants.len()`.
    pub variants_found: usize,
}

impl SearchResult {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// String value of a field, if present and a string.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// One option of a finalised facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    pub value: String,
    pub count: u64,
}

/// A facet rebuilt from the response's facet counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub name: String,
    pub field: String,
    pub options: Vec<FacetOption>,
}

/// Identifies the orchestrator instance a result set came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchHandle {
    pub id: Uuid,
    /// Name of the transport the orchestrator dispatches through.
    pub engine: String,
}

impl SearchHandle {
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            engine: engine.into(),
        }
    }
}

impl fmt::Display for SearchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.engine, self.id)
    }
}

/// The outcome of one `search()` invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultSet {
    pub handle: SearchHandle,
    pub request: SearchRequest,
    /// The query actually dispatched, after all modifiers ran.
    pub query: Option<Query>,
    pub response: Option<ResponseAdapter>,
    /// Top-level results only; variants hang off their parents.
    pub results: Vec<SearchResult>,
    pub all_result_count: u64,
    pub page: usize,
    pub results_per_page: usize,
    /// False when the search was short-circuited without contacting the engine.
    pub has_searched: bool,
    pub is_auto_corrected: bool,
    pub initial_query_string: Option<String>,
    pub corrected_query_string: Option<String>,
    /// Filter expressions the query builder applied.
    pub used_additional_filters: Vec<String>,
    pub facets: Vec<Facet>,
}

impl SearchResultSet {
    /// An empty, not-yet-searched result set bound to a request.
    pub fn new(
        handle: SearchHandle,
        request: SearchRequest,
        page: usize,
        results_per_page: usize,
    ) -> Self {
        Self {
            handle,
            request,
            query: None,
            response: None,
            results: Vec::new(),
            all_result_count: 0,
            page,
            results_per_page,
            has_searched: false,
            is_auto_corrected: false,
            initial_query_string: None,
            corrected_query_string: None,
            used_additional_filters: Vec::new(),
            facets: Vec::new(),
        }
    }

    /// Spell-check suggestions of the attached response.
    pub fn spelling_suggestions(&self) -> &[String] {
        self.response
            .as_ref()
            .map(|r| r.spelling_suggestions.as_slice())
            .unwrap_or_default()
    }

    /// Number of results including attached variants.
    pub fn result_count_with_variants(&self) -> usize {
        self.results.iter().map(|r| 1 + r.variants.len()).sum()
    }
}
