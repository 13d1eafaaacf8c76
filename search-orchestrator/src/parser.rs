//! Turning engine documents into [`SearchResult`] records.
//!
//! Parsers are selected per result set from a [`ResultParserRegistry`] by
//! descending priority. The [`DefaultResultParser`] accepts anything at
//! priority 0, so specialised parsers register with a higher priority.

use serde_json::Value;

use crate::error::SearchError;
use crate::types::{Document, SearchResult, SearchResultSet};

/// A format-specific parser for a response's documents.
pub trait ResultParser: Send + Sync {
    fn name(&self) -> &str;

    /// Higher priority parsers are asked first.
    fn priority(&self) -> i32 {
        0
    }

    /// Whether this parser understands the attached response.
    fn can_parse(&self, result_set: &SearchResultSet) -> bool;

    /// Append parsed top-level results to `result_set.results`.
    ///
    /// In `raw_mode` documents are kept verbatim, engine-internal fields included.
    ///
    /// # Errors
    ///
    /// Returns an error if the response cannot be parsed at all.
    fn parse(&self, result_set: &mut SearchResultSet, raw_mode: bool) -> Result<(), SearchError>;
}

/// Parses flat documents using a configurable identifier field.
#[derive(Debug, Clone)]
pub struct DefaultResultParser {
    identifier_field: String,
}

impl DefaultResultParser {
    pub fn new(identifier_field: impl Into<String>) -> Self {
        Self {
            identifier_field: identifier_field.into(),
        }
    }
}

impl Default for DefaultResultParser {
    fn default() -> Self {
        Self::new("id")
    }
}

impl ResultParser for DefaultResultParser {
    fn name(&self) -> &str {
        "default"
    }

    fn can_parse(&self, _result_set: &SearchResultSet) -> bool {
        true
    }

    fn parse(&self, result_set: &mut SearchResultSet, raw_mode: bool) -> Result<(), SearchError> {
        let Some(response) = result_set.response.as_ref() else {
            return Ok(());
        };
        let mut parsed = Vec::with_capacity(response.documents.len());
        for (position, document) in response.documents.iter().enumerate() {
            match parse_document(document, &self.identifier_field, raw_mode) {
                Some(result) => parsed.push(result),
                None => tracing::warn!(
                    position,
                    field = %self.identifier_field,
                    "skipping document without identifier"
                ),
            }
        }
        result_set.results.extend(parsed);
        Ok(())
    }
}

/// Convert one engine document into a top-level result.
///
/// Returns `None` when the identifier field is missing or not a scalar.
pub fn parse_document(
    document: &Document,
    identifier_field: &str,
    raw_mode: bool,
) -> Option<SearchResult> {
    let id = match document.get(identifier_field)? {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let fields: Document = if raw_mode {
        document.clone()
    } else {
        document
            .iter()
            .filter(|(name, _)| !name.starts_with('_'))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    };
    Some(SearchResult {
        id,
        result_type: string_field(document, "type"),
        title: string_field(document, "title"),
        fields,
        ..SearchResult::default()
    })
}

fn string_field(document: &Document, name: &str) -> String {
    document
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// Ordered set of result parsers.
pub struct ResultParserRegistry {
    parsers: Vec<Box<dyn ResultParser>>,
}

impl ResultParserRegistry {
    /// An empty registry. Parsing fails until a parser is registered.
    pub fn empty() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// A registry holding only the default parser.
    pub fn with_default(identifier_field: &str) -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(DefaultResultParser::new(identifier_field)));
        registry
    }

    /// Register a parser. Equal priorities keep registration order.
    pub fn register(&mut self, parser: Box<dyn ResultParser>) {
        self.parsers.push(parser);
        self.parsers.sort_by_key(|p| std::cmp::Reverse(p.priority()));
    }

    /// The parser that would handle `result_set`.
    pub fn parser_for(&self, result_set: &SearchResultSet) -> Option<&dyn ResultParser> {
        self.parsers
            .iter()
            .find(|p| p.can_parse(result_set))
            .map(|p| p.as_ref())
    }

    /// Select a parser for `result_set` and run it.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if no registered parser accepts the
    /// result set, or whatever the selected parser returns.
    pub fn parse(&self, result_set: &mut SearchResultSet, raw_mode: bool) -> Result<(), SearchError> {
        let parser = self
            .parser_for(result_set)
            .ok_or_else(|| SearchError::Config("no result parser accepts the response".into()))?;
        tracing::trace!(parser = parser.name(), raw_mode, "parsing response");
        parser.parse(result_set, raw_mode)
    }
}

impl std::fmt::Debug for ResultParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.parsers.iter().map(|p| p.name()))
            .finish()
    }
}
