//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] is read-only from the orchestrator's point of view. It
//! controls pagination, empty-query policy, variant grouping, spell-check
//! auto-correction, and facet finalisation. Missing TOML fields fall back
//! to defaults.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Configuration consulted by the search orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Results per page when the request does not specify one.
    /// Zero suppresses the reported result count.
    pub results_per_page: usize,
    /// Field holding the stable document identifier.
    pub identifier_field: String,
    /// Whether a present but blank query string is still searched.
    pub allow_empty_query: bool,
    /// Whether a request without any query string runs an initial search.
    pub initial_search_enabled: bool,
    /// Query text used for the initial search.
    pub initial_query: String,
    /// Fields the engine should return for each document.
    pub return_fields: Vec<String>,
    /// Named filter expressions added to every query, applied in key order.
    pub additional_filters: BTreeMap<String, String>,
    /// Keep engine-internal fields on parsed results.
    pub use_raw_documents: bool,
    /// Variant grouping settings.
    pub variants: VariantsConfig,
    /// Spell-check auto-correction settings.
    pub spellcheck: SpellcheckConfig,
    /// Facets rebuilt from the response during finalisation.
    pub facets: Vec<FacetConfig>,
}

/// Variant (collapsed duplicate) grouping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantsConfig {
    /// Whether grouped documents are expanded into variants.
    pub enabled: bool,
    /// Field the engine collapses on. Matched case-sensitively.
    pub field: String,
    /// Maximum number of variants attached to a single result.
    pub expand_limit: usize,
}

/// Spell-check driven auto-correction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellcheckConfig {
    /// Retry zero-hit searches with suggested query strings.
    pub autocorrect_enabled: bool,
    /// Maximum number of corrected searches per top-level search.
    pub max_attempts: usize,
}

/// A facet to finalise from the response's facet data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FacetConfig {
    /// Public facet name. Must be unique.
    pub name: String,
    /// Engine field the facet counts are taken from.
    pub field: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            results_per_page: 10,
            identifier_field: "id".into(),
            allow_empty_query: false,
            initial_search_enabled: false,
            initial_query: String::new(),
            return_fields: vec!["*".into(), "score".into()],
            additional_filters: BTreeMap::new(),
            use_raw_documents: false,
            variants: VariantsConfig::default(),
            spellcheck: SpellcheckConfig::default(),
            facets: Vec::new(),
        }
    }
}

impl Default for VariantsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            field: "variantId".into(),
            expand_limit: 10,
        }
    }
}

impl Default for SpellcheckConfig {
    fn default() -> Self {
        Self {
            autocorrect_enabled: false,
            max_attempts: 1,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `identifier_field` must not be empty
    /// - `variants.field` must not be empty when variants are enabled
    /// - `spellcheck.max_attempts` must be greater than 0 when auto-correction is enabled
    ///
    /// Facet definitions are checked later, when they are applied to a response.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.identifier_field.trim().is_empty() {
            return Err(SearchError::Config(
                "identifier_field must not be empty".into(),
            ));
        }
        if self.variants.enabled && self.variants.field.trim().is_empty() {
            return Err(SearchError::Config(
                "variants.field must not be empty when variants are enabled".into(),
            ));
        }
        if self.spellcheck.autocorrect_enabled && self.spellcheck.max_attempts == 0 {
            return Err(SearchError::Config(
                "spellcheck.max_attempts must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SearchError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| SearchError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<(), SearchError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SearchError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
