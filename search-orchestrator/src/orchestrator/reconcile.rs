//! Final fix-up of a parsed, variant-expanded result set.
//!
//! Re-establishes the parent/variant invariants after parsers, variant
//! expansion, and hooks had their way with the results, and rebuilds
//! configured facets from the response. Running it twice yields the same
//! result set as running it once.

use std::collections::HashSet;

use crate::config::FacetConfig;
use crate::error::SearchError;
use crate::types::{Facet, FacetOption, SearchResultSet};

use super::variants::into_variant;

/// Reconcile results and facets of `result_set` in place.
///
/// # Errors
///
/// Returns [`SearchError::InvalidFacetConfiguration`] if a facet has no
/// name or field, or two facets share a name.
pub fn reconcile(result_set: &mut SearchResultSet, facets: &[FacetConfig]) -> Result<(), SearchError> {
    for result in &mut result_set.results {
        result.is_variant = false;
        result.variant_parent = None;

        let parent_id = result.id.clone();
        let mut seen = HashSet::new();
        result.variants = std::mem::take(&mut result.variants)
            .into_iter()
            .filter(|v| v.id != parent_id && seen.insert(v.id.clone()))
            .map(|v| into_variant(v, &parent_id))
            .collect();
        result.variants_found = result.variants_found.max(result.variants.len());
    }

    result_set.facets = build_facets(result_set, facets)?;
    Ok(())
}

fn build_facets(result_set: &SearchResultSet, facets: &[FacetConfig]) -> Result<Vec<Facet>, SearchError> {
    let mut names = HashSet::new();
    let mut built = Vec::with_capacity(facets.len());
    for facet in facets {
        if facet.name.trim().is_empty() {
            return Err(SearchError::InvalidFacetConfiguration(
                "facet name must not be empty".into(),
            ));
        }
        if facet.field.trim().is_empty() {
            return Err(SearchError::InvalidFacetConfiguration(format!(
                "facet {} has no field",
                facet.name
            )));
        }
        if !names.insert(facet.name.as_str()) {
            return Err(SearchError::InvalidFacetConfiguration(format!(
                "facet {} is configured twice",
                facet.name
            )));
        }

        let options = result_set
            .response
            .as_ref()
            .and_then(|r| r.facet_fields.get(&facet.field))
            .map(|counts| {
                counts
                    .iter()
                    .map(|(value, count)| FacetOption {
                        value: value.clone(),
                        count: *count,
                    })
                    .collect()
            })
            .unwrap_or_default();

        built.push(Facet {
            name: facet.name.clone(),
            field: facet.field.clone(),
            options,
        });
    }
    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ResponseAdapter, SearchHandle, SearchRequest, SearchResult};

    fn result(id: &str) -> SearchResult {
        SearchResult {
            id: id.into(),
            ..SearchResult::default()
        }
    }

    fn messy_set() -> SearchResultSet {
        let mut set = SearchResultSet::new(
            SearchHandle::new("mock"),
            SearchRequest::with_query("q"),
            1,
            10,
        );
        let mut parent = result("p");
        parent.is_variant = true;
        parent.variants = vec![result("p"), result("v1"), result("v1"), {
            let mut nested = result("v2");
            nested.variants = vec![result("deep")];
            nested.variants_found = 3;
            nested
        }];
        set.results = vec![parent, result("solo")];
        set.response = Some(ResponseAdapter {
            num_found: 2,
            facet_fields: [(
                "type".to_string(),
                vec![("pages".to_string(), 5), ("news".to_string(), 2)],
            )]
            .into_iter()
            .collect(),
            ..Default::default()
        });
        set
    }

    fn facets() -> Vec<FacetConfig> {
        vec![
            FacetConfig {
                name: "contentType".into(),
                field: "type".into(),
            },
            FacetConfig {
                name: "author".into(),
                field: "author".into(),
            },
        ]
    }

    #[test]
    fn restores_variant_invariants() {
        let mut set = messy_set();
        reconcile(&mut set, &[]).expect("reconcile");

        let parent = &set.results[0];
        assert!(!parent.is_variant);
        let ids: Vec<_> = parent.variants.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["v1", "v2"]);
        for variant in &parent.variants {
            assert!(variant.is_variant);
            assert_eq!(variant.variant_parent.as_deref(), Some("p"));
            assert!(variant.variants.is_empty());
            assert_eq!(variant.variants_found, 0);
        }
        assert_eq!(parent.variants_found, 2);
    }

    #[test]
    fn is_idempotent() {
        let mut once = messy_set();
        reconcile(&mut once, &facets()).expect("first pass");
        let mut twice = once.clone();
        reconcile(&mut twice, &facets()).expect("second pass");
        assert_eq!(once, twice);
    }

    #[test]
    fn builds_facets_from_response_counts() {
        let mut set = messy_set();
        reconcile(&mut set, &facets()).expect("reconcile");
        assert_eq!(set.facets.len(), 2);
        assert_eq!(set.facets[0].name, "contentType");
        assert_eq!(
            set.facets[0].options,
            vec![
                FacetOption {
                    value: "pages".into(),
                    count: 5
                },
                FacetOption {
                    value: "news".into(),
                    count: 2
                },
            ]
        );
        assert!(set.facets[1].options.is_empty());
    }

    #[test]
    fn facet_without_field_is_invalid() {
        let mut set = messy_set();
        let bad = vec![FacetConfig {
            name: "broken".into(),
            field: String::new(),
        }];
        let err = reconcile(&mut set, &bad).unwrap_err();
        assert!(matches!(err, SearchError::InvalidFacetConfiguration(_)));
    }

    #[test]
    fn duplicate_facet_names_are_invalid() {
        let mut set = messy_set();
        let mut dup = facets();
        dup[1].name = "contentType".into();
        let err = reconcile(&mut set, &dup).unwrap_err();
        assert!(err.to_string().contains("configured twice"));
    }
}
