//! Variant expansion for engine-collapsed documents.
//!
//! When the engine collapses documents sharing a grouping field value, the
//! response carries the group head as a normal document and the remaining
//! members in an `expanded` section keyed by that value. This module hangs
//! those members beneath their head as variants.
//!
//! Grouping values are compared byte-for-byte: `"Shirt"` and `"shirt"`
//! are distinct groups.

use serde_json::Value;

use crate::config::VariantsConfig;
use crate::parser::parse_document;
use crate::types::{SearchResult, SearchResultSet};

/// Attach expanded group members to their top-level results.
///
/// No-op when variants are disabled or no response is attached. Each
/// result receives at most `config.expand_limit` variants, while
/// `variants_found` records the engine's total member count.
pub fn expand_variants(
    result_set: &mut SearchResultSet,
    config: &VariantsConfig,
    identifier_field: &str,
    raw_mode: bool,
) {
    if !config.enabled {
        return;
    }
    let Some(response) = result_set.response.as_ref() else {
        return;
    };
    if response.expanded.is_empty() {
        return;
    }

    let mut attached = 0usize;
    for result in &mut result_set.results {
        let Some(group_value) = grouping_value(result, &config.field) else {
            continue;
        };
        let Some(group) = response.expanded.get(&group_value) else {
            continue;
        };

        result.variants_found = group.num_found;
        result.variants = group
            .documents
            .iter()
            .filter_map(|doc| parse_document(doc, identifier_field, raw_mode))
            .filter(|variant| variant.id != result.id)
            .take(config.expand_limit)
            .map(|variant| into_variant(variant, &result.id))
            .collect();
        attached += result.variants.len();
    }
    tracing::debug!(attached, field = %config.field, "variants expanded");
}

/// Mark `result` as a variant of `parent_id`.
pub(crate) fn into_variant(mut result: SearchResult, parent_id: &str) -> SearchResult {
    result.is_variant = true;
    result.variant_parent = Some(parent_id.to_owned());
    result.variants.clear();
    result.variants_found = 0;
    result
}

fn grouping_value(result: &SearchResult, field: &str) -> Option<String> {
    match result.field(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Document, ExpandedGroup, ResponseAdapter, SearchHandle, SearchRequest};
    use serde_json::json;

    fn doc(id: &str, group: &str) -> Document {
        let mut d = Document::new();
        d.insert("id".into(), json!(id));
        d.insert("variantId".into(), json!(group));
        d
    }

    fn head(id: &str, group: &str) -> SearchResult {
        parse_document(&doc(id, group), "id", false).expect("head")
    }

    fn config(limit: usize) -> VariantsConfig {
        VariantsConfig {
            enabled: true,
            field: "variantId".into(),
            expand_limit: limit,
        }
    }

    fn result_set(results: Vec<SearchResult>, groups: Vec<(&str, ExpandedGroup)>) -> SearchResultSet {
        let mut set = SearchResultSet::new(
            SearchHandle::new("mock"),
            SearchRequest::with_query("shirt"),
            1,
            10,
        );
        set.results = results;
        set.response = Some(ResponseAdapter {
            num_found: set.results.len() as u64,
            expanded: groups
                .into_iter()
                .map(|(k, g)| (k.to_string(), g))
                .collect(),
            ..Default::default()
        });
        set
    }

    #[test]
    fn attaches_members_up_to_limit_and_records_total() {
        let group = ExpandedGroup {
            num_found: 4,
            documents: vec![doc("b", "G"), doc("c", "G"), doc("d", "G")],
        };
        let mut set = result_set(vec![head("a", "G")], vec![("G", group)]);
        expand_variants(&mut set, &config(2), "id", false);

        let parent = &set.results[0];
        assert_eq!(parent.variants.len(), 2);
        assert_eq!(parent.variants_found, 4);
        for variant in &parent.variants {
            assert!(variant.is_variant);
            assert_eq!(variant.variant_parent.as_deref(), Some("a"));
            assert_eq!(variant.variants_found, 0);
            assert!(variant.variants.is_empty());
        }
    }

    #[test]
    fn single_member_group_has_no_variants() {
        let mut set = result_set(
            vec![head("a", "G"), head("x", "H")],
            vec![("G", ExpandedGroup::default())],
        );
        expand_variants(&mut set, &config(5), "id", false);
        assert!(set.results.iter().all(|r| r.variants.is_empty()));
        assert_eq!(set.results[0].variants_found, 0);
    }

    #[test]
    fn grouping_is_case_sensitive() {
        let upper = ExpandedGroup {
            num_found: 1,
            documents: vec![doc("b", "Shirt")],
        };
        let lower = ExpandedGroup {
            num_found: 1,
            documents: vec![doc("d", "shirt")],
        };
        let mut set = result_set(
            vec![head("a", "Shirt"), head("c", "shirt")],
            vec![("Shirt", upper), ("shirt", lower)],
        );
        expand_variants(&mut set, &config(5), "id", false);
        assert_eq!(set.results[0].variants[0].id, "b");
        assert_eq!(set.results[1].variants[0].id, "d");
    }

    #[test]
    fn mismatched_case_finds_no_group() {
        let group = ExpandedGroup {
            num_found: 1,
            documents: vec![doc("b", "SHIRT")],
        };
        let mut set = result_set(vec![head("a", "shirt")], vec![("SHIRT", group)]);
        expand_variants(&mut set, &config(5), "id", false);
        assert!(set.results[0].variants.is_empty());
    }

    #[test]
    fn head_never_becomes_its_own_variant() {
        let group = ExpandedGroup {
            num_found: 2,
            documents: vec![doc("a", "G"), doc("b", "G")],
        };
        let mut set = result_set(vec![head("a", "G")], vec![("G", group)]);
        expand_variants(&mut set, &config(5), "id", false);
        let ids: Vec<_> = set.results[0].variants.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["b"]);
    }

    #[test]
    fn disabled_grouping_is_pass_through() {
        let group = ExpandedGroup {
            num_found: 1,
            documents: vec![doc("b", "G")],
        };
        let mut set = result_set(vec![head("a", "G")], vec![("G", group)]);
        let before = set.clone();
        let disabled = VariantsConfig {
            enabled: false,
            ..config(5)
        };
        expand_variants(&mut set, &disabled, "id", false);
        assert_eq!(set, before);
    }
}
