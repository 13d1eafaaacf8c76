//! Injectable hook registry for the search pipeline.
//!
//! The registry is handed to the orchestrator at construction and
//! enumerated in registration order:
//!
//! - before-search hooks see the fresh, empty result set
//! - query modifiers transform the query just before dispatch
//! - after-search hooks see the finished result set
//! - search components are initialised before every dispatch
//!
//! Query modifiers are registered as [`SearchPlugin`] entries and checked
//! for the modifier capability when the chain runs, so plugins assembled
//! from configuration can be rejected as misconfigured.

use crate::component::{ComponentHost, SearchComponent};
use crate::error::SearchError;
use crate::types::{Query, SearchResultSet};

/// Runs before the search decides whether to contact the engine.
pub trait BeforeSearchHook: Send {
    fn before_search(&mut self, result_set: SearchResultSet) -> SearchResultSet;
}

/// Runs once a result set is fully assembled.
pub trait AfterSearchHook: Send {
    fn after_search(&mut self, result_set: SearchResultSet) -> SearchResultSet;
}

/// Transforms the outgoing query. Each modifier receives the previous one's output.
pub trait QueryModifier: Send {
    fn modify_query(&mut self, query: Query) -> Query;
}

impl<F> BeforeSearchHook for F
where
    F: FnMut(SearchResultSet) -> SearchResultSet + Send,
{
    fn before_search(&mut self, result_set: SearchResultSet) -> SearchResultSet {
        self(result_set)
    }
}

impl<F> AfterSearchHook for F
where
    F: FnMut(SearchResultSet) -> SearchResultSet + Send,
{
    fn after_search(&mut self, result_set: SearchResultSet) -> SearchResultSet {
        self(result_set)
    }
}

impl<F> QueryModifier for F
where
    F: FnMut(Query) -> Query + Send,
{
    fn modify_query(&mut self, query: Query) -> Query {
        self(query)
    }
}

/// A named plugin entry in the query-modifier chain.
pub trait SearchPlugin: Send {
    fn name(&self) -> &str;

    /// The modifier capability, if this plugin provides it.
    fn as_query_modifier(&mut self) -> Option<&mut dyn QueryModifier> {
        None
    }
}

struct ModifierEntry<M> {
    name: String,
    modifier: M,
}

impl<M: QueryModifier> SearchPlugin for ModifierEntry<M> {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_query_modifier(&mut self) -> Option<&mut dyn QueryModifier> {
        Some(&mut self.modifier)
    }
}

/// Ordered hook chains and components consulted by one orchestrator.
#[derive(Default)]
pub struct HookRegistry {
    before_search: Vec<Box<dyn BeforeSearchHook>>,
    after_search: Vec<Box<dyn AfterSearchHook>>,
    query_modifiers: Vec<Box<dyn SearchPlugin>>,
    components: ComponentHost,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before_search(mut self, hook: impl BeforeSearchHook + 'static) -> Self {
        self.before_search.push(Box::new(hook));
        self
    }

    pub fn after_search(mut self, hook: impl AfterSearchHook + 'static) -> Self {
        self.after_search.push(Box::new(hook));
        self
    }

    pub fn query_modifier(
        mut self,
        name: impl Into<String>,
        modifier: impl QueryModifier + 'static,
    ) -> Self {
        self.query_modifiers.push(Box::new(ModifierEntry {
            name: name.into(),
            modifier,
        }));
        self
    }

    /// Add an externally assembled plugin to the query-modifier chain.
    pub fn plugin(mut self, plugin: Box<dyn SearchPlugin>) -> Self {
        self.query_modifiers.push(plugin);
        self
    }

    pub fn component(mut self, component: Box<dyn SearchComponent>) -> Self {
        self.components.register(component);
        self
    }

    pub fn components_mut(&mut self) -> &mut ComponentHost {
        &mut self.components
    }

    pub(crate) fn run_before_search(&mut self, mut result_set: SearchResultSet) -> SearchResultSet {
        for hook in &mut self.before_search {
            result_set = hook.before_search(result_set);
        }
        result_set
    }

    pub(crate) fn run_after_search(&mut self, mut result_set: SearchResultSet) -> SearchResultSet {
        for hook in &mut self.after_search {
            result_set = hook.after_search(result_set);
        }
        result_set
    }

    /// Pass `query` through every registered modifier in order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::ModifierContractViolation`] naming the first
    /// plugin that lacks the modifier capability.
    pub fn apply_query_modifiers(&mut self, mut query: Query) -> Result<Query, SearchError> {
        for plugin in &mut self.query_modifiers {
            let name = plugin.name().to_owned();
            let Some(modifier) = plugin.as_query_modifier() else {
                return Err(SearchError::ModifierContractViolation(format!(
                    "{name} does not implement QueryModifier"
                )));
            };
            query = modifier.modify_query(query);
            tracing::trace!(modifier = %name, "query modified");
        }
        Ok(query)
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("before_search", &self.before_search.len())
            .field("after_search", &self.after_search.len())
            .field("query_modifiers", &self.query_modifiers.len())
            .field("components", &self.components)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SearchHandle, SearchRequest};

    fn empty_set() -> SearchResultSet {
        SearchResultSet::new(SearchHandle::new("mock"), SearchRequest::new(), 1, 10)
    }

    #[test]
    fn before_hooks_run_in_registration_order() {
        let mut registry = HookRegistry::new()
            .before_search(|mut rs: SearchResultSet| {
                rs.used_additional_filters.push("first".into());
                rs
            })
            .before_search(|mut rs: SearchResultSet| {
                rs.used_additional_filters.push("second".into());
                rs
            });
        let rs = registry.run_before_search(empty_set());
        assert_eq!(rs.used_additional_filters, ["first", "second"]);
    }

    #[test]
    fn after_hook_may_replace_result_set() {
        let mut registry = HookRegistry::new().after_search(|rs: SearchResultSet| {
            let mut replaced = empty_set();
            replaced.page = rs.page + 1;
            replaced
        });
        let rs = registry.run_after_search(empty_set());
        assert_eq!(rs.page, 2);
    }

    #[test]
    fn modifiers_chain_on_previous_output() {
        let mut registry = HookRegistry::new()
            .query_modifier("suffix", |mut q: Query| {
                let text = format!("{}~", q.query_string());
                q.set_query_string(text);
                q
            })
            .query_modifier("filter", |mut q: Query| {
                q.add_filter(format!("len:{}", q.query_string().len()));
                q
            });
        let query = registry
            .apply_query_modifiers(Query::new("abc"))
            .expect("modifiers");
        assert_eq!(query.query_string(), "abc~");
        assert_eq!(query.filters(), ["len:4"]);
    }

    struct NotAModifier;

    impl SearchPlugin for NotAModifier {
        fn name(&self) -> &str {
            "legacy-plugin"
        }
    }

    #[test]
    fn plugin_without_modifier_capability_is_rejected() {
        let mut registry = HookRegistry::new()
            .query_modifier("ok", |q: Query| q)
            .plugin(Box::new(NotAModifier));
        let err = registry
            .apply_query_modifiers(Query::new("x"))
            .unwrap_err();
        assert!(matches!(err, SearchError::ModifierContractViolation(_)));
        assert!(err.to_string().contains("legacy-plugin"));
    }

    #[test]
    fn empty_registry_is_identity() {
        let mut registry = HookRegistry::new();
        let query = registry
            .apply_query_modifiers(Query::new("same"))
            .expect("modifiers");
        assert_eq!(query, Query::new("same"));
        assert!(registry.components_mut().is_empty());
    }
}
