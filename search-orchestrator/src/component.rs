//! Pluggable search components and the host that initialises them.
//!
//! A component declares what it wants injected through capability
//! accessors. Before every dispatch the [`ComponentHost`] hands each
//! component the configuration, then the query, request, or search handle
//! it asked for, and finally calls its initialisation entry point.

use crate::config::SearchConfig;
use crate::types::{Query, SearchHandle, SearchRequest};

/// Receives the in-flight query before dispatch.
pub trait QueryAware {
    fn set_query(&mut self, query: &Query);
}

/// Receives the current search request before dispatch.
pub trait RequestAware {
    fn set_search_request(&mut self, request: &SearchRequest);
}

/// Receives the handle of the orchestrator running the search.
pub trait SearchAware {
    fn set_search(&mut self, handle: &SearchHandle);
}

/// A named unit participating in the search pipeline.
///
/// Components keep their state between searches; the host never resets them.
pub trait SearchComponent: Send {
    fn name(&self) -> &str;

    fn set_search_configuration(&mut self, _config: &SearchConfig) {}

    fn as_query_aware(&mut self) -> Option<&mut dyn QueryAware> {
        None
    }

    fn as_request_aware(&mut self) -> Option<&mut dyn RequestAware> {
        None
    }

    fn as_search_aware(&mut self) -> Option<&mut dyn SearchAware> {
        None
    }

    /// Called last, after every requested injection.
    fn initialize_search_component(&mut self);
}

/// Ordered set of registered components.
#[derive(Default)]
pub struct ComponentHost {
    components: Vec<Box<dyn SearchComponent>>,
}

impl ComponentHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component. Initialisation follows registration order.
    pub fn register(&mut self, component: Box<dyn SearchComponent>) {
        self.components.push(component);
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name()).collect()
    }

    /// Inject the current search context into every component and initialise it.
    pub fn initialize_components(
        &mut self,
        config: &SearchConfig,
        query: &Query,
        request: &SearchRequest,
        handle: &SearchHandle,
    ) {
        for component in &mut self.components {
            component.set_search_configuration(config);
            if let Some(aware) = component.as_query_aware() {
                aware.set_query(query);
            }
            if let Some(aware) = component.as_request_aware() {
                aware.set_search_request(request);
            }
            if let Some(aware) = component.as_search_aware() {
                aware.set_search(handle);
            }
            component.initialize_search_component();
            tracing::trace!(component = component.name(), "search component initialised");
        }
    }
}

impl std::fmt::Debug for ComponentHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentHost")
            .field("components", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    struct Recording {
        name: &'static str,
        log: Log,
        query_aware: bool,
        request_aware: bool,
        initialisations: usize,
    }

    impl Recording {
        fn push(&self, entry: String) {
            if let Ok(mut log) = self.log.lock() {
                log.push(entry);
            }
        }
    }

    impl QueryAware for Recording {
        fn set_query(&mut self, query: &Query) {
            self.push(format!("{}:query={}", self.name, query.query_string()));
        }
    }

    impl RequestAware for Recording {
        fn set_search_request(&mut self, request: &SearchRequest) {
            self.push(format!(
                "{}:request={}",
                self.name,
                request.raw_query().unwrap_or_default()
            ));
        }
    }

    impl SearchComponent for Recording {
        fn name(&self) -> &str {
            self.name
        }

        fn set_search_configuration(&mut self, config: &SearchConfig) {
            self.push(format!("{}:config={}", self.name, config.results_per_page));
        }

        fn as_query_aware(&mut self) -> Option<&mut dyn QueryAware> {
            if self.query_aware {
                Some(self)
            } else {
                None
            }
        }

        fn as_request_aware(&mut self) -> Option<&mut dyn RequestAware> {
            if self.request_aware {
                Some(self)
            } else {
                None
            }
        }

        fn initialize_search_component(&mut self) {
            self.initialisations += 1;
            self.push(format!("{}:init#{}", self.name, self.initialisations));
        }
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().map(|l| l.clone()).unwrap_or_default()
    }

    #[test]
    fn injects_only_declared_capabilities_in_order() {
        let log: Log = Arc::default();
        let mut host = ComponentHost::new();
        host.register(Box::new(Recording {
            name: "faceting",
            log: log.clone(),
            query_aware: true,
            request_aware: false,
            initialisations: 0,
        }));
        host.register(Box::new(Recording {
            name: "sorting",
            log: log.clone(),
            query_aware: false,
            request_aware: true,
            initialisations: 0,
        }));

        let config = SearchConfig::default();
        let request = SearchRequest::with_query("rust");
        host.initialize_components(
            &config,
            &Query::new("rust"),
            &request,
            &SearchHandle::new("mock"),
        );

        assert_eq!(
            entries(&log),
            [
                "faceting:config=10",
                "faceting:query=rust",
                "faceting:init#1",
                "sorting:config=10",
                "sorting:request=rust",
                "sorting:init#1",
            ]
        );
    }

    #[test]
    fn component_state_survives_repeated_initialisation() {
        let log: Log = Arc::default();
        let mut host = ComponentHost::new();
        host.register(Box::new(Recording {
            name: "c",
            log: log.clone(),
            query_aware: false,
            request_aware: false,
            initialisations: 0,
        }));
        let config = SearchConfig::default();
        let request = SearchRequest::new();
        let handle = SearchHandle::new("mock");
        for _ in 0..3 {
            host.initialize_components(&config, &Query::new(""), &request, &handle);
        }
        assert!(entries(&log).contains(&"c:init#3".to_string()));
    }

    struct HandleCatcher {
        seen: Option<SearchHandle>,
        out: Arc<Mutex<Option<SearchHandle>>>,
    }

    impl SearchAware for HandleCatcher {
        fn set_search(&mut self, handle: &SearchHandle) {
            self.seen = Some(handle.clone());
        }
    }

    impl SearchComponent for HandleCatcher {
        fn name(&self) -> &str {
            "handle"
        }

        fn as_search_aware(&mut self) -> Option<&mut dyn SearchAware> {
            Some(self)
        }

        fn initialize_search_component(&mut self) {
            if let Ok(mut out) = self.out.lock() {
                *out = self.seen.clone();
            }
        }
    }

    #[test]
    fn search_aware_component_receives_handle_before_init() {
        let out = Arc::new(Mutex::new(None));
        let mut host = ComponentHost::new();
        host.register(Box::new(HandleCatcher {
            seen: None,
            out: out.clone(),
        }));
        let handle = SearchHandle::new("mock");
        host.initialize_components(
            &SearchConfig::default(),
            &Query::new("x"),
            &SearchRequest::new(),
            &handle,
        );
        assert_eq!(out.lock().expect("lock").clone(), Some(handle));
        assert_eq!(host.names(), ["handle"]);
        assert_eq!(host.len(), 1);
    }
}
