//! Spell-check driven auto-correction.
//!
//! A zero-hit search that came back with spelling suggestions is retried
//! with each suggestion in engine order, up to a fixed budget. The
//! orchestrator drives the retries; this module decides whether to start,
//! which suggestions to try, and how to mark the accepted result set.
//!
//! # State Machine
//!
//! ```text
//! ┌──────────────┐  begin()   ┌───────────┐
//! │ NotAttempted ├───────────►│ Attempted │
//! └──────────────┘            └───────────┘
//! ```
//!
//! `Attempted` is terminal: a corrector plans its retries exactly once.

use crate::config::SpellcheckConfig;
use crate::types::SearchResultSet;

/// Whether auto-correction has already planned its retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoCorrectState {
    NotAttempted,
    Attempted,
}

/// Plans the corrected retries for one top-level search.
#[derive(Debug, Clone)]
pub struct AutoCorrector {
    enabled: bool,
    max_attempts: usize,
    state: AutoCorrectState,
}

impl AutoCorrector {
    pub fn new(config: &SpellcheckConfig) -> Self {
        Self {
            enabled: config.autocorrect_enabled,
            max_attempts: config.max_attempts,
            state: AutoCorrectState::NotAttempted,
        }
    }

    #[cfg(test)]
    fn state(&self) -> AutoCorrectState {
        self.state
    }

    /// Whether `result_set` qualifies for a corrected retry.
    ///
    /// Requires the feature to be enabled, a search that actually ran, a
    /// reported total of zero (including a forced zero), and at least
    /// one suggestion.
    pub fn applies_to(&self, result_set: &SearchResultSet) -> bool {
        self.enabled
            && self.state == AutoCorrectState::NotAttempted
            && result_set.has_searched
            && result_set.all_result_count == 0
            && !result_set.spelling_suggestions().is_empty()
    }

    /// Move to `Attempted` and return the suggestions to try, in order.
    ///
    /// Returns an empty list when the corrector does not apply.
    pub fn begin(&mut self, result_set: &SearchResultSet) -> Vec<String> {
        if !self.applies_to(result_set) {
            return Vec::new();
        }
        self.state = AutoCorrectState::Attempted;
        result_set
            .spelling_suggestions()
            .iter()
            .take(self.max_attempts)
            .cloned()
            .collect()
    }

    /// Record a successful correction on the accepted result set.
    pub fn mark_corrected(
        mut result_set: SearchResultSet,
        original: Option<&str>,
        corrected: &str,
    ) -> SearchResultSet {
        result_set.is_auto_corrected = true;
        result_set.initial_query_string = original.map(str::to_owned);
        result_set.corrected_query_string = Some(corrected.to_owned());
        result_set
    }
}
