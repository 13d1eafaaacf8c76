//! Search orchestrator: query building, dispatch, and result-set assembly.
//!
//! [`search::SearchOrchestrator`] sequences the pipeline. The sibling
//! modules hold the stages it runs after parsing: variant expansion,
//! reconciliation, and spell-check auto-correction.

pub mod autocorrect;
pub mod reconcile;
pub mod search;
pub mod variants;
