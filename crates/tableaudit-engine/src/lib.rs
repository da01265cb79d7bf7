//! tableaudit engine
//!
//! The nine consistency checkers, the fix suggestion generator and the
//! orchestrator that runs them over a loaded [`tableaudit_parsers::SchemaRegistry`].

pub mod checker;
pub mod checkers;
pub mod fix_suggestions;
pub mod orchestrator;

#[cfg(test)]
mod testing;

pub use checker::{CheckContext, Checker};
pub use checkers::checker_for;
pub use orchestrator::{CheckOrchestrator, CheckSelection, ConfigurationError, RunOutcome, RunState, SelectionError};
