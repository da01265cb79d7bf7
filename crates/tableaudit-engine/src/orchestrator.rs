//! Run orchestration
//!
//! A run validates the configured artifact paths, loads a fresh
//! [`SchemaRegistry`], executes the selected checks in their fixed order
//! and assembles the [`ConsistencyReport`].

use std::path::PathBuf;

use tableaudit_core::{
    CheckName, CheckResult, Config, ConsistencyReport, FixSuggestion, Issue, ReportBuilder, Severity, UnknownCheck,
};
use tableaudit_parsers::SchemaRegistry;
use thiserror::Error;

use crate::checker::CheckContext;
use crate::checkers::checker_for;
use crate::fix_suggestions;

/// A required artifact location is absent; no checks run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Table list file does not exist: {0}")]
    TableListMissing(PathBuf),

    #[error("YAML directory does not exist: {0}")]
    YamlDirMissing(PathBuf),

    #[error("DDL directory does not exist: {0}")]
    DdlDirMissing(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Unknown check: {0}")]
    UnknownCheck(String),

    #[error("No checks selected")]
    Empty,
}

impl From<UnknownCheck> for SelectionError {
    fn from(err: UnknownCheck) -> Self {
        SelectionError::UnknownCheck(err.0)
    }
}

/// Which checks a run executes
///
/// Table checks always run in [`CheckName::ALL`] order regardless of the
/// order they were named in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSelection {
    checks: Vec<CheckName>,
    suggest_fixes: bool,
}

impl CheckSelection {
    /// Every table check, without fix suggestions
    pub fn all() -> Self {
        Self {
            checks: CheckName::ALL
                .into_iter()
                .filter(|c| *c != CheckName::FixSuggestions)
                .collect(),
            suggest_fixes: false,
        }
    }

    /// Parse a comma-separated list of check names
    pub fn parse(csv: &str) -> Result<Self, SelectionError> {
        let mut named = Vec::new();
        for name in csv.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            named.push(name.parse::<CheckName>()?);
        }
        if named.is_empty() {
            return Err(SelectionError::Empty);
        }

        let suggest_fixes = named.contains(&CheckName::FixSuggestions);
        let checks = CheckName::ALL
            .into_iter()
            .filter(|c| *c != CheckName::FixSuggestions && named.contains(c))
            .collect();

        Ok(Self { checks, suggest_fixes })
    }

    pub fn with_suggest_fixes(mut self, suggest_fixes: bool) -> Self {
        self.suggest_fixes |= suggest_fixes;
        self
    }

    /// Table checks, in execution order
    pub fn checks(&self) -> &[CheckName] {
        &self.checks
    }

    pub fn runs_fix_suggestions(&self) -> bool {
        self.suggest_fixes
    }
}

impl Default for CheckSelection {
    fn default() -> Self {
        Self::all()
    }
}

/// Orchestrator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    ValidatingPaths,
    RunningChecks { index: usize, total: usize },
    BuildingReport,
    Done,
    PathInvalid,
}

/// Result of a run
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(ConsistencyReport),
    PathInvalid {
        error: ConfigurationError,
        report: ConsistencyReport,
    },
}

impl RunOutcome {
    pub fn report(&self) -> &ConsistencyReport {
        match self {
            RunOutcome::Completed(report) | RunOutcome::PathInvalid { report, .. } => report,
        }
    }

    /// 1 on any ERROR result or an invalid path configuration
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Completed(report) => report.exit_code(),
            RunOutcome::PathInvalid { .. } => 1,
        }
    }
}

/// Drives one verification run
pub struct CheckOrchestrator {
    config: Config,
    selection: CheckSelection,
    state: RunState,
}

impl CheckOrchestrator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            selection: CheckSelection::all(),
            state: RunState::Init,
        }
    }

    pub fn with_selection(mut self, selection: CheckSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run the selected checks over `tables`, or over every known table
    /// when `tables` is empty
    pub fn run(&mut self, tables: &[String]) -> RunOutcome {
        advance(&mut self.state, RunState::Init);
        advance(&mut self.state, RunState::ValidatingPaths);

        if let Err(error) = self.validate_paths() {
            tracing::error!(%error, "invalid artifact paths");
            advance(&mut self.state, RunState::PathInvalid);
            return RunOutcome::PathInvalid {
                error,
                report: ConsistencyReport::empty(),
            };
        }

        let registry = SchemaRegistry::load(&self.config.paths);
        let tables = self.resolve_tables(&registry, tables);
        let ctx = CheckContext::new(&registry, &self.config);
        let overrides = &self.config.severity;
        let mut builder = ReportBuilder::new().with_tables(tables.clone());

        let checks = self.selection.checks();
        let total = checks.len() + usize::from(self.selection.runs_fix_suggestions());

        for (index, &check) in checks.iter().enumerate() {
            advance(&mut self.state, RunState::RunningChecks { index, total });

            let Some(checker) = checker_for(check) else {
                continue;
            };
            let results = checker.check(&ctx, &tables);
            tracing::debug!(check = %check, results = results.len(), "check finished");

            builder.record_check(check);
            builder.extend(results.into_iter().map(|mut result| {
                result.severity = overrides.get_severity(result.check_name, result.severity);
                result
            }));
        }

        if self.selection.runs_fix_suggestions() {
            advance(
                &mut self.state,
                RunState::RunningChecks {
                    index: total - 1,
                    total,
                },
            );

            let suggestions = fix_suggestions::generate(builder.results());
            let entries: Vec<CheckResult> = suggestions.iter().map(suggestion_result).collect();

            builder.record_check(CheckName::FixSuggestions);
            builder.extend(entries);
            builder.set_fix_suggestions(suggestions);
        }

        advance(&mut self.state, RunState::BuildingReport);
        let report = builder.build();

        let summary = report.summary();
        tracing::info!(
            tables = summary.tables_checked,
            errors = summary.errors,
            warnings = summary.warnings,
            fixes = summary.fix_suggestions,
            "consistency check complete"
        );

        advance(&mut self.state, RunState::Done);
        RunOutcome::Completed(report)
    }

    fn validate_paths(&self) -> Result<(), ConfigurationError> {
        let paths = &self.config.paths;
        if !paths.table_list.is_file() {
            return Err(ConfigurationError::TableListMissing(paths.table_list.clone()));
        }
        if !paths.yaml_dir.is_dir() {
            return Err(ConfigurationError::YamlDirMissing(paths.yaml_dir.clone()));
        }
        if !paths.ddl_dir.is_dir() {
            return Err(ConfigurationError::DdlDirMissing(paths.ddl_dir.clone()));
        }
        Ok(())
    }

    fn resolve_tables(&self, registry: &SchemaRegistry, requested: &[String]) -> Vec<String> {
        let candidates = if requested.is_empty() {
            registry.table_names()
        } else {
            let mut unique: Vec<String> = Vec::with_capacity(requested.len());
            for table in requested {
                if !unique.contains(table) {
                    unique.push(table.clone());
                }
            }
            unique
        };

        candidates
            .into_iter()
            .filter(|table| {
                let skipped = self.config.allowlist.is_table_skipped(table);
                if skipped {
                    tracing::debug!(table = %table, "skipped by allowlist");
                }
                !skipped
            })
            .collect()
    }
}

fn advance(state: &mut RunState, next: RunState) {
    tracing::debug!(from = ?state, to = ?next, "orchestrator state");
    *state = next;
}

fn suggestion_result(suggestion: &FixSuggestion) -> CheckResult {
    let mut result = CheckResult::new(
        CheckName::FixSuggestions,
        suggestion.table_name.clone(),
        Severity::Info,
        format!("[{}] {}", suggestion.fix_type, suggestion.description),
    )
    .with_detail(Issue::Fix(suggestion.clone()));
    result.file_path = suggestion.file_path.clone();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn selection_runs_in_fixed_order() {
        let selection = CheckSelection::parse("yaml_format, table_existence").unwrap();
        assert_eq!(selection.checks(), &[CheckName::TableExistence, CheckName::YamlFormat]);
        assert!(!selection.runs_fix_suggestions());
    }

    #[test]
    fn selection_with_fix_suggestions() {
        let named = CheckSelection::parse("column_consistency,fix_suggestions").unwrap();
        assert_eq!(named.checks(), &[CheckName::ColumnConsistency]);
        assert!(named.runs_fix_suggestions());

        let flagged = CheckSelection::all().with_suggest_fixes(true);
        assert_eq!(flagged.checks().len(), 9);
        assert!(flagged.runs_fix_suggestions());
    }

    #[test]
    fn selection_errors() {
        assert_eq!(
            CheckSelection::parse("table_existence,bogus"),
            Err(SelectionError::UnknownCheck("bogus".to_string()))
        );
        assert_eq!(CheckSelection::parse(" , "), Err(SelectionError::Empty));
    }

    #[test]
    fn missing_paths_abort_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = crate::testing::config();
        config.paths.resolve_against(dir.path());

        let mut orchestrator = CheckOrchestrator::new(config);
        let outcome = orchestrator.run(&[]);

        assert!(matches!(
            outcome,
            RunOutcome::PathInvalid {
                error: ConfigurationError::TableListMissing(_),
                ..
            }
        ));
        assert_eq!(outcome.exit_code(), 1);
        assert!(outcome.report().results().is_empty());
        assert_eq!(orchestrator.state(), RunState::PathInvalid);
    }
}
