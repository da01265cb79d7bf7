//! Consistency report (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};

use crate::fix::FixSuggestion;
use crate::result::{CheckName, CheckResult, Severity};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of results
    pub total: usize,

    pub success: usize,
    pub info: usize,
    pub warnings: usize,
    pub errors: usize,

    /// Number of tables in scope
    pub tables_checked: usize,

    /// Number of fix suggestions generated
    pub fix_suggestions: usize,
}

impl ReportSummary {
    fn from_results(results: &[CheckResult], tables_checked: usize, fix_suggestions: usize) -> Self {
        let count = |severity: Severity| results.iter().filter(|r| r.severity == severity).count();

        Self {
            total: results.len(),
            success: count(Severity::Success),
            info: count(Severity::Info),
            warnings: count(Severity::Warning),
            errors: count(Severity::Error),
            tables_checked,
            fix_suggestions,
        }
    }
}

/// Consistency report
///
/// Immutable once built; construct it through [`ReportBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    version: ReportVersion,

    /// Timestamp (ISO 8601)
    timestamp: String,

    summary: ReportSummary,

    /// Checks that ran, in execution order
    checks_run: Vec<CheckName>,

    /// Tables in scope, sorted
    tables: Vec<String>,

    /// All results in the order they were produced
    results: Vec<CheckResult>,

    #[serde(default)]
    fix_suggestions: Vec<FixSuggestion>,
}

impl ConsistencyReport {
    /// A report for a run that never got to execute any check
    pub fn empty() -> Self {
        ReportBuilder::new().build()
    }

    pub fn version(&self) -> ReportVersion {
        self.version
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn summary(&self) -> &ReportSummary {
        &self.summary
    }

    pub fn checks_run(&self) -> &[CheckName] {
        &self.checks_run
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn fix_suggestions(&self) -> &[FixSuggestion] {
        &self.fix_suggestions
    }

    /// Results for one table, in report order
    pub fn results_for_table<'a>(&'a self, table_name: &'a str) -> impl Iterator<Item = &'a CheckResult> + 'a {
        self.results.iter().filter(move |r| r.table_name == table_name)
    }

    /// Results at or above a severity
    pub fn results_at_least(&self, min: Severity) -> impl Iterator<Item = &CheckResult> + '_ {
        self.results.iter().filter(move |r| r.severity >= min)
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// Process exit code: 1 iff any result is an ERROR
    pub fn exit_code(&self) -> i32 {
        if self.has_errors() {
            1
        } else {
            0
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Accumulates results during a run and produces the final report
#[derive(Debug, Default)]
pub struct ReportBuilder {
    checks_run: Vec<CheckName>,
    tables: Vec<String>,
    results: Vec<CheckResult>,
    fix_suggestions: Vec<FixSuggestion>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(mut self, tables: Vec<String>) -> Self {
        self.tables = tables;
        self
    }

    /// Record that a check ran
    pub fn record_check(&mut self, check: CheckName) {
        if !self.checks_run.contains(&check) {
            self.checks_run.push(check);
        }
    }

    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn extend(&mut self, results: impl IntoIterator<Item = CheckResult>) {
        self.results.extend(results);
    }

    /// Results accumulated so far
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn set_fix_suggestions(&mut self, suggestions: Vec<FixSuggestion>) {
        self.fix_suggestions = suggestions;
    }

    pub fn build(self) -> ConsistencyReport {
        let summary = ReportSummary::from_results(&self.results, self.tables.len(), self.fix_suggestions.len());

        ConsistencyReport {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary,
            checks_run: self.checks_run,
            tables: self.tables,
            results: self.results,
            fix_suggestions: self.fix_suggestions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report() {
        let report = ConsistencyReport::empty();
        assert_eq!(report.version(), ReportVersion::CURRENT);
        assert_eq!(report.summary().total, 0);
        assert!(!report.has_errors());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn report_with_results() {
        let mut builder = ReportBuilder::new().with_tables(vec!["MST_Foo".to_string()]);
        builder.record_check(CheckName::TableExistence);
        builder.push(CheckResult::error(CheckName::TableExistence, "MST_Foo", "missing DDL"));
        builder.push(CheckResult::success(CheckName::TableExistence, "MST_Bar", "ok"));
        builder.push(CheckResult::warning(CheckName::TableExistence, "MST_Baz", "missing YAML"));

        let report = builder.build();
        assert_eq!(report.summary().total, 3);
        assert_eq!(report.summary().errors, 1);
        assert_eq!(report.summary().warnings, 1);
        assert_eq!(report.summary().success, 1);
        assert_eq!(report.summary().tables_checked, 1);
        assert!(report.has_errors());
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.results_at_least(Severity::Warning).count(), 2);
        assert_eq!(report.results_for_table("MST_Foo").count(), 1);
    }

    #[test]
    fn report_serialization() {
        let report = ConsistencyReport::empty();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"results\""));
        assert!(json.contains("\"fix_suggestions\""));
    }
}
