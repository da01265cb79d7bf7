//! Check results and severity
//!
//! IMPORTANT: check names are part of the CLI surface and the JSON report.
//! NEVER rename a check name - add new ones only.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::issue::Issue;

/// Check identifiers, in fixed execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckName {
    TableExistence,
    ColumnConsistency,
    DataTypeConsistency,
    ForeignKeyConsistency,
    ConstraintConsistency,
    YamlFormat,
    MultitenantCompliance,
    RequirementTraceability,
    PerformanceImpact,

    /// Always runs last among the selected checks
    FixSuggestions,
}

impl CheckName {
    /// Every check in execution order
    pub const ALL: [CheckName; 10] = [
        Self::TableExistence,
        Self::ColumnConsistency,
        Self::DataTypeConsistency,
        Self::ForeignKeyConsistency,
        Self::ConstraintConsistency,
        Self::YamlFormat,
        Self::MultitenantCompliance,
        Self::RequirementTraceability,
        Self::PerformanceImpact,
        Self::FixSuggestions,
    ];

    /// Get the check name as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TableExistence => "table_existence",
            Self::ColumnConsistency => "column_consistency",
            Self::DataTypeConsistency => "data_type_consistency",
            Self::ForeignKeyConsistency => "foreign_key_consistency",
            Self::ConstraintConsistency => "constraint_consistency",
            Self::YamlFormat => "yaml_format",
            Self::MultitenantCompliance => "multitenant_compliance",
            Self::RequirementTraceability => "requirement_traceability",
            Self::PerformanceImpact => "performance_impact",
            Self::FixSuggestions => "fix_suggestions",
        }
    }

    /// One-line description for `list-checks`
    pub fn description(&self) -> &'static str {
        match self {
            Self::TableExistence => "Table is present in the table list, YAML and DDL",
            Self::ColumnConsistency => "Column names, nullability and defaults agree between YAML and DDL",
            Self::DataTypeConsistency => "Column types, lengths and ENUM values agree between YAML and DDL",
            Self::ForeignKeyConsistency => "Foreign key targets exist and YAML/DDL definitions agree",
            Self::ConstraintConsistency => "Primary keys and CHECK/UNIQUE constraints agree between YAML and DDL",
            Self::YamlFormat => "YAML detail files carry the required documentation sections",
            Self::MultitenantCompliance => "Tenant column, tenant index and tenant-safe foreign keys",
            Self::RequirementTraceability => "Every column carries a well-formed requirement identifier",
            Self::PerformanceImpact => "Primary key index, declared indexes and projected data volume",
            Self::FixSuggestions => "Generate remediation suggestions from the other results",
        }
    }

    /// Position in the fixed execution order
    pub fn order(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(Self::ALL.len())
    }
}

impl std::fmt::Display for CheckName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CheckName {
    type Err = UnknownCheck;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|check| check.as_str() == wanted)
            .ok_or_else(|| UnknownCheck(s.trim().to_string()))
    }
}

/// Error for a check name that does not exist
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown check '{0}'")]
pub struct UnknownCheck(pub String);

/// Result severity, ordered SUCCESS < INFO < WARNING < ERROR
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Explicit positive confirmation
    Success,

    /// Informational message (fix suggestions)
    Info,

    /// Should be reviewed but not blocking
    Warning,

    /// Blocking issue that should fail CI
    Error,
}

impl Severity {
    /// Parse from config string. Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "success" => Some(Self::Success),
            "info" => Some(Self::Info),
            "warning" | "warn" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Icon used by console and markdown output
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Success => "✅",
            Self::Info => "ℹ️",
            Self::Warning => "⚠️",
            Self::Error => "❌",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One check outcome for one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub check_name: CheckName,
    pub table_name: String,
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Structured detail, one closed union per checker
    pub detail: Issue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
}

impl CheckResult {
    /// Create a new result with no structured detail
    pub fn new(
        check_name: CheckName,
        table_name: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            check_name,
            table_name: table_name.into(),
            severity,
            message: message.into(),
            detail: Issue::None,
            file_path: None,
        }
    }

    pub fn success(check_name: CheckName, table_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(check_name, table_name, Severity::Success, message)
    }

    pub fn warning(check_name: CheckName, table_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(check_name, table_name, Severity::Warning, message)
    }

    pub fn error(check_name: CheckName, table_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(check_name, table_name, Severity::Error, message)
    }

    /// Set the structured detail
    pub fn with_detail(mut self, detail: impl Into<Issue>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Set the file the result refers to
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// WARNING or ERROR
    pub fn is_problem(&self) -> bool {
        self.severity >= Severity::Warning
    }
}
