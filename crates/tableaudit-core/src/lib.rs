//! tableaudit core
//!
//! Canonical schema model, type normalization, check results and the
//! consistency report. Never rename check names - they are part of the
//! public API.

pub mod config;
pub mod fix;
pub mod issue;
pub mod report;
pub mod result;
pub mod schema;
pub mod types;

pub use config::{AllowlistRules, Config, ConfigError, MultitenantConfig, PathsConfig, PerformanceConfig, SeverityThreshold};
pub use fix::{FixSuggestion, FixType};
pub use issue::{
    ArtifactKind, ColumnIssue, ConstraintIssue, DataTypeIssue, ExistenceIssue, ForeignKeyIssue, Issue, MultitenantIssue,
    PerformanceIssue, PresenceVector, SourceIssue, TraceabilityIssue, YamlFormatIssue,
};
pub use report::{ConsistencyReport, ReportBuilder, ReportSummary, ReportVersion};
pub use result::{CheckName, CheckResult, Severity, UnknownCheck};
pub use schema::{
    ColumnDefinition, ConstraintDefinition, ConstraintKind, ForeignKeyDefinition, IndexDefinition, ReferentialAction,
    SchemaError, TableCategory, TableSchema,
};
pub use types::{compare_types, family_of, normalize_default, Compatibility, TypeComparison, TypeFamily, TypeSpec};
