//! Structured issue details
//!
//! Each checker reports through its own closed enum so that the fix
//! suggestion generator can match exhaustively instead of dispatching on
//! free-form strings.

use serde::{Deserialize, Serialize};

use crate::fix::FixSuggestion;
use crate::schema::{ConstraintDefinition, ForeignKeyDefinition, IndexDefinition, ReferentialAction, TableCategory};
use crate::types::Compatibility;

/// The three artifact families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    TableList,
    Yaml,
    Ddl,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TableList => write!(f, "table list"),
            Self::Yaml => write!(f, "YAML"),
            Self::Ddl => write!(f, "DDL"),
        }
    }
}

/// Which artifact sources mention a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresenceVector {
    pub in_table_list: bool,
    pub in_yaml: bool,
    pub in_ddl: bool,
}

impl PresenceVector {
    pub fn all_present(&self) -> bool {
        self.in_table_list && self.in_yaml && self.in_ddl
    }
}

/// Structured detail attached to a `CheckResult`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Issue {
    None,
    Source(SourceIssue),
    Existence(ExistenceIssue),
    Column(ColumnIssue),
    DataType(DataTypeIssue),
    ForeignKey(ForeignKeyIssue),
    Constraint(ConstraintIssue),
    YamlFormat(YamlFormatIssue),
    Multitenant(MultitenantIssue),
    Traceability(TraceabilityIssue),
    Performance(PerformanceIssue),
    Fix(FixSuggestion),
}

/// An artifact a checker needs is missing or unreadable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue_type", rename_all = "snake_case")]
pub enum SourceIssue {
    Missing {
        artifact: ArtifactKind,
        expected_file: String,
    },
    ParseFailed {
        artifact: ArtifactKind,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue_type", rename_all = "snake_case")]
pub enum ExistenceIssue {
    AllPresent {
        presence: PresenceVector,
    },
    Missing {
        presence: PresenceVector,
        missing_files: Vec<String>,
    },

    /// Files exist for a table the table list does not know about
    Orphaned {
        presence: PresenceVector,
        orphan_files: Vec<String>,
        missing_files: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue_type", rename_all = "snake_case")]
pub enum ColumnIssue {
    MissingInDdl {
        column: String,
        yaml_type: String,
        nullable: bool,
    },
    MissingInYaml {
        column: String,
        ddl_type: String,
        nullable: bool,
    },
    NullableMismatch {
        column: String,
        sql_type: String,
        ddl_nullable: bool,
        yaml_nullable: bool,
    },
    DefaultMismatch {
        column: String,
        ddl_default: Option<String>,
        yaml_default: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue_type", rename_all = "snake_case")]
pub enum DataTypeIssue {
    TypeMismatch {
        column: String,
        ddl_type: String,
        yaml_type: String,
        ddl_definition: String,
        yaml_definition: String,
        compatibility: Compatibility,
    },
    EnumMismatch {
        column: String,
        missing_in_ddl: Vec<String>,
        missing_in_yaml: Vec<String>,
        yaml_definition: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue_type", rename_all = "snake_case")]
pub enum ForeignKeyIssue {
    TargetTableMissing {
        foreign_key: String,
        reference_table: String,
    },
    TargetColumnMissing {
        definition: ForeignKeyDefinition,
        target_table: String,
        missing_column: String,
        available_columns: Vec<String>,
    },
    MissingInDdl {
        definition: ForeignKeyDefinition,
    },
    MissingInYaml {
        definition: ForeignKeyDefinition,
    },
    ActionMismatch {
        definition: ForeignKeyDefinition,
        ddl_on_update: ReferentialAction,
        ddl_on_delete: ReferentialAction,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue_type", rename_all = "snake_case")]
pub enum ConstraintIssue {
    PrimaryKeyMismatch {
        ddl_columns: Vec<String>,
        yaml_columns: Vec<String>,
    },
    MissingInDdl {
        constraint: ConstraintDefinition,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue_type", rename_all = "snake_case")]
pub enum YamlFormatIssue {
    SectionMissing {
        section: String,
    },
    SectionInsufficient {
        section: String,
        required: usize,
        actual: usize,
    },
    RevisionEntryIncomplete {
        index: usize,
        missing_fields: Vec<String>,
    },
    SampleDataMissing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue_type", rename_all = "snake_case")]
pub enum MultitenantIssue {
    TenantColumnMissing {
        artifact: ArtifactKind,
        column: String,
    },
    TenantColumnNullable {
        artifact: ArtifactKind,
        column: String,
    },
    TenantIndexMissing {
        column: String,
    },
    CrossTenantForeignKey {
        foreign_key: String,
        reference_table: String,
        column: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue_type", rename_all = "snake_case")]
pub enum TraceabilityIssue {
    RequirementIdMissing { column: String },
    RequirementIdMalformed { column: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue_type", rename_all = "snake_case")]
pub enum PerformanceIssue {
    /// `columns` is the key to add: YAML's declared key, else the best
    /// id-like DDL column, else empty
    PrimaryKeyIndexMissing {
        columns: Vec<String>,
    },
    IndexMissingInDdl {
        index: IndexDefinition,
    },
    VolumeThresholdExceeded {
        category: TableCategory,
        projected_rows: u64,
        threshold: u64,
    },
}

macro_rules! impl_into_issue {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Issue {
                fn from(issue: $ty) -> Self {
                    Issue::$variant(issue)
                }
            }
        )*
    };
}

impl_into_issue! {
    SourceIssue => Source,
    ExistenceIssue => Existence,
    ColumnIssue => Column,
    DataTypeIssue => DataType,
    ForeignKeyIssue => ForeignKey,
    ConstraintIssue => Constraint,
    YamlFormatIssue => YamlFormat,
    MultitenantIssue => Multitenant,
    TraceabilityIssue => Traceability,
    PerformanceIssue => Performance,
    FixSuggestion => Fix,
}
