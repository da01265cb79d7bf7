//! Canonical table schema model
//!
//! Every artifact family (table list, YAML detail, DDL) is normalized into
//! these types before any check runs. `table_name` is the join key used to
//! correlate the same table across the three sources.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::TypeSpec;

/// Business category of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableCategory {
    /// Reference/master data
    Master,

    /// Business transactions
    Transaction,

    /// Append-only history
    History,

    /// System/infrastructure tables
    System,

    /// Scratch/work tables
    Work,
}

impl TableCategory {
    /// Parse a category label as written in the table list or a YAML file.
    ///
    /// Accepts English names and the Japanese catalogue labels
    /// (`マスタ系`, `トランザクション系`, ...).
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        match label.to_lowercase().as_str() {
            "master" | "mst" => return Some(Self::Master),
            "transaction" | "trn" => return Some(Self::Transaction),
            "history" | "his" => return Some(Self::History),
            "system" | "sys" => return Some(Self::System),
            "work" | "wrk" => return Some(Self::Work),
            _ => {}
        }

        if label.contains("マスタ") {
            Some(Self::Master)
        } else if label.contains("トランザクション") {
            Some(Self::Transaction)
        } else if label.contains("履歴") {
            Some(Self::History)
        } else if label.contains("システム") {
            Some(Self::System)
        } else if label.contains("ワーク") {
            Some(Self::Work)
        } else {
            None
        }
    }

    /// Infer the category from the conventional table-name prefix
    pub fn from_table_name(table_name: &str) -> Option<Self> {
        let (prefix, _) = table_name.split_once('_')?;
        match prefix.to_uppercase().as_str() {
            "MST" => Some(Self::Master),
            "TRN" => Some(Self::Transaction),
            "HIS" => Some(Self::History),
            "SYS" => Some(Self::System),
            "WRK" => Some(Self::Work),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Transaction => "transaction",
            Self::History => "history",
            Self::System => "system",
            Self::Work => "work",
        }
    }
}

impl std::fmt::Display for TableCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Referential action for ON UPDATE / ON DELETE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ReferentialAction {
    #[serde(rename = "CASCADE")]
    Cascade,

    #[serde(rename = "RESTRICT")]
    Restrict,

    #[serde(rename = "SET NULL")]
    SetNull,

    /// SQL default when no action is written
    #[default]
    #[serde(rename = "NO ACTION")]
    NoAction,
}

impl ReferentialAction {
    /// Parse an action keyword (`CASCADE`, `SET NULL`, `set_null`, ...)
    pub fn parse(action: &str) -> Option<Self> {
        let normalized = action
            .trim()
            .to_uppercase()
            .replace('_', " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        match normalized.as_str() {
            "CASCADE" => Some(Self::Cascade),
            "RESTRICT" => Some(Self::Restrict),
            "SET NULL" => Some(Self::SetNull),
            "NO ACTION" => Some(Self::NoAction),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
            Self::SetNull => "SET NULL",
            Self::NoAction => "NO ACTION",
        }
    }
}

impl std::fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}

/// A column definition
///
/// `data_type` holds the uppercase base type without its argument list;
/// length, precision/scale and ENUM literals are kept in their own fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: String,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub nullable: bool,
    pub unique: bool,
    pub primary_key: bool,
    pub default_value: Option<String>,
    pub comment: Option<String>,
    pub enum_values: Vec<String>,
    pub encrypted: bool,

    /// Traceability identifier (YAML only)
    pub requirement_id: Option<String>,
}

impl ColumnDefinition {
    /// Create a nullable column from a raw type string such as `VARCHAR(50)`
    pub fn new(name: impl Into<String>, raw_type: &str) -> Self {
        Self::from_type_spec(name, TypeSpec::parse(raw_type))
    }

    /// Create a nullable column from an already-parsed type
    pub fn from_type_spec(name: impl Into<String>, spec: TypeSpec) -> Self {
        Self {
            name: name.into(),
            data_type: spec.base,
            length: spec.length,
            precision: spec.precision,
            scale: spec.scale,
            nullable: true,
            unique: false,
            primary_key: false,
            default_value: None,
            comment: None,
            enum_values: spec.enum_values,
            encrypted: false,
            requirement_id: None,
        }
    }

    /// Set nullability. A primary-key column stays NOT NULL.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable && !self.primary_key;
        self
    }

    /// Mark as primary key, which derives NOT NULL
    pub fn with_primary_key(mut self) -> Self {
        self.mark_primary_key();
        self
    }

    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn mark_primary_key(&mut self) {
        self.primary_key = true;
        self.nullable = false;
    }

    /// The parsed type of this column
    pub fn type_spec(&self) -> TypeSpec {
        TypeSpec {
            base: self.data_type.clone(),
            length: self.length,
            precision: self.precision,
            scale: self.scale,
            enum_values: self.enum_values.clone(),
        }
    }

    /// Full SQL type, e.g. `DECIMAL(10,2)` or `ENUM('A','B')`
    pub fn sql_type(&self) -> String {
        self.type_spec().to_string()
    }
}

/// An index over one or more columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: String,

    /// Ordered column list
    pub columns: Vec<String>,

    pub unique: bool,
    pub description: Option<String>,
}

impl IndexDefinition {
    pub fn new(name: impl Into<String>, columns: Vec<String>, unique: bool) -> Self {
        Self {
            name: name.into(),
            columns,
            unique,
            description: None,
        }
    }

    pub fn column_set(&self) -> BTreeSet<&str> {
        self.columns.iter().map(String::as_str).collect()
    }

    pub fn covers(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// A foreign key constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDefinition {
    pub name: String,

    /// Source columns on the owning table
    pub columns: Vec<String>,

    pub reference_table: String,
    pub reference_columns: Vec<String>,

    #[serde(default)]
    pub on_update: ReferentialAction,

    #[serde(default)]
    pub on_delete: ReferentialAction,
}

impl ForeignKeyDefinition {
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        reference_table: impl Into<String>,
        reference_columns: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            reference_table: reference_table.into(),
            reference_columns,
            on_update: ReferentialAction::default(),
            on_delete: ReferentialAction::default(),
        }
    }

    pub fn with_actions(mut self, on_update: ReferentialAction, on_delete: ReferentialAction) -> Self {
        self.on_update = on_update;
        self.on_delete = on_delete;
        self
    }

    pub fn column_set(&self) -> BTreeSet<&str> {
        self.columns.iter().map(String::as_str).collect()
    }
}

/// Kind of a named table constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum ConstraintKind {
    Check { condition: String },
    Unique { columns: Vec<String> },
}

/// A CHECK or UNIQUE constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintDefinition {
    pub name: String,

    #[serde(flatten)]
    pub kind: ConstraintKind,
}

impl ConstraintDefinition {
    pub fn check(name: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ConstraintKind::Check {
                condition: condition.into(),
            },
        }
    }

    pub fn unique(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: ConstraintKind::Unique { columns },
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self.kind {
            ConstraintKind::Check { .. } => "CHECK",
            ConstraintKind::Unique { .. } => "UNIQUE",
        }
    }
}

/// Canonical table representation, independent of the source format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table_name: String,
    pub logical_name: Option<String>,
    pub category: Option<TableCategory>,
    pub columns: Vec<ColumnDefinition>,
    pub primary_keys: Vec<String>,
    pub indexes: Vec<IndexDefinition>,
    pub foreign_keys: Vec<ForeignKeyDefinition>,
    pub constraints: Vec<ConstraintDefinition>,
}

impl TableSchema {
    /// Create an empty schema. The category defaults to the one implied by
    /// the table-name prefix.
    pub fn new(table_name: impl Into<String>) -> Result<Self, SchemaError> {
        let table_name = table_name.into().trim().to_string();
        if table_name.is_empty() {
            return Err(SchemaError::EmptyTableName);
        }

        Ok(Self {
            category: TableCategory::from_table_name(&table_name),
            table_name,
            logical_name: None,
            columns: Vec::new(),
            primary_keys: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
            constraints: Vec::new(),
        })
    }

    /// Append a column; a primary-key column is also recorded in `primary_keys`
    pub fn push_column(&mut self, column: ColumnDefinition) {
        if column.primary_key && !self.primary_keys.contains(&column.name) {
            self.primary_keys.push(column.name.clone());
        }
        self.columns.push(column);
    }

    /// Record primary-key columns and derive `primary_key`/NOT NULL on them
    pub fn add_primary_keys<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            let key = key.into();
            if let Some(column) = self.columns.iter_mut().find(|c| c.name == key) {
                column.mark_primary_key();
            }
            if !self.primary_keys.contains(&key) {
                self.primary_keys.push(key);
            }
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn primary_key_set(&self) -> BTreeSet<&str> {
        self.primary_keys.iter().map(String::as_str).collect()
    }
}

/// Errors raised when constructing schema values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("table name must not be empty")]
    EmptyTableName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels() {
        assert_eq!(TableCategory::parse("マスタ系"), Some(TableCategory::Master));
        assert_eq!(TableCategory::parse("Transaction"), Some(TableCategory::Transaction));
        assert_eq!(TableCategory::parse("履歴系"), Some(TableCategory::History));
        assert_eq!(TableCategory::parse("misc"), None);
        assert_eq!(TableCategory::from_table_name("MST_Employee"), Some(TableCategory::Master));
        assert_eq!(TableCategory::from_table_name("Employee"), None);
    }

    #[test]
    fn referential_action_parsing() {
        assert_eq!(ReferentialAction::parse("cascade"), Some(ReferentialAction::Cascade));
        assert_eq!(ReferentialAction::parse("SET  NULL"), Some(ReferentialAction::SetNull));
        assert_eq!(ReferentialAction::parse("set_null"), Some(ReferentialAction::SetNull));
        assert_eq!(ReferentialAction::parse("bogus"), None);
    }

    #[test]
    fn primary_key_derives_not_null() {
        let column = ColumnDefinition::new("id", "VARCHAR(50)").with_primary_key().with_nullable(true);
        assert!(column.primary_key);
        assert!(!column.nullable);

        let mut table = TableSchema::new("MST_Tenant").unwrap();
        table.push_column(ColumnDefinition::new("code", "VARCHAR(10)"));
        table.add_primary_keys(["code"]);

        let code = table.column("code").unwrap();
        assert!(code.primary_key);
        assert!(!code.nullable);
        assert_eq!(table.primary_keys, vec!["code".to_string()]);
    }

    #[test]
    fn empty_table_name_is_rejected() {
        assert_eq!(TableSchema::new("  "), Err(SchemaError::EmptyTableName));
    }

    #[test]
    fn schema_defaults_category_from_prefix() {
        let table = TableSchema::new("TRN_Order").unwrap();
        assert_eq!(table.category, Some(TableCategory::Transaction));
    }

    #[test]
    fn constraint_serialization() {
        let constraint = ConstraintDefinition::check("chk_amount", "amount >= 0");
        let json = serde_json::to_string(&constraint).unwrap();
        assert!(json.contains("\"type\":\"CHECK\""));
        assert!(json.contains("amount >= 0"));
    }
}
