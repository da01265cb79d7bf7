//! Table detail (`T_details.yaml`) parsing
//!
//! Two historical dialects exist: plain `columns`/`indexes`/`constraints`
//! and the `business_*` variants. Both are deserialized into one raw record
//! and [`RawDetail::into_detail`] normalizes it into a [`TableSchema`] plus
//! the document metadata the format checks need.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;
use tableaudit_core::{
    ColumnDefinition, ConstraintDefinition, ForeignKeyDefinition, IndexDefinition, ReferentialAction, TableCategory,
    TableSchema, TypeSpec,
};

use crate::error::ParseError;

/// A parsed YAML detail file
#[derive(Debug, Clone, PartialEq)]
pub struct YamlDetail {
    pub schema: TableSchema,
    pub meta: YamlMetadata,
}

/// Document sections outside the schema itself.
///
/// `None` means the section is absent; `Some(vec![])` means present but empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct YamlMetadata {
    pub revision_history: Option<Vec<RevisionEntry>>,
    pub overview: Option<String>,
    pub notes: Option<Vec<String>>,
    pub business_rules: Option<Vec<String>>,
    pub sample_data: Option<Vec<BTreeMap<String, String>>>,

    /// Projected row count after five years of operation
    pub estimated_rows_5years: Option<u64>,
}

/// One `revision_history` entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RevisionEntry {
    pub version: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub changes: Option<String>,
}

impl RevisionEntry {
    pub const REQUIRED_FIELDS: [&'static str; 4] = ["version", "date", "author", "changes"];

    /// Names of required fields that are absent or blank
    pub fn missing_fields(&self) -> Vec<String> {
        let values = [&self.version, &self.date, &self.author, &self.changes];
        Self::REQUIRED_FIELDS
            .iter()
            .zip(values)
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(field, _)| field.to_string())
            .collect()
    }
}

/// Parser for YAML detail files
pub struct YamlParser;

impl YamlParser {
    pub fn parse_file(path: &Path) -> Result<YamlDetail, ParseError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ParseError::IoError(path.display().to_string(), e.to_string()))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<YamlDetail, ParseError> {
        let raw: RawDetail = serde_yaml::from_str(text).map_err(|e| ParseError::InvalidYaml(e.to_string()))?;
        raw.into_detail()
    }
}

#[derive(Debug, Deserialize)]
struct RawDetail {
    table_name: Option<String>,
    logical_name: Option<String>,
    category: Option<String>,

    columns: Option<Vec<RawColumn>>,
    business_columns: Option<Vec<RawColumn>>,

    #[serde(default, alias = "primary_key")]
    primary_keys: Vec<String>,

    indexes: Option<Vec<RawIndex>>,
    business_indexes: Option<Vec<RawIndex>>,

    #[serde(default)]
    foreign_keys: Vec<RawForeignKey>,

    constraints: Option<Vec<RawConstraint>>,
    business_constraints: Option<Vec<RawConstraint>>,

    revision_history: Option<Vec<BTreeMap<String, Value>>>,
    overview: Option<Value>,
    notes: Option<StringList>,
    business_rules: Option<StringList>,
    rules: Option<StringList>,
    sample_data: Option<Vec<Value>>,

    performance: Option<RawPerformance>,
    estimated_rows_5years: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawColumn {
    name: Option<String>,
    #[serde(rename = "type")]
    type_name: Option<String>,
    data_type: Option<String>,
    length: Option<u32>,
    precision: Option<u32>,
    scale: Option<u32>,
    nullable: Option<bool>,
    primary_key: Option<bool>,
    unique: Option<bool>,
    default: Option<Value>,
    comment: Option<String>,
    description: Option<String>,
    #[serde(default)]
    enum_values: Vec<Value>,
    encrypted: Option<bool>,
    requirement_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawIndex {
    name: Option<String>,
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    unique: bool,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawForeignKey {
    name: Option<String>,
    column: Option<String>,
    columns: Option<Vec<String>>,
    reference_table: Option<String>,
    reference_column: Option<String>,
    reference_columns: Option<Vec<String>>,
    references: Option<RawReference>,
    on_update: Option<String>,
    on_delete: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawReference {
    table: Option<String>,
    column: Option<String>,
    columns: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawConstraint {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    condition: Option<String>,
    column: Option<String>,
    columns: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawPerformance {
    estimated_rows_5years: Option<Value>,
}

/// A section written either as one string or as a list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringList {
    One(String),
    Many(Vec<Value>),
}

impl StringList {
    fn into_vec(self) -> Vec<String> {
        match self {
            StringList::One(text) => vec![text],
            StringList::Many(items) => items.iter().filter_map(scalar_to_string).collect(),
        }
    }
}

impl RawDetail {
    fn into_detail(self) -> Result<YamlDetail, ParseError> {
        let table_name = self
            .table_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ParseError::missing("table_name"))?;

        let mut schema = TableSchema::new(table_name.trim())?;
        schema.logical_name = self.logical_name;
        if let Some(category) = self.category.as_deref().and_then(TableCategory::parse) {
            schema.category = Some(category);
        }

        if self.columns.is_none() && self.business_columns.is_none() {
            return Err(ParseError::missing("columns"));
        }

        let mut seen = HashSet::new();
        let raw_columns = self.columns.into_iter().flatten().chain(self.business_columns.into_iter().flatten());
        for (idx, raw) in raw_columns.enumerate() {
            let column = raw.into_column(idx)?;
            if !seen.insert(column.name.clone()) {
                tracing::debug!(table = %schema.table_name, column = %column.name, "dropping duplicate column");
                continue;
            }
            schema.push_column(column);
        }
        schema.add_primary_keys(self.primary_keys);

        for raw in self.indexes.into_iter().flatten().chain(self.business_indexes.into_iter().flatten()) {
            let name = raw
                .name
                .unwrap_or_else(|| format!("idx_{}_{}", schema.table_name, raw.columns.join("_")));
            let mut index = IndexDefinition::new(name, raw.columns, raw.unique);
            index.description = raw.description;
            schema.indexes.push(index);
        }

        for (idx, raw) in self.foreign_keys.into_iter().enumerate() {
            let fk = raw.into_foreign_key(&schema.table_name, idx)?;
            schema.foreign_keys.push(fk);
        }

        let raw_constraints = self
            .constraints
            .into_iter()
            .flatten()
            .chain(self.business_constraints.into_iter().flatten());
        for raw in raw_constraints {
            if let Some(constraint) = raw.into_constraint(&schema.table_name) {
                schema.constraints.push(constraint);
            }
        }

        let estimated = self
            .performance
            .and_then(|p| p.estimated_rows_5years)
            .or(self.estimated_rows_5years);

        let meta = YamlMetadata {
            revision_history: self
                .revision_history
                .map(|entries| entries.iter().map(revision_entry).collect()),
            overview: self.overview.as_ref().and_then(scalar_to_string),
            notes: self.notes.map(StringList::into_vec),
            business_rules: self.business_rules.or(self.rules).map(StringList::into_vec),
            sample_data: self
                .sample_data
                .map(|rows| rows.iter().filter_map(sample_row).collect()),
            estimated_rows_5years: estimated.as_ref().and_then(row_count),
        };

        Ok(YamlDetail { schema, meta })
    }
}

impl RawColumn {
    fn into_column(self, idx: usize) -> Result<ColumnDefinition, ParseError> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ParseError::missing(format!("columns[{idx}].name")))?;
        let raw_type = self
            .type_name
            .or(self.data_type)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ParseError::missing(format!("{name}.type")))?;

        let mut spec = TypeSpec::parse(&raw_type);
        spec.length = spec.length.or(self.length);
        spec.precision = spec.precision.or(self.precision);
        spec.scale = spec.scale.or(self.scale);
        if spec.enum_values.is_empty() {
            spec.enum_values = self.enum_values.iter().filter_map(scalar_to_string).collect();
        }

        let mut column = ColumnDefinition::from_type_spec(name, spec)
            .with_nullable(self.nullable.unwrap_or(true))
            .with_unique(self.unique.unwrap_or(false));

        if self.primary_key.unwrap_or(false) {
            column.mark_primary_key();
        }
        column.default_value = self.default.as_ref().and_then(scalar_to_string);
        column.comment = self.comment.or(self.description);
        column.encrypted = self.encrypted.unwrap_or(false);
        column.requirement_id = self.requirement_id;

        Ok(column)
    }
}

impl RawForeignKey {
    fn into_foreign_key(self, table_name: &str, idx: usize) -> Result<ForeignKeyDefinition, ParseError> {
        let field = |name: &str| ParseError::missing(format!("foreign_keys[{idx}].{name}"));

        let columns = self
            .columns
            .or_else(|| self.column.map(|c| vec![c]))
            .filter(|c| !c.is_empty())
            .ok_or_else(|| field("columns"))?;

        let (nested_table, nested_columns) = match self.references {
            Some(reference) => (
                reference.table,
                reference.columns.or_else(|| reference.column.map(|c| vec![c])),
            ),
            None => (None, None),
        };

        let reference_table = self
            .reference_table
            .or(nested_table)
            .ok_or_else(|| field("reference_table"))?;
        let reference_columns = self
            .reference_columns
            .or_else(|| self.reference_column.map(|c| vec![c]))
            .or(nested_columns)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| field("reference_columns"))?;

        let on_update = parse_action(self.on_update.as_deref(), idx, "on_update")?;
        let on_delete = parse_action(self.on_delete.as_deref(), idx, "on_delete")?;

        let name = self
            .name
            .unwrap_or_else(|| format!("fk_{}_{}", table_name, columns.join("_")));

        Ok(ForeignKeyDefinition::new(name, columns, reference_table, reference_columns).with_actions(on_update, on_delete))
    }
}

impl RawConstraint {
    fn into_constraint(self, table_name: &str) -> Option<ConstraintDefinition> {
        let kind = self.kind.as_deref().map(|k| k.trim().to_uppercase());
        let columns = self.columns.or_else(|| self.column.map(|c| vec![c]));

        match (kind.as_deref(), self.condition, columns) {
            (Some("CHECK") | None, Some(condition), _) => {
                let name = self.name.unwrap_or_else(|| format!("chk_{table_name}"));
                Some(ConstraintDefinition::check(name, condition))
            }
            (Some("UNIQUE") | None, None, Some(columns)) | (Some("UNIQUE"), Some(_), Some(columns)) => {
                let name = self
                    .name
                    .unwrap_or_else(|| format!("uq_{}_{}", table_name, columns.join("_")));
                Some(ConstraintDefinition::unique(name, columns))
            }
            (kind, ..) => {
                tracing::debug!(table = %table_name, kind = ?kind, "ignoring unsupported YAML constraint");
                None
            }
        }
    }
}

fn parse_action(value: Option<&str>, idx: usize, field: &str) -> Result<ReferentialAction, ParseError> {
    match value {
        None => Ok(ReferentialAction::default()),
        Some(raw) => ReferentialAction::parse(raw).ok_or_else(|| ParseError::InvalidField {
            field: format!("foreign_keys[{idx}].{field}"),
            reason: format!("unknown referential action '{raw}'"),
        }),
    }
}

fn revision_entry(entry: &BTreeMap<String, Value>) -> RevisionEntry {
    let get = |key: &str| entry.get(key).and_then(scalar_to_string);
    RevisionEntry {
        version: get("version"),
        date: get("date"),
        author: get("author"),
        changes: get("changes"),
    }
}

fn sample_row(row: &Value) -> Option<BTreeMap<String, String>> {
    let mapping = row.as_mapping()?;
    Some(
        mapping
            .iter()
            .filter_map(|(key, value)| Some((scalar_to_string(key)?, scalar_to_string(value).unwrap_or_default())))
            .collect(),
    )
}

fn row_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.replace([',', '_'], "").trim().parse().ok(),
        _ => None,
    }
}

/// Render a scalar as text; sequences are joined with newlines
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Sequence(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_to_string).collect();
            (!parts.is_empty()).then(|| parts.join("\n"))
        }
        Value::Mapping(_) => serde_yaml::to_string(value).ok().map(|s| s.trim().to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
    }
}
