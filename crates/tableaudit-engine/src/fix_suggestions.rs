//! Remediation suggestions derived from check results
//!
//! [`generate`] is a pure function of the results: WARNING and ERROR
//! results map to concrete DDL statements or YAML snippets, duplicates are
//! merged (critical if any copy is) and the output is sorted critical-first.

use std::path::{Path, PathBuf};

use tableaudit_core::{
    ArtifactKind, CheckResult, ColumnIssue, ConstraintIssue, ConstraintKind, DataTypeIssue, ExistenceIssue, FixSuggestion,
    FixType, ForeignKeyDefinition, ForeignKeyIssue, Issue, MultitenantIssue, PerformanceIssue, PresenceVector, Severity,
    SourceIssue, TraceabilityIssue, YamlFormatIssue,
};

/// Suggestions for every WARNING/ERROR result, deduplicated and sorted
pub fn generate(results: &[CheckResult]) -> Vec<FixSuggestion> {
    let mut suggestions: Vec<FixSuggestion> = Vec::new();

    for result in results.iter().filter(|r| r.is_problem()) {
        for suggestion in suggest(result) {
            match suggestions.iter_mut().find(|s| s.dedup_key() == suggestion.dedup_key()) {
                Some(kept) => kept.critical |= suggestion.critical,
                None => suggestions.push(suggestion),
            }
        }
    }

    // Stable: equal keys keep result order.
    suggestions.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    suggestions
}

/// Pick a replacement for a missing referenced column:
/// `{target}_id`, then `id`, then any `*_id`, then the first column
pub fn suggest_reference_column<'a>(target_table: &str, available: &'a [String]) -> Option<&'a str> {
    let own_id = format!("{}_id", target_table.to_lowercase());

    available
        .iter()
        .find(|c| c.to_lowercase() == own_id)
        .or_else(|| available.iter().find(|c| c.eq_ignore_ascii_case("id")))
        .or_else(|| available.iter().find(|c| c.to_lowercase().ends_with("_id")))
        .or_else(|| available.first())
        .map(String::as_str)
}

fn suggest(result: &CheckResult) -> Vec<FixSuggestion> {
    let table = result.table_name.as_str();

    let suggestions = match &result.detail {
        Issue::None | Issue::Fix(_) => Vec::new(),
        Issue::Source(issue) => source_fixes(table, issue),
        Issue::Existence(issue) => existence_fixes(table, issue),
        Issue::Column(issue) => vec![column_fix(table, issue)],
        Issue::DataType(issue) => vec![data_type_fix(table, issue)],
        Issue::ForeignKey(issue) => foreign_key_fix(table, issue).into_iter().collect(),
        Issue::Constraint(issue) => vec![constraint_fix(table, issue)],
        Issue::YamlFormat(issue) => vec![yaml_format_fix(table, issue)],
        Issue::Multitenant(issue) => vec![multitenant_fix(table, issue)],
        Issue::Traceability(issue) => vec![traceability_fix(table, issue)],
        Issue::Performance(issue) => vec![performance_fix(table, issue)],
    };

    suggestions
        .into_iter()
        .map(|fix| {
            let file = matching_file(result.file_path.as_deref(), fix.fix_type);
            let fix = fix.with_file(file);
            if result.severity == Severity::Error {
                fix.critical()
            } else {
                fix
            }
        })
        .collect()
}

/// The result's file, when it is the kind of file this fix edits
fn matching_file(path: Option<&Path>, fix_type: FixType) -> Option<PathBuf> {
    let path = path?;
    let extension = path.extension()?.to_str()?;
    let matches = match fix_type {
        FixType::Ddl | FixType::Insert => extension.eq_ignore_ascii_case("sql"),
        FixType::Yaml => extension.eq_ignore_ascii_case("yaml") || extension.eq_ignore_ascii_case("yml"),
        FixType::All => false,
    };
    matches.then(|| path.to_path_buf())
}

fn source_fixes(table: &str, issue: &SourceIssue) -> Vec<FixSuggestion> {
    match issue {
        SourceIssue::Missing { artifact, .. } => missing_artifact_fixes(table, &[*artifact]),
        SourceIssue::ParseFailed { artifact, reason } => vec![FixSuggestion::new(
            FixType::All,
            table,
            format!("Repair unparseable {artifact} file for {table}"),
            format!("-- {artifact} file could not be parsed: {reason}"),
        )],
    }
}

fn existence_fixes(table: &str, issue: &ExistenceIssue) -> Vec<FixSuggestion> {
    match issue {
        ExistenceIssue::AllPresent { .. } => Vec::new(),
        ExistenceIssue::Missing { presence, .. } => missing_artifact_fixes(table, &missing_kinds(presence)),
        ExistenceIssue::Orphaned { orphan_files, .. } => vec![FixSuggestion::new(
            FixType::All,
            table,
            format!("Register {table} in the table list or remove its orphaned files"),
            format!(
                "| TBL-XXX | <category> | {table} | <logical name> |\n-- or remove: {}",
                orphan_files.join(", ")
            ),
        )],
    }
}

fn missing_kinds(presence: &PresenceVector) -> Vec<ArtifactKind> {
    let mut kinds = Vec::new();
    if !presence.in_table_list {
        kinds.push(ArtifactKind::TableList);
    }
    if !presence.in_ddl {
        kinds.push(ArtifactKind::Ddl);
    }
    if !presence.in_yaml {
        kinds.push(ArtifactKind::Yaml);
    }
    kinds
}

fn missing_artifact_fixes(table: &str, kinds: &[ArtifactKind]) -> Vec<FixSuggestion> {
    kinds
        .iter()
        .map(|kind| match kind {
            ArtifactKind::TableList => FixSuggestion::new(
                FixType::All,
                table,
                format!("Register {table} in the table list"),
                format!("| TBL-XXX | <category> | {table} | <logical name> |"),
            ),
            ArtifactKind::Ddl => FixSuggestion::new(
                FixType::Ddl,
                table,
                format!("Generate {table}.sql from the YAML definition"),
                format!("CREATE TABLE {table} (\n    -- columns from {table}_details.yaml\n);"),
            ),
            ArtifactKind::Yaml => FixSuggestion::new(
                FixType::Yaml,
                table,
                format!("Create {table}_details.yaml"),
                format!(
                    "table_name: {table}\nlogical_name: <logical name>\ncategory: <category>\nrevision_history:\n  - version: \"1.0\"\n    date: <date>\n    author: <author>\n    changes: initial version\noverview: <overview>\ncolumns: []\nnotes: []\nbusiness_rules: []\n"
                ),
            ),
        })
        .collect()
}

fn column_fix(table: &str, issue: &ColumnIssue) -> FixSuggestion {
    match issue {
        ColumnIssue::MissingInDdl {
            column,
            yaml_type,
            nullable,
        } => FixSuggestion::new(
            FixType::Ddl,
            table,
            format!("Add column '{column}' to DDL"),
            format!("ALTER TABLE {table} ADD COLUMN {column} {yaml_type}{};", not_null(*nullable)),
        ),
        ColumnIssue::MissingInYaml {
            column,
            ddl_type,
            nullable,
        } => FixSuggestion::new(
            FixType::Yaml,
            table,
            format!("Add column '{column}' to YAML"),
            format!("columns:\n  - name: {column}\n    type: {ddl_type}\n    nullable: {nullable}\n"),
        ),
        ColumnIssue::NullableMismatch {
            column,
            sql_type,
            yaml_nullable,
            ..
        } => FixSuggestion::new(
            FixType::Ddl,
            table,
            format!("Align nullability of '{column}' with YAML"),
            format!(
                "ALTER TABLE {table} MODIFY COLUMN {column} {sql_type}{};",
                if *yaml_nullable { " NULL" } else { " NOT NULL" }
            ),
        ),
        ColumnIssue::DefaultMismatch {
            column, yaml_default, ..
        } => {
            let statement = match yaml_default {
                Some(value) => format!("ALTER TABLE {table} ALTER COLUMN {column} SET DEFAULT {};", sql_literal(value)),
                None => format!("ALTER TABLE {table} ALTER COLUMN {column} DROP DEFAULT;"),
            };
            FixSuggestion::new(
                FixType::Ddl,
                table,
                format!("Align default of '{column}' with YAML"),
                statement,
            )
        }
    }
}

fn data_type_fix(table: &str, issue: &DataTypeIssue) -> FixSuggestion {
    match issue {
        DataTypeIssue::TypeMismatch {
            column,
            yaml_definition,
            ..
        }
        | DataTypeIssue::EnumMismatch {
            column,
            yaml_definition,
            ..
        } => FixSuggestion::new(
            FixType::Ddl,
            table,
            format!("Change type of '{column}' to {yaml_definition}"),
            format!("ALTER TABLE {table} MODIFY COLUMN {column} {yaml_definition};"),
        ),
    }
}

fn foreign_key_fix(table: &str, issue: &ForeignKeyIssue) -> Option<FixSuggestion> {
    let fix = match issue {
        ForeignKeyIssue::TargetTableMissing {
            foreign_key,
            reference_table,
        } => FixSuggestion::new(
            FixType::All,
            table,
            format!("Create table {reference_table} or correct foreign key '{foreign_key}'"),
            format!("-- {foreign_key} references missing table {reference_table}"),
        ),
        ForeignKeyIssue::TargetColumnMissing {
            definition,
            target_table,
            missing_column,
            available_columns,
        } => {
            let replacement = suggest_reference_column(target_table, available_columns)?;
            let mut repaired = definition.clone();
            for column in repaired.reference_columns.iter_mut() {
                if column == missing_column {
                    *column = replacement.to_string();
                }
            }
            FixSuggestion::new(
                FixType::Ddl,
                table,
                format!("Reference {target_table}.{replacement} instead of {missing_column} in '{}'", definition.name),
                format!(
                    "ALTER TABLE {table} DROP FOREIGN KEY {};\n{}",
                    definition.name,
                    add_foreign_key(table, &repaired)
                ),
            )
        }
        ForeignKeyIssue::MissingInDdl { definition } => FixSuggestion::new(
            FixType::Ddl,
            table,
            format!("Add foreign key '{}' to DDL", definition.name),
            add_foreign_key(table, definition),
        ),
        ForeignKeyIssue::MissingInYaml { definition } => FixSuggestion::new(
            FixType::Yaml,
            table,
            format!("Add foreign key '{}' to YAML", definition.name),
            format!(
                "foreign_keys:\n  - name: {}\n    columns: [{}]\n    reference_table: {}\n    reference_columns: [{}]\n    on_update: {}\n    on_delete: {}\n",
                definition.name,
                definition.columns.join(", "),
                definition.reference_table,
                definition.reference_columns.join(", "),
                definition.on_update,
                definition.on_delete
            ),
        ),
        ForeignKeyIssue::ActionMismatch { definition, .. } => FixSuggestion::new(
            FixType::Ddl,
            table,
            format!("Align actions of foreign key '{}' with YAML", definition.name),
            format!(
                "ALTER TABLE {table} DROP FOREIGN KEY {};\n{}",
                definition.name,
                add_foreign_key(table, definition)
            ),
        ),
    };
    Some(fix)
}

fn add_foreign_key(table: &str, fk: &ForeignKeyDefinition) -> String {
    format!(
        "ALTER TABLE {table} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON UPDATE {} ON DELETE {};",
        fk.name,
        fk.columns.join(", "),
        fk.reference_table,
        fk.reference_columns.join(", "),
        fk.on_update,
        fk.on_delete
    )
}

fn constraint_fix(table: &str, issue: &ConstraintIssue) -> FixSuggestion {
    match issue {
        ConstraintIssue::PrimaryKeyMismatch { yaml_columns, .. } => FixSuggestion::new(
            FixType::Ddl,
            table,
            "Align primary key with YAML",
            format!(
                "ALTER TABLE {table} DROP PRIMARY KEY, ADD PRIMARY KEY ({});",
                yaml_columns.join(", ")
            ),
        ),
        ConstraintIssue::MissingInDdl { constraint } => {
            let body = match &constraint.kind {
                ConstraintKind::Check { condition } => format!("CHECK ({condition})"),
                ConstraintKind::Unique { columns } => format!("UNIQUE ({})", columns.join(", ")),
            };
            FixSuggestion::new(
                FixType::Ddl,
                table,
                format!("Add {} constraint '{}' to DDL", constraint.kind_str(), constraint.name),
                format!("ALTER TABLE {table} ADD CONSTRAINT {} {body};", constraint.name),
            )
        }
    }
}

fn yaml_format_fix(table: &str, issue: &YamlFormatIssue) -> FixSuggestion {
    match issue {
        YamlFormatIssue::SectionMissing { section } | YamlFormatIssue::SectionInsufficient { section, .. } => {
            FixSuggestion::new(
                FixType::Yaml,
                table,
                format!("Complete section '{section}'"),
                section_template(section),
            )
        }
        YamlFormatIssue::RevisionEntryIncomplete { index, missing_fields } => FixSuggestion::new(
            FixType::Yaml,
            table,
            format!("Complete revision_history[{index}]"),
            missing_fields
                .iter()
                .map(|field| format!("    {field}: <{field}>\n"))
                .collect::<String>(),
        ),
        YamlFormatIssue::SampleDataMissing => FixSuggestion::new(
            FixType::Insert,
            table,
            "Add initial master data",
            format!("INSERT INTO {table} (<columns>) VALUES (<values>);"),
        ),
    }
}

fn section_template(section: &str) -> String {
    match section {
        "revision_history" => {
            "revision_history:\n  - version: \"1.0\"\n    date: <date>\n    author: <author>\n    changes: <changes>\n"
                .to_string()
        }
        "overview" => "overview: |\n  <purpose, contents and usage of the table, at least 50 characters>\n".to_string(),
        other => format!("{other}:\n  - <item 1>\n  - <item 2>\n  - <item 3>\n"),
    }
}

fn multitenant_fix(table: &str, issue: &MultitenantIssue) -> FixSuggestion {
    match issue {
        MultitenantIssue::TenantColumnMissing {
            artifact: ArtifactKind::Yaml,
            column,
        } => FixSuggestion::new(
            FixType::Yaml,
            table,
            format!("Add tenant column '{column}' to YAML"),
            format!("columns:\n  - name: {column}\n    type: VARCHAR(50)\n    nullable: false\n"),
        ),
        MultitenantIssue::TenantColumnMissing { column, .. } => FixSuggestion::new(
            FixType::Ddl,
            table,
            format!("Add tenant column '{column}' to DDL"),
            format!("ALTER TABLE {table} ADD COLUMN {column} VARCHAR(50) NOT NULL;"),
        ),
        MultitenantIssue::TenantColumnNullable {
            artifact: ArtifactKind::Yaml,
            column,
        } => FixSuggestion::new(
            FixType::Yaml,
            table,
            format!("Make tenant column '{column}' NOT NULL in YAML"),
            format!("  - name: {column}\n    nullable: false\n"),
        ),
        MultitenantIssue::TenantColumnNullable { column, .. } => FixSuggestion::new(
            FixType::Ddl,
            table,
            format!("Make tenant column '{column}' NOT NULL in DDL"),
            format!("ALTER TABLE {table} MODIFY COLUMN {column} VARCHAR(50) NOT NULL;"),
        ),
        MultitenantIssue::TenantIndexMissing { column } => FixSuggestion::new(
            FixType::Ddl,
            table,
            format!("Index tenant column '{column}'"),
            format!("CREATE INDEX idx_{}_{column} ON {table} ({column});", table.to_lowercase()),
        ),
        MultitenantIssue::CrossTenantForeignKey {
            foreign_key,
            reference_table,
            column,
        } => FixSuggestion::new(
            FixType::Ddl,
            table,
            format!("Include '{column}' on both sides of foreign key '{foreign_key}'"),
            format!(
                "ALTER TABLE {table} DROP FOREIGN KEY {foreign_key};\n-- re-add {foreign_key} so that {reference_table}.{column} is part of the referenced columns"
            ),
        ),
    }
}

fn traceability_fix(table: &str, issue: &TraceabilityIssue) -> FixSuggestion {
    let column = match issue {
        TraceabilityIssue::RequirementIdMissing { column } | TraceabilityIssue::RequirementIdMalformed { column, .. } => {
            column
        }
    };
    FixSuggestion::new(
        FixType::Yaml,
        table,
        format!("Set requirement_id of '{column}'"),
        format!("  - name: {column}\n    requirement_id: XXX.1-XXXX.1\n"),
    )
}

fn performance_fix(table: &str, issue: &PerformanceIssue) -> FixSuggestion {
    match issue {
        PerformanceIssue::PrimaryKeyIndexMissing { columns } if columns.is_empty() => FixSuggestion::new(
            FixType::Ddl,
            table,
            "Add a primary key",
            format!("-- TODO: choose the key column\nALTER TABLE {table} ADD PRIMARY KEY (<column>);"),
        ),
        PerformanceIssue::PrimaryKeyIndexMissing { columns } => FixSuggestion::new(
            FixType::Ddl,
            table,
            "Add a primary key",
            format!("ALTER TABLE {table} ADD PRIMARY KEY ({});", columns.join(", ")),
        ),
        PerformanceIssue::IndexMissingInDdl { index } => FixSuggestion::new(
            FixType::Ddl,
            table,
            format!("Create index '{}'", index.name),
            format!(
                "CREATE {}INDEX {} ON {table} ({});",
                if index.unique { "UNIQUE " } else { "" },
                index.name,
                index.columns.join(", ")
            ),
        ),
        PerformanceIssue::VolumeThresholdExceeded {
            category,
            projected_rows,
            threshold,
        } => FixSuggestion::new(
            FixType::All,
            table,
            "Review partitioning or archival",
            format!("-- {projected_rows} projected rows exceed the {category} threshold of {threshold}; consider partitioning {table} or archiving old rows"),
        ),
    }
}

fn not_null(nullable: bool) -> &'static str {
    if nullable {
        ""
    } else {
        " NOT NULL"
    }
}

/// Quote a normalized default unless it is numeric or a keyword
fn sql_literal(value: &str) -> String {
    let keyword = matches!(value, "TRUE" | "FALSE" | "CURRENT_TIMESTAMP");
    if keyword || value.parse::<f64>().is_ok() {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}
