//! Column names, nullability and defaults: YAML vs DDL

use tableaudit_core::{normalize_default, CheckName, CheckResult, ColumnIssue};

use crate::checker::{load_pair, CheckContext, Checker};

pub struct ColumnConsistencyChecker;

impl Checker for ColumnConsistencyChecker {
    fn name(&self) -> CheckName {
        CheckName::ColumnConsistency
    }

    fn check(&self, ctx: &CheckContext<'_>, tables: &[String]) -> Vec<CheckResult> {
        let check = self.name();
        let mut results = Vec::new();

        for table in tables {
            let pair = match load_pair(ctx, check, table) {
                Ok(pair) => pair,
                Err(result) => {
                    results.push(result);
                    continue;
                }
            };

            let ddl = pair.ddl;
            let yaml = &pair.yaml.schema;
            let before = results.len();

            for column in &yaml.columns {
                if !ddl.has_column(&column.name) {
                    results.push(
                        CheckResult::error(
                            check,
                            table,
                            format!("Column '{}' is defined in YAML but missing from DDL", column.name),
                        )
                        .with_detail(ColumnIssue::MissingInDdl {
                            column: column.name.clone(),
                            yaml_type: column.sql_type(),
                            nullable: column.nullable,
                        })
                        .with_file(&pair.ddl_path),
                    );
                }
            }

            for column in &ddl.columns {
                if !yaml.has_column(&column.name) {
                    results.push(
                        CheckResult::error(
                            check,
                            table,
                            format!("Column '{}' exists in DDL but is not defined in YAML", column.name),
                        )
                        .with_detail(ColumnIssue::MissingInYaml {
                            column: column.name.clone(),
                            ddl_type: column.sql_type(),
                            nullable: column.nullable,
                        })
                        .with_file(&pair.yaml_path),
                    );
                }
            }

            for yaml_col in &yaml.columns {
                let Some(ddl_col) = ddl.column(&yaml_col.name) else {
                    continue;
                };

                if yaml_col.nullable != ddl_col.nullable {
                    results.push(
                        CheckResult::warning(
                            check,
                            table,
                            format!(
                                "Column '{}' nullability differs: YAML {}, DDL {}",
                                yaml_col.name,
                                null_label(yaml_col.nullable),
                                null_label(ddl_col.nullable)
                            ),
                        )
                        .with_detail(ColumnIssue::NullableMismatch {
                            column: yaml_col.name.clone(),
                            sql_type: yaml_col.sql_type(),
                            ddl_nullable: ddl_col.nullable,
                            yaml_nullable: yaml_col.nullable,
                        })
                        .with_file(&pair.ddl_path),
                    );
                }

                let yaml_default = normalize_default(yaml_col.default_value.as_deref());
                let ddl_default = normalize_default(ddl_col.default_value.as_deref());
                if yaml_default != ddl_default {
                    results.push(
                        CheckResult::warning(
                            check,
                            table,
                            format!(
                                "Column '{}' default differs: YAML {}, DDL {}",
                                yaml_col.name,
                                yaml_default.as_deref().unwrap_or("NULL"),
                                ddl_default.as_deref().unwrap_or("NULL")
                            ),
                        )
                        .with_detail(ColumnIssue::DefaultMismatch {
                            column: yaml_col.name.clone(),
                            ddl_default,
                            yaml_default,
                        })
                        .with_file(&pair.ddl_path),
                    );
                }
            }

            if results.len() == before {
                results.push(
                    CheckResult::success(
                        check,
                        table,
                        format!("All {} columns are consistent", yaml.columns.len()),
                    )
                    .with_file(&pair.ddl_path),
                );
            }
        }

        results
    }
}

fn null_label(nullable: bool) -> &'static str {
    if nullable {
        "NULL"
    } else {
        "NOT NULL"
    }
}
