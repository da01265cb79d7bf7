//! Foreign keys: target existence and YAML/DDL agreement

use std::collections::HashSet;
use std::path::Path;

use tableaudit_core::{CheckName, CheckResult, ForeignKeyDefinition, ForeignKeyIssue};

use crate::checker::{load_pair, CheckContext, Checker};

pub struct ForeignKeyConsistencyChecker;

impl Checker for ForeignKeyConsistencyChecker {
    fn name(&self) -> CheckName {
        CheckName::ForeignKeyConsistency
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

            let before = results.len();
            let ddl_fks = &pair.ddl.foreign_keys;
            let yaml_fks = &pair.yaml.schema.foreign_keys;

            // Identical definitions on both sides are target-checked once.
            let mut targets_checked: HashSet<(Vec<String>, String, Vec<String>)> = HashSet::new();
            for (fk, path) in ddl_fks
                .iter()
                .map(|fk| (fk, pair.ddl_path.as_path()))
                .chain(yaml_fks.iter().map(|fk| (fk, pair.yaml_path.as_path())))
            {
                let key = (sorted(&fk.columns), fk.reference_table.clone(), sorted(&fk.reference_columns));
                if targets_checked.insert(key) {
                    check_target(ctx, check, table, fk, path, &mut results);
                }
            }

            for yaml_fk in yaml_fks {
                match ddl_fks.iter().find(|d| d.column_set() == yaml_fk.column_set()) {
                    None => results.push(
                        CheckResult::error(
                            check,
                            table,
                            format!(
                                "Foreign key '{}' ({}) is defined in YAML but missing from DDL",
                                yaml_fk.name,
                                yaml_fk.columns.join(", ")
                            ),
                        )
                        .with_detail(ForeignKeyIssue::MissingInDdl {
                            definition: yaml_fk.clone(),
                        })
                        .with_file(&pair.ddl_path),
                    ),
                    Some(ddl_fk) => {
                        if ddl_fk.on_update != yaml_fk.on_update || ddl_fk.on_delete != yaml_fk.on_delete {
                            results.push(
                                CheckResult::warning(
                                    check,
                                    table,
                                    format!(
                                        "Foreign key '{}' actions differ: YAML ON UPDATE {} ON DELETE {}, DDL ON UPDATE {} ON DELETE {}",
                                        yaml_fk.name,
                                        yaml_fk.on_update,
                                        yaml_fk.on_delete,
                                        ddl_fk.on_update,
                                        ddl_fk.on_delete
                                    ),
                                )
                                .with_detail(ForeignKeyIssue::ActionMismatch {
                                    definition: yaml_fk.clone(),
                                    ddl_on_update: ddl_fk.on_update,
                                    ddl_on_delete: ddl_fk.on_delete,
                                })
                                .with_file(&pair.ddl_path),
                            );
                        }
                    }
                }
            }

            for ddl_fk in ddl_fks {
                if !yaml_fks.iter().any(|y| y.column_set() == ddl_fk.column_set()) {
                    results.push(
                        CheckResult::warning(
                            check,
                            table,
                            format!(
                                "Foreign key '{}' ({}) exists in DDL but is not defined in YAML",
                                ddl_fk.name,
                                ddl_fk.columns.join(", ")
                            ),
                        )
                        .with_detail(ForeignKeyIssue::MissingInYaml {
                            definition: ddl_fk.clone(),
                        })
                        .with_file(&pair.yaml_path),
                    );
                }
            }

            if results.len() == before {
                let message = if ddl_fks.is_empty() && yaml_fks.is_empty() {
                    "No foreign keys defined".to_string()
                } else {
                    format!("{} foreign keys are consistent", yaml_fks.len().max(ddl_fks.len()))
                };
                results.push(CheckResult::success(check, table, message).with_file(&pair.ddl_path));
            }
        }

        results
    }
}

/// The referenced table must be loaded and carry every referenced column
fn check_target(
    ctx: &CheckContext<'_>,
    check: CheckName,
    table: &str,
    fk: &ForeignKeyDefinition,
    path: &Path,
    results: &mut Vec<CheckResult>,
) {
    let Some(target) = ctx.registry.schema(&fk.reference_table) else {
        results.push(
            CheckResult::error(
                check,
                table,
                format!(
                    "Foreign key '{}' references table '{}' which does not exist",
                    fk.name, fk.reference_table
                ),
            )
            .with_detail(ForeignKeyIssue::TargetTableMissing {
                foreign_key: fk.name.clone(),
                reference_table: fk.reference_table.clone(),
            })
            .with_file(path),
        );
        return;
    };

    for column in &fk.reference_columns {
        if target.has_column(column) {
            continue;
        }
        results.push(
            CheckResult::error(
                check,
                table,
                format!(
                    "Foreign key '{}' references column '{}.{}' which does not exist",
                    fk.name, fk.reference_table, column
                ),
            )
            .with_detail(ForeignKeyIssue::TargetColumnMissing {
                definition: fk.clone(),
                target_table: fk.reference_table.clone(),
                missing_column: column.clone(),
                available_columns: target.column_names().into_iter().map(str::to_string).collect(),
            })
            .with_file(path),
        );
    }
}

fn sorted(columns: &[String]) -> Vec<String> {
    let mut columns = columns.to_vec();
    columns.sort();
    columns
}
