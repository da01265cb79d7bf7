//! Performance impact: primary key index, declared indexes, projected volume

use std::collections::BTreeSet;

use tableaudit_core::{
    CheckName, CheckResult, ConstraintKind, PerformanceConfig, PerformanceIssue, TableCategory, TableSchema,
};

use crate::checker::{load_pair, CheckContext, Checker};
use crate::fix_suggestions::suggest_reference_column;

pub struct PerformanceImpactChecker;

impl Checker for PerformanceImpactChecker {
    fn name(&self) -> CheckName {
        CheckName::PerformanceImpact
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
            let ddl = pair.ddl;

            if ddl.primary_keys.is_empty() {
                let columns = primary_key_candidate(table, &pair.yaml.schema, ddl);
                results.push(
                    CheckResult::warning(check, table, "DDL has no primary key, so no implicit primary index")
                        .with_detail(PerformanceIssue::PrimaryKeyIndexMissing { columns })
                        .with_file(&pair.ddl_path),
                );
            }

            let ddl_indexes = indexed_column_sets(ddl);
            for index in &pair.yaml.schema.indexes {
                if !ddl_indexes.contains(&index.column_set()) {
                    results.push(
                        CheckResult::warning(
                            check,
                            table,
                            format!(
                                "Index '{}' ({}) is declared in YAML but not created in DDL",
                                index.name,
                                index.columns.join(", ")
                            ),
                        )
                        .with_detail(PerformanceIssue::IndexMissingInDdl { index: index.clone() })
                        .with_file(&pair.ddl_path),
                    );
                }
            }

            let category = pair
                .yaml
                .schema
                .category
                .or(ddl.category)
                .or_else(|| TableCategory::from_table_name(table));
            if let (Some(category), Some(projected_rows)) = (category, pair.yaml.meta.estimated_rows_5years) {
                if let Some(threshold) = row_threshold(&ctx.config.performance, category) {
                    if projected_rows > threshold {
                        results.push(
                            CheckResult::warning(
                                check,
                                table,
                                format!(
                                    "Projected {projected_rows} rows in 5 years exceeds the {category} threshold of {threshold}; review partitioning or archival"
                                ),
                            )
                            .with_detail(PerformanceIssue::VolumeThresholdExceeded {
                                category,
                                projected_rows,
                                threshold,
                            })
                            .with_file(&pair.yaml_path),
                        );
                    }
                }
            }

            if results.len() == before {
                results.push(
                    CheckResult::success(check, table, "Indexes and projected volume are within limits")
                        .with_file(&pair.ddl_path),
                );
            }
        }

        results
    }
}

/// Column sets served by a DDL index, unique constraint or the primary key
fn indexed_column_sets(ddl: &TableSchema) -> Vec<BTreeSet<&str>> {
    let mut sets: Vec<BTreeSet<&str>> = ddl.indexes.iter().map(|i| i.column_set()).collect();
    for constraint in &ddl.constraints {
        if let ConstraintKind::Unique { columns } = &constraint.kind {
            sets.push(columns.iter().map(String::as_str).collect());
        }
    }
    if !ddl.primary_keys.is_empty() {
        sets.push(ddl.primary_key_set());
    }
    sets
}

fn row_threshold(config: &PerformanceConfig, category: TableCategory) -> Option<u64> {
    match category {
        TableCategory::Master => Some(config.master_row_threshold),
        TableCategory::Transaction => Some(config.transaction_row_threshold),
        TableCategory::History | TableCategory::System | TableCategory::Work => None,
    }
}

/// YAML's declared primary key when it names DDL columns, else the best
/// id-like DDL column
fn primary_key_candidate(table: &str, yaml: &TableSchema, ddl: &TableSchema) -> Vec<String> {
    if !yaml.primary_keys.is_empty() && yaml.primary_keys.iter().all(|c| ddl.has_column(c)) {
        return yaml.primary_keys.clone();
    }

    let names: Vec<String> = ddl.columns.iter().map(|c| c.name.clone()).collect();
    suggest_reference_column(table, &names)
        .map(|column| vec![column.to_string()])
        .unwrap_or_default()
}
