//! Primary keys and CHECK/UNIQUE constraints: YAML vs DDL

use std::collections::BTreeSet;

use tableaudit_core::{CheckName, CheckResult, ConstraintDefinition, ConstraintIssue, ConstraintKind, TableSchema};

use crate::checker::{load_pair, CheckContext, Checker};

pub struct ConstraintConsistencyChecker;

impl Checker for ConstraintConsistencyChecker {
    fn name(&self) -> CheckName {
        CheckName::ConstraintConsistency
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
            let yaml = &pair.yaml.schema;

            let ddl_pk = ddl.primary_key_set();
            let yaml_pk = yaml.primary_key_set();
            if ddl_pk != yaml_pk {
                let ddl_columns: Vec<String> = ddl_pk.iter().map(|c| c.to_string()).collect();
                let yaml_columns: Vec<String> = yaml_pk.iter().map(|c| c.to_string()).collect();
                results.push(
                    CheckResult::error(
                        check,
                        table,
                        format!(
                            "Primary key differs: YAML ({}), DDL ({})",
                            yaml_columns.join(", "),
                            ddl_columns.join(", ")
                        ),
                    )
                    .with_detail(ConstraintIssue::PrimaryKeyMismatch {
                        ddl_columns,
                        yaml_columns,
                    })
                    .with_file(&pair.ddl_path),
                );
            }

            for constraint in &yaml.constraints {
                if has_counterpart(ddl, constraint) {
                    continue;
                }
                results.push(
                    CheckResult::error(
                        check,
                        table,
                        format!(
                            "{} constraint '{}' is defined in YAML but missing from DDL",
                            constraint.kind_str(),
                            constraint.name
                        ),
                    )
                    .with_detail(ConstraintIssue::MissingInDdl {
                        constraint: constraint.clone(),
                    })
                    .with_file(&pair.ddl_path),
                );
            }

            if results.len() == before {
                results.push(
                    CheckResult::success(
                        check,
                        table,
                        format!("Primary key and {} constraints are consistent", yaml.constraints.len()),
                    )
                    .with_file(&pair.ddl_path),
                );
            }
        }

        results
    }
}

fn has_counterpart(ddl: &TableSchema, constraint: &ConstraintDefinition) -> bool {
    match &constraint.kind {
        ConstraintKind::Check { condition } => {
            let wanted = normalize_condition(condition);
            ddl.constraints.iter().any(|c| match &c.kind {
                ConstraintKind::Check { condition } => {
                    c.name.eq_ignore_ascii_case(&constraint.name) || normalize_condition(condition) == wanted
                }
                ConstraintKind::Unique { .. } => false,
            })
        }
        ConstraintKind::Unique { columns } => {
            let wanted: BTreeSet<&str> = columns.iter().map(String::as_str).collect();

            let in_constraints = ddl.constraints.iter().any(|c| match &c.kind {
                ConstraintKind::Unique { columns } => columns.iter().map(String::as_str).collect::<BTreeSet<_>>() == wanted,
                ConstraintKind::Check { .. } => false,
            });
            let in_indexes = ddl.indexes.iter().any(|i| i.unique && i.column_set() == wanted);
            let single_column = wanted.len() == 1
                && wanted
                    .iter()
                    .next()
                    .and_then(|name| ddl.column(name))
                    .map_or(false, |col| col.unique);

            in_constraints || in_indexes || single_column
        }
    }
}

/// Case- and whitespace-insensitive form of a CHECK condition
fn normalize_condition(condition: &str) -> String {
    let compact: String = condition
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    strip_outer_parens(&compact).to_string()
}

fn strip_outer_parens(mut text: &str) -> &str {
    while text.starts_with('(') && text.ends_with(')') && encloses_all(text) {
        text = &text[1..text.len() - 1];
    }
    text
}

/// Whether the opening parenthesis at 0 closes at the last character
fn encloses_all(text: &str) -> bool {
    let mut depth = 0usize;
    for (idx, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return idx == text.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}
