//! Requirement identifiers on YAML columns

use tableaudit_core::{CheckName, CheckResult, TraceabilityIssue};
use tableaudit_parsers::regex;

use crate::checker::{load_yaml, CheckContext, Checker};

/// `PRO.1-BASE.1`: three-letter area, number, dash, feature code, number
pub fn is_valid_requirement_id(value: &str) -> bool {
    regex!(r"^[A-Z]{3}\.\d+-[A-Z]+\.\d+$").is_match(value.trim())
}

pub struct RequirementTraceabilityChecker;

impl Checker for RequirementTraceabilityChecker {
    fn name(&self) -> CheckName {
        CheckName::RequirementTraceability
    }

    /// Never produces ERROR for a loaded file
    fn check(&self, ctx: &CheckContext<'_>, tables: &[String]) -> Vec<CheckResult> {
        let check = self.name();
        let mut results = Vec::new();

        for table in tables {
            let (detail, path) = match load_yaml(ctx, check, table) {
                Ok(loaded) => loaded,
                Err(result) => {
                    results.push(result);
                    continue;
                }
            };

            let before = results.len();

            for column in &detail.schema.columns {
                let result = match column.requirement_id.as_deref().map(str::trim) {
                    None | Some("") => CheckResult::warning(
                        check,
                        table,
                        format!("Column '{}' has no requirement_id", column.name),
                    )
                    .with_detail(TraceabilityIssue::RequirementIdMissing {
                        column: column.name.clone(),
                    }),
                    Some(value) if !is_valid_requirement_id(value) => CheckResult::warning(
                        check,
                        table,
                        format!("Column '{}' has malformed requirement_id '{value}'", column.name),
                    )
                    .with_detail(TraceabilityIssue::RequirementIdMalformed {
                        column: column.name.clone(),
                        value: value.to_string(),
                    }),
                    Some(_) => continue,
                };
                results.push(result.with_file(&path));
            }

            if results.len() == before {
                results.push(
                    CheckResult::success(
                        check,
                        table,
                        format!("All {} columns carry a requirement_id", detail.schema.columns.len()),
                    )
                    .with_file(&path),
                );
            }
        }

        results
    }
}
