//! Required documentation sections of YAML detail files

use tableaudit_core::{CheckName, CheckResult, TableCategory, YamlFormatIssue};
use tableaudit_parsers::YamlMetadata;

use crate::checker::{load_yaml, CheckContext, Checker};

const MIN_REVISIONS: usize = 1;
const MIN_OVERVIEW_CHARS: usize = 50;
const MIN_NOTES: usize = 3;
const MIN_BUSINESS_RULES: usize = 3;

pub struct YamlFormatChecker;

impl Checker for YamlFormatChecker {
    fn name(&self) -> CheckName {
        CheckName::YamlFormat
    }

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

            let category = detail
                .schema
                .category
                .or_else(|| TableCategory::from_table_name(table));

            let mut issues = section_issues(&detail.meta);
            if category == Some(TableCategory::Master)
                && detail.meta.sample_data.as_ref().map_or(true, Vec::is_empty)
            {
                issues.push((
                    false,
                    "Master table has no sample_data".to_string(),
                    YamlFormatIssue::SampleDataMissing,
                ));
            }

            if issues.is_empty() {
                results.push(
                    CheckResult::success(check, table, "All required YAML sections are present").with_file(&path),
                );
                continue;
            }

            for (is_error, message, issue) in issues {
                let result = if is_error {
                    CheckResult::error(check, table, message)
                } else {
                    CheckResult::warning(check, table, message)
                };
                results.push(result.with_detail(issue).with_file(&path));
            }
        }

        results
    }
}

/// `(is_error, message, issue)` for each section problem
fn section_issues(meta: &YamlMetadata) -> Vec<(bool, String, YamlFormatIssue)> {
    let mut issues = Vec::new();

    match &meta.revision_history {
        None => issues.push(missing("revision_history")),
        Some(entries) if entries.len() < MIN_REVISIONS => {
            issues.push(insufficient("revision_history", MIN_REVISIONS, entries.len()));
        }
        Some(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                let missing_fields = entry.missing_fields();
                if !missing_fields.is_empty() {
                    issues.push((
                        false,
                        format!(
                            "revision_history[{index}] is missing: {}",
                            missing_fields.join(", ")
                        ),
                        YamlFormatIssue::RevisionEntryIncomplete { index, missing_fields },
                    ));
                }
            }
        }
    }

    match meta.overview.as_deref().map(str::trim) {
        None | Some("") => issues.push(missing("overview")),
        Some(text) => {
            let chars = text.chars().count();
            if chars < MIN_OVERVIEW_CHARS {
                issues.push(insufficient("overview", MIN_OVERVIEW_CHARS, chars));
            }
        }
    }

    for (section, items, required) in [
        ("notes", &meta.notes, MIN_NOTES),
        ("business_rules", &meta.business_rules, MIN_BUSINESS_RULES),
    ] {
        match items {
            None => issues.push(missing(section)),
            Some(items) if items.len() < required => issues.push(insufficient(section, required, items.len())),
            Some(_) => {}
        }
    }

    issues
}

fn missing(section: &str) -> (bool, String, YamlFormatIssue) {
    (
        true,
        format!("Required section '{section}' is missing"),
        YamlFormatIssue::SectionMissing {
            section: section.to_string(),
        },
    )
}

fn insufficient(section: &str, required: usize, actual: usize) -> (bool, String, YamlFormatIssue) {
    (
        false,
        format!("Section '{section}' has {actual}, at least {required} required"),
        YamlFormatIssue::SectionInsufficient {
            section: section.to_string(),
            required,
            actual,
        },
    )
}
