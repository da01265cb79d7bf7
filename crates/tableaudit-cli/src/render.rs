//! Report rendering: console, markdown and JSON

use std::fmt::Write as _;

use colored::{ColoredString, Colorize};
use tableaudit_core::{CheckName, CheckResult, ConsistencyReport, FixSuggestion, Severity};

/// Output format for `tableaudit check`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Console,
    Markdown,
    Json,
}

pub fn render(report: &ConsistencyReport, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Console => console(report),
        OutputFormat::Markdown => markdown(report),
        OutputFormat::Json => report.to_json()?,
    })
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => severity.as_str().red().bold(),
        Severity::Warning => severity.as_str().yellow().bold(),
        Severity::Info => severity.as_str().cyan(),
        Severity::Success => severity.as_str().green(),
    }
}

fn count(label: &str, value: usize, severity: Severity) -> String {
    let value = value.to_string();
    let value = if value == "0" {
        value.green()
    } else {
        match severity {
            Severity::Error => value.red().bold(),
            Severity::Warning => value.yellow(),
            Severity::Info | Severity::Success => value.normal(),
        }
    };
    format!("  {label:<10}{value}\n")
}

/// Every result grouped per table, followed by the fix suggestions
pub fn console(report: &ConsistencyReport) -> String {
    let summary = report.summary();
    let rule = "=".repeat(60);
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", rule.bright_blue());
    let _ = writeln!(out, "{}", "Schema Consistency Report".bold().bright_blue());
    let _ = writeln!(out, "{}\n", rule.bright_blue());

    let _ = writeln!(out, "Timestamp: {}", report.timestamp());
    let _ = writeln!(out, "Tables:    {}", summary.tables_checked);
    let checks: Vec<&str> = report.checks_run().iter().map(CheckName::as_str).collect();
    let _ = writeln!(out, "Checks:    {}\n", checks.join(", "));

    let _ = writeln!(out, "{}", "Summary:".bold());
    out.push_str(&count("Errors:", summary.errors, Severity::Error));
    out.push_str(&count("Warnings:", summary.warnings, Severity::Warning));
    out.push_str(&count("Info:", summary.info, Severity::Info));
    out.push_str(&count("Success:", summary.success, Severity::Success));
    out.push('\n');

    for table in report.tables() {
        let results: Vec<&CheckResult> = report
            .results_for_table(table)
            .filter(|r| r.check_name != CheckName::FixSuggestions)
            .collect();
        if results.is_empty() {
            continue;
        }

        let _ = writeln!(out, "{}", table.bold());
        for result in results {
            let _ = writeln!(
                out,
                "  {} [{}] {}: {}",
                result.severity.icon(),
                severity_label(result.severity),
                result.check_name,
                result.message
            );
            if result.is_problem() {
                if let Some(path) = &result.file_path {
                    let _ = writeln!(out, "      at {}", path.display());
                }
            }
        }
        out.push('\n');
    }

    if !report.fix_suggestions().is_empty() {
        let _ = writeln!(out, "{}", "Fix suggestions:".bold());
        for fix in report.fix_suggestions() {
            let marker = if fix.critical { "!".red().bold() } else { " ".normal() };
            let _ = writeln!(out, " {marker} [{}] {}: {}", fix.fix_type, fix.table_name, fix.description);
            for line in fix.fix_content.lines() {
                let _ = writeln!(out, "      {}", line.dimmed());
            }
        }
        out.push('\n');
    }

    if report.has_errors() {
        let _ = writeln!(out, "{}", "✗ Consistency errors found".red().bold());
    } else {
        let _ = writeln!(out, "{}", "✓ No consistency errors".green().bold());
    }
    let _ = writeln!(out, "{}", rule.bright_blue());

    out
}

/// Summary, a table-by-table breakdown and the fix suggestions
pub fn markdown(report: &ConsistencyReport) -> String {
    let summary = report.summary();
    let mut md = String::new();

    md.push_str("# Schema Consistency Report\n\n");
    let _ = writeln!(md, "**Version:** {}\n", report.version());
    let _ = writeln!(md, "**Timestamp:** {}\n", report.timestamp());

    md.push_str("## Summary\n\n");
    md.push_str("| Severity | Count |\n|---|---|\n");
    for (severity, value) in [
        (Severity::Error, summary.errors),
        (Severity::Warning, summary.warnings),
        (Severity::Info, summary.info),
        (Severity::Success, summary.success),
    ] {
        let _ = writeln!(md, "| {} {} | {} |", severity.icon(), severity, value);
    }
    let _ = writeln!(md, "\nTables checked: {}\n", summary.tables_checked);

    md.push_str("## Tables\n\n");
    for table in report.tables() {
        let results: Vec<&CheckResult> = report
            .results_for_table(table)
            .filter(|r| r.check_name != CheckName::FixSuggestions)
            .collect();
        if results.is_empty() {
            continue;
        }

        let _ = writeln!(md, "### {}\n", table);
        md.push_str("| | Check | Message |\n|---|---|---|\n");
        for result in results {
            let _ = writeln!(
                md,
                "| {} | {} | {} |",
                result.severity.icon(),
                result.check_name,
                escape_cell(&result.message)
            );
        }
        md.push('\n');
    }

    if !report.fix_suggestions().is_empty() {
        md.push_str("## Fix Suggestions\n\n");
        for fix in report.fix_suggestions() {
            push_fix(&mut md, fix);
        }
    }

    if !report.has_errors() {
        md.push_str("✅ **No consistency errors found!**\n");
    }

    md
}

fn push_fix(md: &mut String, fix: &FixSuggestion) {
    let critical = if fix.critical { " (critical)" } else { "" };
    let _ = writeln!(md, "### [{}] {}: {}{}\n", fix.fix_type, fix.table_name, fix.description, critical);
    if let Some(path) = &fix.file_path {
        let _ = writeln!(md, "**File:** `{}`\n", path.display());
    }
    if fix.backup_required {
        md.push_str("Back up the file before applying.\n\n");
    }
    let lang = match fix.fix_type {
        tableaudit_core::FixType::Yaml => "yaml",
        _ => "sql",
    };
    let _ = writeln!(md, "```{lang}\n{}\n```\n", fix.fix_content.trim_end());
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
