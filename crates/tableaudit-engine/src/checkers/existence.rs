//! Table existence across the three artifact families

use tableaudit_core::{CheckName, CheckResult, ExistenceIssue, PresenceVector};

use crate::checker::{ddl_file_name, file_name, yaml_file_name, CheckContext, Checker};

pub struct TableExistenceChecker;

impl Checker for TableExistenceChecker {
    fn name(&self) -> CheckName {
        CheckName::TableExistence
    }

    fn check(&self, ctx: &CheckContext<'_>, tables: &[String]) -> Vec<CheckResult> {
        tables.iter().map(|table| check_table(ctx, table)).collect()
    }
}

/// Exactly one result per table
fn check_table(ctx: &CheckContext<'_>, table: &str) -> CheckResult {
    let check = CheckName::TableExistence;
    let yaml = ctx.registry.yaml(table);
    let ddl = ctx.registry.ddl(table);

    let presence = PresenceVector {
        in_table_list: ctx.registry.in_table_list(table),
        in_yaml: yaml.exists(),
        in_ddl: ddl.exists(),
    };

    if presence.all_present() {
        return CheckResult::success(check, table, "Present in table list, YAML and DDL")
            .with_detail(ExistenceIssue::AllPresent { presence });
    }

    let mut missing_files = Vec::new();
    if !presence.in_table_list {
        missing_files.push(format!("{} entry", file_name(&ctx.registry.paths().table_list)));
    }
    if !presence.in_ddl {
        missing_files.push(ddl_file_name(table));
    }
    if !presence.in_yaml {
        missing_files.push(yaml_file_name(table));
    }

    let file = if presence.in_ddl { yaml.path().to_path_buf() } else { ddl.path().to_path_buf() };

    if !presence.in_table_list && (presence.in_yaml || presence.in_ddl) {
        let mut orphan_files = Vec::new();
        if presence.in_ddl {
            orphan_files.push(ddl_file_name(table));
        }
        if presence.in_yaml {
            orphan_files.push(yaml_file_name(table));
        }

        let message = format!(
            "Not registered in the table list; orphaned files: {}; missing: {}",
            orphan_files.join(", "),
            missing_files.join(", ")
        );
        return CheckResult::error(check, table, message)
            .with_detail(ExistenceIssue::Orphaned {
                presence,
                orphan_files,
                missing_files,
            })
            .with_file(file);
    }

    let message = format!("Missing: {}", missing_files.join(", "));
    let result = if !presence.in_table_list || !presence.in_ddl {
        CheckResult::error(check, table, message)
    } else {
        CheckResult::warning(check, table, message)
    };

    result
        .with_detail(ExistenceIssue::Missing {
            presence,
            missing_files,
        })
        .with_file(file)
}
