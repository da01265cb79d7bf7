//! Multitenant compliance: tenant column, tenant index, tenant-safe foreign keys

use std::collections::HashSet;

use tableaudit_core::{ArtifactKind, CheckName, CheckResult, ConstraintKind, MultitenantIssue, TableSchema};

use crate::checker::{load_pair, CheckContext, Checker};

pub struct MultitenantComplianceChecker;

impl Checker for MultitenantComplianceChecker {
    fn name(&self) -> CheckName {
        CheckName::MultitenantCompliance
    }

    fn check(&self, ctx: &CheckContext<'_>, tables: &[String]) -> Vec<CheckResult> {
        let check = self.name();
        let settings = &ctx.config.multitenant;
        let tenant = settings.tenant_column.as_str();
        let mut results = Vec::new();

        for table in tables {
            if let Some(prefix) = settings.exempt_prefix(table) {
                results.push(CheckResult::success(
                    check,
                    table,
                    format!("Exempt from multitenant checks (prefix {prefix})"),
                ));
                continue;
            }

            let pair = match load_pair(ctx, check, table) {
                Ok(pair) => pair,
                Err(result) => {
                    results.push(result);
                    continue;
                }
            };

            let before = results.len();

            for (artifact, schema, path) in [
                (ArtifactKind::Ddl, pair.ddl, &pair.ddl_path),
                (ArtifactKind::Yaml, &pair.yaml.schema, &pair.yaml_path),
            ] {
                match schema.column(tenant) {
                    None => results.push(
                        CheckResult::error(check, table, format!("{artifact} is missing tenant column '{tenant}'"))
                            .with_detail(MultitenantIssue::TenantColumnMissing {
                                artifact,
                                column: tenant.to_string(),
                            })
                            .with_file(path),
                    ),
                    Some(column) if column.nullable => results.push(
                        CheckResult::warning(check, table, format!("{artifact} tenant column '{tenant}' is nullable"))
                            .with_detail(MultitenantIssue::TenantColumnNullable {
                                artifact,
                                column: tenant.to_string(),
                            })
                            .with_file(path),
                    ),
                    Some(_) => {}
                }
            }

            if pair.ddl.has_column(tenant) && !tenant_indexed(pair.ddl, tenant) {
                results.push(
                    CheckResult::warning(
                        check,
                        table,
                        format!("No DDL index or primary key includes tenant column '{tenant}'"),
                    )
                    .with_detail(MultitenantIssue::TenantIndexMissing {
                        column: tenant.to_string(),
                    })
                    .with_file(&pair.ddl_path),
                );
            }

            let mut seen = HashSet::new();
            for fk in pair.ddl.foreign_keys.iter().chain(&pair.yaml.schema.foreign_keys) {
                if !seen.insert(fk.name.as_str()) {
                    continue;
                }
                // FKs into exempt tables such as the tenant table itself
                if settings.exempt_prefix(&fk.reference_table).is_some() {
                    continue;
                }
                let leaks = fk.columns.iter().any(|c| c == tenant) && !fk.reference_columns.iter().any(|c| c == tenant);
                if leaks {
                    results.push(
                        CheckResult::error(
                            check,
                            table,
                            format!(
                                "Foreign key '{}' carries '{tenant}' but does not reference '{}.{tenant}'",
                                fk.name, fk.reference_table
                            ),
                        )
                        .with_detail(MultitenantIssue::CrossTenantForeignKey {
                            foreign_key: fk.name.clone(),
                            reference_table: fk.reference_table.clone(),
                            column: tenant.to_string(),
                        })
                        .with_file(&pair.ddl_path),
                    );
                }
            }

            if results.len() == before {
                results.push(
                    CheckResult::success(check, table, format!("Tenant column '{tenant}' is present and indexed"))
                        .with_file(&pair.ddl_path),
                );
            }
        }

        results
    }
}

/// An index, unique constraint or primary key includes the tenant column
fn tenant_indexed(schema: &TableSchema, tenant: &str) -> bool {
    schema.primary_keys.iter().any(|c| c == tenant)
        || schema.indexes.iter().any(|i| i.covers(tenant))
        || schema.constraints.iter().any(|c| match &c.kind {
            ConstraintKind::Unique { columns } => columns.iter().any(|col| col == tenant),
            ConstraintKind::Check { .. } => false,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{config, tables, RegistryFixture};
    use tableaudit_core::{Issue, Severity};

    fn run(table: &str, yaml: &str, ddl: &str) -> Vec<CheckResult> {
        let registry = RegistryFixture::new().listed(table).yaml(table, yaml).ddl(table, ddl).build();
        let config = config();
        MultitenantComplianceChecker.check(&CheckContext::new(&registry, &config), &tables(&[table]))
    }

    const YAML: &str = "table_name: TRN_Order\ncolumns:\n  - name: id\n    type: INT\n  - name: tenant_id\n    type: VARCHAR(50)\n    nullable: false\n";

    #[test]
    fn compliant_table() {
        let results = run(
            "TRN_Order",
            YAML,
            "CREATE TABLE TRN_Order (id INT, tenant_id VARCHAR(50) NOT NULL, PRIMARY KEY (tenant_id, id));",
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity, Severity::Success);
    }

    #[test]
    fn exempt_prefix_skips_checks() {
        let results = run("SYS_Config", "not: valid", "CREATE TABLE SYS_Config (k INT);");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity, Severity::Success);
        assert!(results[0].message.contains("SYS_"));
    }

    #[test]
    fn tenant_named_business_table_is_checked() {
        let results = run(
            "MST_TenantSettings",
            "table_name: MST_TenantSettings\ncolumns:\n  - name: id\n    type: INT\n",
            "CREATE TABLE MST_TenantSettings (id INT PRIMARY KEY);",
        );
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.severity == Severity::Error));
        assert!(matches!(
            &results[0].detail,
            Issue::Multitenant(MultitenantIssue::TenantColumnMissing { .. })
        ));

        let exempt = run("MST_Tenant", "not: valid", "CREATE TABLE MST_Tenant (id INT);");
        assert_eq!(exempt.len(), 1);
        assert_eq!(exempt[0].severity, Severity::Success);
    }

    #[test]
    fn missing_tenant_column_in_ddl() {
        let results = run("TRN_Order", YAML, "CREATE TABLE TRN_Order (id INT PRIMARY KEY);");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity, Severity::Error);
        assert!(matches!(
            &results[0].detail,
            Issue::Multitenant(MultitenantIssue::TenantColumnMissing { artifact: ArtifactKind::Ddl, .. })
        ));
    }

    #[test]
    fn nullable_and_unindexed_tenant_column() {
        let results = run(
            "TRN_Order",
            YAML,
            "CREATE TABLE TRN_Order (id INT PRIMARY KEY, tenant_id VARCHAR(50));",
        );
        let severities: Vec<Severity> = results.iter().map(|r| r.severity).collect();
        assert_eq!(severities, vec![Severity::Warning, Severity::Warning]);
        assert!(results[0].message.starts_with("DDL"));
    }

    #[test]
    fn cross_tenant_foreign_key() {
        let results = run(
            "TRN_Order",
            YAML,
            "CREATE TABLE TRN_Order (id INT, tenant_id VARCHAR(50) NOT NULL, PRIMARY KEY (tenant_id, id), \
             CONSTRAINT fk_leak FOREIGN KEY (tenant_id, id) REFERENCES TRN_Other (id, code), \
             CONSTRAINT fk_tenant FOREIGN KEY (tenant_id) REFERENCES MST_Tenant (id));",
        );
        assert_eq!(results.len(), 1);
        assert!(matches!(
            &results[0].detail,
            Issue::Multitenant(MultitenantIssue::CrossTenantForeignKey { foreign_key, .. }) if foreign_key == "fk_leak"
        ));
    }
}
