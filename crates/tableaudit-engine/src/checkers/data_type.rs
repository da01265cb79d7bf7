//! Column types: YAML vs DDL through the type-family table

use tableaudit_core::{compare_types, CheckName, CheckResult, Compatibility, DataTypeIssue, TypeComparison};

use crate::checker::{load_pair, CheckContext, Checker};

pub struct DataTypeConsistencyChecker;

impl Checker for DataTypeConsistencyChecker {
    fn name(&self) -> CheckName {
        CheckName::DataTypeConsistency
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
            let mut shared = 0;

            for yaml_col in &pair.yaml.schema.columns {
                let Some(ddl_col) = pair.ddl.column(&yaml_col.name) else {
                    continue;
                };
                shared += 1;

                let yaml_type = yaml_col.type_spec();
                let ddl_type = ddl_col.type_spec();

                let result = match compare_types(&yaml_type, &ddl_type) {
                    TypeComparison::Match => continue,
                    TypeComparison::Compatible => CheckResult::warning(
                        check,
                        table,
                        format!(
                            "Column '{}' size differs: YAML {yaml_type}, DDL {ddl_type}",
                            yaml_col.name
                        ),
                    )
                    .with_detail(type_mismatch(&yaml_col.name, &yaml_type, &ddl_type, Compatibility::Compatible)),
                    TypeComparison::Incompatible => CheckResult::error(
                        check,
                        table,
                        format!(
                            "Column '{}' type mismatch: YAML {}, DDL {}",
                            yaml_col.name, yaml_type.base, ddl_type.base
                        ),
                    )
                    .with_detail(type_mismatch(&yaml_col.name, &yaml_type, &ddl_type, Compatibility::Incompatible)),
                    TypeComparison::EnumMismatch {
                        missing_in_ddl,
                        missing_in_yaml,
                    } => CheckResult::error(
                        check,
                        table,
                        format!(
                            "Column '{}' {} values differ: missing in DDL [{}], missing in YAML [{}]",
                            yaml_col.name,
                            yaml_type.base,
                            missing_in_ddl.join(", "),
                            missing_in_yaml.join(", ")
                        ),
                    )
                    .with_detail(DataTypeIssue::EnumMismatch {
                        column: yaml_col.name.clone(),
                        missing_in_ddl,
                        missing_in_yaml,
                        yaml_definition: yaml_type.to_string(),
                    }),
                };

                results.push(result.with_file(&pair.ddl_path));
            }

            if results.len() == before {
                results.push(
                    CheckResult::success(check, table, format!("Data types of {shared} shared columns match"))
                        .with_file(&pair.ddl_path),
                );
            }
        }

        results
    }
}

fn type_mismatch(
    column: &str,
    yaml: &tableaudit_core::TypeSpec,
    ddl: &tableaudit_core::TypeSpec,
    compatibility: Compatibility,
) -> DataTypeIssue {
    DataTypeIssue::TypeMismatch {
        column: column.to_string(),
        ddl_type: ddl.base.clone(),
        yaml_type: yaml.base.clone(),
        ddl_definition: ddl.to_string(),
        yaml_definition: yaml.to_string(),
        compatibility,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{config, tables, RegistryFixture};
    use pretty_assertions::assert_eq;
    use tableaudit_core::{Issue, Severity};

    fn run(yaml_columns: &str, ddl_body: &str) -> Vec<CheckResult> {
        let yaml = format!("table_name: TRN_Foo\ncolumns:\n{yaml_columns}");
        let ddl = format!("CREATE TABLE TRN_Foo ({ddl_body});");
        let registry = RegistryFixture::new().listed("TRN_Foo").yaml("TRN_Foo", &yaml).ddl("TRN_Foo", &ddl).build();
        let config = config();
        DataTypeConsistencyChecker.check(&CheckContext::new(&registry, &config), &tables(&["TRN_Foo"]))
    }

    #[test]
    fn aliases_match() {
        let results = run(
            "  - name: a\n    type: INTEGER\n  - name: b\n    type: NUMERIC(10,2)\n  - name: c\n    type: DATETIME\n",
            "a INT, b DECIMAL(10,2), c TIMESTAMP",
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity, Severity::Success);
    }

    #[test]
    fn family_mismatch_is_error() {
        let results = run("  - name: status\n    type: ENUM('A','B')\n", "status VARCHAR(1)");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity, Severity::Error);
        match &results[0].detail {
            Issue::DataType(DataTypeIssue::TypeMismatch {
                ddl_type,
                yaml_type,
                compatibility,
                ..
            }) => {
                assert_eq!(ddl_type, "VARCHAR");
                assert_eq!(yaml_type, "ENUM");
                assert_eq!(*compatibility, Compatibility::Incompatible);
            }
            other => panic!("unexpected detail {other:?}"),
        }
    }

    #[test]
    fn length_mismatch_is_warning() {
        let results = run("  - name: name\n    type: VARCHAR(100)\n", "name VARCHAR(50)");
        assert_eq!(results[0].severity, Severity::Warning);
        assert!(matches!(
            &results[0].detail,
            Issue::DataType(DataTypeIssue::TypeMismatch { compatibility: Compatibility::Compatible, .. })
        ));
    }

    #[test]
    fn enum_sets_are_order_independent() {
        let same = run("  - name: s\n    type: ENUM('b','a')\n", "s ENUM('a','b')");
        assert_eq!(same[0].severity, Severity::Success);

        let results = run("  - name: s\n    type: ENUM('a','b')\n", "s ENUM('a','c')");
        assert_eq!(results[0].severity, Severity::Error);
        match &results[0].detail {
            Issue::DataType(DataTypeIssue::EnumMismatch {
                missing_in_ddl,
                missing_in_yaml,
                ..
            }) => {
                assert_eq!(missing_in_ddl, &vec!["b".to_string()]);
                assert_eq!(missing_in_yaml, &vec!["c".to_string()]);
            }
            other => panic!("unexpected detail {other:?}"),
        }
    }

    #[test]
    fn time_zone_types_match_across_sources() {
        let results = run(
            "  - name: created_at\n    type: TIMESTAMP WITH TIME ZONE\n  - name: opened\n    type: time without time zone\n",
            "created_at TIMESTAMP WITH TIME ZONE NOT NULL, opened TIME WITHOUT TIME ZONE",
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity, Severity::Success, "{}", results[0].message);
    }

    #[test]
    fn set_against_enum_is_error() {
        let same = run("  - name: tags\n    type: SET('x','y')\n", "tags SET('y','x')");
        assert_eq!(same[0].severity, Severity::Success);

        let results = run("  - name: tags\n    type: SET('x','y')\n", "tags ENUM('x','y')");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity, Severity::Error);
        assert!(matches!(
            &results[0].detail,
            Issue::DataType(DataTypeIssue::TypeMismatch { compatibility: Compatibility::Incompatible, .. })
        ));
    }
}
