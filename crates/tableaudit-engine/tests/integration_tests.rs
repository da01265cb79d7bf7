//! End-to-end runs of the orchestrator over on-disk artifact trees

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tableaudit_core::{
    CheckName, CheckResult, Config, DataTypeIssue, FixType, Issue, MultitenantIssue, Severity,
};
use tableaudit_engine::{CheckOrchestrator, CheckSelection, ConfigurationError, RunOutcome};
use tempfile::TempDir;

const TABLE_LIST: &str = "# テーブル一覧\n\n\
| テーブルID | カテゴリ | テーブル名 | 論理名 |\n\
|---|---|---|---|\n\
| TBL-001 | マスタ | MST_Item | 商品 |\n\
| TBL-002 | トランザクション | TRN_Order | 注文 |\n\
| TBL-003 | マスタ | MST_Status | ステータス |\n\
\n# 備考\n";

const ITEM_YAML: &str = r#"table_name: MST_Item
columns:
  - name: id
    type: INT
    nullable: false
    primary_key: true
  - name: code
    type: VARCHAR(20)
    nullable: false
  - name: price
    type: DECIMAL(10,2)
  - name: kind
    type: "ENUM('a','b')"
    nullable: false
  - name: note
    type: VARCHAR(10)
    nullable: false
    default: ''
  - name: amount
    type: DECIMAL(10,2)
    default: 0.00
  - name: created_at
    type: TIMESTAMP WITH TIME ZONE
    nullable: false
  - name: tags
    type: "SET('x','y')"
"#;

const ITEM_DDL: &str = "CREATE TABLE MST_Item (\n\
    id INTEGER NOT NULL,\n\
    code VARCHAR(20) NOT NULL,\n\
    price DECIMAL(10,2),\n\
    kind ENUM('b','a') NOT NULL,\n\
    note VARCHAR(10) NOT NULL DEFAULT '',\n\
    amount DECIMAL(10,2) DEFAULT 0.00,\n\
    created_at TIMESTAMP WITH TIME ZONE NOT NULL,\n\
    tags SET('y','x'),\n\
    PRIMARY KEY (id)\n\
);";

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let project = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        let paths = project.config().paths;
        fs::create_dir_all(&paths.yaml_dir).unwrap();
        fs::create_dir_all(&paths.ddl_dir).unwrap();
        project.write(&paths.table_list, TABLE_LIST);
        project
    }

    fn config(&self) -> Config {
        let mut config = Config::default();
        config.paths.resolve_against(self.dir.path());
        config
    }

    fn write(&self, path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    fn yaml(self, table: &str, contents: &str) -> Self {
        self.write(&self.config().paths.yaml_file(table), contents);
        self
    }

    fn ddl(self, table: &str, contents: &str) -> Self {
        self.write(&self.config().paths.ddl_file(table), contents);
        self
    }

    fn run(&self, selection: CheckSelection, tables: &[&str]) -> RunOutcome {
        self.run_with(self.config(), selection, tables)
    }

    fn run_with(&self, config: Config, selection: CheckSelection, tables: &[&str]) -> RunOutcome {
        let tables: Vec<String> = tables.iter().map(|t| t.to_string()).collect();
        CheckOrchestrator::new(config).with_selection(selection).run(&tables)
    }
}

fn of_check(results: &[CheckResult], check: CheckName) -> Vec<&CheckResult> {
    results.iter().filter(|r| r.check_name == check).collect()
}

#[test]
fn identical_table_has_no_false_positives() {
    let project = Project::new().yaml("MST_Item", ITEM_YAML).ddl("MST_Item", ITEM_DDL);
    let selection = CheckSelection::parse(
        "table_existence,column_consistency,data_type_consistency,foreign_key_consistency,constraint_consistency",
    )
    .unwrap();

    let outcome = project.run(selection, &["MST_Item"]);
    let report = outcome.report();

    assert_eq!(report.results().len(), 5);
    for result in report.results() {
        assert_eq!(result.severity, Severity::Success, "{}: {}", result.check_name, result.message);
    }
    assert_eq!(outcome.exit_code(), 0);
}

#[test]
fn yaml_only_table_reports_missing_ddl() {
    let project = Project::new().yaml("MST_Foo", "table_name: MST_Foo\ncolumns:\n  - name: id\n    type: INT\n");
    let selection = CheckSelection::parse(
        "table_existence,column_consistency,data_type_consistency,constraint_consistency",
    )
    .unwrap();

    let outcome = project.run(selection, &["MST_Foo"]);
    let results = outcome.report().results();

    let existence = of_check(results, CheckName::TableExistence);
    assert_eq!(existence.len(), 1);
    assert_eq!(existence[0].severity, Severity::Error);
    assert!(existence[0].message.contains("MST_Foo.sql"));

    for check in [
        CheckName::ColumnConsistency,
        CheckName::DataTypeConsistency,
        CheckName::ConstraintConsistency,
    ] {
        let results = of_check(results, check);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity, Severity::Error);
        assert!(results[0].message.starts_with("DDL file does not exist"));
    }
    assert_eq!(outcome.exit_code(), 1);
}

#[test]
fn enum_against_varchar_is_incompatible() {
    let project = Project::new()
        .yaml(
            "MST_Status",
            "table_name: MST_Status\ncolumns:\n  - name: status\n    type: \"ENUM('A','B')\"\n",
        )
        .ddl("MST_Status", "CREATE TABLE MST_Status (status VARCHAR(1));");

    let outcome = project.run(CheckSelection::parse("data_type_consistency").unwrap(), &["MST_Status"]);
    let results = outcome.report().results();

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
            assert_eq!(compatibility.to_string(), "incompatible");
        }
        other => panic!("unexpected detail {other:?}"),
    }
}

#[test]
fn nullable_tenant_column_in_ddl_is_a_warning() {
    let project = Project::new()
        .yaml(
            "TRN_Order",
            "table_name: TRN_Order\ncolumns:\n  - name: id\n    type: INT\n    nullable: false\n    primary_key: true\n  - name: tenant_id\n    type: VARCHAR(50)\n    nullable: false\n",
        )
        .ddl(
            "TRN_Order",
            "CREATE TABLE TRN_Order (id INT NOT NULL PRIMARY KEY, tenant_id VARCHAR(50));\nCREATE INDEX idx_trn_order_tenant_id ON TRN_Order (tenant_id);",
        );

    let outcome = project.run(CheckSelection::parse("multitenant_compliance").unwrap(), &["TRN_Order"]);
    let results = outcome.report().results();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].severity, Severity::Warning);
    assert!(results[0].message.starts_with("DDL"));
    assert!(matches!(
        &results[0].detail,
        Issue::Multitenant(MultitenantIssue::TenantColumnNullable { .. })
    ));
    assert_eq!(outcome.exit_code(), 0);
}

#[test]
fn only_selected_checks_run() {
    let project = Project::new().yaml("MST_Item", ITEM_YAML);
    let selection = CheckSelection::parse("data_type_consistency,table_existence").unwrap();

    let outcome = project.run(selection, &[]);
    let report = outcome.report();

    assert_eq!(
        report.checks_run(),
        &[CheckName::TableExistence, CheckName::DataTypeConsistency]
    );
    assert!(report
        .results()
        .iter()
        .all(|r| matches!(r.check_name, CheckName::TableExistence | CheckName::DataTypeConsistency)));
    assert!(report.fix_suggestions().is_empty());
}

#[test]
fn all_known_tables_when_none_requested() {
    let project = Project::new()
        .yaml("MST_Item", ITEM_YAML)
        .ddl("MST_Item", ITEM_DDL)
        .ddl("WRK_Import", "CREATE TABLE WRK_Import (id INT);");

    let mut config = project.config();
    config.allowlist.skip_tables = vec!["WRK_*".to_string()];

    let outcome = project.run_with(config, CheckSelection::parse("table_existence").unwrap(), &[]);

    assert_eq!(outcome.report().tables(), &["MST_Item", "MST_Status", "TRN_Order"]);
}

#[test]
fn fix_suggestions_are_reported() {
    let project = Project::new()
        .yaml(
            "MST_Status",
            "table_name: MST_Status\ncolumns:\n  - name: status\n    type: \"ENUM('A','B')\"\n  - name: label\n    type: VARCHAR(40)\n",
        )
        .ddl("MST_Status", "CREATE TABLE MST_Status (status VARCHAR(1));");
    let selection = CheckSelection::parse("column_consistency,data_type_consistency")
        .unwrap()
        .with_suggest_fixes(true);

    let outcome = project.run(selection, &["MST_Status"]);
    let report = outcome.report();

    assert_eq!(report.checks_run().last(), Some(&CheckName::FixSuggestions));
    let fixes = report.fix_suggestions();
    assert_eq!(fixes.len(), 2);
    assert!(fixes.iter().all(|f| f.fix_type == FixType::Ddl && f.critical));
    assert!(fixes
        .iter()
        .any(|f| f.fix_content == "ALTER TABLE MST_Status MODIFY COLUMN status ENUM('A','B');"));

    let entries = of_check(report.results(), CheckName::FixSuggestions);
    assert_eq!(entries.len(), fixes.len());
    assert!(entries.iter().all(|r| r.severity == Severity::Info));
}

#[test]
fn severity_overrides_apply_to_problems() {
    let project = Project::new().yaml("MST_Item", ITEM_YAML).ddl("MST_Item", ITEM_DDL);
    let mut config = project.config();
    config
        .severity
        .set_override(CheckName::RequirementTraceability, Severity::Info);

    let outcome = project.run_with(config, CheckSelection::parse("requirement_traceability").unwrap(), &["MST_Item"]);
    let results = outcome.report().results();

    assert_eq!(results.len(), 8);
    assert!(results.iter().all(|r| r.severity == Severity::Info));
}

#[test]
fn missing_ddl_directory_aborts() {
    let project = Project::new();
    fs::remove_dir_all(project.config().paths.ddl_dir).unwrap();

    let outcome = project.run(CheckSelection::all(), &[]);

    match &outcome {
        RunOutcome::PathInvalid { error, report } => {
            assert!(matches!(error, ConfigurationError::DdlDirMissing(_)));
            assert!(report.results().is_empty());
            assert!(report.checks_run().is_empty());
        }
        RunOutcome::Completed(_) => panic!("run should not complete"),
    }
    assert_eq!(outcome.exit_code(), 1);
}
