//! Checker trait and shared source loading

use std::path::PathBuf;

use tableaudit_core::{ArtifactKind, CheckName, CheckResult, Config, PathsConfig, SourceIssue, TableSchema};
use tableaudit_parsers::{Artifact, SchemaRegistry, YamlDetail};

/// Everything a checker may read during one run
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub registry: &'a SchemaRegistry,
    pub config: &'a Config,
}

impl<'a> CheckContext<'a> {
    pub fn new(registry: &'a SchemaRegistry, config: &'a Config) -> Self {
        Self { registry, config }
    }
}

/// One independent consistency check
///
/// A checker never mutates the registry. A failing artifact for one table
/// produces one result for that table and the checker moves on.
pub trait Checker {
    fn name(&self) -> CheckName;

    /// Results for every table, in table order
    fn check(&self, ctx: &CheckContext<'_>, tables: &[String]) -> Vec<CheckResult>;
}

/// Both definitions of a table, loaded
pub(crate) struct SourcePair<'a> {
    pub ddl: &'a TableSchema,
    pub ddl_path: PathBuf,
    pub yaml: &'a YamlDetail,
    pub yaml_path: PathBuf,
}

/// Load DDL and YAML for a table, or the single result describing why not.
///
/// Missing DDL is an ERROR, missing YAML a WARNING, any parse failure an
/// ERROR.
pub(crate) fn load_pair<'a>(
    ctx: &CheckContext<'a>,
    check: CheckName,
    table: &str,
) -> Result<SourcePair<'a>, CheckResult> {
    let (ddl, ddl_path) = match ctx.registry.ddl(table) {
        Artifact::Loaded { path, value } => (value, path),
        Artifact::Missing { expected } => return Err(missing_source(check, table, ArtifactKind::Ddl, expected)),
        Artifact::Failed { path, reason } => {
            return Err(failed_source(check, table, ArtifactKind::Ddl, path, reason));
        }
    };

    let (yaml, yaml_path) = load_yaml(ctx, check, table)?;

    Ok(SourcePair {
        ddl,
        ddl_path,
        yaml,
        yaml_path,
    })
}

/// Load only the YAML detail for a table
pub(crate) fn load_yaml<'a>(
    ctx: &CheckContext<'a>,
    check: CheckName,
    table: &str,
) -> Result<(&'a YamlDetail, PathBuf), CheckResult> {
    match ctx.registry.yaml(table) {
        Artifact::Loaded { path, value } => Ok((value, path)),
        Artifact::Missing { expected } => Err(missing_source(check, table, ArtifactKind::Yaml, expected)),
        Artifact::Failed { path, reason } => Err(failed_source(check, table, ArtifactKind::Yaml, path, reason)),
    }
}

fn missing_source(check: CheckName, table: &str, artifact: ArtifactKind, expected: PathBuf) -> CheckResult {
    let file = file_name(&expected);
    let result = match artifact {
        ArtifactKind::Ddl => CheckResult::error(check, table, format!("DDL file does not exist: {file}")),
        _ => CheckResult::warning(check, table, format!("{artifact} file does not exist: {file}")),
    };
    result
        .with_detail(SourceIssue::Missing {
            artifact,
            expected_file: file,
        })
        .with_file(expected)
}

fn failed_source(check: CheckName, table: &str, artifact: ArtifactKind, path: PathBuf, reason: String) -> CheckResult {
    CheckResult::error(
        check,
        table,
        format!("Failed to parse {artifact} file {}: {reason}", file_name(&path)),
    )
    .with_detail(SourceIssue::ParseFailed { artifact, reason })
    .with_file(path)
}

/// Last path component as text, e.g. `MST_Foo.sql`
pub(crate) fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Expected DDL file name for a table
pub(crate) fn ddl_file_name(table: &str) -> String {
    PathsConfig::ddl_file_name(table)
}

/// Expected YAML file name for a table
pub(crate) fn yaml_file_name(table: &str) -> String {
    PathsConfig::yaml_file_name(table)
}
