//! Per-run schema registry
//!
//! Every artifact is read and parsed exactly once when the registry is
//! loaded. Checkers borrow the registry immutably; nothing is cached across
//! runs. A corrupt artifact becomes [`Artifact::Failed`] and is logged
//! instead of aborting the load.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tableaudit_core::{PathsConfig, TableSchema};
use walkdir::WalkDir;

use crate::ddl::DdlParser;
use crate::error::ParseError;
use crate::table_list::{TableListEntry, TableListParser};
use crate::yaml::{YamlDetail, YamlParser};

/// Load state of one artifact file
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact<T> {
    /// No file at the expected location
    Missing { expected: PathBuf },

    /// The file exists but could not be parsed
    Failed { path: PathBuf, reason: String },

    Loaded { path: PathBuf, value: T },
}

impl<T> Artifact<T> {
    fn from_result(path: PathBuf, result: Result<T, ParseError>) -> Self {
        match result {
            Ok(value) => Artifact::Loaded { path, value },
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to parse artifact");
                Artifact::Failed {
                    path,
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn as_ref(&self) -> Artifact<&T> {
        match self {
            Artifact::Missing { expected } => Artifact::Missing {
                expected: expected.clone(),
            },
            Artifact::Failed { path, reason } => Artifact::Failed {
                path: path.clone(),
                reason: reason.clone(),
            },
            Artifact::Loaded { path, value } => Artifact::Loaded {
                path: path.clone(),
                value,
            },
        }
    }

    /// The parsed value, if loading succeeded
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Artifact::Loaded { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Whether a file exists on disk, parsed or not
    pub fn exists(&self) -> bool {
        !matches!(self, Artifact::Missing { .. })
    }

    /// The actual or expected file location
    pub fn path(&self) -> &Path {
        match self {
            Artifact::Missing { expected } => expected,
            Artifact::Failed { path, .. } | Artifact::Loaded { path, .. } => path,
        }
    }
}

/// All artifacts for one run, keyed by table name
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    paths: PathsConfig,
    table_list: Artifact<Vec<TableListEntry>>,
    yaml: BTreeMap<String, Artifact<YamlDetail>>,
    ddl: BTreeMap<String, Artifact<TableSchema>>,
}

impl SchemaRegistry {
    /// A registry with no artifacts loaded
    pub fn empty(paths: PathsConfig) -> Self {
        let table_list = Artifact::Missing {
            expected: paths.table_list.clone(),
        };
        Self {
            paths,
            table_list,
            yaml: BTreeMap::new(),
            ddl: BTreeMap::new(),
        }
    }

    /// Read and parse the table list and every YAML/DDL file under the
    /// configured directories
    pub fn load(paths: &PathsConfig) -> Self {
        let mut registry = Self::empty(paths.clone());

        if paths.table_list.is_file() {
            let result = TableListParser::parse_file(&paths.table_list);
            registry.table_list = Artifact::from_result(paths.table_list.clone(), result);
        }

        for (table, path) in scan_dir(&paths.yaml_dir, |name| name.strip_suffix(PathsConfig::YAML_SUFFIX)) {
            let result = YamlParser::parse_file(&path);
            if let Ok(detail) = &result {
                if detail.schema.table_name != table {
                    tracing::warn!(
                        file = %path.display(),
                        declared = %detail.schema.table_name,
                        "YAML table_name differs from file name"
                    );
                }
            }
            registry.yaml.insert(table, Artifact::from_result(path, result));
        }

        let ddl_suffix = format!(".{}", PathsConfig::DDL_EXTENSION);
        for (table, path) in scan_dir(&paths.ddl_dir, |name| name.strip_suffix(ddl_suffix.as_str())) {
            let result = DdlParser::parse_file(&path);
            registry.ddl.insert(table, Artifact::from_result(path, result));
        }

        tracing::debug!(
            table_list = registry.table_list_entries().len(),
            yaml = registry.yaml.len(),
            ddl = registry.ddl.len(),
            "schema registry loaded"
        );

        registry
    }

    pub fn insert_table_list(&mut self, artifact: Artifact<Vec<TableListEntry>>) {
        self.table_list = artifact;
    }

    pub fn insert_yaml(&mut self, table: impl Into<String>, artifact: Artifact<YamlDetail>) {
        self.yaml.insert(table.into(), artifact);
    }

    pub fn insert_ddl(&mut self, table: impl Into<String>, artifact: Artifact<TableSchema>) {
        self.ddl.insert(table.into(), artifact);
    }

    pub fn paths(&self) -> &PathsConfig {
        &self.paths
    }

    pub fn table_list(&self) -> &Artifact<Vec<TableListEntry>> {
        &self.table_list
    }

    /// Catalogue entries; empty when the table list is missing or unreadable
    pub fn table_list_entries(&self) -> &[TableListEntry] {
        self.table_list.loaded().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn table_list_entry(&self, table: &str) -> Option<&TableListEntry> {
        self.table_list_entries().iter().find(|e| e.table_name == table)
    }

    pub fn in_table_list(&self, table: &str) -> bool {
        self.table_list_entry(table).is_some()
    }

    pub fn yaml(&self, table: &str) -> Artifact<&YamlDetail> {
        match self.yaml.get(table) {
            Some(artifact) => artifact.as_ref(),
            None => Artifact::Missing {
                expected: self.paths.yaml_file(table),
            },
        }
    }

    pub fn ddl(&self, table: &str) -> Artifact<&TableSchema> {
        match self.ddl.get(table) {
            Some(artifact) => artifact.as_ref(),
            None => Artifact::Missing {
                expected: self.paths.ddl_file(table),
            },
        }
    }

    /// Best available schema for a table: DDL first, then YAML
    pub fn schema(&self, table: &str) -> Option<&TableSchema> {
        self.ddl
            .get(table)
            .and_then(Artifact::loaded)
            .or_else(|| self.yaml.get(table).and_then(Artifact::loaded).map(|d| &d.schema))
    }

    /// Union of table-list entries and YAML/DDL file stems, sorted
    pub fn table_names(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .table_list_entries()
            .iter()
            .map(|e| e.table_name.as_str())
            .chain(self.yaml.keys().map(String::as_str))
            .chain(self.ddl.keys().map(String::as_str))
            .collect();
        names.into_iter().map(str::to_string).collect()
    }
}

/// Files directly under `dir` whose name passes `stem`, sorted by name
fn scan_dir(dir: &Path, stem: impl Fn(&str) -> Option<&str>) -> Vec<(String, PathBuf)> {
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "artifact directory does not exist");
        return Vec::new();
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "failed to read directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if let Some(table) = stem(name).filter(|t| !t.is_empty()) {
            found.push((table.to_string(), entry.path().to_path_buf()));
        }
    }
    found
}
