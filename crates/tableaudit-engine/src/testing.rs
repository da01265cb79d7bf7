//! In-memory registries for checker unit tests

use std::path::PathBuf;

use tableaudit_core::{Config, PathsConfig};
use tableaudit_parsers::{Artifact, DdlParser, SchemaRegistry, TableListEntry, YamlParser};

pub(crate) fn paths() -> PathsConfig {
    PathsConfig {
        table_list: PathBuf::from("tables.md"),
        yaml_dir: PathBuf::from("yaml"),
        ddl_dir: PathBuf::from("ddl"),
    }
}

pub(crate) struct RegistryFixture {
    registry: SchemaRegistry,
    entries: Vec<TableListEntry>,
}

impl RegistryFixture {
    pub(crate) fn new() -> Self {
        Self {
            registry: SchemaRegistry::empty(paths()),
            entries: Vec::new(),
        }
    }

    pub(crate) fn listed(mut self, table: &str) -> Self {
        self.entries.push(TableListEntry {
            table_id: format!("TBL-{:03}", self.entries.len() + 1),
            category: None,
            table_name: table.to_string(),
            logical_name: None,
        });
        self
    }

    pub(crate) fn yaml(mut self, table: &str, text: &str) -> Self {
        let path = paths().yaml_file(table);
        let artifact = match YamlParser::parse(text) {
            Ok(value) => Artifact::Loaded { path, value },
            Err(err) => Artifact::Failed {
                path,
                reason: err.to_string(),
            },
        };
        self.registry.insert_yaml(table, artifact);
        self
    }

    pub(crate) fn ddl(mut self, table: &str, sql: &str) -> Self {
        let path = paths().ddl_file(table);
        let artifact = match DdlParser::parse(sql) {
            Ok(value) => Artifact::Loaded { path, value },
            Err(err) => Artifact::Failed {
                path,
                reason: err.to_string(),
            },
        };
        self.registry.insert_ddl(table, artifact);
        self
    }

    pub(crate) fn build(mut self) -> SchemaRegistry {
        self.registry.insert_table_list(Artifact::Loaded {
            path: paths().table_list,
            value: self.entries,
        });
        self.registry
    }
}

pub(crate) fn config() -> Config {
    Config {
        paths: paths(),
        ..Config::default()
    }
}

pub(crate) fn tables(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
