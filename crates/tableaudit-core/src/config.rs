//! Configuration schema (tableaudit.toml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::result::{CheckName, Severity};

/// Locations of the three artifact families
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Markdown table list (authoritative catalogue)
    pub table_list: PathBuf,

    /// Directory of `T_details.yaml` files
    pub yaml_dir: PathBuf,

    /// Directory of `T.sql` files
    pub ddl_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            table_list: PathBuf::from("docs/design/database/テーブル一覧.md"),
            yaml_dir: PathBuf::from("docs/design/database/table-details"),
            ddl_dir: PathBuf::from("docs/design/database/ddl"),
        }
    }
}

impl PathsConfig {
    pub const YAML_SUFFIX: &'static str = "_details.yaml";
    pub const DDL_EXTENSION: &'static str = "sql";

    pub fn yaml_file_name(table_name: &str) -> String {
        format!("{table_name}{}", Self::YAML_SUFFIX)
    }

    pub fn ddl_file_name(table_name: &str) -> String {
        format!("{table_name}.{}", Self::DDL_EXTENSION)
    }

    pub fn yaml_file(&self, table_name: &str) -> PathBuf {
        self.yaml_dir.join(Self::yaml_file_name(table_name))
    }

    pub fn ddl_file(&self, table_name: &str) -> PathBuf {
        self.ddl_dir.join(Self::ddl_file_name(table_name))
    }

    /// Resolve relative paths against a base directory
    pub fn resolve_against(&mut self, base: &Path) {
        for path in [&mut self.table_list, &mut self.yaml_dir, &mut self.ddl_dir] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Multitenant compliance settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultitenantConfig {
    pub tenant_column: String,

    /// Exempt tables: an entry ending in `_` matches as a prefix, any
    /// other entry only as the exact table name
    pub exempt_prefixes: Vec<String>,
}

impl Default for MultitenantConfig {
    fn default() -> Self {
        Self {
            tenant_column: "tenant_id".to_string(),
            exempt_prefixes: vec!["SYS_".to_string(), "MST_Tenant".to_string()],
        }
    }
}

impl MultitenantConfig {
    /// The exempt entry matching this table, if any
    pub fn exempt_prefix(&self, table_name: &str) -> Option<&str> {
        self.exempt_prefixes
            .iter()
            .find(|entry| {
                if entry.ends_with('_') {
                    table_name.starts_with(entry.as_str())
                } else {
                    table_name == entry.as_str()
                }
            })
            .map(String::as_str)
    }
}

/// Projected row-count thresholds per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub master_row_threshold: u64,
    pub transaction_row_threshold: u64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            master_row_threshold: 100_000,
            transaction_row_threshold: 10_000_000,
        }
    }
}

/// Severity overrides for specific checks
///
/// Overrides apply to WARNING and ERROR results only; a SUCCESS stays a
/// SUCCESS.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeverityThreshold {
    /// Map of check name to severity override
    #[serde(default)]
    pub overrides: HashMap<String, Severity>,
}

impl SeverityThreshold {
    /// Get severity for a check result, or the default
    pub fn get_severity(&self, check: CheckName, default: Severity) -> Severity {
        if default < Severity::Warning {
            return default;
        }

        self.overrides.get(check.as_str()).copied().unwrap_or(default)
    }

    /// Set severity override for a check
    pub fn set_override(&mut self, check: CheckName, severity: Severity) {
        self.overrides.insert(check.as_str().to_string(), severity);
    }
}

/// Allowlist rules for specific tables or patterns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AllowlistRules {
    /// Completely skip checks for these tables (glob patterns)
    #[serde(default)]
    pub skip_tables: Vec<String>,
}

impl AllowlistRules {
    /// Check if a table matches any pattern in the list
    fn matches_pattern(table: &str, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, table)
            } else {
                pattern == table
            }
        })
    }

    /// Check if a table should be skipped
    pub fn is_table_skipped(&self, table: &str) -> bool {
        Self::matches_pattern(table, &self.skip_tables)
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub multitenant: MultitenantConfig,

    #[serde(default)]
    pub performance: PerformanceConfig,

    /// Severity overrides
    #[serde(default)]
    pub severity: SeverityThreshold,

    /// Allowlist rules
    #[serde(default)]
    pub allowlist: AllowlistRules,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            multitenant: MultitenantConfig::default(),
            performance: PerformanceConfig::default(),
            severity: SeverityThreshold::default(),
            allowlist: AllowlistRules::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file; relative paths resolve against its directory
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
            config.paths.resolve_against(parent);
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.project_root = std::env::current_dir().unwrap_or_default();
        Ok(config)
    }
}

/// Simple glob matching (supports a single * wildcard)
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "*" || pattern == "**" {
        return true;
    }

    if let Some(star_pos) = pattern.find('*') {
        let prefix = &pattern[..star_pos];
        let suffix = &pattern[star_pos + 1..];

        text.len() >= prefix.len() + suffix.len() && text.starts_with(prefix) && text.ends_with(suffix)
    } else {
        pattern == text
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.multitenant.tenant_column, "tenant_id");
        assert_eq!(config.performance.master_row_threshold, 100_000);
        assert_eq!(config.performance.transaction_row_threshold, 10_000_000);
    }

    #[test]
    fn artifact_file_names() {
        let paths = PathsConfig {
            table_list: PathBuf::from("list.md"),
            yaml_dir: PathBuf::from("yaml"),
            ddl_dir: PathBuf::from("ddl"),
        };
        assert_eq!(paths.yaml_file("MST_Foo"), PathBuf::from("yaml/MST_Foo_details.yaml"));
        assert_eq!(paths.ddl_file("MST_Foo"), PathBuf::from("ddl/MST_Foo.sql"));
    }

    #[test]
    fn severity_override() {
        let mut threshold = SeverityThreshold::default();
        threshold.set_override(CheckName::RequirementTraceability, Severity::Info);

        assert_eq!(
            threshold.get_severity(CheckName::RequirementTraceability, Severity::Warning),
            Severity::Info
        );
        assert_eq!(
            threshold.get_severity(CheckName::RequirementTraceability, Severity::Success),
            Severity::Success
        );
        assert_eq!(
            threshold.get_severity(CheckName::TableExistence, Severity::Error),
            Severity::Error
        );
    }

    #[test]
    fn allowlist_pattern_matching() {
        let rules = AllowlistRules {
            skip_tables: vec!["WRK_*".to_string(), "MST_Legacy".to_string()],
        };

        assert!(rules.is_table_skipped("WRK_Import"));
        assert!(rules.is_table_skipped("MST_Legacy"));
        assert!(!rules.is_table_skipped("MST_Employee"));
    }

    #[test]
    fn config_from_toml() {
        let config = Config::from_toml(
            r#"
[paths]
yaml_dir = "details"

[multitenant]
exempt_prefixes = ["SYS_"]

[severity.overrides]
performance_impact = "info"
"#,
        )
        .unwrap();

        assert_eq!(config.paths.yaml_dir, PathBuf::from("details"));
        assert_eq!(config.paths.ddl_dir, PathsConfig::default().ddl_dir);
        assert_eq!(config.multitenant.exempt_prefixes, vec!["SYS_".to_string()]);
        assert_eq!(config.multitenant.tenant_column, "tenant_id");
        assert_eq!(
            config.severity.get_severity(CheckName::PerformanceImpact, Severity::Warning),
            Severity::Info
        );
    }

    #[test]
    fn config_toml_roundtrip() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.paths, parsed.paths);
    }

    #[test]
    fn glob_matching() {
        assert!(glob_match("*", "anything"));
        assert!(glob_match("WRK_*", "WRK_Import"));
        assert!(glob_match("*_Log", "HIS_Access_Log"));
        assert!(!glob_match("WRK_*", "MST_Import"));
        assert!(!glob_match("ab*ba", "aba"));
    }

    #[test]
    fn exempt_entries_match_prefix_or_exact_name() {
        let multitenant = MultitenantConfig::default();
        assert_eq!(multitenant.exempt_prefix("SYS_Config"), Some("SYS_"));
        assert_eq!(multitenant.exempt_prefix("MST_Tenant"), Some("MST_Tenant"));
        assert_eq!(multitenant.exempt_prefix("MST_TenantSettings"), None);
        assert_eq!(multitenant.exempt_prefix("MST_TenantContract"), None);
        assert_eq!(multitenant.exempt_prefix("TRN_Order"), None);
    }
}
