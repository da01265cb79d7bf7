//! Fix suggestion value objects
//!
//! Suggestions are advisory text only. Nothing in the engine applies them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which artifact a fix touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FixType {
    Ddl,
    Yaml,
    Insert,
    All,
}

impl FixType {
    /// Sort priority; schema-breaking DDL fixes first
    pub fn priority(&self) -> u8 {
        match self {
            Self::Ddl => 0,
            Self::Yaml => 1,
            Self::Insert => 2,
            Self::All => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ddl => "DDL",
            Self::Yaml => "YAML",
            Self::Insert => "INSERT",
            Self::All => "ALL",
        }
    }
}

impl std::fmt::Display for FixType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remediation proposal for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixSuggestion {
    pub fix_type: FixType,
    pub table_name: String,
    pub description: String,

    /// Remediation text (SQL or YAML snippet)
    pub fix_content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    pub backup_required: bool,
    pub critical: bool,
}

impl FixSuggestion {
    pub fn new(
        fix_type: FixType,
        table_name: impl Into<String>,
        description: impl Into<String>,
        fix_content: impl Into<String>,
    ) -> Self {
        Self {
            fix_type,
            table_name: table_name.into(),
            description: description.into(),
            fix_content: fix_content.into(),
            file_path: None,
            // Rewriting generated DDL loses hand edits.
            backup_required: fix_type == FixType::Ddl,
            critical: false,
        }
    }

    pub fn critical(mut self) -> Self {
        self.critical = true;
        self
    }

    pub fn with_file(mut self, path: Option<PathBuf>) -> Self {
        self.file_path = path;
        self
    }

    /// Two suggestions with the same key are duplicates
    pub fn dedup_key(&self) -> (&str, FixType, &str) {
        (&self.table_name, self.fix_type, &self.description)
    }

    /// Critical first, then DDL < YAML < INSERT < ALL, then table name
    pub fn sort_key(&self) -> (bool, u8, &str) {
        (!self.critical, self.fix_type.priority(), &self.table_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order() {
        assert!(FixType::Ddl.priority() < FixType::Yaml.priority());
        assert!(FixType::Yaml.priority() < FixType::Insert.priority());
        assert!(FixType::Insert.priority() < FixType::All.priority());
    }

    #[test]
    fn ddl_fixes_require_backup() {
        let ddl = FixSuggestion::new(FixType::Ddl, "MST_Foo", "add column", "ALTER TABLE ...");
        let yaml = FixSuggestion::new(FixType::Yaml, "MST_Foo", "add column", "- name: x");
        assert!(ddl.backup_required);
        assert!(!yaml.backup_required);
    }

    #[test]
    fn critical_sorts_first() {
        let minor = FixSuggestion::new(FixType::Ddl, "A", "x", "");
        let critical = FixSuggestion::new(FixType::All, "Z", "y", "").critical();
        assert!(critical.sort_key() < minor.sort_key());
    }
}
