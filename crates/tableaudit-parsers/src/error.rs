//! Parser error types

use tableaudit_core::SchemaError;

/// A single artifact failed to parse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read {0}: {1}")]
    IoError(String, String),

    #[error("no CREATE TABLE statement found")]
    MissingCreateTable,

    #[error("unbalanced parentheses in {context}")]
    UnbalancedParentheses { context: String },

    #[error("invalid YAML: {0}")]
    InvalidYaml(String),

    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("invalid value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ParseError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }
}
