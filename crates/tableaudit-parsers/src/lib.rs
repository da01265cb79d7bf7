//! Artifact parsing for tableaudit
//!
//! This crate handles:
//! - Parsing generated DDL files (`T.sql`)
//! - Parsing table detail YAML files (`T_details.yaml`), both dialects
//! - Parsing the markdown table list
//! - Loading every artifact once per run into a [`SchemaRegistry`]

pub mod ddl;
pub mod error;
pub mod registry;
mod scan;
pub mod table_list;
pub mod yaml;

pub use ddl::DdlParser;
pub use error::ParseError;
pub use registry::{Artifact, SchemaRegistry};
pub use table_list::{TableListEntry, TableListParser};
pub use yaml::{RevisionEntry, YamlDetail, YamlMetadata, YamlParser};
