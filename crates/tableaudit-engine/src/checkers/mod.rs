//! The consistency checkers, one module per check

pub mod column;
pub mod constraint;
pub mod data_type;
pub mod existence;
pub mod foreign_key;
pub mod multitenant;
pub mod performance;
pub mod traceability;
pub mod yaml_format;

pub use column::ColumnConsistencyChecker;
pub use constraint::ConstraintConsistencyChecker;
pub use data_type::DataTypeConsistencyChecker;
pub use existence::TableExistenceChecker;
pub use foreign_key::ForeignKeyConsistencyChecker;
pub use multitenant::MultitenantComplianceChecker;
pub use performance::PerformanceImpactChecker;
pub use traceability::{is_valid_requirement_id, RequirementTraceabilityChecker};
pub use yaml_format::YamlFormatChecker;

use tableaudit_core::CheckName;

use crate::checker::Checker;

/// The checker implementing a check; `None` for `fix_suggestions`, which
/// runs over the other checks' results instead of over tables
pub fn checker_for(check: CheckName) -> Option<Box<dyn Checker>> {
    let checker: Box<dyn Checker> = match check {
        CheckName::TableExistence => Box::new(TableExistenceChecker),
        CheckName::ColumnConsistency => Box::new(ColumnConsistencyChecker),
        CheckName::DataTypeConsistency => Box::new(DataTypeConsistencyChecker),
        CheckName::ForeignKeyConsistency => Box::new(ForeignKeyConsistencyChecker),
        CheckName::ConstraintConsistency => Box::new(ConstraintConsistencyChecker),
        CheckName::YamlFormat => Box::new(YamlFormatChecker),
        CheckName::MultitenantCompliance => Box::new(MultitenantComplianceChecker),
        CheckName::RequirementTraceability => Box::new(RequirementTraceabilityChecker),
        CheckName::PerformanceImpact => Box::new(PerformanceImpactChecker),
        CheckName::FixSuggestions => return None,
    };
    Some(checker)
}
