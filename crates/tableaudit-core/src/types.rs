//! SQL type normalization
//!
//! Type aliases are grouped into canonical families by a lookup table.
//! Comparing a YAML-declared type against a DDL-declared type first
//! compares families, then length/precision/scale, then ENUM literal sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A parsed SQL type: uppercase base name plus its arguments
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeSpec {
    pub base: String,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub enum_values: Vec<String>,
}

impl TypeSpec {
    /// Parse `VARCHAR(50)`, `decimal(10, 2)`, `ENUM('a','b')`, `int unsigned`, ...
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (head, args) = match raw.find('(') {
            Some(open) => {
                let close = raw.rfind(')').filter(|close| *close > open);
                let args = match close {
                    Some(close) => &raw[open + 1..close],
                    None => &raw[open + 1..],
                };
                (&raw[..open], Some(args))
            }
            None => (raw, None),
        };

        let base = normalize_base(head);
        let mut spec = TypeSpec {
            base,
            ..Default::default()
        };

        let Some(args) = args else {
            return spec;
        };

        match family_of(&spec.base) {
            TypeFamily::Enum | TypeFamily::Set => {
                spec.enum_values = split_enum_literals(args);
            }
            TypeFamily::Decimal | TypeFamily::Float => {
                let mut parts = args.split(',').map(|p| p.trim().parse::<u32>().ok());
                spec.precision = parts.next().flatten();
                spec.scale = parts.next().flatten();
            }
            _ => {
                spec.length = args.split(',').next().and_then(|p| p.trim().parse().ok());
            }
        }

        spec
    }

    pub fn family(&self) -> TypeFamily {
        family_of(&self.base)
    }
}

impl std::fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.base)?;
        if !self.enum_values.is_empty() {
            let literals: Vec<String> = self
                .enum_values
                .iter()
                .map(|v| format!("'{}'", v.replace('\'', "''")))
                .collect();
            return write!(f, "({})", literals.join(","));
        }
        match (self.precision, self.scale, self.length) {
            (Some(p), Some(s), _) => write!(f, "({p},{s})"),
            (Some(p), None, _) => write!(f, "({p})"),
            (None, _, Some(len)) => write!(f, "({len})"),
            _ => Ok(()),
        }
    }
}

/// Canonical type family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFamily {
    Integer,
    Decimal,
    Float,
    String,
    Text,
    Boolean,
    Date,
    Time,
    Timestamp,
    Binary,
    Json,
    Uuid,
    Enum,

    /// Holds any subset of its literals per row
    Set,

    /// Not in the alias table; compared by base name
    Other,
}

const TYPE_FAMILIES: &[(TypeFamily, &[&str])] = &[
    (
        TypeFamily::Integer,
        &["INT", "INTEGER", "TINYINT", "SMALLINT", "MEDIUMINT", "BIGINT", "SERIAL", "BIGSERIAL"],
    ),
    (TypeFamily::Decimal, &["DECIMAL", "NUMERIC", "DEC", "NUMBER"]),
    (TypeFamily::Float, &["FLOAT", "DOUBLE", "DOUBLE PRECISION", "REAL"]),
    (
        TypeFamily::String,
        &["VARCHAR", "CHAR", "CHARACTER", "CHARACTER VARYING", "NVARCHAR", "NCHAR", "VARCHAR2"],
    ),
    (TypeFamily::Text, &["TEXT", "TINYTEXT", "MEDIUMTEXT", "LONGTEXT", "CLOB"]),
    (TypeFamily::Boolean, &["BOOLEAN", "BOOL"]),
    (TypeFamily::Date, &["DATE"]),
    (TypeFamily::Time, &["TIME"]),
    (TypeFamily::Timestamp, &["TIMESTAMP", "DATETIME", "TIMESTAMPTZ"]),
    (TypeFamily::Binary, &["BLOB", "BYTEA", "BINARY", "VARBINARY", "LONGBLOB"]),
    (TypeFamily::Json, &["JSON", "JSONB"]),
    (TypeFamily::Uuid, &["UUID"]),
    (TypeFamily::Enum, &["ENUM"]),
    (TypeFamily::Set, &["SET"]),
];

/// Look up the family of a type; any argument list is ignored
pub fn family_of(raw_type: &str) -> TypeFamily {
    let head = raw_type.split('(').next().unwrap_or_default();
    let base = normalize_base(head);

    TYPE_FAMILIES
        .iter()
        .find(|(_, aliases)| aliases.contains(&base.as_str()))
        .map(|(family, _)| *family)
        .unwrap_or(TypeFamily::Other)
}

/// Compatibility verdict between two declared types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compatibility {
    Match,
    Compatible,
    Incompatible,
}

impl std::fmt::Display for Compatibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match => write!(f, "match"),
            Self::Compatible => write!(f, "compatible"),
            Self::Incompatible => write!(f, "incompatible"),
        }
    }
}

/// Outcome of comparing a YAML type against a DDL type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeComparison {
    /// Same family and same dimensions
    Match,

    /// Same family, differing length/precision/scale
    Compatible,

    /// Different families
    Incompatible,

    /// Both ENUM (or both SET) but the literal sets differ
    EnumMismatch {
        missing_in_ddl: Vec<String>,
        missing_in_yaml: Vec<String>,
    },
}

impl TypeComparison {
    pub fn compatibility(&self) -> Compatibility {
        match self {
            Self::Match => Compatibility::Match,
            Self::Compatible => Compatibility::Compatible,
            Self::Incompatible | Self::EnumMismatch { .. } => Compatibility::Incompatible,
        }
    }
}

/// Compare a YAML-declared type with a DDL-declared type
pub fn compare_types(yaml: &TypeSpec, ddl: &TypeSpec) -> TypeComparison {
    let yaml_family = yaml.family();
    let ddl_family = ddl.family();

    if yaml_family != ddl_family {
        return TypeComparison::Incompatible;
    }
    if yaml_family == TypeFamily::Other && yaml.base != ddl.base {
        return TypeComparison::Incompatible;
    }

    if matches!(yaml_family, TypeFamily::Enum | TypeFamily::Set) {
        let yaml_values: BTreeSet<&str> = yaml.enum_values.iter().map(|v| v.trim()).collect();
        let ddl_values: BTreeSet<&str> = ddl.enum_values.iter().map(|v| v.trim()).collect();

        if yaml_values == ddl_values {
            return TypeComparison::Match;
        }

        return TypeComparison::EnumMismatch {
            missing_in_ddl: yaml_values.difference(&ddl_values).map(|v| v.to_string()).collect(),
            missing_in_yaml: ddl_values.difference(&yaml_values).map(|v| v.to_string()).collect(),
        };
    }

    let dimensions_match = dimension_matches(yaml.length, ddl.length)
        && dimension_matches(yaml.precision, ddl.precision)
        && dimension_matches(yaml.scale, ddl.scale);

    if dimensions_match {
        TypeComparison::Match
    } else {
        TypeComparison::Compatible
    }
}

/// An unspecified dimension on either side matches anything
fn dimension_matches(a: Option<u32>, b: Option<u32>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

/// Normalize a default value for comparison.
///
/// Strips surrounding quotes and uppercases the recognized keywords
/// `TRUE`, `FALSE`, `NULL` and `CURRENT_TIMESTAMP`. Numbers compare by
/// value, so `0.00` and `0.0` both become `0`. `NULL` and an absent
/// default are equivalent, both yield `None`; an empty literal stays
/// `Some("")`.
pub fn normalize_default(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    let unquoted = strip_quotes(value).trim();

    let upper = unquoted.to_uppercase();
    let normalized = match upper.as_str() {
        "NULL" => return None,
        "TRUE" | "FALSE" | "CURRENT_TIMESTAMP" | "CURRENT_TIMESTAMP()" => {
            upper.trim_end_matches("()").to_string()
        }
        _ => canonical_number(unquoted).unwrap_or_else(|| unquoted.to_string()),
    };

    Some(normalized)
}

/// `+010.500` -> `10.5`, `-0.00` -> `0`; `None` for anything but a plain decimal
fn canonical_number(text: &str) -> Option<String> {
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }

    let int_part = int_part.trim_start_matches('0');
    let frac_part = frac_part.trim_end_matches('0');
    let int_part = if int_part.is_empty() { "0" } else { int_part };

    let mut number = String::new();
    if negative && (int_part != "0" || !frac_part.is_empty()) {
        number.push('-');
    }
    number.push_str(int_part);
    if !frac_part.is_empty() {
        number.push('.');
        number.push_str(frac_part);
    }
    Some(number)
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['\'', '"', '`'] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// First word of the type name, plus a following `VARYING` or `PRECISION`.
///
/// Trailing qualifiers (`UNSIGNED`, `WITH TIME ZONE`, ...) are dropped, the
/// same cut the DDL column grammar makes.
fn normalize_base(head: &str) -> String {
    let mut words = head.split_whitespace().map(str::to_uppercase);
    let Some(first) = words.next() else {
        return String::new();
    };

    match words.next() {
        Some(second) if second == "VARYING" || second == "PRECISION" => format!("{first} {second}"),
        _ => first,
    }
}

/// Split `'a','b''c', 'd'` into `["a", "b'c", "d"]`
fn split_enum_literals(args: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = args.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, quote) {
            (q, Some(open)) if q == open && chars.peek() == Some(&open) => {
                current.push(q);
                chars.next();
            }
            (q, Some(open)) if q == open => quote = None,
            ('\'' | '"', None) => quote = Some(c),
            (',', None) => {
                values.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    if !current.trim().is_empty() {
        values.push(current.trim().to_string());
    }

    values.retain(|v| !v.is_empty());
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_simple_length() {
        let spec = TypeSpec::parse("varchar(50)");
        assert_eq!(spec.base, "VARCHAR");
        assert_eq!(spec.length, Some(50));
        assert_eq!(spec.precision, None);
    }

    #[test]
    fn parse_decimal_precision_scale() {
        let spec = TypeSpec::parse("DECIMAL(10, 2)");
        assert_eq!(spec.base, "DECIMAL");
        assert_eq!(spec.precision, Some(10));
        assert_eq!(spec.scale, Some(2));
        assert_eq!(spec.length, None);
        assert_eq!(spec.to_string(), "DECIMAL(10,2)");
    }

    #[test]
    fn parse_enum_literals() {
        let spec = TypeSpec::parse("ENUM('ACTIVE', 'IN,ACTIVE', 'it''s')");
        assert_eq!(spec.base, "ENUM");
        assert_eq!(spec.enum_values, vec!["ACTIVE", "IN,ACTIVE", "it's"]);
        assert_eq!(spec.to_string(), "ENUM('ACTIVE','IN,ACTIVE','it''s')");
    }

    #[test]
    fn parse_strips_modifiers() {
        assert_eq!(TypeSpec::parse("int unsigned").base, "INT");
        assert_eq!(TypeSpec::parse("character varying(20)").base, "CHARACTER VARYING");
    }

    #[test]
    fn families() {
        assert_eq!(family_of("INT"), TypeFamily::Integer);
        assert_eq!(family_of("integer"), TypeFamily::Integer);
        assert_eq!(family_of("TINYINT(1)"), TypeFamily::Integer);
        assert_eq!(family_of("numeric(5)"), TypeFamily::Decimal);
        assert_eq!(family_of("GEOMETRY"), TypeFamily::Other);
    }

    #[test]
    fn comparison_is_commutative() {
        let int = TypeSpec::parse("INT");
        let integer = TypeSpec::parse("INTEGER");
        assert_eq!(compare_types(&int, &integer), TypeComparison::Match);
        assert_eq!(compare_types(&integer, &int), TypeComparison::Match);
    }

    #[test]
    fn length_difference_is_compatible() {
        let yaml = TypeSpec::parse("VARCHAR(100)");
        let ddl = TypeSpec::parse("VARCHAR(255)");
        assert_eq!(compare_types(&yaml, &ddl), TypeComparison::Compatible);

        let unspecified = TypeSpec::parse("VARCHAR");
        assert_eq!(compare_types(&unspecified, &ddl), TypeComparison::Match);
    }

    #[test]
    fn different_families_are_incompatible() {
        let yaml = TypeSpec::parse("ENUM('A','B')");
        let ddl = TypeSpec::parse("VARCHAR(1)");
        let result = compare_types(&yaml, &ddl);
        assert_eq!(result, TypeComparison::Incompatible);
        assert_eq!(result.compatibility(), Compatibility::Incompatible);

        let a = TypeSpec::parse("GEOMETRY");
        let b = TypeSpec::parse("POINT");
        assert_eq!(compare_types(&a, &b), TypeComparison::Incompatible);
    }

    #[test]
    fn enum_comparison_ignores_order() {
        let ab = TypeSpec::parse("ENUM('a','b')");
        let ba = TypeSpec::parse("ENUM('b','a')");
        assert_eq!(compare_types(&ab, &ba), TypeComparison::Match);

        let ac = TypeSpec::parse("ENUM('a','c')");
        assert_eq!(
            compare_types(&ab, &ac),
            TypeComparison::EnumMismatch {
                missing_in_ddl: vec!["b".to_string()],
                missing_in_yaml: vec!["c".to_string()],
            }
        );
    }

    #[test]
    fn default_normalization() {
        assert_eq!(normalize_default(Some("'ACTIVE'")), Some("ACTIVE".to_string()));
        assert_eq!(normalize_default(Some("true")), Some("TRUE".to_string()));
        assert_eq!(normalize_default(Some("current_timestamp")), Some("CURRENT_TIMESTAMP".to_string()));
        assert_eq!(normalize_default(Some("NULL")), None);
        assert_eq!(normalize_default(None), None);
        assert_eq!(normalize_default(Some("''")), Some(String::new()));
        assert_eq!(normalize_default(Some("")), Some(String::new()));
    }

    #[test]
    fn numeric_defaults_compare_by_value() {
        assert_eq!(normalize_default(Some("0.00")), Some("0".to_string()));
        assert_eq!(normalize_default(Some("0.0")), Some("0".to_string()));
        assert_eq!(normalize_default(Some("'10.50'")), Some("10.5".to_string()));
        assert_eq!(normalize_default(Some("-0.00")), Some("0".to_string()));
        assert_eq!(normalize_default(Some("-1.250")), Some("-1.25".to_string()));
        assert_eq!(normalize_default(Some("007")), Some("7".to_string()));
        assert_eq!(normalize_default(Some("1.2.3")), Some("1.2.3".to_string()));
        assert_eq!(normalize_default(Some("-")), Some("-".to_string()));
    }

    #[test]
    fn time_zone_qualifier_is_dropped() {
        let yaml = TypeSpec::parse("TIMESTAMP WITH TIME ZONE");
        let ddl = TypeSpec::parse("timestamp");
        assert_eq!(yaml.base, "TIMESTAMP");
        assert_eq!(compare_types(&yaml, &ddl), TypeComparison::Match);

        assert_eq!(TypeSpec::parse("time without time zone").base, "TIME");
        assert_eq!(TypeSpec::parse("TIMESTAMP(3) WITH TIME ZONE").precision, None);
        assert_eq!(TypeSpec::parse("TIMESTAMP(3) WITH TIME ZONE").length, Some(3));
        assert_eq!(TypeSpec::parse("double precision").base, "DOUBLE PRECISION");
    }

    #[test]
    fn set_is_not_enum() {
        let set = TypeSpec::parse("SET('a','b')");
        let enumeration = TypeSpec::parse("ENUM('a','b')");
        assert_eq!(set.family(), TypeFamily::Set);
        assert_eq!(set.enum_values, vec!["a", "b"]);
        assert_eq!(compare_types(&set, &enumeration), TypeComparison::Incompatible);

        let reordered = TypeSpec::parse("set('b','a')");
        assert_eq!(compare_types(&set, &reordered), TypeComparison::Match);
    }
}
