//! DDL (`T.sql`) parsing
//!
//! The `CREATE TABLE` body is isolated with a balanced-parenthesis scan and
//! split on top-level commas before any per-item regex runs, so
//! `DECIMAL(10,2)` and `ENUM('a','b')` never confuse the column split.
//! `CREATE INDEX`, `ALTER TABLE ... ADD CONSTRAINT` and `COMMENT ON`
//! statements are extracted separately.

use std::path::Path;

use tableaudit_core::{
    ColumnDefinition, ConstraintDefinition, ForeignKeyDefinition, IndexDefinition, ReferentialAction, TableSchema,
    TypeSpec,
};

use crate::error::ParseError;
use crate::regex;
use crate::scan::{
    group_after, matching_paren, parse_column_list, split_top_level, strip_sql_comments, unquote_identifier,
    unquote_literal,
};

/// Parser for generated DDL files
pub struct DdlParser;

impl DdlParser {
    /// Parse a DDL file from disk
    pub fn parse_file(path: &Path) -> Result<TableSchema, ParseError> {
        let sql = std::fs::read_to_string(path)
            .map_err(|e| ParseError::IoError(path.display().to_string(), e.to_string()))?;
        Self::parse(&sql)
    }

    /// Parse DDL text containing one `CREATE TABLE` plus optional index and
    /// constraint statements
    pub fn parse(sql: &str) -> Result<TableSchema, ParseError> {
        let cleaned = strip_sql_comments(sql);
        let statements = split_top_level(&cleaned, ';');

        let create_re = regex!(r#"(?is)^\s*CREATE\s+(?:TEMPORARY\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?([`"\[\]\w.$]+)\s*\("#);

        let (create_idx, caps) = statements
            .iter()
            .enumerate()
            .find_map(|(idx, stmt)| create_re.captures(stmt).map(|caps| (idx, caps)))
            .ok_or(ParseError::MissingCreateTable)?;

        let create_stmt = statements[create_idx];
        let table_name = unquote_identifier(&caps[1]);
        let open = caps.get(0).map(|m| m.end() - 1).unwrap_or_default();
        let close = matching_paren(create_stmt, open).ok_or_else(|| ParseError::UnbalancedParentheses {
            context: format!("CREATE TABLE {table_name}"),
        })?;

        let mut schema = TableSchema::new(&table_name)?;
        let mut builder = TableBuilder::new(&table_name);

        for item in split_top_level(&create_stmt[open + 1..close], ',') {
            builder.table_item(item)?;
        }

        if let Some(comment) = table_option_comment(&create_stmt[close + 1..]) {
            schema.logical_name = Some(comment);
        }

        for (idx, stmt) in statements.iter().enumerate() {
            if idx != create_idx {
                builder.statement(stmt, &mut schema)?;
            }
        }

        builder.finish(schema)
    }
}

/// Accumulates table items before primary keys are applied to columns
struct TableBuilder {
    table_name: String,
    columns: Vec<ColumnDefinition>,
    primary_keys: Vec<String>,
    indexes: Vec<IndexDefinition>,
    foreign_keys: Vec<ForeignKeyDefinition>,
    constraints: Vec<ConstraintDefinition>,
    column_comments: Vec<(String, String)>,
}

impl TableBuilder {
    fn new(table_name: &str) -> Self {
        Self {
            table_name: table_name.to_string(),
            columns: Vec::new(),
            primary_keys: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
            constraints: Vec::new(),
            column_comments: Vec::new(),
        }
    }

    fn finish(self, mut schema: TableSchema) -> Result<TableSchema, ParseError> {
        for column in self.columns {
            schema.push_column(column);
        }
        schema.add_primary_keys(self.primary_keys);

        for (column, comment) in self.column_comments {
            if let Some(col) = schema.columns.iter_mut().find(|c| c.name == column) {
                col.comment = Some(comment);
            }
        }

        schema.indexes = self.indexes;
        schema.foreign_keys = self.foreign_keys;
        schema.constraints = self.constraints;
        Ok(schema)
    }

    /// One comma-separated item of the CREATE TABLE body
    fn table_item(&mut self, item: &str) -> Result<(), ParseError> {
        let constraint_re = regex!(r#"(?is)^CONSTRAINT\s+([`"\[\]\w$]+)\s+(.*)$"#);
        let keyword_re = regex!(r"(?i)^(PRIMARY\s+KEY|UNIQUE|FOREIGN\s+KEY|CHECK|KEY|INDEX|FULLTEXT|SPATIAL)\b");

        if let Some(caps) = constraint_re.captures(item) {
            let name = unquote_identifier(&caps[1]);
            let body = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            return self.constraint_body(Some(name), body);
        }

        if keyword_re.is_match(item) {
            return self.constraint_body(None, item);
        }

        self.column(item)
    }

    /// `PRIMARY KEY (...)`, `UNIQUE [KEY] [name] (...)`, `FOREIGN KEY ...`,
    /// `CHECK (...)`, `KEY name (...)`
    fn constraint_body(&mut self, name: Option<String>, body: &str) -> Result<(), ParseError> {
        let body = body.trim();
        let upper = body.to_uppercase();
        let unbalanced = || ParseError::UnbalancedParentheses {
            context: format!("{}: {body}", self.table_name),
        };

        if upper.starts_with("PRIMARY") {
            let (inner, _) = group_after(body, 0).map_err(|_| unbalanced())?.unwrap_or_default();
            self.primary_keys.extend(parse_column_list(inner));
        } else if upper.starts_with("FOREIGN") {
            let fk = parse_foreign_key(&self.table_name, name, body).ok_or_else(unbalanced)?;
            self.foreign_keys.push(fk);
        } else if upper.starts_with("CHECK") {
            let (inner, _) = group_after(body, 0).map_err(|_| unbalanced())?.unwrap_or_default();
            let name = name.unwrap_or_else(|| format!("chk_{}_{}", self.table_name, self.constraints.len() + 1));
            self.constraints.push(ConstraintDefinition::check(name, inner.trim()));
        } else if upper.starts_with("UNIQUE") {
            let (inner, _) = group_after(body, 0).map_err(|_| unbalanced())?.unwrap_or_default();
            let columns = parse_column_list(inner);
            let name = name
                .or_else(|| index_name_before_paren(body))
                .unwrap_or_else(|| format!("uq_{}_{}", self.table_name, columns.join("_")));
            self.constraints.push(ConstraintDefinition::unique(name, columns));
        } else {
            // KEY / INDEX / FULLTEXT / SPATIAL
            let (inner, _) = group_after(body, 0).map_err(|_| unbalanced())?.unwrap_or_default();
            let columns = parse_column_list(inner);
            let name = name
                .or_else(|| index_name_before_paren(body))
                .unwrap_or_else(|| format!("idx_{}_{}", self.table_name, columns.join("_")));
            self.indexes.push(IndexDefinition::new(name, columns, false));
        }

        Ok(())
    }

    /// A column definition: `name TYPE[(args)] [modifiers...]`
    fn column(&mut self, item: &str) -> Result<(), ParseError> {
        let head_re = regex!(r#"(?s)^([`"\[]?[\w$]+[`"\]]?)\s+(.*)$"#);
        let type_re = regex!(r"(?i)^([a-z_][a-z0-9_]*(?:\s+(?:varying|precision))?)");

        let Some(caps) = head_re.captures(item) else {
            tracing::debug!(table = %self.table_name, item, "skipping unrecognized table item");
            return Ok(());
        };

        let name = unquote_identifier(&caps[1]);
        let rest = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();

        let Some(type_match) = type_re.find(rest) else {
            tracing::debug!(table = %self.table_name, column = %name, "column without a type");
            return Ok(());
        };

        let mut raw_type = type_match.as_str().to_string();
        let mut modifiers_start = type_match.end();

        let after_type = &rest[modifiers_start..];
        if after_type.trim_start().starts_with('(') {
            let (inner, end) = group_after(rest, modifiers_start)
                .map_err(|_| ParseError::UnbalancedParentheses {
                    context: format!("{}.{name}", self.table_name),
                })?
                .unwrap_or_default();
            raw_type = format!("{raw_type}({inner})");
            modifiers_start = end;
        }

        let mut column = ColumnDefinition::from_type_spec(name, TypeSpec::parse(&raw_type));
        let modifiers = rest[modifiers_start..].to_string();
        self.apply_column_modifiers(&mut column, &modifiers)?;

        self.columns.push(column);
        Ok(())
    }

    fn apply_column_modifiers(&mut self, column: &mut ColumnDefinition, modifiers: &str) -> Result<(), ParseError> {
        let comment_re = regex!(r"(?is)\bCOMMENT\s+'((?:[^']|'')*)'");
        let default_re = regex!(r"(?is)\bDEFAULT\s+('(?:[^']|'')*'|\([^)]*\)|[^\s,]+)");
        let references_re = regex!(r#"(?is)\bREFERENCES\s+([`"\[\]\w.$]+)\s*\(([^)]*)\)((?:\s+ON\s+(?:UPDATE|DELETE)\s+(?:SET\s+NULL|NO\s+ACTION|\w+))*)"#);
        let check_re = regex!(r"(?i)\bCHECK\s*\(");

        let mut remaining = modifiers.to_string();

        if let Some(caps) = comment_re.captures(&remaining) {
            column.comment = Some(caps[1].replace("''", "'"));
            remaining = comment_re.replace(&remaining, " ").into_owned();
        }

        if let Some(caps) = default_re.captures(&remaining) {
            column.default_value = Some(caps[1].to_string());
            remaining = default_re.replace(&remaining, " ").into_owned();
        }

        if let Some(caps) = references_re.captures(&remaining) {
            let reference_table = unquote_identifier(&caps[1]);
            let (on_update, on_delete) = parse_actions(&caps[3]);
            let fk = ForeignKeyDefinition::new(
                format!("fk_{}_{}", self.table_name, column.name),
                vec![column.name.clone()],
                reference_table,
                parse_column_list(&caps[2]),
            )
            .with_actions(on_update, on_delete);
            self.foreign_keys.push(fk);
            remaining = references_re.replace(&remaining, " ").into_owned();
        }

        if let Some(m) = check_re.find(&remaining) {
            let start = m.start();
            let (inner, end) = group_after(&remaining, start)
                .map_err(|_| ParseError::UnbalancedParentheses {
                    context: format!("{}.{} CHECK", self.table_name, column.name),
                })?
                .unwrap_or_default();
            self.constraints.push(ConstraintDefinition::check(
                format!("chk_{}_{}", self.table_name, column.name),
                inner.trim(),
            ));
            remaining.replace_range(start..end, " ");
        }

        let upper = remaining.to_uppercase();
        let not_null_re = regex!(r"\bNOT\s+NULL\b");
        let primary_re = regex!(r"\bPRIMARY\s+KEY\b");
        let unique_re = regex!(r"\bUNIQUE\b");

        if not_null_re.is_match(&upper) {
            column.nullable = false;
        }
        if unique_re.is_match(&upper) {
            column.unique = true;
        }
        if primary_re.is_match(&upper) {
            column.mark_primary_key();
        }

        Ok(())
    }

    /// Statements outside the CREATE TABLE: indexes, ALTER TABLE, COMMENT ON
    fn statement(&mut self, stmt: &str, schema: &mut TableSchema) -> Result<(), ParseError> {
        let index_re = regex!(
            r#"(?is)^\s*CREATE\s+(UNIQUE\s+)?INDEX\s+(?:CONCURRENTLY\s+)?(?:IF\s+NOT\s+EXISTS\s+)?([`"\[\]\w.$]+)\s+ON\s+([`"\[\]\w.$]+)\s*(?:USING\s+\w+\s*)?\("#
        );
        let alter_re = regex!(r#"(?is)^\s*ALTER\s+TABLE\s+(?:ONLY\s+)?([`"\[\]\w.$]+)\s+ADD\s+(.*)$"#);
        let table_comment_re = regex!(r#"(?is)^\s*COMMENT\s+ON\s+TABLE\s+([`"\[\]\w.$]+)\s+IS\s+('(?:[^']|'')*')"#);
        let column_comment_re =
            regex!(r#"(?is)^\s*COMMENT\s+ON\s+COLUMN\s+([`"\[\]\w.$]+)\s+IS\s+('(?:[^']|'')*')"#);

        if let Some(caps) = index_re.captures(stmt) {
            let table = unquote_identifier(&caps[3]);
            if !self.is_own_table(&table) {
                tracing::debug!(table = %self.table_name, other = %table, "ignoring index on another table");
                return Ok(());
            }
            let open = caps.get(0).map(|m| m.end() - 1).unwrap_or_default();
            let close = matching_paren(stmt, open).ok_or_else(|| ParseError::UnbalancedParentheses {
                context: format!("CREATE INDEX {}", &caps[2]),
            })?;
            let columns = parse_column_list(&stmt[open + 1..close]);
            self.indexes
                .push(IndexDefinition::new(unquote_identifier(&caps[2]), columns, caps.get(1).is_some()));
            return Ok(());
        }

        if let Some(caps) = alter_re.captures(stmt) {
            let table = unquote_identifier(&caps[1]);
            if !self.is_own_table(&table) {
                tracing::debug!(table = %self.table_name, other = %table, "ignoring ALTER TABLE on another table");
                return Ok(());
            }
            let added = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            return self.table_item(added);
        }

        if let Some(caps) = table_comment_re.captures(stmt) {
            if self.is_own_table(&unquote_identifier(&caps[1])) {
                schema.logical_name = Some(unquote_literal(&caps[2]));
            }
            return Ok(());
        }

        if let Some(caps) = column_comment_re.captures(stmt) {
            let qualified = &caps[1];
            let column = unquote_identifier(qualified);
            self.column_comments.push((column, unquote_literal(&caps[2])));
            return Ok(());
        }

        tracing::debug!(table = %self.table_name, "skipping unrecognized statement");
        Ok(())
    }

    fn is_own_table(&self, table: &str) -> bool {
        table.eq_ignore_ascii_case(&self.table_name)
    }
}

/// `FOREIGN KEY (a) REFERENCES t (b) [ON DELETE x] [ON UPDATE y]`
fn parse_foreign_key(table_name: &str, name: Option<String>, body: &str) -> Option<ForeignKeyDefinition> {
    let references_re = regex!(r#"(?is)^\s*REFERENCES\s+([`"\[\]\w.$]+)\s*"#);

    let (source, end) = group_after(body, 0).ok()??;
    let columns = parse_column_list(source);

    let rest = &body[end..];
    let caps = references_re.captures(rest)?;
    let reference_table = unquote_identifier(&caps[1]);

    let after_table = caps.get(0).map(|m| m.end()).unwrap_or_default();
    let (target, target_end) = group_after(rest, after_table).ok()??;
    let reference_columns = parse_column_list(target);
    let (on_update, on_delete) = parse_actions(&rest[target_end..]);

    let name = name
        .or_else(|| index_name_before_paren(body))
        .unwrap_or_else(|| format!("fk_{}_{}", table_name, columns.join("_")));

    Some(ForeignKeyDefinition::new(name, columns, reference_table, reference_columns).with_actions(on_update, on_delete))
}

/// `ON UPDATE x` / `ON DELETE y` in either order
fn parse_actions(text: &str) -> (ReferentialAction, ReferentialAction) {
    let action_re = regex!(r"(?i)\bON\s+(UPDATE|DELETE)\s+(SET\s+NULL|NO\s+ACTION|SET\s+DEFAULT|CASCADE|RESTRICT)");

    let mut on_update = ReferentialAction::default();
    let mut on_delete = ReferentialAction::default();

    for caps in action_re.captures_iter(text) {
        let Some(action) = ReferentialAction::parse(&caps[2]) else {
            continue;
        };
        if caps[1].eq_ignore_ascii_case("UPDATE") {
            on_update = action;
        } else {
            on_delete = action;
        }
    }

    (on_update, on_delete)
}

/// `UNIQUE KEY uq_name (a)` → `uq_name`
fn index_name_before_paren(body: &str) -> Option<String> {
    let head = body.split('(').next()?;
    let name = head
        .split_whitespace()
        .filter(|word| {
            !matches!(
                word.to_uppercase().as_str(),
                "UNIQUE" | "KEY" | "INDEX" | "FOREIGN" | "PRIMARY" | "FULLTEXT" | "SPATIAL"
            )
        })
        .last()?;
    Some(unquote_identifier(name))
}

/// `) ENGINE=InnoDB COMMENT='社員マスタ'` → `社員マスタ`
fn table_option_comment(options: &str) -> Option<String> {
    let comment_re = regex!(r"(?is)\bCOMMENT\s*=?\s*('(?:[^']|'')*')");
    comment_re.captures(options).map(|caps| unquote_literal(&caps[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tableaudit_core::{ConstraintKind, TableCategory};

    const EMPLOYEE_DDL: &str = r#"
-- Generated DDL
CREATE TABLE IF NOT EXISTS MST_Employee (
    id VARCHAR(50) NOT NULL COMMENT 'Primary key',
    tenant_id VARCHAR(50) NOT NULL,
    employee_code VARCHAR(30) NOT NULL UNIQUE,
    salary DECIMAL(10,2) DEFAULT 0,
    status ENUM('ACTIVE', 'RETIRED') NOT NULL DEFAULT 'ACTIVE',
    is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    department_id VARCHAR(50),
    PRIMARY KEY (id)
) ENGINE=InnoDB COMMENT='社員マスタ';

CREATE INDEX idx_employee_tenant ON MST_Employee (tenant_id, employee_code);
CREATE UNIQUE INDEX uq_employee_code ON MST_Employee (`employee_code`);

ALTER TABLE MST_Employee ADD CONSTRAINT fk_employee_department
    FOREIGN KEY (department_id) REFERENCES MST_Department (id)
    ON UPDATE CASCADE ON DELETE SET NULL;

ALTER TABLE MST_Employee ADD CONSTRAINT chk_salary CHECK (salary >= 0 AND (salary < 100000000));
"#;

    #[test]
    fn parses_columns_and_types() {
        let schema = DdlParser::parse(EMPLOYEE_DDL).unwrap();

        assert_eq!(schema.table_name, "MST_Employee");
        assert_eq!(schema.logical_name.as_deref(), Some("社員マスタ"));
        assert_eq!(schema.category, Some(TableCategory::Master));
        assert_eq!(
            schema.column_names(),
            vec![
                "id",
                "tenant_id",
                "employee_code",
                "salary",
                "status",
                "is_deleted",
                "created_at",
                "department_id"
            ]
        );

        let salary = schema.column("salary").unwrap();
        assert_eq!(salary.data_type, "DECIMAL");
        assert_eq!(salary.precision, Some(10));
        assert_eq!(salary.scale, Some(2));
        assert_eq!(salary.length, None);
        assert!(salary.nullable);
        assert_eq!(salary.default_value.as_deref(), Some("0"));

        let status = schema.column("status").unwrap();
        assert_eq!(status.data_type, "ENUM");
        assert_eq!(status.enum_values, vec!["ACTIVE", "RETIRED"]);
        assert_eq!(status.default_value.as_deref(), Some("'ACTIVE'"));
        assert!(!status.nullable);

        let id = schema.column("id").unwrap();
        assert!(id.primary_key);
        assert!(!id.nullable);
        assert_eq!(id.comment.as_deref(), Some("Primary key"));
        assert_eq!(id.length, Some(50));

        assert!(schema.column("employee_code").unwrap().unique);
        assert_eq!(schema.primary_keys, vec!["id".to_string()]);
    }

    #[test]
    fn parses_indexes_and_constraints() {
        let schema = DdlParser::parse(EMPLOYEE_DDL).unwrap();

        assert_eq!(schema.indexes.len(), 2);
        assert_eq!(schema.indexes[0].name, "idx_employee_tenant");
        assert_eq!(schema.indexes[0].columns, vec!["tenant_id", "employee_code"]);
        assert!(!schema.indexes[0].unique);
        assert!(schema.indexes[1].unique);
        assert_eq!(schema.indexes[1].columns, vec!["employee_code"]);

        assert_eq!(schema.foreign_keys.len(), 1);
        let fk = &schema.foreign_keys[0];
        assert_eq!(fk.name, "fk_employee_department");
        assert_eq!(fk.columns, vec!["department_id"]);
        assert_eq!(fk.reference_table, "MST_Department");
        assert_eq!(fk.reference_columns, vec!["id"]);
        assert_eq!(fk.on_update, ReferentialAction::Cascade);
        assert_eq!(fk.on_delete, ReferentialAction::SetNull);

        assert_eq!(schema.constraints.len(), 1);
        assert_eq!(schema.constraints[0].name, "chk_salary");
        assert_eq!(
            schema.constraints[0].kind,
            ConstraintKind::Check {
                condition: "salary >= 0 AND (salary < 100000000)".to_string()
            }
        );
    }

    #[test]
    fn inline_table_constraints() {
        let sql = r#"
CREATE TABLE `TRN_Order` (
    `tenant_id` VARCHAR(50) NOT NULL,
    `order_no` INT NOT NULL,
    `customer_id` VARCHAR(50) NOT NULL REFERENCES MST_Customer(id) ON DELETE CASCADE,
    `amount` NUMERIC(12, 2) CHECK (amount > 0),
    CONSTRAINT pk_order PRIMARY KEY (`tenant_id`, `order_no`),
    UNIQUE KEY uq_order_customer (customer_id, order_no),
    KEY idx_order_customer (customer_id),
    CONSTRAINT fk_order_tenant FOREIGN KEY (tenant_id) REFERENCES MST_Tenant (tenant_id) ON DELETE RESTRICT ON UPDATE CASCADE
);
"#;
        let schema = DdlParser::parse(sql).unwrap();

        assert_eq!(schema.table_name, "TRN_Order");
        assert_eq!(schema.primary_keys, vec!["tenant_id", "order_no"]);
        assert!(!schema.column("order_no").unwrap().nullable);

        let amount = schema.column("amount").unwrap();
        assert_eq!(amount.data_type, "NUMERIC");
        assert_eq!((amount.precision, amount.scale), (Some(12), Some(2)));

        assert_eq!(schema.foreign_keys.len(), 2);
        let inline = &schema.foreign_keys[0];
        assert_eq!(inline.reference_table, "MST_Customer");
        assert_eq!(inline.on_delete, ReferentialAction::Cascade);
        assert_eq!(inline.on_update, ReferentialAction::NoAction);
        let tenant = &schema.foreign_keys[1];
        assert_eq!(tenant.name, "fk_order_tenant");
        assert_eq!(tenant.on_delete, ReferentialAction::Restrict);
        assert_eq!(tenant.on_update, ReferentialAction::Cascade);

        assert_eq!(schema.indexes.len(), 1);
        assert_eq!(schema.indexes[0].name, "idx_order_customer");

        let unique = schema
            .constraints
            .iter()
            .find(|c| c.name == "uq_order_customer")
            .unwrap();
        assert_eq!(
            unique.kind,
            ConstraintKind::Unique {
                columns: vec!["customer_id".to_string(), "order_no".to_string()]
            }
        );
        assert!(schema.constraints.iter().any(|c| c.name == "chk_TRN_Order_amount"));
    }

    #[test]
    fn postgres_comments() {
        let sql = r#"
CREATE TABLE his_login (id BIGSERIAL PRIMARY KEY, user_id VARCHAR(50));
COMMENT ON TABLE his_login IS 'Login history';
COMMENT ON COLUMN his_login.user_id IS 'User''s id';
"#;
        let schema = DdlParser::parse(sql).unwrap();
        assert_eq!(schema.logical_name.as_deref(), Some("Login history"));
        assert_eq!(schema.column("user_id").unwrap().comment.as_deref(), Some("User's id"));
        assert_eq!(schema.primary_keys, vec!["id"]);
    }

    #[test]
    fn missing_create_table() {
        let err = DdlParser::parse("CREATE INDEX idx ON t (a);").unwrap_err();
        assert_eq!(err, ParseError::MissingCreateTable);
    }

    #[test]
    fn unbalanced_body() {
        let err = DdlParser::parse("CREATE TABLE t (a DECIMAL(10,2)").unwrap_err();
        assert!(matches!(err, ParseError::UnbalancedParentheses { .. }));
    }

    #[test]
    fn parsing_is_idempotent() {
        let first = DdlParser::parse(EMPLOYEE_DDL).unwrap();
        let second = DdlParser::parse(EMPLOYEE_DDL).unwrap();
        assert_eq!(first, second);
    }
}
