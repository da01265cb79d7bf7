//! Quote-aware text scanning shared by the SQL parsing code
//!
//! Regexes cannot match nested parentheses (`DECIMAL(10,2)` inside a
//! `CREATE TABLE (...)` body), so groups are isolated with a depth counter
//! first and regexes only ever see already-isolated substrings.

/// Compile a static regex once
///
/// Expands to `&'static regex::Regex`; the calling crate depends on `regex`.
#[macro_export]
macro_rules! regex {
    ($pattern:expr) => {{
        static RE: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
        RE.get_or_init(|| ::regex::Regex::new($pattern).expect("static regex is valid"))
    }};
}

/// Remove `-- line` and `/* block */` comments outside string literals
pub fn strip_sql_comments(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(open) = quote {
            out.push(c);
            if c == open {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                out.push(c);
            }
            '-' if chars.peek() == Some(&'-') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out
}

/// Split on `sep` at parenthesis depth zero, outside quotes.
///
/// Pieces are trimmed; empty pieces are dropped.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (idx, c) in text.char_indices() {
        if let Some(open) = quote {
            if c == open {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                pieces.push(text[start..idx].trim());
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }

    pieces.push(text[start..].trim());
    pieces.retain(|p| !p.is_empty());
    pieces
}

/// Given the byte index of an opening `(`, return the index of its match
pub fn matching_paren(text: &str, open: usize) -> Option<usize> {
    if text.as_bytes().get(open) != Some(&b'(') {
        return None;
    }

    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (idx, c) in text[open..].char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }

    None
}

/// The balanced group starting at the first `(` at or after `from`.
///
/// Returns the inner text and the byte index just past the closing `)`.
/// `Err(())` means an opening parenthesis was found but never closed.
pub fn group_after(text: &str, from: usize) -> Result<Option<(&str, usize)>, ()> {
    let Some(rel) = text.get(from..).and_then(|rest| rest.find('(')) else {
        return Ok(None);
    };
    let open = from + rel;
    let close = matching_paren(text, open).ok_or(())?;
    Ok(Some((&text[open + 1..close], close + 1)))
}

/// Strip identifier quoting and any schema qualifier: `` `db`.`t` `` → `t`
pub fn unquote_identifier(ident: &str) -> String {
    let last = ident.trim().rsplit('.').next().unwrap_or_default();
    last.trim_matches(|c| matches!(c, '`' | '"' | '[' | ']')).to_string()
}

/// Parse `(a, b DESC, c(10))` contents into `["a", "b", "c"]`
pub fn parse_column_list(inner: &str) -> Vec<String> {
    split_top_level(inner, ',')
        .into_iter()
        .filter_map(|item| {
            let name = item.split(|c: char| c.is_whitespace() || c == '(').next()?;
            let name = unquote_identifier(name);
            (!name.is_empty()).then_some(name)
        })
        .collect()
}

/// Strip one level of quotes from a SQL string literal, unescaping `''`
pub fn unquote_literal(literal: &str) -> String {
    let literal = literal.trim();
    if literal.len() >= 2 && literal.starts_with('\'') && literal.ends_with('\'') {
        literal[1..literal.len() - 1].replace("''", "'")
    } else {
        literal.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_are_removed_outside_strings() {
        let sql = "a -- comment\nb /* block */ c 'x -- not a comment'";
        let stripped = strip_sql_comments(sql);
        assert!(stripped.contains("a \nb"));
        assert!(!stripped.contains("block"));
        assert!(stripped.contains("'x -- not a comment'"));
    }

    #[test]
    fn top_level_split_ignores_nested_commas() {
        let body = "id INT, price DECIMAL(10,2), status ENUM('a,b','c'), PRIMARY KEY (id)";
        let parts = split_top_level(body, ',');
        assert_eq!(
            parts,
            vec!["id INT", "price DECIMAL(10,2)", "status ENUM('a,b','c')", "PRIMARY KEY (id)"]
        );
    }

    #[test]
    fn matching_paren_handles_nesting_and_quotes() {
        let text = "(a DECIMAL(10,2), b ENUM(')'))x";
        let close = matching_paren(text, 0).unwrap();
        assert_eq!(&text[close + 1..], "x");
    }

    #[test]
    fn unbalanced_group_is_an_error() {
        assert!(group_after("CREATE TABLE t (a INT", 0).is_err());
        assert_eq!(group_after("no parens", 0), Ok(None));
    }

    #[test]
    fn column_lists() {
        assert_eq!(
            parse_column_list("`tenant_id`, name(20) DESC, \"code\""),
            vec!["tenant_id", "name", "code"]
        );
        assert_eq!(unquote_identifier("`app`.`MST_Foo`"), "MST_Foo");
    }

    #[test]
    fn literals() {
        assert_eq!(unquote_literal("'it''s'"), "it's");
        assert_eq!(unquote_literal("0"), "0");
    }

    #[test]
    fn static_regex_is_compiled_once() {
        let digits = || crate::regex!(r"^\d+$");
        assert!(std::ptr::eq(digits(), digits()));
        assert!(digits().is_match("42"));
    }
}
