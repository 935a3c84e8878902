//! Pattern-based `CREATE TABLE` parser (spec.md §4.3). Not a full SQL
//! grammar: it recognizes the shapes `SHOW CREATE TABLE` actually emits on
//! MariaDB/MySQL, tolerating (by skipping) clauses it doesn't model, such
//! as inline `CHECK (...)`.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;
use crate::normalize::normalize_ddl;
use crate::table::{
    Column, ForeignKey, ForeignKeyAction, Index, IndexColumn, IndexKind, Table, TableOptions,
};

static CREATE_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^create\s+table\s+(?:if\s+not\s+exists\s+)?`(?P<name>(?:[^`]|``)+)`\s*\(")
        .unwrap()
});

static ENGINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"engine\s*=\s*([A-Za-z0-9_]+)").unwrap());
static CHARSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:default\s+)?charset\s*=\s*([A-Za-z0-9_]+)").unwrap());
static COLLATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"collate\s*=\s*([A-Za-z0-9_]+)").unwrap());
static COMMENT_OPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"comment\s*=\s*'((?:[^']|'')*)'").unwrap());

/// Parses a `SHOW CREATE TABLE` string into the structured model.
pub fn parse_create_table(ddl: &str) -> Result<Table, ParseError> {
    let table_name_guess = guess_table_name(ddl);
    let err = |message: &str| ParseError {
        table: table_name_guess.clone(),
        message: message.to_string(),
    };

    let normalized = normalize_ddl(ddl);
    let header = CREATE_TABLE_RE
        .captures(&normalized)
        .ok_or_else(|| err("missing CREATE TABLE header"))?;
    let name = unescape_backticks(&header["name"]);
    let open_paren = header.get(0).unwrap().end() - 1;
    let close_paren =
        find_matching_paren(&normalized, open_paren).ok_or_else(|| err("unbalanced parentheses"))?;

    let body = &normalized[open_paren + 1..close_paren];
    let options_text = normalized[close_paren + 1..].trim_end_matches(';').trim();

    let mut columns = Vec::new();
    let mut indexes = BTreeMap::new();
    let mut foreign_keys = BTreeMap::new();

    for item in split_top_level(body, ',') {
        let lower = item.to_ascii_lowercase();
        if lower.starts_with("primary key") {
            let index = parse_index_clause(&item, IndexKind::Primary).map_err(|message| err(&message))?;
            indexes.insert(index.name.clone(), index);
        } else if lower.starts_with("unique key") || lower.starts_with("unique index") {
            let index = parse_index_clause(&item, IndexKind::Unique).map_err(|message| err(&message))?;
            indexes.insert(index.name.clone(), index);
        } else if lower.starts_with("fulltext key") || lower.starts_with("fulltext index") {
            let index = parse_index_clause(&item, IndexKind::Fulltext).map_err(|message| err(&message))?;
            indexes.insert(index.name.clone(), index);
        } else if lower.starts_with("key ") || lower.starts_with("index ") || lower == "key" {
            let index = parse_index_clause(&item, IndexKind::Key).map_err(|message| err(&message))?;
            indexes.insert(index.name.clone(), index);
        } else if lower.starts_with("constraint") || lower.starts_with("foreign key") {
            if let Some(fk) = parse_foreign_key(&item).map_err(|message| err(&message))? {
                foreign_keys.insert(fk.name.clone(), fk);
            }
            // `CONSTRAINT name CHECK (...)` returns None — tolerated, not modeled.
        } else if lower.starts_with("check") {
            // Table-level CHECK (...): recognized so it doesn't get
            // misparsed as a column, not modeled in the diffable structure.
        } else {
            columns.push(parse_column(&item).map_err(|message| err(&message))?);
        }
    }

    Ok(Table {
        name,
        columns,
        indexes,
        foreign_keys,
        options: parse_table_options(options_text),
    })
}

fn guess_table_name(ddl: &str) -> String {
    CREATE_TABLE_RE
        .captures(ddl)
        .map(|c| unescape_backticks(&c["name"]))
        .unwrap_or_else(|| "<unknown>".to_string())
}

fn unescape_backticks(name: &str) -> String {
    name.replace("``", "`")
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        value[1..value.len() - 1].replace("''", "'")
    } else {
        value.to_string()
    }
}

/// Returns the byte index of the `)` matching the `(` at `open_byte_idx`,
/// skipping characters inside `'...'` and `` `...` `` spans (doubled quotes
/// escape themselves inside both).
fn find_matching_paren(s: &str, open_byte_idx: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_squote = false;
    let mut in_btick = false;
    let mut chars = s[open_byte_idx..].char_indices();
    while let Some((rel_idx, c)) = chars.next() {
        let idx = open_byte_idx + rel_idx;
        if in_squote {
            if c == '\'' {
                if s[idx + 1..].starts_with('\'') {
                    chars.next();
                } else {
                    in_squote = false;
                }
            }
            continue;
        }
        if in_btick {
            if c == '`' {
                if s[idx + 1..].starts_with('`') {
                    chars.next();
                } else {
                    in_btick = false;
                }
            }
            continue;
        }
        match c {
            '\'' => in_squote = true,
            '`' => in_btick = true,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits on `sep` at paren-depth 0, outside quotes. Used both for the
/// table body (comma-separated column/index/FK clauses) and for
/// comma-separated name lists inside a single clause's parens.
fn split_top_level(text: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut in_squote = false;
    let mut in_btick = false;
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if in_squote {
            current.push(c);
            if c == '\'' {
                if chars.get(i + 1) == Some(&'\'') {
                    current.push('\'');
                    i += 1;
                } else {
                    in_squote = false;
                }
            }
            i += 1;
            continue;
        }
        if in_btick {
            current.push(c);
            if c == '`' {
                if chars.get(i + 1) == Some(&'`') {
                    current.push('`');
                    i += 1;
                } else {
                    in_btick = false;
                }
            }
            i += 1;
            continue;
        }
        match c {
            '\'' => {
                in_squote = true;
                current.push(c);
            }
            '`' => {
                in_btick = true;
                current.push(c);
            }
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth -= 1;
                current.push(c);
            }
            other if other == sep && depth == 0 => {
                parts.push(current.trim().to_string());
                current = String::new();
            }
            other => current.push(other),
        }
        i += 1;
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

/// Splits on whitespace at paren-depth 0, outside quotes — so
/// `enum('a', 'b,c')` and `'a value with spaces'` each stay one token.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut in_squote = false;
    let mut in_btick = false;
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if in_squote {
            current.push(c);
            if c == '\'' {
                if chars.get(i + 1) == Some(&'\'') {
                    current.push('\'');
                    i += 1;
                } else {
                    in_squote = false;
                }
            }
            i += 1;
            continue;
        }
        if in_btick {
            current.push(c);
            if c == '`' {
                if chars.get(i + 1) == Some(&'`') {
                    current.push('`');
                    i += 1;
                } else {
                    in_btick = false;
                }
            }
            i += 1;
            continue;
        }
        match c {
            '\'' => {
                in_squote = true;
                current.push(c);
            }
            '`' => {
                in_btick = true;
                current.push(c);
            }
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth -= 1;
                current.push(c);
            }
            other if other.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            other => current.push(other),
        }
        i += 1;
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Takes a leading `` `name` `` (handling `` `` `` as an escaped backtick)
/// and returns it along with the trimmed remainder.
fn take_backtick_name(s: &str) -> Option<(String, &str)> {
    let s = s.trim_start();
    if !s.starts_with('`') {
        return None;
    }
    let close = find_matching_backtick(s, 0)?;
    let name = unescape_backticks(&s[1..close]);
    Some((name, s[close + 1..].trim_start()))
}

fn find_matching_backtick(s: &str, open_byte_idx: usize) -> Option<usize> {
    let mut chars = s[open_byte_idx + 1..].char_indices();
    while let Some((rel_idx, c)) = chars.next() {
        let idx = open_byte_idx + 1 + rel_idx;
        if c == '`' {
            if s[idx + 1..].starts_with('`') {
                chars.next();
            } else {
                return Some(idx);
            }
        }
    }
    None
}

/// Takes a leading `(...)` group (balanced) and returns its inner text
/// along with the trimmed remainder after the closing paren.
fn take_paren_group(s: &str) -> Option<(String, &str)> {
    let s = s.trim_start();
    if !s.starts_with('(') {
        return None;
    }
    let close = find_matching_paren(s, 0)?;
    Some((s[1..close].to_string(), s[close + 1..].trim_start()))
}

fn parse_index_clause(item: &str, kind: IndexKind) -> Result<Index, String> {
    let lower = item.to_ascii_lowercase();
    let prefix_len = match kind {
        IndexKind::Primary => "primary key".len(),
        IndexKind::Unique => {
            if lower.starts_with("unique key") {
                "unique key".len()
            } else {
                "unique index".len()
            }
        }
        IndexKind::Fulltext => {
            if lower.starts_with("fulltext key") {
                "fulltext key".len()
            } else {
                "fulltext index".len()
            }
        }
        IndexKind::Key => {
            if lower.starts_with("key") {
                "key".len()
            } else {
                "index".len()
            }
        }
    };
    let rest = item[prefix_len..].trim_start();

    let (name, rest) = if matches!(kind, IndexKind::Primary) {
        ("PRIMARY".to_string(), rest)
    } else {
        take_backtick_name(rest).ok_or("index clause missing a quoted name")?
    };

    let (columns_text, rest) = take_paren_group(rest).ok_or("index clause missing column list")?;
    let columns = split_top_level(&columns_text, ',')
        .iter()
        .map(|piece| parse_index_column(piece))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Index {
        name,
        kind,
        columns,
        options: rest.trim().to_string(),
    })
}

fn parse_index_column(piece: &str) -> Result<IndexColumn, String> {
    let (name, rest) = take_backtick_name(piece).ok_or("index column missing a quoted name")?;
    let prefix_length = if rest.trim_start().starts_with('(') {
        let (len_text, _rest) = take_paren_group(rest).ok_or("malformed prefix length")?;
        Some(
            len_text
                .trim()
                .parse::<u32>()
                .map_err(|_| "non-numeric prefix length".to_string())?,
        )
    } else {
        None
    };
    Ok(IndexColumn { name, prefix_length })
}

fn parse_foreign_key(item: &str) -> Result<Option<ForeignKey>, String> {
    let mut rest = item;
    let lower_full = item.to_ascii_lowercase();
    let name = if lower_full.starts_with("constraint") {
        rest = rest["constraint".len()..].trim_start();
        let (n, r) = take_backtick_name(rest).ok_or("constraint clause missing a quoted name")?;
        rest = r;
        n
    } else {
        String::new()
    };

    if rest.to_ascii_lowercase().starts_with("check") {
        return Ok(None);
    }
    if !rest.to_ascii_lowercase().starts_with("foreign key") {
        return Err("constraint clause is neither FOREIGN KEY nor CHECK".to_string());
    }
    rest = rest["foreign key".len()..].trim_start();

    let (local_text, rest_after_local) = take_paren_group(rest).ok_or("foreign key missing local column list")?;
    let local_columns = parse_name_list(&local_text)?;

    let rest = rest_after_local.trim_start();
    if !rest.to_ascii_lowercase().starts_with("references") {
        return Err("foreign key missing REFERENCES clause".to_string());
    }
    let rest = rest["references".len()..].trim_start();
    let (ref_table, rest) = take_backtick_name(rest).ok_or("foreign key REFERENCES missing a quoted table name")?;
    let (ref_text, rest) = take_paren_group(rest).ok_or("foreign key missing referenced column list")?;
    let ref_columns = parse_name_list(&ref_text)?;

    let tail = rest.to_ascii_lowercase();
    let on_delete = extract_on_clause(&tail, "on delete");
    let on_update = extract_on_clause(&tail, "on update");

    Ok(Some(ForeignKey {
        name,
        local_columns,
        ref_table,
        ref_columns,
        on_delete,
        on_update,
    }))
}

fn parse_name_list(text: &str) -> Result<Vec<String>, String> {
    split_top_level(text, ',')
        .iter()
        .map(|piece| {
            take_backtick_name(piece)
                .map(|(name, _)| name)
                .ok_or_else(|| "expected a quoted column name".to_string())
        })
        .collect()
}

fn extract_on_clause(lowercased_tail: &str, prefix: &str) -> ForeignKeyAction {
    let Some(idx) = lowercased_tail.find(prefix) else {
        return ForeignKeyAction::Restrict;
    };
    let after = lowercased_tail[idx + prefix.len()..].trim_start();
    for (keyword, action) in [
        ("set null", ForeignKeyAction::SetNull),
        ("set default", ForeignKeyAction::SetDefault),
        ("no action", ForeignKeyAction::NoAction),
        ("cascade", ForeignKeyAction::Cascade),
        ("restrict", ForeignKeyAction::Restrict),
    ] {
        if after.starts_with(keyword) {
            return action;
        }
    }
    ForeignKeyAction::Restrict
}

fn parse_column(item: &str) -> Result<Column, String> {
    let (name, rest) = take_backtick_name(item).ok_or("column definition missing a quoted name")?;
    let tokens = tokenize(rest);
    let mut iter = tokens.iter();
    let mut data_type = iter
        .next()
        .ok_or("column definition missing a type")?
        .clone();
    let mut tokens_rest: Vec<&String> = iter.collect();

    while let Some(first) = tokens_rest.first() {
        let lower = first.to_ascii_lowercase();
        if lower == "unsigned" || lower == "zerofill" || lower == "signed" {
            data_type.push(' ');
            data_type.push_str(first);
            tokens_rest.remove(0);
        } else {
            break;
        }
    }

    let mut nullable = true;
    let mut default: Option<String> = None;
    let mut comment: Option<String> = None;
    let mut extra_parts: Vec<String> = Vec::new();

    let mut i = 0;
    while i < tokens_rest.len() {
        let lower = tokens_rest[i].to_ascii_lowercase();
        match lower.as_str() {
            "not" if next_is(&tokens_rest, i, "null") => {
                nullable = false;
                i += 2;
            }
            "null" => {
                nullable = true;
                i += 1;
            }
            "default" => {
                if let Some(value) = tokens_rest.get(i + 1) {
                    default = Some((*value).clone());
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "on" if next_is(&tokens_rest, i, "update") => {
                if let Some(value) = tokens_rest.get(i + 2) {
                    extra_parts.push(format!("ON UPDATE {value}"));
                    i += 3;
                } else {
                    i += 2;
                }
            }
            "auto_increment" => {
                extra_parts.push("AUTO_INCREMENT".to_string());
                i += 1;
            }
            "comment" => {
                if let Some(value) = tokens_rest.get(i + 1) {
                    comment = Some(unquote(value));
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "character" if next_is(&tokens_rest, i, "set") => {
                if let Some(value) = tokens_rest.get(i + 2) {
                    extra_parts.push(format!("CHARACTER SET {value}"));
                    i += 3;
                } else {
                    i += 2;
                }
            }
            "collate" => {
                if let Some(value) = tokens_rest.get(i + 1) {
                    extra_parts.push(format!("COLLATE {value}"));
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "generated" if next_is(&tokens_rest, i, "always") => {
                if tokens_rest
                    .get(i + 2)
                    .map(|t| t.eq_ignore_ascii_case("as"))
                    .unwrap_or(false)
                {
                    if let Some(expr) = tokens_rest.get(i + 3) {
                        let mode = tokens_rest.get(i + 4).filter(|t| {
                            t.eq_ignore_ascii_case("stored") || t.eq_ignore_ascii_case("virtual")
                        });
                        // Keywords around `expr` are canonicalized to
                        // uppercase; `expr` itself is left byte-for-byte so
                        // quoted literals inside it (§8's generated-column
                        // boundary case) survive re-rendering unchanged.
                        let mut clause = format!("GENERATED ALWAYS AS {expr}");
                        if let Some(mode) = mode {
                            clause.push(' ');
                            clause.push_str(&mode.to_ascii_uppercase());
                            i += 5;
                        } else {
                            i += 4;
                        }
                        extra_parts.push(clause);
                    } else {
                        i += 3;
                    }
                } else {
                    i += 1;
                }
            }
            "check" => {
                // Inline CHECK (...): recognized, not modeled.
                i += 1;
                if tokens_rest.get(i).map(|t| t.starts_with('(')).unwrap_or(false) {
                    i += 1;
                }
            }
            "unique" => {
                i += 1;
                if next_is(&tokens_rest, i - 1, "key") {
                    i += 1;
                }
            }
            "primary" => {
                i += 1;
                if next_is(&tokens_rest, i - 1, "key") {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }

    Ok(Column {
        name,
        data_type,
        nullable,
        default,
        extra: extra_parts.join(" "),
        comment,
    })
}

fn next_is(tokens: &[&String], i: usize, word: &str) -> bool {
    tokens.get(i + 1).map(|t| t.eq_ignore_ascii_case(word)).unwrap_or(false)
}

fn parse_table_options(options_text: &str) -> TableOptions {
    TableOptions {
        engine: ENGINE_RE
            .captures(options_text)
            .map(|c| c[1].to_string()),
        default_charset: CHARSET_RE
            .captures(options_text)
            .map(|c| c[1].to_string()),
        collate: COLLATE_RE
            .captures(options_text)
            .map(|c| c[1].to_string()),
        comment: COMMENT_OPTION_RE
            .captures(options_text)
            .map(|c| c[1].replace("''", "'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_table() {
        let table = parse_create_table(
            "CREATE TABLE `t` (\n  `id` int(11) NOT NULL AUTO_INCREMENT,\n  `a` int(11) DEFAULT NULL,\n  PRIMARY KEY (`id`)\n) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
        )
        .unwrap();
        assert_eq!(table.name, "t");
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[0].name, "id");
        assert!(!table.columns[0].nullable);
        assert_eq!(table.columns[0].extra, "AUTO_INCREMENT");
        assert!(table.indexes.contains_key("PRIMARY"));
        assert_eq!(table.options.engine.as_deref(), Some("InnoDB"));
        assert_eq!(table.options.default_charset.as_deref(), Some("utf8mb4"));
    }

    #[test]
    fn parses_enum_with_comma_in_member() {
        let table = parse_create_table(
            "CREATE TABLE `t` (\n  `kind` enum('a','b,c') NOT NULL DEFAULT 'a'\n) ENGINE=InnoDB",
        )
        .unwrap();
        assert_eq!(table.columns[0].data_type, "enum('a','b,c')");
        assert_eq!(table.columns[0].default.as_deref(), Some("'a'"));
    }

    #[test]
    fn parses_foreign_key_with_actions() {
        let table = parse_create_table(
            "CREATE TABLE `payments` (\n  `customerNumber` int(11) NOT NULL,\n  CONSTRAINT `payments_ibfk_1` FOREIGN KEY (`customerNumber`) REFERENCES `customers` (`customerNumber`) ON DELETE CASCADE\n) ENGINE=InnoDB",
        )
        .unwrap();
        let fk = table.foreign_key("payments_ibfk_1").unwrap();
        assert_eq!(fk.ref_table, "customers");
        assert_eq!(fk.on_delete, ForeignKeyAction::Cascade);
        assert_eq!(fk.on_update, ForeignKeyAction::Restrict);
    }

    #[test]
    fn tolerates_check_constraint() {
        let table = parse_create_table(
            "CREATE TABLE `t` (\n  `age` int(11) NOT NULL CHECK (`age` >= 0),\n  CHECK (`age` < 150)\n) ENGINE=InnoDB",
        )
        .unwrap();
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.columns[0].name, "age");
    }

    #[test]
    fn parses_composite_unique_key_with_prefix_length() {
        let table = parse_create_table(
            "CREATE TABLE `t` (\n  `a` varchar(50) NOT NULL,\n  `b` varchar(50) NOT NULL,\n  UNIQUE KEY `a_b` (`a`(10),`b`) USING BTREE\n) ENGINE=InnoDB",
        )
        .unwrap();
        let index = table.index("a_b").unwrap();
        assert_eq!(index.kind, IndexKind::Unique);
        assert_eq!(index.columns[0].prefix_length, Some(10));
        assert_eq!(index.columns[1].prefix_length, None);
        assert_eq!(index.options, "using btree");
    }
}
