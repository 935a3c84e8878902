//! SQL Serializer (spec.md §4.8): everything concerned with turning a
//! [`crate::plan::Plan`] and its pieces into text — quoting, delimiter
//! wrapping, headers, footers, section banners.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::ObjectKind;
use crate::plan::{Plan, PlanItem};
use crate::table::{Column, ForeignKey, ForeignKeyAction, Index, IndexKind};

#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[must_use]
pub fn qualify(schema: &str, name: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(name))
}

static QUALIFY_CREATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)(create\s+(?:or\s+replace\s+)?(?:definer\s*=\s*`(?:[^`]|``)+`@`(?:[^`]|``)+`\s+)?(?:table|view|procedure|function|trigger|event|sequence)\s+(?:if\s+not\s+exists\s+)?)(`(?:[^`]|``)+`)",
    )
    .unwrap()
});

/// Rewrites a bare `CREATE <KIND> \`name\` ...` statement to qualify the
/// object with `schema` — §4.6's "emit the source DDL as-is (with the
/// target schema qualifier)".
#[must_use]
pub fn qualify_create_ddl(ddl: &str, schema: &str) -> String {
    QUALIFY_CREATE_RE
        .replace(ddl, |caps: &regex::Captures| {
            format!("{}{}.{}", &caps[1], quote_ident(schema), &caps[2])
        })
        .into_owned()
}

#[must_use]
pub fn render_column(column: &Column) -> String {
    let mut out = format!("{} {}", quote_ident(&column.name), column.data_type);
    if column.nullable {
        out.push_str(" NULL");
    } else {
        out.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default {
        out.push_str(" DEFAULT ");
        out.push_str(default);
    }
    if !column.extra.is_empty() {
        // `extra`'s keywords are already canonicalized to uppercase at parse
        // time (`crate::parser`); blindly uppercasing here would corrupt a
        // generated column's expression, e.g. turning the string literal
        // `' - active'` inside a `GENERATED ALWAYS AS (...)` into
        // `' - ACTIVE'` and silently changing its computed value.
        out.push(' ');
        out.push_str(&column.extra);
    }
    if let Some(comment) = &column.comment {
        out.push_str(" COMMENT '");
        out.push_str(&comment.replace('\'', "''"));
        out.push('\'');
    }
    out
}

#[must_use]
pub fn render_index_clause(index: &Index) -> String {
    let columns = render_index_columns(&index.columns);
    let mut out = match index.kind {
        IndexKind::Primary => format!("PRIMARY KEY ({columns})"),
        IndexKind::Unique => format!("UNIQUE KEY {} ({columns})", quote_ident(&index.name)),
        IndexKind::Key => format!("KEY {} ({columns})", quote_ident(&index.name)),
        IndexKind::Fulltext => format!("FULLTEXT KEY {} ({columns})", quote_ident(&index.name)),
    };
    if !index.options.is_empty() {
        out.push(' ');
        out.push_str(&uppercase_outside_quotes(&index.options));
    }
    out
}

/// Uppercases ASCII letters outside `'...'` spans, so trailing index options
/// like `USING BTREE` canonicalize while a literal inside `COMMENT '...'`
/// survives untouched.
fn uppercase_outside_quotes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_squote = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_squote {
            out.push(c);
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    out.push(chars.next().unwrap());
                } else {
                    in_squote = false;
                }
            }
            continue;
        }
        if c == '\'' {
            in_squote = true;
            out.push(c);
        } else {
            out.push(c.to_ascii_uppercase());
        }
    }
    out
}

fn render_index_columns(columns: &[crate::table::IndexColumn]) -> String {
    columns
        .iter()
        .map(|c| match c.prefix_length {
            Some(len) => format!("{}({len})", quote_ident(&c.name)),
            None => quote_ident(&c.name),
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[must_use]
pub fn render_foreign_key_clause(fk: &ForeignKey) -> String {
    let local = fk.local_columns.iter().map(|c| quote_ident(c)).collect::<Vec<_>>().join(",");
    let refs = fk.ref_columns.iter().map(|c| quote_ident(c)).collect::<Vec<_>>().join(",");
    let mut out = format!(
        "CONSTRAINT {} FOREIGN KEY ({local}) REFERENCES {} ({refs})",
        quote_ident(&fk.name),
        quote_ident(&fk.ref_table)
    );
    if fk.on_delete != ForeignKeyAction::Restrict {
        out.push_str(" ON DELETE ");
        out.push_str(fk.on_delete.keyword());
    }
    if fk.on_update != ForeignKeyAction::Restrict {
        out.push_str(" ON UPDATE ");
        out.push_str(fk.on_update.keyword());
    }
    out
}

#[must_use]
pub fn drop_object_sql(kind: ObjectKind, schema: &str, name: &str) -> String {
    let keyword = match kind {
        ObjectKind::Table => "TABLE",
        ObjectKind::View => "VIEW",
        ObjectKind::Procedure => "PROCEDURE",
        ObjectKind::Function => "FUNCTION",
        ObjectKind::Trigger => "TRIGGER",
        ObjectKind::Event => "EVENT",
        ObjectKind::Sequence => "SEQUENCE",
    };
    format!("DROP {keyword} IF EXISTS {};", qualify(schema, name))
}

const SECTION_TITLES: [(ObjectKind, &str); 7] = [
    (ObjectKind::Table, "TABLES"),
    (ObjectKind::Procedure, "PROCEDURES"),
    (ObjectKind::Function, "FUNCTIONS"),
    (ObjectKind::Trigger, "TRIGGERS"),
    (ObjectKind::Event, "EVENTS"),
    (ObjectKind::View, "VIEWS"),
    (ObjectKind::Sequence, "SEQUENCES"),
];

#[must_use]
pub fn section_title(kind: ObjectKind) -> &'static str {
    SECTION_TITLES.iter().find(|(k, _)| *k == kind).map(|(_, title)| *title).unwrap()
}

/// Renders a full plan: header, section banners in the plan's own order,
/// `FOREIGN_KEY_CHECKS` wrapper, footer (§4.8, §6).
#[must_use]
pub fn render_plan(plan: &Plan, source_schema: &str, dest_schema: &str, generated_at: &str) -> String {
    let mut out = String::new();
    out.push_str("-- ===================================================================\n");
    out.push_str(&format!("-- Migration script generated {generated_at}\n"));
    out.push_str(&format!("-- Source schema:      {source_schema}\n"));
    out.push_str(&format!("-- Destination schema: {dest_schema}\n"));
    out.push_str("-- Review before executing against a production database.\n");
    out.push_str("-- ===================================================================\n\n");
    out.push_str("SET FOREIGN_KEY_CHECKS = 0;\n\n");

    for section in &plan.sections {
        out.push_str(&format!("-- {} CHANGES\n", section.title));
        for item in &section.items {
            render_item(&mut out, item);
        }
        out.push('\n');
    }

    out.push_str("SET FOREIGN_KEY_CHECKS = 1;\n\n");
    out.push_str("-- script completed.\n");
    out
}

fn render_item(out: &mut String, item: &PlanItem) {
    match item {
        PlanItem::Statement { sql, comment } => {
            if let Some(comment) = comment {
                out.push_str(&format!("-- {comment}\n"));
            }
            out.push_str(sql);
            if !sql.ends_with('\n') {
                out.push('\n');
            }
        }
        PlanItem::DelimitedStatement { sql, comment } => {
            if let Some(comment) = comment {
                out.push_str(&format!("-- {comment}\n"));
            }
            out.push_str("DELIMITER $$\n");
            out.push_str(sql.trim_end().trim_end_matches(';'));
            out.push_str("$$\n");
            out.push_str("DELIMITER ;\n");
        }
        PlanItem::Comment(text) => {
            out.push_str(&format!("-- {text}\n"));
        }
    }
}
