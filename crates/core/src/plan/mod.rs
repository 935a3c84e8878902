//! Migration planning (spec.md §4.6, §4.7): turns a [`crate::diff::Diff`]
//! into an ordered list of SQL statements, as a [`Plan`] the serializer
//! (`crate::render`) then renders to text.

mod forward;
mod reverse;

pub use forward::build_forward_plan;
pub use reverse::build_reverse_plan;

use crate::diff::TableChange;
use crate::ir::ObjectKind;
use crate::render::{
    drop_object_sql, quote_ident, render_column, render_foreign_key_clause, render_index_clause, qualify,
};
use crate::table::OptionKey;

/// Section order the forward planner uses (§4.6); the reverse planner uses
/// this reversed (§4.7).
pub const FORWARD_SECTION_ORDER: [ObjectKind; 7] = [
    ObjectKind::Table,
    ObjectKind::Procedure,
    ObjectKind::Function,
    ObjectKind::Trigger,
    ObjectKind::Event,
    ObjectKind::View,
    ObjectKind::Sequence,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanItem {
    /// A plain, semicolon-terminated statement.
    Statement { sql: String, comment: Option<String> },
    /// A stored-code body that needs `DELIMITER $$ ... $$ DELIMITER ;`
    /// wrapping (§4.8). `sql` is the bare `CREATE ...` text, without a
    /// trailing `;`.
    DelimitedStatement { sql: String, comment: Option<String> },
    /// A diagnostic-only line with no executable SQL (§7: opaque-table
    /// parser-failure fallback).
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub items: Vec<PlanItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub sections: Vec<Section>,
}

fn statement(sql: String, comment: String) -> PlanItem {
    PlanItem::Statement {
        sql,
        comment: Some(comment),
    }
}

fn ensure_trailing_semicolon(sql: String) -> String {
    if sql.trim_end().ends_with(';') {
        sql
    } else {
        format!("{sql};")
    }
}

/// Builds the `CREATE ...` plan item(s) for an object of `kind`, qualifying
/// it into `schema` and wrapping with `DELIMITER $$` when the kind needs it.
fn create_object_items(kind: ObjectKind, ddl: &str, schema: &str, comment: String) -> Vec<PlanItem> {
    let qualified = crate::render::qualify_create_ddl(ddl, schema);
    if kind.uses_delimiter_block() {
        vec![PlanItem::DelimitedStatement {
            sql: qualified,
            comment: Some(comment),
        }]
    } else {
        vec![PlanItem::Statement {
            sql: ensure_trailing_semicolon(qualified),
            comment: Some(comment),
        }]
    }
}

fn drop_object_item(kind: ObjectKind, schema: &str, name: &str, comment: String) -> PlanItem {
    statement(drop_object_sql(kind, schema, name), comment)
}

/// Renders one `TableDelta`'s changes in the fixed intra-table phase order
/// (§4.6 items 1-6). Used for both the forward delta (as computed by
/// `diff_table`) and the inverted delta the reverse planner builds —
/// §4.7's rollback construction reuses the same phase ordering.
fn render_table_delta(delta: &crate::diff::TableDelta, schema: &str) -> Vec<PlanItem> {
    let table_ref = qualify(schema, &delta.name);

    let mut drop_fks = Vec::new();
    let mut drop_indexes = Vec::new();
    let mut modifies = Vec::new();
    let mut drops = Vec::new();
    let mut adds = Vec::new();
    let mut add_indexes = Vec::new();
    let mut add_fks = Vec::new();
    let mut set_options = Vec::new();

    for change in &delta.changes {
        match change {
            TableChange::DropForeignKey { .. } => drop_fks.push(change),
            TableChange::DropIndex { .. } => drop_indexes.push(change),
            TableChange::ModifyColumn { .. } => modifies.push(change),
            TableChange::DropColumn { .. } => drops.push(change),
            TableChange::AddColumn { .. } => adds.push(change),
            TableChange::AddIndex { .. } => add_indexes.push(change),
            TableChange::AddForeignKey { .. } => add_fks.push(change),
            TableChange::SetOption { .. } => set_options.push(change),
        }
    }

    drop_fks
        .into_iter()
        .chain(drop_indexes)
        .chain(modifies)
        .chain(drops)
        .chain(adds)
        .chain(add_indexes)
        .chain(add_fks)
        .chain(set_options)
        .map(|change| render_table_change(change, &table_ref))
        .collect()
}

fn render_table_change(change: &TableChange, table_ref: &str) -> PlanItem {
    match change {
        TableChange::AddForeignKey { fk } => statement(
            format!("ALTER TABLE {table_ref} ADD {};", render_foreign_key_clause(fk)),
            format!("Foreign key ADDED: {}", fk.name),
        ),
        TableChange::DropForeignKey { name } => statement(
            format!("ALTER TABLE {table_ref} DROP FOREIGN KEY {};", quote_ident(name)),
            format!("Foreign key DROPPED: {name}"),
        ),
        TableChange::AddIndex { index } => statement(
            format!("ALTER TABLE {table_ref} ADD {};", render_index_clause(index)),
            format!("Index ADDED: {}", index.name),
        ),
        TableChange::DropIndex { name } => {
            let clause = if name == "PRIMARY" {
                "DROP PRIMARY KEY".to_string()
            } else {
                format!("DROP INDEX IF EXISTS {}", quote_ident(name))
            };
            statement(format!("ALTER TABLE {table_ref} {clause};"), format!("Index DROPPED: {name}"))
        }
        TableChange::ModifyColumn { name, old, new } => statement(
            format!("ALTER TABLE {table_ref} MODIFY COLUMN {};", render_column(new)),
            format!("Column MODIFIED: {name} FROM {} TO {}", old.data_type, new.data_type),
        ),
        TableChange::DropColumn { name } => statement(
            format!("ALTER TABLE {table_ref} DROP COLUMN {};", quote_ident(name)),
            format!("Column DROPPED: {name}"),
        ),
        TableChange::AddColumn { column, after } => {
            let mut sql = format!("ALTER TABLE {table_ref} ADD COLUMN {}", render_column(column));
            if let Some(after) = after {
                sql.push_str(&format!(" AFTER {}", quote_ident(after)));
            }
            sql.push(';');
            statement(sql, format!("Column ADDED: {}", column.name))
        }
        TableChange::SetOption { key, old, new } => statement(
            format!("ALTER TABLE {table_ref} {};", render_option_clause(*key, new)),
            format!(
                "Option CHANGED: {} FROM {} TO {}",
                key.sql_fragment(),
                old.as_deref().unwrap_or("NULL"),
                new.as_deref().unwrap_or("NULL")
            ),
        ),
    }
}

fn render_option_clause(key: OptionKey, new: &Option<String>) -> String {
    let value = new.as_deref().unwrap_or("");
    match key {
        OptionKey::Engine => format!("ENGINE={value}"),
        OptionKey::DefaultCharset => format!("DEFAULT CHARSET={value}"),
        OptionKey::Collate => format!("COLLATE={value}"),
        OptionKey::Comment => format!("COMMENT='{}'", value.replace('\'', "''")),
    }
}
