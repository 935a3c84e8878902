//! The `SHOW`/`INFORMATION_SCHEMA` surface spec.md §4.1 enumerates, one
//! enumeration query and one DDL query per object kind.

use schemadiff_core::ObjectKind;

/// Enumeration query for `kind` (lists names in `schema`). `table`, `view`,
/// and `sequence` all come from `SHOW FULL TABLES`, filtered by `Table_type`
/// client-side since not every MariaDB/MySQL build lets that filter sit in
/// the `WHERE` clause uniformly.
#[must_use]
pub fn enumeration_query(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::Table | ObjectKind::View | ObjectKind::Sequence => "SHOW FULL TABLES",
        ObjectKind::Procedure => "SHOW PROCEDURE STATUS WHERE Db = ?",
        ObjectKind::Function => "SHOW FUNCTION STATUS WHERE Db = ?",
        ObjectKind::Trigger => "SHOW TRIGGERS",
        ObjectKind::Event => "SHOW EVENTS WHERE Db = ?",
    }
}

/// The `Table_type` value `SHOW FULL TABLES` reports for `kind`, used to
/// filter its rows client-side (§4.1).
#[must_use]
pub fn table_type_filter(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::Table => "BASE TABLE",
        ObjectKind::View => "VIEW",
        ObjectKind::Sequence => "SEQUENCE",
        _ => unreachable!("table_type_filter only applies to SHOW FULL TABLES kinds"),
    }
}

/// The `SHOW CREATE ...` statement prefix for `kind`.
#[must_use]
pub fn show_create_keyword(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::Table => "TABLE",
        ObjectKind::View => "VIEW",
        ObjectKind::Sequence => "SEQUENCE",
        ObjectKind::Procedure => "PROCEDURE",
        ObjectKind::Function => "FUNCTION",
        ObjectKind::Trigger => "TRIGGER",
        ObjectKind::Event => "EVENT",
    }
}

pub const SHOW_SERVER_VERSION_QUERY: &str = "SELECT VERSION()";
