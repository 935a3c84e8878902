//! The structured `Table` model parsed out of a `CREATE TABLE` statement
//! (spec.md §3, §4.3) and the pieces it's built from.

use std::collections::BTreeMap;

/// A single column definition.
///
/// Equality is field-wise on the already-normalized `data_type` (whitespace
/// collapsed, keywords lowercased — done once at parse time in
/// [`crate::parser`], not on every comparison).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    pub extra: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IndexKind {
    Primary,
    Unique,
    Key,
    Fulltext,
}

impl IndexKind {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            IndexKind::Primary => "PRIMARY KEY",
            IndexKind::Unique => "UNIQUE KEY",
            IndexKind::Key => "KEY",
            IndexKind::Fulltext => "FULLTEXT KEY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    pub name: String,
    pub prefix_length: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: String,
    pub kind: IndexKind,
    pub columns: Vec<IndexColumn>,
    pub options: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyAction {
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
    NoAction,
}

impl ForeignKeyAction {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            ForeignKeyAction::Restrict => "RESTRICT",
            ForeignKeyAction::Cascade => "CASCADE",
            ForeignKeyAction::SetNull => "SET NULL",
            ForeignKeyAction::SetDefault => "SET DEFAULT",
            ForeignKeyAction::NoAction => "NO ACTION",
        }
    }

    /// Parses an `ON DELETE`/`ON UPDATE` action keyword. Unknown input
    /// normalizes to `Restrict`, matching the absent-clause default
    /// (DESIGN.md, Open Question: FK actions compare structurally, absent
    /// treated as RESTRICT on both sides).
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_uppercase().as_str() {
            "CASCADE" => ForeignKeyAction::Cascade,
            "SET NULL" => ForeignKeyAction::SetNull,
            "SET DEFAULT" => ForeignKeyAction::SetDefault,
            "NO ACTION" => ForeignKeyAction::NoAction,
            _ => ForeignKeyAction::Restrict,
        }
    }
}

impl Default for ForeignKeyAction {
    fn default() -> Self {
        ForeignKeyAction::Restrict
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub name: String,
    pub local_columns: Vec<String>,
    pub ref_table: String,
    pub ref_columns: Vec<String>,
    pub on_delete: ForeignKeyAction,
    pub on_update: ForeignKeyAction,
}

/// The four table-level options this tool tracks. `AUTO_INCREMENT` is
/// parsed and discarded (I3) — it is data, not schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOptions {
    pub engine: Option<String>,
    pub default_charset: Option<String>,
    pub collate: Option<String>,
    pub comment: Option<String>,
}

impl TableOptions {
    /// The four tracked keys in the fixed order §4.5 enumerates them.
    #[must_use]
    pub fn entries(&self) -> [(OptionKey, &Option<String>); 4] {
        [
            (OptionKey::Engine, &self.engine),
            (OptionKey::DefaultCharset, &self.default_charset),
            (OptionKey::Collate, &self.collate),
            (OptionKey::Comment, &self.comment),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKey {
    Engine,
    DefaultCharset,
    Collate,
    Comment,
}

impl OptionKey {
    #[must_use]
    pub const fn sql_fragment(self) -> &'static str {
        match self {
            OptionKey::Engine => "ENGINE",
            OptionKey::DefaultCharset => "DEFAULT CHARSET",
            OptionKey::Collate => "COLLATE",
            OptionKey::Comment => "COMMENT",
        }
    }
}

/// The parsed form of a `CREATE TABLE` statement (spec.md §3).
///
/// `indexes`/`foreign_keys` are sets keyed by name, not declaration-ordered
/// sequences — `BTreeMap` gives us that plus deterministic iteration, and
/// (unlike `Vec`) its derived `PartialEq` ignores insertion order, which
/// matters because §4.5 says "if the parsed tables are equal, emit
/// nothing": two tables whose indexes were merely declared in a different
/// order must still compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub indexes: BTreeMap<String, Index>,
    pub foreign_keys: BTreeMap<String, ForeignKey>,
    pub options: TableOptions,
}

impl Table {
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    #[must_use]
    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indexes.get(name)
    }

    #[must_use]
    pub fn foreign_key(&self, name: &str) -> Option<&ForeignKey> {
        self.foreign_keys.get(name)
    }

    /// The column immediately preceding `name` in declaration order, or
    /// `None` if `name` is first. Used to compute `add_column`'s `after`
    /// field (§4.5.1).
    #[must_use]
    pub fn predecessor_of(&self, name: &str) -> Option<&str> {
        let index = self.columns.iter().position(|column| column.name == name)?;
        if index == 0 {
            None
        } else {
            Some(self.columns[index - 1].name.as_str())
        }
    }

    /// Whether `name` is the last column in declaration order — when true,
    /// `ADD COLUMN` needs no `AFTER` clause since appending is MySQL's
    /// default placement (spec.md §8, scenario 1).
    #[must_use]
    pub fn is_last_column(&self, name: &str) -> bool {
        self.columns.last().is_some_and(|column| column.name == name)
    }
}
