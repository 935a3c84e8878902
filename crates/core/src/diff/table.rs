//! Table-structure differ (spec.md §4.5): for a table present on both
//! sides, computes an ordered `TableDelta` of atomic changes.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::table::{Column, ForeignKey, Index, OptionKey, Table};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableChange {
    AddColumn {
        column: Column,
        after: Option<String>,
    },
    DropColumn {
        name: String,
    },
    ModifyColumn {
        name: String,
        old: Column,
        new: Column,
    },
    AddIndex {
        index: Index,
    },
    DropIndex {
        name: String,
    },
    AddForeignKey {
        fk: ForeignKey,
    },
    DropForeignKey {
        name: String,
    },
    SetOption {
        key: OptionKey,
        old: Option<String>,
        new: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDelta {
    pub name: String,
    pub changes: Vec<TableChange>,
}

/// Computes the delta turning `dest` into `source`, or `None` if the two
/// parsed tables are structurally equal (§4.5: "if the parsed tables are
/// equal, emit nothing").
#[must_use]
pub fn diff_table(source: &Table, dest: &Table) -> Option<TableDelta> {
    if source == dest {
        return None;
    }

    let mut changes = Vec::new();
    changes.extend(diff_columns(source, dest));
    changes.extend(diff_indexes(source, dest));
    changes.extend(diff_foreign_keys(source, dest));
    changes.extend(diff_options(source, dest));

    if changes.is_empty() {
        None
    } else {
        Some(TableDelta {
            name: source.name.clone(),
            changes,
        })
    }
}

fn diff_columns(source: &Table, dest: &Table) -> Vec<TableChange> {
    let source_names: BTreeSet<&str> = source.columns.iter().map(|c| c.name.as_str()).collect();
    let dest_names: BTreeSet<&str> = dest.columns.iter().map(|c| c.name.as_str()).collect();
    let all_names: BTreeSet<&str> = source_names.union(&dest_names).copied().collect();

    let mut drops = Vec::new();
    let mut modifies = Vec::new();
    let mut adds = Vec::new();

    for name in all_names {
        match (source.column(name), dest.column(name)) {
            (Some(source_col), None) => {
                let after = if source.is_last_column(name) {
                    None
                } else {
                    source.predecessor_of(name).map(str::to_string)
                };
                adds.push(TableChange::AddColumn {
                    column: source_col.clone(),
                    after,
                });
            }
            (None, Some(_)) => drops.push(TableChange::DropColumn { name: name.to_string() }),
            (Some(source_col), Some(dest_col)) if source_col != dest_col => {
                modifies.push(TableChange::ModifyColumn {
                    name: name.to_string(),
                    old: dest_col.clone(),
                    new: source_col.clone(),
                })
            }
            _ => {}
        }
    }

    // Tie-break (§4.5): drops, then modifies, then adds; alphabetical
    // within each group — `all_names` already iterated in sorted order, so
    // each group is already alphabetical.
    drops.into_iter().chain(modifies).chain(adds).collect()
}

fn diff_indexes(source: &Table, dest: &Table) -> Vec<TableChange> {
    let all_names: BTreeSet<&str> = source
        .indexes
        .keys()
        .map(String::as_str)
        .chain(dest.indexes.keys().map(String::as_str))
        .collect();

    let mut drops = Vec::new();
    let mut adds = Vec::new();

    for name in all_names {
        match (source.indexes.get(name), dest.indexes.get(name)) {
            (Some(index), None) => adds.push(TableChange::AddIndex { index: index.clone() }),
            (None, Some(_)) => drops.push(TableChange::DropIndex { name: name.to_string() }),
            (Some(source_index), Some(dest_index)) if source_index != dest_index => {
                drops.push(TableChange::DropIndex { name: name.to_string() });
                adds.push(TableChange::AddIndex {
                    index: source_index.clone(),
                });
            }
            _ => {}
        }
    }

    drops.into_iter().chain(adds).collect()
}

fn diff_foreign_keys(source: &Table, dest: &Table) -> Vec<TableChange> {
    let all_names: BTreeSet<&str> = source
        .foreign_keys
        .keys()
        .map(String::as_str)
        .chain(dest.foreign_keys.keys().map(String::as_str))
        .collect();

    let mut drops = Vec::new();
    let mut adds = Vec::new();

    for name in all_names {
        match (source.foreign_keys.get(name), dest.foreign_keys.get(name)) {
            (Some(fk), None) => adds.push(TableChange::AddForeignKey { fk: fk.clone() }),
            (None, Some(_)) => drops.push(TableChange::DropForeignKey { name: name.to_string() }),
            (Some(source_fk), Some(dest_fk)) if source_fk != dest_fk => {
                drops.push(TableChange::DropForeignKey { name: name.to_string() });
                adds.push(TableChange::AddForeignKey { fk: source_fk.clone() });
            }
            _ => {}
        }
    }

    drops.into_iter().chain(adds).collect()
}

/// Inverts a `TableDelta` for the reverse planner (§4.7): `add_column` and
/// `drop_column` swap roles, `modify_column`/`set_option` swap old/new, and
/// indexes/FKs re-added on rollback are pulled from `dest_table` — the
/// DEST-side definition the forward plan removed.
pub fn invert_table_delta(delta: &TableDelta, dest_table: &Table) -> Result<TableDelta> {
    let mut changes = Vec::with_capacity(delta.changes.len());
    for change in &delta.changes {
        let inverted = match change {
            TableChange::AddColumn { column, .. } => TableChange::DropColumn {
                name: column.name.clone(),
            },
            TableChange::DropColumn { name } => {
                let column = dest_table.column(name).cloned().ok_or_else(|| {
                    Error::Invariant(format!(
                        "reverse plan needs dropped column `{name}` from the DEST snapshot, but it was not found"
                    ))
                })?;
                let after = if dest_table.is_last_column(name) {
                    None
                } else {
                    dest_table.predecessor_of(name).map(str::to_string)
                };
                TableChange::AddColumn { column, after }
            }
            TableChange::ModifyColumn { name, old, new } => TableChange::ModifyColumn {
                name: name.clone(),
                old: new.clone(),
                new: old.clone(),
            },
            TableChange::AddIndex { index } => TableChange::DropIndex {
                name: index.name.clone(),
            },
            TableChange::DropIndex { name } => {
                let index = dest_table.index(name).cloned().ok_or_else(|| {
                    Error::Invariant(format!(
                        "reverse plan needs dropped index `{name}` from the DEST snapshot, but it was not found"
                    ))
                })?;
                TableChange::AddIndex { index }
            }
            TableChange::AddForeignKey { fk } => TableChange::DropForeignKey { name: fk.name.clone() },
            TableChange::DropForeignKey { name } => {
                let fk = dest_table.foreign_key(name).cloned().ok_or_else(|| {
                    Error::Invariant(format!(
                        "reverse plan needs dropped foreign key `{name}` from the DEST snapshot, but it was not found"
                    ))
                })?;
                TableChange::AddForeignKey { fk }
            }
            TableChange::SetOption { key, old, new } => TableChange::SetOption {
                key: *key,
                old: new.clone(),
                new: old.clone(),
            },
        };
        changes.push(inverted);
    }
    Ok(TableDelta {
        name: delta.name.clone(),
        changes,
    })
}

fn diff_options(source: &Table, dest: &Table) -> Vec<TableChange> {
    let mut changes = Vec::new();
    for ((key, source_value), (_, dest_value)) in source.options.entries().into_iter().zip(dest.options.entries()) {
        if source_value != dest_value {
            changes.push(TableChange::SetOption {
                key,
                old: dest_value.clone(),
                new: source_value.clone(),
            });
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_create_table;

    #[test]
    fn equal_tables_produce_no_delta() {
        let ddl = "CREATE TABLE `t` (`id` int(11) NOT NULL, PRIMARY KEY (`id`)) ENGINE=InnoDB";
        let source = parse_create_table(ddl).unwrap();
        let dest = parse_create_table(ddl).unwrap();
        assert!(diff_table(&source, &dest).is_none());
    }

    #[test]
    fn added_column_is_last_omits_after() {
        let source =
            parse_create_table("CREATE TABLE `t` (`id` int(11) NOT NULL, `a` int(11) DEFAULT NULL, PRIMARY KEY (`id`))")
                .unwrap();
        let dest = parse_create_table("CREATE TABLE `t` (`id` int(11) NOT NULL, PRIMARY KEY (`id`))").unwrap();
        let delta = diff_table(&source, &dest).unwrap();
        assert_eq!(
            delta.changes,
            vec![TableChange::AddColumn {
                column: source.column("a").unwrap().clone(),
                after: None,
            }]
        );
    }

    #[test]
    fn auto_increment_only_difference_is_empty_diff() {
        let source = parse_create_table(
            "CREATE TABLE `t` (`id` int(11) NOT NULL, PRIMARY KEY (`id`)) ENGINE=InnoDB AUTO_INCREMENT=42",
        )
        .unwrap();
        let dest = parse_create_table(
            "CREATE TABLE `t` (`id` int(11) NOT NULL, PRIMARY KEY (`id`)) ENGINE=InnoDB AUTO_INCREMENT=7",
        )
        .unwrap();
        assert!(diff_table(&source, &dest).is_none());
    }

    #[test]
    fn invert_round_trips_add_drop_and_modify() {
        let source =
            parse_create_table("CREATE TABLE `t` (`id` int(11) NOT NULL, `a` int(11) DEFAULT NULL, PRIMARY KEY (`id`))")
                .unwrap();
        let dest = parse_create_table("CREATE TABLE `t` (`id` int(11) NOT NULL, PRIMARY KEY (`id`))").unwrap();
        let forward = diff_table(&source, &dest).unwrap();
        let reverse = invert_table_delta(&forward, &dest).unwrap();
        assert_eq!(
            reverse.changes,
            vec![TableChange::DropColumn { name: "a".to_string() }]
        );
    }

    #[test]
    fn modified_index_emits_drop_then_add() {
        let source = parse_create_table(
            "CREATE TABLE `t` (`a` int(11) NOT NULL, UNIQUE KEY `u` (`a`) USING BTREE)",
        )
        .unwrap();
        let dest = parse_create_table("CREATE TABLE `t` (`a` int(11) NOT NULL, UNIQUE KEY `u` (`a`))").unwrap();
        let delta = diff_table(&source, &dest).unwrap();
        assert_eq!(delta.changes.len(), 2);
        assert!(matches!(delta.changes[0], TableChange::DropIndex { .. }));
        assert!(matches!(delta.changes[1], TableChange::AddIndex { .. }));
    }
}
