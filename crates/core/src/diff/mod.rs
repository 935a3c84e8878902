//! Kind-level and table-structure diffing (spec.md §4.4, §4.5) combined
//! into one `Diff` value.

mod kind;
mod table;

use std::collections::BTreeMap;

pub use kind::KindDiff;
pub use table::{diff_table, invert_table_delta, TableChange, TableDelta};

use crate::ir::{ObjectKind, Snapshot};
use crate::normalize::ddl_equal_normalized;
use crate::parser::parse_create_table;

/// The full diff between a SOURCE and DEST snapshot.
#[derive(Debug, Clone, Default)]
pub struct Diff {
    pub per_kind: BTreeMap<ObjectKind, KindDiff>,
    /// Among non-table `in_both` names, those whose DDL differs after
    /// whitespace normalization (§4.4).
    pub changed_non_table: BTreeMap<ObjectKind, Vec<String>>,
    /// Per-table structural delta for `tables.in_both` names whose parsed
    /// representations differ.
    pub table_deltas: BTreeMap<String, TableDelta>,
    /// §7: tables where parsing failed on at least one side. Falls back to
    /// whitespace-normalized string comparison; `true` means the DDLs
    /// differ and a diagnostic comment belongs in the plan instead of a
    /// delta.
    pub table_parse_fallback: BTreeMap<String, bool>,
}

impl Diff {
    #[must_use]
    pub fn kind(&self, kind: ObjectKind) -> KindDiff {
        self.per_kind.get(&kind).cloned().unwrap_or_default()
    }
}

/// Computes the diff of `dest` relative to `source` (spec.md §4.4, §4.5).
#[must_use]
pub fn diff_snapshots(source: &Snapshot, dest: &Snapshot) -> Diff {
    let mut diff = Diff::default();

    for object_kind in ObjectKind::ALL {
        let kind_diff = kind::partition_names(source.records(object_kind), dest.records(object_kind));

        if object_kind == ObjectKind::Table {
            for name in &kind_diff.in_both {
                let Some(source_record) = source.get(object_kind, name) else { continue };
                let Some(dest_record) = dest.get(object_kind, name) else { continue };
                if !source_record.has_ddl() || !dest_record.has_ddl() {
                    continue;
                }

                match (parse_create_table(&source_record.ddl), parse_create_table(&dest_record.ddl)) {
                    (Ok(source_table), Ok(dest_table)) => {
                        if let Some(delta) = diff_table(&source_table, &dest_table) {
                            diff.table_deltas.insert(name.clone(), delta);
                        }
                    }
                    _ => {
                        let differs = !ddl_equal_normalized(&source_record.ddl, &dest_record.ddl);
                        diff.table_parse_fallback.insert(name.clone(), differs);
                    }
                }
            }
        } else {
            let mut changed = Vec::new();
            for name in &kind_diff.in_both {
                let Some(source_record) = source.get(object_kind, name) else { continue };
                let Some(dest_record) = dest.get(object_kind, name) else { continue };
                if !source_record.has_ddl() || !dest_record.has_ddl() {
                    continue;
                }
                if !ddl_equal_normalized(&source_record.ddl, &dest_record.ddl) {
                    changed.push(name.clone());
                }
            }
            diff.changed_non_table.insert(object_kind, changed);
        }

        diff.per_kind.insert(object_kind, kind_diff);
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ObjectRecord;

    #[test]
    fn identical_snapshots_produce_empty_diff() {
        let mut source = Snapshot::new();
        let mut dest = Snapshot::new();
        let ddl = "CREATE TABLE `t` (`id` int(11) NOT NULL, PRIMARY KEY (`id`)) ENGINE=InnoDB";
        source.insert(ObjectKind::Table, ObjectRecord::new(ObjectKind::Table, "t", ddl));
        dest.insert(ObjectKind::Table, ObjectRecord::new(ObjectKind::Table, "t", ddl));

        let diff = diff_snapshots(&source, &dest);
        assert!(diff.table_deltas.is_empty());
        assert!(diff.kind(ObjectKind::Table).only_in_source.is_empty());
        assert!(diff.kind(ObjectKind::Table).only_in_dest.is_empty());
    }

    #[test]
    fn non_table_kind_changed_detected_via_normalized_ddl() {
        let mut source = Snapshot::new();
        let mut dest = Snapshot::new();
        source.insert(
            ObjectKind::View,
            ObjectRecord::new(ObjectKind::View, "v", "CREATE VIEW `v` AS SELECT 1"),
        );
        dest.insert(
            ObjectKind::View,
            ObjectRecord::new(ObjectKind::View, "v", "CREATE VIEW `v` AS SELECT    2"),
        );

        let diff = diff_snapshots(&source, &dest);
        assert_eq!(diff.changed_non_table[&ObjectKind::View], vec!["v".to_string()]);
    }
}
