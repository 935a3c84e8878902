use std::collections::BTreeSet;

use crate::diff::{invert_table_delta, Diff};
use crate::error::Result;
use crate::ir::{ObjectKind, Snapshot};
use crate::parser::parse_create_table;
use crate::render::section_title;

use super::{create_object_items, drop_object_item, render_table_delta, Plan, PlanItem, Section, FORWARD_SECTION_ORDER};

/// Builds the reverse (rollback) plan (§4.7): restores DEST to its
/// original state, using DEST-captured DDL for anything the forward plan
/// would have dropped. Section order is the reverse of the forward plan's.
pub fn build_reverse_plan(diff: &Diff, dest: &Snapshot, dest_schema: &str) -> Result<Plan> {
    let mut sections = Vec::new();
    for kind in FORWARD_SECTION_ORDER.into_iter().rev() {
        let items = if kind == ObjectKind::Table {
            build_table_section(diff, dest, dest_schema)?
        } else {
            build_object_section(kind, diff, dest, dest_schema)
        };
        sections.push(Section {
            title: section_title(kind),
            items,
        });
    }
    Ok(Plan { sections })
}

fn build_table_section(diff: &Diff, dest: &Snapshot, dest_schema: &str) -> Result<Vec<PlanItem>> {
    let kind_diff = diff.kind(ObjectKind::Table);
    let mut names: BTreeSet<String> = BTreeSet::new();
    names.extend(kind_diff.only_in_source.iter().cloned());
    names.extend(kind_diff.only_in_dest.iter().cloned());
    names.extend(diff.table_deltas.keys().cloned());
    names.extend(diff.table_parse_fallback.keys().cloned());

    let mut items = Vec::new();
    for name in names {
        if kind_diff.only_in_source.contains(&name) {
            // Forward created this table in DEST; rollback drops it.
            items.push(drop_object_item(
                ObjectKind::Table,
                dest_schema,
                &name,
                format!("Table ADDED by forward plan, DROPPED on rollback: {name}"),
            ));
        } else if kind_diff.only_in_dest.contains(&name) {
            // Forward dropped this table; rollback restores it from the
            // DEST snapshot's captured DDL (I2).
            if let Some(record) = dest.get(ObjectKind::Table, &name).filter(|r| r.has_ddl()) {
                items.extend(create_object_items(
                    ObjectKind::Table,
                    &record.ddl,
                    dest_schema,
                    format!("Table DROPPED by forward plan, RESTORED on rollback: {name}"),
                ));
            }
        } else if let Some(delta) = diff.table_deltas.get(&name) {
            let dest_record = dest
                .get(ObjectKind::Table, &name)
                .filter(|r| r.has_ddl())
                .ok_or_else(|| crate::error::Error::Invariant(format!("missing DEST DDL for table `{name}`")))?;
            let dest_table = parse_create_table(&dest_record.ddl).map_err(|parse_error| {
                crate::error::Error::Invariant(format!(
                    "reverse plan could not re-parse DEST DDL for table `{name}`: {parse_error}"
                ))
            })?;
            let inverted = invert_table_delta(delta, &dest_table)?;
            items.extend(render_table_delta(&inverted, dest_schema));
        } else if let Some(&differs) = diff.table_parse_fallback.get(&name) {
            if differs {
                items.push(PlanItem::Comment(format!(
                    "Table `{name}` could not be parsed structurally on one or both sides; no rollback statement emitted, manual review required."
                )));
            }
        }
    }
    Ok(items)
}

fn build_object_section(kind: ObjectKind, diff: &Diff, dest: &Snapshot, dest_schema: &str) -> Vec<PlanItem> {
    let kind_diff = diff.kind(kind);
    let changed = diff.changed_non_table.get(&kind).cloned().unwrap_or_default();

    let mut names: BTreeSet<String> = BTreeSet::new();
    names.extend(kind_diff.only_in_source.iter().cloned());
    names.extend(kind_diff.only_in_dest.iter().cloned());
    names.extend(changed.iter().cloned());

    let mut items = Vec::new();
    for name in names {
        if kind_diff.only_in_source.contains(&name) {
            items.push(drop_object_item(
                kind,
                dest_schema,
                &name,
                format!("{} ADDED by forward plan, DROPPED on rollback: {name}", kind.as_str()),
            ));
        } else if kind_diff.only_in_dest.contains(&name) {
            if let Some(record) = dest.get(kind, &name).filter(|r| r.has_ddl()) {
                items.extend(create_object_items(
                    kind,
                    &record.ddl,
                    dest_schema,
                    format!("{} DROPPED by forward plan, RESTORED on rollback: {name}", kind.as_str()),
                ));
            }
        } else if changed.contains(&name) {
            items.push(drop_object_item(
                kind,
                dest_schema,
                &name,
                format!("{} CHANGED by forward plan, reverting: {name}", kind.as_str()),
            ));
            if let Some(record) = dest.get(kind, &name).filter(|r| r.has_ddl()) {
                items.extend(create_object_items(
                    kind,
                    &record.ddl,
                    dest_schema,
                    format!("{} restored from DEST snapshot", kind.as_str()),
                ));
            }
        }
    }
    items
}
