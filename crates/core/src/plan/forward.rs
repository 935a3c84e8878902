use std::collections::BTreeSet;

use crate::diff::Diff;
use crate::ir::{ObjectKind, Snapshot};
use crate::render::section_title;

use super::{create_object_items, drop_object_item, render_table_delta, Plan, PlanItem, Section, FORWARD_SECTION_ORDER};

/// Builds the forward migration plan (§4.6): transforms DEST into
/// structural equivalence with SOURCE.
#[must_use]
pub fn build_forward_plan(diff: &Diff, source: &Snapshot, dest: &Snapshot, dest_schema: &str) -> Plan {
    let sections = FORWARD_SECTION_ORDER
        .into_iter()
        .map(|kind| Section {
            title: section_title(kind),
            items: if kind == ObjectKind::Table {
                build_table_section(diff, source, dest_schema)
            } else {
                build_object_section(kind, diff, source, dest_schema)
            },
        })
        .collect();

    Plan { sections }
}

fn build_table_section(diff: &Diff, source: &Snapshot, dest_schema: &str) -> Vec<PlanItem> {
    let kind_diff = diff.kind(ObjectKind::Table);
    let mut names: BTreeSet<String> = BTreeSet::new();
    names.extend(kind_diff.only_in_source.iter().cloned());
    names.extend(kind_diff.only_in_dest.iter().cloned());
    names.extend(diff.table_deltas.keys().cloned());
    names.extend(diff.table_parse_fallback.keys().cloned());

    let mut items = Vec::new();
    for name in names {
        if kind_diff.only_in_source.contains(&name) {
            if let Some(record) = source.get(ObjectKind::Table, &name).filter(|r| r.has_ddl()) {
                items.extend(create_object_items(
                    ObjectKind::Table,
                    &record.ddl,
                    dest_schema,
                    format!("Table ADDED: {name}"),
                ));
            }
        } else if kind_diff.only_in_dest.contains(&name) {
            items.push(drop_object_item(
                ObjectKind::Table,
                dest_schema,
                &name,
                format!("Table DROPPED: {name}"),
            ));
        } else if let Some(delta) = diff.table_deltas.get(&name) {
            items.extend(render_table_delta(delta, dest_schema));
        } else if let Some(&differs) = diff.table_parse_fallback.get(&name) {
            if differs {
                items.push(PlanItem::Comment(format!(
                    "Table `{name}` could not be parsed structurally on one or both sides and its DDL differs after whitespace normalization; manual review required, no statement emitted."
                )));
            }
        }
    }
    items
}

fn build_object_section(kind: ObjectKind, diff: &Diff, source: &Snapshot, dest_schema: &str) -> Vec<PlanItem> {
    let kind_diff = diff.kind(kind);
    let changed = diff.changed_non_table.get(&kind).cloned().unwrap_or_default();

    let mut names: BTreeSet<String> = BTreeSet::new();
    names.extend(kind_diff.only_in_source.iter().cloned());
    names.extend(kind_diff.only_in_dest.iter().cloned());
    names.extend(changed.iter().cloned());

    let mut items = Vec::new();
    for name in names {
        if kind_diff.only_in_source.contains(&name) {
            if let Some(record) = source.get(kind, &name).filter(|r| r.has_ddl()) {
                items.extend(create_object_items(
                    kind,
                    &record.ddl,
                    dest_schema,
                    format!("{} ADDED: {name}", kind.as_str()),
                ));
            }
        } else if kind_diff.only_in_dest.contains(&name) {
            items.push(drop_object_item(kind, dest_schema, &name, format!("{} DROPPED: {name}", kind.as_str())));
        } else if changed.contains(&name) {
            items.push(drop_object_item(
                kind,
                dest_schema,
                &name,
                format!("{} CHANGED (recreating): {name}", kind.as_str()),
            ));
            if let Some(record) = source.get(kind, &name).filter(|r| r.has_ddl()) {
                items.extend(create_object_items(kind, &record.ddl, dest_schema, format!("{} recreated from SOURCE", kind.as_str())));
            }
        }
    }
    items
}
