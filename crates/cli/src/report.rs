//! `diff_report.json` (SPEC_FULL.md §15): a machine-readable summary of
//! added/dropped/modified object counts per kind, emitted alongside the two
//! SQL files when `--report` is passed.

use serde::Serialize;

use schemadiff_core::{Diff, ObjectKind};

#[derive(Debug, Serialize)]
pub struct KindSummary {
    pub kind: String,
    pub added: usize,
    pub dropped: usize,
    pub modified: usize,
}

#[derive(Debug, Serialize)]
pub struct DiffReport {
    pub generated_at: String,
    pub kinds: Vec<KindSummary>,
}

#[must_use]
pub fn build_report(diff: &Diff, generated_at: &str) -> DiffReport {
    let kinds = ObjectKind::ALL
        .into_iter()
        .map(|kind| {
            let kind_diff = diff.kind(kind);
            let modified = if kind == ObjectKind::Table {
                diff.table_deltas.len()
            } else {
                diff.changed_non_table.get(&kind).map_or(0, Vec::len)
            };
            KindSummary {
                kind: kind.as_str().to_string(),
                added: kind_diff.only_in_source.len(),
                dropped: kind_diff.only_in_dest.len(),
                modified,
            }
        })
        .collect();

    DiffReport {
        generated_at: generated_at.to_string(),
        kinds,
    }
}
