//! P2/P4/P5 from spec.md §8, exercised without a live database.

use schemadiff_core::{build_forward_plan, diff_snapshots, render_plan, ObjectKind, ObjectRecord, Snapshot};

fn two_object_snapshot() -> Snapshot {
    let mut snapshot = Snapshot::new();
    snapshot.insert(
        ObjectKind::Table,
        ObjectRecord::new(ObjectKind::Table, "zebra", "CREATE TABLE `zebra` (`id` int(11) NOT NULL, PRIMARY KEY (`id`))"),
    );
    snapshot.insert(
        ObjectKind::Table,
        ObjectRecord::new(ObjectKind::Table, "alpha", "CREATE TABLE `alpha` (`id` int(11) NOT NULL, PRIMARY KEY (`id`))"),
    );
    snapshot
}

#[test]
fn p2_idempotent_snapshotting_yields_empty_forward_plan() {
    let snapshot = two_object_snapshot();
    let diff = diff_snapshots(&snapshot, &snapshot);
    let plan = build_forward_plan(&diff, &snapshot, &snapshot, "dest_db");
    let rendered = render_plan(&plan, "source_db", "dest_db", "2026-01-01T00:00:00Z");

    for line in rendered.lines() {
        assert!(!line.starts_with("ALTER") && !line.starts_with("CREATE") && !line.starts_with("DROP"), "unexpected statement: {line}");
    }
}

#[test]
fn p4_null_diff_on_equal_snapshots_has_zero_statements() {
    let snapshot = two_object_snapshot();
    let diff = diff_snapshots(&snapshot, &snapshot);
    assert!(diff.table_deltas.is_empty());
    for kind in ObjectKind::ALL {
        assert!(diff.kind(kind).only_in_source.is_empty());
        assert!(diff.kind(kind).only_in_dest.is_empty());
    }
}

#[test]
fn p5_snapshot_iteration_is_name_sorted_regardless_of_insertion_order() {
    let snapshot = two_object_snapshot();
    let names: Vec<&str> = snapshot.records(ObjectKind::Table).iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["alpha", "zebra"]);
}

#[test]
fn p5_kind_diff_partitions_are_sorted() {
    let mut source = Snapshot::new();
    let dest = Snapshot::new();
    source.insert(ObjectKind::View, ObjectRecord::new(ObjectKind::View, "zeta", "CREATE VIEW `zeta` AS SELECT 1"));
    source.insert(ObjectKind::View, ObjectRecord::new(ObjectKind::View, "beta", "CREATE VIEW `beta` AS SELECT 1"));

    let diff = diff_snapshots(&source, &dest);
    assert_eq!(diff.kind(ObjectKind::View).only_in_source, vec!["beta".to_string(), "zeta".to_string()]);
}
