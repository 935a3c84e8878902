//! Reverse-planner coverage (spec.md §4.7) beyond tables: every object kind
//! rolls back symmetrically, restoring DEST-captured DDL for anything the
//! forward plan dropped or recreated.

use schemadiff_core::{build_forward_plan, build_reverse_plan, diff_snapshots, render_plan, ObjectKind, ObjectRecord, Snapshot};

#[test]
fn reverse_restores_dropped_sequence() {
    let source = Snapshot::new();
    let mut dest = Snapshot::new();
    let ddl = "CREATE SEQUENCE `order_seq` START WITH 100 INCREMENT BY 1 CACHE 10 CYCLE";
    dest.insert(ObjectKind::Sequence, ObjectRecord::new(ObjectKind::Sequence, "order_seq", ddl));

    let diff = diff_snapshots(&source, &dest);
    let forward = build_forward_plan(&diff, &source, &dest, "dest_db");
    let reverse = build_reverse_plan(&diff, &dest, "dest_db").expect("reverse plan must build");

    let forward_sql = render_plan(&forward, "source_db", "dest_db", "2026-01-01T00:00:00Z");
    let reverse_sql = render_plan(&reverse, "source_db", "dest_db", "2026-01-01T00:00:00Z");

    assert!(forward_sql.contains("DROP SEQUENCE IF EXISTS `dest_db`.`order_seq`"));
    assert!(reverse_sql.contains("CREATE SEQUENCE `dest_db`.`order_seq`"));
    assert!(reverse_sql.contains("CYCLE"));
}

#[test]
fn reverse_drops_sequence_added_by_forward_plan() {
    let mut source = Snapshot::new();
    let dest = Snapshot::new();
    source.insert(
        ObjectKind::Sequence,
        ObjectRecord::new(ObjectKind::Sequence, "order_seq", "CREATE SEQUENCE `order_seq` START WITH 1"),
    );

    let diff = diff_snapshots(&source, &dest);
    let reverse = build_reverse_plan(&diff, &dest, "dest_db").expect("reverse plan must build");
    let reverse_sql = render_plan(&reverse, "source_db", "dest_db", "2026-01-01T00:00:00Z");

    assert!(reverse_sql.contains("DROP SEQUENCE IF EXISTS `dest_db`.`order_seq`"));
}

#[test]
fn reverse_reverts_changed_procedure_body_from_dest_snapshot() {
    let mut source = Snapshot::new();
    let mut dest = Snapshot::new();
    source.insert(
        ObjectKind::Procedure,
        ObjectRecord::new(
            ObjectKind::Procedure,
            "p",
            "CREATE PROCEDURE `p`() BEGIN SELECT 1; SELECT 2; END",
        ),
    );
    dest.insert(
        ObjectKind::Procedure,
        ObjectRecord::new(ObjectKind::Procedure, "p", "CREATE PROCEDURE `p`() BEGIN SELECT 1; END"),
    );

    let diff = diff_snapshots(&source, &dest);
    let forward = build_forward_plan(&diff, &source, &dest, "dest_db");
    let reverse = build_reverse_plan(&diff, &dest, "dest_db").expect("reverse plan must build");

    let forward_sql = render_plan(&forward, "source_db", "dest_db", "2026-01-01T00:00:00Z");
    let reverse_sql = render_plan(&reverse, "source_db", "dest_db", "2026-01-01T00:00:00Z");

    assert!(forward_sql.contains("DROP PROCEDURE IF EXISTS `dest_db`.`p`"));
    assert!(forward_sql.contains("SELECT 1; SELECT 2; END"));
    assert!(reverse_sql.contains("DROP PROCEDURE IF EXISTS `dest_db`.`p`"));
    assert!(reverse_sql.contains("BEGIN SELECT 1; END"));
}

#[test]
fn section_order_is_reversed() {
    let source = Snapshot::new();
    let dest = Snapshot::new();
    let diff = diff_snapshots(&source, &dest);
    let forward = build_forward_plan(&diff, &source, &dest, "dest_db");
    let reverse = build_reverse_plan(&diff, &dest, "dest_db").expect("reverse plan must build");

    let forward_titles: Vec<&str> = forward.sections.iter().map(|s| s.title).collect();
    let reverse_titles: Vec<&str> = reverse.sections.iter().map(|s| s.title).collect();
    let mut expected_reverse = forward_titles.clone();
    expected_reverse.reverse();
    assert_eq!(reverse_titles, expected_reverse);
}
