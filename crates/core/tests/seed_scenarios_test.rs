//! The concrete end-to-end scenarios from spec.md §8.

use schemadiff_core::{build_forward_plan, build_reverse_plan, diff_snapshots, render_plan, ObjectKind, ObjectRecord, Snapshot};

fn snapshot_with_table(ddl: &str) -> Snapshot {
    let mut snapshot = Snapshot::new();
    snapshot.insert(ObjectKind::Table, ObjectRecord::new(ObjectKind::Table, "t", ddl));
    snapshot
}

fn forward_and_reverse(source: &Snapshot, dest: &Snapshot) -> (String, String) {
    let diff = diff_snapshots(source, dest);
    let forward = build_forward_plan(&diff, source, dest, "dest_db");
    let reverse = build_reverse_plan(&diff, dest, "dest_db").expect("reverse plan must build");
    (
        render_plan(&forward, "source_db", "dest_db", "2026-01-01T00:00:00Z"),
        render_plan(&reverse, "source_db", "dest_db", "2026-01-01T00:00:00Z"),
    )
}

#[test]
fn scenario_1_add_a_column() {
    let source = snapshot_with_table("CREATE TABLE `t` (`id` int(11) NOT NULL, `a` int(11) DEFAULT NULL, PRIMARY KEY (`id`))");
    let dest = snapshot_with_table("CREATE TABLE `t` (`id` int(11) NOT NULL, PRIMARY KEY (`id`))");
    let (forward, reverse) = forward_and_reverse(&source, &dest);

    assert!(forward.contains("ADD COLUMN `a` int(11)"));
    assert!(!forward.contains("ADD COLUMN `a` int(11) DEFAULT NULL AFTER"));
    assert!(reverse.contains("DROP COLUMN `a`"));
}

#[test]
fn scenario_2_drop_an_extra_column_with_data() {
    let source = snapshot_with_table("CREATE TABLE `t` (`id` int(11) NOT NULL, PRIMARY KEY (`id`))");
    let dest = snapshot_with_table(
        "CREATE TABLE `t` (`id` int(11) NOT NULL, `legacy` varchar(20) DEFAULT NULL, PRIMARY KEY (`id`))",
    );
    let (forward, reverse) = forward_and_reverse(&source, &dest);

    assert!(forward.contains("DROP COLUMN `legacy`"));
    assert!(reverse.contains("ADD COLUMN `legacy` varchar(20)"));
}

#[test]
fn scenario_3_widen_an_enum_column() {
    let source = snapshot_with_table(
        "CREATE TABLE `t` (`id` int(11) NOT NULL, `status` enum('open','closed','archived') NOT NULL DEFAULT 'open', PRIMARY KEY (`id`))",
    );
    let dest = snapshot_with_table(
        "CREATE TABLE `t` (`id` int(11) NOT NULL, `status` enum('open','closed') NOT NULL DEFAULT 'open', PRIMARY KEY (`id`))",
    );
    let (forward, reverse) = forward_and_reverse(&source, &dest);

    assert!(forward.contains("MODIFY COLUMN `status` enum('open','closed','archived')"));
    assert!(reverse.contains("MODIFY COLUMN `status` enum('open','closed')"));
}

#[test]
fn scenario_4_add_a_foreign_key() {
    let source = snapshot_with_table(
        "CREATE TABLE `payments` (`customerNumber` int(11) NOT NULL, CONSTRAINT `payments_ibfk_1` FOREIGN KEY (`customerNumber`) REFERENCES `customers` (`customerNumber`))",
    );
    let dest = snapshot_with_table("CREATE TABLE `payments` (`customerNumber` int(11) NOT NULL)");
    let diff = diff_snapshots(&source, &dest);
    let (forward, reverse) = forward_and_reverse(&source, &dest);
    assert_eq!(diff.table_deltas.len(), 1);

    assert!(forward.contains("ADD CONSTRAINT `payments_ibfk_1` FOREIGN KEY (`customerNumber`) REFERENCES `customers` (`customerNumber`)"));
    assert!(reverse.contains("DROP FOREIGN KEY `payments_ibfk_1`"));
}

#[test]
fn scenario_6_table_only_in_dest_with_comment() {
    let mut source = Snapshot::new();
    let mut dest = Snapshot::new();
    let ddl = "CREATE TABLE `temp_analytics` (`id` int(11) NOT NULL, PRIMARY KEY (`id`)) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COMMENT='scratch table'";
    dest.insert(ObjectKind::Table, ObjectRecord::new(ObjectKind::Table, "temp_analytics", ddl));
    source.insert(ObjectKind::View, ObjectRecord::new(ObjectKind::View, "unrelated_view", "CREATE VIEW `unrelated_view` AS SELECT 1"));
    dest.insert(ObjectKind::View, ObjectRecord::new(ObjectKind::View, "unrelated_view", "CREATE VIEW `unrelated_view` AS SELECT 1"));

    let (forward, reverse) = forward_and_reverse(&source, &dest);

    assert!(forward.contains("DROP TABLE IF EXISTS `dest_db`.`temp_analytics`"));
    assert!(reverse.contains("CREATE TABLE `dest_db`.`temp_analytics`"));
    assert!(reverse.contains("COMMENT='scratch table'"));
}
