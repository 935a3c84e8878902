//! Boundary behaviors from spec.md §8: generated columns, JSON, FULLTEXT,
//! CHECK constraints, FK actions, EVERY N DAY events, sequence options, and
//! option-only table diffs.

use schemadiff_core::{diff_snapshots, parse_create_table, ObjectKind, ObjectRecord, Snapshot};

#[test]
fn generated_column_stored_and_virtual_parse() {
    let table = parse_create_table(
        "CREATE TABLE `t` (`price` decimal(10,2) NOT NULL, `qty` int(11) NOT NULL, \
         `total_stored` decimal(10,2) GENERATED ALWAYS AS (`price` * `qty`) STORED, \
         `total_virtual` decimal(10,2) GENERATED ALWAYS AS (`price` * `qty`) VIRTUAL)",
    )
    .unwrap();

    assert!(table.column("total_stored").unwrap().extra.to_ascii_lowercase().contains("stored"));
    assert!(table.column("total_virtual").unwrap().extra.to_ascii_lowercase().contains("virtual"));
}

#[test]
fn json_column_and_fulltext_index_parse() {
    let table = parse_create_table(
        "CREATE TABLE `articles` (`id` int(11) NOT NULL, `body` text NOT NULL, `meta` json DEFAULT NULL, \
         PRIMARY KEY (`id`), FULLTEXT KEY `ft_body` (`body`))",
    )
    .unwrap();

    assert_eq!(table.column("meta").unwrap().data_type, "json");
    let index = table.index("ft_body").unwrap();
    assert_eq!(index.kind, schemadiff_core::table::IndexKind::Fulltext);
}

#[test]
fn check_constraint_is_tolerated_and_ignored() {
    let table = parse_create_table(
        "CREATE TABLE `t` (`age` int(11) NOT NULL, CONSTRAINT `chk_age` CHECK (`age` >= 0))",
    )
    .unwrap();
    assert!(table.foreign_key("chk_age").is_none());
    assert_eq!(table.columns.len(), 1);
}

#[test]
fn foreign_key_on_delete_actions_parse() {
    let cascade = parse_create_table(
        "CREATE TABLE `t` (`a` int(11) NOT NULL, CONSTRAINT `fk_a` FOREIGN KEY (`a`) REFERENCES `p` (`id`) ON DELETE CASCADE)",
    )
    .unwrap();
    let set_null = parse_create_table(
        "CREATE TABLE `t` (`a` int(11) NOT NULL, CONSTRAINT `fk_a` FOREIGN KEY (`a`) REFERENCES `p` (`id`) ON DELETE SET NULL)",
    )
    .unwrap();
    let restrict = parse_create_table(
        "CREATE TABLE `t` (`a` int(11) NOT NULL, CONSTRAINT `fk_a` FOREIGN KEY (`a`) REFERENCES `p` (`id`))",
    )
    .unwrap();

    use schemadiff_core::table::ForeignKeyAction;
    assert_eq!(cascade.foreign_key("fk_a").unwrap().on_delete, ForeignKeyAction::Cascade);
    assert_eq!(set_null.foreign_key("fk_a").unwrap().on_delete, ForeignKeyAction::SetNull);
    assert_eq!(restrict.foreign_key("fk_a").unwrap().on_delete, ForeignKeyAction::Restrict);
}

#[test]
fn tables_differing_only_in_comment_engine_charset_collate_each_diff() {
    let base = "CREATE TABLE `t` (`id` int(11) NOT NULL, PRIMARY KEY (`id`))";
    let comment = format!("{base} COMMENT='audit trail'");
    let engine = format!("{base} ENGINE=MyISAM");
    let charset = format!("{base} DEFAULT CHARSET=latin1");
    let collate = format!("{base} COLLATE=utf8mb4_bin");

    for variant in [comment, engine, charset, collate] {
        let source = parse_create_table(&variant).unwrap();
        let dest = parse_create_table(base).unwrap();
        assert_ne!(source, dest, "{variant} must differ from the base table");
    }
}

#[test]
fn event_with_every_n_day_schedule_round_trips_through_diff() {
    let mut source = Snapshot::new();
    let mut dest = Snapshot::new();
    let ddl = "CREATE EVENT `purge_logs` ON SCHEDULE EVERY 1 DAY STARTS '2026-01-01 00:00:00' DO DELETE FROM logs WHERE created_at < NOW() - INTERVAL 30 DAY";
    source.insert(ObjectKind::Event, ObjectRecord::new(ObjectKind::Event, "purge_logs", ddl));
    dest.insert(ObjectKind::Event, ObjectRecord::new(ObjectKind::Event, "purge_logs", ddl));

    let diff = diff_snapshots(&source, &dest);
    assert!(diff.changed_non_table[&ObjectKind::Event].is_empty());
}

#[test]
fn sequence_with_custom_options_is_tracked_as_opaque_ddl() {
    let mut source = Snapshot::new();
    let mut dest = Snapshot::new();
    source.insert(
        ObjectKind::Sequence,
        ObjectRecord::new(
            ObjectKind::Sequence,
            "s",
            "CREATE SEQUENCE `s` START WITH 1 INCREMENT BY 1 CACHE 20 CYCLE",
        ),
    );
    dest.insert(
        ObjectKind::Sequence,
        ObjectRecord::new(
            ObjectKind::Sequence,
            "s",
            "CREATE SEQUENCE `s` START WITH 1 INCREMENT BY 1 CACHE 20 NOCYCLE",
        ),
    );

    let diff = diff_snapshots(&source, &dest);
    assert_eq!(diff.changed_non_table[&ObjectKind::Sequence], vec!["s".to_string()]);
}
