//! Kind-level differ (spec.md §4.4): partitions two name sets into
//! only-in-source / only-in-dest / in-both, each kept in the canonical
//! sorted order (I1, P5).

use std::collections::BTreeSet;

use crate::ir::ObjectRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindDiff {
    pub only_in_source: Vec<String>,
    pub only_in_dest: Vec<String>,
    pub in_both: Vec<String>,
}

pub fn partition_names(source: &[ObjectRecord], dest: &[ObjectRecord]) -> KindDiff {
    let source_names: BTreeSet<&str> = source.iter().map(ObjectRecord::name).collect();
    let dest_names: BTreeSet<&str> = dest.iter().map(ObjectRecord::name).collect();

    KindDiff {
        only_in_source: source_names.difference(&dest_names).map(|s| s.to_string()).collect(),
        only_in_dest: dest_names.difference(&source_names).map(|s| s.to_string()).collect(),
        in_both: source_names.intersection(&dest_names).map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ObjectKind;

    #[test]
    fn partitions_and_sorts_names() {
        let source = vec![
            ObjectRecord::new(ObjectKind::Table, "zebra", "ddl"),
            ObjectRecord::new(ObjectKind::Table, "common", "ddl"),
        ];
        let dest = vec![
            ObjectRecord::new(ObjectKind::Table, "alpha", "ddl"),
            ObjectRecord::new(ObjectKind::Table, "common", "ddl"),
        ];
        let diff = partition_names(&source, &dest);
        assert_eq!(diff.only_in_source, vec!["zebra".to_string()]);
        assert_eq!(diff.only_in_dest, vec!["alpha".to_string()]);
        assert_eq!(diff.in_both, vec!["common".to_string()]);
    }
}
