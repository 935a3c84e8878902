use std::collections::BTreeMap;

/// The seven object kinds this tool understands (spec.md §3).
///
/// Closed enumeration — adding a kind means updating every `match` over it,
/// which is deliberate: the planner's section table (§4.6) must stay
/// exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectKind {
    Table,
    View,
    Procedure,
    Function,
    Trigger,
    Event,
    Sequence,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 7] = [
        ObjectKind::Table,
        ObjectKind::View,
        ObjectKind::Procedure,
        ObjectKind::Function,
        ObjectKind::Trigger,
        ObjectKind::Event,
        ObjectKind::Sequence,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Table => "table",
            ObjectKind::View => "view",
            ObjectKind::Procedure => "procedure",
            ObjectKind::Function => "function",
            ObjectKind::Trigger => "trigger",
            ObjectKind::Event => "event",
            ObjectKind::Sequence => "sequence",
        }
    }

    /// Whether stored-code bodies of this kind are emitted with the
    /// `DELIMITER $$` convention (§4.6) rather than plain semicolons.
    #[must_use]
    pub const fn uses_delimiter_block(self) -> bool {
        matches!(
            self,
            ObjectKind::Procedure | ObjectKind::Function | ObjectKind::Trigger
        )
    }
}

/// A `(kind, name)` pair identifying an object within one schema.
/// Names compare case-sensitively (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ObjectRef {
    pub kind: ObjectKind,
    pub name: String,
}

/// An `ObjectRef` plus the exact `CREATE …` text the database returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    pub reference: ObjectRef,
    pub ddl: String,
}

impl ObjectRecord {
    #[must_use]
    pub fn new(kind: ObjectKind, name: impl Into<String>, ddl: impl Into<String>) -> Self {
        Self {
            reference: ObjectRef {
                kind,
                name: name.into(),
            },
            ddl: ddl.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.reference.name
    }

    /// Invariant I2: extraction failures are tolerated upstream but are
    /// never silently treated as present downstream.
    #[must_use]
    pub fn has_ddl(&self) -> bool {
        !self.ddl.is_empty()
    }
}

/// `ObjectKind -> ordered list of ObjectRecord`, one per schema.
///
/// Invariant I1: lists are sorted by name at construction and stay sorted —
/// nothing downstream may depend on insertion or hash-map order.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    objects: BTreeMap<ObjectKind, Vec<ObjectRecord>>,
}

impl Snapshot {
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
        }
    }

    /// Builds a snapshot from unsorted per-kind records, sorting each list
    /// by name. This is the single place I1 is established; every other
    /// accessor simply trusts it.
    #[must_use]
    pub fn from_records(mut records: BTreeMap<ObjectKind, Vec<ObjectRecord>>) -> Self {
        for kind in ObjectKind::ALL {
            let list = records.entry(kind).or_default();
            list.sort_by(|a, b| a.name().cmp(b.name()));
        }
        Self { objects: records }
    }

    pub fn insert(&mut self, kind: ObjectKind, record: ObjectRecord) {
        let list = self.objects.entry(kind).or_default();
        let position = list
            .binary_search_by(|existing| existing.name().cmp(record.name()))
            .unwrap_or_else(|insert_at| insert_at);
        list.insert(position, record);
    }

    #[must_use]
    pub fn records(&self, kind: ObjectKind) -> &[ObjectRecord] {
        static EMPTY: Vec<ObjectRecord> = Vec::new();
        self.objects.get(&kind).unwrap_or(&EMPTY)
    }

    #[must_use]
    pub fn get(&self, kind: ObjectKind, name: &str) -> Option<&ObjectRecord> {
        self.records(kind).iter().find(|record| record.name() == name)
    }

    /// I1, checked: every kind's list is sorted by name.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        ObjectKind::ALL.iter().all(|kind| {
            self.records(*kind)
                .windows(2)
                .all(|pair| pair[0].name() <= pair[1].name())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_list_sorted() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(ObjectKind::Table, ObjectRecord::new(ObjectKind::Table, "zebra", "ddl"));
        snapshot.insert(ObjectKind::Table, ObjectRecord::new(ObjectKind::Table, "alpha", "ddl"));
        snapshot.insert(ObjectKind::Table, ObjectRecord::new(ObjectKind::Table, "mango", "ddl"));

        let names: Vec<&str> = snapshot
            .records(ObjectKind::Table)
            .iter()
            .map(ObjectRecord::name)
            .collect();
        assert_eq!(names, ["alpha", "mango", "zebra"]);
        assert!(snapshot.is_sorted());
    }

    #[test]
    fn from_records_sorts_every_kind_even_when_absent() {
        let snapshot = Snapshot::from_records(BTreeMap::new());
        for kind in ObjectKind::ALL {
            assert!(snapshot.records(kind).is_empty());
        }
    }
}
