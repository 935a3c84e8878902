//! `snapshot(pool, schema) -> Snapshot` (§4.2): enumerates every object kind
//! and fetches each one's DDL, fanning out with `std::thread::scope` across
//! the seven kinds the way the teacher's async dialects fan out across
//! requests — here adapted to the teacher's synchronous MySQL driver.

use mysql::prelude::Queryable;
use mysql::{Pool, Row};
use schemadiff_core::{ObjectKind, ObjectRecord, Snapshot};

use crate::adapter::{clean_ddl, get_conn, row_string};
use crate::error::MysqlError;
use crate::queries::{enumeration_query, show_create_keyword, table_type_filter};

/// Builds a full `Snapshot` of `schema` (§4.2). Per-object DDL-extraction
/// failures are recorded as empty-DDL records (§4.1's contract) rather than
/// aborting the whole snapshot; only connection and enumeration failures are
/// fatal.
pub fn snapshot(pool: &Pool, schema: &str) -> Result<Snapshot, MysqlError> {
    let results: Vec<Result<(ObjectKind, Vec<ObjectRecord>), MysqlError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = ObjectKind::ALL
            .into_iter()
            .map(|kind| scope.spawn(move || enumerate_kind(pool, schema, kind).map(|records| (kind, records))))
            .collect();
        handles.into_iter().map(|handle| handle.join().expect("introspection thread panicked")).collect()
    });

    let mut snapshot = Snapshot::new();
    for result in results {
        let (kind, records) = result?;
        for record in records {
            snapshot.insert(kind, record);
        }
    }
    Ok(snapshot)
}

fn enumerate_kind(pool: &Pool, schema: &str, kind: ObjectKind) -> Result<Vec<ObjectRecord>, MysqlError> {
    let names = enumerate_names(pool, schema, kind)?;
    let mut connection = get_conn(pool, schema)?;
    let mut records = Vec::with_capacity(names.len());
    for name in names {
        let ddl = fetch_ddl(&mut connection, kind, &name);
        records.push(ObjectRecord::new(kind, name, ddl));
    }
    Ok(records)
}

fn enumerate_names(pool: &Pool, schema: &str, kind: ObjectKind) -> Result<Vec<String>, MysqlError> {
    let mut connection = get_conn(pool, schema)?;
    let query = enumeration_query(kind);

    let rows: Vec<Row> = match kind {
        ObjectKind::Table | ObjectKind::View | ObjectKind::Sequence => connection
            .query(query)
            .map_err(|source| enumeration_error(kind, schema, source))?,
        ObjectKind::Procedure | ObjectKind::Function | ObjectKind::Event => connection
            .exec(query, (schema,))
            .map_err(|source| enumeration_error(kind, schema, source))?,
        ObjectKind::Trigger => connection
            .query(query)
            .map_err(|source| enumeration_error(kind, schema, source))?,
    };

    let name_column = match kind {
        ObjectKind::Table | ObjectKind::View | ObjectKind::Sequence | ObjectKind::Trigger => 0,
        ObjectKind::Procedure | ObjectKind::Function | ObjectKind::Event => 1,
    };

    let mut names = Vec::with_capacity(rows.len());
    for row in &rows {
        if matches!(kind, ObjectKind::Table | ObjectKind::View | ObjectKind::Sequence) {
            let Some(row_type) = row_string(row, 1, "Table_type") else { continue };
            if row_type != table_type_filter(kind) {
                continue;
            }
        }
        if let Some(name) = row_string(row, name_column, "name") {
            names.push(name);
        }
    }
    names.sort_unstable();
    names.dedup();
    Ok(names)
}

fn fetch_ddl(connection: &mut mysql::PooledConn, kind: ObjectKind, name: &str) -> String {
    let escaped = name.replace('`', "``");
    let query = format!("SHOW CREATE {} `{escaped}`", show_create_keyword(kind));
    let ddl_column = match kind {
        ObjectKind::Table | ObjectKind::View | ObjectKind::Sequence => 1,
        ObjectKind::Procedure | ObjectKind::Function | ObjectKind::Trigger => 2,
        ObjectKind::Event => 3,
    };

    match connection.query_first::<Row, _>(query.as_str()) {
        Ok(Some(row)) => match row_string(&row, ddl_column, "Create") {
            Some(ddl) => clean_ddl(&ddl),
            None => {
                tracing::warn!(kind = kind.as_str(), name, "SHOW CREATE returned no DDL column");
                String::new()
            }
        },
        Ok(None) => {
            tracing::warn!(kind = kind.as_str(), name, "SHOW CREATE returned no rows");
            String::new()
        }
        Err(error) => {
            tracing::warn!(kind = kind.as_str(), name, error = %error, "SHOW CREATE failed");
            String::new()
        }
    }
}

fn enumeration_error(kind: ObjectKind, schema: &str, source: mysql::Error) -> MysqlError {
    MysqlError::Enumerate {
        kind,
        schema: schema.to_string(),
        source,
    }
}
