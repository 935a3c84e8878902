//! Wraps `mysql::Error` at the connection/enumeration boundary into
//! `schemadiff_core::Error` (SPEC_FULL.md §12).

use schemadiff_core::{Error as CoreError, ObjectKind};

#[derive(Debug, thiserror::Error)]
pub enum MysqlError {
    #[error("failed to connect to schema `{schema}`")]
    Connect {
        schema: String,
        #[source]
        source: mysql::Error,
    },
    #[error("failed to enumerate {kind} objects in `{schema}`")]
    Enumerate {
        kind: ObjectKind,
        schema: String,
        #[source]
        source: mysql::Error,
    },
}

impl From<MysqlError> for CoreError {
    fn from(value: MysqlError) -> Self {
        match value {
            MysqlError::Connect { schema, source } => CoreError::Connection {
                schema,
                source: Box::new(source),
            },
            MysqlError::Enumerate { kind, schema, source } => CoreError::Enumeration {
                kind,
                schema,
                source: Box::new(source),
            },
        }
    }
}
