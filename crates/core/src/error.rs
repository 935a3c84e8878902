//! The severity ladder from spec.md §7, modeled as a `thiserror` enum the
//! way the teacher's `core::error` does.

use crate::ir::ObjectKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection/permission failure. Fatal — abort the run, no files
    /// written.
    #[error("connection to schema `{schema}` failed: {source}")]
    Connection {
        schema: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Enumeration failure (`SHOW FULL TABLES` etc). Fatal, same handling
    /// as a connection failure.
    #[error("enumeration of {kind} objects in `{schema}` failed: {source}")]
    Enumeration {
        kind: ObjectKind,
        schema: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A programmer error: an invariant from spec.md §3 was violated.
    /// Never expected in normal operation.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parser failure on a single `CREATE TABLE` (§7: recoverable). Carried
/// alongside the opaque DDL rather than propagated as an `Error`, so the
/// table differ can fall back to whitespace-normalized comparison.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("failed to parse CREATE TABLE `{table}`: {message}")]
pub struct ParseError {
    pub table: String,
    pub message: String,
}
