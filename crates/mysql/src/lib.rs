//! Live MariaDB/MySQL introspection (spec.md §4.1, §4.2): the only crate
//! in this workspace allowed to block on database I/O (§5).

mod adapter;
mod error;
mod introspect;
mod queries;

pub use adapter::{connect, parse_server_version, ServerVersion};
pub use error::MysqlError;
pub use introspect::snapshot;
