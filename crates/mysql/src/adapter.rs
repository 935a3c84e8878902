//! Live connection handling (§4.1, §4.2), grounded on the teacher's
//! `dialect-mysql/src/adapter.rs`: a pooled connection, a version guard, and
//! small free functions for querying/decoding rows that stay testable
//! without a live server.

use mysql::prelude::Queryable;
use mysql::{OptsBuilder, Pool, PooledConn, Row};
use schemadiff_core::ConnectionParams;

use crate::error::MysqlError;
use crate::queries::SHOW_SERVER_VERSION_QUERY;

/// MariaDB/MySQL version spec.md §1 names as the supported baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerVersion {
    pub is_mariadb: bool,
    pub major: u16,
    pub minor: u16,
}

const MIN_MARIADB_MAJOR: u16 = 10;
const MIN_MARIADB_MINOR: u16 = 3;
const MIN_MYSQL_MAJOR: u16 = 5;
const MIN_MYSQL_MINOR: u16 = 7;

impl ServerVersion {
    #[must_use]
    pub fn meets_minimum(&self) -> bool {
        let (min_major, min_minor) = if self.is_mariadb {
            (MIN_MARIADB_MAJOR, MIN_MARIADB_MINOR)
        } else {
            (MIN_MYSQL_MAJOR, MIN_MYSQL_MINOR)
        };
        (self.major, self.minor) >= (min_major, min_minor)
    }
}

/// Parses `SELECT VERSION()` output, e.g. `8.0.36` or `10.11.6-MariaDB`.
#[must_use]
pub fn parse_server_version(raw: &str) -> Option<ServerVersion> {
    let is_mariadb = raw.to_ascii_lowercase().contains("mariadb");
    let mut parts = raw.split_whitespace().next()?.split('-').next()?.split('.');
    let major = parse_version_component(parts.next()?)?;
    let minor = parts.next().and_then(parse_version_component).unwrap_or(0);
    Some(ServerVersion {
        is_mariadb,
        major,
        minor,
    })
}

fn parse_version_component(raw: &str) -> Option<u16> {
    let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Opens a connection pool and confirms the server meets spec.md §1's
/// minimum-version baseline. The pool, not a single connection, is handed
/// back — §4.2's small-constant fan-out borrows one connection per kind.
pub fn connect(params: &ConnectionParams) -> Result<(Pool, ServerVersion), MysqlError> {
    let opts = OptsBuilder::new()
        .ip_or_hostname(Some(params.host.clone()))
        .tcp_port(params.port)
        .user(Some(params.user.clone()))
        .pass(Some(params.password.clone()))
        .db_name(Some(params.schema.clone()));

    let pool = Pool::new(opts).map_err(|source| MysqlError::Connect {
        schema: params.schema.clone(),
        source,
    })?;
    let mut connection = pool.get_conn().map_err(|source| MysqlError::Connect {
        schema: params.schema.clone(),
        source,
    })?;

    let raw_version = query_scalar(&mut connection, SHOW_SERVER_VERSION_QUERY).map_err(|source| MysqlError::Connect {
        schema: params.schema.clone(),
        source,
    })?;
    let version = parse_server_version(&raw_version).unwrap_or(ServerVersion {
        is_mariadb: false,
        major: 0,
        minor: 0,
    });

    Ok((pool, version))
}

/// Borrows one connection from `pool` for a single kind's enumeration pass.
pub(crate) fn get_conn(pool: &Pool, schema: &str) -> Result<PooledConn, MysqlError> {
    pool.get_conn().map_err(|source| MysqlError::Connect {
        schema: schema.to_string(),
        source,
    })
}

pub(crate) fn query_scalar(connection: &mut PooledConn, sql: &str) -> mysql::Result<String> {
    connection
        .query_first::<String, _>(sql)?
        .ok_or_else(|| mysql::Error::IoError(std::io::Error::other(format!("query returned no rows: {sql}"))))
}

pub(crate) fn row_string(row: &Row, index: usize, label: &str) -> Option<String> {
    let value = row
        .get::<String, usize>(index)
        .or_else(|| row.get::<Option<String>, usize>(index).flatten());
    if value.is_none() {
        tracing::warn!(column = label, "missing or non-string column in query result");
    }
    value
}

/// Strips a leading `CREATE DATABASE ...;`/`USE ...;` preamble some servers
/// prepend to `SHOW CREATE ...` output, and ensures the remainder is
/// terminated with a semicolon (§4.1's contract).
#[must_use]
pub fn clean_ddl(raw: &str) -> String {
    let mut text = raw.trim();
    loop {
        let lower = text.to_ascii_lowercase();
        if lower.starts_with("use ") || lower.starts_with("create database") {
            match text.find(';') {
                Some(idx) => text = text[idx + 1..].trim_start(),
                None => break,
            }
        } else {
            break;
        }
    }
    let text = text.trim();
    if text.is_empty() || text.ends_with(';') {
        text.to_string()
    } else {
        format!("{text};")
    }
}
