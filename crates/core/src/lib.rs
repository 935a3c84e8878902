//! Snapshot, diff, and migration-plan model for MariaDB/MySQL schema
//! comparison: no network I/O lives here, only the pure pieces (DDL
//! parsing, diffing, planning, rendering) that operate on already-fetched
//! schema snapshots. Live introspection is `schemadiff-mysql`'s job.

pub mod config;
pub mod diff;
pub mod error;
pub mod ir;
pub mod normalize;
pub mod parser;
pub mod plan;
pub mod render;
pub mod table;

pub use config::ConnectionParams;
pub use diff::{diff_snapshots, Diff, KindDiff, TableChange, TableDelta};
pub use error::{Error, ParseError, Result};
pub use ir::{ObjectKind, ObjectRecord, ObjectRef, Snapshot};
pub use parser::parse_create_table;
pub use plan::{build_forward_plan, build_reverse_plan, Plan, PlanItem, Section};
pub use render::render_plan;
pub use table::Table;
