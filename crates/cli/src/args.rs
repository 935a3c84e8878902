//! CLI surface (SPEC_FULL.md §10, §13): `--source-*`/`--dest-*` connection
//! flags plus `--output-dir` and the optional `--report`. Intentionally
//! minimal — no config-file loading, no profile management (spec.md §1's
//! Non-goals).

use std::path::PathBuf;

use clap::Parser;
use schemadiff_core::ConnectionParams;

#[derive(Debug, Parser)]
#[command(name = "schemadiff", about = "Diffs two MariaDB/MySQL schemas and writes a migration + rollback script.")]
pub struct Cli {
    #[arg(long, default_value = "127.0.0.1")]
    pub source_host: String,
    #[arg(long, default_value_t = 3306)]
    pub source_port: u16,
    #[arg(long, default_value = "root")]
    pub source_user: String,
    #[arg(long, default_value = "")]
    pub source_password: String,
    #[arg(long)]
    pub source_schema: String,

    #[arg(long, default_value = "127.0.0.1")]
    pub dest_host: String,
    #[arg(long, default_value_t = 3306)]
    pub dest_port: u16,
    #[arg(long, default_value = "root")]
    pub dest_user: String,
    #[arg(long, default_value = "")]
    pub dest_password: String,
    #[arg(long)]
    pub dest_schema: String,

    /// Directory `migration.sql`/`rollback.sql` (and `diff_report.json`, if
    /// `--report` is passed) are written into.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Also emit `diff_report.json` (SPEC_FULL.md §15).
    #[arg(long, default_value_t = false)]
    pub report: bool,
}

impl Cli {
    #[must_use]
    pub fn source_params(&self) -> ConnectionParams {
        ConnectionParams::new(&self.source_host, self.source_port, &self.source_user, &self.source_password, &self.source_schema)
    }

    #[must_use]
    pub fn dest_params(&self) -> ConnectionParams {
        ConnectionParams::new(&self.dest_host, self.dest_port, &self.dest_user, &self.dest_password, &self.dest_schema)
    }
}
