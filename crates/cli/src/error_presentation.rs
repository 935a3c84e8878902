//! Consolidated error rendering (spec.md §7: "a single consolidated error
//! message naming the stage that failed"), nearly verbatim in shape from the
//! teacher's `cli::error_presentation`.

use std::{io, path::PathBuf};

use anyhow::Context;
use miette::Report;

const SOURCE_SNAPSHOT_CONTEXT: &str = "while snapshotting the source schema";
const DEST_SNAPSHOT_CONTEXT: &str = "while snapshotting the destination schema";
const WRITE_OUTPUT_CONTEXT: &str = "while writing output files";

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug)]
pub enum CliError {
    SourceSnapshot(schemadiff_mysql::MysqlError),
    DestSnapshot(schemadiff_mysql::MysqlError),
    Core(schemadiff_core::Error),
    WriteOutput { path: PathBuf, source: io::Error },
}

impl From<schemadiff_core::Error> for CliError {
    fn from(value: schemadiff_core::Error) -> Self {
        Self::Core(value)
    }
}

pub fn render_runtime_error(error: CliError) -> String {
    match error {
        CliError::SourceSnapshot(source) => {
            let report = report_with_context(source, SOURCE_SNAPSHOT_CONTEXT);
            format!("[source] {report}")
        }
        CliError::DestSnapshot(source) => {
            let report = report_with_context(source, DEST_SNAPSHOT_CONTEXT);
            format!("[dest] {report}")
        }
        CliError::Core(source) => {
            let category = core_category(&source);
            let report = report_with_context(source, "while diffing or planning");
            format!("[{category}] {report}")
        }
        CliError::WriteOutput { path, source } => {
            let context = format!("{WRITE_OUTPUT_CONTEXT} `{}`", path.display());
            let report = report_with_context(source, context);
            format!("[io] {report}")
        }
    }
}

fn report_with_context<E, C>(source: E, context: C) -> Report
where
    E: std::error::Error + Send + Sync + 'static,
    C: Into<String>,
{
    let context = context.into();
    let anyhow_error = std::result::Result::<(), E>::Err(source)
        .context(context)
        .expect_err("context wrapping must produce an error");
    miette::miette!("{anyhow_error:#}")
}

fn core_category(error: &schemadiff_core::Error) -> &'static str {
    match error {
        schemadiff_core::Error::Connection { .. } => "connection",
        schemadiff_core::Error::Enumeration { .. } => "enumeration",
        schemadiff_core::Error::Invariant(_) => "invariant",
    }
}
