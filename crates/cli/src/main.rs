mod args;
mod error_presentation;
mod report;

use std::fs;

use clap::Parser;
use schemadiff_core::{build_forward_plan, build_reverse_plan, diff_snapshots, render_plan};

use args::Cli;
use error_presentation::{render_runtime_error, CliError, CliResult};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(error) = run(&cli) {
        eprintln!("{}", render_runtime_error(error));
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let source_params = cli.source_params();
    let dest_params = cli.dest_params();
    tracing::debug!(source = ?source_params, dest = ?dest_params, "connection parameters resolved");

    let (source_pool, _source_version) =
        schemadiff_mysql::connect(&source_params).map_err(CliError::SourceSnapshot)?;
    let source_snapshot =
        schemadiff_mysql::snapshot(&source_pool, &source_params.schema).map_err(CliError::SourceSnapshot)?;

    let (dest_pool, _dest_version) = schemadiff_mysql::connect(&dest_params).map_err(CliError::DestSnapshot)?;
    let dest_snapshot = schemadiff_mysql::snapshot(&dest_pool, &dest_params.schema).map_err(CliError::DestSnapshot)?;

    let diff = diff_snapshots(&source_snapshot, &dest_snapshot);

    let forward_plan = build_forward_plan(&diff, &source_snapshot, &dest_snapshot, &dest_params.schema);
    let reverse_plan = build_reverse_plan(&diff, &dest_snapshot, &dest_params.schema)?;

    let generated_at = chrono::Utc::now().to_rfc3339();
    let migration_sql = render_plan(&forward_plan, &source_params.schema, &dest_params.schema, &generated_at);
    let rollback_sql = render_plan(&reverse_plan, &source_params.schema, &dest_params.schema, &generated_at);

    fs::create_dir_all(&cli.output_dir).map_err(|source| CliError::WriteOutput {
        path: cli.output_dir.clone(),
        source,
    })?;

    let migration_path = cli.output_dir.join("migration.sql");
    fs::write(&migration_path, migration_sql).map_err(|source| CliError::WriteOutput {
        path: migration_path.clone(),
        source,
    })?;

    let rollback_path = cli.output_dir.join("rollback.sql");
    fs::write(&rollback_path, rollback_sql).map_err(|source| CliError::WriteOutput {
        path: rollback_path.clone(),
        source,
    })?;

    if cli.report {
        let report = report::build_report(&diff, &generated_at);
        let report_path = cli.output_dir.join("diff_report.json");
        let report_json = serde_json::to_string_pretty(&report).expect("DiffReport serialization cannot fail");
        fs::write(&report_path, report_json).map_err(|source| CliError::WriteOutput {
            path: report_path.clone(),
            source,
        })?;
    }

    tracing::info!(
        migration = %migration_path.display(),
        rollback = %rollback_path.display(),
        "migration scripts written"
    );
    Ok(())
}
