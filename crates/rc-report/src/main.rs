//! runchart CLI: scan a chart data directory, merge groups, export HTML.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use rc_merge::merge_all;
use rc_report::RenderExporter;
use rc_store::ChartStore;

#[derive(Parser)]
#[command(
    name = "runchart",
    version,
    about = "Merge recorded load-test charts and export HTML artifacts"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List charts recorded in a data directory, across all runs.
    List {
        /// Directory holding chart metadata and data files.
        #[arg(long)]
        data_dir: PathBuf,
    },
    /// Merge chart groups and write one HTML artifact per group.
    Export {
        /// Directory holding chart metadata and data files.
        #[arg(long)]
        data_dir: PathBuf,
        /// Directory the HTML artifacts are written into.
        #[arg(long)]
        output_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, code = err.code(), "runchart failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> rc_common::Result<()> {
    match cli.command {
        Command::List { data_dir } => {
            let store = ChartStore::new(data_dir)?;
            for descriptor in store.scan()? {
                println!("{descriptor}");
            }
            Ok(())
        }
        Command::Export {
            data_dir,
            output_dir,
        } => {
            let store = ChartStore::new(data_dir)?;
            let descriptors = store.scan()?;
            info!(charts = descriptors.len(), "scan complete");

            let report = merge_all(&store, &descriptors);
            for err in &report.incompatible {
                warn!(%err, "chart excluded from merge");
            }
            for (group, err) in &report.failed {
                warn!(group = %group, %err, "group merge failed; its sources are untouched");
            }

            let exporter = RenderExporter::new(output_dir)?;
            for chart in &report.merged {
                let path = exporter.export(chart)?;
                info!(group = %chart.group, path = %path.display(), "chart exported");
            }
            info!(
                exported = report.merged.len(),
                skipped = report.incompatible.len(),
                failed = report.failed.len(),
                "export complete"
            );
            Ok(())
        }
    }
}
