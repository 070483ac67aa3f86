//! # Tidecast Entry Point
//!
//! Batch shell around the prediction engine, in the shape the surrounding
//! task runtime expects: one invocation, one piece of work, JSON on
//! stdout. Two subcommands:
//!
//! ```text
//! tidecast import <store.sqlite> <source-dir>   build a station store
//! tidecast predict <lat> <lon> [dtg]            one tide prediction
//! ```
//!
//! `dtg` is `YYYY-MM-DD-HH-mm`; omitted means "now". Configuration (store
//! path, cache path, in-memory flag) comes from `tide-config.toml` in the
//! working directory.

use anyhow::{bail, Context, Result};
use std::env;
use std::path::Path;
use tidecast::{config::Config, engine::TideEngine, importer};

const USAGE: &str = "usage: tidecast import <store.sqlite> <source-dir>\n       tidecast predict <lat> <lon> [dtg]";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let rt = tokio::runtime::Runtime::new()?;

    match args.first().map(String::as_str) {
        Some("import") => {
            if args.len() != 3 {
                bail!("{USAGE}");
            }
            let report = rt.block_on(importer::import_stations(
                Path::new(&args[1]),
                Path::new(&args[2]),
            ))?;
            println!(
                "imported {} stations from {} files ({} rows skipped)",
                report.rows_imported, report.files, report.rows_skipped
            );
        }
        Some("predict") => {
            if !(3..=4).contains(&args.len()) {
                bail!("{USAGE}");
            }
            let lat: f64 = args[1].parse().context("latitude must be a number")?;
            let lon: f64 = args[2].parse().context("longitude must be a number")?;
            let dtg = args.get(3).map(String::as_str);

            let config = Config::load();
            let engine = rt.block_on(TideEngine::open(&config))?;
            let summary = engine.coordinate(lat, lon, dtg);
            println!("{}", serde_json::to_string(&summary)?);
        }
        _ => bail!("{USAGE}"),
    }

    Ok(())
}
