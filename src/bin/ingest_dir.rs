// Backfill the dataset from a local mirror of report files.
//
//     ingest_dir [REPORTS_DIR]

use anyhow::{Context, Result};
use beefscraper::{config::Config, dataset::DatasetStore, logging, process::ingest_dir};
use std::{env, path::PathBuf, time::Instant};
use tracing::info;

fn main() -> Result<()> {
    logging::init();

    let cfg = Config::load()?;
    let dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| cfg.reports_dir.clone());

    let start = Instant::now();
    let records = ingest_dir(&dir, &cfg.registry())?;
    info!(rows = records.len(), elapsed = ?start.elapsed(), "parsed local reports");

    let store = DatasetStore::new(&cfg.dataset_path);
    let dataset = store
        .commit(records)
        .with_context(|| format!("writing {}", cfg.dataset_path.display()))?;

    println!(
        "{} rows across {} report type(s) in {}",
        dataset.len(),
        dataset.reports().len(),
        store.path().display()
    );
    Ok(())
}
