use anyhow::{bail, Result};
use beefscraper::{
    config::Config,
    dataset::DatasetStore,
    fetch::{FileSource, HttpSource, ReportSource},
    logging,
    update::Updater,
};
use chrono::Local;
use std::{env, sync::Arc};
use tracing::info;

const USAGE: &str = "usage: beefscraper [once] [--mirror]";

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    logging::init();
    info!("startup");

    // ─── 2) arguments & config ───────────────────────────────────────
    let mut once = false;
    let mut mirror = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "once" => once = true,
            "--mirror" => mirror = true,
            other => bail!("unknown argument {other:?}\n{USAGE}"),
        }
    }
    let cfg = Config::load()?;
    info!(
        dataset = %cfg.dataset_path.display(),
        reports = ?cfg.update.tracked_reports,
        "configured"
    );

    // ─── 3) wire the updater ─────────────────────────────────────────
    let source: Arc<dyn ReportSource> = if mirror {
        info!(dir = %cfg.reports_dir.display(), "reading reports from local mirror");
        Arc::new(FileSource::new(&cfg.reports_dir))
    } else {
        info!(base = %cfg.source.base_url, "fetching reports over http");
        Arc::new(HttpSource::new(&cfg.source)?)
    };
    let updater = Updater::new(
        DatasetStore::new(&cfg.dataset_path),
        source,
        cfg.registry(),
        cfg.update.clone(),
    );

    // ─── 4) run ──────────────────────────────────────────────────────
    if once {
        let summary = updater.run_cycle(Local::now().date_naive()).await?;
        for (report, reason) in &summary.stopped {
            info!(report = %report, stop = ?reason, "catch-up ended");
        }
        info!("all done");
        return Ok(());
    }
    updater.run_forever(cfg.update.interval()).await
}
