// src/update/mod.rs

pub mod plan;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::{
    collections::{BTreeMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{sync::mpsc, task::JoinHandle, time::Instant};
use tracing::{debug, error, info, instrument, warn};

use crate::config::UpdateConfig;
use crate::dataset::{DatasetStore, Snapshot};
use crate::fetch::{Fetched, ReportSource};
use crate::process::ingest_report;
use crate::schema::{ReportRecord, SectionRegistry};

pub use plan::{is_settled, is_weekend, plan_days};

/// Why a report's catch-up ended this cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Every planned day was handled.
    UpToDate,
    /// The source has nothing for this (recent) day yet.
    NotPublished(NaiveDate),
    /// Fetching this day failed after retries.
    Transient(NaiveDate),
    /// Another run already holds this report type.
    AlreadyRunning,
    /// The merger went away before this report finished.
    Cancelled,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleSummary {
    pub days_merged: usize,
    pub records_merged: usize,
    pub stopped: BTreeMap<String, StopReason>,
}

/// Report types with a catch-up in flight.
#[derive(Debug, Clone, Default)]
pub struct RunGuard {
    running: Arc<Mutex<HashSet<String>>>,
}

/// Releases its report type when dropped.
#[derive(Debug)]
pub struct RunLease {
    report_id: String,
    running: Arc<Mutex<HashSet<String>>>,
}

impl RunGuard {
    pub fn try_acquire(&self, report_id: &str) -> Option<RunLease> {
        let mut running = self.running.lock().unwrap_or_else(|p| p.into_inner());
        if !running.insert(report_id.to_string()) {
            return None;
        }
        Some(RunLease {
            report_id: report_id.to_string(),
            running: Arc::clone(&self.running),
        })
    }

    pub fn is_running(&self, report_id: &str) -> bool {
        self.running
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .contains(report_id)
    }
}

impl Drop for RunLease {
    fn drop(&mut self) {
        self.running
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(&self.report_id);
    }
}

/// One successfully fetched and parsed day.
struct FetchedDay {
    report_id: String,
    date: NaiveDate,
    records: Vec<ReportRecord>,
}

/// Brings the dataset up to date with the report source.
pub struct Updater {
    store: DatasetStore,
    source: Arc<dyn ReportSource>,
    registry: Arc<SectionRegistry>,
    settings: UpdateConfig,
    guard: RunGuard,
}

impl Updater {
    pub fn new(
        store: DatasetStore,
        source: Arc<dyn ReportSource>,
        registry: SectionRegistry,
        settings: UpdateConfig,
    ) -> Self {
        Self {
            store,
            source,
            registry: Arc::new(registry),
            settings,
            guard: RunGuard::default(),
        }
    }

    pub fn guard(&self) -> &RunGuard {
        &self.guard
    }

    /// Catch every tracked report up to `today`.
    ///
    /// One task per report fetches days in order; each parsed day goes
    /// through a channel to this loop, which merges and persists it before
    /// taking the next, so an interrupted cycle keeps what it already wrote.
    #[instrument(level = "info", skip(self), fields(today = %today))]
    pub async fn run_cycle(&self, today: NaiveDate) -> Result<CycleSummary> {
        let start = Instant::now();
        let mut snapshot = self.load_snapshot().await?;
        let mut summary = CycleSummary::default();

        let (tx, mut rx) = mpsc::channel::<FetchedDay>(16);
        let mut handles: Vec<(String, JoinHandle<StopReason>)> = Vec::new();

        for report_id in &self.settings.tracked_reports {
            if !self.registry.supports(report_id) {
                warn!(report = %report_id, "no section layout registered; skipping");
                continue;
            }
            let Some(lease) = self.guard.try_acquire(report_id) else {
                warn!(report = %report_id, "catch-up already running; skipping");
                summary
                    .stopped
                    .insert(report_id.clone(), StopReason::AlreadyRunning);
                continue;
            };

            let days = plan_days(
                snapshot.dataset().last_date(report_id),
                self.settings.start_date,
                today,
                self.settings.skip_weekends,
            );
            info!(report = %report_id, days = days.len(), "planned catch-up");

            let job = CatchUp {
                report_id: report_id.clone(),
                today,
                grace_days: self.settings.missing_day_grace_days,
                source: Arc::clone(&self.source),
                registry: Arc::clone(&self.registry),
            };
            let tx = tx.clone();
            handles.push((
                report_id.clone(),
                tokio::spawn(async move {
                    let _lease = lease;
                    job.run(days, tx).await
                }),
            ));
        }
        // drop our sender so `rx.recv()` ends once every report is done
        drop(tx);

        while let Some(day) = rx.recv().await {
            let rows = day.records.len();
            if rows == 0 {
                debug!(report = %day.report_id, date = %day.date, "no rows to merge");
                continue;
            }
            snapshot = self
                .persist(snapshot, day.records)
                .await
                .with_context(|| format!("persisting {} {}", day.report_id, day.date))?;
            summary.days_merged += 1;
            summary.records_merged += rows;
            info!(report = %day.report_id, date = %day.date, rows, total = snapshot.dataset().len(), "merged day");
        }

        for (report_id, handle) in handles {
            let reason = match handle.await {
                Ok(reason) => reason,
                Err(e) => {
                    error!(report = %report_id, error = %e, "catch-up task failed");
                    StopReason::Cancelled
                }
            };
            summary.stopped.insert(report_id, reason);
        }

        info!(
            days = summary.days_merged,
            records = summary.records_merged,
            elapsed = ?start.elapsed(),
            "cycle complete"
        );
        Ok(summary)
    }

    async fn load_snapshot(&self) -> Result<Snapshot> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.load())
            .await?
            .with_context(|| format!("loading dataset {}", self.store.path().display()))
    }

    async fn persist(&self, mut snapshot: Snapshot, records: Vec<ReportRecord>) -> Result<Snapshot> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.merge_into(&mut snapshot, records).map(|_| snapshot))
            .await?
            .map_err(Into::into)
    }

    /// Run a cycle, sleep, repeat. A failed cycle is logged and retried on
    /// the next tick.
    pub async fn run_forever(&self, interval: Duration) -> Result<()> {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let today = Local::now().date_naive();
            if let Err(e) = self.run_cycle(today).await {
                error!(error = ?e, "update cycle failed");
            }
        }
    }
}

/// Sequential catch-up of one report type.
struct CatchUp {
    report_id: String,
    today: NaiveDate,
    grace_days: i64,
    source: Arc<dyn ReportSource>,
    registry: Arc<SectionRegistry>,
}

impl CatchUp {
    async fn run(self, days: Vec<NaiveDate>, tx: mpsc::Sender<FetchedDay>) -> StopReason {
        for date in days {
            match self.source.fetch(&self.report_id, date).await {
                Ok(Fetched::Report(text)) => {
                    let records: Vec<ReportRecord> =
                        ingest_report(&text, &self.report_id, date, &self.registry).collect();
                    debug!(report = %self.report_id, date = %date, rows = records.len(), "parsed report");
                    let day = FetchedDay {
                        report_id: self.report_id.clone(),
                        date,
                        records,
                    };
                    if tx.send(day).await.is_err() {
                        return StopReason::Cancelled;
                    }
                }
                Ok(Fetched::NotFound) if is_settled(date, self.today, self.grace_days) => {
                    debug!(report = %self.report_id, date = %date, "never published; skipping");
                }
                Ok(Fetched::NotFound) => {
                    info!(report = %self.report_id, date = %date, "not published yet");
                    return StopReason::NotPublished(date);
                }
                Err(e) => {
                    warn!(report = %self.report_id, date = %date, error = %e, "fetch failed; stopping");
                    return StopReason::Transient(date);
                }
            }
        }
        StopReason::UpToDate
    }
}
