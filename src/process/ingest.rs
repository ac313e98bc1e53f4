// src/process/ingest.rs

use anyhow::{Context, Result};
use chrono::NaiveDate;
use glob::glob;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};

use crate::process::sections::{normalize_report_text, split_sections};
use crate::process::table::build_table;
use crate::process::utils::{decode_report_bytes, parse_report_filename};
use crate::schema::{ReportRecord, SectionRegistry};

/// Parse one report's text into dataset records.
///
/// Lazy and finite. A section whose table cannot be built is logged and
/// skipped; the other sections of the report are still yielded.
pub fn ingest_report<'a>(
    text: &str,
    report_id: &'a str,
    report_date: NaiveDate,
    registry: &'a SectionRegistry,
) -> impl Iterator<Item = ReportRecord> + 'a {
    let normalized = normalize_report_text(text);

    // the section iterator borrows the normalized text, so sections are
    // collected here and the heavy per-section work stays lazy
    let sections: Vec<_> = split_sections(&normalized, report_id, registry).collect();
    if sections.is_empty() {
        debug!(report = %report_id, date = %report_date, "no recognised sections");
    }

    sections.into_iter().flat_map(move |section| {
        let rows = match build_table(&section) {
            Ok(table) => table.rows,
            Err(e) => {
                warn!(
                    report = %report_id,
                    date = %report_date,
                    section = %section.name,
                    error = %e,
                    "skipping section"
                );
                Vec::new()
            }
        };
        let cut_type = section.name;
        rows.into_iter()
            .map(move |row| row.into_record(report_id, report_date, &cut_type))
    })
}

/// Read and ingest a single report file named `<REPORT><YYYYMMDD>.txt`.
#[instrument(level = "debug", skip(registry), fields(path = %path.display()))]
pub fn ingest_file(path: &Path, registry: &SectionRegistry) -> Result<Vec<ReportRecord>> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("no file stem in {}", path.display()))?;
    let (report_id, date) = parse_report_filename(stem)
        .with_context(|| format!("cannot read report id and date from {:?}", stem))?;

    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let text = decode_report_bytes(&bytes);
    Ok(ingest_report(&text, &report_id, date, registry).collect())
}

/// Report files under `reports_dir`, laid out as `<REPORT>/<REPORT><YYYYMMDD>.txt`.
pub fn discover_report_files(reports_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for ext in ["txt", "TXT"] {
        let pattern = format!("{}/*/*.{}", reports_dir.display(), ext);
        for entry in glob(&pattern).context("invalid glob pattern for report files")? {
            match entry {
                Ok(p) if p.is_file() => files.push(p),
                Ok(_) => {}
                Err(e) => warn!("cannot read glob entry: {:?}", e),
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Ingest every report file in the local mirror. Unreadable or misnamed
/// files are logged and skipped.
#[instrument(level = "info", skip(registry), fields(dir = %reports_dir.display()))]
pub fn ingest_dir(reports_dir: &Path, registry: &SectionRegistry) -> Result<Vec<ReportRecord>> {
    let files = discover_report_files(reports_dir)?;
    info!(files = files.len(), "ingesting local reports");

    let mut records = Vec::new();
    for (i, path) in files.iter().enumerate() {
        match ingest_file(path, registry) {
            Ok(mut recs) => {
                debug!(file = %path.display(), rows = recs.len(), "{}/{}", i + 1, files.len());
                records.append(&mut recs);
            }
            Err(e) => warn!(file = %path.display(), error = ?e, "skipping report file"),
        }
    }
    Ok(records)
}
