// src/fetch/files.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use std::{io::ErrorKind, path::PathBuf};
use tokio::fs;
use tracing::{debug, instrument};

use super::{Fetched, ReportSource};
use crate::error::FetchError;
use crate::process::utils::{decode_report_bytes, report_file_stem};

/// Reports from a local mirror laid out as `<dir>/<REPORT>/<REPORT><YYYYMMDD>.txt`
/// (an upper-case `.TXT` extension is accepted too).
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn candidates(&self, report_id: &str, date: NaiveDate) -> [PathBuf; 2] {
        let stem = report_file_stem(report_id, date);
        let base = self.dir.join(report_id);
        [base.join(format!("{stem}.txt")), base.join(format!("{stem}.TXT"))]
    }
}

#[async_trait]
impl ReportSource for FileSource {
    #[instrument(level = "debug", skip(self), fields(report = %report_id, date = %date))]
    async fn fetch(&self, report_id: &str, date: NaiveDate) -> Result<Fetched, FetchError> {
        for path in self.candidates(report_id, date) {
            match fs::read(&path).await {
                Ok(bytes) => {
                    debug!(path = %path.display(), "read report");
                    return Ok(Fetched::Report(decode_report_bytes(&bytes)));
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(FetchError::Transient {
                        url: path.display().to_string(),
                        reason: e.to_string(),
                    })
                }
            }
        }
        Ok(Fetched::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn reads_mirror_and_reports_missing_days() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("LM_XB452");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("LM_XB45220210301.TXT"), b"caf\xe9 report").unwrap();

        let src = FileSource::new(tmp.path());
        let got = src
            .fetch("LM_XB452", NaiveDate::from_ymd_opt(2021, 3, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(got, Fetched::Report("café report".to_string()));

        let missing = src
            .fetch("LM_XB452", NaiveDate::from_ymd_opt(2021, 3, 2).unwrap())
            .await
            .unwrap();
        assert_eq!(missing, Fetched::NotFound);
    }
}
