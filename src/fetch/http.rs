// src/fetch/http.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};
use url::Url;

use super::{Fetched, ReportSource};
use crate::config::SourceConfig;
use crate::error::FetchError;
use crate::process::utils::{decode_report_bytes, report_file_stem};

/// Daily report text over HTTP, at `<base_url><REPORT><YYYYMMDD>.TXT`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base: Url,
    max_retries: u32,
    initial_backoff_ms: u64,
}

impl HttpSource {
    pub fn new(cfg: &SourceConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(cfg.timeout()).build()?;
        Ok(Self::with_client(client, cfg)?)
    }

    pub fn with_client(client: Client, cfg: &SourceConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client,
            base: Url::parse(&cfg.base_url)?,
            max_retries: cfg.max_retries,
            initial_backoff_ms: cfg.retry_backoff_ms,
        })
    }

    pub fn report_url(&self, report_id: &str, date: NaiveDate) -> Result<Url, FetchError> {
        Ok(self
            .base
            .join(&format!("{}.TXT", report_file_stem(report_id, date)))?)
    }

    /// One attempt. `Ok(None)` is a 404.
    async fn get_once(&self, url: &Url) -> Result<Option<Vec<u8>>, String> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| format!("GET failed: {e}"))?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = resp
            .error_for_status()
            .map_err(|e| format!("non-success status: {e}"))?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| format!("reading body: {e}"))?;
        Ok(Some(bytes.to_vec()))
    }
}

#[async_trait]
impl ReportSource for HttpSource {
    #[instrument(level = "debug", skip(self), fields(report = %report_id, date = %date))]
    async fn fetch(&self, report_id: &str, date: NaiveDate) -> Result<Fetched, FetchError> {
        let url = self.report_url(report_id, date)?;
        let mut attempts = 0;
        loop {
            match self.get_once(&url).await {
                Ok(Some(bytes)) => {
                    debug!(%url, bytes = bytes.len(), "fetched report");
                    return Ok(Fetched::Report(decode_report_bytes(&bytes)));
                }
                Ok(None) => {
                    debug!(%url, "report not published");
                    return Ok(Fetched::NotFound);
                }
                Err(reason) if attempts < self.max_retries => {
                    attempts += 1;
                    let backoff = self.initial_backoff_ms * 2u64.pow(attempts - 1);
                    warn!(%url, attempt = attempts, delay_ms = backoff, error = %reason, "retrying");
                    sleep(Duration::from_millis(backoff)).await;
                }
                Err(reason) => {
                    error!(%url, error = %reason, "exhausted retries");
                    return Err(FetchError::Transient {
                        url: url.to_string(),
                        reason,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(base_url: &str, max_retries: u32) -> SourceConfig {
        SourceConfig {
            base_url: base_url.to_string(),
            max_retries,
            retry_backoff_ms: 1,
            timeout_secs: 1,
        }
    }

    #[test]
    fn builds_report_urls() {
        let src = HttpSource::new(&cfg("https://example.org/mnreports/", 0)).unwrap();
        let url = src
            .report_url("LM_XB452", NaiveDate::from_ymd_opt(2021, 3, 1).unwrap())
            .unwrap();
        assert_eq!(url.as_str(), "https://example.org/mnreports/LM_XB45220210301.TXT");
    }

    #[test]
    fn rejects_bad_base_url() {
        let err = HttpSource::new(&cfg("not a url", 0)).unwrap_err();
        assert!(err.downcast_ref::<FetchError>().is_some());
    }

    #[tokio::test]
    async fn unreachable_host_is_transient() {
        // nothing listens on port 9 locally
        let src = HttpSource::new(&cfg("http://127.0.0.1:9/", 1)).unwrap();
        let err = src
            .fetch("LM_XB452", NaiveDate::from_ymd_opt(2021, 3, 1).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transient { .. }));
    }
}
