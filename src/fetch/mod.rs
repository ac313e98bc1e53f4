// src/fetch/mod.rs

pub mod files;
pub mod http;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::FetchError;

pub use files::FileSource;
pub use http::HttpSource;

/// Outcome of asking a source for one day's report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    Report(String),
    /// Not published (yet, or ever: weekends and holidays).
    NotFound,
}

/// Where raw report text comes from.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch(&self, report_id: &str, date: NaiveDate) -> Result<Fetched, FetchError>;
}
