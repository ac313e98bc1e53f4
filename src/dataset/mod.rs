// src/dataset/mod.rs

pub mod cache;
pub mod merge;
pub mod query;
pub mod store;

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::schema::ReportRecord;

pub use cache::DatasetCache;
pub use merge::merge;
pub use query::{ColumnSummary, Query, Summary};
pub use store::{DatasetStore, Fingerprint, Snapshot};

/// Date-ordered collection of report records.
///
/// Consumers only ever see it through these accessors; the merger is the
/// only place a new `Dataset` is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<ReportRecord>,
}

impl Dataset {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Callers must hand over records already sorted by date.
    pub(crate) fn from_sorted(records: Vec<ReportRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ReportRecord] {
        &self.records
    }

    /// Distinct report ids.
    pub fn reports(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.report_id.as_str()).collect()
    }

    /// Distinct cut types of one report.
    pub fn cut_types(&self, report: &str) -> BTreeSet<&str> {
        self.records
            .iter()
            .filter(|r| r.report_id == report)
            .map(|r| r.cut_type.as_str())
            .collect()
    }

    /// Distinct item descriptions of one report section.
    pub fn items(&self, report: &str, cut_type: &str) -> BTreeSet<&str> {
        self.records
            .iter()
            .filter(|r| r.report_id == report && r.cut_type == cut_type)
            .map(|r| r.item_description.as_str())
            .collect()
    }

    /// Latest report date on file for a report, if any.
    pub fn last_date(&self, report: &str) -> Option<NaiveDate> {
        self.records
            .iter()
            .filter(|r| r.report_id == report)
            .map(|r| r.report_date)
            .max()
    }
}
