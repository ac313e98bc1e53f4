// src/schema/types.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of numeric columns in a per-item section:
/// trades, pounds, price low, price high, weighted average.
pub const NUMERIC_COLUMNS: usize = 5;

/// One classified and coerced line of a section body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// IMPS code, e.g. `185C` or `114`.
    pub item_code: Option<String>,
    /// Frozen/live class digit that follows the code.
    pub class_digit: Option<u8>,
    pub description: String,
    /// Always `NUMERIC_COLUMNS` long; `None` is a blank cell, not zero.
    pub numeric_fields: Vec<Option<f64>>,
}

impl ParsedRow {
    pub fn number_trades(&self) -> Option<f64> {
        self.field(0)
    }

    pub fn total_pounds(&self) -> Option<f64> {
        self.field(1)
    }

    pub fn price_range_low(&self) -> Option<f64> {
        self.field(2)
    }

    pub fn price_range_high(&self) -> Option<f64> {
        self.field(3)
    }

    pub fn weighted_average(&self) -> Option<f64> {
        self.field(4)
    }

    fn field(&self, idx: usize) -> Option<f64> {
        self.numeric_fields.get(idx).copied().flatten()
    }

    /// Attach report identity to this row.
    pub fn into_record(self, report_id: &str, report_date: NaiveDate, cut_type: &str) -> ReportRecord {
        ReportRecord {
            report_id: report_id.to_string(),
            report_date,
            cut_type: cut_type.to_string(),
            number_trades: self.number_trades(),
            total_pounds: self.total_pounds(),
            price_range_low: self.price_range_low(),
            price_range_high: self.price_range_high(),
            weighted_average: self.weighted_average(),
            item_description: self.description,
        }
    }
}

/// A delimiter-bounded block of a report whose header was recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Canonical cut-type name from the registry.
    pub name: String,
    pub raw_content: String,
    pub row_count: usize,
}

/// One row of the persisted dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub report_id: String,
    pub report_date: NaiveDate,
    pub cut_type: String,
    pub item_description: String,
    pub number_trades: Option<f64>,
    pub total_pounds: Option<f64>,
    pub price_range_low: Option<f64>,
    pub price_range_high: Option<f64>,
    pub weighted_average: Option<f64>,
}

/// `(report_id, cut_type, item_description, report_date)`
pub type RecordKey = (String, String, String, NaiveDate);

impl ReportRecord {
    pub fn key(&self) -> RecordKey {
        (
            self.report_id.clone(),
            self.cut_type.clone(),
            self.item_description.clone(),
            self.report_date,
        )
    }

    /// `price_range_low <= price_range_high` whenever both are present.
    pub fn price_range_is_ordered(&self) -> bool {
        match (self.price_range_low, self.price_range_high) {
            (Some(lo), Some(hi)) => lo <= hi,
            _ => true,
        }
    }

    /// Whether two records carry the same values (identity aside).
    pub fn same_values(&self, other: &ReportRecord) -> bool {
        self.number_trades == other.number_trades
            && self.total_pounds == other.total_pounds
            && self.price_range_low == other.price_range_low
            && self.price_range_high == other.price_range_high
            && self.weighted_average == other.weighted_average
    }
}
