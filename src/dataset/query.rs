// src/dataset/query.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Dataset;
use crate::schema::arrow::NUMERIC_COLUMN_NAMES;
use crate::schema::ReportRecord;

/// Row filter over the dataset. Unset fields match everything; the date
/// bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub report: Option<String>,
    pub cut_type: Option<String>,
    pub item: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(mut self, report: impl Into<String>) -> Self {
        self.report = Some(report.into());
        self
    }

    pub fn cut_type(mut self, cut_type: impl Into<String>) -> Self {
        self.cut_type = Some(cut_type.into());
        self
    }

    pub fn item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub fn from(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to(mut self, to: NaiveDate) -> Self {
        self.to = Some(to);
        self
    }

    pub fn matches(&self, r: &ReportRecord) -> bool {
        self.report.as_deref().map_or(true, |v| r.report_id == v)
            && self.cut_type.as_deref().map_or(true, |v| r.cut_type == v)
            && self.item.as_deref().map_or(true, |v| r.item_description == v)
            && self.from.map_or(true, |d| r.report_date >= d)
            && self.to.map_or(true, |d| r.report_date <= d)
    }
}

/// Statistics over the present values of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: &'static str,
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub total: Option<f64>,
    pub mode: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
}

impl Summary {
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.column == name)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    }
}

/// Most frequent value; ties go to the smallest.
fn mode(sorted: &[f64]) -> Option<f64> {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for v in sorted {
        *counts.entry(v.to_bits()).or_default() += 1;
    }
    let best = counts.values().copied().max()?;
    sorted.iter().copied().find(|v| counts[&v.to_bits()] == best)
}

impl ColumnSummary {
    fn of(column: &'static str, values: impl Iterator<Item = Option<f64>>) -> Self {
        let mut vals: Vec<f64> = values.flatten().collect();
        vals.sort_by(f64::total_cmp);
        let total: f64 = vals.iter().sum();
        let has = !vals.is_empty();

        Self {
            column,
            count: vals.len(),
            mean: has.then(|| round2(total / vals.len() as f64)),
            median: median(&vals).map(round2),
            min: vals.first().copied(),
            max: vals.last().copied(),
            total: has.then(|| round2(total)),
            mode: mode(&vals),
        }
    }
}

impl Dataset {
    /// Matching records in date order.
    pub fn query(&self, q: &Query) -> Vec<&ReportRecord> {
        self.records().iter().filter(|r| q.matches(r)).collect()
    }

    /// Per-column statistics of the rows `q` selects, missing values skipped.
    pub fn summarize(&self, q: &Query) -> Summary {
        let rows = self.query(q);
        let getters: [fn(&ReportRecord) -> Option<f64>; 5] = [
            |r| r.number_trades,
            |r| r.total_pounds,
            |r| r.price_range_low,
            |r| r.price_range_high,
            |r| r.weighted_average,
        ];
        let columns = NUMERIC_COLUMN_NAMES
            .into_iter()
            .zip(getters)
            .map(|(name, get)| ColumnSummary::of(name, rows.iter().map(|r| get(*r))))
            .collect();

        Summary {
            rows: rows.len(),
            columns,
        }
    }
}
