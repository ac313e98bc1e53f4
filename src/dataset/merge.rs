// src/dataset/merge.rs

use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::Dataset;
use crate::schema::{RecordKey, ReportRecord};

/// Append `incoming` to `existing`, collapse duplicate keys keeping the
/// most recently appended record, and order the result by `report_date`.
///
/// Records sharing a date keep their relative append order.
pub fn merge(existing: &Dataset, incoming: Vec<ReportRecord>) -> Dataset {
    let mut all: Vec<ReportRecord> = existing.records().to_vec();
    let appended = incoming.len();

    let previous: HashMap<RecordKey, usize> = all
        .iter()
        .enumerate()
        .map(|(i, r)| (r.key(), i))
        .collect();
    for rec in &incoming {
        if let Some(&i) = previous.get(&rec.key()) {
            if !all[i].same_values(rec) {
                debug!(
                    report = %rec.report_id,
                    cut_type = %rec.cut_type,
                    item = %rec.item_description,
                    date = %rec.report_date,
                    "replacing revised record"
                );
            }
        }
    }
    all.extend(incoming);

    // last occurrence wins: walk backwards keeping the first key we see
    let mut seen: HashSet<RecordKey> = HashSet::with_capacity(all.len());
    let mut kept: Vec<ReportRecord> = all
        .into_iter()
        .rev()
        .filter(|r| seen.insert(r.key()))
        .collect();
    kept.reverse();
    kept.sort_by_key(|r| r.report_date);

    debug!(
        before = existing.len(),
        appended,
        after = kept.len(),
        "merged records"
    );
    Dataset::from_sorted(kept)
}
