// src/update/plan.rs

use chrono::{Datelike, NaiveDate, Weekday};

pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Days still to fetch for one report: after `last` (or from `start_date`
/// when nothing is on file) up to and including `end`.
pub fn plan_days(
    last: Option<NaiveDate>,
    start_date: NaiveDate,
    end: NaiveDate,
    skip_weekends: bool,
) -> Vec<NaiveDate> {
    let first = match last {
        Some(d) => match d.succ_opt() {
            Some(next) => next,
            None => return Vec::new(),
        },
        None => start_date,
    };
    first
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !skip_weekends || !is_weekend(*d))
        .collect()
}

/// A day that is still missing this long after the fact is not coming.
pub fn is_settled(day: NaiveDate, today: NaiveDate, grace_days: i64) -> bool {
    (today - day).num_days() > grace_days
}
