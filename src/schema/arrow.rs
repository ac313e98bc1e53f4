// src/schema/arrow.rs

use arrow::{
    array::{Array, ArrayRef, Date32Array, Float64Array, StringArray},
    datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema},
    record_batch::RecordBatch,
};
use chrono::{Duration, NaiveDate};
use std::sync::Arc;

use super::types::ReportRecord;
use crate::error::DatasetError;

pub const COL_REPORT: &str = "Report";
pub const COL_DATE: &str = "report_date";
pub const COL_CUT_TYPE: &str = "Cut Type";
pub const COL_ITEM: &str = "item_description";
pub const COL_TRADES: &str = "number_trades";
pub const COL_POUNDS: &str = "total_pounds";
pub const COL_LOW: &str = "price_range_low";
pub const COL_HIGH: &str = "price_range_high";
pub const COL_AVG: &str = "weighted_average";

/// Numeric columns in layout order.
pub const NUMERIC_COLUMN_NAMES: [&str; 5] = [COL_TRADES, COL_POUNDS, COL_LOW, COL_HIGH, COL_AVG];

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch is a valid date")
}

fn to_date32(d: NaiveDate) -> i32 {
    (d - epoch()).num_days() as i32
}

fn from_date32(days: i32) -> NaiveDate {
    epoch() + Duration::days(days as i64)
}

/// Arrow schema of the persisted dataset.
///
/// - `Report`, `Cut Type`, `item_description` → Utf8 (non-null)
/// - `report_date`                            → Date32 (non-null)
/// - the five numeric columns                 → Float64 (nullable)
pub fn dataset_schema() -> Arc<ArrowSchema> {
    let mut fields = vec![
        ArrowField::new(COL_REPORT, DataType::Utf8, false),
        ArrowField::new(COL_DATE, DataType::Date32, false),
        ArrowField::new(COL_CUT_TYPE, DataType::Utf8, false),
        ArrowField::new(COL_ITEM, DataType::Utf8, false),
    ];
    for name in NUMERIC_COLUMN_NAMES {
        fields.push(ArrowField::new(name, DataType::Float64, true));
    }
    Arc::new(ArrowSchema::new(fields))
}

/// Pack records into a single batch in dataset column order.
pub fn records_to_batch(records: &[ReportRecord]) -> Result<RecordBatch, DatasetError> {
    let numeric = |f: fn(&ReportRecord) -> Option<f64>| -> ArrayRef {
        Arc::new(records.iter().map(f).collect::<Float64Array>())
    };

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.report_id.as_str()))),
        Arc::new(Date32Array::from_iter_values(records.iter().map(|r| to_date32(r.report_date)))),
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.cut_type.as_str()))),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.item_description.as_str()),
        )),
        numeric(|r| r.number_trades),
        numeric(|r| r.total_pounds),
        numeric(|r| r.price_range_low),
        numeric(|r| r.price_range_high),
        numeric(|r| r.weighted_average),
    ];

    Ok(RecordBatch::try_new(dataset_schema(), columns)?)
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray, DatasetError> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| DatasetError::Schema { column: name.to_string() })
}

fn float_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float64Array, DatasetError> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
        .ok_or_else(|| DatasetError::Schema { column: name.to_string() })
}

/// Unpack a batch read back from disk. Columns are looked up by name.
pub fn batch_to_records(batch: &RecordBatch) -> Result<Vec<ReportRecord>, DatasetError> {
    let report = string_column(batch, COL_REPORT)?;
    let cut = string_column(batch, COL_CUT_TYPE)?;
    let item = string_column(batch, COL_ITEM)?;
    let date = batch
        .column_by_name(COL_DATE)
        .and_then(|c| c.as_any().downcast_ref::<Date32Array>())
        .ok_or_else(|| DatasetError::Schema { column: COL_DATE.to_string() })?;

    let nums = NUMERIC_COLUMN_NAMES
        .iter()
        .map(|n| float_column(batch, n))
        .collect::<Result<Vec<_>, _>>()?;
    let cell = |col: &Float64Array, i: usize| (!col.is_null(i)).then(|| col.value(i));

    Ok((0..batch.num_rows())
        .map(|i| ReportRecord {
            report_id: report.value(i).to_string(),
            report_date: from_date32(date.value(i)),
            cut_type: cut.value(i).to_string(),
            item_description: item.value(i).to_string(),
            number_trades: cell(nums[0], i),
            total_pounds: cell(nums[1], i),
            price_range_low: cell(nums[2], i),
            price_range_high: cell(nums[3], i),
            weighted_average: cell(nums[4], i),
        })
        .collect())
}
