pub mod arrow;
pub mod registry;
pub mod types;

pub use self::arrow::{batch_to_records, dataset_schema, records_to_batch};
pub use registry::{HeaderMapping, SectionRegistry};
pub use types::{ParsedRow, RecordKey, ReportRecord, Section, NUMERIC_COLUMNS};
