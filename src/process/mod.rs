// src/process/mod.rs

pub mod classify;
pub mod ingest;
pub mod sections;
pub mod segment;
pub mod table;
pub mod utils;

#[cfg(test)]
pub(crate) mod fixtures;

pub use classify::{classify, ClassifiedLine, RowBounds};
pub use ingest::{ingest_dir, ingest_file, ingest_report};
pub use sections::{normalize_report_text, split_sections, Sections};
pub use segment::segment;
pub use table::{build_table, SectionTable};
