// src/dataset/store.rs

use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{
    ffi::OsString,
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
    time::SystemTime,
};
use tracing::{debug, info, warn};

use super::{merge, Dataset};
use crate::error::DatasetError;
use crate::schema::{batch_to_records, dataset_schema, records_to_batch, ReportRecord};

const MAX_COMMIT_ATTEMPTS: usize = 3;

/// Identity of the dataset file as last observed on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub modified: SystemTime,
    pub len: u64,
}

/// A dataset together with the file state it was read from.
#[derive(Debug, Clone)]
pub struct Snapshot {
    dataset: Dataset,
    fingerprint: Option<Fingerprint>,
}

impl Snapshot {
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.fingerprint
    }
}

/// Single Parquet file holding the whole dataset.
///
/// Writes go to `<path>.tmp` and are renamed into place, so readers see
/// either the old file or the new one. One writer process at a time is
/// assumed; a changed file between read and replace is reported as
/// `PersistenceConflict` instead of being overwritten.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut s: OsString = self.path.as_os_str().to_owned();
        s.push(".tmp");
        PathBuf::from(s)
    }

    fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> DatasetError + '_ {
        move |source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Current on-disk fingerprint; `None` when no dataset has been written.
    pub fn fingerprint(&self) -> Result<Option<Fingerprint>, DatasetError> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(Some(Fingerprint {
                modified: meta.modified().map_err(Self::io_err(&self.path))?,
                len: meta.len(),
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_err(&self.path)(e)),
        }
    }

    /// Read the whole dataset. A missing file is an empty dataset.
    pub fn load(&self) -> Result<Snapshot, DatasetError> {
        let fingerprint = self.fingerprint()?;
        if fingerprint.is_none() {
            debug!(path = %self.path.display(), "no dataset yet");
            return Ok(Snapshot {
                dataset: Dataset::empty(),
                fingerprint,
            });
        }

        let file = File::open(&self.path).map_err(Self::io_err(&self.path))?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(8192)
            .build()?;

        let mut records = Vec::new();
        for batch in reader {
            records.extend(batch_to_records(&batch?)?);
        }
        records.sort_by_key(|r| r.report_date);

        debug!(path = %self.path.display(), rows = records.len(), "loaded dataset");
        Ok(Snapshot {
            dataset: Dataset::from_sorted(records),
            fingerprint,
        })
    }

    fn check_unchanged(&self, expected: Option<Fingerprint>) -> Result<(), DatasetError> {
        if self.fingerprint()? != expected {
            return Err(DatasetError::PersistenceConflict {
                path: self.path.clone(),
            });
        }
        Ok(())
    }

    /// Atomically replace the dataset file, provided it still matches
    /// `expected` (the fingerprint observed when the data was read).
    pub fn save(
        &self,
        dataset: &Dataset,
        expected: Option<Fingerprint>,
    ) -> Result<Option<Fingerprint>, DatasetError> {
        self.check_unchanged(expected)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(Self::io_err(parent))?;
        }

        let tmp = self.tmp_path();
        let file = File::create(&tmp).map_err(Self::io_err(&tmp))?;
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let mut writer = ArrowWriter::try_new(BufWriter::new(file), dataset_schema(), Some(props))?;
        writer.write(&records_to_batch(dataset.records())?)?;
        writer.close()?;

        // re-check right before the swap; the write above can take a while
        if let Err(e) = self.check_unchanged(expected) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, &self.path).map_err(Self::io_err(&self.path))?;

        info!(path = %self.path.display(), rows = dataset.len(), "dataset written");
        self.fingerprint()
    }

    /// Merge `incoming` into `snapshot` and persist. On a conflict the file
    /// is re-read and the merge redone, up to a few attempts.
    pub fn merge_into(
        &self,
        snapshot: &mut Snapshot,
        incoming: Vec<ReportRecord>,
    ) -> Result<(), DatasetError> {
        let mut attempt = 1;
        loop {
            let merged = merge(&snapshot.dataset, incoming.clone());
            match self.save(&merged, snapshot.fingerprint) {
                Ok(fingerprint) => {
                    snapshot.dataset = merged;
                    snapshot.fingerprint = fingerprint;
                    return Ok(());
                }
                Err(DatasetError::PersistenceConflict { path }) if attempt < MAX_COMMIT_ATTEMPTS => {
                    warn!(path = %path.display(), attempt, "dataset changed underneath us; re-reading");
                    *snapshot = self.load()?;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Load, merge and persist in one go.
    pub fn commit(&self, incoming: Vec<ReportRecord>) -> Result<Dataset, DatasetError> {
        let mut snapshot = self.load()?;
        self.merge_into(&mut snapshot, incoming)?;
        Ok(snapshot.dataset)
    }
}
