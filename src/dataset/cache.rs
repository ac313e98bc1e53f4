// src/dataset/cache.rs

use std::{sync::Arc, time::SystemTime};
use tracing::debug;

use super::{Dataset, DatasetStore};
use crate::error::DatasetError;

/// Last dataset handed to readers, keyed by the file's modification time.
///
/// Owned by whoever serves reads; nothing here is process-global.
#[derive(Debug, Default)]
pub struct DatasetCache {
    cached: Option<(SystemTime, Arc<Dataset>)>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing is cached or the source is newer than the cache.
    pub fn is_stale(&self, source_ts: SystemTime) -> bool {
        match &self.cached {
            Some((ts, _)) => source_ts > *ts,
            None => true,
        }
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Return the cached dataset, reloading it when the file moved on.
    pub fn get_or_load(&mut self, store: &DatasetStore) -> Result<Arc<Dataset>, DatasetError> {
        let Some(fingerprint) = store.fingerprint()? else {
            self.cached = None;
            return Ok(Arc::new(Dataset::empty()));
        };

        if let Some((_, dataset)) = self.cached.as_ref().filter(|_| !self.is_stale(fingerprint.modified)) {
            return Ok(Arc::clone(dataset));
        }

        let snapshot = store.load()?;
        let ts = snapshot.fingerprint().map_or(fingerprint.modified, |f| f.modified);
        let dataset = Arc::new(snapshot.dataset().clone());
        debug!(path = %store.path().display(), rows = dataset.len(), "dataset cache refreshed");
        self.cached = Some((ts, Arc::clone(&dataset)));
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ReportRecord;
    use chrono::NaiveDate;
    use std::time::Duration;
    use tempfile::tempdir;

    fn rec(day: u32) -> ReportRecord {
        ReportRecord {
            report_id: "LM_XB402".into(),
            report_date: NaiveDate::from_ymd_opt(2021, 3, day).unwrap(),
            cut_type: "Choice Cuts".into(),
            item_description: "Rib, ribeye, lip-on, bn-in".into(),
            number_trades: Some(12.0),
            total_pounds: Some(24_080.0),
            price_range_low: Some(760.0),
            price_range_high: Some(800.0),
            weighted_average: Some(781.6),
        }
    }

    #[test]
    fn staleness_follows_timestamps() {
        let mut cache = DatasetCache::new();
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        assert!(cache.is_stale(t0));

        cache.cached = Some((t0, Arc::new(Dataset::empty())));
        assert!(!cache.is_stale(t0));
        assert!(!cache.is_stale(t0 - Duration::from_secs(1)));
        assert!(cache.is_stale(t0 + Duration::from_secs(1)));

        cache.invalidate();
        assert!(cache.is_stale(t0));
    }

    #[test]
    fn reuses_until_file_changes() {
        let tmp = tempdir().unwrap();
        let store = DatasetStore::new(tmp.path().join("data.parquet"));
        let mut cache = DatasetCache::new();

        assert!(cache.get_or_load(&store).unwrap().is_empty());

        store.commit(vec![rec(1)]).unwrap();
        let first = cache.get_or_load(&store).unwrap();
        assert_eq!(first.len(), 1);
        let again = cache.get_or_load(&store).unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        // make sure the replacement gets a later mtime
        std::thread::sleep(Duration::from_millis(20));
        store.commit(vec![rec(2)]).unwrap();
        let refreshed = cache.get_or_load(&store).unwrap();
        assert_eq!(refreshed.len(), 2);
    }
}
