// src/config.rs

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info};

use crate::schema::{HeaderMapping, SectionRegistry};

pub const CONFIG_ENV: &str = "BEEF_CONFIG";
pub const DATASET_ENV: &str = "BEEF_DATASET";
pub const REPORTS_DIR_ENV: &str = "BEEF_REPORTS_DIR";
pub const DEFAULT_CONFIG_FILE: &str = "beefscraper.yaml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub dataset_path: PathBuf,
    /// Local mirror laid out as `<dir>/<REPORT>/<REPORT><YYYYMMDD>.txt`.
    pub reports_dir: PathBuf,
    pub source: SourceConfig,
    pub update: UpdateConfig,
    /// Header mappings layered over the built-in registry.
    pub reports: BTreeMap<String, Vec<HeaderMapping>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Prefix the report file name is appended to; keep the trailing slash.
    pub base_url: String,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateConfig {
    pub tracked_reports: Vec<String>,
    /// First day fetched for a report with nothing on file.
    pub start_date: NaiveDate,
    pub interval_secs: u64,
    pub skip_weekends: bool,
    /// A missing report older than this many days is taken as a holiday.
    pub missing_day_grace_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data/boxed_beef.parquet"),
            reports_dir: PathBuf::from("reports"),
            source: SourceConfig::default(),
            update: UpdateConfig::default(),
            reports: BTreeMap::new(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.ams.usda.gov/mnreports/".to_string(),
            max_retries: 3,
            retry_backoff_ms: 500,
            timeout_secs: 30,
        }
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            tracked_reports: vec!["LM_XB402".to_string(), "LM_XB452".to_string()],
            start_date: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default(),
            interval_secs: 6 * 60 * 60,
            skip_weekends: true,
            missing_day_grace_days: 7,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl UpdateConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Config {
    /// Resolve the config file, parse it and apply env overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = match env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("no config file; using defaults");
                Self::default()
            }
        };
        cfg.apply_env(|k| env::var_os(k).map(PathBuf::from));
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg = Self::from_yaml(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<PathBuf>) {
        if let Some(p) = lookup(DATASET_ENV) {
            self.dataset_path = p;
        }
        if let Some(p) = lookup(REPORTS_DIR_ENV) {
            self.reports_dir = p;
        }
    }

    /// Built-in section headers plus whatever the config adds.
    pub fn registry(&self) -> SectionRegistry {
        let mut registry = SectionRegistry::builtin();
        registry.extend(&self.reports);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_is_default() {
        let cfg = Config::from_yaml("{}").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.update.missing_day_grace_days, 7);
        assert!(cfg.update.skip_weekends);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let cfg = Config::from_yaml(
            r#"
dataset_path: /tmp/beef.parquet
source:
  max_retries: 5
update:
  tracked_reports: [LM_XB452]
  start_date: 2021-03-01
"#,
        )
        .unwrap();
        assert_eq!(cfg.dataset_path, PathBuf::from("/tmp/beef.parquet"));
        assert_eq!(cfg.source.max_retries, 5);
        assert_eq!(cfg.source.timeout_secs, 30);
        assert_eq!(cfg.update.tracked_reports, vec!["LM_XB452"]);
        assert_eq!(cfg.update.start_date, NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
        assert_eq!(cfg.reports_dir, PathBuf::from("reports"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_yaml("datasett_path: x").is_err());
    }

    #[test]
    fn env_overrides_paths() {
        let mut cfg = Config::default();
        cfg.apply_env(|k| match k {
            DATASET_ENV => Some(PathBuf::from("/data/x.parquet")),
            _ => None,
        });
        assert_eq!(cfg.dataset_path, PathBuf::from("/data/x.parquet"));
        assert_eq!(cfg.reports_dir, PathBuf::from("reports"));
    }

    #[test]
    fn extra_headers_reach_the_registry() {
        let cfg = Config::from_yaml(
            r#"
reports:
  LM_XB403:
    - header: "Ground Beef"
      cut_type: "Ground Beef"
"#,
        )
        .unwrap();
        let registry = cfg.registry();
        assert!(registry.supports("LM_XB403"));
        assert!(registry.supports("LM_XB452"));
        assert_eq!(registry.match_header("LM_XB403", "Ground Beef Items"), Some("Ground Beef"));
    }
}
