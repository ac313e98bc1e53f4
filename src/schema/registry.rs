// src/schema/registry.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Built-in header → cut type table, one entry per report id.
/// Headers are prefix-matched against the line that follows a delimiter.
static BUILTIN_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "LM_XB402",
        &[
            ("Choice Cuts", "Choice Cuts"),
            ("Select Cuts", "Select Cuts"),
            ("CHOICE, SELECT & UNGRADED CUTS", "Choice/Select Cuts"),
        ],
    ),
    (
        "LM_XB452",
        &[
            ("Upper 2/3 Choice Items", "Upper 2/3 Choice Items"),
            ("Lower 1/3 Choice Items", "Lower 1/3 Choice Items"),
            ("Branded Select Items", "Branded Select"),
        ],
    ),
];

/// A single header string and the canonical cut type it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMapping {
    pub header: String,
    pub cut_type: String,
}

/// Report id → ordered header mappings. Adding a report type is a data
/// change here (or in config), never a parser change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionRegistry {
    reports: BTreeMap<String, Vec<HeaderMapping>>,
}

impl SectionRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry preloaded with the boxed-beef reports we know about.
    pub fn builtin() -> Self {
        let mut reg = Self::empty();
        for (report, sections) in BUILTIN_SECTIONS {
            for (header, cut_type) in sections.iter() {
                reg.register(report, header, cut_type);
            }
        }
        reg
    }

    /// Add a mapping. A header already registered for `report` is remapped.
    pub fn register(&mut self, report: &str, header: &str, cut_type: &str) {
        let entries = self.reports.entry(report.to_string()).or_default();
        match entries.iter_mut().find(|m| m.header == header) {
            Some(existing) => existing.cut_type = cut_type.to_string(),
            None => entries.push(HeaderMapping {
                header: header.to_string(),
                cut_type: cut_type.to_string(),
            }),
        }
    }

    /// Layer config-provided mappings on top of this registry.
    pub fn extend(&mut self, extra: &BTreeMap<String, Vec<HeaderMapping>>) {
        for (report, mappings) in extra {
            for m in mappings {
                self.register(report, &m.header, &m.cut_type);
            }
        }
    }

    pub fn supports(&self, report: &str) -> bool {
        self.reports.contains_key(report)
    }

    pub fn report_ids(&self) -> impl Iterator<Item = &str> {
        self.reports.keys().map(String::as_str)
    }

    /// Canonical cut type for a header line, if it is one we track.
    /// The longest matching header wins so overlapping prefixes stay stable.
    pub fn match_header(&self, report: &str, line: &str) -> Option<&str> {
        let line = line.trim_start();
        self.reports
            .get(report)?
            .iter()
            .filter(|m| line.starts_with(m.header.as_str()))
            .max_by_key(|m| m.header.len())
            .map(|m| m.cut_type.as_str())
    }

    /// All canonical cut types registered for a report.
    pub fn cut_types(&self, report: &str) -> Vec<&str> {
        let mut out: Vec<&str> = self
            .reports
            .get(report)
            .map(|ms| ms.iter().map(|m| m.cut_type.as_str()).collect())
            .unwrap_or_default();
        out.dedup();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_maps_upper_two_thirds_header() {
        let reg = SectionRegistry::builtin();
        assert_eq!(
            reg.match_header("LM_XB452", "Upper 2/3 Choice Items Cuts"),
            Some("Upper 2/3 Choice Items")
        );
        assert_eq!(reg.match_header("LM_XB452", "Legal Notice"), None);
    }

    #[test]
    fn unknown_report_matches_nothing() {
        let reg = SectionRegistry::builtin();
        assert!(!reg.supports("LM_XB999"));
        assert_eq!(reg.match_header("LM_XB999", "Choice Cuts"), None);
    }

    #[test]
    fn extend_adds_new_report_and_remaps_existing_header() {
        let mut reg = SectionRegistry::builtin();
        let mut extra = BTreeMap::new();
        extra.insert(
            "LM_XB403".to_string(),
            vec![HeaderMapping {
                header: "Ground Beef".into(),
                cut_type: "Ground Beef".into(),
            }],
        );
        extra.insert(
            "LM_XB402".to_string(),
            vec![HeaderMapping {
                header: "Choice Cuts".into(),
                cut_type: "Choice".into(),
            }],
        );
        reg.extend(&extra);

        assert!(reg.supports("LM_XB403"));
        assert_eq!(reg.match_header("LM_XB403", "Ground Beef"), Some("Ground Beef"));
        assert_eq!(reg.match_header("LM_XB402", "Choice Cuts"), Some("Choice"));
        assert_eq!(reg.cut_types("LM_XB402").len(), 3);
    }
}
