// src/process/sections.rs

use tracing::trace;

use crate::schema::{Section, SectionRegistry};

/// Drop blank lines and trailing whitespace. Leading whitespace is kept:
/// column positions carry meaning.
pub fn normalize_report_text(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// A delimiter line contains a run of three or more dashes.
pub fn is_delimiter(line: &str) -> bool {
    line.contains("---")
}

/// Lazy single pass over a report's sections.
///
/// Built by `split_sections`; yields only sections whose header is
/// registered for the report.
pub struct Sections<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    report_id: &'a str,
    registry: &'a SectionRegistry,
}

/// Walk `text` (already normalized) for delimiter-bounded sections of `report_id`.
///
/// Layout of one section:
///
/// ```text
/// ---------------------      <- delimiter
/// <header line>              <- must prefix-match a registered header
/// <column titles ...>
/// ---------------------      <- second delimiter
/// <content lines ...>        <- emitted
/// ---------------------      <- next delimiter (also starts the next scan)
/// ```
pub fn split_sections<'a>(
    text: &'a str,
    report_id: &'a str,
    registry: &'a SectionRegistry,
) -> Sections<'a> {
    // unsupported report types produce nothing rather than an error
    let lines = if registry.supports(report_id) {
        text.lines().collect()
    } else {
        Vec::new()
    };
    Sections {
        lines,
        pos: 0,
        report_id,
        registry,
    }
}

impl<'a> Sections<'a> {
    fn next_delimiter(&self, from: usize) -> Option<usize> {
        (from..self.lines.len()).find(|&i| is_delimiter(self.lines[i]))
    }
}

impl<'a> Iterator for Sections<'a> {
    type Item = Section;

    fn next(&mut self) -> Option<Section> {
        loop {
            let open = self.next_delimiter(self.pos)?;
            self.pos = open + 1;

            let header = match self.lines.get(open + 1) {
                Some(h) => *h,
                None => return None,
            };
            let name = match self.registry.match_header(self.report_id, header) {
                Some(n) => n,
                None => {
                    trace!(report = %self.report_id, header = %header.trim(), "skipping section");
                    continue;
                }
            };

            let Some(body_open) = self.next_delimiter(open + 1) else {
                return None;
            };
            let Some(body_close) = self.next_delimiter(body_open + 1) else {
                return None;
            };
            if body_close == body_open + 1 {
                // nothing between the delimiters
                self.pos = body_close;
                continue;
            }

            let body = &self.lines[body_open + 1..body_close];
            self.pos = body_close;
            return Some(Section {
                name: name.to_string(),
                raw_content: body.join("\n"),
                row_count: body.len(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fixtures::REPORT_452;

    #[test]
    fn normalize_drops_blank_lines_and_trailing_space() {
        let text = "a  \n\n   b\t\n   \nc";
        assert_eq!(normalize_report_text(text), "a\n   b\nc");
    }

    #[test]
    fn recognised_sections_are_labelled_and_others_skipped() {
        let reg = SectionRegistry::builtin();
        let text = normalize_report_text(REPORT_452);
        let sections: Vec<Section> = split_sections(&text, "LM_XB452", &reg).collect();

        let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Upper 2/3 Choice Items", "Lower 1/3 Choice Items", "Branded Select"]
        );
        assert!(sections.iter().all(|s| !s.raw_content.contains("Legal")));
        assert_eq!(sections[0].row_count, 4);
        assert!(sections[0].raw_content.starts_with("109E  1  Rib, ribeye"));
    }

    #[test]
    fn legal_notice_yields_no_section() {
        let reg = SectionRegistry::builtin();
        let text = "-----\nLegal Notice\nfine print\n-----\nnothing to see\n-----";
        assert_eq!(split_sections(text, "LM_XB452", &reg).count(), 0);
    }

    #[test]
    fn unsupported_report_yields_nothing() {
        let reg = SectionRegistry::builtin();
        let text = normalize_report_text(REPORT_452);
        assert_eq!(split_sections(&text, "LM_XB999", &reg).count(), 0);
    }

    #[test]
    fn unterminated_section_is_dropped() {
        let reg = SectionRegistry::builtin();
        let text = "-----\nBranded Select Items\n-----\n193   4  Flank, flank steak (IM)   50";
        assert_eq!(split_sections(text, "LM_XB452", &reg).count(), 0);
    }
}
