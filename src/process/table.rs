// src/process/table.rs

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::error::ParseError;
use crate::process::classify::{classify, ClassifiedLine, RowBounds};
use crate::process::segment::segment;
use crate::process::utils::parse_number;
use crate::schema::{ParsedRow, Section, NUMERIC_COLUMNS};

/// Code/class fragment that leaked into the front of a description.
static LEAKED_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d{3}[A-Za-z]?\s+)?(?:\d\s+)?").expect("leaked code regex"));

/// Typed rows of one section; identity is attached by the ingestor.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionTable {
    pub cut_type: String,
    pub rows: Vec<ParsedRow>,
}

/// Trim a description and drop an IMPS code / class digit stuck to its front.
/// Parenthesised notes such as `(IM)` are left alone.
pub fn strip_leaked_code(description: &str) -> String {
    let trimmed = description.trim();
    LEAKED_CODE_RE.replace(trimmed, "").trim().to_string()
}

fn coerce(cell: Option<&str>) -> Option<f64> {
    let raw = cell?;
    match parse_number(raw) {
        Ok(v) => v,
        Err(e) => {
            trace!(error = %e, "treating cell as missing");
            None
        }
    }
}

/// Numeric cells for every classified line, padded to `NUMERIC_COLUMNS`.
fn numeric_cells(lines: &[ClassifiedLine]) -> Result<Vec<Vec<Option<String>>>, ParseError> {
    let texts: Vec<&str> = lines.iter().map(|l| l.numeric_text.as_str()).collect();

    // a block with no numbers at all is a table of blanks, not an error
    if texts.iter().all(|t| t.trim().is_empty()) {
        return Ok(vec![vec![None; NUMERIC_COLUMNS]; lines.len()]);
    }

    let mut cells = segment(&texts)?;
    let found = cells.first().map_or(0, Vec::len);
    if found > NUMERIC_COLUMNS {
        return Err(ParseError::ColumnCount {
            expected: NUMERIC_COLUMNS,
            found,
        });
    }
    for row in &mut cells {
        row.resize(NUMERIC_COLUMNS, None);
    }
    Ok(cells)
}

/// Turn one section body into typed rows.
///
/// Fails only when the numeric block cannot be segmented; the caller skips
/// the section in that case.
pub fn build_table(section: &Section) -> Result<SectionTable, ParseError> {
    let lines: Vec<&str> = section
        .raw_content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .collect();

    let bounds = RowBounds::scan(&lines);
    let classified: Vec<ClassifiedLine> = lines.iter().map(|l| classify(l, &bounds)).collect();
    let cells = numeric_cells(&classified)?;

    let rows: Vec<ParsedRow> = classified
        .into_iter()
        .zip(cells)
        .filter_map(|(line, row_cells)| {
            let numeric_fields: Vec<Option<f64>> =
                row_cells.iter().map(|c| coerce(c.as_deref())).collect();
            let description = strip_leaked_code(&line.description);
            if description.is_empty() && numeric_fields.iter().all(Option::is_none) {
                return None;
            }
            Some(ParsedRow {
                item_code: line.item_code,
                class_digit: line.class_digit,
                description,
                numeric_fields,
            })
        })
        .collect();

    debug!(section = %section.name, rows = rows.len(), ?bounds, "built table");
    Ok(SectionTable {
        cut_type: section.name.clone(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(name: &str, body: &str) -> Section {
        Section {
            name: name.to_string(),
            raw_content: body.to_string(),
            row_count: body.lines().count(),
        }
    }

    #[test]
    fn tri_tip_line_parses_completely() {
        let s = section(
            "Choice Cuts",
            "185C  1  Loin, sirloin, tri-tip (IM)       5      86,531   203.77  208.00  205.46",
        );
        let table = build_table(&s).unwrap();
        let row = &table.rows[0];
        assert_eq!(row.item_code.as_deref(), Some("185C"));
        assert_eq!(row.class_digit, Some(1));
        assert_eq!(row.description, "Loin, sirloin, tri-tip (IM)");
        assert_eq!(row.number_trades(), Some(5.0));
        assert_eq!(row.total_pounds(), Some(86531.0));
        assert_eq!(row.price_range_low(), Some(203.77));
        assert_eq!(row.price_range_high(), Some(208.00));
        assert_eq!(row.weighted_average(), Some(205.46));
    }

    #[test]
    fn zero_activity_line_keeps_blank_prices() {
        let s = section(
            "Choice Cuts",
            "114D 3  Chuck, clod, top blade            0           0",
        );
        let row = &build_table(&s).unwrap().rows[0];
        assert_eq!(row.description, "Chuck, clod, top blade");
        assert_eq!(row.number_trades(), Some(0.0));
        assert_eq!(row.total_pounds(), Some(0.0));
        assert_eq!(row.numeric_fields.len(), NUMERIC_COLUMNS);
        assert_eq!(&row.numeric_fields[2..], &[None, None, None]);
    }

    #[test]
    fn fully_blank_numeric_columns_keep_every_row() {
        let s = section(
            "Upper 2/3 Choice Items",
            "120A  3  Brisket, point/off, bnls\n130   4  Chuck, short rib\n         Pectoral Meat",
        );
        let table = build_table(&s).unwrap();
        let names: Vec<&str> = table.rows.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(names, vec!["Brisket, point/off, bnls", "Chuck, short rib", "Pectoral Meat"]);
        assert!(table
            .rows
            .iter()
            .all(|r| r.numeric_fields == vec![None; NUMERIC_COLUMNS]));
    }

    #[test]
    fn every_row_has_five_fields() {
        let s = section(
            "Choice Cuts",
            "112A 3  Rib, ribeye, bnls, light          3       1,402   530.34  550.25  544.50\n\
             113C 1  Chuck, semi-bnls, neck/off        0           0\n\
             116B 1  Chuck, chuck tender (IM)",
        );
        let table = build_table(&s).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert!(table.rows.iter().all(|r| r.numeric_fields.len() == NUMERIC_COLUMNS));
    }

    #[test]
    fn too_many_columns_fails_the_section() {
        let s = section(
            "Lower 1/3 Choice Items",
            "116A  3  Chuck, roll   118     808,816   249.00   314.54   269.99   12.50",
        );
        assert!(matches!(
            build_table(&s),
            Err(ParseError::ColumnCount { expected: 5, found: 6 })
        ));
    }

    #[test]
    fn leaked_codes_are_stripped_but_annotations_kept() {
        assert_eq!(strip_leaked_code("  193 4  Flank, flank steak (IM) "), "Flank, flank steak (IM)");
        assert_eq!(strip_leaked_code("3  Chuck roll, retail ready"), "Chuck roll, retail ready");
        assert_eq!(strip_leaked_code("Cap, Wedge Meat & (IM) Lean"), "Cap, Wedge Meat & (IM) Lean");
        assert_eq!(strip_leaked_code("Ground Chuck 80%"), "Ground Chuck 80%");
    }
}
