// src/process/classify.rs

use once_cell::sync::Lazy;
use regex::Regex;

/// `<3-digit code + letter or space>` (optional), whitespace, class digit.
static CODE_CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{3}[A-Za-z\s])?\s+(\d)").expect("code/class regex"));

/// First place a row turns from text into numbers.
static NUMERIC_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s\s\d").expect("numeric start regex"));

/// Column boundaries shared by every line of a section body.
///
/// Both offsets are character columns, not byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowBounds {
    /// End of the code/class prefix: the furthest match end across the block,
    /// so a code abutting its description (`116B` + text) is never cut short.
    pub code_end: usize,
    /// Start of the numeric columns within the text after `code_end`: the
    /// earliest text-to-number transition of any row. `None` when no row
    /// carries numbers at all.
    pub numeric_start: Option<usize>,
}

/// One line split into its parts, before numeric segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub item_code: Option<String>,
    pub class_digit: Option<u8>,
    /// Raw description text, untrimmed.
    pub description: String,
    /// Position-preserving numeric portion; empty when the row has none.
    pub numeric_text: String,
}

fn char_col(s: &str, byte_idx: usize) -> usize {
    s[..byte_idx].chars().count()
}

/// Split at a character column; past-the-end yields `(s, "")`.
fn split_at_col(s: &str, col: usize) -> (&str, &str) {
    match s.char_indices().nth(col) {
        Some((b, _)) => s.split_at(b),
        None => (s, ""),
    }
}

impl RowBounds {
    /// First pass over a section body.
    pub fn scan<S: AsRef<str>>(lines: &[S]) -> Self {
        let code_end = lines
            .iter()
            .filter_map(|l| {
                let l = l.as_ref();
                CODE_CLASS_RE.find(l).map(|m| char_col(l, m.end()))
            })
            .max()
            .unwrap_or(0);

        let numeric_start = lines
            .iter()
            .filter_map(|l| {
                let (_, rest) = split_at_col(l.as_ref(), code_end);
                // offset of the digit, two columns past the match start
                NUMERIC_START_RE
                    .find(rest)
                    .map(|m| char_col(rest, m.start()) + 2)
            })
            .min();

        Self {
            code_end,
            numeric_start,
        }
    }
}

/// Second pass: classify one line against the block-wide bounds.
///
/// Never fails. A continuation line without a code comes back with
/// `item_code = None`; a line without numbers has empty `numeric_text`.
pub fn classify(line: &str, bounds: &RowBounds) -> ClassifiedLine {
    let (item_code, class_digit) = match CODE_CLASS_RE.captures(line) {
        Some(caps) => (
            caps.get(1)
                .map(|m| m.as_str().trim().to_string())
                .filter(|c| !c.is_empty()),
            caps.get(2).and_then(|m| m.as_str().parse::<u8>().ok()),
        ),
        None => (None, None),
    };

    let (_, rest) = split_at_col(line, bounds.code_end);
    let (description, numeric_text) = match bounds.numeric_start {
        Some(col) => split_at_col(rest, col),
        None => (rest, ""),
    };

    ClassifiedLine {
        item_code,
        class_digit,
        description: description.to_string(),
        numeric_text: numeric_text.to_string(),
    }
}
