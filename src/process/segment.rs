// src/process/segment.rs

use crate::error::ParseError;

/// Split a block of fixed-width lines into fields using the whitespace
/// columns ("gutters") shared by every line of the block.
///
/// Lines are right-padded to the longest line first, so a row that omits
/// its trailing fields still lines up with its neighbours. Each run of
/// consecutive gutter columns is one separator. A field that is blank in a
/// given line is `None`.
pub fn segment<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Vec<Option<String>>>, ParseError> {
    let rows: Vec<Vec<char>> = lines.iter().map(|l| l.as_ref().chars().collect()).collect();
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);

    let is_blank = |row: &Vec<char>, col: usize| row.get(col).map_or(true, |c| c.is_whitespace());
    let gutter: Vec<bool> = (0..width)
        .map(|col| rows.iter().all(|row| is_blank(row, col)))
        .collect();

    if !gutter.iter().any(|g| *g) {
        return Err(ParseError::Segmentation { lines: lines.len() });
    }

    // [start, end) of every non-gutter run
    let mut spans = Vec::new();
    let mut start = None;
    for (col, &g) in gutter.iter().enumerate() {
        match (g, start) {
            (false, None) => start = Some(col),
            (true, Some(s)) => {
                spans.push((s, col));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, width));
    }

    Ok(rows
        .iter()
        .map(|row| {
            spans
                .iter()
                .map(|&(s, e)| {
                    let cell: String = row.iter().skip(s).take(e - s).collect();
                    let cell = cell.trim();
                    (!cell.is_empty()).then(|| cell.to_string())
                })
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(row: &[Option<String>]) -> Vec<Option<&str>> {
        row.iter().map(|c| c.as_deref()).collect()
    }

    #[test]
    fn short_rows_keep_their_columns_aligned() {
        let lines = [
            "5      86,531   203.77  208.00  205.46",
            "0           0",
            "   ",
        ];
        let table = segment(&lines).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            cells(&table[0]),
            vec![Some("5"), Some("86,531"), Some("203.77"), Some("208.00"), Some("205.46")]
        );
        assert_eq!(cells(&table[1]), vec![Some("0"), Some("0"), None, None, None]);
        assert_eq!(cells(&table[2]), vec![None; 5]);
    }

    #[test]
    fn right_aligned_values_of_different_width_share_a_column() {
        let lines = [
            " 82     160,165   652.00   825.00   685.65",
            "118     808,816   249.00   314.54   269.99",
            "  6       6,870   909.41   919.00   913.59",
        ];
        let table = segment(&lines).unwrap();
        assert!(table.iter().all(|r| r.len() == 5));
        assert_eq!(table[2][0].as_deref(), Some("6"));
        assert_eq!(table[1][1].as_deref(), Some("808,816"));
    }

    #[test]
    fn gutters_come_from_the_whole_block() {
        // each line alone splits differently; together they share one gutter
        let lines = ["12 345", "1  3  "];
        let table = segment(&lines).unwrap();
        assert_eq!(cells(&table[0]), vec![Some("12"), Some("345")]);
        assert_eq!(cells(&table[1]), vec![Some("1"), Some("3")]);
    }

    #[test]
    fn no_gutter_is_an_error() {
        assert!(matches!(
            segment(&["12345"]),
            Err(ParseError::Segmentation { lines: 1 })
        ));
        let empty: [&str; 0] = [];
        assert!(segment(&empty).is_err());
    }
}
