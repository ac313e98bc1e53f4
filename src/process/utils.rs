use chrono::NaiveDate;

use crate::error::ParseError;

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Read one report cell as a decimal. Thousands separators are dropped.
/// Blank → `Ok(None)`; anything unparseable → `Err(NumericCoercion)`.
pub fn parse_number(raw: &str) -> Result<Option<f64>, ParseError> {
    let cleaned: String = clean_str(raw).chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    cleaned
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ParseError::NumericCoercion { raw: raw.to_string() })
}

/// Decode report bytes. Reports are ASCII in practice; anything that is not
/// valid UTF-8 is read as Latin-1 so a stray byte never drops a report.
pub fn decode_report_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Split a report file stem like `LM_XB45220210301` into
/// `("LM_XB452", 2021-03-01)`. The date is the trailing 8 digits.
pub fn parse_report_filename(stem: &str) -> Option<(String, NaiveDate)> {
    if stem.len() <= 8 || !stem.is_char_boundary(stem.len() - 8) {
        return None;
    }
    let (report, digits) = stem.split_at(stem.len() - 8);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let y: i32 = digits[0..4].parse().ok()?;
    let m: u32 = digits[4..6].parse().ok()?;
    let d: u32 = digits[6..8].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(y, m, d)?;
    Some((report.to_string(), date))
}

/// Inverse of `parse_report_filename`, without extension.
pub fn report_file_stem(report: &str, date: NaiveDate) -> String {
    format!("{}{}", report, date.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_strips_thousands_separators() {
        assert_eq!(parse_number("  86,531 ").unwrap(), Some(86531.0));
        assert_eq!(parse_number("203.77").unwrap(), Some(203.77));
        assert_eq!(parse_number("   ").unwrap(), None);
        assert!(matches!(
            parse_number("n/a"),
            Err(ParseError::NumericCoercion { .. })
        ));
    }

    #[test]
    fn report_filename_round_trips() {
        let (report, date) = parse_report_filename("LM_XB45220210301").unwrap();
        assert_eq!(report, "LM_XB452");
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
        assert_eq!(report_file_stem(&report, date), "LM_XB45220210301");
    }

    #[test]
    fn report_filename_rejects_bad_dates() {
        assert_eq!(parse_report_filename("LM_XB45220211301"), None);
        assert_eq!(parse_report_filename("20210301"), None);
        assert_eq!(parse_report_filename("LM_XB452notadate"), None);
    }

    #[test]
    fn latin1_bytes_still_decode() {
        let text = decode_report_bytes(b"Caf\xe9 items");
        assert_eq!(text, "Café items");
    }
}
