//! Coercion of printed statement dates to calendar dates.

use chrono::NaiveDate;

/// Formats carrying their own year, tried in order. Two-digit years come
/// before four-digit ones so that `04 Sep 19` is not read as year 19.
const DATED_FORMATS: &[&str] = &[
    "%d-%b-%Y",
    "%d %b %y",
    "%d %b %Y",
    "%Y-%m-%d",
    "%d/%m/%Y",
];

/// Formats for yearless dates (`01 Jan`, `Sep 4`) after `default_year` has
/// been appended, so each ends in `%Y`. `"%d %b %Y"` also appears in
/// [`DATED_FORMATS`]; here it matches `01 Jan 2024` built from `01 Jan`.
const YEARLESS_WITH_DEFAULT_YEAR: &[&str] = &["%d %b %Y", "%b %d %Y"];

/// Collapse whitespace and split glued month/year tokens (`Sep19` -> `Sep 19`).
fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    let mut prev: Option<char> = None;
    for token in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
            prev = Some(' ');
        }
        for c in token.chars() {
            if c.is_ascii_digit() && prev.is_some_and(|p| p.is_ascii_alphabetic()) {
                out.push(' ');
            }
            out.push(c);
            prev = Some(c);
        }
    }
    out
}

/// Parse a statement date; `None` when no known format fits.
///
/// `default_year` resolves dates printed without a year (`01 Jan`, `Sep 4`).
pub fn coerce_date(raw: &str, default_year: Option<i32>) -> Option<NaiveDate> {
    let s = normalize(raw);
    if s.is_empty() {
        return None;
    }
    if let Some(d) = DATED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&s, fmt).ok())
    {
        return Some(d);
    }
    let year = default_year?;
    let with_year = format!("{s} {year}");
    YEARLESS_WITH_DEFAULT_YEAR
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&with_year, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_dated_layouts() {
        assert_eq!(coerce_date("02-Jan-2024", None), Some(ymd(2024, 1, 2)));
        assert_eq!(coerce_date("04 Sep19", None), Some(ymd(2019, 9, 4)));
        assert_eq!(coerce_date("04 Sep 19", None), Some(ymd(2019, 9, 4)));
        assert_eq!(coerce_date("04 Sep 2019", None), Some(ymd(2019, 9, 4)));
        assert_eq!(coerce_date("2023-11-30", None), Some(ymd(2023, 11, 30)));
        assert_eq!(coerce_date("30/11/2023", None), Some(ymd(2023, 11, 30)));
    }

    #[test]
    fn test_yearless_needs_default_year() {
        assert_eq!(coerce_date("01 Jan", None), None);
        assert_eq!(coerce_date("01 Jan", Some(2024)), Some(ymd(2024, 1, 1)));
        assert_eq!(coerce_date("Sep 4", Some(2023)), Some(ymd(2023, 9, 4)));
    }

    #[test]
    fn test_printed_year_wins_over_default_year() {
        assert_eq!(coerce_date("04 Sep 2019", Some(2023)), Some(ymd(2019, 9, 4)));
        assert_eq!(coerce_date("04 Sep19", Some(2023)), Some(ymd(2019, 9, 4)));
    }

    #[test]
    fn test_garbage_is_null() {
        assert_eq!(coerce_date("", Some(2024)), None);
        assert_eq!(coerce_date("Balance b/f", Some(2024)), None);
        assert_eq!(coerce_date("31 Feb", Some(2024)), None);
    }
}
