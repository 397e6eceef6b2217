//! Numeric coercion for amount tokens printed on statements.
//!
//! A token is amount-shaped when, after removing thousands separators, it is
//! made only of ASCII digits and dots. Anything else is not an amount and the
//! caller falls back to its field default (0 for in/out, unknown for balance).

/// Strip thousands separators and return the token if it is amount-shaped.
///
/// `"1,234.56"` and `"1234.56"` both yield `"1234.56"`. A shape match does
/// not guarantee a valid float (`"1.2.3"` passes the shape check).
pub fn clean_amount(raw: &str) -> Option<String> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    let has_digit = cleaned.chars().any(|c| c.is_ascii_digit());
    let shaped = cleaned.chars().all(|c| c.is_ascii_digit() || c == '.');
    (has_digit && shaped).then_some(cleaned)
}

/// Parse an unsigned amount token, `None` when it is not a usable number.
pub fn parse_amount(raw: &str) -> Option<f64> {
    clean_amount(raw)?.parse().ok()
}

/// Parse a signed amount token such as `-1,250.00`, `+$40.00` or `£12.5`.
pub fn parse_signed_amount(raw: &str) -> Option<f64> {
    let stripped: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '£'))
        .collect();
    let (negative, body) = match stripped.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, stripped.strip_prefix('+').unwrap_or(&stripped)),
    };
    let value = parse_amount(body)?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators_do_not_change_value() {
        assert_eq!(parse_amount("1234.56"), Some(1234.56));
        assert_eq!(parse_amount("1,234.56"), parse_amount("1234.56"));
        assert_eq!(parse_amount("12,345,678.90"), Some(12345678.90));
    }

    #[test]
    fn test_non_amounts() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("CR"), None);
        assert_eq!(parse_amount("-45.00"), None);
        assert_eq!(parse_amount("."), None);
        assert_eq!(parse_amount("1.2.3"), None);
        assert!(clean_amount("1.2.3").is_some());
    }

    #[test]
    fn test_signed_amounts() {
        assert_eq!(parse_signed_amount("-1,250.00"), Some(-1250.0));
        assert_eq!(parse_signed_amount("$40.00"), Some(40.0));
        assert_eq!(parse_signed_amount("+12.50"), Some(12.5));
        assert_eq!(parse_signed_amount("-$9.99"), Some(-9.99));
        assert_eq!(parse_signed_amount("n/a"), None);
    }
}
