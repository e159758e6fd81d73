//! Cell cleanup applied before any value is interpreted

/// Trim whitespace and surrounding quote characters
///
/// BehaviorSpace writes string parameters as `"""random"""`, which the CSV
/// layer decodes to `"random"`; both forms end up as `random`.
pub fn clean_token(raw: &str) -> &str {
    raw.trim().trim_matches('"').trim()
}

/// Parse a cleaned token as a finite number
pub fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a cleaned token as a non-negative integer
///
/// Accepts integral floats such as `12.0`, which some exporters emit.
pub fn parse_index(token: &str) -> Option<u64> {
    if let Ok(value) = token.parse::<u64>() {
        return Some(value);
    }
    parse_number(token)
        .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v <= u64::MAX as f64)
        .map(|v| v as u64)
}

/// Whether a cleaned token is a boolean literal in any casing
pub fn is_boolean(token: &str) -> bool {
    token.eq_ignore_ascii_case("true") || token.eq_ignore_ascii_case("false")
}

/// Whether a column name looks like a NetLogo reporter rather than a parameter
///
/// Reporters are bracketed expressions or aggregate calls such as
/// `count turtles with [rumor-known?]` and `mean [belief] of turtles`.
pub fn looks_like_reporter(column: &str) -> bool {
    column.contains('[') || column.contains("mean") || column.contains("count")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_token() {
        assert_eq!(clean_token("\"random\""), "random");
        assert_eq!(clean_token("  \"true\" "), "true");
        assert_eq!(clean_token("TRUE"), "TRUE");
        assert_eq!(clean_token("0.5"), "0.5");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("0.25"), Some(0.25));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("12"), Some(12));
        assert_eq!(parse_index("12.0"), Some(12));
        assert_eq!(parse_index("12.5"), None);
        assert_eq!(parse_index("-1"), None);
    }

    #[test]
    fn test_reporter_heuristic() {
        assert!(looks_like_reporter("count turtles with [rumor-known?] / population-size"));
        assert!(looks_like_reporter("mean [belief] of turtles"));
        assert!(!looks_like_reporter("network-type"));
        assert!(!looks_like_reporter("heterogeneity-level"));
    }
}
