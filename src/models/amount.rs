use serde::{Deserialize, Serialize};

fn default_digits() -> usize {
    2
}

fn default_true() -> bool {
    true
}

/// Precision and abbreviation settings for a dollar amount.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    #[serde(default = "default_digits")]
    pub digits: usize,
    #[serde(default = "default_true")]
    pub round: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            digits: default_digits(),
            round: default_true(),
        }
    }
}

/// Parses user input such as `1234.5`, `$1,234.50` or `-$20` into an amount.
/// Returns None for empty, unparseable or non-finite input.
pub fn parse_amount(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let digits: String = rest
        .strip_prefix('$')
        .unwrap_or(rest)
        .chars()
        .filter(|c| *c != ',')
        .collect();

    if digits.is_empty() || digits.starts_with(['-', '+']) {
        return None;
    }

    let value: f64 = digits.parse().ok().filter(|v: &f64| v.is_finite())?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = FormatOptions::default();
        assert_eq!(options.digits, 2);
        assert!(options.round);

        let parsed: FormatOptions = serde_json::from_str(r#"{"digits": 4}"#).unwrap();
        assert_eq!(parsed, FormatOptions { digits: 4, round: true });
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1234.5"), Some(1234.5));
        assert_eq!(parse_amount(" $1,234.50 "), Some(1234.5));
        assert_eq!(parse_amount("-$20"), Some(-20.0));
        assert_eq!(parse_amount("-0.25"), Some(-0.25));
        assert_eq!(parse_amount("2.5e6"), Some(2_500_000.0));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("-"), None);
        assert_eq!(parse_amount("$"), None);
        assert_eq!(parse_amount("--5"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("1.2.3"), None);
    }

    #[test]
    fn test_parse_amount_rejects_non_finite() {
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("-$infinity"), None);
        assert_eq!(parse_amount("1e400"), None);
    }
}
