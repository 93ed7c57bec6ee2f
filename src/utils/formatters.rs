use std::sync::OnceLock;

use crate::models::amount::FormatOptions;
use crate::utils::currency::{Abbreviations, CurrencyFormat, CurrencyFormatter, UsdFormatter};

/// Smallest positive amount shown with its digits at low precision.
const DISPLAY_FLOOR: f64 = 0.001;
const FLOOR_MAX_DIGITS: usize = 3;
/// Amounts above this are always shown with cents.
const LARGE_AMOUNT: f64 = 1000.0;
const LARGE_AMOUNT_MANTISSA: usize = 2;

fn dollar_abbreviations() -> &'static Abbreviations {
    static ABBREVIATIONS: OnceLock<Abbreviations> = OnceLock::new();
    ABBREVIATIONS.get_or_init(Abbreviations::dollar)
}

/// Formats a dollar amount for display
/// - Zero is always "$0.00"
/// - A missing or non-finite amount is "-"
/// - Positive amounts under $0.001 are "<$0.001" unless more than 3 digits are requested
/// - Amounts over $1000 use 2 decimal places, anything else uses `digits`
/// - With `round`, millions and billions are abbreviated as M and B
pub fn format_dollar_amount(amount: Option<f64>, digits: usize, round: bool) -> String {
    format_dollar_amount_with(
        &UsdFormatter,
        amount,
        &FormatOptions { digits, round },
        dollar_abbreviations(),
    )
}

/// Same rules as [`format_dollar_amount`] with a caller-supplied formatter
/// and suffixes.
pub fn format_dollar_amount_with<F>(
    formatter: &F,
    amount: Option<f64>,
    options: &FormatOptions,
    abbreviations: &Abbreviations,
) -> String
where
    F: CurrencyFormatter + ?Sized,
{
    let num = match amount {
        Some(num) if num == 0.0 => return "$0.00".to_string(),
        Some(num) if num.is_finite() => num,
        _ => return "-".to_string(),
    };

    if num > 0.0 && num < DISPLAY_FLOOR && options.digits <= FLOOR_MAX_DIGITS {
        return "<$0.001".to_string();
    }

    let mantissa = if num > LARGE_AMOUNT {
        LARGE_AMOUNT_MANTISSA
    } else {
        options.digits
    };

    formatter.format(
        num,
        &CurrencyFormat {
            average: options.round,
            mantissa,
            abbreviations,
        },
    )
}

/// True when `a` and `b` differ by strictly less than `epsilon`.
pub fn is_equal(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}
