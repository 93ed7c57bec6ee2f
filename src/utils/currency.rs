use itertools::Itertools;
use serde::{Deserialize, Serialize};

const USD_SYMBOL: &str = "$";

/// Most decimal places ever rendered; larger mantissas are clamped.
pub const MAX_MANTISSA: usize = 20;

const THOUSAND: f64 = 1_000.0;
const MILLION: f64 = 1_000_000.0;
const BILLION: f64 = 1_000_000_000.0;
const TRILLION: f64 = 1_000_000_000_000.0;

/// Suffixes used when a currency value is averaged. A unit without a suffix
/// is never used.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Abbreviations {
    #[serde(default)]
    pub thousand: Option<String>,
    #[serde(default)]
    pub million: Option<String>,
    #[serde(default)]
    pub billion: Option<String>,
    #[serde(default)]
    pub trillion: Option<String>,
}

impl Abbreviations {
    /// Million and billion only. Anything below a million keeps its digits.
    pub fn dollar() -> Self {
        Abbreviations {
            million: Some("M".to_string()),
            billion: Some("B".to_string()),
            ..Default::default()
        }
    }

    /// Configured units in ascending order of scale.
    fn units(&self) -> Vec<(f64, &str)> {
        [
            (THOUSAND, &self.thousand),
            (MILLION, &self.million),
            (BILLION, &self.billion),
            (TRILLION, &self.trillion),
        ]
        .into_iter()
        .filter_map(|(scale, suffix)| suffix.as_deref().map(|s| (scale, s)))
        .collect()
    }
}

/// Options for a single currency formatting call.
#[derive(Debug, Clone, Copy)]
pub struct CurrencyFormat<'a> {
    /// Abbreviate large magnitudes with the configured suffixes.
    pub average: bool,
    /// Decimal places shown after the point, at most [`MAX_MANTISSA`].
    pub mantissa: usize,
    pub abbreviations: &'a Abbreviations,
}

/// Turns a number into a currency string.
pub trait CurrencyFormatter {
    fn format(&self, value: f64, options: &CurrencyFormat<'_>) -> String;
}

/// US dollar formatting: `$` prefix, `,` thousands separator, `-$` for
/// negative values.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsdFormatter;

impl CurrencyFormatter for UsdFormatter {
    fn format(&self, value: f64, options: &CurrencyFormat<'_>) -> String {
        if !value.is_finite() {
            return "-".to_string();
        }

        let mantissa = options.mantissa.min(MAX_MANTISSA);
        let magnitude = value.abs();
        let (scaled, suffix) = if options.average {
            abbreviate(magnitude, mantissa, options.abbreviations)
        } else {
            (magnitude, "")
        };

        let digits = format!("{:.*}", mantissa, scaled);
        // A value that rounds to zero carries no sign
        let negative = value < 0.0 && digits.bytes().any(|b| matches!(b, b'1'..=b'9'));

        format!(
            "{}{}{}{}",
            if negative { "-" } else { "" },
            USD_SYMBOL,
            group_thousands(&digits),
            suffix
        )
    }
}

/// Picks the largest unit the rounded magnitude reaches and scales into it.
/// A scaled value that rounds up into the next unit is promoted.
fn abbreviate(magnitude: f64, mantissa: usize, abbreviations: &Abbreviations) -> (f64, &str) {
    let units = abbreviations.units();
    let rounded = round_to(magnitude, mantissa);

    let Some(mut index) = units.iter().rposition(|(scale, _)| rounded >= *scale) else {
        return (magnitude, "");
    };

    while let Some(&(next_scale, _)) = units.get(index + 1) {
        let (scale, _) = units[index];
        if round_to(magnitude / scale, mantissa) * scale < next_scale {
            break;
        }
        index += 1;
    }

    let (scale, suffix) = units[index];
    (magnitude / scale, suffix)
}

fn round_to(value: f64, mantissa: usize) -> f64 {
    format!("{:.*}", mantissa.min(MAX_MANTISSA), value).parse().unwrap_or(value)
}

/// Inserts `,` every three digits of the integer part of an unsigned
/// decimal string.
fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    let grouped = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(String::from_utf8_lossy)
        .join(",");

    match frac_part {
        Some(frac) => format!("{}.{}", grouped, frac),
        None => grouped,
    }
}
