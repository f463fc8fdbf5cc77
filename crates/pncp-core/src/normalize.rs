//! Canonical forms for free-text names and pt-BR formatted money values.
//!
//! Both helpers are total: they never fail. [`try_parse_money`] keeps the
//! failure reason visible for callers (and tests) that care about it.

use serde_json::Value;
use thiserror::Error;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalizes a free-text organization or supplier name for comparison.
///
/// Strips diacritics, upper-cases, collapses every whitespace run to a single
/// space and trims both ends. Empty input yields an empty string.
///
/// The result is a fixed point: `normalize_text(&normalize_text(x)) == normalize_text(x)`.
#[must_use]
pub fn normalize_text(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    // Upper-casing can reintroduce combining marks (e.g. `ǰ` -> `J̌`), and
    // compatibility decomposition can yield lowercase letters (`ª` -> `a`),
    // so strip on both sides of the case mapping.
    let folded = strip_diacritics(&strip_diacritics(s).to_uppercase());
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_diacritics(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.nfkd().filter(|c| !is_combining_mark(*c)) {
        match fold_letter(c) {
            Some(ascii) => out.push_str(ascii),
            None => out.push(c),
        }
    }
    out
}

/// Latin letters with no canonical decomposition (strokes, ligatures).
fn fold_letter(c: char) -> Option<&'static str> {
    let ascii = match c {
        'Ø' => "O",
        'ø' => "o",
        'Æ' => "AE",
        'æ' => "ae",
        'Œ' => "OE",
        'œ' => "oe",
        'Ł' => "L",
        'ł' => "l",
        'Đ' | 'Ð' => "D",
        'đ' | 'ð' => "d",
        'Þ' => "TH",
        'þ' => "th",
        'Ħ' => "H",
        'ħ' => "h",
        'ı' => "i",
        'ß' => "ss",
        _ => return None,
    };
    Some(ascii)
}

/// Why a money value could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    #[error("value is absent or null")]
    Absent,

    #[error("value {0:?} is not a number")]
    Invalid(String),

    /// A JSON number with a fractional part: its `.` is a decimal point, which
    /// the pt-BR rewrite would misread as a thousands separator.
    #[error("numeric value {0} conflicts with the pt-BR format")]
    LocaleConflict(String),

    #[error("value {0:?} is not finite")]
    NonFinite(String),
}

/// Interprets a pt-BR formatted money value (`"1.234,56"` -> `1234.56`).
///
/// Strings have every `.` removed and `,` replaced by `.` before parsing.
/// Integral JSON numbers pass through unchanged.
///
/// # Errors
///
/// Returns [`MoneyParseError`] describing why the value was rejected.
pub fn try_parse_money(value: Option<&Value>) -> Result<f64, MoneyParseError> {
    match value {
        None | Some(Value::Null) => Err(MoneyParseError::Absent),
        Some(Value::String(s)) => parse_money_str(s),
        Some(Value::Number(n)) => {
            let Some(f) = n.as_f64() else {
                return Err(MoneyParseError::Invalid(n.to_string()));
            };
            if !f.is_finite() {
                return Err(MoneyParseError::NonFinite(n.to_string()));
            }
            if f.fract() != 0.0 {
                return Err(MoneyParseError::LocaleConflict(n.to_string()));
            }
            Ok(f)
        }
        Some(other) => Err(MoneyParseError::Invalid(other.to_string())),
    }
}

fn parse_money_str(raw: &str) -> Result<f64, MoneyParseError> {
    let rewritten = raw.trim().replace('.', "").replace(',', ".");
    let parsed = rewritten
        .parse::<f64>()
        .map_err(|_| MoneyParseError::Invalid(raw.to_owned()))?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(MoneyParseError::NonFinite(raw.to_owned()))
    }
}

/// Best-effort variant of [`try_parse_money`]: any failure becomes `0.0`.
#[must_use]
pub fn parse_money(value: Option<&Value>) -> f64 {
    try_parse_money(value).unwrap_or(0.0)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
