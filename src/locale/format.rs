//! Number and date rendering/parsing against a [`Culture`].
//!
//! Number formats are a letter plus optional precision: `n` grouped number,
//! `d` zero-padded integer, `p` percent, `c` currency. Anything else renders
//! the plain number with the culture's decimal separator.
//!
//! Date formats are either a standard letter resolved through the culture's
//! calendar patterns, or a custom pattern built from the tokens `yyyy yy MMMM
//! MMM MM M dddd ddd dd d HH H hh h mm m ss s fff tt`. Text in single quotes is
//! copied literally. Patterns are rendered and parsed through `chrono`.

use super::Culture;
use crate::value::format_number as plain_number;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Date pattern tokens, longest first so that `MMMM` wins over `MM`.
const DATE_TOKENS: [(&str, &str); 20] = [
    ("yyyy", "%Y"),
    ("yy", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("dd", "%d"),
    ("d", "%-d"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%I"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("m", "%-M"),
    ("ss", "%S"),
    ("s", "%-S"),
    ("fff", "%3f"),
    ("tt", "%p"),
];

/// Largest precision a number format renders; longer requests are clamped.
const MAX_PRECISION: usize = 20;

/// Split a number format into its letter and optional precision.
fn split_number_format(format: &str) -> Option<(char, Option<usize>)> {
    let mut chars = format.chars();
    let letter = chars.next()?.to_ascii_lowercase();
    if !matches!(letter, 'n' | 'd' | 'p' | 'c') {
        return None;
    }
    let digits = chars.as_str();
    if digits.is_empty() {
        return Some((letter, None));
    }
    digits
        .parse::<usize>()
        .ok()
        .map(|precision| (letter, Some(precision.min(MAX_PRECISION))))
}

/// Insert group separators into the integer part and apply the culture's
/// decimal separator.
fn grouped(value: f64, decimals: usize, culture: &Culture) -> String {
    let number_format = &culture.number_format;
    let fixed = format!("{:.*}", decimals.min(MAX_PRECISION), value.abs());
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            out.push_str(&number_format.group);
        }
        out.push(digit);
    }
    if let Some(fraction) = fraction {
        out.push_str(&number_format.decimal);
        out.push_str(fraction);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        out.insert(0, '-');
    }
    out
}

/// Substitute `n` (and `$` for currency) in a culture pattern. A leading minus
/// stays in front of the whole pattern.
fn apply_pattern(pattern: &str, number: &str, symbol: &str) -> String {
    let (sign, digits) = match number.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", number),
    };
    let body = pattern.replace('n', digits).replace('$', symbol);
    format!("{}{}", sign, body)
}

pub fn format_number(value: f64, format: &str, culture: &Culture) -> String {
    if !value.is_finite() {
        return plain_number(value);
    }

    let number_format = &culture.number_format;
    match split_number_format(format) {
        Some(('n', precision)) => grouped(value, precision.unwrap_or(number_format.decimals), culture),
        Some(('d', precision)) => {
            let integer = value.trunc();
            let digits = format!("{:0width$.0}", integer.abs(), width = precision.unwrap_or(0));
            if integer < 0.0 {
                format!("-{}", digits)
            } else {
                digits
            }
        }
        Some(('p', precision)) => {
            let number = grouped(value * 100.0, precision.unwrap_or(number_format.decimals), culture);
            apply_pattern(&number_format.percent_pattern, &number, &number_format.percent_symbol)
        }
        Some(('c', precision)) => {
            let number = grouped(value, precision.unwrap_or(number_format.decimals), culture);
            apply_pattern(&number_format.currency_pattern, &number, &number_format.currency_symbol)
        }
        _ => plain_number(value).replace('.', &number_format.decimal),
    }
}

pub fn parse_number(text: &str, culture: &Culture) -> Option<f64> {
    let number_format = &culture.number_format;
    let mut text = text.trim().to_string();
    let mut scale = 1.0;

    if !number_format.currency_symbol.is_empty() {
        text = text.replace(&number_format.currency_symbol, "");
    }
    if !number_format.percent_symbol.is_empty() && text.contains(&number_format.percent_symbol) {
        text = text.replace(&number_format.percent_symbol, "");
        scale = 0.01;
    }
    if !number_format.group.is_empty() {
        text = text.replace(&number_format.group, "");
    }
    if number_format.group.trim().is_empty() {
        text = text.replace('\u{a0}', "");
    }
    if number_format.decimal != "." {
        text = text.replace(&number_format.decimal, ".");
    }

    let text = text.trim();
    let numeric = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E');
    if text.is_empty() || !text.chars().all(numeric) {
        return None;
    }
    text.parse::<f64>()
        .ok()
        .filter(|n| !n.is_nan())
        .map(|n| n * scale)
}

/// Resolve a standard format letter, or keep a custom pattern as-is.
fn date_pattern<'a>(format: &'a str, culture: &'a Culture) -> &'a str {
    culture
        .calendar
        .patterns
        .get(format)
        .map(String::as_str)
        .unwrap_or(format)
}

/// Translate a date pattern into a `chrono` format string.
pub fn to_strftime(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    'scan: while let Some(c) = rest.chars().next() {
        if c == '\'' {
            let literal = &rest[1..];
            let end = literal.find('\'').unwrap_or(literal.len());
            out.push_str(&literal[..end].replace('%', "%%"));
            rest = literal.get(end + 1..).unwrap_or_default();
            continue;
        }

        for (token, specifier) in DATE_TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(specifier);
                rest = tail;
                continue 'scan;
            }
        }

        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    out
}

pub fn format_date(instant: DateTime<Utc>, format: &str, culture: &Culture) -> String {
    let pattern = to_strftime(date_pattern(format, culture));
    instant.format(&pattern).to_string()
}

pub fn parse_date(text: &str, format: &str, culture: &Culture) -> Option<DateTime<Utc>> {
    let text = text.trim();
    let pattern = to_strftime(date_pattern(format, culture));

    NaiveDateTime::parse_from_str(text, &pattern)
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, &pattern)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}
