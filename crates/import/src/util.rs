use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::raw::RawValue;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%m-%d-%Y", "%d-%m-%Y", "%Y%m%d", "%d %b %Y",
    "%b %d, %Y", "%B %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parses a calendar date from the common bank-export layouts. Timestamps
/// keep only their date part. Month-first wins over day-first when both fit.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(date);
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }

    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Amounts beyond one quadrillion in magnitude are rejected as unparsable.
const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Permissive amount parsing: surrounding whitespace, thousands separators,
/// dollar signs, accounting parentheses and scientific notation.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    let (negative, s) = if s.starts_with('(') && s.ends_with(')') && s.len() >= 2 {
        (true, &s[1..s.len() - 1])
    } else {
        (false, s)
    };
    let s = s.replace([',', '$', ' '], "");
    if s.is_empty() {
        return None;
    }
    let dec = Decimal::from_str(&s)
        .or_else(|_| Decimal::from_scientific(&s))
        .ok()?;
    if dec.abs() > Decimal::from(MAX_AMOUNT) {
        return None;
    }
    Some(if negative { -dec } else { dec })
}

pub fn date_value(value: &RawValue) -> Option<NaiveDate> {
    match value {
        RawValue::Text(s) => parse_date(s),
        _ => None,
    }
}

/// Booleans are not amounts.
pub fn amount_value(value: &RawValue) -> Option<Decimal> {
    match value {
        RawValue::Text(s) => parse_amount(s),
        RawValue::Number(n) => parse_amount(&n.to_string()),
        RawValue::Null | RawValue::Bool(_) => None,
    }
}
