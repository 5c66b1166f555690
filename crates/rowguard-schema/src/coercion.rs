/*!
# Type Coercion

Interpret a raw cell as a candidate value of a declared [`FieldType`].

Coercion is total: it never fails and never panics. Text that does not fit a
numeric type still coerces (to `NaN`); deciding that the cell is malformed is
the validator's job.
*/

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::schemas::FieldType;

/// Tokens accepted as a well-formed boolean cell (after lowercase + trim)
pub const BOOLEAN_TOKENS: &[&str] = &["true", "false", "0", "1"];

/// Characters removed from currency cells before the numeric parse
pub const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', ','];

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Largest integer an `f64` holds exactly (2^53)
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

// ================================================================================================
// Coerced Values
// ================================================================================================

/// Transient typed view of a cell. Never stored back into a record.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercedValue {
    Null,
    Number(f64),
    Bool(bool),
    Text(String),
}

impl CoercedValue {
    /// `Null`, or text that is blank once trimmed
    pub fn is_empty(&self) -> bool {
        match self {
            CoercedValue::Null => true,
            CoercedValue::Text(s) => s.trim().is_empty(),
            CoercedValue::Number(_) | CoercedValue::Bool(_) => false,
        }
    }
}

impl Serialize for CoercedValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            CoercedValue::Null => serializer.serialize_none(),
            CoercedValue::Number(n) if !n.is_finite() => serializer.serialize_none(),
            CoercedValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            CoercedValue::Number(n) => serializer.serialize_f64(*n),
            CoercedValue::Bool(b) => serializer.serialize_bool(*b),
            CoercedValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

// ================================================================================================
// Coercion
// ================================================================================================

/// Coerce a raw cell (`None` when the cell does not exist) to `field_type`.
pub fn coerce(raw: Option<&str>, field_type: FieldType) -> CoercedValue {
    match field_type {
        FieldType::Number => coerce_numeric(raw, false),
        FieldType::Currency => coerce_numeric(raw, true),
        FieldType::Boolean => CoercedValue::Bool(raw.is_some_and(coerce_boolean)),
        FieldType::Date => raw
            .map(|s| CoercedValue::Text(s.to_string()))
            .unwrap_or(CoercedValue::Null),
        FieldType::Email | FieldType::String => {
            CoercedValue::Text(raw.unwrap_or_default().to_string())
        }
    }
}

fn coerce_numeric(raw: Option<&str>, strip_symbols: bool) -> CoercedValue {
    match raw {
        Some(text) if !text.trim().is_empty() => {
            let parsed = if strip_symbols {
                parse_number(&strip_currency(text))
            } else {
                parse_number(text)
            };
            CoercedValue::Number(parsed.unwrap_or(f64::NAN))
        }
        _ => CoercedValue::Null,
    }
}

/// True-like (`"true"`, `"1"`) versus everything else.
///
/// Looser than [`is_valid_boolean_token`]: `"yes"` coerces to
/// `false` here but is rejected by validation.
pub fn coerce_boolean(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "true" | "1")
}

/// Membership in [`BOOLEAN_TOKENS`] after lowercase + trim
pub fn is_valid_boolean_token(raw: &str) -> bool {
    BOOLEAN_TOKENS.contains(&raw.trim().to_lowercase().as_str())
}

/// Remove currency symbols, thousands separators and whitespace
pub fn strip_currency(raw: &str) -> String {
    raw.chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && !c.is_whitespace())
        .collect()
}

/// Parse trimmed text as a floating point literal
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

pub fn is_finite_number(raw: &str) -> bool {
    parse_number(raw).is_some_and(f64::is_finite)
}

pub fn is_valid_currency(raw: &str) -> bool {
    is_finite_number(&strip_currency(raw))
}

/// `local@domain.tld` with no whitespace in either part
pub fn is_valid_email(raw: &str) -> bool {
    EMAIL_PATTERN.is_match(raw.trim())
}

/// Parse a calendar date from the formats Rowguard recognizes.
///
/// Date-times are accepted and truncated to their date. Impossible dates
/// such as `2024-02-30` are rejected.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| DateTime::parse_from_rfc2822(text).ok().map(|dt| dt.date_naive()))
}

pub fn is_valid_date(raw: &str) -> bool {
    parse_date(raw).is_some()
}

// ================================================================================================
// Tests
// ================================================================================================
