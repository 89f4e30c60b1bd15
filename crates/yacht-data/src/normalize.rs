//! Declarative field extraction
//!
//! A row table is an ordered list of [`FieldSpec`]s. A field's position in
//! the table is also its position in a positional row and the number in its
//! placeholder key. For each field, [`extract`] tries in order: the array
//! index, the placeholder key, then every semantic key in the order listed.
//! Null counts as missing. When nothing matches, the typed getters substitute
//! the field's declared default.
//!
//! Nothing in here fails. Malformed input degrades to defaults, and the
//! fallbacks are logged at debug level only.

use crate::models::{RawRow, placeholder_key};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::debug;

/// What a getter returns when a field is missing or unreadable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// Numeric zero
    Zero,
    /// Empty string
    Empty,
    /// The literal `Unknown`
    Unknown,
    /// No value (`None` from optional getters)
    Absent,
}

/// One target field and where to look for it
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Canonical field name
    pub name: &'static str,
    /// Semantic keys, primary first. Dotted keys walk nested objects.
    pub keys: &'static [&'static str],
    /// Default when nothing matches
    pub default: FieldDefault,
}

impl FieldSpec {
    /// Declare a field
    pub const fn new(
        name: &'static str,
        keys: &'static [&'static str],
        default: FieldDefault,
    ) -> Self {
        Self {
            name,
            keys,
            default,
        }
    }
}

/// Field values pulled from one row, still untyped
#[derive(Debug)]
pub struct Extracted<'a> {
    table: &'static [FieldSpec],
    values: Vec<Option<&'a Value>>,
}

/// Resolve every field of `table` against `row`
pub fn extract<'a>(row: &'a RawRow, table: &'static [FieldSpec]) -> Extracted<'a> {
    let values = table
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let found = lookup(row, index, spec);
            if found.is_none() {
                debug!(
                    field = spec.name,
                    shape = ?row.shape(),
                    "field missing from row, using default"
                );
            }
            found
        })
        .collect();

    Extracted { table, values }
}

fn lookup<'a>(row: &'a RawRow, index: usize, spec: &FieldSpec) -> Option<&'a Value> {
    let present = |value: &&Value| !value.is_null();

    row.at_index(index)
        .filter(present)
        .or_else(|| row.by_key(&placeholder_key(index)).filter(present))
        .or_else(|| {
            spec.keys
                .iter()
                .find_map(|key| row.by_key(key).filter(present))
        })
}

impl<'a> Extracted<'a> {
    fn slot(&self, name: &str) -> (Option<&'a Value>, FieldDefault) {
        self.table
            .iter()
            .position(|spec| spec.name == name)
            .and_then(|pos| Some((*self.values.get(pos)?, self.table.get(pos)?.default)))
            .unwrap_or((None, FieldDefault::Absent))
    }

    /// Raw value, if any accessor matched
    pub fn raw(&self, name: &str) -> Option<&'a Value> {
        self.slot(name).0
    }

    /// Text field; empty or unreadable input yields the declared default
    pub fn text(&self, name: &str) -> String {
        let (value, default) = self.slot(name);
        value
            .and_then(coerce_string)
            .unwrap_or_else(|| match default {
                FieldDefault::Unknown => "Unknown".to_string(),
                _ => String::new(),
            })
    }

    /// Optional text field
    pub fn opt_text(&self, name: &str) -> Option<String> {
        self.raw(name).and_then(coerce_string)
    }

    /// Numeric field; failed parses yield 0
    pub fn number(&self, name: &str) -> f64 {
        self.opt_number(name).unwrap_or(0.0)
    }

    /// Optional numeric field
    pub fn opt_number(&self, name: &str) -> Option<f64> {
        self.raw(name).and_then(coerce_f64)
    }

    /// Non-negative integer field; failed parses yield 0
    pub fn count(&self, name: &str) -> u64 {
        self.raw(name).and_then(coerce_u64).unwrap_or(0)
    }

    /// Boolean field
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.raw(name).and_then(coerce_bool)
    }

    /// Calendar date field
    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.raw(name).and_then(coerce_date)
    }

    /// Timestamp field
    pub fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        self.raw(name).and_then(coerce_timestamp)
    }
}

/// Locale-independent number coercion.
///
/// Numbers pass through, numeric strings are parsed (a trailing `%` is
/// ignored), booleans become 1 or 0. Non-finite results are rejected.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Non-negative integer coercion; negatives clamp to 0, fractions round
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn coerce_u64(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    coerce_f64(value).map(|n| n.max(0.0).round() as u64)
}

/// Text coercion; empty strings count as missing
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Boolean coercion accepting the spellings the backend has used
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "1" | "resolved" => Some(true),
            "false" | "f" | "no" | "n" | "0" | "unresolved" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Date coercion from `YYYY-MM-DD` or any timestamp form
pub fn coerce_date(value: &Value) -> Option<NaiveDate> {
    let Value::String(s) = value else {
        return coerce_timestamp(value).map(|ts| ts.date_naive());
    };
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| s.get(..10).and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()))
}

/// Timestamp coercion.
///
/// Accepts RFC 3339, the Postgres text form (`2024-01-15 14:32:00+00`),
/// naive date-times (taken as UTC), bare dates (midnight UTC) and epoch
/// seconds.
pub fn coerce_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Clamp into `[lo, hi]`, mapping non-finite input to `lo`
pub fn clamp_range(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_finite() { value.clamp(lo, hi) } else { lo }
}
