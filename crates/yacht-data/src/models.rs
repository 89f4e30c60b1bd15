//! Raw row shapes as they arrive from backend procedures
//!
//! The backend is not firm about how it encodes a result row. We have seen
//! positional arrays, tuple objects keyed `f1..fn`, and properly named
//! objects, sometimes from the same procedure on different deployments.
//! [`RawRow`] names those shapes explicitly; nothing past the mappers ever
//! sees one.

use serde_json::{Map, Value};

/// One backend result row, tagged by the shape it arrived in
#[derive(Debug, Clone, PartialEq)]
pub enum RawRow {
    /// Fields addressed by position: `["GPS", 45]`
    Positional(Vec<Value>),
    /// Fields keyed by positional placeholders: `{"f1": "GPS", "f2": 45}`
    Placeholder(Map<String, Value>),
    /// Fields keyed by meaning: `{"issue": "GPS", "count": 45}`
    Named(Map<String, Value>),
    /// A bare value, as returned by scalar procedures
    Scalar(Value),
}

/// Shape discriminant, mostly for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShape {
    /// See [`RawRow::Positional`]
    Positional,
    /// See [`RawRow::Placeholder`]
    Placeholder,
    /// See [`RawRow::Named`]
    Named,
    /// See [`RawRow::Scalar`]
    Scalar,
}

/// True for `f1`, `f2`, ... keys
pub fn is_placeholder_key(key: &str) -> bool {
    key.strip_prefix('f')
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Placeholder key for a zero-based field position
pub fn placeholder_key(index: usize) -> String {
    format!("f{}", index + 1)
}

impl RawRow {
    /// Classify a single row value
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Positional(items),
            Value::Object(map) if !map.is_empty() && map.keys().all(|k| is_placeholder_key(k)) => {
                Self::Placeholder(map)
            }
            Value::Object(map) => Self::Named(map),
            other => Self::Scalar(other),
        }
    }

    /// Split a whole procedure response into rows.
    ///
    /// An array of rows yields one row per element. An array holding only
    /// scalars is a single positional row rather than many scalar rows. A
    /// lone object is one row and `null` is no rows.
    pub fn rows_from_response(value: Value) -> Vec<Self> {
        match value {
            Value::Null => Vec::new(),
            Value::Array(items) => {
                let all_scalar = !items.is_empty()
                    && items
                        .iter()
                        .all(|item| !item.is_array() && !item.is_object());
                if all_scalar {
                    vec![Self::Positional(items)]
                } else {
                    items
                        .into_iter()
                        .filter(|item| !item.is_null())
                        .map(Self::classify)
                        .collect()
                }
            }
            other => vec![Self::classify(other)],
        }
    }

    /// Shape discriminant
    pub const fn shape(&self) -> RowShape {
        match self {
            Self::Positional(_) => RowShape::Positional,
            Self::Placeholder(_) => RowShape::Placeholder,
            Self::Named(_) => RowShape::Named,
            Self::Scalar(_) => RowShape::Scalar,
        }
    }

    /// Value at a zero-based position, for positional and scalar rows
    pub fn at_index(&self, index: usize) -> Option<&Value> {
        match self {
            Self::Positional(items) => items.get(index),
            Self::Scalar(value) if index == 0 => Some(value),
            _ => None,
        }
    }

    /// Value under a key, for keyed rows.
    ///
    /// A dotted key (`agent.name`) walks into nested objects.
    pub fn by_key(&self, key: &str) -> Option<&Value> {
        let map = match self {
            Self::Placeholder(map) | Self::Named(map) => map,
            _ => return None,
        };

        let mut parts = key.split('.');
        let first = parts.next()?;
        let mut current = map.get(first)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }
}

impl From<Value> for RawRow {
    fn from(value: Value) -> Self {
        Self::classify(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("f1", true)]
    #[case("f12", true)]
    #[case("f", false)]
    #[case("fx", false)]
    #[case("first", false)]
    #[case("count", false)]
    fn test_placeholder_key_detection(#[case] key: &str, #[case] expected: bool) {
        assert_eq!(is_placeholder_key(key), expected);
    }

    #[test]
    fn test_classify_shapes() {
        assert_eq!(RawRow::classify(json!(["GPS", 4])).shape(), RowShape::Positional);
        assert_eq!(
            RawRow::classify(json!({"f1": "GPS", "f2": 4})).shape(),
            RowShape::Placeholder
        );
        assert_eq!(
            RawRow::classify(json!({"f1": "GPS", "count": 4})).shape(),
            RowShape::Named
        );
        assert_eq!(RawRow::classify(json!({})).shape(), RowShape::Named);
        assert_eq!(RawRow::classify(json!(17)).shape(), RowShape::Scalar);
    }

    #[test]
    fn test_rows_from_array_of_rows() {
        let rows = RawRow::rows_from_response(json!([
            ["GPS", 45],
            {"f1": "Engine", "f2": 38},
            null,
            {"issue": "Navigation", "count": 32}
        ]));

        let shapes: Vec<_> = rows.iter().map(RawRow::shape).collect();
        assert_eq!(
            shapes,
            vec![RowShape::Positional, RowShape::Placeholder, RowShape::Named]
        );
    }

    #[test]
    fn test_rows_from_flat_scalar_array_is_one_row() {
        let rows = RawRow::rows_from_response(json!([247, 510.5, "GPS"]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].at_index(2), Some(&json!("GPS")));
    }

    #[test]
    fn test_rows_from_null_and_object() {
        assert!(RawRow::rows_from_response(Value::Null).is_empty());
        assert!(RawRow::rows_from_response(json!([])).is_empty());
        assert_eq!(RawRow::rows_from_response(json!({"total_calls": 3})).len(), 1);
    }

    #[test]
    fn test_dotted_key_lookup() {
        let row = RawRow::classify(json!({"agent": {"name": "Sarah", "contact": "s@x.io"}}));
        assert_eq!(row.by_key("agent.name"), Some(&json!("Sarah")));
        assert_eq!(row.by_key("agent.phone"), None);
        assert_eq!(row.by_key("customer.name"), None);
    }

    #[test]
    fn test_scalar_index_zero_only() {
        let row = RawRow::Scalar(json!(12));
        assert_eq!(row.at_index(0), Some(&json!(12)));
        assert_eq!(row.at_index(1), None);
        assert_eq!(row.by_key("f1"), None);
    }
}
