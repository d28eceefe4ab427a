//! Value enum for dynamic field values

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::SecondsFormat;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::prelude::ToPrimitive;

use super::Record;

/// A dynamic value held by one field of a [`Record`].
///
/// # Type Mapping
///
/// | JSON / portal type | Rust Variant |
/// |--------------------|--------------|
/// | null | `Null` |
/// | boolean | `Bool` |
/// | integer | `Int` |
/// | fractional number | `Float` |
/// | monetary amount | `Decimal` |
/// | string | `String` |
/// | `YYYY-MM-DD` string | `Date` |
/// | RFC 3339 string | `DateTime` |
/// | array | `List` |
/// | object | `Record` |
///
/// # Example
///
/// ```
/// use finportal_lib::model::Value;
///
/// let name = Value::from("Mangrove restoration");
/// let amount = Value::from(250_000i64);
/// let tags = Value::from(vec!["adaptation", "coastal"]);
/// let empty = Value::Null;
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Null/empty value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Arbitrary precision decimal, used for monetary amounts.
    Decimal(Decimal),
    /// String value.
    String(String),
    /// Calendar date without time.
    Date(NaiveDate),
    /// Date and time in UTC.
    DateTime(DateTime<Utc>),
    /// Ordered collection of values.
    List(Vec<Value>),
    /// Nested record.
    Record(Box<Record>),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for `Int`, `Float` and `Decimal`.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::Decimal(_))
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }

    /// Returns the value as a float if it is numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            Value::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    /// Returns the value as a decimal if it is numeric and representable.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Int(n) => Some(Decimal::from(*n)),
            Value::Float(n) => Decimal::from_f64(*n),
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the value as a point in time if it is date-like.
    ///
    /// Dates map to midnight UTC. Strings qualify when they parse as
    /// RFC 3339 or as a plain `YYYY-MM-DD` date.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            Value::Date(d) => Some(d.and_hms_opt(0, 0, 0)?.and_utc()),
            Value::String(s) => parse_date_like(s),
            _ => None,
        }
    }

    /// Returns the text a search term is matched against.
    ///
    /// Lists join their elements with `,`. Nulls and nested records have no
    /// searchable text.
    pub fn search_text(&self) -> Option<String> {
        match self {
            Value::Null | Value::Record(_) => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(n) => Some(n.to_string()),
            Value::Float(n) => Some(n.to_string()),
            Value::Decimal(d) => Some(d.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Value::DateTime(dt) => Some(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::List(items) => Some(
                items
                    .iter()
                    .map(|item| item.search_text().unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        }
    }

    /// Equality without coercion between kinds.
    ///
    /// `Int`, `Float` and `Decimal` are one numeric kind and compare by
    /// numeric value. A string never equals a number, and a date never
    /// equals a date-time.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(_), _) | (_, Value::Float(_))
                if self.is_number() && other.is_number() =>
            {
                self.as_number() == other.as_number()
            }
            (a, b) if a.is_number() && b.is_number() => a.as_decimal() == b.as_decimal(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.strict_eq(y))
            }
            (Value::Record(a), Value::Record(b)) => a == b,
            _ => false,
        }
    }
}

/// Parses RFC 3339 timestamps and plain `YYYY-MM-DD` dates.
fn parse_date_like(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Record(record) => match record.entity_name() {
                "" => f.write_str("record"),
                name => f.write_str(name),
            },
            other => f.write_str(&other.search_text().unwrap_or_default()),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(Box::new(v))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}
