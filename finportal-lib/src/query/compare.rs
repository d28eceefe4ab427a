//! Sort keys and the comparator used by the sort stage.
//!
//! Each value gets its own key. Two numbers compare numerically, two
//! date-like values compare chronologically, two texts compare as lowercase
//! strings. Keys of different kinds order by kind: missing, then numbers,
//! then dates, then text.

use std::cmp::Ordering;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::model::Value;

/// A precomputed comparison key for one value.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    /// No value or null; sorts before everything else.
    Missing,
    /// Numeric value. `exact` is set for integers and decimals so that
    /// large values do not collapse when widened to `f64`.
    Number { exact: Option<Decimal>, approx: f64 },
    /// Point in time.
    Time(DateTime<Utc>),
    /// Lowercased text.
    Text(String),
}

impl SortKey {
    /// Builds the key for a resolved field value.
    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return SortKey::Missing;
        };

        if let Some(approx) = value.as_number() {
            let exact = match value {
                Value::Int(_) | Value::Decimal(_) => value.as_decimal(),
                _ => None,
            };
            return SortKey::Number { exact, approx };
        }
        if let Some(time) = value.as_datetime() {
            return SortKey::Time(time);
        }
        SortKey::Text(value.search_text().unwrap_or_default().to_lowercase())
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Missing => 0,
            SortKey::Number { .. } => 1,
            SortKey::Time(_) => 2,
            SortKey::Text(_) => 3,
        }
    }
}

/// Total order over sort keys.
pub fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Number { exact: Some(x), .. }, SortKey::Number { exact: Some(y), .. }) => {
            x.cmp(y)
        }
        (SortKey::Number { approx: x, .. }, SortKey::Number { approx: y, .. }) => x.total_cmp(y),
        (SortKey::Time(x), SortKey::Time(y)) => x.cmp(y),
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
        _ => a.rank().cmp(&b.rank()),
    }
}

/// Compares two field values the way the sort stage does.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    compare_keys(&SortKey::from_value(a), &SortKey::from_value(b))
}
