//! Facet values and numeric totals over a set of records.

use rust_decimal::Decimal;

use super::field::Accessor;
use crate::model::Record;
use crate::model::Value;

/// Distinct values of one field across `records`, in first-seen order.
///
/// List values contribute each element. Missing and null values are skipped.
/// Values are deduplicated with [`Value::strict_eq`], so `Int(5)` and
/// `Decimal(5)` collapse into one entry.
pub fn distinct_values<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    accessor: &Accessor,
) -> Vec<Value> {
    let mut seen: Vec<Value> = Vec::new();
    let mut push = |value: &Value| {
        if !value.is_null() && !seen.iter().any(|known| known.strict_eq(value)) {
            seen.push(value.clone());
        }
    };

    for record in records {
        let Some(value) = accessor.resolve(record) else {
            continue;
        };
        match value.as_ref() {
            Value::List(items) => items.iter().for_each(&mut push),
            other => push(other),
        }
    }
    seen
}

/// Sum and count of the numeric values of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumericTotal {
    /// Sum of all numeric values.
    pub sum: Decimal,
    /// Number of records that contributed a numeric value.
    pub count: usize,
}

impl NumericTotal {
    /// Average of the contributing values, or `None` when nothing
    /// contributed.
    pub fn mean(&self) -> Option<Decimal> {
        if self.count == 0 {
            return None;
        }
        self.sum.checked_div(Decimal::from(self.count))
    }
}

/// Totals the numeric values of one field. Non-numeric and missing values
/// are skipped.
pub fn numeric_total<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    accessor: &Accessor,
) -> NumericTotal {
    let mut total = NumericTotal::default();
    for record in records {
        let Some(amount) = accessor.resolve(record).and_then(|v| v.as_decimal()) else {
            continue;
        };
        match total.sum.checked_add(amount) {
            Some(sum) => {
                total.sum = sum;
                total.count += 1;
            }
            None => log::warn!("numeric total overflowed, skipping value {amount}"),
        }
    }
    total
}
