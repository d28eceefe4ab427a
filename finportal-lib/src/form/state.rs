//! Create/edit form state

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;

use super::result::ValidationResult;
use super::validator::Validator;
use crate::model::Record;
use crate::model::Value;

/// Values, touched flags and validation errors of one create/edit form.
///
/// Edit pages start from the selected record with [`FormState::from_record`];
/// create pages start empty. The form never talks to the portal API itself:
/// [`FormState::into_record`] hands the result to whoever persists it.
///
/// # Example
///
/// ```
/// use finportal_lib::form::FormState;
/// use finportal_lib::form::Validator;
/// use finportal_lib::model::Record;
///
/// let validator = Validator::new()
///     .field("name")
///     .required("Name is required")
///     .build();
///
/// let mut form = FormState::from_record(&Record::with_id("agency", "a-1").set("name", "Treasury"));
/// form.set_value("name", "");
/// assert!(form.validate(&validator).is_invalid());
/// assert_eq!(form.error("name"), Some("Name is required"));
///
/// form.set_value("name", "Ministry of Finance");
/// assert_eq!(form.error("name"), None);
/// assert!(form.is_dirty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    id: Option<String>,
    initial: HashMap<String, Value>,
    values: HashMap<String, Value>,
    touched: HashSet<String>,
    errors: BTreeMap<String, String>,
}

impl FormState {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a form holding the fields of `record` as its initial values.
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id().map(str::to_string),
            initial: record.fields().clone(),
            values: record.fields().clone(),
            ..Self::default()
        }
    }

    /// Returns the current value of `field`.
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Returns all current values.
    pub fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }

    /// Stores a value, marks the field touched and clears its error.
    pub fn set_value(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        self.errors.remove(&field);
        self.touched.insert(field.clone());
        self.values.insert(field, value.into());
    }

    /// Returns `true` if the user has set `field` since the last reset.
    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    /// Returns `true` if any value differs from its initial value. A missing
    /// value counts as null.
    pub fn is_dirty(&self) -> bool {
        self.values
            .keys()
            .chain(self.initial.keys())
            .any(|field| {
                let current = self.values.get(field).unwrap_or(&Value::Null);
                let initial = self.initial.get(field).unwrap_or(&Value::Null);
                !current.strict_eq(initial)
            })
    }

    /// Restores the initial values and drops touched flags and errors.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.touched.clear();
        self.errors.clear();
    }

    /// Runs `validator` against the current values and records the first
    /// failing message of each field.
    pub fn validate(&mut self, validator: &Validator) -> ValidationResult {
        let result = validator.validate_with(|field| self.values.get(field));
        self.errors = result
            .errors()
            .iter()
            .map(|error| (error.field.clone(), error.message.clone()))
            .collect();
        log::debug!("form validated: {} field error(s)", self.errors.len());
        result
    }

    /// Returns the recorded errors keyed by field.
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Returns the recorded error of `field`.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Returns `true` if the last validation left errors that have not been
    /// cleared since.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Builds the record to persist. The record keeps the ID of the record
    /// the form was created from.
    pub fn into_record(self, entity_name: impl Into<String>) -> Record {
        Record {
            entity_name: entity_name.into(),
            id: self.id,
            fields: self.values,
        }
    }
}
