//! Validator builder for fluent validation API.

use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::result::ValidationResult;
use crate::error::ConfigError;
use crate::error::FieldValidationError;
use crate::model::Record;
use crate::model::Value;

/// Type alias for validation rule closures.
type Rule = Box<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Rules registered for one field, run in registration order.
struct FieldEntry {
    name: String,
    rules: Vec<Rule>,
}

/// Builder for validating multiple form fields.
///
/// # Example
///
/// ```
/// use finportal_lib::form::Validator;
/// use finportal_lib::model::Record;
///
/// let validator = Validator::new()
///     .field("name")
///         .required("Name is required")
///         .max_length(120, "Name is too long")
///     .field("amount")
///         .numeric("Amount must be a number")
///         .min(0.0, "Amount cannot be negative")
///     .build();
///
/// let record = Record::new("project").set("name", "").set("amount", "-3");
/// let result = validator.validate(&record);
/// assert_eq!(result.errors().len(), 2);
/// assert_eq!(result.first_invalid_field(), Some("name"));
/// ```
pub struct Validator {
    fields: Vec<FieldEntry>,
}

impl Validator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field to validate.
    pub fn field(self, name: impl Into<String>) -> FieldBuilder {
        FieldBuilder {
            validator: self,
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Returns the names of the validated fields.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Validates the fields of `record`.
    pub fn validate(&self, record: &Record) -> ValidationResult {
        self.validate_with(|name| record.get(name))
    }

    /// Validates the values returned by `lookup`. A field `lookup` does not
    /// know is validated as null.
    pub fn validate_with<'v>(&self, lookup: impl Fn(&str) -> Option<&'v Value>) -> ValidationResult {
        let mut errors = Vec::new();

        for field in &self.fields {
            let value = lookup(&field.name).unwrap_or(&Value::Null);
            if let Some(message) = field.rules.iter().find_map(|rule| rule(value).err()) {
                errors.push(FieldValidationError::new(field.name.clone(), message));
            }
        }

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for adding validation rules to a single field.
pub struct FieldBuilder {
    validator: Validator,
    name: String,
    rules: Vec<Rule>,
}

impl FieldBuilder {
    /// Add a custom validation rule. The closure sees the raw value, blank
    /// or not.
    pub fn rule<F>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let msg = msg.into();
        self.rules
            .push(Box::new(move |v| if f(v) { Ok(()) } else { Err(msg.clone()) }));
        self
    }

    /// Adds a rule that only runs on non-blank values.
    fn present_rule<F>(self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.rule(move |v| is_blank(v) || f(v), msg)
    }

    /// Require the field to be non-empty.
    pub fn required(self, msg: impl Into<String>) -> Self {
        self.rule(|v| !is_blank(v), msg)
    }

    /// Require minimum length (characters for text, items for lists).
    pub fn min_length(self, min: usize, msg: impl Into<String>) -> Self {
        self.present_rule(move |v| length(v).is_none_or(|len| len >= min), msg)
    }

    /// Require maximum length (characters for text, items for lists).
    pub fn max_length(self, max: usize, msg: impl Into<String>) -> Self {
        self.present_rule(move |v| length(v).is_none_or(|len| len <= max), msg)
    }

    /// Require the value to match a regex pattern.
    ///
    /// An invalid pattern is logged and fails every non-empty value; use
    /// [`try_pattern`](Self::try_pattern) to surface it as an error instead.
    pub fn pattern(self, pattern: &str, msg: impl Into<String>) -> Self {
        match Regex::new(pattern) {
            Ok(re) => self.matching(re, msg),
            Err(err) => {
                log::warn!("invalid pattern for field '{}': {err}", self.name);
                self.present_rule(|_| false, msg)
            }
        }
    }

    /// Require the value to match a regex pattern, rejecting an invalid
    /// pattern up front.
    pub fn try_pattern(self, pattern: &str, msg: impl Into<String>) -> Result<Self, ConfigError> {
        match Regex::new(pattern) {
            Ok(re) => Ok(self.matching(re, msg)),
            Err(source) => Err(ConfigError::InvalidPattern {
                field: self.name,
                source,
            }),
        }
    }

    fn matching(self, re: Regex, msg: impl Into<String>) -> Self {
        self.present_rule(
            move |v| v.search_text().is_some_and(|text| re.is_match(&text)),
            msg,
        )
    }

    /// Require a valid email address.
    pub fn email(self, msg: impl Into<String>) -> Self {
        self.present_rule(
            |v| match v {
                Value::String(s) => email_address::EmailAddress::is_valid(s.trim()),
                _ => false,
            },
            msg,
        )
    }

    /// Require a number, or text that parses as one.
    pub fn numeric(self, msg: impl Into<String>) -> Self {
        self.present_rule(|v| numeric_value(v).is_some(), msg)
    }

    /// Require a numeric value of at least `min`.
    pub fn min(self, min: f64, msg: impl Into<String>) -> Self {
        self.present_rule(
            move |v| {
                numeric_value(v)
                    .and_then(|n| n.to_f64())
                    .is_some_and(|n| n >= min)
            },
            msg,
        )
    }

    /// Require a numeric value of at most `max`.
    pub fn max(self, max: f64, msg: impl Into<String>) -> Self {
        self.present_rule(
            move |v| {
                numeric_value(v)
                    .and_then(|n| n.to_f64())
                    .is_some_and(|n| n <= max)
            },
            msg,
        )
    }

    /// Continue to the next field.
    pub fn field(self, name: impl Into<String>) -> FieldBuilder {
        self.build().field(name)
    }

    /// Finalize and validate the fields of `record`.
    pub fn validate(self, record: &Record) -> ValidationResult {
        self.build().validate(record)
    }

    /// Finalize this field and return the validator.
    pub fn build(self) -> Validator {
        let mut validator = self.validator;
        match validator.fields.iter_mut().find(|f| f.name == self.name) {
            Some(entry) => entry.rules.extend(self.rules),
            None => validator.fields.push(FieldEntry {
                name: self.name,
                rules: self.rules,
            }),
        }
        validator
    }
}

impl From<FieldBuilder> for Validator {
    fn from(builder: FieldBuilder) -> Self {
        builder.build()
    }
}

/// Null, whitespace-only text and empty lists count as blank.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::List(items) => items.is_empty(),
        _ => false,
    }
}

fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::List(items) => Some(items.len()),
        _ => None,
    }
}

/// Form inputs arrive as text, so numeric text counts as a number.
fn numeric_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        other => other.as_decimal(),
    }
}
