//! Dynamic entity record

use std::collections::HashMap;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use rust_decimal::Decimal;

use super::Value;
use crate::error::FieldError;

/// One entity instance of a portal listing (a project, a funding source, an
/// agency…).
///
/// Records hold field values as a `HashMap<String, Value>`. The query
/// pipeline treats them as immutable; typed getters give checked access for
/// code that knows the shape of a particular entity.
///
/// # Example
///
/// ```
/// use finportal_lib::model::Record;
///
/// let record = Record::new("project")
///     .set("name", "Mangrove restoration")
///     .set("amount", 250_000i64);
///
/// assert_eq!(record.get_string("name").unwrap(), Some("Mangrove restoration"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// The entity kind, e.g. `"project"` or `"agency"`.
    pub(crate) entity_name: String,

    /// The identifier assigned by the portal API, if known.
    pub(crate) id: Option<String>,

    /// The field values.
    pub(crate) fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new empty record for the given entity.
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            id: None,
            fields: HashMap::new(),
        }
    }

    /// Creates a new record with the given ID.
    pub fn with_id(entity_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            id: Some(id.into()),
            fields: HashMap::new(),
        }
    }

    // =========================================================================
    // Metadata accessors
    // =========================================================================

    /// Returns the entity name.
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Returns the record ID, if set.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Sets the entity name.
    pub fn set_entity_name(&mut self, name: impl Into<String>) {
        self.entity_name = name.into();
    }

    /// Sets the record ID.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Resolves a dotted path such as `"funding.source.name"`.
    ///
    /// Each segment but the last must name a nested record. Returns `None`
    /// when any segment is missing, empty, or not a record.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.non_empty_field(first)?;
        for segment in segments {
            current = match current {
                Value::Record(inner) => inner.non_empty_field(segment)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Resolves a path that was already split into segments.
    pub fn get_segments<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Value> {
        let (first, rest) = segments.split_first()?;
        let mut current = self.non_empty_field(first.as_ref())?;
        for segment in rest {
            current = match current {
                Value::Record(inner) => inner.non_empty_field(segment.as_ref())?,
                _ => return None,
            };
        }
        Some(current)
    }

    fn non_empty_field(&self, segment: &str) -> Option<&Value> {
        if segment.is_empty() {
            return None;
        }
        self.fields.get(segment)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns a mutable reference to all fields.
    pub fn fields_mut(&mut self) -> &mut HashMap<String, Value> {
        &mut self.fields
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    // =========================================================================
    // Typed getters
    //
    // Return Err if field is missing or wrong type.
    // Return Ok(None) only if the field exists and is Value::Null.
    // =========================================================================

    /// Gets a string field value.
    pub fn get_string(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(&self.entity_name, field)),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(FieldError::type_mismatch(
                &self.entity_name,
                field,
                "string",
                other.type_name(),
            )),
        }
    }

    /// Gets a boolean field value.
    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(&self.entity_name, field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(FieldError::type_mismatch(
                &self.entity_name,
                field,
                "bool",
                other.type_name(),
            )),
        }
    }

    /// Gets an integer field value.
    pub fn get_int(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(&self.entity_name, field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Int(n)) => Ok(Some(*n)),
            Some(other) => Err(FieldError::type_mismatch(
                &self.entity_name,
                field,
                "int",
                other.type_name(),
            )),
        }
    }

    /// Gets any numeric field value as `f64`.
    pub fn get_number(&self, field: &str) -> Result<Option<f64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(&self.entity_name, field)),
            Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_number()
                .map(Some)
                .ok_or_else(|| {
                    FieldError::type_mismatch(&self.entity_name, field, "number", value.type_name())
                }),
        }
    }

    /// Gets a Decimal field value.
    pub fn get_decimal(&self, field: &str) -> Result<Option<Decimal>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(&self.entity_name, field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Decimal(d)) => Ok(Some(*d)),
            Some(Value::Int(n)) => Ok(Some(Decimal::from(*n))), // Allow widening
            Some(other) => Err(FieldError::type_mismatch(
                &self.entity_name,
                field,
                "decimal",
                other.type_name(),
            )),
        }
    }

    /// Gets a date field value.
    pub fn get_date(&self, field: &str) -> Result<Option<NaiveDate>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(&self.entity_name, field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Date(d)) => Ok(Some(*d)),
            Some(other) => Err(FieldError::type_mismatch(
                &self.entity_name,
                field,
                "date",
                other.type_name(),
            )),
        }
    }

    /// Gets a DateTime field value.
    pub fn get_datetime(&self, field: &str) -> Result<Option<DateTime<Utc>>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(&self.entity_name, field)),
            Some(Value::Null) => Ok(None),
            Some(Value::DateTime(dt)) => Ok(Some(*dt)),
            Some(other) => Err(FieldError::type_mismatch(
                &self.entity_name,
                field,
                "datetime",
                other.type_name(),
            )),
        }
    }

    /// Gets a list field value.
    pub fn get_list(&self, field: &str) -> Result<Option<&[Value]>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(&self.entity_name, field)),
            Some(Value::Null) => Ok(None),
            Some(Value::List(items)) => Ok(Some(items)),
            Some(other) => Err(FieldError::type_mismatch(
                &self.entity_name,
                field,
                "list",
                other.type_name(),
            )),
        }
    }

    /// Gets a nested record field value.
    pub fn get_record(&self, field: &str) -> Result<Option<&Record>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(&self.entity_name, field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Record(r)) => Ok(Some(r.as_ref())),
            Some(other) => Err(FieldError::type_mismatch(
                &self.entity_name,
                field,
                "record",
                other.type_name(),
            )),
        }
    }
}
