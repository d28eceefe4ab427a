//! Errors from the typed getters on portal records

/// A typed read of a portal [`Record`](crate::model::Record) field failed.
///
/// Both variants carry the record's entity name, so a message such as
/// "project record has no field 'amount'" points at the listing payload
/// that was short of data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The portal payload for this record did not include the field.
    #[error("{entity} record has no field '{field}'")]
    Missing { entity: String, field: String },

    /// The payload included the field, but as a different kind of value,
    /// e.g. an amount sent as text.
    #[error("{entity} field '{field}' holds {actual}, expected {expected}")]
    TypeMismatch {
        entity: String,
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl FieldError {
    pub fn missing(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Missing {
            entity: entity.into(),
            field: field.into(),
        }
    }

    pub fn type_mismatch(
        entity: impl Into<String>,
        field: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            entity: entity.into(),
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Entity name of the record the read was made on.
    pub fn entity(&self) -> &str {
        match self {
            Self::Missing { entity, .. } | Self::TypeMismatch { entity, .. } => entity,
        }
    }

    /// Name of the field that could not be read.
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field, .. } | Self::TypeMismatch { field, .. } => field,
        }
    }
}
