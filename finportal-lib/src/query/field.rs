//! Field descriptors: how a listing reads one field of a record.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::model::Record;
use crate::model::Value;

/// A computed accessor for derived fields.
pub type AccessorFn = Arc<dyn Fn(&Record) -> Option<Value> + Send + Sync>;

/// How a field's value is read from a record.
///
/// The variant is chosen once when the descriptor is built; resolving a
/// record never re-inspects the field name.
#[derive(Clone)]
pub enum Accessor {
    /// Plain field lookup by name.
    Direct(String),
    /// Dotted path through nested records, pre-split into segments.
    Path(Vec<String>),
    /// Explicit accessor function for computed values.
    Derived(AccessorFn),
}

impl Accessor {
    /// Chooses `Path` for dotted keys and `Direct` otherwise.
    pub fn parse(key: &str) -> Self {
        if key.contains('.') {
            Accessor::Path(key.split('.').map(str::to_string).collect())
        } else {
            Accessor::Direct(key.to_string())
        }
    }

    /// Resolves the value for `record`. Missing fields and broken paths
    /// resolve to `None`.
    pub fn resolve<'a>(&self, record: &'a Record) -> Option<Cow<'a, Value>> {
        match self {
            Accessor::Direct(name) => record.get(name).map(Cow::Borrowed),
            Accessor::Path(segments) => record.get_segments(segments).map(Cow::Borrowed),
            Accessor::Derived(f) => f(record).map(Cow::Owned),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Direct(name) => f.debug_tuple("Direct").field(name).finish(),
            Accessor::Path(segments) => f.debug_tuple("Path").field(&segments.join(".")).finish(),
            Accessor::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// Describes one field of a listing: its name, how to read it, and whether
/// it takes part in search and sorting.
///
/// # Example
///
/// ```
/// use finportal_lib::model::Value;
/// use finportal_lib::query::FieldDescriptor;
///
/// let fields = vec![
///     FieldDescriptor::direct("name").searchable().sortable(),
///     FieldDescriptor::path("agency.name").searchable().with_label("Agency"),
///     FieldDescriptor::derived("sector_count", |record| {
///         record.get_list("sectors").ok().flatten().map(|s| Value::from(s.len() as i64))
///     })
///     .sortable(),
/// ];
/// ```
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    label: Option<String>,
    accessor: Accessor,
    searchable: bool,
    sortable: bool,
}

impl FieldDescriptor {
    /// A field read by plain name lookup.
    pub fn direct(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::with_accessor(name.clone(), Accessor::Direct(name))
    }

    /// A field read through a dotted path; the path is also its name.
    pub fn path(path: impl Into<String>) -> Self {
        let path = path.into();
        let accessor = Accessor::Path(path.split('.').map(str::to_string).collect());
        Self::with_accessor(path, accessor)
    }

    /// A computed field.
    pub fn derived<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Record) -> Option<Value> + Send + Sync + 'static,
    {
        Self::with_accessor(name, Accessor::Derived(Arc::new(f)))
    }

    /// A field with an explicit accessor.
    pub fn with_accessor(name: impl Into<String>, accessor: Accessor) -> Self {
        Self {
            name: name.into(),
            label: None,
            accessor,
            searchable: false,
            sortable: false,
        }
    }

    /// Includes the field in free-text search.
    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Allows sorting by the field.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the display label, falling back to the name.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Returns the accessor.
    pub fn accessor(&self) -> &Accessor {
        &self.accessor
    }

    /// Returns `true` if the field takes part in search.
    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    /// Returns `true` if the listing may be sorted by the field.
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Resolves the field's value for `record`.
    pub fn resolve<'a>(&self, record: &'a Record) -> Option<Cow<'a, Value>> {
        self.accessor.resolve(record)
    }
}

/// Finds the accessor for `key`: the descriptor's accessor when one is named
/// `key`, otherwise a lookup of `key` itself.
pub(crate) fn accessor_for<'f>(fields: &'f [FieldDescriptor], key: &str) -> Cow<'f, Accessor> {
    match fields.iter().find(|field| field.name() == key) {
        Some(field) => Cow::Borrowed(field.accessor()),
        None => Cow::Owned(Accessor::parse(key)),
    }
}
