//! Listing configuration

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::model::Value;
use crate::query::SortDirection;
use crate::query::SortSpec;

/// Configuration for one collection listing.
///
/// Controls the page size, which filter values mean "no constraint", and
/// the filters and sort a listing starts with.
///
/// # Example
///
/// ```
/// use finportal_lib::ViewConfig;
/// use finportal_lib::query::SortDirection;
///
/// let config = ViewConfig::default()
///     .with_page_size(25)
///     .with_initial_filter("status", "active")
///     .with_initial_sort("approved_on", SortDirection::Desc);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Rows per page.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Filter values that remove the filter instead of constraining it.
    ///
    /// Default: `""` and `"All"`
    pub wildcards: Vec<Value>,

    /// Label of the leading "no constraint" option in facet listings.
    ///
    /// Default: `"All"`
    pub all_label: String,

    /// Filters applied on creation and restored by `clear_filters`.
    ///
    /// Default: none
    pub initial_filters: BTreeMap<String, Value>,

    /// Sort applied on creation.
    ///
    /// Default: none (input order)
    pub initial_sort: Option<SortSpec>,

    /// Number of page links shown around the current page.
    ///
    /// Default: 5
    pub page_window: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: Self::DEFAULT_PAGE_SIZE,
            wildcards: vec![Value::from(""), Value::from("All")],
            all_label: "All".to_string(),
            initial_filters: BTreeMap::new(),
            initial_sort: None,
            page_window: 5,
        }
    }
}

impl ViewConfig {
    /// Page size used when none is configured.
    pub const DEFAULT_PAGE_SIZE: usize = 10;

    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config from JSON. Missing keys take their defaults.
    ///
    /// ```
    /// use finportal_lib::ViewConfig;
    ///
    /// let config = ViewConfig::from_json(r#"{
    ///     "page_size": 20,
    ///     "initial_sort": {"key": "name", "direction": "desc"}
    /// }"#).unwrap();
    /// assert_eq!(config.page_size, 20);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ViewConfig = serde_json::from_str(json)?;
        if config.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(config)
    }

    /// Sets the page size. Zero is clamped to 1.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Replaces the wildcard filter values.
    pub fn with_wildcards(mut self, wildcards: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        self.wildcards = wildcards.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the label of the "no constraint" facet option.
    pub fn with_all_label(mut self, label: impl Into<String>) -> Self {
        self.all_label = label.into();
        self
    }

    /// Adds an initial filter.
    pub fn with_initial_filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.initial_filters.insert(key.into(), value.into());
        self
    }

    /// Sets the initial sort.
    pub fn with_initial_sort(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.initial_sort = Some(SortSpec {
            key: key.into(),
            direction,
        });
        self
    }

    /// Sets how many page links a pagination control shows.
    pub fn with_page_window(mut self, page_window: usize) -> Self {
        self.page_window = page_window;
        self
    }
}
