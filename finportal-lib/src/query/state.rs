//! View state for a collection listing.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::config::ViewConfig;
use crate::model::Value;

/// Sort direction for ordering a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9, oldest first).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0, newest first).
    Desc,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// A sort key together with its direction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SortSpec {
    /// Field name (or dotted path) to sort by.
    pub key: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    /// Creates an ascending sort on a field.
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Creates a descending sort on a field.
    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// The mutable view parameters of one listing: search, filters, sort and
/// page.
///
/// `QueryState` is a plain value. It is compared by value to decide whether
/// a derived page is still current, so it carries nothing but the
/// parameters themselves. Mutation goes through [`StateStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub(crate) search_term: String,
    pub(crate) active_filters: BTreeMap<String, Value>,
    pub(crate) sort_key: Option<String>,
    pub(crate) sort_direction: SortDirection,
    pub(crate) page_index: usize,
    pub(crate) page_size: usize,
}

impl QueryState {
    /// Creates a state with no search, filters or sort on page 1.
    ///
    /// A page size of zero is clamped to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            search_term: String::new(),
            active_filters: BTreeMap::new(),
            sort_key: None,
            sort_direction: SortDirection::Asc,
            page_index: 1,
            page_size: page_size.max(1),
        }
    }

    /// Sets the search term (builder pattern).
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    /// Adds an active filter (builder pattern).
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.active_filters.insert(key.into(), value.into());
        self
    }

    /// Sets the sort key and direction (builder pattern).
    pub fn with_sort(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_key = Some(key.into());
        self.sort_direction = direction;
        self
    }

    /// Sets the 1-based page index (builder pattern). Zero is clamped to 1.
    pub fn with_page(mut self, page_index: usize) -> Self {
        self.page_index = page_index.max(1);
        self
    }

    /// Returns the current search term.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Returns the active filters keyed by field name.
    pub fn active_filters(&self) -> &BTreeMap<String, Value> {
        &self.active_filters
    }

    /// Returns the current sort key, if any.
    pub fn sort_key(&self) -> Option<&str> {
        self.sort_key.as_deref()
    }

    /// Returns the current sort direction.
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Returns the 1-based page index.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Returns the page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(ViewConfig::DEFAULT_PAGE_SIZE)
    }
}

/// Holds a [`QueryState`] and exposes the controlled mutators for it.
///
/// Every mutator that changes what is matched or how it is ordered resets
/// the page index to 1.
#[derive(Debug, Clone)]
pub struct StateStore {
    state: QueryState,
    wildcards: Vec<Value>,
    initial_filters: BTreeMap<String, Value>,
}

impl StateStore {
    /// Creates a store with the defaults from `config`.
    pub fn new(config: &ViewConfig) -> Self {
        let mut store = Self {
            state: QueryState::new(config.page_size),
            wildcards: config.wildcards.clone(),
            initial_filters: BTreeMap::new(),
        };
        store.initial_filters = config
            .initial_filters
            .iter()
            .filter(|(_, value)| !store.is_wildcard(value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        store.state.active_filters = store.initial_filters.clone();
        if let Some(sort) = &config.initial_sort {
            store.state.sort_key = Some(sort.key.clone());
            store.state.sort_direction = sort.direction;
        }
        store
    }

    /// Returns the current state.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Returns `true` if `value` is a configured "no constraint" sentinel.
    pub fn is_wildcard(&self, value: &Value) -> bool {
        self.wildcards.iter().any(|wildcard| wildcard.strict_eq(value))
    }

    /// Sets the search term. An empty term clears the search.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
        self.state.page_index = 1;
    }

    /// Sets one filter. A wildcard value removes the filter instead.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if self.is_wildcard(&value) {
            self.state.active_filters.remove(&key);
        } else {
            self.state.active_filters.insert(key, value);
        }
        self.state.page_index = 1;
    }

    /// Removes one filter.
    pub fn remove_filter(&mut self, key: &str) {
        self.state.active_filters.remove(key);
        self.state.page_index = 1;
    }

    /// Restores the configured initial filters and clears the search term.
    pub fn clear_filters(&mut self) {
        self.state.active_filters = self.initial_filters.clone();
        self.state.search_term.clear();
        self.state.page_index = 1;
    }

    /// Sorts by `key`, toggling the direction when it is already the sort
    /// key and starting ascending otherwise.
    pub fn set_sort(&mut self, key: impl Into<String>) {
        let key = key.into();
        if self.state.sort_key.as_deref() == Some(key.as_str()) {
            self.state.sort_direction = self.state.sort_direction.toggled();
        } else {
            self.state.sort_key = Some(key);
            self.state.sort_direction = SortDirection::Asc;
        }
        self.state.page_index = 1;
    }

    /// Sorts by `key` in an explicit direction.
    pub fn set_sort_direction(&mut self, key: impl Into<String>, direction: SortDirection) {
        self.state.sort_key = Some(key.into());
        self.state.sort_direction = direction;
        self.state.page_index = 1;
    }

    /// Drops the sort key, restoring input order.
    pub fn clear_sort(&mut self) {
        self.state.sort_key = None;
        self.state.sort_direction = SortDirection::Asc;
        self.state.page_index = 1;
    }

    /// Sets the page index, clamped to `[1, total_pages]`.
    pub fn set_page_index(&mut self, page_index: usize, total_pages: usize) {
        self.state.page_index = page_index.clamp(1, total_pages.max(1));
    }

    /// Sets the page size (zero is clamped to 1) and returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.state.page_size = page_size.max(1);
        self.state.page_index = 1;
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(&ViewConfig::default())
    }
}
