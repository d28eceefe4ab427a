//! Binding between a record set, its view state and the derived page.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::ViewConfig;
use crate::model::Record;
use crate::model::Value;
use crate::query;
use crate::query::DerivedView;
use crate::query::FieldDescriptor;
use crate::query::NumericTotal;
use crate::query::QueryState;
use crate::query::SortDirection;
use crate::query::StateStore;

/// Inputs the current [`DerivedView`] was computed from.
#[derive(Debug, Clone)]
struct Memo {
    records: Arc<[Record]>,
    fields: Arc<[FieldDescriptor]>,
    state: QueryState,
}

impl Memo {
    fn matches(
        &self,
        records: &Arc<[Record]>,
        fields: &Arc<[FieldDescriptor]>,
        state: &QueryState,
    ) -> bool {
        Arc::ptr_eq(&self.records, records)
            && Arc::ptr_eq(&self.fields, fields)
            && self.state == *state
    }
}

/// A client-side listing: the fetched records, the fields a listing shows,
/// the view state, and the page derived from them.
///
/// Every mutator recomputes the page before returning, so readers always
/// observe settled state. Recomputation is skipped when neither the record
/// set, the field descriptors nor the query state changed.
///
/// # Example
///
/// ```
/// use finportal_lib::CollectionView;
/// use finportal_lib::ViewConfig;
/// use finportal_lib::model::Record;
/// use finportal_lib::query::FieldDescriptor;
///
/// let records = vec![
///     Record::new("fund").set("name", "Alpha").set("amount", 10).set("type", "grant"),
///     Record::new("fund").set("name", "Beta").set("amount", 5).set("type", "loan"),
///     Record::new("fund").set("name", "Gamma").set("amount", 5).set("type", "grant"),
/// ];
/// let fields = vec![
///     FieldDescriptor::direct("name").searchable().sortable(),
///     FieldDescriptor::direct("amount").sortable(),
/// ];
/// let mut view = CollectionView::new(records, fields, ViewConfig::default().with_page_size(2));
///
/// view.set_sort("amount");
/// let names: Vec<_> = view
///     .records()
///     .iter()
///     .map(|r| r.get_string("name").unwrap().unwrap())
///     .collect();
/// assert_eq!(names, ["Beta", "Gamma"]);
/// assert_eq!(view.total_pages(), 2);
///
/// view.set_filter("type", "grant");
/// assert_eq!(view.total_filtered_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CollectionView {
    records: Arc<[Record]>,
    fields: Arc<[FieldDescriptor]>,
    store: StateStore,
    all_label: String,
    page_window: usize,
    memo: Memo,
    view: DerivedView,
    generation: u64,
}

impl CollectionView {
    /// Creates a listing over `records` with the state defaults from
    /// `config`.
    pub fn new(
        records: impl Into<Arc<[Record]>>,
        fields: impl Into<Arc<[FieldDescriptor]>>,
        config: ViewConfig,
    ) -> Self {
        let records = records.into();
        let fields = fields.into();
        let mut store = StateStore::new(&config);
        let (state, view) = derive(&records, &fields, store.state().clone());
        store.set_page_index(state.page_index(), view.total_pages());

        Self {
            memo: Memo {
                records: Arc::clone(&records),
                fields: Arc::clone(&fields),
                state,
            },
            records,
            fields,
            store,
            all_label: config.all_label,
            page_window: config.page_window,
            view,
            generation: 0,
        }
    }

    // =========================================================================
    // Recompute
    // =========================================================================

    fn recompute(&mut self) {
        if self.memo.matches(&self.records, &self.fields, self.store.state()) {
            log::trace!("collection view: inputs unchanged, reusing page");
            return;
        }

        let (state, view) = derive(&self.records, &self.fields, self.store.state().clone());
        self.store.set_page_index(state.page_index(), view.total_pages());
        log::debug!(
            "collection view: {} of {} records match, page {}/{}",
            view.total_filtered_count(),
            self.records.len(),
            view.page_index(),
            view.total_pages()
        );

        self.memo = Memo {
            records: Arc::clone(&self.records),
            fields: Arc::clone(&self.fields),
            state,
        };
        self.view = view;
        self.generation += 1;
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Sets the search term and returns to page 1. An empty term clears the
    /// search.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.store.set_search_term(term);
        self.recompute();
    }

    /// Sets one filter and returns to page 1. A wildcard value such as
    /// `"All"` removes the filter.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.store.set_filter(key, value);
        self.recompute();
    }

    /// Removes one filter and returns to page 1.
    pub fn remove_filter(&mut self, key: &str) {
        self.store.remove_filter(key);
        self.recompute();
    }

    /// Restores the initial filters, clears the search and returns to page 1.
    pub fn clear_filters(&mut self) {
        self.store.clear_filters();
        self.recompute();
    }

    /// Sorts by `key`; sorting by the current key again flips the direction.
    pub fn set_sort(&mut self, key: impl Into<String>) {
        self.store.set_sort(key);
        self.recompute();
    }

    /// Sorts by `key` in `direction`.
    pub fn set_sort_direction(&mut self, key: impl Into<String>, direction: SortDirection) {
        self.store.set_sort_direction(key, direction);
        self.recompute();
    }

    /// Restores input order.
    pub fn clear_sort(&mut self) {
        self.store.clear_sort();
        self.recompute();
    }

    /// Moves to page `page_index`, clamped to the pages of the current view.
    pub fn set_page_index(&mut self, page_index: usize) {
        self.store.set_page_index(page_index, self.view.total_pages());
        self.recompute();
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.store.set_page_size(page_size);
        self.recompute();
    }

    /// Moves to the next page, if there is one.
    pub fn next_page(&mut self) {
        self.set_page_index(self.page_index().saturating_add(1));
    }

    /// Moves to the previous page, if there is one.
    pub fn previous_page(&mut self) {
        self.set_page_index(self.page_index().saturating_sub(1));
    }

    /// Moves to page 1.
    pub fn first_page(&mut self) {
        self.set_page_index(1);
    }

    /// Moves to the last page.
    pub fn last_page(&mut self) {
        self.set_page_index(self.total_pages());
    }

    /// Replaces the record set, e.g. after a refetch.
    ///
    /// The view state is kept. The page index only changes when the current
    /// page would come out empty, in which case it resets to 1.
    pub fn set_records(&mut self, records: impl Into<Arc<[Record]>>) {
        self.records = records.into();
        self.recompute();
    }

    /// Replaces the field descriptors. The view state is kept, with the same
    /// page rule as [`set_records`](Self::set_records).
    pub fn set_fields(&mut self, fields: impl Into<Arc<[FieldDescriptor]>>) {
        self.fields = fields.into();
        self.recompute();
    }

    // =========================================================================
    // Readers
    // =========================================================================

    /// Returns the current page.
    pub fn view(&self) -> &DerivedView {
        &self.view
    }

    /// Returns the records on the current page.
    pub fn records(&self) -> &[Record] {
        self.view.records()
    }

    /// Returns the full record set.
    pub fn all_records(&self) -> &Arc<[Record]> {
        &self.records
    }

    /// Returns the field descriptors.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the number of records that pass search and filters.
    pub fn total_filtered_count(&self) -> usize {
        self.view.total_filtered_count()
    }

    /// Returns the number of pages; at least 1.
    pub fn total_pages(&self) -> usize {
        self.view.total_pages()
    }

    /// Returns the current view state.
    pub fn state(&self) -> &QueryState {
        self.store.state()
    }

    /// Returns the 1-based page index.
    pub fn page_index(&self) -> usize {
        self.store.state().page_index()
    }

    /// Returns the page size.
    pub fn page_size(&self) -> usize {
        self.store.state().page_size()
    }

    /// Returns the search term.
    pub fn search_term(&self) -> &str {
        self.store.state().search_term()
    }

    /// Returns the active filters.
    pub fn active_filters(&self) -> &BTreeMap<String, Value> {
        self.store.state().active_filters()
    }

    /// Returns the sort key, if any.
    pub fn sort_key(&self) -> Option<&str> {
        self.store.state().sort_key()
    }

    /// Returns the sort direction.
    pub fn sort_direction(&self) -> SortDirection {
        self.store.state().sort_direction()
    }

    /// Returns `true` if the listing can be sorted by `key`.
    pub fn is_sortable(&self, key: &str) -> bool {
        self.fields
            .iter()
            .any(|field| field.name() == key && field.is_sortable())
    }

    /// Page numbers for a pagination control, using the configured window.
    pub fn page_numbers(&self) -> Vec<usize> {
        self.view.page_numbers(self.page_window)
    }

    /// Counter bumped every time the page is recomputed. Unchanged inputs
    /// leave it as is.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Options for a filter dropdown on `key`: the configured "all" label
    /// followed by the distinct values across the full record set.
    pub fn facet_options(&self, key: &str) -> Vec<Value> {
        let accessor = query::accessor_for(&self.fields, key);
        let mut options = vec![Value::from(self.all_label.as_str())];
        options.extend(query::distinct_values(self.records.iter(), &accessor));
        options
    }

    /// Sums the numeric values of `key` across every record that passes the
    /// current search and filters.
    pub fn totals(&self, key: &str) -> NumericTotal {
        let accessor = query::accessor_for(&self.fields, key);
        let matched = query::matching(&self.records, &self.fields, self.store.state());
        query::numeric_total(matched, &accessor)
    }
}

/// Runs the pipeline, resetting a page index that falls past the end to the
/// first page.
fn derive(
    records: &[Record],
    fields: &[FieldDescriptor],
    mut state: QueryState,
) -> (QueryState, DerivedView) {
    let selected = query::select(records, fields, &state);
    let total_pages = query::total_pages(selected.len(), state.page_size());
    if state.page_index() > total_pages {
        state.page_index = 1;
    }
    let view = query::paginate(&selected, state.page_index(), state.page_size());
    (state, view)
}
