//! Derived page of a listing.

use crate::model::Record;

/// One page of a listing, derived from a record set and a
/// [`QueryState`](super::QueryState).
///
/// A `DerivedView` is never edited in place; it is recomputed whenever its
/// inputs change.
///
/// # Example
///
/// ```
/// use finportal_lib::model::Record;
/// use finportal_lib::query::{self, QueryState};
///
/// let records: Vec<Record> = (1..=25)
///     .map(|n| Record::new("project").set("n", n as i64))
///     .collect();
/// let view = query::run(&records, &[], &QueryState::new(10).with_page(3));
///
/// assert_eq!(view.len(), 5);
/// assert_eq!(view.total_pages(), 3);
/// assert_eq!((view.first_item(), view.last_item()), (21, 25));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView {
    records: Vec<Record>,
    total_filtered_count: usize,
    total_pages: usize,
    page_index: usize,
    page_size: usize,
}

impl DerivedView {
    pub(crate) fn new(
        records: Vec<Record>,
        total_filtered_count: usize,
        page_index: usize,
        page_size: usize,
    ) -> Self {
        Self {
            records,
            total_filtered_count,
            total_pages: total_pages(total_filtered_count, page_size),
            page_index,
            page_size,
        }
    }

    /// Returns the records on this page.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the view and returns the page records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Returns the number of records that passed search and filters.
    pub fn total_filtered_count(&self) -> usize {
        self.total_filtered_count
    }

    /// Returns the number of pages; at least 1, even for an empty listing.
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Returns the 1-based index of this page.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Returns the page size the view was derived with.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the number of records on this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if this page has no records.
    ///
    /// For an empty listing this is the explicit "nothing to show" state,
    /// not an error.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `true` if there is a page before this one.
    pub fn has_previous(&self) -> bool {
        self.page_index > 1
    }

    /// Returns `true` if there is a page after this one.
    pub fn has_next(&self) -> bool {
        self.page_index < self.total_pages
    }

    /// 1-based position of the first record on this page within the
    /// filtered listing, or 0 for an empty page.
    pub fn first_item(&self) -> usize {
        if self.records.is_empty() {
            0
        } else {
            self.page_index.saturating_sub(1).saturating_mul(self.page_size) + 1
        }
    }

    /// 1-based position of the last record on this page, or 0 for an empty
    /// page.
    pub fn last_item(&self) -> usize {
        if self.records.is_empty() {
            0
        } else {
            self.first_item() + self.records.len() - 1
        }
    }

    /// Page numbers to show in a pagination control: up to `window`
    /// consecutive pages, centered on the current page where possible.
    pub fn page_numbers(&self, window: usize) -> Vec<usize> {
        let window = window.clamp(1, self.total_pages);
        let current = self.page_index.clamp(1, self.total_pages);
        let last_start = self.total_pages - window + 1;
        let start = current.saturating_sub(window / 2).clamp(1, last_start);
        (start..start + window).collect()
    }
}

/// `max(1, ceil(count / page_size))`.
pub(crate) fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}
