//! The query pipeline: search, filter, sort, paginate.
//!
//! Every stage is a pure function of its inputs and never fails. Records
//! flow through the stages by reference; only the final page is cloned.

use std::collections::BTreeMap;

use super::compare::SortKey;
use super::compare::compare_keys;
use super::field::FieldDescriptor;
use super::field::accessor_for;
use super::page::DerivedView;
use super::state::QueryState;
use super::state::SortDirection;
use crate::model::Record;
use crate::model::Value;

/// Derives the page described by `state` from `records`.
pub fn run(records: &[Record], fields: &[FieldDescriptor], state: &QueryState) -> DerivedView {
    let selected = select(records, fields, state);
    paginate(&selected, state.page_index(), state.page_size())
}

/// Runs search, filter and sort and returns every matching record in
/// display order.
pub fn select<'a>(
    records: &'a [Record],
    fields: &[FieldDescriptor],
    state: &QueryState,
) -> Vec<&'a Record> {
    let matched = matching(records, fields, state);
    sort(matched, fields, state.sort_key(), state.sort_direction())
}

/// Runs search and filter only, preserving input order.
pub fn matching<'a>(
    records: &'a [Record],
    fields: &[FieldDescriptor],
    state: &QueryState,
) -> Vec<&'a Record> {
    let searched = search(records.iter().collect(), fields, state.search_term());
    let filtered = filter(searched, fields, state.active_filters());
    log::trace!(
        "query pipeline: {} records, {} after filters",
        records.len(),
        filtered.len()
    );
    filtered
}

/// Keeps records where a searchable field contains `term`, ignoring case.
///
/// The term is matched as given, surrounding whitespace included. An empty
/// term keeps everything.
pub fn search<'a>(
    records: Vec<&'a Record>,
    fields: &[FieldDescriptor],
    term: &str,
) -> Vec<&'a Record> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return records;
    }

    let searchable: Vec<&FieldDescriptor> =
        fields.iter().filter(|field| field.is_searchable()).collect();

    records
        .into_iter()
        .filter(|record| {
            searchable.iter().any(|field| {
                field
                    .resolve(record)
                    .and_then(|value| value.search_text())
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
        })
        .collect()
}

/// Keeps records whose value at every filter key strictly equals the filter
/// value.
pub fn filter<'a>(
    records: Vec<&'a Record>,
    fields: &[FieldDescriptor],
    filters: &BTreeMap<String, Value>,
) -> Vec<&'a Record> {
    if filters.is_empty() {
        return records;
    }

    let constraints: Vec<_> = filters
        .iter()
        .map(|(key, expected)| (accessor_for(fields, key), expected))
        .collect();

    records
        .into_iter()
        .filter(|record| {
            constraints.iter().all(|(accessor, expected)| {
                accessor
                    .resolve(record)
                    .is_some_and(|value| value.strict_eq(expected))
            })
        })
        .collect()
}

/// Orders records by `key`. Without a key, or when the key names a field
/// that is not sortable, input order is kept.
///
/// The sort is stable in both directions: records with equal keys keep
/// their relative input order.
pub fn sort<'a>(
    records: Vec<&'a Record>,
    fields: &[FieldDescriptor],
    key: Option<&str>,
    direction: SortDirection,
) -> Vec<&'a Record> {
    let Some(key) = key else {
        return records;
    };
    if fields
        .iter()
        .any(|field| field.name() == key && !field.is_sortable())
    {
        log::trace!("query pipeline: '{key}' is not sortable, keeping input order");
        return records;
    }

    let accessor = accessor_for(fields, key);
    let mut keyed: Vec<_> = records
        .into_iter()
        .map(|record| (SortKey::from_value(accessor.resolve(record).as_deref()), record))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Asc => compare_keys(a, b),
        SortDirection::Desc => compare_keys(a, b).reverse(),
    });

    keyed.into_iter().map(|(_, record)| record).collect()
}

/// Slices one page out of `records`. An out-of-range page index, including
/// 0, yields an empty page.
pub fn paginate(records: &[&Record], page_index: usize, page_size: usize) -> DerivedView {
    let page_size = page_size.max(1);
    // Page indices are 1-based, so 0 is out of range like any index past the end
    let page: Vec<Record> = match page_index
        .checked_sub(1)
        .and_then(|index| index.checked_mul(page_size))
    {
        Some(start) => records
            .iter()
            .skip(start)
            .take(page_size)
            .map(|record| (*record).clone())
            .collect(),
        None => Vec::new(),
    };
    DerivedView::new(page, records.len(), page_index, page_size)
}
