//! Integration tests for the collection view binding and the query pipeline.

use finportal_lib::CollectionView;
use finportal_lib::ViewConfig;
use finportal_lib::model::Record;
use finportal_lib::model::Value;
use finportal_lib::query;
use finportal_lib::query::FieldDescriptor;
use finportal_lib::query::QueryState;
use finportal_lib::query::SortDirection;

fn funds() -> Vec<Record> {
    vec![
        Record::new("fund").set("name", "Alpha").set("amount", 10).set("type", "grant"),
        Record::new("fund").set("name", "Beta").set("amount", 5).set("type", "loan"),
        Record::new("fund").set("name", "Gamma").set("amount", 5).set("type", "grant"),
    ]
}

fn fund_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::direct("name").searchable().sortable(),
        FieldDescriptor::direct("amount").sortable(),
        FieldDescriptor::direct("type"),
    ]
}

fn names(records: &[Record]) -> Vec<&str> {
    records
        .iter()
        .map(|r| r.get_string("name").unwrap().unwrap())
        .collect()
}

fn projects(count: usize) -> Vec<Record> {
    let sectors = ["water", "energy", "health", "transport"];
    (0..count)
        .map(|n| {
            Record::with_id("project", format!("p-{n}"))
                .set("seq", n as i64)
                .set("name", format!("Project {n:03}"))
                .set("amount", (n % 7) as i64 * 1000)
                .set("sector", sectors[n % sectors.len()])
        })
        .collect()
}

fn project_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::direct("name").searchable().sortable(),
        FieldDescriptor::direct("sector").searchable(),
        FieldDescriptor::direct("amount").sortable(),
    ]
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_scenario_sort_ascending_is_stable() {
    let mut view = CollectionView::new(funds(), fund_fields(), ViewConfig::default());
    view.set_sort("amount");
    assert_eq!(names(view.records()), vec!["Beta", "Gamma", "Alpha"]);
}

#[test]
fn test_scenario_search() {
    let mut view = CollectionView::new(funds(), fund_fields(), ViewConfig::default());
    view.set_search_term("alp");
    assert_eq!(names(view.records()), vec!["Alpha"]);
    assert_eq!(view.total_filtered_count(), 1);
}

#[test]
fn test_scenario_second_page() {
    let mut view = CollectionView::new(
        funds(),
        fund_fields(),
        ViewConfig::default().with_page_size(2),
    );
    view.set_page_index(2);
    assert_eq!(view.records().len(), 1);
    assert_eq!(view.total_pages(), 2);
}

#[test]
fn test_scenario_wildcard_filter() {
    let mut view = CollectionView::new(funds(), fund_fields(), ViewConfig::default());
    view.set_filter("type", "All");
    assert_eq!(view.total_filtered_count(), 3);
    assert!(view.active_filters().is_empty());
}

#[test]
fn test_scenario_empty_record_set() {
    let view = CollectionView::new(Vec::<Record>::new(), fund_fields(), ViewConfig::default());
    assert_eq!(view.total_filtered_count(), 0);
    assert_eq!(view.total_pages(), 1);
    assert!(view.view().is_empty());
    assert_eq!(view.page_index(), 1);
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_no_search_or_filters_keeps_every_record() {
    let records = projects(37);
    let matched = query::matching(&records, &project_fields(), &QueryState::default());
    assert_eq!(matched.len(), records.len());
}

#[test]
fn test_mutators_reset_page_index() {
    let mut view = CollectionView::new(projects(60), project_fields(), ViewConfig::default());

    view.set_page_index(4);
    view.set_search_term("project");
    assert_eq!(view.page_index(), 1);

    view.set_page_index(4);
    view.set_filter("sector", "water");
    assert_eq!(view.page_index(), 1);

    view.set_page_index(2);
    view.set_sort("amount");
    assert_eq!(view.page_index(), 1);
}

#[test]
fn test_sort_is_stable_in_both_directions() {
    let records = projects(40);
    let fields = project_fields();

    for direction in [SortDirection::Asc, SortDirection::Desc] {
        let state = QueryState::new(100).with_sort("amount", direction);
        let sorted = query::run(&records, &fields, &state);
        for pair in sorted.records().windows(2) {
            let a = pair[0].get_int("amount").unwrap().unwrap();
            let b = pair[1].get_int("amount").unwrap().unwrap();
            if a == b {
                let first = pair[0].get_int("seq").unwrap();
                let second = pair[1].get_int("seq").unwrap();
                assert!(first < second, "equal keys must keep input order");
            }
        }
    }
}

#[test]
fn test_run_is_idempotent() {
    let records = projects(30);
    let fields = project_fields();
    let state = QueryState::new(7)
        .with_search("project 01")
        .with_sort("name", SortDirection::Desc)
        .with_page(2);
    assert_eq!(
        query::run(&records, &fields, &state),
        query::run(&records, &fields, &state)
    );
}

#[test]
fn test_pages_partition_the_sorted_listing() {
    let records = projects(23);
    let fields = project_fields();
    let base = QueryState::new(5)
        .with_filter("sector", "energy")
        .with_sort("amount", SortDirection::Desc);

    let expected: Vec<Record> = query::select(&records, &fields, &base)
        .into_iter()
        .cloned()
        .collect();
    let total_pages = query::run(&records, &fields, &base).total_pages();

    let mut concatenated = Vec::new();
    for page in 1..=total_pages {
        let view = query::run(&records, &fields, &base.clone().with_page(page));
        assert!(view.len() <= 5);
        concatenated.extend(view.into_records());
    }
    assert_eq!(concatenated, expected);
}

// =============================================================================
// Binding
// =============================================================================

#[test]
fn test_memo_skips_unchanged_inputs() {
    let mut view = CollectionView::new(projects(12), project_fields(), ViewConfig::default());
    let before = view.generation();

    view.set_filter("sector", "All");
    view.first_page();
    assert_eq!(view.generation(), before);

    view.set_filter("sector", "water");
    assert_eq!(view.generation(), before + 1);
}

#[test]
fn test_set_records_resets_page_only_when_past_end() {
    let mut view = CollectionView::new(projects(45), project_fields(), ViewConfig::default());
    view.set_page_index(4);

    view.set_records(projects(35));
    assert_eq!(view.page_index(), 4);

    view.set_records(projects(15));
    assert_eq!(view.page_index(), 1);
    assert_eq!(view.view().first_item(), 1);
    assert_eq!(view.view().last_item(), 10);
    assert_eq!(view.records()[0].id(), Some("p-0"));
}

#[test]
fn test_set_fields_resets_page_when_past_end() {
    let mut view = CollectionView::new(projects(30), project_fields(), ViewConfig::default());
    view.set_search_term("project");
    view.set_page_index(3);
    assert_eq!(view.page_index(), 3);

    // Without a searchable name only the sector field is searched
    view.set_fields(vec![
        FieldDescriptor::direct("name").sortable(),
        FieldDescriptor::direct("sector").searchable(),
    ]);
    assert_eq!(view.total_filtered_count(), 0);
    assert_eq!(view.page_index(), 1);
    assert_eq!(view.search_term(), "project");
}

#[test]
fn test_clear_filters_restores_initial_filters() {
    let config = ViewConfig::default().with_initial_filter("sector", "health");
    let mut view = CollectionView::new(projects(20), project_fields(), config);
    assert_eq!(view.total_filtered_count(), 5);

    view.set_filter("sector", "water");
    view.set_search_term("project 00");
    view.clear_filters();

    assert_eq!(view.search_term(), "");
    assert_eq!(
        view.active_filters().get("sector"),
        Some(&Value::from("health"))
    );
    assert_eq!(view.total_filtered_count(), 5);
}

#[test]
fn test_initial_sort_from_config() {
    let config = ViewConfig::default().with_initial_sort("amount", SortDirection::Desc);
    let view = CollectionView::new(funds(), fund_fields(), config);
    assert_eq!(view.sort_key(), Some("amount"));
    assert_eq!(names(view.records()), vec!["Alpha", "Beta", "Gamma"]);
}

#[test]
fn test_sort_by_path_and_derived_fields() {
    let records = vec![
        Record::new("project")
            .set("name", "Reef")
            .set("agency", Record::new("agency").set("name", "Marine Office"))
            .set("sectors", vec!["water", "tourism", "fisheries"]),
        Record::new("project")
            .set("name", "Grid")
            .set("agency", Record::new("agency").set("name", "energy authority"))
            .set("sectors", vec!["energy"]),
        Record::new("project").set("name", "Orphan"),
    ];
    let fields = vec![
        FieldDescriptor::direct("name").searchable(),
        FieldDescriptor::path("agency.name").searchable().sortable(),
        FieldDescriptor::derived("sector_count", |r| {
            r.get_list("sectors")
                .ok()
                .flatten()
                .map(|s| Value::from(s.len() as i64))
        })
        .sortable(),
    ];
    let mut view = CollectionView::new(records, fields, ViewConfig::default());

    view.set_sort("agency.name");
    assert_eq!(names(view.records()), vec!["Orphan", "Grid", "Reef"]);

    view.set_sort_direction("sector_count", SortDirection::Desc);
    assert_eq!(names(view.records()), vec!["Reef", "Grid", "Orphan"]);

    view.set_search_term("MARINE");
    assert_eq!(names(view.records()), vec!["Reef"]);
}

#[test]
fn test_sort_dates_chronologically() {
    let records = vec![
        Record::new("disbursement").set("name", "March").set("on", "2023-03-01"),
        Record::new("disbursement").set("name", "Late").set("on", "2023-11-20T08:00:00Z"),
        Record::new("disbursement").set("name", "January").set("on", "2023-01-15"),
    ];
    let fields = vec![FieldDescriptor::direct("on").sortable()];
    let mut view = CollectionView::new(records, fields, ViewConfig::default());
    view.set_sort("on");
    assert_eq!(names(view.records()), vec!["January", "March", "Late"]);
}

#[test]
fn test_sort_numbers_mixed_with_text() {
    let records = vec![
        Record::new("fund").set("name", "Ten").set("amount", 10),
        Record::new("fund").set("name", "Five").set("amount", 5),
        Record::new("fund").set("name", "TBD").set("amount", "n/a"),
        Record::new("fund").set("name", "Unset"),
    ];
    let mut view = CollectionView::new(records, fund_fields(), ViewConfig::default());

    view.set_sort("amount");
    assert_eq!(names(view.records()), vec!["Unset", "Five", "Ten", "TBD"]);

    view.set_sort("amount");
    assert_eq!(names(view.records()), vec!["TBD", "Ten", "Five", "Unset"]);
}

#[test]
fn test_sort_numbers_mixed_with_dates() {
    let records = vec![
        Record::new("tranche").set("name", "Late").set("due", "2024-05-01"),
        Record::new("tranche").set("name", "Hundred").set("due", 100),
        Record::new("tranche").set("name", "Early").set("due", "2021-02-10"),
        Record::new("tranche").set("name", "Nine").set("due", 9.5),
    ];
    let fields = vec![FieldDescriptor::direct("due").sortable()];
    let mut view = CollectionView::new(records, fields, ViewConfig::default());

    view.set_sort("due");
    assert_eq!(names(view.records()), vec!["Nine", "Hundred", "Early", "Late"]);
}

#[test]
fn test_search_term_whitespace_is_significant() {
    let mut view = CollectionView::new(funds(), fund_fields(), ViewConfig::default());

    view.set_search_term("alp ");
    assert_eq!(view.total_filtered_count(), 0);

    view.set_search_term(" ");
    assert_eq!(view.total_filtered_count(), 0);

    view.set_search_term("alp");
    assert_eq!(names(view.records()), vec!["Alpha"]);
}

#[test]
fn test_paginate_page_zero_is_empty() {
    let records = funds();
    let refs: Vec<&Record> = records.iter().collect();

    let page = query::paginate(&refs, 0, 2);
    assert!(page.is_empty());
    assert_eq!(page.first_item(), 0);
    assert_eq!(page.last_item(), 0);
    assert_eq!(page.total_filtered_count(), 3);

    let page = query::paginate(&refs, 1, 2);
    assert_eq!(names(page.records()), vec!["Alpha", "Beta"]);
}
