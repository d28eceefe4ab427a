//! Integration tests for listings loaded from portal API payloads.

use std::str::FromStr;

use chrono::NaiveDate;
use finportal_lib::CollectionView;
use finportal_lib::ViewConfig;
use finportal_lib::model::Record;
use finportal_lib::model::Value;
use finportal_lib::query::FieldDescriptor;
use rust_decimal::Decimal;

const PROJECTS: &str = r#"[
    {
        "@entity": "project",
        "id": 101,
        "name": "Mangrove restoration",
        "status": "active",
        "amount": 1500000,
        "approved_on": "2022-06-14",
        "sectors": ["water", "biodiversity"],
        "agency": {"@entity": "agency", "id": "ag-1", "name": "Coastal Authority"}
    },
    {
        "@entity": "project",
        "id": 102,
        "name": "Solar mini-grids",
        "status": "active",
        "amount": 250000.5,
        "approved_on": "2023-02-01",
        "sectors": ["energy"],
        "agency": {"@entity": "agency", "id": "ag-2", "name": "Energy Office"}
    },
    {
        "@entity": "project",
        "id": 103,
        "name": "Early warning systems",
        "status": "closed",
        "amount": 730000,
        "approved_on": "2021-09-30",
        "sectors": ["disaster risk", "water"],
        "agency": null
    },
    {
        "@entity": "project",
        "id": 104,
        "name": "Seawall feasibility",
        "status": "pipeline",
        "amount": null,
        "approved_on": null,
        "sectors": []
    }
]"#;

fn fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::direct("name").searchable().sortable(),
        FieldDescriptor::path("agency.name")
            .with_label("Agency")
            .searchable()
            .sortable(),
        FieldDescriptor::direct("sectors").searchable(),
        FieldDescriptor::direct("amount").sortable(),
        FieldDescriptor::direct("approved_on").sortable(),
    ]
}

fn listing(config: ViewConfig) -> CollectionView {
    let records = Record::list_from_json(PROJECTS).unwrap();
    CollectionView::new(records, fields(), config)
}

fn ids(view: &CollectionView) -> Vec<&str> {
    view.records().iter().filter_map(Record::id).collect()
}

#[test]
fn test_payload_decodes_into_records() {
    let records = Record::list_from_json(PROJECTS).unwrap();
    assert_eq!(records.len(), 4);

    let first = &records[0];
    assert_eq!(first.entity_name(), "project");
    assert_eq!(first.id(), Some("101"));
    assert_eq!(
        first.get_date("approved_on").unwrap(),
        NaiveDate::from_ymd_opt(2022, 6, 14)
    );
    assert_eq!(
        first.get_path("agency.name"),
        Some(&Value::from("Coastal Authority"))
    );
    assert_eq!(first.get_list("sectors").unwrap().map(<[Value]>::len), Some(2));
}

#[test]
fn test_search_reaches_nested_and_list_fields() {
    let mut view = listing(ViewConfig::default());

    view.set_search_term("energy office");
    assert_eq!(ids(&view), vec!["102"]);

    view.set_search_term("WATER");
    assert_eq!(ids(&view), vec!["101", "103"]);
}

#[test]
fn test_sort_by_date_puts_missing_first() {
    let mut view = listing(ViewConfig::default());
    view.set_sort("approved_on");
    assert_eq!(ids(&view), vec!["104", "103", "101", "102"]);

    view.set_sort("approved_on");
    assert_eq!(ids(&view), vec!["102", "101", "103", "104"]);
}

#[test]
fn test_sort_mixed_int_and_float_amounts_numerically() {
    let mut view = listing(ViewConfig::default());
    view.set_sort("amount");
    assert_eq!(ids(&view), vec!["104", "102", "103", "101"]);
}

#[test]
fn test_filter_by_date_value() {
    let mut view = listing(ViewConfig::default());
    view.set_filter("approved_on", NaiveDate::from_ymd_opt(2023, 2, 1).unwrap());
    assert_eq!(ids(&view), vec!["102"]);

    view.set_filter("approved_on", "2023-02-01");
    assert!(view.view().is_empty());
}

#[test]
fn test_facet_options_cover_full_set() {
    let mut view = listing(ViewConfig::default());
    view.set_filter("status", "closed");

    assert_eq!(
        view.facet_options("status"),
        vec![
            Value::from("All"),
            Value::from("active"),
            Value::from("closed"),
            Value::from("pipeline"),
        ]
    );
    assert_eq!(
        view.facet_options("sectors"),
        vec![
            Value::from("All"),
            Value::from("water"),
            Value::from("biodiversity"),
            Value::from("energy"),
            Value::from("disaster risk"),
        ]
    );
}

#[test]
fn test_facet_options_use_configured_label() {
    let view = listing(ViewConfig::default().with_all_label("Any status"));
    assert_eq!(view.facet_options("status")[0], Value::from("Any status"));
}

#[test]
fn test_totals_follow_filters() {
    let mut view = listing(ViewConfig::default());

    let all = view.totals("amount");
    assert_eq!(all.count, 3);
    assert_eq!(all.sum, Decimal::from_str("2480000.5").unwrap());

    view.set_filter("status", "active");
    let active = view.totals("amount");
    assert_eq!(active.count, 2);
    assert_eq!(active.sum, Decimal::from_str("1750000.5").unwrap());
}

#[test]
fn test_view_config_from_json() {
    let config = ViewConfig::from_json(
        r#"{
            "page_size": 2,
            "initial_filters": {"status": "active"},
            "initial_sort": {"key": "amount", "direction": "desc"}
        }"#,
    )
    .unwrap();
    let view = listing(config);

    assert_eq!(view.total_filtered_count(), 2);
    assert_eq!(ids(&view), vec!["101", "102"]);
}

#[test]
fn test_records_round_trip_through_json() {
    let records = Record::list_from_json(PROJECTS).unwrap();
    let json = serde_json::to_string(&records).unwrap();
    let decoded = Record::list_from_json(&json).unwrap();
    assert_eq!(decoded[1].get("name"), records[1].get("name"));
    assert_eq!(decoded[1].get_path("agency.name"), records[1].get_path("agency.name"));
}
