use std::fs::File;

use finportal_lib::CollectionView;
use finportal_lib::ViewConfig;
use finportal_lib::model::Record;
use finportal_lib::query::FieldDescriptor;
use finportal_lib::query::SortDirection;
use simplelog::{Config, LevelFilter, WriteLogger};

const PROJECTS: &str = r#"[
    {"@entity": "project", "id": 1, "name": "Mangrove restoration", "status": "active",
     "amount": 1500000, "approved_on": "2022-06-14", "agency": {"name": "Coastal Authority"}},
    {"@entity": "project", "id": 2, "name": "Solar mini-grids", "status": "active",
     "amount": 250000.5, "approved_on": "2023-02-01", "agency": {"name": "Energy Office"}},
    {"@entity": "project", "id": 3, "name": "Early warning systems", "status": "closed",
     "amount": 730000, "approved_on": "2021-09-30", "agency": {"name": "Met Service"}},
    {"@entity": "project", "id": 4, "name": "Seawall feasibility", "status": "pipeline",
     "amount": 85000, "approved_on": "2023-07-19", "agency": {"name": "Coastal Authority"}},
    {"@entity": "project", "id": 5, "name": "Water safety plans", "status": "active",
     "amount": 410000, "approved_on": "2020-11-03", "agency": {"name": "Water Board"}}
]"#;

fn print_page(title: &str, view: &CollectionView) {
    println!("== {title}");
    for record in view.records() {
        println!(
            "  {:<24} {:<20} {:>12}",
            record.get("name").map(ToString::to_string).unwrap_or_default(),
            record
                .get_path("agency.name")
                .map(ToString::to_string)
                .unwrap_or_default(),
            record.get("amount").map(ToString::to_string).unwrap_or_default(),
        );
    }
    let page = view.view();
    println!(
        "  showing {}-{} of {} (page {}/{}, pages {:?})",
        page.first_item(),
        page.last_item(),
        page.total_filtered_count(),
        page.page_index(),
        page.total_pages(),
        view.page_numbers(),
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up file logging
    let log_file = File::create("listing.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;

    let records = Record::list_from_json(PROJECTS)?;
    let fields = vec![
        FieldDescriptor::direct("name").searchable().sortable(),
        FieldDescriptor::path("agency.name")
            .with_label("Agency")
            .searchable()
            .sortable(),
        FieldDescriptor::direct("amount").sortable(),
        FieldDescriptor::direct("approved_on").sortable(),
    ];
    let config = ViewConfig::default()
        .with_page_size(2)
        .with_initial_sort("approved_on", SortDirection::Desc);
    let mut view = CollectionView::new(records, fields, config);

    print_page("newest first", &view);

    view.next_page();
    print_page("page 2", &view);

    view.set_filter("status", "active");
    view.set_sort("amount");
    print_page("active, by amount", &view);

    let totals = view.totals("amount");
    println!("  total funding: {} across {} projects", totals.sum, totals.count);

    view.set_filter("status", "All");
    view.set_search_term("coastal");
    print_page("search: coastal", &view);

    println!("status options: {:?}", view.facet_options("status"));
    Ok(())
}
