//! Client-side collection views for the climate-finance portal
//!
//! Listings of projects, funding sources, agencies and locations are fetched
//! once from the portal API and then searched, filtered, sorted and paged in
//! memory. This crate holds the record model those listings share, the query
//! pipeline that derives a page from a record set, the [`CollectionView`]
//! binding that keeps view state and the derived page in sync, and the form
//! state used by the create/edit pages.
//!
//! # Example
//!
//! ```
//! use finportal_lib::CollectionView;
//! use finportal_lib::ViewConfig;
//! use finportal_lib::model::Record;
//! use finportal_lib::query::FieldDescriptor;
//!
//! let records = vec![
//!     Record::new("project").set("name", "Alpha").set("amount", 10),
//!     Record::new("project").set("name", "Beta").set("amount", 5),
//! ];
//! let fields = vec![
//!     FieldDescriptor::direct("name").searchable(),
//!     FieldDescriptor::direct("amount").sortable(),
//! ];
//!
//! let mut view = CollectionView::new(records, fields, ViewConfig::default());
//! view.set_search_term("alp");
//! assert_eq!(view.total_filtered_count(), 1);
//! ```

pub mod config;
pub mod error;
pub mod form;
pub mod model;
pub mod query;

mod view;

pub use config::ViewConfig;
pub use view::*;
