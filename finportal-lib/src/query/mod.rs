//! Query pipeline and view state

mod compare;
mod facets;
mod field;
mod page;
mod pipeline;
mod state;

pub use compare::*;
pub use facets::*;
pub use field::Accessor;
pub use field::AccessorFn;
pub use field::FieldDescriptor;
pub(crate) use field::accessor_for;
pub use page::DerivedView;
pub(crate) use page::total_pages;
pub use pipeline::*;
pub use state::*;
