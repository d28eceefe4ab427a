//! Error types

mod config;
mod field;
mod validation;

pub use config::*;
pub use field::*;
pub use validation::*;
