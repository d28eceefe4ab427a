//! Form state and validation for the create/edit pages.
//!
//! A [`FormState`] holds the values being edited; a [`Validator`] describes
//! the rules each field must satisfy. Rules are registered with a fluent
//! builder and run in order, and only the first failing rule of each field
//! is reported.
//!
//! # Example
//!
//! ```
//! use finportal_lib::form::FormState;
//! use finportal_lib::form::Validator;
//!
//! let validator = Validator::new()
//!     .field("name")
//!         .required("Name is required")
//!         .max_length(120, "Name must be at most 120 characters")
//!     .field("amount")
//!         .numeric("Amount must be a number")
//!         .min(0.0, "Amount cannot be negative")
//!     .field("contact")
//!         .email("Please enter a valid email")
//!     .field("currency")
//!         .pattern("^[A-Z]{3}$", "Use a three-letter currency code")
//!     .build();
//!
//! let mut form = FormState::new();
//! form.set_value("name", "Coastal resilience");
//! form.set_value("amount", "250000");
//! form.set_value("currency", "usd");
//!
//! let result = form.validate(&validator);
//! assert_eq!(result.first_invalid_field(), Some("currency"));
//! ```

mod result;
mod state;
mod validator;

pub use result::ValidationResult;
pub use state::FormState;
pub use validator::FieldBuilder;
pub use validator::Validator;
