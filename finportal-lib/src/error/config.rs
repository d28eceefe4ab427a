//! Configuration errors

/// Error type for view and validator configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("Invalid view configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A page size of zero was configured.
    #[error("Page size must be greater than zero")]
    ZeroPageSize,

    /// A validation pattern is not a valid regular expression.
    #[error("Invalid pattern for field '{field}': {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },
}
