use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unknown vendor document: {identity}")]
    UnknownVendor { identity: String },

    #[error("Malformed document '{document}': {reason}")]
    MalformedDocument { document: String, reason: String },

    #[error("Missing required field '{field}' in '{document}' entry #{entry}")]
    MissingField {
        document: String,
        entry: usize,
        field: String,
    },

    #[error("Invalid numeric value {value:?} for field '{field}' in '{document}' entry #{entry}")]
    InvalidNumericField {
        document: String,
        entry: usize,
        field: String,
        value: String,
    },

    #[error("Implausible record in '{document}' entry #{entry}: {reason}")]
    ImplausibleRecord {
        document: String,
        entry: usize,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    /// Short label used for failure metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::UnknownVendor { .. } => "unknown_vendor",
            CatalogError::MalformedDocument { .. } => "malformed_document",
            CatalogError::MissingField { .. } => "missing_field",
            CatalogError::InvalidNumericField { .. } => "invalid_numeric_field",
            CatalogError::ImplausibleRecord { .. } => "implausible_record",
            CatalogError::Io(_) => "io",
            CatalogError::Json(_) => "json",
            CatalogError::Toml(_) => "toml",
            CatalogError::Config(_) => "config",
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
