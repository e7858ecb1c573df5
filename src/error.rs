//! Custom error types for the expense ledger
//!
//! This module defines the error hierarchy for the ledger using thiserror.
//! Every failure a caller can act on (blank fields, bad prices, duplicates,
//! lookup misses) has its own variant so the presentation layer can turn it
//! into a user-facing message.

use thiserror::Error;

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A required text field was blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The price text is neither a number nor a permitted arithmetic expression
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// An expense with the same visible fields already exists
    #[error("This expense already exists")]
    DuplicateExpense,

    /// No expense row carries the requested id
    #[error("Expense not found: {0}")]
    RecordNotFound(String),

    /// No category matches the requested name
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// The expense file does not exist
    #[error("Expense file not found: {0}")]
    StoreNotFound(String),

    /// A category name was blank
    #[error("Category name cannot be empty")]
    EmptyName,

    /// A category with the same name (ignoring case) already exists
    #[error("Category already exists: {0}")]
    DuplicateCategory(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Delimited-file read/write errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Validation errors for input that is not a price or field problem
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl LedgerError {
    /// Check if this is a lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RecordNotFound(_) | Self::CategoryNotFound(_) | Self::StoreNotFound(_)
        )
    }

    /// Check if this is an input validation failure
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_) | Self::InvalidPrice(_) | Self::EmptyName | Self::Validation(_)
        )
    }

    /// Check if this is a duplicate rejection
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateExpense | Self::DuplicateCategory(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for LedgerError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
