//! Unified error type for the budget tracker.
//!
//! Every fallible operation in the crate returns [`Result`], so lookup failures during import,
//! field validation failures and database errors all travel through the same enum.

use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// A line item referenced by name does not exist
    #[error("Line item not found: {name}")]
    LineItemNotFound {
        /// The name that was looked up
        name: String,
    },

    /// A project referenced by number (or id) does not exist
    #[error("Project not found: {number}")]
    ProjectNotFound {
        /// The project number that was looked up
        number: String,
    },

    /// A field failed validation before being written
    #[error("Invalid value for {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// The bulk insert of an import failed; nothing was persisted
    #[error("Could not import CSV: {message}")]
    ImportFailed {
        /// Underlying cause
        message: String,
    },

    /// The requested report type is not one of the known dimensions
    #[error("Unknown report type: {report_type}")]
    UnknownReportType {
        /// The report type as supplied by the caller
        report_type: String,
    },

    /// The filter value is not valid for the requested report type
    #[error("Invalid filter option {value} for report {report_type}")]
    InvalidFilterOption {
        /// Canonical report type name
        report_type: String,
        /// The rejected filter value
        value: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Malformed CSV input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_errors_name_the_missing_key() {
        let err = Error::LineItemNotFound {
            name: "Equipos".to_string(),
        };
        assert_eq!(err.to_string(), "Line item not found: Equipos");

        let err = Error::ProjectNotFound {
            number: "P-404".to_string(),
        };
        assert_eq!(err.to_string(), "Project not found: P-404");
    }

    #[test]
    fn test_database_error_converts() {
        let err: Error = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, Error::Database(_)));
    }
}
