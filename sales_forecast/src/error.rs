//! Error types for the sales_forecast crate

use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum SalesForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Requested range cannot be served by the fitted model
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Error related to forecasting operations
    #[error("Forecasting error: {0}")]
    ForecastingError(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from CSV encoding
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from JSON serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, SalesForecastError>;

impl From<polars::prelude::PolarsError> for SalesForecastError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        SalesForecastError::PolarsError(err.to_string())
    }
}

impl From<csv::Error> for SalesForecastError {
    fn from(err: csv::Error) -> Self {
        SalesForecastError::CsvError(err.to_string())
    }
}
