/// Error types for the lake preparation toolkit
use thiserror::Error;

/// Main error type for preparation and reconciliation operations
#[derive(Error, Debug)]
pub enum LakeError {
    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Date parsing failed
    #[error("Failed to parse date: {0}")]
    DateParse(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// A cell expected to be numeric could not be parsed
    #[error("Non-numeric value in column {column}: {value:?}")]
    NonNumeric { column: String, value: String },

    /// A required column is absent from the table
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// No usable observations for a variable on the initialization date
    #[error("No initial data for {variable} on {date}")]
    NoInitialData { variable: String, date: String },

    /// Too few or degenerate paired values to compute a statistic
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Bracketing depths coincide; interpolation would divide by zero
    #[error("Coincident bracketing depths at {0} m")]
    CoincidentDepths(f64),
}

/// Type alias for Results using LakeError
pub type Result<T> = std::result::Result<T, LakeError>;
