//! Error types for the hrpay-core library.

use thiserror::Error;

/// Main error type for the hrpay library.
#[derive(Error, Debug)]
pub enum HrpayError {
    /// Document could not be turned into text.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Relational store failure.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Blob store failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Document ingestion could not proceed.
    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// Month out of the 1-12 range.
    #[error("invalid month: {0}, expected 1-12")]
    InvalidMonth(u32),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while decoding a document into text.
///
/// All of these are terminal for the document in question.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Plain-text input is not valid UTF-8.
    #[error("document is not valid UTF-8: {0}")]
    Encoding(String),
}

/// Errors from the relational store.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Driver-level failure (connection, constraint violation, SQL error).
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored value could not be decoded.
    #[error("corrupt value in {table}.{column}: {value}")]
    Corrupt {
        table: &'static str,
        column: &'static str,
        value: String,
    },

    /// Imported runs hold document figures and are never recomputed.
    #[error("payroll run {month:02}/{year} was imported and cannot be recomputed")]
    RunImported { month: u32, year: i32 },

    /// Computed runs are never mixed with imported payslips.
    #[error("payroll run {month:02}/{year} was computed and cannot take imported payslips")]
    RunComputed { month: u32, year: i32 },

    /// No employee carries the given code.
    #[error("unknown employee code: {0}")]
    UnknownEmployee(String),

    /// The highest numeric employee code leaves no successor.
    #[error("no employee code after E{0}")]
    CodesExhausted(u32),
}

/// Errors from the blob store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Writing the object failed.
    #[error("failed to store {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The key would escape the storage root or is empty.
    #[error("invalid object key: {0}")]
    InvalidKey(String),
}

/// Errors raised when a parsed document cannot be imported.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Fields required for import were not recovered from the document.
    #[error("missing required fields: {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),

    /// The document name matched nobody and auto-creation is off.
    #[error("no roster match for '{0}'")]
    Unmatched(String),

    /// Attendance CSV could not be read.
    #[error("attendance CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A manual assignment was malformed.
    #[error("invalid assignment '{0}', expected NAME=CODE")]
    InvalidAssignment(String),
}

/// Result type for the hrpay library.
pub type Result<T> = std::result::Result<T, HrpayError>;

impl From<rusqlite::Error> for HrpayError {
    fn from(err: rusqlite::Error) -> Self {
        HrpayError::Persistence(PersistenceError::Database(err))
    }
}
