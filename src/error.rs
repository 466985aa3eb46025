//! Error types for the swarmset library.

use std::io;
use thiserror::Error;

/// Result type alias for swarmset operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure classes a caller can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The input could not be read at all.
    Io,
    /// The workbook container or its XML is malformed or inconsistent.
    Integrity,
    /// A cell holds a value its column cannot accept.
    Validation,
    /// The finished dataset could not be rendered.
    Output,
}

/// Errors that can occur while building a dataset.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required workbook part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Invalid or inconsistent data in the workbook.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A cell references a shared string that does not exist.
    #[error("Shared string reference {reference:?} in cell {cell} cannot be resolved ({available} strings available)")]
    SharedStringIndex {
        /// Raw reference text from the cell
        reference: String,
        /// Cell address, or position when the cell has none
        cell: String,
        /// Size of the shared-string table
        available: usize,
    },

    /// A numeric column holds text that is not a finite number.
    #[error("Invalid number in column {column:?} at sheet row {row}: {value:?}")]
    InvalidNumber {
        /// Column header
        column: String,
        /// Offending cell text
        value: String,
        /// 1-based sheet row number
        row: usize,
    },

    /// Error while rendering the dataset.
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Io(_) => ErrorCategory::Io,
            Error::ZipArchive(_)
            | Error::XmlParse(_)
            | Error::MissingComponent(_)
            | Error::InvalidData(_)
            | Error::SharedStringIndex { .. } => ErrorCategory::Integrity,
            Error::InvalidNumber { .. } => ErrorCategory::Validation,
            Error::Render(_) => ErrorCategory::Output,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}
