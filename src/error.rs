//! Error types for the unsheet library.

use std::io;
use thiserror::Error;

/// Result type alias for unsheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading a part from the container.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a readable ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// The container holds no worksheet parts.
    #[error("Workbook contains no worksheets")]
    EmptyWorkbook,

    /// A required part is missing from the container.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Error while serializing output.
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl Error {
    /// Whether the input itself is malformed (bad container or bad XML).
    pub fn is_format_error(&self) -> bool {
        matches!(self, Error::ZipArchive(_) | Error::XmlParse(_))
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

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}
