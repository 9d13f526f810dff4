//! # unsheet
//!
//! Extraction of tabular content from XLSX workbooks into header-named
//! records.
//!
//! The whole workbook is read from memory: the shared string table is
//! loaded, every worksheet part is decoded into rows (in part-name order),
//! and the first non-blank row becomes the header for the rest.
//!
//! ## Quick Start
//!
//! ```no_run
//! let data = std::fs::read("questions.xlsx")?;
//!
//! for record in unsheet::extract_records(&data)? {
//!     println!("{:?} -> {:?}", record.get("Theme"), record.get("Question"));
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Stages
//!
//! ```no_run
//! use unsheet::xlsx::XlsxReader;
//! use unsheet::records::build_records;
//!
//! # let data: Vec<u8> = Vec::new();
//! let reader = XlsxReader::from_bytes(data)?;
//! let rows = reader.read_rows()?;
//! let table = build_records(&rows);
//! println!("header: {:?}", table.header);
//! # Ok::<(), unsheet::Error>(())
//! ```
//!
//! Logging goes through the [`log`] facade; install any logger to see
//! warnings about unresolvable shared-string indices.

pub mod column;
pub mod container;
pub mod error;
pub mod model;
pub mod options;
pub mod records;
pub mod render;
pub mod seed;
pub mod xlsx;

// Re-exports
pub use container::OoxmlContainer;
pub use error::{Error, Result};
pub use model::{Cell, CellKind, Column, HeaderMap, Record, Row};
pub use options::ExtractOptions;
pub use records::{build_records, RecordTable};
pub use xlsx::XlsxReader;

/// Extract header-named records from XLSX bytes.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("questions.xlsx")?;
/// let records = unsheet::extract_records(&data)?;
/// println!("{} records", records.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn extract_records(data: &[u8]) -> Result<Vec<Record>> {
    extract_records_with_options(data, &ExtractOptions::default())
}

/// Extract header-named records from XLSX bytes with options.
pub fn extract_records_with_options(data: &[u8], options: &ExtractOptions) -> Result<Vec<Record>> {
    Ok(extract_table(data, options)?.records)
}

/// Extract the header and records from XLSX bytes.
pub fn extract_table(data: &[u8], options: &ExtractOptions) -> Result<RecordTable> {
    let reader = XlsxReader::from_bytes_with_options(data.to_vec(), options.clone())?;
    reader.extract()
}

/// Decode every worksheet of XLSX bytes into one row sequence.
pub fn extract_rows(data: &[u8]) -> Result<Vec<Row>> {
    XlsxReader::from_bytes(data.to_vec())?.read_rows()
}
