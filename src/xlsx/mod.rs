//! XLSX (Excel) spreadsheet decoding.
//!
//! The shared string table is loaded first, then every worksheet part is
//! decoded against it into rows.
//!
//! # Example
//!
//! ```no_run
//! use unsheet::xlsx::XlsxReader;
//!
//! let data = std::fs::read("questions.xlsx")?;
//! let reader = XlsxReader::from_bytes(data)?;
//!
//! for part in reader.worksheet_parts() {
//!     println!("{}: {} rows", part, reader.read_sheet(part)?.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod parser;
mod shared_strings;
mod text;
mod worksheet;

pub use parser::XlsxReader;
pub use shared_strings::SharedStrings;
pub use worksheet::WorksheetDecoder;
