//! Header-mapped record building.
//!
//! The first row with any non-blank cell becomes the header. Every later
//! row is read through that header, column by column, into a [`Record`].
//!
//! ```
//! use unsheet::model::{Cell, CellKind, Column, Row};
//! use unsheet::records::build_records;
//!
//! let mut header = Row::new(1);
//! let mut data = Row::new(2);
//! for (row, letters, value) in [
//!     (&mut header, "A", "Theme"),
//!     (&mut data, "A", "Happiness"),
//! ] {
//!     row.insert(Cell {
//!         column: Column::parse(letters).unwrap(),
//!         row: row.number,
//!         kind: CellKind::Other,
//!         value: value.to_string(),
//!     });
//! }
//!
//! let table = build_records(&[header, data]);
//! assert_eq!(table.records[0].get("Theme"), Some("Happiness"));
//! ```

use crate::model::{HeaderMap, Record, Row};
use serde::Serialize;

/// Header plus the records read through it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordTable {
    /// Header map, `None` when no row had any content
    pub header: Option<HeaderMap>,

    /// Data records in row order
    pub records: Vec<Record>,
}

/// Build header-named records from rows in document order.
///
/// Blank rows are skipped wherever they appear. Once the header is taken it
/// is never replaced. Data rows that are blank across the header's columns
/// produce no record.
pub fn build_records(rows: &[Row]) -> RecordTable {
    let mut header: Option<HeaderMap> = None;
    let mut records = Vec::new();

    for row in rows {
        match header {
            None => {
                if row.has_content() {
                    let map = HeaderMap::from_row(row);
                    log::debug!(
                        "header taken from row {} ({} columns)",
                        row.number,
                        map.len()
                    );
                    header = Some(map);
                } else {
                    log::trace!("skipping blank row {} before header", row.number);
                }
            }
            Some(ref map) => {
                let record = record_for_row(map, row);
                if record.has_content() {
                    records.push(record);
                } else {
                    log::trace!("skipping blank row {}", row.number);
                }
            }
        }
    }

    RecordTable { header, records }
}

/// Read one row through a header map.
///
/// Columns the row lacks become empty strings; cells outside the header's
/// columns are ignored.
pub fn record_for_row(header: &HeaderMap, row: &Row) -> Record {
    let mut record = Record::new();
    for (column, name) in &header.columns {
        let value = row.cell(column).map(|c| c.trimmed()).unwrap_or("");
        record.set(name.as_str(), value);
    }
    record
}
