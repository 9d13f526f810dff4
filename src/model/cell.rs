//! Cell model structures.

use crate::column::{column_to_index, index_to_column, MAX_COLUMN_INDEX};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// A worksheet column, identified by its letters.
///
/// Columns order by position (`B` < `Z` < `AA`), not lexically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    letters: String,
    index: u32,
}

impl Column {
    /// Parse column letters (case-insensitive).
    pub fn parse(letters: &str) -> Option<Self> {
        let index = column_to_index(letters)?;
        Some(Self {
            letters: letters.to_ascii_uppercase(),
            index,
        })
    }

    /// Create a column from a zero-based index.
    pub fn from_index(index: u32) -> Self {
        Self {
            letters: index_to_column(index),
            index,
        }
    }

    /// Column letters, upper case.
    pub fn letters(&self) -> &str {
        &self.letters
    }

    /// Zero-based column index.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The column immediately to the right, if there is one before
    /// [`MAX_COLUMN_INDEX`] runs out.
    pub fn next(&self) -> Option<Self> {
        if self.index >= MAX_COLUMN_INDEX {
            return None;
        }
        Some(Self::from_index(self.index + 1))
    }
}

impl Ord for Column {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl PartialOrd for Column {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters)
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.letters)
    }
}

/// Declared type of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// `t="s"`: value is an index into the shared string table
    SharedString,
    /// `t="inlineStr"`: text lives inside the cell
    InlineString,
    /// Anything else (numbers, booleans, formula strings, errors)
    #[default]
    Other,
}

impl CellKind {
    /// Map the `t` attribute of a `<c>` element.
    pub fn from_type_attr(value: Option<&str>) -> Self {
        match value {
            Some("s") => CellKind::SharedString,
            Some("inlineStr") => CellKind::InlineString,
            _ => CellKind::Other,
        }
    }
}

/// A decoded worksheet cell.
///
/// Only cells that carried a value are ever built; a `<c>` element without
/// one never becomes a `Cell`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// Column of the cell
    pub column: Column,

    /// 1-based row number
    pub row: u32,

    /// Declared type
    pub kind: CellKind,

    /// Decoded text, untrimmed
    pub value: String,
}

impl Cell {
    /// Value with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    /// Whether the value is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_ordering() {
        let b = Column::parse("B").unwrap();
        let z = Column::parse("Z").unwrap();
        let aa = Column::parse("aa").unwrap();
        assert!(b < z);
        assert!(z < aa);
        assert_eq!(aa.letters(), "AA");
        assert_eq!(z.next(), Some(aa));
    }

    #[test]
    fn test_next_stops_at_last_column() {
        let xfc = Column::parse("XFC").unwrap();
        let xfd = xfc.next().unwrap();
        assert_eq!(xfd.letters(), "XFD");
        assert_eq!(xfd.next(), None);
    }

    #[test]
    fn test_cell_kind_from_attr() {
        assert_eq!(CellKind::from_type_attr(Some("s")), CellKind::SharedString);
        assert_eq!(
            CellKind::from_type_attr(Some("inlineStr")),
            CellKind::InlineString
        );
        assert_eq!(CellKind::from_type_attr(Some("str")), CellKind::Other);
        assert_eq!(CellKind::from_type_attr(Some("b")), CellKind::Other);
        assert_eq!(CellKind::from_type_attr(None), CellKind::Other);
    }

    #[test]
    fn test_blank_cell() {
        let cell = Cell {
            column: Column::from_index(0),
            row: 1,
            kind: CellKind::Other,
            value: " \t".to_string(),
        };
        assert!(cell.is_blank());
        assert_eq!(cell.trimmed(), "");
    }
}
