//! Row model structures.

use super::{Cell, Column};
use serde::Serialize;
use std::collections::BTreeMap;

/// A sparse worksheet row.
///
/// Cells are keyed by column; absent columns simply have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Row {
    /// 1-based row number
    pub number: u32,

    /// Present cells by column
    pub cells: BTreeMap<Column, Cell>,
}

impl Row {
    /// Create an empty row.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            cells: BTreeMap::new(),
        }
    }

    /// Insert a cell, replacing any earlier cell in the same column.
    pub fn insert(&mut self, cell: Cell) {
        self.cells.insert(cell.column.clone(), cell);
    }

    /// Look up a cell by column letters.
    pub fn get(&self, letters: &str) -> Option<&Cell> {
        let column = Column::parse(letters)?;
        self.cells.get(&column)
    }

    /// Look up a cell by column.
    pub fn cell(&self, column: &Column) -> Option<&Cell> {
        self.cells.get(column)
    }

    /// Iterate cells left to right.
    pub fn cells_in_column_order(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Whether any cell has a non-blank value.
    pub fn has_content(&self) -> bool {
        self.cells.values().any(|c| !c.is_blank())
    }

    /// Number of present cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no present cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
