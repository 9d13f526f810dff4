//! Header map and output record structures.

use super::{Column, Row};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Column → header name mapping taken from the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderMap {
    /// Row number the header was read from
    pub row: u32,

    /// Header names in column order
    pub columns: Vec<(Column, String)>,
}

impl HeaderMap {
    /// Build a header map from every present cell of `row`.
    pub fn from_row(row: &Row) -> Self {
        let columns = row
            .cells_in_column_order()
            .map(|c| (c.column.clone(), c.trimmed().to_string()))
            .collect();
        Self {
            row: row.number,
            columns,
        }
    }

    /// Header name for a column given by letters.
    pub fn name(&self, letters: &str) -> Option<&str> {
        let column = Column::parse(letters)?;
        self.columns
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, name)| name.as_str())
    }

    /// Header names in column order (may repeat).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(_, name)| name.as_str())
    }

    /// Number of header columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether there are no header columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A data row keyed by header name.
///
/// Fields keep the header's column order. Setting a name that already
/// exists overwrites its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, overwriting any existing value under `name`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Get a field value by header name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate `(name, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Whether any value is non-empty after trimming.
    pub fn has_content(&self) -> bool {
        self.fields.iter().any(|(_, v)| !v.trim().is_empty())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.set(name, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, CellKind};

    #[test]
    fn test_set_overwrites_in_place() {
        let mut record = Record::new();
        record.set("Q", "first");
        record.set("Theme", "Calm");
        record.set("Q", "second");

        let pairs: Vec<_> = record.iter().collect();
        assert_eq!(pairs, vec![("Q", "second"), ("Theme", "Calm")]);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_has_content() {
        let blank: Record = [("A", ""), ("B", "  ")].into_iter().collect();
        assert!(!blank.has_content());
        let filled: Record = [("A", ""), ("B", "x")].into_iter().collect();
        assert!(filled.has_content());
    }

    #[test]
    fn test_serialize_keeps_order() {
        let record: Record = [("Zeta", "1"), ("Alpha", "2")].into_iter().collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Zeta":"1","Alpha":"2"}"#);
    }

    #[test]
    fn test_header_from_row() {
        let mut row = Row::new(3);
        for (letters, value) in [("B", " Question "), ("A", "Theme")] {
            row.insert(Cell {
                column: Column::parse(letters).unwrap(),
                row: 3,
                kind: CellKind::SharedString,
                value: value.to_string(),
            });
        }

        let header = HeaderMap::from_row(&row);
        assert_eq!(header.row, 3);
        assert_eq!(header.names().collect::<Vec<_>>(), vec!["Theme", "Question"]);
        assert_eq!(header.name("b"), Some("Question"));
        assert_eq!(header.name("C"), None);

        let json = serde_json::to_string(&header).unwrap();
        assert_eq!(json, r#"{"row":3,"columns":[["A","Theme"],["B","Question"]]}"#);
    }
}
