//! Worksheet XML decoding into sparse rows.

use crate::column::{reference_row, split_reference};
use crate::error::{Error, Result};
use crate::model::{Cell, CellKind, Column, Row};
use quick_xml::events::{BytesStart, Event};
use unicode_normalization::UnicodeNormalization;

use super::shared_strings::SharedStrings;
use super::text::{collect_text_runs, read_element_text, reader_for};

/// A `<c>` element being read.
#[derive(Debug)]
struct PendingCell {
    column: Column,
    row: u32,
    kind: CellKind,
    value: Option<String>,
    inline: Option<String>,
}

/// Decodes worksheet parts against a completed shared string table.
#[derive(Debug, Clone, Copy)]
pub struct WorksheetDecoder<'a> {
    shared_strings: &'a SharedStrings,
    normalize_unicode: bool,
}

impl<'a> WorksheetDecoder<'a> {
    /// Create a decoder that resolves shared strings from `shared_strings`.
    pub fn new(shared_strings: &'a SharedStrings) -> Self {
        Self {
            shared_strings,
            normalize_unicode: false,
        }
    }

    /// Apply NFC normalization to decoded cell text.
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    /// Decode a worksheet into rows, in document order.
    ///
    /// Cells without a value are left out of their row. Cell values are
    /// passed through as written; only shared-string indices are resolved.
    pub fn decode(&self, xml: &str) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        let mut reader = reader_for(xml);
        let mut buf = Vec::new();
        let mut inner_buf = Vec::new();

        let mut current_row: Option<Row> = None;
        let mut last_row_number = 0u32;
        let mut last_column: Option<Column> = None;
        let mut pending: Option<PendingCell> = None;
        // Open elements not yet matched by an end tag
        let mut depth = 0usize;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    depth += 1;
                    match e.name().local_name().as_ref() {
                        b"row" => {
                            let row = Self::start_row(e, last_row_number)?;
                            last_row_number = row.number;
                            last_column = None;
                            current_row = Some(row);
                        }
                        b"c" => {
                            if let Some(ref row) = current_row {
                                let cell = Self::start_cell(e, row.number, last_column.as_ref())?;
                                last_column = Some(cell.column.clone());
                                pending = Some(cell);
                            }
                        }
                        b"v" => {
                            if let Some(ref mut cell) = pending {
                                // read through the matching end tag
                                cell.value = Some(read_element_text(&mut reader, &mut inner_buf)?);
                                depth -= 1;
                            }
                        }
                        b"is" => {
                            if let Some(ref mut cell) = pending {
                                cell.inline = Some(collect_text_runs(&mut reader, &mut inner_buf)?);
                                depth -= 1;
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Empty(ref e)) => match e.name().local_name().as_ref() {
                    b"row" => {
                        let row = Self::start_row(e, last_row_number)?;
                        last_row_number = row.number;
                        last_column = None;
                        rows.push(row);
                    }
                    b"c" => {
                        // No children, so no value: the cell only advances the column.
                        if let Some(ref row) = current_row {
                            let cell = Self::start_cell(e, row.number, last_column.as_ref())?;
                            last_column = Some(cell.column);
                        }
                    }
                    b"v" => {
                        if let Some(ref mut cell) = pending {
                            cell.value = Some(String::new());
                        }
                    }
                    b"is" => {
                        if let Some(ref mut cell) = pending {
                            cell.inline = Some(String::new());
                        }
                    }
                    _ => {}
                },
                Ok(Event::End(ref e)) => {
                    depth = depth.saturating_sub(1);
                    match e.name().local_name().as_ref() {
                        b"c" => {
                            if let Some(cell) = pending.take() {
                                if let Some(cell) = self.finish_cell(cell) {
                                    if let Some(ref mut row) = current_row {
                                        row.insert(cell);
                                    }
                                }
                            }
                        }
                        b"row" => {
                            pending = None;
                            if let Some(row) = current_row.take() {
                                rows.push(row);
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        if let Some(row) = current_row {
            return Err(Error::XmlParse(format!(
                "row {} is not closed before end of document",
                row.number
            )));
        }
        if depth > 0 {
            return Err(Error::XmlParse(format!(
                "worksheet ends with {} unclosed element(s)",
                depth
            )));
        }

        Ok(rows)
    }

    fn start_row(e: &BytesStart<'_>, last_row_number: u32) -> Result<Row> {
        let declared = attr_value(e, b"r")?.and_then(|r| r.trim().parse().ok());
        let number = match declared {
            Some(number) => number,
            None => last_row_number.checked_add(1).ok_or_else(|| {
                Error::XmlParse(format!("no row number follows row {}", last_row_number))
            })?,
        };
        Ok(Row::new(number))
    }

    /// Read a `<c>` start tag. An explicit reference must name a valid
    /// column; only a missing one is inferred from the previous cell.
    fn start_cell(
        e: &BytesStart<'_>,
        row_number: u32,
        last_column: Option<&Column>,
    ) -> Result<PendingCell> {
        let reference = attr_value(e, b"r")?;
        let kind = CellKind::from_type_attr(attr_value(e, b"t")?.as_deref());

        let column = match (reference.as_deref(), last_column) {
            (Some(r), _) => Column::parse(split_reference(r).0).ok_or_else(|| {
                Error::XmlParse(format!("invalid cell reference {:?} in row {}", r, row_number))
            })?,
            (None, Some(col)) => col.next().ok_or_else(|| {
                Error::XmlParse(format!("no column follows {} in row {}", col, row_number))
            })?,
            (None, None) => Column::from_index(0),
        };
        let row = reference
            .as_deref()
            .and_then(reference_row)
            .unwrap_or(row_number);

        Ok(PendingCell {
            column,
            row,
            kind,
            value: None,
            inline: None,
        })
    }

    fn finish_cell(&self, cell: PendingCell) -> Option<Cell> {
        let value = match cell.kind {
            CellKind::SharedString => {
                let raw = cell.value?;
                self.resolve_shared_string(&raw, &cell.column, cell.row)
            }
            CellKind::InlineString => cell.inline.or(cell.value)?,
            CellKind::Other => cell.value?,
        };

        let value = if self.normalize_unicode {
            value.nfc().collect()
        } else {
            value
        };

        Some(Cell {
            column: cell.column,
            row: cell.row,
            kind: cell.kind,
            value,
        })
    }

    /// Look up a shared string. Bad indices decode as an empty string.
    fn resolve_shared_string(&self, raw: &str, column: &Column, row: u32) -> String {
        match raw.trim().parse::<usize>() {
            Ok(idx) => match self.shared_strings.get(idx) {
                Some(s) => s.to_string(),
                None => {
                    log::warn!(
                        "shared string index {} out of range ({} entries) at {}{}",
                        idx,
                        self.shared_strings.len(),
                        column,
                        row
                    );
                    String::new()
                }
            },
            Err(_) => {
                log::warn!(
                    "shared string index {:?} is not a number at {}{}",
                    raw,
                    column,
                    row
                );
                String::new()
            }
        }
    }
}

/// Get an attribute value by local name.
///
/// Every attribute is read so that malformed or duplicated ones surface
/// as errors even after the wanted one is found.
fn attr_value(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    let mut value = None;
    for attr in e.attributes() {
        let attr = attr?;
        if value.is_none() && attr.key.local_name().as_ref() == name {
            value = Some(attr.unescape_value()?.into_owned());
        }
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> SharedStrings {
        let mut xml = String::from("<sst>");
        for item in items {
            xml.push_str(&format!("<si><t>{}</t></si>", item));
        }
        xml.push_str("</sst>");
        SharedStrings::parse(&xml).unwrap()
    }

    fn sheet(rows: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>{}</sheetData>
</worksheet>"#,
            rows
        )
    }

    #[test]
    fn test_decode_typed_cells() {
        let ss = strings(&["Theme", "Question"]);
        let xml = sheet(
            r#"<row r="1">
                 <c r="A1" t="s"><v>0</v></c>
                 <c r="B1" t="inlineStr"><is><t>Inline</t></is></c>
                 <c r="C1"><v>3.5</v></c>
                 <c r="D1" t="b"><v>1</v></c>
                 <c r="E1" t="str"><f>A1&amp;B1</f><v>ThemeInline</v></c>
               </row>"#,
        );

        let rows = WorksheetDecoder::new(&ss).decode(&xml).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.number, 1);
        assert_eq!(row.get("A").unwrap().value, "Theme");
        assert_eq!(row.get("A").unwrap().kind, CellKind::SharedString);
        assert_eq!(row.get("B").unwrap().value, "Inline");
        assert_eq!(row.get("C").unwrap().value, "3.5");
        assert_eq!(row.get("D").unwrap().value, "1");
        assert_eq!(row.get("E").unwrap().value, "ThemeInline");
    }

    #[test]
    fn test_cells_without_value_are_omitted() {
        let ss = strings(&[]);
        let xml = sheet(
            r#"<row r="1">
                 <c r="A1" s="3"/>
                 <c r="B1" s="2"></c>
                 <c r="C1"><v></v></c>
               </row>"#,
        );

        let rows = WorksheetDecoder::new(&ss).decode(&xml).unwrap();
        let row = &rows[0];
        assert!(row.get("A").is_none());
        assert!(row.get("B").is_none());
        assert_eq!(row.get("C").unwrap().value, "");
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn test_shared_index_out_of_range_is_empty() {
        let ss = strings(&["only"]);
        let xml = sheet(
            r#"<row r="1"><c r="A1" t="s"><v>7</v></c><c r="B1" t="s"><v>x</v></c></row>"#,
        );

        let rows = WorksheetDecoder::new(&ss).decode(&xml).unwrap();
        assert_eq!(rows[0].get("A").unwrap().value, "");
        assert_eq!(rows[0].get("B").unwrap().value, "");
    }

    #[test]
    fn test_same_shared_index_same_text() {
        let ss = strings(&["Happiness", "Calm"]);
        let xml = sheet(
            r#"<row r="2"><c r="A2" t="s"><v>0</v></c></row>
               <row r="3"><c r="A3" t="s"><v>0</v></c></row>"#,
        );

        let rows = WorksheetDecoder::new(&ss).decode(&xml).unwrap();
        assert_eq!(rows[0].get("A").unwrap().value, "Happiness");
        assert_eq!(rows[1].get("A").unwrap().value, "Happiness");
    }

    #[test]
    fn test_rich_inline_string() {
        let ss = strings(&[]);
        let xml = sheet(
            r#"<row r="1"><c r="A1" t="inlineStr"><is><r><t>What </t></r><r><rPr><b/></rPr><t>matters?</t></r></is></c></row>"#,
        );

        let rows = WorksheetDecoder::new(&ss).decode(&xml).unwrap();
        assert_eq!(rows[0].get("A").unwrap().value, "What matters?");
    }

    #[test]
    fn test_missing_references_are_inferred() {
        let ss = strings(&[]);
        let xml = sheet(
            r#"<row><c><v>a</v></c><c r="D1"><v>d</v></c><c><v>e</v></c></row>
               <row><c><v>next</v></c></row>"#,
        );

        let rows = WorksheetDecoder::new(&ss).decode(&xml).unwrap();
        assert_eq!(rows[0].number, 1);
        assert_eq!(rows[1].number, 2);
        let letters: Vec<_> = rows[0]
            .cells_in_column_order()
            .map(|c| c.column.letters().to_string())
            .collect();
        assert_eq!(letters, vec!["A", "D", "E"]);
        assert_eq!(rows[1].get("A").unwrap().row, 2);
    }

    #[test]
    fn test_sparse_row_keeps_document_order() {
        let ss = strings(&[]);
        let xml = sheet(
            r#"<row r="5"><c r="C5"><v>c</v></c></row>
               <row r="2"><c r="A2"><v>a</v></c></row>"#,
        );

        let rows = WorksheetDecoder::new(&ss).decode(&xml).unwrap();
        assert_eq!(rows.iter().map(|r| r.number).collect::<Vec<_>>(), vec![5, 2]);
        assert!(rows[0].get("A").is_none());
        assert_eq!(rows[0].get("C").unwrap().value, "c");
    }

    #[test]
    fn test_values_not_trimmed() {
        let ss = strings(&[]);
        let xml = sheet(r#"<row r="1"><c r="A1" t="str"><v>  spaced  </v></c></row>"#);
        let rows = WorksheetDecoder::new(&ss).decode(&xml).unwrap();
        assert_eq!(rows[0].get("A").unwrap().value, "  spaced  ");
    }

    #[test]
    fn test_unicode_normalization() {
        let ss = strings(&[]);
        // "e" followed by a combining acute accent
        let xml = sheet("<row r=\"1\"><c r=\"A1\" t=\"str\"><v>Cafe\u{301}</v></c></row>");

        let raw = WorksheetDecoder::new(&ss).decode(&xml).unwrap();
        assert_eq!(raw[0].get("A").unwrap().value, "Cafe\u{301}");

        let nfc = WorksheetDecoder::new(&ss)
            .with_unicode_normalization(true)
            .decode(&xml)
            .unwrap();
        assert_eq!(nfc[0].get("A").unwrap().value, "Caf\u{e9}");
    }

    #[test]
    fn test_empty_sheet() {
        let ss = strings(&[]);
        let rows = WorksheetDecoder::new(&ss).decode(&sheet("")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_malformed_sheet() {
        let ss = strings(&[]);
        let xml = sheet(r#"<row r="1"><c r="A1"><v>1</c></row>"#);
        let err = WorksheetDecoder::new(&ss).decode(&xml).unwrap_err();
        assert!(err.is_format_error());

        let truncated = r#"<worksheet><sheetData><row r="1"><c r="A1"><v>1</v></c>"#;
        let err = WorksheetDecoder::new(&ss).decode(truncated).unwrap_err();
        assert!(matches!(err, Error::XmlParse(_)));
    }

    #[test]
    fn test_truncated_after_closed_row() {
        let ss = strings(&[]);
        let truncated = r#"<worksheet><sheetData><row r="1"><c r="A1"><v>1</v></c></row>"#;
        let err = WorksheetDecoder::new(&ss).decode(truncated).unwrap_err();
        assert!(matches!(err, Error::XmlParse(_)));
    }

    #[test]
    fn test_duplicate_attribute_rejected() {
        let ss = strings(&[]);
        let xml = sheet(r#"<row r="1"><c r="A1" r="B1"><v>1</v></c></row>"#);
        let err = WorksheetDecoder::new(&ss).decode(&xml).unwrap_err();
        assert!(matches!(err, Error::XmlParse(_)));

        let xml = sheet(r#"<row r="1" r="2"><c r="A1"><v>1</v></c></row>"#);
        let err = WorksheetDecoder::new(&ss).decode(&xml).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_row_number_after_last_representable_row() {
        let ss = strings(&[]);
        let xml = sheet(
            r#"<row r="4294967295"><c r="A4294967295"><v>last</v></c></row>
               <row><c><v>after</v></c></row>"#,
        );
        let err = WorksheetDecoder::new(&ss).decode(&xml).unwrap_err();
        assert!(matches!(err, Error::XmlParse(_)));

        let xml = sheet(r#"<row r="4294967295"><c r="A4294967295"><v>last</v></c></row>"#);
        let rows = WorksheetDecoder::new(&ss).decode(&xml).unwrap();
        assert_eq!(rows[0].number, u32::MAX);
    }

    #[test]
    fn test_invalid_cell_reference_rejected() {
        let ss = strings(&[]);
        for reference in ["XFE1", "12", "1A"] {
            let xml = sheet(&format!(
                r#"<row r="1"><c r="A1"><v>a</v></c><c r="{}"><v>b</v></c></row>"#,
                reference
            ));
            let err = WorksheetDecoder::new(&ss).decode(&xml).unwrap_err();
            assert!(matches!(err, Error::XmlParse(_)), "{reference}");
        }

        let xml = sheet(r#"<row r="1"><c r="XFD1"><v>last</v></c><c><v>past</v></c></row>"#);
        let err = WorksheetDecoder::new(&ss).decode(&xml).unwrap_err();
        assert!(matches!(err, Error::XmlParse(_)));

        let xml = sheet(r#"<row r="1"><c r="XFD1"><v>last</v></c></row>"#);
        let rows = WorksheetDecoder::new(&ss).decode(&xml).unwrap();
        assert_eq!(rows[0].get("XFD").unwrap().value, "last");
    }
}
