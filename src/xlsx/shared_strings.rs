//! XLSX shared strings parsing.

use crate::error::{Error, Result};
use quick_xml::events::Event;

use super::text::{collect_text_runs, reader_for};

/// Shared strings table.
///
/// Entries keep their position in the part; duplicates are not merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    /// Parse shared strings from XML content.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut strings = Vec::new();
        let mut reader = reader_for(xml);
        let mut buf = Vec::new();
        let mut item_buf = Vec::new();
        // Open elements outside of `<si>` items
        let mut depth = 0usize;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    if e.name().local_name().as_ref() == b"si" {
                        strings.push(collect_text_runs(&mut reader, &mut item_buf)?);
                    } else {
                        depth += 1;
                    }
                }
                Ok(Event::Empty(e)) if e.name().local_name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(_)) => depth = depth.saturating_sub(1),
                Ok(Event::Eof) if depth > 0 => {
                    return Err(Error::XmlParse(
                        "shared strings part ends inside an open element".to_string(),
                    ));
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        log::debug!("loaded {} shared strings", strings.len());
        Ok(Self { strings })
    }

    /// Get a string by index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|s| s.as_str())
    }

    /// Number of strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Iterate strings in table order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(|s| s.as_str())
    }
}
