//! XLSX extraction pipeline.

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};
use crate::model::Row;
use crate::options::ExtractOptions;
use crate::records::{build_records, RecordTable};
use std::io::{Read, Seek};

use super::shared_strings::SharedStrings;
use super::worksheet::WorksheetDecoder;

/// Reader for XLSX workbooks held in memory.
///
/// Construction loads the container and the shared string table. Worksheet
/// parts are decoded on demand, in part-name order.
pub struct XlsxReader {
    container: OoxmlContainer,
    shared_strings: SharedStrings,
    worksheets: Vec<String>,
    options: ExtractOptions,
}

impl XlsxReader {
    /// Create a reader from bytes with default options.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with_options(data, ExtractOptions::default())
    }

    /// Create a reader from bytes.
    pub fn from_bytes_with_options(data: Vec<u8>, options: ExtractOptions) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container, options)
    }

    /// Create a reader from a seekable source.
    pub fn from_reader<R: Read + Seek>(reader: R, options: ExtractOptions) -> Result<Self> {
        let container = OoxmlContainer::from_reader(reader)?;
        Self::from_container(container, options)
    }

    /// Create a reader from an opened container.
    ///
    /// Fails with [`Error::EmptyWorkbook`] when no worksheet part exists.
    pub fn from_container(container: OoxmlContainer, options: ExtractOptions) -> Result<Self> {
        let worksheets = container.worksheet_parts(&options.worksheet_prefix);
        if worksheets.is_empty() {
            return Err(Error::EmptyWorkbook);
        }

        let shared_strings = match container.read_optional_xml(&options.shared_strings_part)? {
            Some(xml) => SharedStrings::parse(&xml)?,
            None => {
                log::debug!(
                    "no shared string part at {}, using an empty table",
                    options.shared_strings_part
                );
                SharedStrings::default()
            }
        };

        Ok(Self {
            container,
            shared_strings,
            worksheets,
            options,
        })
    }

    /// Worksheet part names in processing order.
    pub fn worksheet_parts(&self) -> &[String] {
        &self.worksheets
    }

    /// The loaded shared string table.
    pub fn shared_strings(&self) -> &SharedStrings {
        &self.shared_strings
    }

    /// The options in effect.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Get a reference to the container.
    pub fn container(&self) -> &OoxmlContainer {
        &self.container
    }

    /// Decode a single worksheet part.
    pub fn read_sheet(&self, part: &str) -> Result<Vec<Row>> {
        let xml = self.container.read_xml(part)?;
        let rows = self.decoder().decode(&xml)?;
        log::debug!("decoded {} rows from {}", rows.len(), part);
        Ok(rows)
    }

    /// Decode every worksheet and concatenate their rows.
    ///
    /// The first part that fails to decode aborts the whole read.
    pub fn read_rows(&self) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        for part in &self.worksheets {
            rows.extend(self.read_sheet(part)?);
        }
        Ok(rows)
    }

    /// Decode all worksheets and build header-named records.
    pub fn extract(&self) -> Result<RecordTable> {
        let rows = self.read_rows()?;
        let table = build_records(&rows);
        log::debug!(
            "extracted {} records from {} rows",
            table.records.len(),
            rows.len()
        );
        Ok(table)
    }

    fn decoder(&self) -> WorksheetDecoder<'_> {
        WorksheetDecoder::new(&self.shared_strings)
            .with_unicode_normalization(self.options.normalize_unicode)
    }
}

impl std::fmt::Debug for XlsxReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxReader")
            .field("worksheets", &self.worksheets)
            .field("shared_strings", &self.shared_strings.len())
            .finish()
    }
}
