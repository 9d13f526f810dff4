//! ZIP container abstraction for spreadsheet packages.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::io::{Cursor, Read, Seek};

/// Rewrite a UTF-16 encoding pseudo-attribute in the XML declaration.
///
/// The text has already been decoded, so a declaration still naming UTF-16
/// would make quick-xml reinterpret it. Matching is ASCII case-insensitive
/// and limited to the declaration itself.
fn declare_utf8(content: String) -> String {
    let decl_end = match content.strip_prefix("<?xml").and_then(|_| content.find("?>")) {
        Some(end) => end,
        None => return content,
    };
    let decl = content[..decl_end].to_ascii_lowercase();
    let value = decl.find("encoding").and_then(|at| {
        let open = at + decl[at..].find(['"', '\''])?;
        let quote = decl[open..].chars().next()?;
        let close = open + 1 + decl[open + 1..].find(quote)?;
        Some((open + 1, close))
    });
    match value {
        Some((start, end)) if decl[start..end].starts_with("utf-16") => {
            format!("{}UTF-8{}", &content[..start], &content[end..])
        }
        _ => content,
    }
}

/// Decode a part's bytes into text.
///
/// Accepts UTF-8 with or without a BOM and UTF-16 in either byte order,
/// with a BOM or detected from the zero bytes ASCII markup leaves behind.
/// XML text never holds NUL, so that pattern is checked before UTF-8.
/// Anything else is malformed XML and fails with [`Error::XmlParse`].
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => decode_utf8(rest),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes).map(declare_utf8),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes).map(declare_utf8),
        [_, 0, _, 0, ..] => decode_utf16(bytes, u16::from_le_bytes).map(declare_utf8),
        [0, _, 0, _, ..] => decode_utf16(bytes, u16::from_be_bytes).map(declare_utf8),
        _ => decode_utf8(bytes),
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| Error::XmlParse(format!("part is not valid UTF-8: {}", e)))
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::XmlParse(
            "UTF-16 part has an odd number of bytes".to_string(),
        ));
    }
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::XmlParse(format!("part is not valid UTF-16: {}", e)))
}

/// In-memory view of a spreadsheet ZIP package.
///
/// The whole archive is held in memory; parts are decompressed on demand.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlContainer {
    /// Create a container from a byte vector.
    ///
    /// Fails with [`Error::ZipArchive`] when the bytes are not a ZIP archive.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use unsheet::container::OoxmlContainer;
    ///
    /// # let bytes: Vec<u8> = Vec::new();
    /// let container = OoxmlContainer::from_bytes(bytes)?;
    /// println!("{} worksheets", container.worksheet_parts("xl/worksheets/").len());
    /// # Ok::<(), unsheet::Error>(())
    /// ```
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Create a container by reading a seekable source to the end.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Read a part's raw bytes.
    ///
    /// An absent part is [`Error::MissingComponent`]; a part that cannot be
    /// decompressed or fails its checksum is [`Error::ZipArchive`].
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = match archive.by_name(path) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(Error::MissingComponent(path.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| Error::ZipArchive(format!("{}: {}", path, e)))?;
        Ok(data)
    }

    /// Read an XML part as a UTF-8 string.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        decode_xml_bytes(&bytes)
    }

    /// Read an XML part that may legitimately be absent.
    pub fn read_optional_xml(&self, path: &str) -> Result<Option<String>> {
        if !self.exists(path) {
            return Ok(None);
        }
        self.read_xml(path).map(Some)
    }

    /// Check if a part exists.
    pub fn exists(&self, path: &str) -> bool {
        let archive = self.archive.borrow();
        let found = archive.file_names().any(|n| n == path);
        found
    }

    /// List all part names.
    pub fn list_files(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        archive.file_names().map(String::from).collect()
    }

    /// List part names starting with `prefix`.
    pub fn list_files_with_prefix(&self, prefix: &str) -> Vec<String> {
        let archive = self.archive.borrow();
        archive
            .file_names()
            .filter(|n| n.starts_with(prefix))
            .map(String::from)
            .collect()
    }

    /// Worksheet parts directly under `prefix`, sorted by part name.
    ///
    /// Only `.xml` entries are returned; subdirectories such as `_rels/`
    /// are skipped. Ordering is plain byte order of the name, so
    /// `sheet10.xml` sorts before `sheet2.xml`.
    pub fn worksheet_parts(&self, prefix: &str) -> Vec<String> {
        let mut parts: Vec<String> = self
            .list_files_with_prefix(prefix)
            .into_iter()
            .filter(|name| {
                let rest = &name[prefix.len()..];
                !rest.is_empty() && !rest.contains('/') && rest.ends_with(".xml")
            })
            .collect();
        parts.sort();
        parts
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.list_files().len())
            .finish()
    }
}
