//! Extraction options configuration.

/// Default location of the shared string table.
pub const DEFAULT_SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// Default directory holding worksheet parts.
pub const DEFAULT_WORKSHEET_PREFIX: &str = "xl/worksheets/";

/// Options for extracting records from a workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Part name of the shared string table
    pub shared_strings_part: String,

    /// Directory prefix of worksheet parts
    pub worksheet_prefix: String,

    /// Apply Unicode NFC normalization to decoded text
    pub normalize_unicode: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            shared_strings_part: DEFAULT_SHARED_STRINGS_PART.to_string(),
            worksheet_prefix: DEFAULT_WORKSHEET_PREFIX.to_string(),
            normalize_unicode: false,
        }
    }
}

impl ExtractOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read shared strings from a different part.
    pub fn with_shared_strings_part(mut self, part: impl Into<String>) -> Self {
        self.shared_strings_part = part.into();
        self
    }

    /// Look for worksheets under a different directory.
    ///
    /// A trailing `/` is added when missing.
    pub fn with_worksheet_prefix(mut self, prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        self.worksheet_prefix = prefix;
        self
    }

    /// Enable or disable NFC normalization of cell text.
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ExtractOptions::default();
        assert_eq!(opts.shared_strings_part, "xl/sharedStrings.xml");
        assert_eq!(opts.worksheet_prefix, "xl/worksheets/");
        assert!(!opts.normalize_unicode);
    }

    #[test]
    fn test_builder() {
        let opts = ExtractOptions::new()
            .with_worksheet_prefix("custom/sheets")
            .with_shared_strings_part("custom/strings.xml")
            .with_unicode_normalization(true);
        assert_eq!(opts.worksheet_prefix, "custom/sheets/");
        assert_eq!(opts.shared_strings_part, "custom/strings.xml");
        assert!(opts.normalize_unicode);
    }
}
