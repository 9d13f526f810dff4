//! Spreadsheet column letters.
//!
//! Columns are written in bijective base-26: there is no zero digit, so
//! `A` is 0, `Z` is 25, `AA` is 26 and `AZ` is 51.
//!
//! ```
//! use unsheet::column::{column_to_index, index_to_column};
//!
//! assert_eq!(column_to_index("AA"), Some(26));
//! assert_eq!(index_to_column(26), "AA");
//! ```

/// Largest column index accepted (`XFD`, the last column Excel allows).
pub const MAX_COLUMN_INDEX: u32 = 16_383;

/// Convert column letters to a zero-based index.
///
/// Letters are case-insensitive. Returns `None` for an empty string, any
/// non-letter character, or a column past [`MAX_COLUMN_INDEX`].
pub fn column_to_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }

    let mut col: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A' + 1) as u32;
        col = col.checked_mul(26)?.checked_add(digit)?;
        if col > MAX_COLUMN_INDEX + 1 {
            return None;
        }
    }

    Some(col - 1)
}

/// Convert a zero-based index to upper-case column letters.
pub fn index_to_column(index: u32) -> String {
    let mut letters = Vec::new();
    let mut n = index as u64 + 1;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    letters.reverse();
    // Only ASCII letters were pushed.
    String::from_utf8_lossy(&letters).into_owned()
}

/// Split a cell reference such as `AB12` into its letters and row digits.
///
/// Leading letters form the column; everything after them is returned as
/// the row part, unparsed. `$` anchors are ignored.
pub fn split_reference(reference: &str) -> (&str, &str) {
    let reference = reference.trim_start_matches('$');
    let split = reference
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(reference.len());
    let (letters, rest) = reference.split_at(split);
    (letters, rest.trim_start_matches('$'))
}

/// Extract the row number of a cell reference, if it has one.
pub fn reference_row(reference: &str) -> Option<u32> {
    split_reference(reference).1.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_letters() {
        assert_eq!(column_to_index("A"), Some(0));
        assert_eq!(column_to_index("Z"), Some(25));
        assert_eq!(index_to_column(0), "A");
        assert_eq!(index_to_column(25), "Z");
    }

    #[test]
    fn test_two_letters() {
        assert_eq!(column_to_index("AA"), Some(26));
        assert_eq!(column_to_index("AZ"), Some(51));
        assert_eq!(column_to_index("BA"), Some(52));
        assert_eq!(column_to_index("ZZ"), Some(701));
        assert_eq!(index_to_column(26), "AA");
        assert_eq!(index_to_column(51), "AZ");
        assert_eq!(index_to_column(52), "BA");
        assert_eq!(index_to_column(701), "ZZ");
    }

    #[test]
    fn test_aa_round_trip() {
        let index = column_to_index("AA").unwrap();
        assert_eq!(index, 26);
        assert_eq!(index_to_column(index), "AA");
    }

    #[test]
    fn test_round_trip_across_widths() {
        for index in [0, 1, 25, 26, 27, 675, 676, 701, 702, 16_383] {
            let letters = index_to_column(index);
            assert_eq!(column_to_index(&letters), Some(index), "{letters}");
        }
    }

    #[test]
    fn test_lower_case_accepted() {
        assert_eq!(column_to_index("ab"), Some(27));
    }

    #[test]
    fn test_invalid_letters() {
        assert_eq!(column_to_index(""), None);
        assert_eq!(column_to_index("A1"), None);
        assert_eq!(column_to_index("Ä"), None);
        assert_eq!(column_to_index("XFE"), None);
        assert_eq!(column_to_index("AAAAAAAAAAAAAAAA"), None);
    }

    #[test]
    fn test_split_reference() {
        assert_eq!(split_reference("C7"), ("C", "7"));
        assert_eq!(split_reference("AB12"), ("AB", "12"));
        assert_eq!(split_reference("$D$4"), ("D", "4"));
        assert_eq!(split_reference("AA"), ("AA", ""));
        assert_eq!(reference_row("XFD1048576"), Some(1_048_576));
        assert_eq!(reference_row("B"), None);
    }
}
