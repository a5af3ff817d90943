//! Cell and range reference types
//!
//! References use A1-style notation: column letters followed by a 1-based
//! row number. Internally both indices are 0-based and unbounded upward.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A single cell reference (e.g., "B7")
///
/// Parsing accepts `$` absolute markers (`$B$7`) and discards them; the
/// model stores plain indices, so formatting always produces the canonical
/// unprefixed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRef {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., AA=26, ...)
    pub col: u32,
}

impl CellRef {
    /// Create a new cell reference
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse a cell reference from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use tally_sheets_core::CellRef;
    ///
    /// let r = CellRef::parse("A1").unwrap();
    /// assert_eq!(r.row, 0);
    /// assert_eq!(r.col, 0);
    ///
    /// // Absolute markers are accepted and discarded
    /// assert_eq!(CellRef::parse("$B$2").unwrap(), CellRef::new(1, 1));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidReference("empty reference".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        // Column letters
        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }

        if pos == col_start {
            return Err(Error::InvalidReference(format!(
                "no column letters in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(&s[col_start..pos])?;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        // Row number
        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(Error::InvalidReference(format!("no row number in '{}'", s)));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidReference(format!("invalid row number in '{}'", s)))?;

        // Rows are 1-based in notation, 0-based internally
        if row == 0 {
            return Err(Error::InvalidReference(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        Ok(Self { row: row - 1, col })
    }

    /// Convert a column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = col as u64 + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to an index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::InvalidReference("empty column letters".into()));
        }

        let mut col: u64 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidReference(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u64 - 'A' as u64 + 1);
            if col > u32::MAX as u64 + 1 {
                return Err(Error::InvalidReference(format!(
                    "column '{}' out of range",
                    letters
                )));
            }
        }

        Ok((col - 1) as u32)
    }

    /// Format as an A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }

    /// Create a range from this reference to another
    pub fn to(&self, other: CellRef) -> RangeRef {
        RangeRef::new(*self, other)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A rectangular range of cells (e.g., "A1:B10")
///
/// Ranges are direction-agnostic: construction normalizes the pair so that
/// `start` is the top-left corner and `end` the bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeRef {
    /// Top-left corner
    pub start: CellRef,
    /// Bottom-right corner
    pub end: CellRef,
}

impl RangeRef {
    /// Create a new range, reordering a reversed pair
    pub fn new(a: CellRef, b: CellRef) -> Self {
        Self {
            start: CellRef::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellRef::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Create a range from row/column indices
    pub fn from_indices(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self::new(
            CellRef::new(start_row, start_col),
            CellRef::new(end_row, end_col),
        )
    }

    /// Create a single-cell range
    pub fn single(cell: CellRef) -> Self {
        Self {
            start: cell,
            end: cell,
        }
    }

    /// Parse a range from A1:B10 notation
    ///
    /// A bare cell reference parses as a single-cell range.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if let Some(colon_pos) = s.find(':') {
            let start = CellRef::parse(&s[..colon_pos])
                .map_err(|e| Error::InvalidRange(format!("bad start in '{}': {}", s, e)))?;
            let end = CellRef::parse(&s[colon_pos + 1..])
                .map_err(|e| Error::InvalidRange(format!("bad end in '{}': {}", s, e)))?;
            Ok(Self::new(start, end))
        } else {
            let cell = CellRef::parse(s)
                .map_err(|e| Error::InvalidRange(format!("'{}': {}", s, e)))?;
            Ok(Self::single(cell))
        }
    }

    /// Whether this range covers exactly one cell
    pub fn is_single_cell(&self) -> bool {
        self.start == self.end
    }

    /// Reject a degenerate single-cell range
    ///
    /// Most call sites accept single-cell ranges; the ones that require an
    /// actual span validate through this.
    pub fn deny_single_cell(self) -> Result<Self> {
        if self.is_single_cell() {
            return Err(Error::InvalidRange(format!(
                "'{}' is a single cell, not a span",
                self
            )));
        }
        Ok(self)
    }

    /// Check if a cell lies within this range
    pub fn contains(&self, cell: &CellRef) -> bool {
        cell.row >= self.start.row
            && cell.row <= self.end.row
            && cell.col >= self.start.col
            && cell.col <= self.end.col
    }

    /// Number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Number of columns in the range
    pub fn col_count(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    /// Total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.col_count() as u64
    }

    /// Check if this range overlaps another
    pub fn overlaps(&self, other: &RangeRef) -> bool {
        self.start.row <= other.end.row
            && self.end.row >= other.start.row
            && self.start.col <= other.end.col
            && self.end.col >= other.start.col
    }

    /// Intersection of two ranges, if any
    pub fn intersect(&self, other: &RangeRef) -> Option<RangeRef> {
        if !self.overlaps(other) {
            return None;
        }

        Some(RangeRef::from_indices(
            self.start.row.max(other.start.row),
            self.start.col.max(other.start.col),
            self.end.row.min(other.end.row),
            self.end.col.min(other.end.col),
        ))
    }

    /// Iterate over all cells in the range (row by row)
    pub fn cells(&self) -> RangeCellIter {
        RangeCellIter {
            range: *self,
            current_row: self.start.row,
            current_col: self.start.col,
            done: false,
        }
    }

    /// Format as an A1:B10 string (single-cell ranges collapse to A1 form)
    pub fn to_a1_string(&self) -> String {
        if self.is_single_cell() {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start.to_a1_string(), self.end.to_a1_string())
        }
    }
}

impl fmt::Display for RangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for RangeRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Iterator over cells in a range
pub struct RangeCellIter {
    range: RangeRef,
    current_row: u32,
    current_col: u32,
    done: bool,
}

impl Iterator for RangeCellIter {
    type Item = CellRef;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let cell = CellRef::new(self.current_row, self.current_col);

        if self.current_col < self.range.end.col {
            self.current_col += 1;
        } else if self.current_row < self.range.end.row {
            self.current_col = self.range.start.col;
            self.current_row += 1;
        } else {
            self.done = true;
        }

        Some(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(CellRef::column_to_letters(0), "A");
        assert_eq!(CellRef::column_to_letters(1), "B");
        assert_eq!(CellRef::column_to_letters(25), "Z");
        assert_eq!(CellRef::column_to_letters(26), "AA");
        assert_eq!(CellRef::column_to_letters(27), "AB");
        assert_eq!(CellRef::column_to_letters(701), "ZZ");
        assert_eq!(CellRef::column_to_letters(702), "AAA");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(CellRef::letters_to_column("A").unwrap(), 0);
        assert_eq!(CellRef::letters_to_column("B").unwrap(), 1);
        assert_eq!(CellRef::letters_to_column("Z").unwrap(), 25);
        assert_eq!(CellRef::letters_to_column("AA").unwrap(), 26);
        assert_eq!(CellRef::letters_to_column("ZZ").unwrap(), 701);
        assert_eq!(CellRef::letters_to_column("AAA").unwrap(), 702);

        // Case insensitive
        assert_eq!(CellRef::letters_to_column("a").unwrap(), 0);
        assert_eq!(CellRef::letters_to_column("aa").unwrap(), 26);
    }

    #[test]
    fn test_parse() {
        let r = CellRef::parse("A1").unwrap();
        assert_eq!(r, CellRef::new(0, 0));

        let r = CellRef::parse("B7").unwrap();
        assert_eq!(r, CellRef::new(6, 1));

        // Absolute markers are discarded
        assert_eq!(CellRef::parse("$A$1").unwrap(), CellRef::new(0, 0));
        assert_eq!(CellRef::parse("$A1").unwrap(), CellRef::new(0, 0));
        assert_eq!(CellRef::parse("A$1").unwrap(), CellRef::new(0, 0));
    }

    #[test]
    fn test_parse_errors() {
        assert!(CellRef::parse("").is_err());
        assert!(CellRef::parse("A").is_err());
        assert!(CellRef::parse("1").is_err());
        assert!(CellRef::parse("A0").is_err()); // rows are 1-based in notation
        assert!(CellRef::parse("1A").is_err());
        assert!(CellRef::parse("A-1").is_err());
        assert!(CellRef::parse("A1B2").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(CellRef::new(0, 0).to_string(), "A1");
        assert_eq!(CellRef::new(99, 2).to_string(), "C100");
        assert_eq!(CellRef::new(6, 1).to_string(), "B7");
    }

    #[test]
    fn test_range_parse() {
        let range = RangeRef::parse("A1:B2").unwrap();
        assert_eq!(range.start, CellRef::new(0, 0));
        assert_eq!(range.end, CellRef::new(1, 1));

        // Single cell
        let range = RangeRef::parse("C3").unwrap();
        assert!(range.is_single_cell());
        assert_eq!(range.start, CellRef::new(2, 2));

        assert!(RangeRef::parse("A1:").is_err());
        assert!(RangeRef::parse(":B2").is_err());
        assert!(RangeRef::parse("A0:B2").is_err());
    }

    #[test]
    fn test_range_normalization() {
        // Reversed endpoints are reordered, not rejected
        let range = RangeRef::parse("C10:A1").unwrap();
        assert_eq!(range.start, CellRef::new(0, 0));
        assert_eq!(range.end, CellRef::new(9, 2));
        assert_eq!(range.to_string(), "A1:C10");
    }

    #[test]
    fn test_deny_single_cell() {
        assert!(RangeRef::parse("A1:B2").unwrap().deny_single_cell().is_ok());
        assert!(RangeRef::parse("A1").unwrap().deny_single_cell().is_err());
        assert!(RangeRef::parse("A1:A1").unwrap().deny_single_cell().is_err());
    }

    #[test]
    fn test_range_contains() {
        let range = RangeRef::parse("B2:D4").unwrap();

        assert!(range.contains(&CellRef::new(1, 1))); // B2
        assert!(range.contains(&CellRef::new(3, 3))); // D4
        assert!(range.contains(&CellRef::new(2, 2))); // C3

        assert!(!range.contains(&CellRef::new(0, 0))); // A1
        assert!(!range.contains(&CellRef::new(4, 1))); // B5
    }

    #[test]
    fn test_range_overlaps() {
        let a = RangeRef::parse("A1:C3").unwrap();
        let b = RangeRef::parse("C3:E5").unwrap();
        let c = RangeRef::parse("D4:E5").unwrap();

        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert_eq!(a.intersect(&b), Some(RangeRef::parse("C3").unwrap()));
        assert_eq!(a.intersect(&c), None);
    }

    #[test]
    fn test_range_counts() {
        let range = RangeRef::parse("A1:C10").unwrap();
        assert_eq!(range.row_count(), 10);
        assert_eq!(range.col_count(), 3);
        assert_eq!(range.cell_count(), 30);

        assert_eq!(RangeRef::parse("A1").unwrap().cell_count(), 1);
    }

    #[test]
    fn test_range_iterator() {
        let range = RangeRef::parse("A1:B2").unwrap();
        let cells: Vec<_> = range.cells().collect();

        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0], CellRef::new(0, 0)); // A1
        assert_eq!(cells[1], CellRef::new(0, 1)); // B1
        assert_eq!(cells[2], CellRef::new(1, 0)); // A2
        assert_eq!(cells[3], CellRef::new(1, 1)); // B2

        let single: Vec<_> = RangeRef::parse("C3").unwrap().cells().collect();
        assert_eq!(single, vec![CellRef::new(2, 2)]);
    }

    proptest! {
        #[test]
        fn prop_cell_roundtrip(row in 0u32..4_000_000, col in 0u32..1_000_000) {
            let r = CellRef::new(row, col);
            prop_assert_eq!(CellRef::parse(&r.to_string()).unwrap(), r);
        }

        #[test]
        fn prop_range_normalized(a_row in 0u32..10_000, a_col in 0u32..10_000,
                                 b_row in 0u32..10_000, b_col in 0u32..10_000) {
            let range = RangeRef::new(CellRef::new(a_row, a_col), CellRef::new(b_row, b_col));
            prop_assert!(range.start.row <= range.end.row);
            prop_assert!(range.start.col <= range.end.col);
            prop_assert_eq!(RangeRef::parse(&range.to_string()).unwrap(), range);
        }
    }
}
