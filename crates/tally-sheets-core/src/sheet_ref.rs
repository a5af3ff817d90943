//! Sheet-qualified references
//!
//! Formulas that span sheets qualify a cell or range with the sheet name,
//! e.g. `Budget!B2` or `'Cash Flow'!A1:A12`. Names that are not plain
//! identifiers are single-quoted, with embedded quotes doubled.

use crate::error::{Error, Result};
use crate::reference::{CellRef, RangeRef};
use std::fmt;
use std::str::FromStr;

/// The cell or range a [`SheetRef`] points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RefTarget {
    /// Single cell
    Cell(CellRef),
    /// Rectangular range
    Range(RangeRef),
}

impl fmt::Display for RefTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefTarget::Cell(c) => write!(f, "{}", c),
            RefTarget::Range(r) => write!(f, "{}", r),
        }
    }
}

/// A reference qualified with its owning sheet
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetRef {
    /// Sheet name (non-empty)
    sheet: String,
    /// Referenced cell or range
    target: RefTarget,
}

impl SheetRef {
    /// Create a sheet-qualified reference
    pub fn new<S: Into<String>>(sheet: S, target: RefTarget) -> Result<Self> {
        let sheet = sheet.into();
        if sheet.is_empty() {
            return Err(Error::InvalidReference(
                "sheet name cannot be empty".into(),
            ));
        }
        Ok(Self { sheet, target })
    }

    /// Create a sheet-qualified cell reference
    pub fn cell<S: Into<String>>(sheet: S, cell: CellRef) -> Result<Self> {
        Self::new(sheet, RefTarget::Cell(cell))
    }

    /// Create a sheet-qualified range reference
    pub fn range<S: Into<String>>(sheet: S, range: RangeRef) -> Result<Self> {
        Self::new(sheet, RefTarget::Range(range))
    }

    /// The owning sheet name
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// The referenced cell or range
    pub fn target(&self) -> RefTarget {
        self.target
    }

    /// Parse `Sheet1!A1` / `'My Sheet'!A1:B2` notation
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        let (sheet, rest) = if let Some(stripped) = s.strip_prefix('\'') {
            // Quoted sheet name; embedded quotes are doubled
            let mut name = String::new();
            let mut chars = stripped.char_indices().peekable();
            let mut close = None;
            while let Some((i, c)) = chars.next() {
                if c == '\'' {
                    if chars.peek().map(|(_, c2)| *c2) == Some('\'') {
                        name.push('\'');
                        chars.next();
                    } else {
                        close = Some(i);
                        break;
                    }
                } else {
                    name.push(c);
                }
            }
            let close = close.ok_or_else(|| {
                Error::InvalidReference(format!("unterminated quoted sheet name in '{}'", s))
            })?;
            (name, &stripped[close + 1..])
        } else {
            let bang = s.find('!').ok_or_else(|| {
                Error::InvalidReference(format!("missing '!' separator in '{}'", s))
            })?;
            (s[..bang].to_string(), &s[bang..])
        };

        let rest = rest.strip_prefix('!').ok_or_else(|| {
            Error::InvalidReference(format!("missing '!' separator in '{}'", s))
        })?;

        let target = if rest.contains(':') {
            RefTarget::Range(RangeRef::parse(rest)?)
        } else {
            RefTarget::Cell(CellRef::parse(rest)?)
        };

        Self::new(sheet, target)
    }

    fn needs_quoting(&self) -> bool {
        self.sheet
            .chars()
            .any(|c| !c.is_ascii_alphanumeric() && c != '_')
            || self.sheet.starts_with(|c: char| c.is_ascii_digit())
    }
}

impl fmt::Display for SheetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.needs_quoting() {
            write!(f, "'{}'!{}", self.sheet.replace('\'', "''"), self.target)
        } else {
            write!(f, "{}!{}", self.sheet, self.target)
        }
    }
}

impl FromStr for SheetRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_plain() {
        let r = SheetRef::parse("Budget!B2").unwrap();
        assert_eq!(r.sheet(), "Budget");
        assert_eq!(r.target(), RefTarget::Cell(CellRef::new(1, 1)));
    }

    #[test]
    fn test_parse_range() {
        let r = SheetRef::parse("Budget!A1:A12").unwrap();
        assert_eq!(
            r.target(),
            RefTarget::Range(RangeRef::from_indices(0, 0, 11, 0))
        );
    }

    #[test]
    fn test_parse_quoted() {
        let r = SheetRef::parse("'Cash Flow'!A1").unwrap();
        assert_eq!(r.sheet(), "Cash Flow");

        let r = SheetRef::parse("'It''s 2026'!A1").unwrap();
        assert_eq!(r.sheet(), "It's 2026");
    }

    #[test]
    fn test_parse_errors() {
        assert!(SheetRef::parse("NoSeparator").is_err());
        assert!(SheetRef::parse("!A1").is_err());
        assert!(SheetRef::parse("'Unterminated!A1").is_err());
        assert!(SheetRef::parse("Sheet!NotARef").is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for s in ["Budget!B2", "Budget!A1:A12", "'Cash Flow'!A1", "'It''s 2026'!C3"] {
            let r = SheetRef::parse(s).unwrap();
            assert_eq!(r.to_string(), s);
            assert_eq!(SheetRef::parse(&r.to_string()).unwrap(), r);
        }
    }
}
