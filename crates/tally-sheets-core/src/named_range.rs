//! Named range definitions
//!
//! Named ranges bind an identifier to a rectangular range on a sheet so
//! formulas can say `SUM(Expenses)` instead of `SUM(B2:B13)`. Names are
//! case-insensitive and unique within a builder session; redefining a name
//! replaces the prior binding. Formulas capture the binding current at the
//! time they are built, so a later redefinition never rewrites them.

use crate::error::{Error, Result};
use crate::reference::{CellRef, RangeRef};
use ahash::AHashMap;
use lazy_regex::regex_is_match;

/// Words that cannot be used as named-range identifiers
const RESERVED_WORDS: &[&str] = &["TRUE", "FALSE", "R", "C"];

/// Validate a named-range identifier
///
/// Identifiers are letters/digits/underscores, must not start with a digit,
/// must not be a reserved word, and must not look like a cell reference
/// (`A1`, `XFD10`, ...).
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidName("name cannot be empty".into()));
    }

    if !regex_is_match!(r"^[A-Za-z_][A-Za-z0-9_]*$", name) {
        return Err(Error::InvalidName(format!(
            "'{}' is not a valid identifier",
            name
        )));
    }

    let upper = name.to_uppercase();
    if RESERVED_WORDS.contains(&upper.as_str()) {
        return Err(Error::InvalidName(format!("'{}' is a reserved word", name)));
    }

    if CellRef::parse(name).is_ok() {
        return Err(Error::InvalidName(format!(
            "'{}' collides with a cell reference",
            name
        )));
    }

    Ok(())
}

/// A named range: an identifier bound to exactly one range on one sheet
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamedRange {
    /// The identifier (e.g. "Expenses", "TaxRate")
    name: String,
    /// Owning sheet name
    sheet: String,
    /// The bound range
    range: RangeRef,
}

impl NamedRange {
    /// Create a named range, validating the identifier
    pub fn new<N, S>(name: N, sheet: S, range: RangeRef) -> Result<Self>
    where
        N: Into<String>,
        S: Into<String>,
    {
        let name = name.into();
        validate_identifier(&name)?;
        Ok(Self {
            name,
            sheet: sheet.into(),
            range,
        })
    }

    /// The identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owning sheet name
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// The bound range
    pub fn range(&self) -> RangeRef {
        self.range
    }
}

/// Session-wide named-range registry with case-insensitive lookup
///
/// One registry per builder session. Defining a name that already exists
/// replaces the old binding (the replaced binding is handed back so the
/// caller can drop it from the sheet that owned it).
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    ranges: AHashMap<String, NamedRange>,
}

impl NameRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or replace a binding, returning the binding it replaced
    pub fn define(&mut self, range: NamedRange) -> Option<NamedRange> {
        self.ranges.insert(range.name.to_lowercase(), range)
    }

    /// Look up a binding by name
    pub fn get(&self, name: &str) -> Option<&NamedRange> {
        self.ranges.get(&name.to_lowercase())
    }

    /// Whether a binding exists for this name
    pub fn contains(&self, name: &str) -> bool {
        self.ranges.contains_key(&name.to_lowercase())
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether the registry holds no bindings
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Iterate over all bindings
    pub fn iter(&self) -> impl Iterator<Item = &NamedRange> {
        self.ranges.values()
    }
}
