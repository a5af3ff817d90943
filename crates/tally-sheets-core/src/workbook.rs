//! Workbook properties and the frozen snapshot

use crate::sheet::SheetSpec;
use chrono::{DateTime, Utc};

/// Workbook-level document properties
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkbookProperties {
    /// Document title
    pub title: String,
    /// Document author
    pub author: String,
    /// Generating application name
    pub application: String,
    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl WorkbookProperties {
    /// Create properties with a title and author
    pub fn new<T, A>(title: T, author: A) -> Self
    where
        T: Into<String>,
        A: Into<String>,
    {
        Self {
            title: title.into(),
            author: author.into(),
            ..Self::default()
        }
    }
}

impl Default for WorkbookProperties {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            application: "tally-sheets".into(),
            created: Utc::now(),
        }
    }
}

/// The immutable workbook produced by a finished builder session
///
/// Consumers (file writers, report generators) read sheets through the
/// accessors below; there is no mutation surface. The snapshot carries no
/// formula-validity concerns — the session that produced it already
/// rejected cycles and structural violations.
#[derive(Debug)]
pub struct WorkbookSnapshot {
    properties: WorkbookProperties,
    sheets: Vec<SheetSpec>,
}

impl WorkbookSnapshot {
    /// Assemble a snapshot from finalized parts
    ///
    /// Called by the builder at finalize time; not intended for direct use.
    pub fn new(properties: WorkbookProperties, sheets: Vec<SheetSpec>) -> Self {
        Self { properties, sheets }
    }

    /// Workbook properties
    pub fn properties(&self) -> &WorkbookProperties {
        &self.properties
    }

    /// Number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get a sheet by index
    pub fn sheet(&self, index: usize) -> Option<&SheetSpec> {
        self.sheets.get(index)
    }

    /// Get a sheet by name
    pub fn sheet_by_name(&self, name: &str) -> Option<&SheetSpec> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    /// Iterate over sheets in declaration order
    pub fn sheets(&self) -> impl Iterator<Item = &SheetSpec> {
        self.sheets.iter()
    }
}
