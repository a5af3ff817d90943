//! Cell, row, and column spec records
//!
//! These are the value records a builder session assembles. They stay
//! mutable inside the session and are frozen wholesale into the workbook
//! snapshot at finalize time.

use crate::reference::CellRef;
use crate::value::CellValue;
use std::collections::BTreeMap;

/// A single cell: position, value, optional style
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellSpec {
    /// Cell position
    pub position: CellRef,
    /// Cell value
    pub value: CellValue,
    /// Style identifier (resolved by the writer)
    pub style: Option<String>,
}

impl CellSpec {
    /// Create a cell with a value and no style
    pub fn new(position: CellRef, value: CellValue) -> Self {
        Self {
            position,
            value,
            style: None,
        }
    }

    /// Set the style identifier
    pub fn with_style<S: Into<String>>(mut self, style: S) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// A row: sparse cells keyed by column, plus row-level metadata
///
/// Not every column index need be populated; iteration yields cells in
/// column order.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowSpec {
    /// Row index (0-based)
    pub index: u32,
    /// Cells by column index
    cells: BTreeMap<u32, CellSpec>,
    /// Custom height (None = default)
    pub height: Option<f64>,
    /// Row-level style identifier
    pub style: Option<String>,
}

impl RowSpec {
    /// Create an empty row
    pub fn new(index: u32) -> Self {
        Self {
            index,
            cells: BTreeMap::new(),
            height: None,
            style: None,
        }
    }

    /// Set or replace the cell at a column
    pub fn set_cell(&mut self, col: u32, cell: CellSpec) {
        self.cells.insert(col, cell);
    }

    /// Get the cell at a column
    pub fn cell(&self, col: u32) -> Option<&CellSpec> {
        self.cells.get(&col)
    }

    /// Get the cell at a column, mutably
    pub fn cell_mut(&mut self, col: u32) -> Option<&mut CellSpec> {
        self.cells.get_mut(&col)
    }

    /// Remove the cell at a column
    pub fn clear_cell(&mut self, col: u32) -> Option<CellSpec> {
        self.cells.remove(&col)
    }

    /// Iterate over populated cells in column order
    pub fn cells(&self) -> impl Iterator<Item = (u32, &CellSpec)> {
        self.cells.iter().map(|(col, cell)| (*col, cell))
    }

    /// Highest populated column index, if any
    pub fn max_col(&self) -> Option<u32> {
        self.cells.keys().next_back().copied()
    }

    /// Whether the row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of populated cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// Column-level metadata, independent of row contents
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnSpec {
    /// Column index (0-based)
    pub index: u32,
    /// Custom width (None = default)
    pub width: Option<f64>,
    /// Column-level style identifier
    pub style: Option<String>,
    /// Column is hidden
    pub hidden: bool,
}

impl ColumnSpec {
    /// Create a column with default settings
    pub fn new(index: u32) -> Self {
        Self {
            index,
            width: None,
            style: None,
            hidden: false,
        }
    }

    /// Set the width
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Check if this column carries any custom settings
    pub fn has_custom_settings(&self) -> bool {
        self.width.is_some() || self.style.is_some() || self.hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sparse_row() {
        let mut row = RowSpec::new(0);
        row.set_cell(3, CellSpec::new(CellRef::new(0, 3), CellValue::from(1.0)));
        row.set_cell(0, CellSpec::new(CellRef::new(0, 0), CellValue::from(2.0)));

        assert_eq!(row.cell_count(), 2);
        assert_eq!(row.max_col(), Some(3));
        assert!(row.cell(1).is_none());

        // Column order, not insertion order
        let cols: Vec<u32> = row.cells().map(|(c, _)| c).collect();
        assert_eq!(cols, vec![0, 3]);
    }

    #[test]
    fn test_cell_replacement() {
        let mut row = RowSpec::new(0);
        row.set_cell(0, CellSpec::new(CellRef::new(0, 0), CellValue::from(1.0)));
        row.set_cell(0, CellSpec::new(CellRef::new(0, 0), CellValue::from(9.0)));

        assert_eq!(row.cell(0).unwrap().value.as_number(), Some(9.0));
        assert_eq!(row.cell_count(), 1);
    }

    #[test]
    fn test_column_settings() {
        let col = ColumnSpec::new(2).with_width(14.5);
        assert!(col.has_custom_settings());
        assert!(!ColumnSpec::new(0).has_custom_settings());
    }
}
