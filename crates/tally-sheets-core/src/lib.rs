//! # tally-sheets-core
//!
//! Core data structures for the tally-sheets spreadsheet builder.
//!
//! This crate provides the fundamental types used throughout tally-sheets:
//! - [`CellRef`] and [`RangeRef`] - cell addressing and ranges
//! - [`SheetRef`] - sheet-qualified references for cross-sheet formulas
//! - [`NamedRange`] - identifier-to-range bindings
//! - [`CellValue`], [`CellSpec`], [`RowSpec`], [`ColumnSpec`], [`SheetSpec`] -
//!   the structural records a builder session assembles
//! - [`WorkbookSnapshot`] - the immutable result handed to file writers
//!
//! ## Example
//!
//! ```rust
//! use tally_sheets_core::{CellRef, RangeRef};
//!
//! let cell = CellRef::parse("B7").unwrap();
//! assert_eq!((cell.row, cell.col), (6, 1));
//!
//! let range = RangeRef::parse("A1:C10").unwrap();
//! assert_eq!(range.cell_count(), 30);
//! ```

pub mod error;
pub mod named_range;
pub mod reference;
pub mod sheet;
pub mod sheet_ref;
pub mod spec;
pub mod value;
pub mod workbook;

// Re-exports for convenience
pub use error::{Error, Result};
pub use named_range::{validate_identifier, NameRegistry, NamedRange};
pub use reference::{CellRef, RangeRef};
pub use sheet::{validate_sheet_name, SheetSpec};
pub use sheet_ref::{RefTarget, SheetRef};
pub use spec::{CellSpec, ColumnSpec, RowSpec};
pub use value::CellValue;
pub use workbook::{WorkbookProperties, WorkbookSnapshot};

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
