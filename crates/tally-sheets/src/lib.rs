//! # tally-sheets
//!
//! A Rust library for building spreadsheet documents — budgets, financial
//! statements, engineering worksheets — through a fluent, validated builder
//! session.
//!
//! ## Features
//!
//! - Fluent workbook construction (sheets, rows, cells, named ranges)
//! - Formula building with per-formula dependency capture
//! - Circular-reference detection before anything reaches a file
//! - Structural validation at every mutation (selected sheet/row context,
//!   unique sheet names, non-empty sheets at finalize)
//! - CSV export of finished snapshots
//!
//! ## Example
//!
//! ```rust
//! use tally_sheets::prelude::*;
//!
//! let mut wb = WorkbookBuilder::new();
//! wb.add_sheet("Budget").unwrap();
//!
//! wb.add_row().unwrap();
//! wb.set_cell(0, "Rent").unwrap().set_cell(1, 1200.0).unwrap();
//!
//! wb.add_row().unwrap();
//! wb.set_cell(0, "Utilities").unwrap().set_cell(1, 180.0).unwrap();
//!
//! // Total row: =SUM(B1:B2), validated against the dependency graph
//! let total = FormulaBuilder::begin("SUM")
//!     .unwrap()
//!     .range(RangeRef::parse("B1:B2").unwrap())
//!     .build(default_catalog())
//!     .unwrap();
//!
//! wb.add_row().unwrap();
//! wb.set_cell(0, "Total").unwrap();
//! wb.set_formula(1, total).unwrap();
//!
//! let snapshot = wb.build().unwrap();
//! let budget = snapshot.sheet_by_name("Budget").unwrap();
//! assert_eq!(
//!     budget.cell_at(2, 1).unwrap().value.formula_text(),
//!     Some("=SUM(B1:B2)")
//! );
//! ```

pub mod builder;
pub mod prelude;

pub use builder::WorkbookBuilder;

// Re-export core types
pub use tally_sheets_core::{
    validate_identifier,
    validate_sheet_name,
    // Reference types
    CellRef,
    // Spec types
    CellSpec,
    CellValue,
    ColumnSpec,
    // Error types
    Error,
    NameRegistry,
    NamedRange,
    RangeRef,
    RefTarget,
    Result,
    RowSpec,
    SheetRef,
    SheetSpec,
    // Main types
    WorkbookProperties,
    WorkbookSnapshot,
    // Constants
    MAX_SHEET_NAME_LEN,
};

// Re-export formula types
pub use tally_sheets_formula::{
    default_catalog, BuiltFormula, Dependency, DependencyGraph, FormulaBuilder, FormulaError,
    FormulaResult, FunctionCatalog, FunctionCategory, FunctionDef, RefNode,
};

// Re-export I/O types
pub use tally_sheets_csv::{CsvError, CsvResult, CsvWriteOptions, CsvWriter, LineTerminator};

use std::path::Path;

/// Extension trait adding file export to finished snapshots
pub trait SnapshotWriteExt {
    /// Save the snapshot to a file, picking the format by extension
    ///
    /// Currently CSV only; writes the first sheet, matching the format's
    /// single-table shape.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Save one named sheet as CSV
    fn save_sheet_csv<P: AsRef<Path>>(&self, sheet_name: &str, path: P) -> Result<()>;
}

impl SnapshotWriteExt for WorkbookSnapshot {
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("csv") => {
                let sheet = self
                    .sheet(0)
                    .ok_or_else(|| Error::builder("no sheets to save"))?;
                CsvWriter::write_file(sheet, path, &CsvWriteOptions::default())
                    .map_err(|e| Error::builder(e.to_string()))
            }
            _ => Err(Error::builder(format!(
                "unsupported file format: {}",
                path.display()
            ))),
        }
    }

    fn save_sheet_csv<P: AsRef<Path>>(&self, sheet_name: &str, path: P) -> Result<()> {
        let sheet = self
            .sheet_by_name(sheet_name)
            .ok_or_else(|| Error::builder(format!("no sheet named '{}'", sheet_name)))?;
        CsvWriter::write_file(sheet, path, &CsvWriteOptions::default())
            .map_err(|e| Error::builder(e.to_string()))
    }
}
