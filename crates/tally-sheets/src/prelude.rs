//! Prelude module - common imports for tally-sheets users
//!
//! ```rust
//! use tally_sheets::prelude::*;
//! ```

pub use crate::{
    default_catalog,
    // Formula types
    BuiltFormula,
    // Reference types
    CellRef,
    CellSpec,
    // Cell types
    CellValue,
    ColumnSpec,
    // I/O types
    CsvWriteOptions,
    CsvWriter,
    // Error types
    Error,
    FormulaBuilder,
    FormulaError,
    FunctionCatalog,
    NamedRange,
    RangeRef,
    Result,
    RowSpec,
    SheetRef,
    SheetSpec,
    // Extension traits
    SnapshotWriteExt,
    // Main types
    WorkbookBuilder,
    WorkbookProperties,
    WorkbookSnapshot,
};
