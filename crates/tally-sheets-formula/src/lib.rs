//! # tally-sheets-formula
//!
//! Formula construction and dependency tracking for tally-sheets.
//!
//! This crate provides:
//! - [`FormulaBuilder`] - fluent formula construction with dependency capture
//! - [`FunctionCatalog`] - metadata registry for arity validation
//! - [`DependencyGraph`] - cycle detection over formula references
//!
//! ## Example
//!
//! ```rust
//! use tally_sheets_core::RangeRef;
//! use tally_sheets_formula::{default_catalog, FormulaBuilder};
//!
//! let formula = FormulaBuilder::begin("SUM")
//!     .unwrap()
//!     .range(RangeRef::parse("B2:B13").unwrap())
//!     .build(default_catalog())
//!     .unwrap();
//!
//! assert_eq!(formula.text(), "SUM(B2:B13)");
//! ```

pub mod builder;
pub mod catalog;
pub mod dependency;
pub mod error;

pub use builder::{BuiltFormula, FormulaBuilder};
pub use catalog::{default_catalog, FunctionCatalog, FunctionCategory, FunctionDef};
pub use dependency::{Dependency, DependencyGraph, RefNode};
pub use error::{FormulaError, FormulaResult};
