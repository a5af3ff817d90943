//! Formula builder
//!
//! Assembles a formula's text from a function name and a fluent argument
//! chain, recording every reference-typed argument into a dependency set
//! along the way. The builder never touches the dependency graph; the
//! session registers the returned dependencies when the formula is
//! attached to a cell.

use crate::catalog::FunctionCatalog;
use crate::dependency::Dependency;
use crate::error::{FormulaError, FormulaResult};
use tally_sheets_core::{CellRef, NamedRange, RangeRef, RefTarget, SheetRef};

/// Render a text literal per spreadsheet syntax: double-quoted, embedded
/// quotes doubled
fn quote_text(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// A finished formula: text plus the flattened set of references it
/// depends on. Immutable once returned.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltFormula {
    text: String,
    dependencies: Vec<Dependency>,
}

impl BuiltFormula {
    /// The formula text, without a leading '='
    pub fn text(&self) -> &str {
        &self.text
    }

    /// References this formula depends on, in first-use order, deduplicated
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Decompose into text and dependencies
    pub fn into_parts(self) -> (String, Vec<Dependency>) {
        (self.text, self.dependencies)
    }
}

/// Fluent builder for one formula expression
///
/// Each formula uses a fresh builder; [`FormulaBuilder::build`] consumes it.
///
/// # Example
///
/// ```
/// use tally_sheets_core::RangeRef;
/// use tally_sheets_formula::{default_catalog, FormulaBuilder};
///
/// let f = FormulaBuilder::begin("SUM")
///     .unwrap()
///     .range(RangeRef::parse("B2:B13").unwrap())
///     .build(default_catalog())
///     .unwrap();
///
/// assert_eq!(f.text(), "SUM(B2:B13)");
/// assert_eq!(f.dependencies().len(), 1);
/// ```
#[derive(Debug)]
pub struct FormulaBuilder {
    function: String,
    args: Vec<String>,
    dependencies: Vec<Dependency>,
}

impl FormulaBuilder {
    /// Start a new formula expression
    pub fn begin(function: &str) -> FormulaResult<Self> {
        let function = function.trim();
        if function.is_empty() {
            return Err(FormulaError::NoFunction);
        }

        Ok(Self {
            function: function.to_uppercase(),
            args: Vec::new(),
            dependencies: Vec::new(),
        })
    }

    fn push_dependency(&mut self, dep: Dependency) {
        if !self.dependencies.contains(&dep) {
            self.dependencies.push(dep);
        }
    }

    /// Append a numeric literal argument
    pub fn number(mut self, value: f64) -> Self {
        self.args.push(format!("{}", value));
        self
    }

    /// Append a text literal argument
    pub fn text(mut self, value: &str) -> Self {
        self.args.push(quote_text(value));
        self
    }

    /// Append a boolean literal argument
    pub fn boolean(mut self, value: bool) -> Self {
        let rendered = if value { "TRUE" } else { "FALSE" };
        self.args.push(rendered.into());
        self
    }

    /// Append a cell reference argument (resolved against the sheet the
    /// formula is attached to)
    pub fn cell(mut self, cell: CellRef) -> Self {
        self.args.push(cell.to_string());
        self.push_dependency(Dependency::Cell { sheet: None, cell });
        self
    }

    /// Append a range reference argument
    pub fn range(mut self, range: RangeRef) -> Self {
        self.args.push(range.to_string());
        self.push_dependency(Dependency::Range { sheet: None, range });
        self
    }

    /// Append a sheet-qualified reference argument
    pub fn sheet_ref(mut self, sheet_ref: SheetRef) -> Self {
        self.args.push(sheet_ref.to_string());
        let sheet = Some(sheet_ref.sheet().to_string());
        match sheet_ref.target() {
            RefTarget::Cell(cell) => self.push_dependency(Dependency::Cell { sheet, cell }),
            RefTarget::Range(range) => self.push_dependency(Dependency::Range { sheet, range }),
        }
        self
    }

    /// Append a named-range argument, capturing its current binding
    ///
    /// The captured range travels with the formula; redefining the name
    /// later does not change formulas built before the redefinition.
    pub fn name(mut self, named: &NamedRange) -> Self {
        self.args.push(named.name().to_string());
        self.push_dependency(Dependency::Name {
            name: named.name().to_string(),
            sheet: named.sheet().to_string(),
            range: named.range(),
        });
        self
    }

    /// Append a nested formula argument, folding its dependencies into
    /// this formula's set
    pub fn nested(mut self, inner: BuiltFormula) -> Self {
        let (text, dependencies) = inner.into_parts();
        self.args.push(text);
        for dep in dependencies {
            self.push_dependency(dep);
        }
        self
    }

    /// Finalize: validate the call against the catalog and produce the
    /// immutable text + dependency pair
    pub fn build(self, catalog: &FunctionCatalog) -> FormulaResult<BuiltFormula> {
        catalog.validate_call(&self.function, self.args.len())?;

        Ok(BuiltFormula {
            text: format!("{}({})", self.function, self.args.join(",")),
            dependencies: self.dependencies,
        })
    }
}
