//! Workbook builder session
//!
//! The fluent state machine that assembles a workbook: tracks the current
//! sheet and row, appends cells and named ranges, and runs every formula
//! attachment through the dependency graph so a cycle can never reach a
//! writer. A session moves `Empty -> SheetSelected -> RowSelected` and is
//! consumed by [`WorkbookBuilder::build`], which freezes the working specs
//! into an immutable snapshot.
//!
//! Sessions are single-threaded; callers wanting parallel construction
//! build independent sessions and merge the resulting snapshots.

use tally_sheets_core::{
    validate_sheet_name, CellRef, CellSpec, CellValue, Error, NameRegistry, NamedRange, RangeRef,
    Result, SheetSpec, WorkbookProperties, WorkbookSnapshot,
};
use tally_sheets_formula::{BuiltFormula, DependencyGraph, RefNode};

/// A mutable builder session for one workbook
///
/// Methods return `Result<&mut Self>` so calls chain; every mutation
/// validates synchronously and leaves no partial state behind on failure.
///
/// # Example
///
/// ```
/// use tally_sheets::prelude::*;
///
/// let mut wb = WorkbookBuilder::new();
/// wb.add_sheet("Budget").unwrap();
/// wb.add_row().unwrap();
/// wb.set_cell(0, "Rent").unwrap().set_cell(1, 1200.0).unwrap();
///
/// let snapshot = wb.build().unwrap();
/// assert_eq!(snapshot.sheet_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct WorkbookBuilder {
    properties: WorkbookProperties,
    sheets: Vec<SheetSpec>,
    /// Session-wide named-range bindings
    names: NameRegistry,
    /// Formula dependency edges accumulated so far
    graph: DependencyGraph,
    current_sheet: Option<usize>,
    current_row: Option<u32>,
}

impl WorkbookBuilder {
    /// Start an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an empty session with workbook properties
    pub fn with_properties(properties: WorkbookProperties) -> Self {
        Self {
            properties,
            ..Self::default()
        }
    }

    /// Workbook properties, mutable until finalize
    pub fn properties_mut(&mut self) -> &mut WorkbookProperties {
        &mut self.properties
    }

    // === State ===

    /// Name of the currently selected sheet, if any
    pub fn current_sheet_name(&self) -> Option<&str> {
        self.current_sheet.map(|i| self.sheets[i].name())
    }

    /// Index of the currently selected row within the current sheet
    pub fn current_row_index(&self) -> Option<u32> {
        self.current_row
    }

    /// Number of sheets declared so far
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Look up a named range defined earlier in this session
    ///
    /// Pass the result to [`FormulaBuilder::name`] to capture the binding
    /// in a formula.
    ///
    /// [`FormulaBuilder::name`]: tally_sheets_formula::FormulaBuilder::name
    pub fn named_range(&self, name: &str) -> Option<&NamedRange> {
        self.names.get(name)
    }

    fn require_sheet(&self, op: &str) -> Result<usize> {
        self.current_sheet.ok_or_else(|| {
            Error::NoSheetSelected(format!("{} requires a sheet; call add_sheet first", op))
        })
    }

    fn require_row(&self, op: &str) -> Result<(usize, u32)> {
        match (self.current_sheet, self.current_row) {
            (Some(sheet), Some(row)) => Ok((sheet, row)),
            _ => Err(Error::NoRowSelected(format!(
                "{} requires a row; call add_row first",
                op
            ))),
        }
    }

    // === Sheets and rows ===

    /// Declare a new sheet and make it current
    ///
    /// Sheet names are unique per session, case-insensitively.
    pub fn add_sheet(&mut self, name: &str) -> Result<&mut Self> {
        validate_sheet_name(name)?;

        let lower = name.to_lowercase();
        if self.sheets.iter().any(|s| s.name().to_lowercase() == lower) {
            return Err(Error::DuplicateSheet(name.to_string()));
        }

        self.sheets.push(SheetSpec::new(name)?);
        self.current_sheet = Some(self.sheets.len() - 1);
        self.current_row = None;
        Ok(self)
    }

    /// Append a new row to the current sheet and make it current
    pub fn add_row(&mut self) -> Result<&mut Self> {
        let sheet = self.require_sheet("add_row")?;
        let row = self.sheets[sheet].push_row();
        self.current_row = Some(row);
        Ok(self)
    }

    // === Cells ===

    /// Set a literal value in the current row
    ///
    /// Formula values must go through [`set_formula`](Self::set_formula) so
    /// their references are validated; a raw `CellValue::Formula` here is
    /// rejected.
    pub fn set_cell<V: Into<CellValue>>(&mut self, col: u32, value: V) -> Result<&mut Self> {
        let (sheet, row) = self.require_row("set_cell")?;
        let value = value.into();

        if value.is_formula() {
            return Err(Error::builder(format!(
                "cell {} on '{}': attach formulas with set_formula, not set_cell",
                CellRef::new(row, col),
                self.sheets[sheet].name()
            )));
        }

        // A formula previously at this position takes its edges with it
        let node = RefNode::Cell {
            sheet: self.sheets[sheet].name().to_string(),
            cell: CellRef::new(row, col),
        };
        self.graph.remove_outgoing(&node);

        self.write_cell(sheet, row, col, value);
        Ok(self)
    }

    /// Attach a built formula to a cell in the current row
    ///
    /// Registers the formula's dependencies in the graph and checks for
    /// cycles before accepting; on detection the graph is restored to its
    /// pre-attempt state and nothing is written.
    pub fn set_formula(&mut self, col: u32, formula: BuiltFormula) -> Result<&mut Self> {
        let (sheet, row) = self.require_row("set_formula")?;
        let sheet_name = self.sheets[sheet].name().to_string();
        let position = CellRef::new(row, col);

        let from = RefNode::Cell {
            sheet: sheet_name.clone(),
            cell: position,
        };
        let (text, dependencies) = formula.into_parts();

        // Replace any previous formula's edges at this cell
        let old_targets = self.graph.remove_outgoing(&from);

        let to_nodes: Vec<RefNode> = dependencies
            .iter()
            .map(|dep| dep.resolve(&sheet_name))
            .collect();
        let added = self.graph.add_edges(&from, to_nodes);

        if let Some(cycle) = self.graph.find_cycle() {
            let path: Vec<String> = cycle.iter().map(ToString::to_string).collect();

            // Roll back to the pre-attempt graph
            self.graph.remove_edges(&added);
            for target in old_targets {
                self.graph.add_edge(from.clone(), target);
            }

            log::warn!(
                "rejected formula at {}!{}: cycle {}",
                sheet_name,
                position,
                path.join(" -> ")
            );
            return Err(Error::CircularReference { path });
        }

        self.write_cell(sheet, row, col, CellValue::formula(text));
        Ok(self)
    }

    /// Set the style identifier on a cell in the current row
    ///
    /// The cell is created empty if it does not exist yet.
    pub fn set_cell_style(&mut self, col: u32, style: &str) -> Result<&mut Self> {
        let (sheet, row) = self.require_row("set_cell_style")?;

        let row_spec = self.sheets[sheet]
            .row_mut(row)
            .expect("current row exists");
        match row_spec.cell_mut(col) {
            Some(cell) => cell.style = Some(style.to_string()),
            None => {
                let cell = CellSpec::new(CellRef::new(row, col), CellValue::Empty)
                    .with_style(style);
                row_spec.set_cell(col, cell);
            }
        }
        Ok(self)
    }

    /// Write a value into a cell, preserving any style set earlier
    fn write_cell(&mut self, sheet: usize, row: u32, col: u32, value: CellValue) {
        let row_spec = self.sheets[sheet]
            .row_mut(row)
            .expect("current row exists");
        match row_spec.cell_mut(col) {
            Some(cell) => cell.value = value,
            None => {
                row_spec.set_cell(col, CellSpec::new(CellRef::new(row, col), value));
            }
        }
    }

    // === Row and column metadata ===

    /// Set the current row's height
    pub fn set_row_height(&mut self, height: f64) -> Result<&mut Self> {
        let (sheet, row) = self.require_row("set_row_height")?;
        self.sheets[sheet]
            .row_mut(row)
            .expect("current row exists")
            .height = Some(height);
        Ok(self)
    }

    /// Set the current row's style identifier
    pub fn set_row_style(&mut self, style: &str) -> Result<&mut Self> {
        let (sheet, row) = self.require_row("set_row_style")?;
        self.sheets[sheet]
            .row_mut(row)
            .expect("current row exists")
            .style = Some(style.to_string());
        Ok(self)
    }

    /// Set a column's width on the current sheet
    pub fn set_column_width(&mut self, col: u32, width: f64) -> Result<&mut Self> {
        let sheet = self.require_sheet("set_column_width")?;
        self.sheets[sheet].column_mut(col).width = Some(width);
        Ok(self)
    }

    /// Set a column's style identifier on the current sheet
    pub fn set_column_style(&mut self, col: u32, style: &str) -> Result<&mut Self> {
        let sheet = self.require_sheet("set_column_style")?;
        self.sheets[sheet].column_mut(col).style = Some(style.to_string());
        Ok(self)
    }

    /// Hide a column on the current sheet
    pub fn hide_column(&mut self, col: u32) -> Result<&mut Self> {
        let sheet = self.require_sheet("hide_column")?;
        self.sheets[sheet].column_mut(col).hidden = true;
        Ok(self)
    }

    // === Named ranges ===

    /// Bind a name to a range on the current sheet
    ///
    /// The range may reference cells that are not populated yet; sparse
    /// population is legal. Redefining a name replaces the prior binding —
    /// formulas already built keep the range they captured.
    pub fn add_named_range(&mut self, name: &str, range: &str) -> Result<&mut Self> {
        let sheet = self.require_sheet("add_named_range")?;
        let range = RangeRef::parse(range)?;

        let named = NamedRange::new(name, self.sheets[sheet].name(), range)?;

        if let Some(old) = self.names.define(named.clone()) {
            // Re-declared on another sheet: drop the stale scoped entry
            if old.sheet() != named.sheet() {
                if let Some(old_sheet) = self.sheets.iter_mut().find(|s| s.name() == old.sheet())
                {
                    old_sheet.remove_name(old.name());
                }
            }
        }
        self.sheets[sheet].define_name(named);
        Ok(self)
    }

    // === Finalize ===

    /// Freeze the session into an immutable workbook snapshot
    ///
    /// Fails if no sheet was declared, or if any declared sheet has zero
    /// rows. The dependency graph and name registry are discarded; the
    /// snapshot carries only the finished specs.
    pub fn build(self) -> Result<WorkbookSnapshot> {
        if self.sheets.is_empty() {
            return Err(Error::builder("workbook has no sheets"));
        }

        for sheet in &self.sheets {
            if sheet.row_count() == 0 {
                return Err(Error::EmptySheet(sheet.name().to_string()));
            }
        }

        log::debug!(
            "finalized workbook: {} sheets, {} dependency edges",
            self.sheets.len(),
            self.graph.edge_count()
        );

        Ok(WorkbookSnapshot::new(self.properties, self.sheets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tally_sheets_formula::{default_catalog, FormulaBuilder};

    fn sum_of(range: &str) -> BuiltFormula {
        FormulaBuilder::begin("SUM")
            .unwrap()
            .range(RangeRef::parse(range).unwrap())
            .build(default_catalog())
            .unwrap()
    }

    #[test]
    fn test_set_cell_requires_row() {
        let mut wb = WorkbookBuilder::new();
        assert!(matches!(
            wb.set_cell(0, 1.0),
            Err(Error::NoRowSelected(_))
        ));

        // Still NoRowSelected after a sheet is added but before a row
        wb.add_sheet("Budget").unwrap();
        assert!(matches!(
            wb.set_cell(0, 1.0),
            Err(Error::NoRowSelected(_))
        ));
    }

    #[test]
    fn test_named_range_requires_sheet() {
        let mut wb = WorkbookBuilder::new();
        assert!(matches!(
            wb.add_named_range("Total", "A1:A3"),
            Err(Error::NoSheetSelected(_))
        ));
    }

    #[test]
    fn test_add_row_requires_sheet() {
        let mut wb = WorkbookBuilder::new();
        assert!(matches!(wb.add_row(), Err(Error::NoSheetSelected(_))));
    }

    #[test]
    fn test_duplicate_sheet() {
        let mut wb = WorkbookBuilder::new();
        wb.add_sheet("Budget").unwrap();
        assert!(matches!(
            wb.add_sheet("BUDGET"),
            Err(Error::DuplicateSheet(_))
        ));
    }

    #[test]
    fn test_new_sheet_clears_row_selection() {
        let mut wb = WorkbookBuilder::new();
        wb.add_sheet("A").unwrap();
        wb.add_row().unwrap();
        assert_eq!(wb.current_row_index(), Some(0));

        wb.add_sheet("B").unwrap();
        assert_eq!(wb.current_sheet_name(), Some("B"));
        assert_eq!(wb.current_row_index(), None);
        assert!(wb.set_cell(0, 1.0).is_err());
    }

    #[test]
    fn test_empty_sheet_rejected_at_build() {
        let mut wb = WorkbookBuilder::new();
        wb.add_sheet("Budget").unwrap();

        match wb.build() {
            Err(Error::EmptySheet(name)) => assert_eq!(name, "Budget"),
            other => panic!("expected EmptySheet, got {:?}", other),
        }
    }

    #[test]
    fn test_no_sheets_rejected_at_build() {
        assert!(matches!(
            WorkbookBuilder::new().build(),
            Err(Error::Builder(_))
        ));
    }

    #[test]
    fn test_raw_formula_value_rejected() {
        let mut wb = WorkbookBuilder::new();
        wb.add_sheet("Budget").unwrap();
        wb.add_row().unwrap();

        assert!(matches!(
            wb.set_cell(0, CellValue::formula("SUM(A1:A3)")),
            Err(Error::Builder(_))
        ));
    }

    #[test]
    fn test_style_survives_value_write() {
        let mut wb = WorkbookBuilder::new();
        wb.add_sheet("Budget").unwrap();
        wb.add_row().unwrap();
        wb.set_cell_style(0, "currency").unwrap();
        wb.set_cell(0, 1200.0).unwrap();

        let snapshot = wb.build().unwrap();
        let cell = snapshot.sheet(0).unwrap().cell_at(0, 0).unwrap();
        assert_eq!(cell.style.as_deref(), Some("currency"));
        assert_eq!(cell.value.as_number(), Some(1200.0));
    }

    #[test]
    fn test_overwriting_formula_drops_old_edges() {
        let mut wb = WorkbookBuilder::new();
        wb.add_sheet("S").unwrap();
        wb.add_row().unwrap();
        // A1 = SUM(B1:B3), then overwritten with a literal
        wb.set_formula(0, sum_of("B1:B3")).unwrap();
        wb.set_cell(0, 7.0).unwrap();
        wb.add_row().unwrap();

        // B2 may now reference A1 freely; no stale edge from A1 remains
        let f = FormulaBuilder::begin("SUM")
            .unwrap()
            .cell(CellRef::parse("A1").unwrap())
            .build(default_catalog())
            .unwrap();
        wb.set_formula(1, f).unwrap();
        wb.build().unwrap();
    }

    #[test]
    fn test_column_metadata() {
        let mut wb = WorkbookBuilder::new();
        wb.add_sheet("Budget").unwrap();
        wb.set_column_width(0, 22.0).unwrap();
        wb.hide_column(3).unwrap();
        wb.add_row().unwrap();
        wb.set_cell(0, "x").unwrap();

        let snapshot = wb.build().unwrap();
        let sheet = snapshot.sheet(0).unwrap();
        assert_eq!(sheet.column(0).unwrap().width, Some(22.0));
        assert!(sheet.column(3).unwrap().hidden);
    }
}
