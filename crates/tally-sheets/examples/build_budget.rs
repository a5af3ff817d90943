//! Example: Build a monthly budget workbook and export it as CSV

use tally_sheets::prelude::*;

fn main() -> Result<()> {
    let mut wb = WorkbookBuilder::with_properties(WorkbookProperties::new(
        "Monthly Budget",
        "Finance Team",
    ));

    wb.add_sheet("Budget")?;
    wb.set_column_width(0, 24.0)?;
    wb.add_named_range("Amounts", "B2:B4")?;

    // Header row
    wb.add_row()?;
    wb.set_cell(0, "Category")?;
    wb.set_cell(1, "Amount")?;

    // Data rows
    wb.add_row()?;
    wb.set_cell(0, "Rent")?;
    wb.set_cell(1, 1200.0)?;

    wb.add_row()?;
    wb.set_cell(0, "Utilities")?;
    wb.set_cell(1, 180.5)?;

    wb.add_row()?;
    wb.set_cell(0, "Groceries")?;
    wb.set_cell(1, 420.0)?;

    // Total row: =SUM(Amounts), captured against the named range
    let total = FormulaBuilder::begin("SUM")?
        .name(wb.named_range("Amounts").expect("defined above"))
        .build(default_catalog())?;

    wb.add_row()?;
    wb.set_cell(0, "Total")?;
    wb.set_formula(1, total)?;

    let snapshot = wb.build()?;
    println!(
        "Built '{}' with {} sheet(s)",
        snapshot.properties().title,
        snapshot.sheet_count()
    );

    snapshot.save("/tmp/budget.csv")?;
    println!("Saved /tmp/budget.csv");

    let budget = snapshot.sheet_by_name("Budget").unwrap();
    println!(
        "Total cell: {:?}",
        budget.cell_at(4, 1).unwrap().value.formula_text()
    );

    Ok(())
}
