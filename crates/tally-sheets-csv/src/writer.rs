//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};
use tally_sheets_core::{CellValue, SheetSpec};

/// CSV file writer
///
/// Writes one sheet of a finished snapshot as a dense rectangle covering
/// its used range. Sparse gaps become empty fields.
pub struct CsvWriter;

impl CsvWriter {
    /// Write a sheet to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        sheet: &SheetSpec,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(sheet, file, options)
    }

    /// Write a sheet to a writer
    pub fn write<W: Write>(
        sheet: &SheetSpec,
        writer: W,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
            LineTerminator::CR => csv::Terminator::Any(b'\r'),
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .from_writer(writer);

        if let Some(range) = sheet.used_range() {
            for row in range.start.row..=range.end.row {
                let mut record = Vec::new();

                for col in range.start.col..=range.end.col {
                    let field = match sheet.cell_at(row, col) {
                        Some(cell) => match &cell.value {
                            CellValue::Formula(_) if !options.formulas_as_text => String::new(),
                            value => value.to_string(),
                        },
                        None => String::new(),
                    };
                    record.push(field);
                }

                csv_writer.write_record(&record)?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }
}
