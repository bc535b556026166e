//! `.xlsx` export of report tables.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use sirg_core::error::{ReportError, Result};
use sirg_core::models::{Cell, ReportTable};
use tracing::debug;

const MIN_COLUMN_WIDTH: usize = 6;
const MAX_COLUMN_WIDTH: usize = 60;

/// Write `table` to a single-sheet workbook at `path`, overwriting it.
///
/// The header row is bold; timestamps are written as
/// `yyyy-mm-dd hh:mm:ss` text.
pub fn write_table_xlsx(table: &ReportTable, sheet_name: &str, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    fill_worksheet(worksheet, table, sheet_name).map_err(|e| ReportError::write(path, e))?;
    workbook.save(path).map_err(|e| ReportError::write(path, e))?;

    debug!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

fn fill_worksheet(
    worksheet: &mut Worksheet,
    table: &ReportTable,
    sheet_name: &str,
) -> std::result::Result<(), XlsxError> {
    worksheet.set_name(sheet_name)?;

    let bold = Format::new().set_bold();
    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &bold)?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let xl_row = r as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let xl_col = col as u16;
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(xl_row, xl_col, s)?;
                }
                Cell::Integer(n) => {
                    worksheet.write_number(xl_row, xl_col, *n as f64)?;
                }
                Cell::Timestamp(_) => {
                    worksheet.write_string(xl_row, xl_col, cell.to_string())?;
                }
                Cell::Empty => {}
            }
        }
    }

    for (col, width) in column_widths(table).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width as f64)?;
    }
    Ok(())
}

/// Widest rendered value per column, clamped to a readable range.
fn column_widths(table: &ReportTable) -> Vec<usize> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let widest = table
                .rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.to_string().chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0);
            (widest + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}
