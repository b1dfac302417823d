//! Table extraction from a worksheet.
//!
//! A table is one header row followed by data rows. Reading stops for good at
//! the first row whose first cell is blank or equals the end marker.

use crate::domain::model::{CellValue, Row};
use crate::domain::ports::SheetSource;
use crate::utils::error::{EtlError, Result};

/// Reads the table whose column names sit on `header_row` (1-based).
pub fn read_table<S: SheetSource + ?Sized>(
    sheet: &S,
    header_row: usize,
    end_marker: Option<&str>,
) -> Result<Vec<Row>> {
    let headers = read_headers(sheet, header_row);
    let mut rows = Vec::new();

    for index in (header_row + 1)..=sheet.row_count() {
        let cells = sheet.row(index).unwrap_or(&[]);
        let first = cells.first().unwrap_or(&CellValue::Empty);

        if is_terminator(first, end_marker) {
            tracing::debug!(
                "Sheet '{}': table ends at row {} ({} data rows)",
                sheet.name(),
                index,
                rows.len()
            );
            break;
        }

        if cells.len() < headers.len() {
            return Err(EtlError::RowTooShort {
                sheet: sheet.name().to_string(),
                row: index,
                width: cells.len(),
                expected: headers.len(),
            });
        }

        let mut row = Row::new();
        for (name, value) in headers.iter().zip(cells) {
            row.data.insert(name.clone(), value.clone());
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Column names of the header row, trimmed; blank cells become "".
pub fn read_headers<S: SheetSource + ?Sized>(sheet: &S, header_row: usize) -> Vec<String> {
    if header_row == 0 {
        return Vec::new();
    }
    sheet
        .row(header_row)
        .unwrap_or(&[])
        .iter()
        .map(|cell| cell.to_plain_string().trim().to_string())
        .collect()
}

// A first cell that is empty, "" or whitespace-only ends the table, the same
// as a missing cell. The end marker matches trimmed and case-insensitively.
fn is_terminator(first: &CellValue, end_marker: Option<&str>) -> bool {
    if first.is_blank() {
        return true;
    }
    match (first.as_text(), end_marker) {
        (Some(text), Some(marker)) => text.trim().eq_ignore_ascii_case(marker.trim()),
        _ => false,
    }
}

/// In-memory sheet, also the target the workbook adapter copies cells into.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    name: String,
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Sets a cell by 1-based position, growing the grid as needed.
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        if row == 0 || col == 0 {
            return;
        }
        if self.rows.len() < row {
            self.rows.resize_with(row, Vec::new);
        }
        let cells = &mut self.rows[row - 1];
        if cells.len() < col {
            cells.resize(col, CellValue::Empty);
        }
        cells[col - 1] = value;
    }

    /// Pads every row to the widest one, like a worksheet's used range.
    pub fn normalize_width(&mut self) {
        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        for cells in &mut self.rows {
            cells.resize(width, CellValue::Empty);
        }
    }
}

impl SheetSource for Grid {
    fn name(&self) -> &str {
        &self.name
    }

    fn row(&self, index: usize) -> Option<&[CellValue]> {
        index
            .checked_sub(1)
            .and_then(|i| self.rows.get(i))
            .map(Vec::as_slice)
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }
}
