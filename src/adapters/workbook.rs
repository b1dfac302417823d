//! Workbook access through calamine.
//!
//! Sheets are copied into a [`Grid`] using absolute positions, so row 3 of the
//! template is row 3 of the grid even when the used range starts lower.

use crate::core::reader::Grid;
use crate::domain::model::CellValue;
use crate::domain::ports::SheetSource;
use crate::utils::error::{EtlError, Result};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader, Sheets};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

pub struct Workbook<RS: Read + Seek> {
    sheets: Sheets<RS>,
}

impl Workbook<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Opening workbook {}", path.display());
        let sheets = open_workbook_auto(path)?;
        Ok(Self { sheets })
    }
}

impl Workbook<Cursor<Vec<u8>>> {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let sheets = open_workbook_auto_from_rs(Cursor::new(data))?;
        Ok(Self { sheets })
    }
}

impl<RS: Read + Seek> Workbook<RS> {
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    /// Loads a whole worksheet. A missing sheet is a `MissingSheet` error.
    pub fn sheet(&mut self, name: &str) -> Result<Grid> {
        let available = self.sheet_names();
        if !available.iter().any(|s| s == name) {
            return Err(EtlError::MissingSheet {
                name: name.to_string(),
                available,
            });
        }

        let range = self.sheets.worksheet_range(name)?;
        let mut grid = Grid::new(name);

        if let Some((start_row, start_col)) = range.start() {
            for (row_offset, cells) in range.rows().enumerate() {
                for (col_offset, cell) in cells.iter().enumerate() {
                    let value = cell_value(cell);
                    if value.is_empty() {
                        continue;
                    }
                    grid.set(
                        start_row as usize + row_offset + 1,
                        start_col as usize + col_offset + 1,
                        value,
                    );
                }
            }
        }

        grid.normalize_width();
        tracing::debug!("Sheet '{}': {} rows loaded", name, grid.row_count());
        Ok(grid)
    }
}

pub fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::DateTime(dt) if dt.is_duration() => CellValue::Number(dt.as_f64()),
        // as_datetime applies the workbook's 1900/1904 date system.
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
