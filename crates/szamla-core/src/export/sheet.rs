use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use crate::error::SzamlaError;

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<Option<f64>> for Cell {
    fn from(v: Option<f64>) -> Self {
        v.map(Cell::Number).unwrap_or(Cell::Empty)
    }
}

/// A named worksheet: a header row followed by data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Sheet {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a sheet from column-major data. All columns must be the same length.
    pub fn from_columns(name: &str, columns: Vec<(&str, Vec<Cell>)>) -> Self {
        let row_count = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        let names: Vec<&str> = columns.iter().map(|(n, _)| *n).collect();
        let mut sheet = Sheet::new(name, &names);
        let mut iters: Vec<_> = columns.into_iter().map(|(_, c)| c.into_iter()).collect();
        for _ in 0..row_count {
            let row = iters
                .iter_mut()
                .map(|it| it.next().unwrap_or(Cell::Empty))
                .collect();
            sheet.rows.push(row);
        }
        sheet
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Serialize sheets into an OpenXML workbook, in order.
///
/// The header row is bold and dates use a `yyyy-mm-dd` number format.
pub fn write_workbook(sheets: &[Sheet]) -> Result<Vec<u8>, SzamlaError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, name) in sheet.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, name, &header_format)?;
        }

        for (r, row) in sheet.rows.iter().enumerate() {
            let row_num = (r + 1) as u32;
            for (c, cell) in row.iter().enumerate() {
                let col_num = c as u16;
                match cell {
                    Cell::Text(s) => {
                        worksheet.write_string(row_num, col_num, s)?;
                    }
                    Cell::Number(v) => {
                        worksheet.write_number(row_num, col_num, *v)?;
                    }
                    Cell::Date(d) => {
                        let datetime = ExcelDateTime::from_ymd(
                            d.year() as u16,
                            d.month() as u8,
                            d.day() as u8,
                        )?;
                        worksheet.write_datetime_with_format(
                            row_num,
                            col_num,
                            &datetime,
                            &date_format,
                        )?;
                    }
                    Cell::Empty => {}
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
