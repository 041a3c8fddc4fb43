use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::export::sheet::Cell;
use crate::parsing::amounts::parse_dotted_amount;

/// Date format printed on Volvo invoices.
pub const VOLVO_DATE_FORMAT: &str = "%d-%m-%Y";
/// Date format printed on Multialarm invoices (trailing dot already stripped).
pub const MULTIALARM_DATE_FORMAT: &str = "%Y.%m.%d";

/// Convert a column of date strings into date cells.
///
/// The column converts as a whole: if any non-empty value fails to parse with
/// `format`, every value is kept as text. Empty values become empty cells.
pub fn date_column(name: &str, values: &[&str], format: &str) -> Vec<Cell> {
    let parsed: Option<Vec<Option<NaiveDate>>> = values
        .iter()
        .map(|v| {
            let v = v.trim();
            if v.is_empty() {
                Some(None)
            } else {
                NaiveDate::parse_from_str(v, format).ok().map(Some)
            }
        })
        .collect();

    match parsed {
        Some(dates) => dates
            .into_iter()
            .map(|d| d.map(Cell::Date).unwrap_or(Cell::Empty))
            .collect(),
        None => {
            debug!(column = name, format, "date column left as text");
            text_column(values)
        }
    }
}

/// Convert a column of dot-grouped Hungarian amounts into numbers.
///
/// Same all-or-nothing rule as [`date_column`]; an empty value counts as a failure.
pub fn amount_column(name: &str, values: &[&str]) -> Vec<Cell> {
    let parsed: Option<Vec<f64>> = values
        .iter()
        .map(|v| lenient_amount(v))
        .collect();

    match parsed {
        Some(numbers) => numbers.into_iter().map(Cell::Number).collect(),
        None => {
            debug!(column = name, "amount column left as text");
            text_column(values)
        }
    }
}

/// Parse one dot-grouped amount; None when it is not a plain number.
pub fn lenient_amount(value: &str) -> Option<f64> {
    parse_dotted_amount(value).and_then(decimal_to_f64)
}

/// Convert through the decimal string so 1234.56 stays 1234.56 rather than
/// picking up binary artifacts.
pub fn decimal_to_f64(value: Decimal) -> Option<f64> {
    value.to_string().parse::<f64>().ok()
}

pub fn text_column(values: &[&str]) -> Vec<Cell> {
    values.iter().map(|v| Cell::text(*v)).collect()
}

pub fn decimal_cell(value: Decimal) -> Cell {
    decimal_to_f64(value).into()
}
