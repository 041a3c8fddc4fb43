use tracing::debug;

use crate::error::SzamlaError;
use crate::export::normalize::{
    amount_column, date_column, lenient_amount, text_column, VOLVO_DATE_FORMAT,
};
use crate::export::sheet::{write_workbook, Cell, Sheet};
use crate::export::DEFAULT_SHEET_NAME;
use crate::model::VolvoRow;

/// Hungarian standard VAT rate applied to Volvo rental lines.
pub const VOLVO_VAT_RATE: f64 = 0.27;

/// Export Volvo rows to a single-sheet workbook with a computed `vat` column.
///
/// Returns `Ok(None)` when there are no rows to export.
pub fn export_volvo_to_excel_bytes(rows: &[VolvoRow]) -> Result<Option<Vec<u8>>, SzamlaError> {
    if rows.is_empty() {
        return Ok(None);
    }
    let sheet = volvo_sheet(rows);
    write_workbook(&[sheet]).map(Some)
}

pub fn volvo_sheet(rows: &[VolvoRow]) -> Sheet {
    let text = |f: fn(&VolvoRow) -> &str| -> Vec<&str> { rows.iter().map(f).collect() };
    let date =
        |name: &str, f: fn(&VolvoRow) -> &str| date_column(name, &text(f), VOLVO_DATE_FORMAT);

    let net_values = text(|r| r.net.as_str());
    let net = amount_column("net", &net_values);
    let vat = vat_column(&net_values);

    Sheet::from_columns(
        DEFAULT_SHEET_NAME,
        vec![
            (
                "invoice_number",
                text_column(&text(|r| r.header.invoice_number.as_str())),
            ),
            (
                "invoice_date",
                date("invoice_date", |r| r.header.invoice_date.as_str()),
            ),
            (
                "payment_due",
                date("payment_due", |r| r.header.payment_due.as_str()),
            ),
            (
                "performance_date",
                date("performance_date", |r| r.header.performance_date.as_str()),
            ),
            (
                "period_start",
                date("period_start", |r| r.period_start.as_str()),
            ),
            ("period_end", date("period_end", |r| r.period_end.as_str())),
            (
                "license_plate",
                text_column(&text(|r| r.license_plate.as_str())),
            ),
            ("net", net),
            ("vat", vat),
        ],
    )
}

/// `round(net * 0.27)` per row, ties to even.
///
/// Left empty for the whole column when any net amount does not parse, since
/// the net column then stays as text.
fn vat_column(net_values: &[&str]) -> Vec<Cell> {
    let parsed: Option<Vec<f64>> = net_values.iter().map(|v| lenient_amount(v)).collect();
    match parsed {
        Some(amounts) => amounts
            .into_iter()
            .map(|net| Cell::Number(vat_for(net)))
            .collect(),
        None => {
            debug!("net column is not numeric, vat left empty");
            vec![Cell::Empty; net_values.len()]
        }
    }
}

pub fn vat_for(net: f64) -> f64 {
    (net * VOLVO_VAT_RATE).round_ties_even()
}
