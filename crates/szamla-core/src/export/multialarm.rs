use crate::error::SzamlaError;
use crate::export::normalize::{date_column, decimal_cell, text_column, MULTIALARM_DATE_FORMAT};
use crate::export::sheet::{write_workbook, Cell, Sheet};
use crate::export::DEFAULT_SHEET_NAME;
use crate::model::MultialarmRow;

/// Export Multialarm rows to a single-sheet workbook.
///
/// Returns `Ok(None)` when there are no rows to export.
pub fn export_multialarm_to_excel_bytes(
    rows: &[MultialarmRow],
) -> Result<Option<Vec<u8>>, SzamlaError> {
    if rows.is_empty() {
        return Ok(None);
    }
    let sheet = multialarm_sheet(rows);
    write_workbook(&[sheet]).map(Some)
}

pub fn multialarm_sheet(rows: &[MultialarmRow]) -> Sheet {
    let text = |f: fn(&MultialarmRow) -> &str| -> Vec<&str> { rows.iter().map(f).collect() };
    let date = |name: &str, f: fn(&MultialarmRow) -> &str| {
        date_column(name, &text(f), MULTIALARM_DATE_FORMAT)
    };

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
            ("net", rows.iter().map(|r| decimal_cell(r.net)).collect()),
            (
                "vat_percent",
                rows.iter()
                    .map(|r| Cell::Number(r.vat_percent as f64))
                    .collect(),
            ),
            (
                "vat_amount",
                rows.iter().map(|r| decimal_cell(r.vat_amount)).collect(),
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InvoiceHeader;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn row(period_start: &str) -> MultialarmRow {
        MultialarmRow {
            header: InvoiceHeader {
                invoice_number: "555".into(),
                invoice_date: "2024.02.01".into(),
                payment_due: "2024.02.15".into(),
                performance_date: "2024.01.31".into(),
            },
            period_start: period_start.into(),
            period_end: "2024.01.31".into(),
            license_plate: "ABC123".into(),
            net: dec!(1234.56),
            vat_percent: 27,
            vat_amount: dec!(333.33),
        }
    }

    #[test]
    fn test_empty_rows_export_nothing() {
        assert!(export_multialarm_to_excel_bytes(&[]).unwrap().is_none());
    }

    #[test]
    fn test_sheet_columns_and_values() {
        let sheet = multialarm_sheet(&[row("2024.01.01")]);
        assert_eq!(sheet.columns.len(), 10);
        assert_eq!(sheet.columns[9], "vat_amount");
        let r = &sheet.rows[0];
        assert_eq!(r[0], Cell::text("555"));
        assert_eq!(r[1], Cell::Date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
        assert_eq!(r[7], Cell::Number(1234.56));
        assert_eq!(r[8], Cell::Number(27.0));
        assert_eq!(r[9], Cell::Number(333.33));
    }

    #[test]
    fn test_unparseable_period_passes_through() {
        let sheet = multialarm_sheet(&[row("2024.01.01"), row("2024.01.")]);
        let idx = sheet.column_index("period_start").unwrap();
        assert_eq!(sheet.rows[0][idx], Cell::text("2024.01.01"));
        assert_eq!(sheet.rows[1][idx], Cell::text("2024.01."));
    }

    #[test]
    fn test_export_writes_workbook() {
        let bytes = export_multialarm_to_excel_bytes(&[row("2024.01.01")])
            .unwrap()
            .unwrap();
        assert!(!bytes.is_empty());
    }
}
