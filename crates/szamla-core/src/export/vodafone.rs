use std::collections::BTreeMap;

use tracing::debug;

use crate::error::SzamlaError;
use crate::export::normalize::{amount_column, lenient_amount, text_column};
use crate::export::sheet::{write_workbook, Cell, Sheet};
use crate::lookup::{Employee, LedgerMapping, ReferenceData};
use crate::model::{InvoiceSummaryRow, ServiceChargeRow};
use crate::parsing::vodafone::VodafoneInvoice;

pub const SUMMARY_SHEET: &str = "InvoiceSummary";
pub const CHARGES_SHEET: &str = "ServiceCharges";
pub const PIVOT_SHEET: &str = "Pivot";

pub const SUMMARY_COLUMNS: [&str; 9] = [
    "Megnevezés",
    "Mennyiség",
    "Mennyiségi egység",
    "Egységár (Ft)",
    "TESZOR szám",
    "ÁFA kulcs",
    "Nettó összeg (Ft)",
    "ÁFA összeg (Ft)",
    "Bruttó összeg (Ft)",
];

/// Summary columns holding dot-grouped amounts.
const SUMMARY_AMOUNT_COLUMNS: [usize; 4] = [3, 6, 7, 8];

pub const CHARGE_COLUMNS: [&str; 15] = [
    "PhoneNumber",
    "Description",
    "TESZOR",
    "TotalAmount",
    "VATAmount",
    "VATRate",
    "NetAmount",
    "Employee",
    "Cost Center",
    "Monogram",
    "Axapta Name",
    "LedgerTitle",
    "Title",
    "VatCode",
    "LedgerAccount",
];

pub const PIVOT_GROUP_COLUMNS: [&str; 9] = [
    "PhoneNumber",
    "Employee",
    "Cost Center",
    "Axapta Name",
    "Monogram",
    "VATRate",
    "Title",
    "VatCode",
    "LedgerAccount",
];

/// Placeholder for missing employee attributes and TESZOR categories.
const NOT_AVAILABLE: &str = "N/A";
/// Placeholder for a (TESZOR, VAT rate) pair with no ledger mapping.
const UNKNOWN_LEDGER: &str = "Ismeretlen";
/// Employee name used for company-level subscriptions.
const CENTRAL: &str = "Központi";

/// Export a parsed Vodafone invoice as a workbook.
///
/// Sheets, in order: `InvoiceSummary` when there are summary rows, then
/// `ServiceCharges` and `Pivot` when there are service charges. Returns
/// `Ok(None)` when both lists are empty.
pub fn export_vodafone_to_excel_bytes(
    invoice: &VodafoneInvoice,
    reference: &ReferenceData,
) -> Result<Option<Vec<u8>>, SzamlaError> {
    if invoice.is_empty() {
        return Ok(None);
    }

    let mut sheets = Vec::new();
    if !invoice.invoice_summary.is_empty() {
        sheets.push(summary_sheet(&invoice.invoice_summary));
    }
    if !invoice.service_charges.is_empty() {
        let enriched: Vec<EnrichedCharge> = invoice
            .service_charges
            .iter()
            .map(|row| EnrichedCharge::resolve(row, reference))
            .collect();
        sheets.push(charges_sheet(&enriched));
        sheets.push(pivot_sheet(&enriched));
    }
    debug!(sheets = sheets.len(), "writing vodafone workbook");

    write_workbook(&sheets).map(Some)
}

pub fn summary_sheet(rows: &[InvoiceSummaryRow]) -> Sheet {
    let columns = SUMMARY_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let values: Vec<&str> = rows.iter().map(|r| r.fields()[i]).collect();
            let cells = if SUMMARY_AMOUNT_COLUMNS.contains(&i) {
                amount_column(name, &values)
            } else {
                text_column(&values)
            };
            (*name, cells)
        })
        .collect();
    Sheet::from_columns(SUMMARY_SHEET, columns)
}

/// A service charge joined with its employee and ledger classification.
///
/// Every lookup has already fallen back to its placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedCharge<'a> {
    pub charge: &'a ServiceChargeRow,
    pub employee: String,
    pub cost_center: String,
    pub monogram: String,
    pub axapta_name: String,
    pub ledger_title: String,
    pub title: String,
    pub vat_code: String,
    pub ledger_account: String,
}

impl<'a> EnrichedCharge<'a> {
    pub fn resolve(charge: &'a ServiceChargeRow, reference: &ReferenceData) -> Self {
        let employee = reference.employee(&charge.phone_number);
        let attribute = |f: fn(&Employee) -> Option<&str>| {
            employee
                .and_then(f)
                .unwrap_or(NOT_AVAILABLE)
                .to_string()
        };
        let mapping = reference.ledger_mapping(&charge.teszor_code, &charge.vat_rate);
        let ledger = |f: fn(&LedgerMapping) -> &str| {
            mapping.map(f).unwrap_or(UNKNOWN_LEDGER).to_string()
        };

        EnrichedCharge {
            charge,
            employee: attribute(|e| Some(e.name.as_str())),
            cost_center: attribute(|e| e.cost_center.as_deref()),
            monogram: attribute(|e| e.monogram.as_deref()),
            axapta_name: attribute(|e| e.axapta_name.as_deref()),
            ledger_title: reference
                .teszor_categories
                .get(&charge.teszor_code)
                .map(String::as_str)
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
            title: ledger(|m| m.title.as_str()),
            vat_code: ledger(|m| m.vat_code.as_str()),
            ledger_account: ledger(|m| m.ledger_account.as_str()),
        }
    }

    /// Grouping key for the pivot.
    ///
    /// Company-level lines without a subscriber are grouped under the
    /// `Központi` phone number, and company-level lines never carry an
    /// Axapta name.
    fn pivot_key(&self) -> [String; 9] {
        let central = self.employee == CENTRAL;
        let phone = &self.charge.phone_number;
        let phone_number = if central && (phone.is_empty() || phone == NOT_AVAILABLE) {
            CENTRAL.to_string()
        } else {
            phone.clone()
        };
        let axapta_name = if central {
            NOT_AVAILABLE.to_string()
        } else {
            self.axapta_name.clone()
        };

        [
            phone_number,
            self.employee.clone(),
            self.cost_center.clone(),
            axapta_name,
            self.monogram.clone(),
            self.charge.vat_rate.clone(),
            self.title.clone(),
            self.vat_code.clone(),
            self.ledger_account.clone(),
        ]
    }
}

pub fn charges_sheet(charges: &[EnrichedCharge]) -> Sheet {
    let mut sheet = Sheet::new(CHARGES_SHEET, &CHARGE_COLUMNS);
    for c in charges {
        let row = c.charge;
        sheet.rows.push(vec![
            Cell::text(&row.phone_number),
            Cell::text(&row.description),
            Cell::text(&row.teszor_code),
            lenient_amount(&row.total_amount).into(),
            lenient_amount(&row.vat_amount).into(),
            Cell::text(&row.vat_rate),
            lenient_amount(&row.net_amount).into(),
            Cell::text(&c.employee),
            Cell::text(&c.cost_center),
            Cell::text(&c.monogram),
            Cell::text(&c.axapta_name),
            Cell::text(&c.ledger_title),
            Cell::text(&c.title),
            Cell::text(&c.vat_code),
            Cell::text(&c.ledger_account),
        ]);
    }
    sheet
}

/// Net and VAT totals per employee / ledger group, sorted by group key.
pub fn pivot_sheet(charges: &[EnrichedCharge]) -> Sheet {
    let mut groups: BTreeMap<[String; 9], (f64, f64)> = BTreeMap::new();
    for c in charges {
        let sums = groups.entry(c.pivot_key()).or_insert((0.0, 0.0));
        sums.0 += lenient_amount(&c.charge.net_amount).unwrap_or(0.0);
        sums.1 += lenient_amount(&c.charge.vat_amount).unwrap_or(0.0);
    }

    let columns: Vec<&str> = PIVOT_GROUP_COLUMNS
        .iter()
        .copied()
        .chain(["NetAmount", "VATAmount"])
        .collect();
    let mut sheet = Sheet::new(PIVOT_SHEET, &columns);
    for (key, (net, vat)) in groups {
        let mut row: Vec<Cell> = key.into_iter().map(Cell::Text).collect();
        row.push(Cell::Number(net));
        row.push(Cell::Number(vat));
        sheet.rows.push(row);
    }
    sheet
}
