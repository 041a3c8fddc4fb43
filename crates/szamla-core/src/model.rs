use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SzamlaError;

/// Vendor invoice layouts with a dedicated parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Multialarm,
    Volvo,
    Vodafone,
}

impl Layout {
    pub const ALL: [Layout; 3] = [Layout::Multialarm, Layout::Volvo, Layout::Vodafone];

    /// Download name for the exported workbook.
    pub fn export_file_name(&self, invoice_number: Option<&str>) -> String {
        let number = invoice_number.filter(|n| !n.is_empty());
        match self {
            Layout::Multialarm => format!(
                "multialarm_invoice_{}.xlsx",
                number.unwrap_or("unknown_invoice_number")
            ),
            Layout::Volvo => format!(
                "volvo_invoice_{}.xlsx",
                number.unwrap_or("unknown_invoice_number")
            ),
            Layout::Vodafone => match number {
                Some(n) => format!("vodafone_{n}.xlsx"),
                None => "vodafone_invoice_data.xlsx".to_string(),
            },
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Multialarm => write!(f, "multialarm"),
            Layout::Volvo => write!(f, "volvo"),
            Layout::Vodafone => write!(f, "vodafone"),
        }
    }
}

impl FromStr for Layout {
    type Err = SzamlaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multialarm" => Ok(Layout::Multialarm),
            "volvo" => Ok(Layout::Volvo),
            "vodafone" => Ok(Layout::Vodafone),
            _ => Err(SzamlaError::UnknownLayout(s.to_string())),
        }
    }
}

/// Document-level fields shared by every line item of a Multialarm or Volvo invoice.
///
/// Fields that could not be located are left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    pub invoice_number: String,
    pub invoice_date: String,
    pub payment_due: String,
    pub performance_date: String,
}

/// One billed vehicle on a Multialarm invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultialarmRow {
    #[serde(flatten)]
    pub header: InvoiceHeader,
    pub period_start: String,
    pub period_end: String,
    pub license_plate: String,
    pub net: Decimal,
    pub vat_percent: u32,
    pub vat_amount: Decimal,
}

/// One billed vehicle on a Volvo invoice.
///
/// `net` keeps the dot-grouped Hungarian format ("12.345,67"); it is
/// converted during export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolvoRow {
    #[serde(flatten)]
    pub header: InvoiceHeader,
    pub period_start: String,
    pub period_end: String,
    pub license_plate: String,
    pub net: String,
}

/// A line of the Vodafone "Számlaösszesítő" block. Amounts stay as printed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummaryRow {
    pub description: String,
    pub quantity: String,
    pub unit: String,
    pub unit_price: String,
    /// Empty when the line carried no TESZOR code.
    pub teszor_code: String,
    pub vat_rate: String,
    pub net_amount: String,
    pub vat_amount: String,
    pub gross_amount: String,
}

impl InvoiceSummaryRow {
    /// Build from the nine right-split fields in printed order.
    pub fn from_fields(fields: [String; 9]) -> Self {
        let [
            description,
            quantity,
            unit,
            unit_price,
            teszor_code,
            vat_rate,
            net_amount,
            vat_amount,
            gross_amount,
        ] = fields;
        InvoiceSummaryRow {
            description,
            quantity,
            unit,
            unit_price,
            teszor_code,
            vat_rate,
            net_amount,
            vat_amount,
            gross_amount,
        }
    }

    pub fn fields(&self) -> [&str; 9] {
        [
            &self.description,
            &self.quantity,
            &self.unit,
            &self.unit_price,
            &self.teszor_code,
            &self.vat_rate,
            &self.net_amount,
            &self.vat_amount,
            &self.gross_amount,
        ]
    }
}

/// A per-subscriber charge line from the Vodafone "Kiszámlázott díjak" section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceChargeRow {
    /// `"N/A"` when the section named no subscriber.
    pub phone_number: String,
    pub description: String,
    pub teszor_code: String,
    pub net_amount: String,
    pub vat_rate: String,
    pub vat_amount: String,
    pub total_amount: String,
}
