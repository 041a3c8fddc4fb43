pub mod error;
pub mod export;
pub mod extraction;
pub mod lookup;
pub mod model;
pub mod parsing;

use serde::Serialize;
use tracing::info;

use error::SzamlaError;
use extraction::{PageContent, PdfExtractor};
use lookup::ReferenceData;
use model::{Layout, MultialarmRow, VolvoRow};
use parsing::vodafone::VodafoneInvoice;
use parsing::{ParsedRows, SkippedLine};

/// Rows extracted from one invoice, tagged with the layout that produced them.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "layout", rename_all = "lowercase")]
pub enum ParsedInvoice {
    Multialarm(ParsedRows<MultialarmRow>),
    Volvo(ParsedRows<VolvoRow>),
    Vodafone(VodafoneInvoice),
}

impl ParsedInvoice {
    pub fn layout(&self) -> Layout {
        match self {
            ParsedInvoice::Multialarm(_) => Layout::Multialarm,
            ParsedInvoice::Volvo(_) => Layout::Volvo,
            ParsedInvoice::Vodafone(_) => Layout::Vodafone,
        }
    }

    /// Invoice number of the first row (Vodafone: the document number), if any.
    pub fn invoice_number(&self) -> Option<&str> {
        let number = match self {
            ParsedInvoice::Multialarm(p) => {
                p.rows.first().map(|r| r.header.invoice_number.as_str())
            }
            ParsedInvoice::Volvo(p) => p.rows.first().map(|r| r.header.invoice_number.as_str()),
            ParsedInvoice::Vodafone(v) => Some(v.invoice_number.as_str()),
        };
        number.filter(|n| !n.is_empty())
    }

    pub fn row_count(&self) -> usize {
        match self {
            ParsedInvoice::Multialarm(p) => p.rows.len(),
            ParsedInvoice::Volvo(p) => p.rows.len(),
            ParsedInvoice::Vodafone(v) => v.invoice_summary.len() + v.service_charges.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn skipped_lines(&self) -> &[SkippedLine] {
        match self {
            ParsedInvoice::Multialarm(p) => &p.skipped_lines,
            ParsedInvoice::Volvo(p) => &p.skipped_lines,
            ParsedInvoice::Vodafone(v) => &v.skipped_lines,
        }
    }
}

/// A finished spreadsheet and the name it should be saved under.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Run the parser for `layout` over already extracted pages.
pub fn parse_pages(pages: &[PageContent], layout: Layout) -> ParsedInvoice {
    match layout {
        Layout::Multialarm => {
            ParsedInvoice::Multialarm(parsing::multialarm::parse_multialarm(pages))
        }
        Layout::Volvo => ParsedInvoice::Volvo(parsing::volvo::parse_volvo(pages)),
        Layout::Vodafone => ParsedInvoice::Vodafone(parsing::vodafone::parse_vodafone(pages)),
    }
}

/// Extract text from a PDF and parse it with the given layout.
pub fn parse_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    layout: Layout,
) -> Result<ParsedInvoice, SzamlaError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    let parsed = parse_pages(&pages, layout);
    info!(
        %layout,
        backend = extractor.backend_name(),
        pages = pages.len(),
        rows = parsed.row_count(),
        skipped = parsed.skipped_lines().len(),
        "parsed invoice"
    );
    Ok(parsed)
}

/// Build the workbook for parsed rows. `reference` is only consulted for Vodafone.
///
/// Returns `Ok(None)` when there is nothing to export.
pub fn export_parsed(
    parsed: &ParsedInvoice,
    reference: &ReferenceData,
) -> Result<Option<ExportOutput>, SzamlaError> {
    let bytes = match parsed {
        ParsedInvoice::Multialarm(p) => export::export_multialarm_to_excel_bytes(&p.rows)?,
        ParsedInvoice::Volvo(p) => export::export_volvo_to_excel_bytes(&p.rows)?,
        ParsedInvoice::Vodafone(v) => export::export_vodafone_to_excel_bytes(v, reference)?,
    };
    Ok(bytes.map(|bytes| ExportOutput {
        file_name: parsed.layout().export_file_name(parsed.invoice_number()),
        bytes,
    }))
}

/// Main API entry point: turn an invoice PDF into a spreadsheet.
pub fn export_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    layout: Layout,
    reference: &ReferenceData,
) -> Result<ExportOutput, SzamlaError> {
    let parsed = parse_pdf(pdf_bytes, extractor, layout)?;
    let output = export_parsed(&parsed, reference)?.ok_or(SzamlaError::NoData(layout))?;
    info!(file = %output.file_name, bytes = output.bytes.len(), "exported invoice");
    Ok(output)
}
