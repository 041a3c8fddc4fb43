use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extraction::PageContent;
use crate::model::{InvoiceSummaryRow, ServiceChargeRow};
use crate::parsing::patterns::{TESZOR_CODE, VODAFONE_INVOICE_NUMBER, VODAFONE_PHONE_NUMBER};
use crate::parsing::{SkippedLine, SplitPolicy};

/// Summary line carrying a TESZOR code: nine fields.
pub const SUMMARY_WITH_TESZOR: SplitPolicy = SplitPolicy::exact(9);
/// Summary line without a TESZOR code: eight fields, placeholder at index 4.
pub const SUMMARY_WITHOUT_TESZOR: SplitPolicy = SplitPolicy::with_optional(9, 4);
/// Service charge line: leading text plus net, VAT rate, VAT amount, total.
pub const SERVICE_CHARGE: SplitPolicy = SplitPolicy::exact(5);

/// Lines of the summary block that are headings or totals, not items.
const SUMMARY_NOISE: [&str; 4] = ["összeg", "Megnevezés", "Összesen", "Számlaösszesítő"];

const SERVICE_TOTAL_LINE: &str = "Kiszámlázott díjak összesen";

/// The only page searched for the invoice number.
const INVOICE_NUMBER_PAGE: usize = 1;

/// Everything extracted from a Vodafone invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VodafoneInvoice {
    pub invoice_number: String,
    pub invoice_summary: Vec<InvoiceSummaryRow>,
    pub service_charges: Vec<ServiceChargeRow>,
    pub skipped_lines: Vec<SkippedLine>,
}

impl VodafoneInvoice {
    pub fn is_empty(&self) -> bool {
        self.invoice_summary.is_empty() && self.service_charges.is_empty()
    }
}

/// Predicates that recognize section boundaries.
///
/// `page_header` is the first line of a page, trimmed and uppercased.
#[derive(Clone, Copy)]
pub struct SectionTriggers {
    pub is_summary_page: fn(page_header: &str) -> bool,
    pub opens_service_section: fn(page_header: &str) -> bool,
    pub closes_service_section: fn(lines: &[&str]) -> bool,
}

impl Default for SectionTriggers {
    fn default() -> Self {
        SectionTriggers {
            is_summary_page: |header| header == "SZÁMLA",
            opens_service_section: |header| {
                matches!(header, "KISZÁMLÁZOTT DÍJAK" | "ÜGYFÉLSZINTŰ DÍJAK")
            },
            closes_service_section: |lines| lines.iter().any(|l| l.contains(SERVICE_TOTAL_LINE)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    Idle,
    Accumulating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionAction {
    Ignore,
    Append,
    AppendAndFlush,
}

/// One row of the service section transition table. `None` matches either value.
struct Transition {
    from: SectionState,
    opens: Option<bool>,
    closes: Option<bool>,
    to: SectionState,
    action: SectionAction,
}

const TRANSITIONS: [Transition; 5] = [
    Transition {
        from: SectionState::Idle,
        opens: Some(false),
        closes: None,
        to: SectionState::Idle,
        action: SectionAction::Ignore,
    },
    Transition {
        from: SectionState::Idle,
        opens: Some(true),
        closes: Some(false),
        to: SectionState::Accumulating,
        action: SectionAction::Append,
    },
    Transition {
        from: SectionState::Idle,
        opens: Some(true),
        closes: Some(true),
        to: SectionState::Idle,
        action: SectionAction::AppendAndFlush,
    },
    Transition {
        from: SectionState::Accumulating,
        opens: None,
        closes: Some(false),
        to: SectionState::Accumulating,
        action: SectionAction::Append,
    },
    Transition {
        from: SectionState::Accumulating,
        opens: None,
        closes: Some(true),
        to: SectionState::Idle,
        action: SectionAction::AppendAndFlush,
    },
];

/// Look up the next state and action for a page.
pub fn transition(state: SectionState, opens: bool, closes: bool) -> (SectionState, SectionAction) {
    TRANSITIONS
        .iter()
        .find(|t| {
            t.from == state
                && t.opens.map_or(true, |o| o == opens)
                && t.closes.map_or(true, |c| c == closes)
        })
        .map(|t| (t.to, t.action))
        .unwrap_or((state, SectionAction::Ignore))
}

/// Page-driven scanner over a Vodafone invoice.
///
/// Service charge sections may span pages: lines are accumulated from the
/// opening page until a page containing the section total, then extracted in
/// one go.
#[derive(Clone, Default)]
pub struct SectionScanner {
    pub triggers: SectionTriggers,
}

impl SectionScanner {
    pub fn new(triggers: SectionTriggers) -> Self {
        SectionScanner { triggers }
    }

    pub fn scan(&self, pages: &[PageContent]) -> VodafoneInvoice {
        let mut invoice = VodafoneInvoice::default();
        let mut state = SectionState::Idle;
        let mut accumulator: Vec<String> = Vec::new();

        for (index, page) in pages.iter().enumerate() {
            let text = page.text();
            if text.is_empty() {
                continue;
            }
            let lines: Vec<&str> = text.split('\n').collect();
            let header = lines[0].trim().to_uppercase();

            if index == INVOICE_NUMBER_PAGE && invoice.invoice_number.is_empty() {
                if let Some(number) = find_invoice_number(&lines) {
                    invoice.invoice_number = number;
                }
            }

            let opens = (self.triggers.opens_service_section)(&header);
            let closes = (self.triggers.closes_service_section)(&lines);
            let (next, action) = transition(state, opens, closes);
            match action {
                SectionAction::Ignore => {}
                SectionAction::Append => {
                    accumulator.extend(lines.iter().map(|l| l.to_string()));
                }
                SectionAction::AppendAndFlush => {
                    accumulator.extend(lines.iter().map(|l| l.to_string()));
                    let section: Vec<&str> = accumulator.iter().map(|l| l.as_str()).collect();
                    extract_service_charges(&section, &mut invoice);
                    accumulator.clear();
                }
            }
            state = next;

            if (self.triggers.is_summary_page)(&header) {
                extract_summary(&text, &mut invoice);
            }
        }

        debug!(
            invoice_number = %invoice.invoice_number,
            summary_rows = invoice.invoice_summary.len(),
            service_charges = invoice.service_charges.len(),
            skipped = invoice.skipped_lines.len(),
            "parsed vodafone invoice"
        );
        invoice
    }
}

/// Parse a Vodafone invoice with the default section triggers.
pub fn parse_vodafone(pages: &[PageContent]) -> VodafoneInvoice {
    SectionScanner::default().scan(pages)
}

fn find_invoice_number(lines: &[&str]) -> Option<String> {
    lines.iter().find_map(|line| {
        VODAFONE_INVOICE_NUMBER
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Extract item lines between "Számlaösszesítő" and "Egyenlegközlő információ".
fn extract_summary(text: &str, invoice: &mut VodafoneInvoice) {
    let (Some(start), Some(end)) = (
        text.find("Számlaösszesítő"),
        text.find("Egyenlegközlő információ"),
    ) else {
        return;
    };
    if end < start {
        return;
    }

    for line in text[start..end].split('\n') {
        if SUMMARY_NOISE.iter().any(|k| line.contains(k)) {
            continue;
        }
        match split_summary_line(line) {
            Some(row) => invoice.invoice_summary.push(row),
            None => {
                if !line.trim().is_empty() {
                    invoice
                        .skipped_lines
                        .push(SkippedLine::new(line, "summary line has too few fields"));
                }
            }
        }
    }
}

/// Split a summary line into nine fields, inserting an empty TESZOR code
/// when the line carries none.
pub fn split_summary_line(line: &str) -> Option<InvoiceSummaryRow> {
    let policy = if TESZOR_CODE.is_match(line) {
        SUMMARY_WITH_TESZOR
    } else {
        SUMMARY_WITHOUT_TESZOR
    };
    let fields: [String; 9] = policy.split(line)?.try_into().ok()?;
    Some(InvoiceSummaryRow::from_fields(fields))
}

/// Extract charge lines from one accumulated service section.
fn extract_service_charges(lines: &[&str], invoice: &mut VodafoneInvoice) {
    let phone_number = find_phone_number(lines);

    let Some(start) = lines
        .iter()
        .position(|l| l.trim().starts_with("Megnevezés"))
    else {
        return;
    };
    let Some(end) = lines
        .iter()
        .position(|l| l.trim().starts_with(SERVICE_TOTAL_LINE))
    else {
        return;
    };

    for line in lines.iter().take(end).skip(start + 1) {
        let Some(teszor) = TESZOR_CODE.find(line) else {
            continue;
        };
        match split_charge_line(line, teszor.as_str(), &phone_number) {
            Some(row) => invoice.service_charges.push(row),
            None => invoice
                .skipped_lines
                .push(SkippedLine::new(*line, "service charge line has too few fields")),
        }
    }
}

/// Subscriber number of the section, looked for until the tariff line.
fn find_phone_number(lines: &[&str]) -> String {
    for line in lines {
        if line.contains("Tarifacsomag:") {
            break;
        }
        if let Some(m) = VODAFONE_PHONE_NUMBER.captures(line).and_then(|c| c.get(1)) {
            return m.as_str().to_string();
        }
    }
    "N/A".to_string()
}

fn split_charge_line(line: &str, teszor: &str, phone_number: &str) -> Option<ServiceChargeRow> {
    let parts = SERVICE_CHARGE.split(line)?;
    let [before_values, net_amount, vat_rate, vat_amount, total_amount]: [String; 5] =
        parts.try_into().ok()?;

    let description = match before_values.split_once(teszor) {
        Some((description, _)) => description.trim().to_string(),
        None => before_values.trim().to_string(),
    };

    Some(ServiceChargeRow {
        phone_number: phone_number.to_string(),
        description,
        teszor_code: teszor.to_string(),
        net_amount,
        vat_rate,
        vat_amount,
        total_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: usize, lines: &[&str]) -> PageContent {
        PageContent {
            page_number: number,
            lines: lines.iter().map(|s| s.to_string()).collect(),
            tables: vec![],
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_vodafone(&[]).is_empty());
        assert!(parse_vodafone(&[page(1, &[])]).is_empty());
    }

    #[test]
    fn test_summary_line_with_teszor() {
        let row =
            split_summary_line("Havi díj 1 db 1.000,00 61.20.1 27% 1.000,00 270,00 1.270,00")
                .unwrap();
        assert_eq!(row.description, "Havi díj");
        assert_eq!(row.quantity, "1");
        assert_eq!(row.unit, "db");
        assert_eq!(row.teszor_code, "61.20.1");
        assert_eq!(row.gross_amount, "1.270,00");
    }

    #[test]
    fn test_summary_line_without_teszor_gets_placeholder() {
        let row = split_summary_line("Kerekítés 1 db 0,40 27% 0,40 0,00 0,40").unwrap();
        assert_eq!(row.description, "Kerekítés");
        assert_eq!(row.teszor_code, "");
        assert_eq!(row.vat_rate, "27%");
        assert_eq!(row.fields().len(), 9);
    }

    #[test]
    fn test_summary_line_too_short_dropped() {
        assert!(split_summary_line("Egyéb 1 2").is_none());
    }

    #[test]
    fn test_transition_table() {
        use SectionAction::*;
        use SectionState::*;
        assert_eq!(transition(Idle, false, true), (Idle, Ignore));
        assert_eq!(transition(Idle, true, false), (Accumulating, Append));
        assert_eq!(transition(Idle, true, true), (Idle, AppendAndFlush));
        assert_eq!(transition(Accumulating, false, false), (Accumulating, Append));
        assert_eq!(transition(Accumulating, true, true), (Idle, AppendAndFlush));
    }

    #[test]
    fn test_service_section_across_pages() {
        let pages = vec![
            page(1, &["SZÁMLA", "Vodafone Magyarország"]),
            page(2, &["Összesítő", "Számlaszám: 123456789"]),
            page(
                3,
                &[
                    "Kiszámlázott díjak",
                    "Telefonszám: 36301234567",
                    "Tarifacsomag: Business",
                    "Megnevezés TESZOR Nettó ÁFA",
                    "Havi előfizetés 61.20.1 1.000,00 27% 270,00 1.270,00",
                ],
            ),
            page(
                4,
                &[
                    "Roaming díj 61.20.42 500,00 27% 135,00 635,00",
                    "Kiszámlázott díjak összesen 1.500,00",
                ],
            ),
        ];

        let invoice = parse_vodafone(&pages);
        assert_eq!(invoice.invoice_number, "123456789");
        assert_eq!(invoice.service_charges.len(), 2);
        let first = &invoice.service_charges[0];
        assert_eq!(first.phone_number, "36301234567");
        assert_eq!(first.description, "Havi előfizetés");
        assert_eq!(first.teszor_code, "61.20.1");
        assert_eq!(first.net_amount, "1.000,00");
        assert_eq!(first.vat_rate, "27%");
        assert_eq!(first.vat_amount, "270,00");
        assert_eq!(first.total_amount, "1.270,00");
        assert_eq!(invoice.service_charges[1].description, "Roaming díj");
    }

    #[test]
    fn test_phone_defaults_after_tariff_line() {
        let lines = [
            "Tarifacsomag: Business",
            "Telefonszám: 36301234567",
        ];
        assert_eq!(find_phone_number(&lines), "N/A");
    }

    #[test]
    fn test_missing_megnevezes_yields_nothing() {
        let mut invoice = VodafoneInvoice::default();
        extract_service_charges(
            &[
                "Havi előfizetés 61.20.1 1.000,00 27% 270,00 1.270,00",
                "Kiszámlázott díjak összesen 1.270,00",
            ],
            &mut invoice,
        );
        assert!(invoice.service_charges.is_empty());
    }

    #[test]
    fn test_invoice_number_only_on_second_page() {
        let pages = vec![
            page(1, &["SZÁMLA", "Számlaszám: 111"]),
            page(2, &["Egyéb", "semmi"]),
            page(3, &["Egyéb", "Számlaszám: 333"]),
        ];
        assert_eq!(parse_vodafone(&pages).invoice_number, "");
    }

    #[test]
    fn test_summary_block() {
        let pages = vec![page(
            1,
            &[
                "Számla",
                "Számlaösszesítő",
                "Megnevezés Mennyiség Egységár",
                "Havi díj 1 db 1.000,00 61.20.1 27% 1.000,00 270,00 1.270,00",
                "Kerekítés 1 db 0,40 27% 0,40 0,00 0,40",
                "Összesen 1.270,40",
                "Egyenlegközlő információ",
                "Nem része 1 2 3 4 5 6 7 8 9",
            ],
        )];
        let invoice = parse_vodafone(&pages);
        assert_eq!(invoice.invoice_summary.len(), 2);
        assert_eq!(invoice.invoice_summary[1].teszor_code, "");
    }

    #[test]
    fn test_custom_trigger_opens_section() {
        let triggers = SectionTriggers {
            opens_service_section: |header| header.starts_with("EGYEDI DÍJAK"),
            ..SectionTriggers::default()
        };
        let pages = vec![page(
            1,
            &[
                "Egyedi díjak",
                "Megnevezés",
                "Díj 61.20.1 1,00 27% 0,27 1,27",
                "Kiszámlázott díjak összesen 1,27",
            ],
        )];
        let invoice = SectionScanner::new(triggers).scan(&pages);
        assert_eq!(invoice.service_charges.len(), 1);
        assert_eq!(invoice.service_charges[0].phone_number, "N/A");
    }
}
