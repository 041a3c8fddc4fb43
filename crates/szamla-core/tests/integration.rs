//! Integration tests for the parse_pdf() / export_pdf() pipeline.
//!
//! Uses a MockExtractor that returns pre-built PageContent without
//! invoking pdftotext, so these tests run without poppler-utils.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use rust_decimal_macros::dec;

use szamla_core::error::SzamlaError;
use szamla_core::extraction::{PageContent, PdfExtractor, Table};
use szamla_core::lookup::{Employee, PhoneBookEntry, ReferenceData, TeszorVatLedgerEntry};
use szamla_core::model::Layout;
use szamla_core::{export_pdf, parse_pages, parse_pdf, ParsedInvoice};

struct MockExtractor {
    pages: Vec<PageContent>,
}

impl PdfExtractor for MockExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, SzamlaError> {
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn page(number: usize, lines: &[&str]) -> PageContent {
    PageContent {
        page_number: number,
        lines: lines.iter().map(|s| s.to_string()).collect(),
        tables: vec![],
    }
}

fn table(rows: &[&[&str]]) -> Table {
    rows.iter()
        .map(|cells| cells.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn open(bytes: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
    calamine::open_workbook_from_rs(Cursor::new(bytes)).unwrap()
}

fn multialarm_pages() -> Vec<PageContent> {
    vec![
        page(
            1,
            &[
                "MULTIALARM Zrt.",
                "Számla száma: 2024001",
                "Számla kelte: 2024.02.01.",
                "Teljesítési dátum: 2024.01.31.",
                "Fizetési határidő: 2024.02.15.",
                "",
                "Időszak: 2024.01.01 - 2024.01.31",
                "Felszerelési hely: ABC-123",
                "Menetlevél + útdíj alapszolgáltatás 1 db 1 234,56Ft 1 234,56Ft 333,33Ft 27% 1 567,89Ft",
            ],
        ),
        page(
            2,
            &[
                "Időszak: 2024.01.01 - 2024.01.31",
                "Felszerelési hely: XYZ-987",
                "Menetlevél + útdíj alapszolgáltatás 1 db 2 000,00Ft 2 000,00Ft 540,00Ft 27% 2 540,00Ft",
            ],
        ),
    ]
}

fn volvo_pages() -> Vec<PageContent> {
    vec![
        PageContent {
            page_number: 1,
            lines: vec![
                "Volvo Hungária Kft.".to_string(),
                "Kelt  10-02-2024  20-02-2024  31-01-2024".to_string(),
            ],
            tables: vec![
                table(&[&["Számlaszám", "Vevő"], &["9001234", "Példa Kft"]]),
                table(&[
                    &["Leírás", "Összeg"],
                    &["Flottabérlet\nAAA-111 01-01-2024 31-01-2024", "1.234,56"],
                ]),
            ],
        },
        PageContent {
            page_number: 2,
            lines: vec![],
            tables: vec![
                table(&[&["Folytatás"]]),
                table(&[&["Flottabérlet\nBBB-222 01-01-2024 31-01-2024", "10.000,00"]]),
            ],
        },
    ]
}

fn vodafone_pages() -> Vec<PageContent> {
    vec![
        page(
            1,
            &[
                "SZÁMLA",
                "Számlaösszesítő",
                "Megnevezés Mennyiség Egységár",
                "Előfizetési díjak 1 db 1.500,00 61.20.1 27% 1.500,00 405,00 1.905,00",
                "Kerekítés 1 db 0,40 27% 0,40 0,00 0,40",
                "Összesen 1.905,40",
                "Egyenlegközlő információ",
            ],
        ),
        page(2, &["Összesítő", "Számlaszám: 123456789"]),
        page(
            3,
            &[
                "Kiszámlázott díjak",
                "Telefonszám: 36301234567",
                "Tarifacsomag: Business",
                "Megnevezés TESZOR Nettó ÁFA",
                "Havi előfizetés 61.20.1 1.000,00 27% 270,00 1.270,00",
                "Roaming díj 61.20.42 500,00 27% 135,00 635,00",
                "Kiszámlázott díjak összesen 1.500,00",
            ],
        ),
    ]
}

fn reference() -> ReferenceData {
    ReferenceData::new(
        &[PhoneBookEntry {
            phone_number: "36301234567".into(),
            employee: Some(Employee {
                name: "Kiss Péter".into(),
                cost_center: Some("K100".into()),
                monogram: Some("KP".into()),
                axapta_name: Some("kissp".into()),
            }),
        }],
        &[TeszorVatLedgerEntry {
            teszor_code: Some("61.20.1".into()),
            vat_code: Some("A27".into()),
            vat_rate: Some("27%".into()),
            expense_title: Some("Telefon".into()),
            expense_account_number: Some("52910".into()),
        }],
    )
}

// ---------------------------------------------------------------------------
// Empty input yields empty output for every layout
// ---------------------------------------------------------------------------
#[test]
fn empty_input_parses_to_nothing() {
    for layout in Layout::ALL {
        assert!(parse_pages(&[], layout).is_empty(), "{layout}");
        assert!(parse_pages(&[PageContent::default()], layout).is_empty(), "{layout}");
    }
}

#[test]
fn empty_document_is_no_data_error() {
    let extractor = MockExtractor { pages: vec![] };
    for layout in Layout::ALL {
        let err = export_pdf(&[], &extractor, layout, &ReferenceData::default()).unwrap_err();
        assert!(matches!(err, SzamlaError::NoData(l) if l == layout));
    }
}

// ---------------------------------------------------------------------------
// Parsing is a pure function of the pages
// ---------------------------------------------------------------------------
#[test]
fn parsing_is_idempotent() {
    let inputs = [
        (Layout::Multialarm, multialarm_pages()),
        (Layout::Volvo, volvo_pages()),
        (Layout::Vodafone, vodafone_pages()),
    ];
    for (layout, pages) in inputs {
        let first = serde_json::to_string(&parse_pages(&pages, layout)).unwrap();
        let second = serde_json::to_string(&parse_pages(&pages, layout)).unwrap();
        assert_eq!(first, second, "{layout}");
    }
}

// ---------------------------------------------------------------------------
// Multialarm: two vehicles across two pages
// ---------------------------------------------------------------------------
#[test]
fn multialarm_pipeline() {
    let extractor = MockExtractor {
        pages: multialarm_pages(),
    };
    let parsed = parse_pdf(&[], &extractor, Layout::Multialarm).unwrap();
    let ParsedInvoice::Multialarm(rows) = &parsed else {
        panic!("expected multialarm rows");
    };
    assert_eq!(rows.rows.len(), 2);
    assert_eq!(rows.rows[1].license_plate, "XYZ987");
    assert_eq!(rows.rows[1].net, dec!(2000.00));
    assert_eq!(rows.rows[1].header.invoice_number, "2024001");

    let output =
        export_pdf(&[], &extractor, Layout::Multialarm, &ReferenceData::default()).unwrap();
    assert_eq!(output.file_name, "multialarm_invoice_2024001.xlsx");

    let mut workbook = open(output.bytes);
    assert_eq!(workbook.sheet_names(), vec!["Sheet1".to_string()]);
    let range = workbook.worksheet_range("Sheet1").unwrap();
    assert_eq!(range.get_size(), (3, 10));
    assert_eq!(range.get((0, 7)), Some(&Data::String("net".into())));
    assert_eq!(range.get((1, 7)), Some(&Data::Float(1234.56)));
    assert_eq!(range.get((1, 8)), Some(&Data::Float(27.0)));
    assert!(matches!(range.get((1, 1)), Some(Data::DateTime(_))));
}

// ---------------------------------------------------------------------------
// Volvo: header from the first page, items from every page's second table
// ---------------------------------------------------------------------------
#[test]
fn volvo_pipeline() {
    let extractor = MockExtractor {
        pages: volvo_pages(),
    };
    let output = export_pdf(&[], &extractor, Layout::Volvo, &ReferenceData::default()).unwrap();
    assert_eq!(output.file_name, "volvo_invoice_9001234.xlsx");

    let mut workbook = open(output.bytes);
    let range = workbook.worksheet_range("Sheet1").unwrap();
    assert_eq!(range.get((0, 8)), Some(&Data::String("vat".into())));
    assert_eq!(range.get((1, 6)), Some(&Data::String("AAA111".into())));
    assert_eq!(range.get((1, 7)), Some(&Data::Float(1234.56)));
    assert_eq!(range.get((1, 8)), Some(&Data::Float(333.0)));
    assert_eq!(range.get((2, 8)), Some(&Data::Float(2700.0)));
    assert!(matches!(range.get((2, 4)), Some(Data::DateTime(_))));
}

#[test]
fn volvo_reports_skipped_header_rows() {
    let parsed = parse_pages(&volvo_pages(), Layout::Volvo);
    assert_eq!(parsed.row_count(), 2);
    assert!(!parsed.skipped_lines().is_empty());
}

// ---------------------------------------------------------------------------
// Vodafone: summary, per-subscriber charges, lookups and pivot
// ---------------------------------------------------------------------------
#[test]
fn vodafone_pipeline() {
    let extractor = MockExtractor {
        pages: vodafone_pages(),
    };
    let output = export_pdf(&[], &extractor, Layout::Vodafone, &reference()).unwrap();
    assert_eq!(output.file_name, "vodafone_123456789.xlsx");

    let mut workbook = open(output.bytes);
    assert_eq!(
        workbook.sheet_names(),
        vec![
            "InvoiceSummary".to_string(),
            "ServiceCharges".to_string(),
            "Pivot".to_string()
        ]
    );

    let summary = workbook.worksheet_range("InvoiceSummary").unwrap();
    assert_eq!(summary.get_size(), (3, 9));
    assert_eq!(summary.get((1, 4)), Some(&Data::String("61.20.1".into())));
    assert_eq!(summary.get((1, 6)), Some(&Data::Float(1500.0)));

    let charges = workbook.worksheet_range("ServiceCharges").unwrap();
    assert_eq!(charges.get((0, 11)), Some(&Data::String("LedgerTitle".into())));
    assert_eq!(charges.get((1, 7)), Some(&Data::String("Kiss Péter".into())));
    assert_eq!(charges.get((1, 12)), Some(&Data::String("Telefon".into())));
    // 61.20.42 has neither a category nor a ledger mapping.
    assert_eq!(charges.get((2, 11)), Some(&Data::String("N/A".into())));
    assert_eq!(charges.get((2, 14)), Some(&Data::String("Ismeretlen".into())));

    let pivot = workbook.worksheet_range("Pivot").unwrap();
    assert_eq!(pivot.get_size(), (3, 11));
    assert_eq!(pivot.get((0, 9)), Some(&Data::String("NetAmount".into())));
    assert_eq!(pivot.get((1, 6)), Some(&Data::String("Ismeretlen".into())));
    assert_eq!(pivot.get((1, 9)), Some(&Data::Float(500.0)));
    assert_eq!(pivot.get((2, 6)), Some(&Data::String("Telefon".into())));
    assert_eq!(pivot.get((2, 10)), Some(&Data::Float(270.0)));
}

#[test]
fn vodafone_unknown_subscriber_gets_placeholders() {
    let mut pages = vodafone_pages();
    pages.push(page(
        4,
        &[
            "Kiszámlázott díjak",
            "Telefonszám: 36709999999",
            "Tarifacsomag: Business",
            "Megnevezés TESZOR Nettó ÁFA",
            "Havi előfizetés 61.20.1 2.000,00 27% 540,00 2.540,00",
            "Kiszámlázott díjak összesen 2.000,00",
        ],
    ));
    let extractor = MockExtractor { pages };
    let output = export_pdf(&[], &extractor, Layout::Vodafone, &reference()).unwrap();

    let mut workbook = open(output.bytes);
    let charges = workbook.worksheet_range("ServiceCharges").unwrap();
    assert_eq!(charges.get_size(), (4, 15));
    assert_eq!(charges.get((3, 0)), Some(&Data::String("36709999999".into())));
    for col in 7..=10 {
        assert_eq!(charges.get((3, col)), Some(&Data::String("N/A".into())), "column {col}");
    }
    // The ledger mapping still resolves for an unknown subscriber.
    assert_eq!(charges.get((3, 12)), Some(&Data::String("Telefon".into())));
}

#[test]
fn vodafone_without_invoice_number_uses_generic_name() {
    let mut pages = vodafone_pages();
    pages[1] = page(2, &["Összesítő"]);
    let extractor = MockExtractor { pages };
    let output = export_pdf(&[], &extractor, Layout::Vodafone, &reference()).unwrap();
    assert_eq!(output.file_name, "vodafone_invoice_data.xlsx");
}

#[test]
fn parsed_invoice_serializes_with_layout_tag() {
    let parsed = parse_pages(&multialarm_pages(), Layout::Multialarm);
    let json = serde_json::to_value(&parsed).unwrap();
    assert_eq!(json["layout"], "multialarm");
    assert_eq!(json["rows"][0]["invoice_number"], "2024001");
    assert_eq!(json["rows"][0]["license_plate"], "ABC123");
}
