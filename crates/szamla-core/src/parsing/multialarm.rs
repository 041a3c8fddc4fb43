use regex::Regex;
use tracing::{debug, warn};

use crate::extraction::PageContent;
use crate::model::{InvoiceHeader, MultialarmRow};
use crate::parsing::amounts::{normalize_plate, parse_spaced_amount};
use crate::parsing::patterns::{
    HUF_SPACED_AMOUNT, MULTIALARM_CHARGE_LINE, MULTIALARM_INVOICE_DATE, MULTIALARM_INVOICE_NUMBER,
    MULTIALARM_LICENSE_PLATE, MULTIALARM_PAYMENT_DUE, MULTIALARM_PERFORMANCE_DATE,
    MULTIALARM_PERIOD, VAT_PERCENT,
};
use crate::parsing::{ParsedRows, SkippedLine};

/// Parse a Multialarm invoice into one row per billed vehicle.
///
/// Billing periods, installation places (license plates) and charge lines are
/// collected independently and paired by position. Extra entries in the
/// longer sequences are dropped.
pub fn parse_multialarm(pages: &[PageContent]) -> ParsedRows<MultialarmRow> {
    let full_text = full_text(pages);
    let header = parse_header(&full_text);

    let lines: Vec<&str> = MULTIALARM_CHARGE_LINE
        .find_iter(&full_text)
        .map(|m| m.as_str())
        .collect();
    let periods = capture_all(&MULTIALARM_PERIOD, &full_text);
    let plates = capture_all(&MULTIALARM_LICENSE_PLATE, &full_text);

    let aligned = periods.len().min(plates.len()).min(lines.len());
    let longest = periods.len().max(plates.len()).max(lines.len());
    if aligned < longest {
        warn!(
            periods = periods.len(),
            plates = plates.len(),
            lines = lines.len(),
            "multialarm sequences differ in length, only aligned triples are paired"
        );
    }

    let mut parsed = ParsedRows::default();
    for ((line, period), plate) in lines.iter().zip(&periods).zip(&plates) {
        match parse_charge(&header, line, period, plate) {
            Ok(row) => parsed.rows.push(row),
            Err(reason) => parsed.skipped_lines.push(SkippedLine::new(*line, reason)),
        }
    }

    debug!(
        rows = parsed.rows.len(),
        skipped = parsed.skipped_lines.len(),
        "parsed multialarm invoice"
    );
    parsed
}

/// Page texts joined the way the charge regexes expect: each page starts on a new line.
fn full_text(pages: &[PageContent]) -> String {
    let mut text = String::new();
    for page in pages {
        let page_text = page.text();
        if !page_text.is_empty() {
            text.push('\n');
            text.push_str(&page_text);
        }
    }
    text
}

fn parse_header(text: &str) -> InvoiceHeader {
    InvoiceHeader {
        invoice_number: first_capture(&MULTIALARM_INVOICE_NUMBER, text)
            .unwrap_or_default()
            .to_string(),
        invoice_date: date_field(&MULTIALARM_INVOICE_DATE, text),
        payment_due: date_field(&MULTIALARM_PAYMENT_DUE, text),
        performance_date: date_field(&MULTIALARM_PERFORMANCE_DATE, text),
    }
}

/// Dates are printed "2024.01.31." with a trailing dot.
fn date_field(re: &Regex, text: &str) -> String {
    first_capture(re, text)
        .map(|d| d.trim_end_matches('.').to_string())
        .unwrap_or_default()
}

/// Build a row from one aligned (charge line, period, plate) triple.
///
/// The charge line prints four amounts; the second is the net and the third
/// the VAT amount. The first and fourth are read but not exported.
fn parse_charge(
    header: &InvoiceHeader,
    line: &str,
    period: &str,
    plate: &str,
) -> Result<MultialarmRow, String> {
    let amounts = capture_all(&HUF_SPACED_AMOUNT, line);
    if amounts.len() < 4 {
        return Err(format!("expected 4 amounts, found {}", amounts.len()));
    }
    let vat_percent = first_capture(&VAT_PERCENT, line)
        .and_then(|v| v.parse::<u32>().ok())
        .ok_or_else(|| "no VAT percentage".to_string())?;

    let net = parse_spaced_amount(amounts[1])
        .ok_or_else(|| format!("invalid net amount '{}'", amounts[1]))?;
    let vat_amount = parse_spaced_amount(amounts[2])
        .ok_or_else(|| format!("invalid VAT amount '{}'", amounts[2]))?;

    let (period_start, period_end) = match period.split_once(" - ") {
        Some((start, end)) => (start.trim().to_string(), end.trim().to_string()),
        None => return Err(format!("malformed period '{period}'")),
    };

    Ok(MultialarmRow {
        header: header.clone(),
        period_start,
        period_end,
        license_plate: normalize_plate(plate),
        net,
        vat_percent,
        vat_amount,
    })
}

fn first_capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn capture_all<'t>(re: &Regex, text: &'t str) -> Vec<&'t str> {
    re.captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect()
}
