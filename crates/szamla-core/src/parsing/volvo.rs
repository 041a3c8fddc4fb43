use tracing::{debug, warn};

use crate::extraction::PageContent;
use crate::model::{InvoiceHeader, VolvoRow};
use crate::parsing::amounts::normalize_plate;
use crate::parsing::patterns::{DASHED_DATE, HUF_DOTTED_AMOUNT, PLATE_BEFORE_DATE};
use crate::parsing::{ParsedRows, SkippedLine};

/// Parse a Volvo invoice.
///
/// The header comes from the first page: the invoice number sits in the
/// second row of its first table, the three dates on the first text line
/// that carries at least three DD-MM-YYYY dates. Line items are read from the
/// second table of every page.
pub fn parse_volvo(pages: &[PageContent]) -> ParsedRows<VolvoRow> {
    let mut parsed = ParsedRows::default();

    let Some(first_page) = pages.first() else {
        return parsed;
    };
    let header = parse_header(first_page);

    for page in pages {
        let Some(table) = page.tables.get(1) else {
            continue;
        };
        for cells in table {
            match parse_line_item(&header, cells) {
                Ok(row) => parsed.rows.push(row),
                Err(reason) => parsed
                    .skipped_lines
                    .push(SkippedLine::new(cells.join(" | "), reason)),
            }
        }
    }

    debug!(
        rows = parsed.rows.len(),
        skipped = parsed.skipped_lines.len(),
        "parsed volvo invoice"
    );
    parsed
}

fn parse_header(page: &PageContent) -> InvoiceHeader {
    let invoice_number = page
        .tables
        .first()
        .and_then(|t| t.get(1))
        .and_then(|row| row.first())
        .cloned()
        .unwrap_or_else(|| {
            warn!("volvo invoice number table not found on first page");
            String::new()
        });

    let lines: Vec<&str> = page.lines.iter().map(|s| s.as_str()).collect();
    let (invoice_date, payment_due, performance_date) =
        scan_date_triple(&lines).unwrap_or_default();

    InvoiceHeader {
        invoice_number,
        invoice_date,
        payment_due,
        performance_date,
    }
}

/// Find the first line carrying at least three DD-MM-YYYY dates and return
/// its first three (invoice date, payment due, performance date).
pub fn scan_date_triple(lines: &[&str]) -> Option<(String, String, String)> {
    lines.iter().find_map(|line| {
        let mut dates = DASHED_DATE.find_iter(line).map(|m| m.as_str().to_string());
        match (dates.next(), dates.next(), dates.next()) {
            (Some(a), Some(b), Some(c)) => Some((a, b, c)),
            _ => None,
        }
    })
}

/// Build a row from the cells of one line-item table row.
///
/// The cell joined with spaces is scanned for the period dates and the net
/// (the last amount). The license plate is the text before the first date on
/// the second printed line of the row.
fn parse_line_item(header: &InvoiceHeader, cells: &[String]) -> Result<VolvoRow, String> {
    let joined = cells.join(" ");
    let flat = joined.replace('\n', " ");

    let license_plate = joined
        .split('\n')
        .nth(1)
        .and_then(|after_newline| PLATE_BEFORE_DATE.captures(after_newline))
        .and_then(|c| c.get(1))
        .map(|m| normalize_plate(m.as_str()))
        .unwrap_or_default();

    let mut dates = DASHED_DATE.find_iter(&flat).map(|m| m.as_str());
    let period_start = dates.next().unwrap_or_default().to_string();
    let period_end = dates.next().unwrap_or_default().to_string();

    let net = HUF_DOTTED_AMOUNT
        .find_iter(&flat)
        .last()
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let missing: Vec<&str> = [
        ("period start", period_start.is_empty()),
        ("license plate", license_plate.is_empty()),
        ("period end", period_end.is_empty()),
        ("net amount", net.is_empty()),
    ]
    .into_iter()
    .filter_map(|(name, empty)| empty.then_some(name))
    .collect();
    if !missing.is_empty() {
        return Err(format!("missing {}", missing.join(", ")));
    }

    Ok(VolvoRow {
        header: header.clone(),
        period_start,
        period_end,
        license_plate,
        net,
    })
}
