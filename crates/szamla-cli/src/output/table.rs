use szamla_core::parsing::vodafone::VodafoneInvoice;
use szamla_core::ParsedInvoice;

pub fn print(parsed: &ParsedInvoice) {
    match parsed {
        ParsedInvoice::Multialarm(p) => {
            print_invoice_number(p.rows.first().map(|r| r.header.invoice_number.as_str()));
            let rows: Vec<Vec<String>> = p
                .rows
                .iter()
                .map(|r| {
                    vec![
                        r.license_plate.clone(),
                        r.period_start.clone(),
                        r.period_end.clone(),
                        r.net.to_string(),
                        format!("{}%", r.vat_percent),
                        r.vat_amount.to_string(),
                    ]
                })
                .collect();
            print!(
                "{}",
                format_table(
                    &["Plate", "From", "To", "Net", "VAT %", "VAT"],
                    &rows
                )
            );
        }
        ParsedInvoice::Volvo(p) => {
            print_invoice_number(p.rows.first().map(|r| r.header.invoice_number.as_str()));
            let rows: Vec<Vec<String>> = p
                .rows
                .iter()
                .map(|r| {
                    vec![
                        r.license_plate.clone(),
                        r.period_start.clone(),
                        r.period_end.clone(),
                        r.net.clone(),
                    ]
                })
                .collect();
            print!("{}", format_table(&["Plate", "From", "To", "Net"], &rows));
        }
        ParsedInvoice::Vodafone(v) => print_vodafone(v),
    }
}

fn print_invoice_number(number: Option<&str>) {
    match number.filter(|n| !n.is_empty()) {
        Some(n) => println!("Invoice: {n}\n"),
        None => println!("Invoice: (no number found)\n"),
    }
}

fn print_vodafone(invoice: &VodafoneInvoice) {
    print_invoice_number(Some(invoice.invoice_number.as_str()));

    println!("=== Számlaösszesítő ===\n");
    let summary: Vec<Vec<String>> = invoice
        .invoice_summary
        .iter()
        .map(|r| {
            vec![
                r.description.clone(),
                r.teszor_code.clone(),
                r.vat_rate.clone(),
                r.net_amount.clone(),
                r.vat_amount.clone(),
                r.gross_amount.clone(),
            ]
        })
        .collect();
    print!(
        "{}",
        format_table(
            &["Description", "TESZOR", "VAT rate", "Net", "VAT", "Gross"],
            &summary
        )
    );

    println!("\n=== Kiszámlázott díjak ===\n");
    let charges: Vec<Vec<String>> = invoice
        .service_charges
        .iter()
        .map(|r| {
            vec![
                r.phone_number.clone(),
                r.description.clone(),
                r.teszor_code.clone(),
                r.net_amount.clone(),
                r.vat_rate.clone(),
                r.vat_amount.clone(),
                r.total_amount.clone(),
            ]
        })
        .collect();
    print!(
        "{}",
        format_table(
            &["Phone", "Description", "TESZOR", "Net", "VAT rate", "VAT", "Total"],
            &charges
        )
    );
}

/// Left-aligned columns separated by two spaces, with a dashed rule under the header.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "  (no rows)\n".to_string();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let format_row = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        format!("  {}\n", padded.join("  ").trim_end())
    };

    let mut out = format_row(headers.to_vec());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format_row(rule.iter().map(String::as_str).collect()));
    for row in rows {
        out.push_str(&format_row(row.iter().map(String::as_str).collect()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_table_aligns_columns() {
        let rows = vec![
            vec!["ABC123".to_string(), "1234.56".to_string()],
            vec!["XY1".to_string(), "5".to_string()],
        ];
        let out = format_table(&["Plate", "Net"], &rows);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "  Plate   Net");
        assert_eq!(lines[1], "  ------  -------");
        assert_eq!(lines[2], "  ABC123  1234.56");
        assert_eq!(lines[3], "  XY1     5");
    }

    #[test]
    fn test_format_table_empty() {
        assert_eq!(format_table(&["Plate"], &[]), "  (no rows)\n");
    }
}
