//! Regex patterns shared by the layout parsers.

use regex::Regex;
use std::sync::LazyLock;

// Multialarm header labels
pub static MULTIALARM_INVOICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Számla száma:\s*(\d+)").unwrap());
pub static MULTIALARM_INVOICE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Számla kelte:\s*([\d.]+)").unwrap());
pub static MULTIALARM_PERFORMANCE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Teljesítési dátum:\s*([\d.]+)").unwrap());
pub static MULTIALARM_PAYMENT_DUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Fizetési határidő:\s*([\d.]+)").unwrap());

// Multialarm line items
pub static MULTIALARM_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Időszak:\s*([\d.]+ - [\d.]+)").unwrap());
pub static MULTIALARM_LICENSE_PLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Felszerelési hely:\s+(\S+)").unwrap());
pub static MULTIALARM_CHARGE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Menetlevél \+ útdíj alapszolgáltatás[^\n]+").unwrap());
/// Space-grouped forint amount: "1 234,56Ft".
pub static HUF_SPACED_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3}(?: \d{3})*,\d{2})Ft").unwrap());
pub static VAT_PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\s?%").unwrap());

// Volvo
/// DD-MM-YYYY
pub static DASHED_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}-\d{2}-\d{4}").unwrap());
pub static PLATE_BEFORE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.+?)\s*\d{2}-\d{2}-\d{4}").unwrap());
/// Dot-grouped amount: "1.234,56".
pub static HUF_DOTTED_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,3}(?:\.\d{3})*,\d{2}").unwrap());

// Vodafone
pub static TESZOR_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{2}\.\d{2}\.\d{1,2}\b").unwrap());
pub static VODAFONE_INVOICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Számlaszám[:\s]+(\d+)").unwrap());
pub static VODAFONE_PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Telefonszám:\s*(36\d{9})").unwrap());

// Cleaned amount after grouping dots are removed and the comma became a dot.
pub static PLAIN_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teszor_code_variants() {
        assert!(TESZOR_CODE.is_match("Előfizetési díj 61.20.1 1 000,00"));
        assert!(TESZOR_CODE.is_match("Roaming 61.20.42"));
        assert!(!TESZOR_CODE.is_match("Díj 2024.01.31"));
    }

    #[test]
    fn test_spaced_amount_requires_ft_suffix() {
        let found: Vec<&str> = HUF_SPACED_AMOUNT
            .captures_iter("1 234,56Ft 99,00 12,00Ft")
            .map(|c| c.get(1).unwrap().as_str())
            .collect();
        assert_eq!(found, vec!["1 234,56", "12,00"]);
    }
}
