use std::path::Path;

use szamla_core::error::SzamlaError;
use szamla_core::ParsedInvoice;

pub fn print(parsed: &ParsedInvoice) -> Result<(), SzamlaError> {
    let json = serde_json::to_string_pretty(parsed)?;
    println!("{json}");
    Ok(())
}

pub fn write(parsed: &ParsedInvoice, path: &Path) -> Result<(), SzamlaError> {
    let json = serde_json::to_string_pretty(parsed)?;
    std::fs::write(path, json)?;
    Ok(())
}
