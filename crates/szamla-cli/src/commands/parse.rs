use szamla_core::error::SzamlaError;
use szamla_core::extraction::pdftotext::PdftotextExtractor;
use szamla_core::model::Layout;
use std::path::PathBuf;

use crate::output;

pub fn run(
    layout: Layout,
    pdf_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), SzamlaError> {
    let pdf_bytes = std::fs::read(&pdf_file)?;
    let extractor = PdftotextExtractor::new();
    let parsed = szamla_core::parse_pdf(&pdf_bytes, &extractor, layout)?;

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            output::json::write(&parsed, &path)?;
            eprintln!(
                "Parsed {} row(s) from {} invoice, written to {}",
                parsed.row_count(),
                layout,
                path.display()
            );
        }
        None => match output_format {
            "json" => output::json::print(&parsed)?,
            _ => output::table::print(&parsed),
        },
    }

    if !parsed.skipped_lines().is_empty() {
        eprintln!(
            "  {} line(s) skipped during parsing",
            parsed.skipped_lines().len()
        );
    }

    Ok(())
}
