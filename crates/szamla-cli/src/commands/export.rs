use std::path::PathBuf;

use szamla_core::error::SzamlaError;
use szamla_core::extraction::pdftotext::PdftotextExtractor;
use szamla_core::lookup::reference::{load_phone_book, load_teszor_mappings};
use szamla_core::lookup::ReferenceData;
use szamla_core::model::Layout;
use tracing::warn;

pub fn run(
    layout: Layout,
    pdf_file: PathBuf,
    phone_book: Option<PathBuf>,
    teszor_map: Option<PathBuf>,
    out_dir: PathBuf,
) -> Result<(), SzamlaError> {
    let reference = load_reference(layout, phone_book, teszor_map)?;

    let pdf_bytes = std::fs::read(&pdf_file)?;
    let extractor = PdftotextExtractor::new();
    let output = szamla_core::export_pdf(&pdf_bytes, &extractor, layout, &reference)?;

    std::fs::create_dir_all(&out_dir)?;
    let path = out_dir.join(&output.file_name);
    std::fs::write(&path, &output.bytes)?;
    eprintln!("Wrote {}", path.display());

    Ok(())
}

fn load_reference(
    layout: Layout,
    phone_book: Option<PathBuf>,
    teszor_map: Option<PathBuf>,
) -> Result<ReferenceData, SzamlaError> {
    if layout != Layout::Vodafone {
        if phone_book.is_some() || teszor_map.is_some() {
            warn!(%layout, "reference data is only used for vodafone invoices");
        }
        return Ok(ReferenceData::default());
    }

    let phone_book = match phone_book {
        Some(path) => load_phone_book(&path)?,
        None => Vec::new(),
    };
    let teszor_map = match teszor_map {
        Some(path) => load_teszor_mappings(&path)?,
        None => Vec::new(),
    };
    if phone_book.is_empty() || teszor_map.is_empty() {
        warn!("no reference data for some lookups, placeholders will be used");
    }
    Ok(ReferenceData::new(&phone_book, &teszor_map))
}
