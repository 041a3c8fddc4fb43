use szamla_core::error::SzamlaError;
use szamla_core::extraction::pdftotext::PdftotextExtractor;
use szamla_core::model::Layout;

pub fn list() -> Result<(), SzamlaError> {
    println!("Supported invoice layouts:\n");
    for layout in Layout::ALL {
        let description = match layout {
            Layout::Multialarm => "Multialarm fleet tracking (one row per vehicle)",
            Layout::Volvo => "Volvo fleet rental (one row per rented vehicle)",
            Layout::Vodafone => "Vodafone mobile (summary, per-subscriber charges, pivot)",
        };
        println!("  {:<12} {}", layout.to_string(), description);
        println!(
            "  {:<12} exports to {}",
            "",
            layout.export_file_name(Some("<number>"))
        );
        println!();
    }
    if !PdftotextExtractor::is_available() {
        println!("Note: pdftotext was not found on PATH; install poppler-utils to read PDFs.");
    }
    Ok(())
}
