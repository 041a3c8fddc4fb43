use std::path::PathBuf;

use crate::model::Layout;

#[derive(Debug, thiserror::Error)]
pub enum SzamlaError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("unknown invoice layout '{0}'. Available: multialarm, volvo, vodafone")]
    UnknownLayout(String),

    #[error("failed to load reference data from {path}: {reason}")]
    ReferenceLoad { path: PathBuf, reason: String },

    #[error("no exportable data found in {0} invoice")]
    NoData(Layout),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
