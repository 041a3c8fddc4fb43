pub mod multialarm;
pub mod normalize;
pub mod sheet;
pub mod vodafone;
pub mod volvo;

pub use multialarm::export_multialarm_to_excel_bytes;
pub use vodafone::export_vodafone_to_excel_bytes;
pub use volvo::export_volvo_to_excel_bytes;

/// Sheet name used for single-sheet exports.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
