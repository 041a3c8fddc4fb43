use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use tracing::info;

use crate::error::SzamlaError;
use crate::lookup::{Employee, PhoneBookEntry, TeszorVatLedgerEntry};

/// Load phonebook entries from a JSON array or an `.xlsx` export.
///
/// Spreadsheets are read from their first sheet; the header row must name
/// `phone_number` and `name`, and may name `cost_center`, `monogram` and
/// `axapta_name`.
pub fn load_phone_book(path: &Path) -> Result<Vec<PhoneBookEntry>, SzamlaError> {
    let entries = if is_xlsx(path) {
        let rows = read_sheet_records(path)?;
        rows.into_iter().map(phone_book_entry_from_record).collect()
    } else {
        read_json::<Vec<PhoneBookEntry>>(path)?
    };
    validate_phone_book(&entries).map_err(|reason| SzamlaError::ReferenceLoad {
        path: path.to_path_buf(),
        reason,
    })?;
    info!(path = %path.display(), entries = entries.len(), "loaded phone book");
    Ok(entries)
}

/// Load TESZOR / VAT / expense type rows from a JSON array or an `.xlsx` export.
///
/// Spreadsheet columns: `teszor_code`, `vat_code`, `vat_rate`,
/// `expense_title`, `expense_account_number`.
pub fn load_teszor_mappings(path: &Path) -> Result<Vec<TeszorVatLedgerEntry>, SzamlaError> {
    let entries = if is_xlsx(path) {
        let rows = read_sheet_records(path)?;
        rows.into_iter()
            .map(|mut r| TeszorVatLedgerEntry {
                teszor_code: r.remove("teszor_code"),
                vat_code: r.remove("vat_code"),
                vat_rate: r.remove("vat_rate"),
                expense_title: r.remove("expense_title"),
                expense_account_number: r.remove("expense_account_number"),
            })
            .collect()
    } else {
        read_json::<Vec<TeszorVatLedgerEntry>>(path)?
    };
    info!(path = %path.display(), entries = entries.len(), "loaded TESZOR mappings");
    Ok(entries)
}

/// Phone numbers must be present; duplicates are allowed (the later one wins).
pub fn validate_phone_book(entries: &[PhoneBookEntry]) -> Result<(), String> {
    for (i, entry) in entries.iter().enumerate() {
        if entry.phone_number.trim().is_empty() {
            return Err(format!("entry {} has an empty phone number", i + 1));
        }
    }
    Ok(())
}

fn is_xlsx(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SzamlaError> {
    let content = std::fs::read_to_string(path).map_err(|e| SzamlaError::ReferenceLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| SzamlaError::ReferenceLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn read_sheet_records(path: &Path) -> Result<Vec<HashMap<String, String>>, SzamlaError> {
    let load_err = |reason: String| SzamlaError::ReferenceLoad {
        path: path.to_path_buf(),
        reason,
    };
    let bytes = std::fs::read(path).map_err(|e| load_err(e.to_string()))?;
    sheet_records(&bytes).map_err(load_err)
}

/// Read the first sheet of an xlsx workbook into header-keyed records.
///
/// Header names are trimmed and lowercased; empty cells are left out of the record.
pub fn sheet_records(bytes: &[u8]) -> Result<Vec<HashMap<String, String>>, String> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
        .map_err(|e| format!("failed to open xlsx: {e}"))?;

    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| "workbook has no sheets".to_string())?
        .map_err(|e| format!("failed to read first sheet: {e}"))?;

    let mut rows = sheet.rows();
    let header: Vec<String> = match rows.next() {
        Some(cells) => cells
            .iter()
            .map(|c| cell_as_string(c).unwrap_or_default().to_lowercase())
            .collect(),
        None => return Ok(Vec::new()),
    };

    let records = rows
        .map(|cells| {
            header
                .iter()
                .zip(cells)
                .filter(|(name, _)| !name.is_empty())
                .filter_map(|(name, cell)| cell_as_string(cell).map(|v| (name.clone(), v)))
                .collect::<HashMap<String, String>>()
        })
        .filter(|record| !record.is_empty())
        .collect();

    Ok(records)
}

fn phone_book_entry_from_record(mut record: HashMap<String, String>) -> PhoneBookEntry {
    let phone_number = record.remove("phone_number").unwrap_or_default();
    let employee = record.remove("name").map(|name| Employee {
        name,
        cost_center: record.remove("cost_center"),
        monogram: record.remove("monogram"),
        axapta_name: record.remove("axapta_name"),
    });
    PhoneBookEntry {
        phone_number,
        employee,
    }
}

fn cell_as_string(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Empty => None,
        _ => Some(format!("{cell}")),
    }
}
