pub mod reference;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Employee attributes attached to a phone number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    #[serde(default)]
    pub cost_center: Option<String>,
    #[serde(default)]
    pub monogram: Option<String>,
    #[serde(default)]
    pub axapta_name: Option<String>,
}

/// One phonebook record joined with its employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneBookEntry {
    pub phone_number: String,
    #[serde(default)]
    pub employee: Option<Employee>,
}

/// A TESZOR code joined with its VAT code and expense type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeszorVatLedgerEntry {
    #[serde(default)]
    pub teszor_code: Option<String>,
    #[serde(default)]
    pub vat_code: Option<String>,
    #[serde(default)]
    pub vat_rate: Option<String>,
    #[serde(default)]
    pub expense_title: Option<String>,
    #[serde(default)]
    pub expense_account_number: Option<String>,
}

/// Ledger classification for a (TESZOR code, VAT rate) pair.
///
/// `ledger_account` is empty when the expense type has no account number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerMapping {
    pub title: String,
    pub vat_code: String,
    pub ledger_account: String,
}

pub type PhoneUserMap = HashMap<String, Employee>;
/// TESZOR code -> expense title.
pub type TeszorCategoryMap = HashMap<String, String>;
/// (TESZOR code, VAT rate) -> ledger classification.
pub type MappingLookup = HashMap<(String, String), LedgerMapping>;

/// Phone number -> employee. A later entry for the same number replaces an
/// earlier one; entries without an employee are left out.
pub fn build_phone_user_map(entries: &[PhoneBookEntry]) -> PhoneUserMap {
    entries
        .iter()
        .filter_map(|e| {
            e.employee
                .as_ref()
                .map(|emp| (e.phone_number.clone(), emp.clone()))
        })
        .collect()
}

/// Build the TESZOR category map and the (TESZOR, VAT rate) ledger lookup.
///
/// Entries lacking any component a map needs are skipped for that map.
pub fn build_teszor_maps(entries: &[TeszorVatLedgerEntry]) -> (TeszorCategoryMap, MappingLookup) {
    let mut categories = TeszorCategoryMap::new();
    let mut lookup = MappingLookup::new();

    for entry in entries {
        let (Some(teszor), Some(title)) = (
            non_empty(&entry.teszor_code),
            non_empty(&entry.expense_title),
        ) else {
            continue;
        };
        categories.insert(teszor.to_string(), title.to_string());

        if let Some(vat_code) = non_empty(&entry.vat_code) {
            let rate = entry.vat_rate.clone().unwrap_or_default();
            lookup.insert(
                (teszor.to_string(), rate),
                LedgerMapping {
                    title: title.to_string(),
                    vat_code: vat_code.to_string(),
                    ledger_account: entry.expense_account_number.clone().unwrap_or_default(),
                },
            );
        }
    }

    (categories, lookup)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Resolved reference data consumed by the Vodafone exporter.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub phone_users: PhoneUserMap,
    pub teszor_categories: TeszorCategoryMap,
    pub ledger_mappings: MappingLookup,
}

impl ReferenceData {
    pub fn new(phone_book: &[PhoneBookEntry], teszor_mappings: &[TeszorVatLedgerEntry]) -> Self {
        let (teszor_categories, ledger_mappings) = build_teszor_maps(teszor_mappings);
        ReferenceData {
            phone_users: build_phone_user_map(phone_book),
            teszor_categories,
            ledger_mappings,
        }
    }

    pub fn employee(&self, phone_number: &str) -> Option<&Employee> {
        self.phone_users.get(phone_number)
    }

    pub fn ledger_mapping(&self, teszor_code: &str, vat_rate: &str) -> Option<&LedgerMapping> {
        self.ledger_mappings
            .get(&(teszor_code.to_string(), vat_rate.to_string()))
    }
}
