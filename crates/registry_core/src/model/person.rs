//! Person model.
//!
//! # Invariants
//! - `tax_code` is stored uppercase and never changes after creation.
//! - `address_id` always refers to an existing `pr_address` row while foreign
//!   keys are enforced.

use crate::model::address::AddressId;
use serde::{Deserialize, Serialize};

/// Length of a tax code in characters.
pub const TAX_CODE_LEN: usize = 16;

/// Persisted person row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Primary key, uppercase.
    pub tax_code: String,
    pub name: String,
    pub surname: String,
    pub address_id: AddressId,
}

impl Person {
    /// Returns whether name or surname contains `needle`, ignoring case.
    ///
    /// `needle` must already be lowercase.
    pub fn name_matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.surname.to_lowercase().contains(needle)
    }
}

/// Uppercases the full tax code string.
///
/// Used for every lookup key, so `abcd...` and `ABCD...` address the same row.
pub fn normalize_tax_code(raw: &str) -> String {
    raw.to_uppercase()
}

/// Masks a tax code for log output, keeping only its first four characters.
pub fn mask_tax_code(tax_code: &str) -> String {
    let prefix: String = tax_code.chars().take(4).collect();
    format!("{prefix}***")
}
