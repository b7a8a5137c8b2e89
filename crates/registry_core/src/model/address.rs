//! Shared address model.
//!
//! # Invariants
//! - `(street, street_no, city, province, country)` is unique across rows.
//! - Stored `province` is always uppercase.
//! - Address rows are immutable once inserted.

use serde::{Deserialize, Serialize};

/// Surrogate key assigned by the address store on insert.
pub type AddressId = i64;

/// The five identifying fields of an address.
///
/// Comparison is exact and case-sensitive; call [`AddressFields::normalized`]
/// before using a value as a lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressFields {
    pub street: String,
    pub street_no: String,
    pub city: String,
    /// Two-letter province code.
    pub province: String,
    pub country: String,
}

impl AddressFields {
    pub fn new(
        street: impl Into<String>,
        street_no: impl Into<String>,
        city: impl Into<String>,
        province: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            street_no: street_no.into(),
            city: city.into(),
            province: province.into(),
            country: country.into(),
        }
    }

    /// Returns a copy with the province uppercased. Other fields are kept
    /// byte-for-byte.
    pub fn normalized(&self) -> Self {
        Self {
            province: normalize_province(&self.province),
            ..self.clone()
        }
    }
}

/// Persisted address row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    #[serde(flatten)]
    pub fields: AddressFields,
}

/// Uppercases the full province string.
pub fn normalize_province(raw: &str) -> String {
    raw.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::AddressFields;

    #[test]
    fn normalized_only_touches_province() {
        let fields = AddressFields::new("via Roma", "10b", "milano", "mi", "italy");
        let normalized = fields.normalized();
        assert_eq!(normalized.province, "MI");
        assert_eq!(normalized.street, "via Roma");
        assert_eq!(normalized.street_no, "10b");
        assert_eq!(normalized.city, "milano");
        assert_eq!(normalized.country, "italy");
    }
}
