//! Inbound validation for create and update requests.
//!
//! Rules:
//! - `taxCode`: uppercased, then `^[A-Z0-9]{16}$`.
//! - `name`, `surname`: not blank after trimming.
//! - `address`: present; `street`, `streetNo`, `city`, `country` not blank.
//! - `address.province`: uppercased, then `^[A-Z]{2}$`.
//!
//! All violations are collected instead of stopping at the first one.

use crate::model::address::{normalize_province, AddressFields};
use crate::model::person::normalize_tax_code;
use crate::transfer::record::{AddressRecord, PersonRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static TAX_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{16}$").expect("valid tax code regex"));
static PROVINCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}$").expect("valid province regex"));

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Transfer field path, e.g. `address.province`.
    pub field: &'static str,
    pub message: &'static str,
}

/// Malformed inbound record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns whether `field` is among the violations.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed:")?;
        for (index, violation) in self.violations.iter().enumerate() {
            let sep = if index == 0 { " " } else { "; " };
            write!(f, "{sep}{} {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

impl Error for ValidationError {}

/// Address tuple that passed validation, province uppercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAddress {
    fields: AddressFields,
}

impl ValidatedAddress {
    pub fn fields(&self) -> &AddressFields {
        &self.fields
    }
}

/// Validated person data without identity, as used by update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonDraft {
    name: String,
    surname: String,
    address: ValidatedAddress,
}

impl PersonDraft {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn address(&self) -> &ValidatedAddress {
        &self.address
    }
}

/// Validated create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    tax_code: String,
    draft: PersonDraft,
}

impl NewPerson {
    /// Uppercase tax code.
    pub fn tax_code(&self) -> &str {
        &self.tax_code
    }

    pub fn draft(&self) -> &PersonDraft {
        &self.draft
    }
}

/// Validates a create request, tax code included.
pub fn validate_new_person(record: &PersonRecord) -> Result<NewPerson, ValidationError> {
    let mut violations = Vec::new();
    let tax_code = normalize_tax_code(&record.tax_code);
    if !TAX_CODE_RE.is_match(&tax_code) {
        violations.push(FieldViolation {
            field: "taxCode",
            message: "must be 16 letters or digits",
        });
    }

    let draft = collect_draft(record, &mut violations);
    match draft {
        Some(draft) if violations.is_empty() => Ok(NewPerson { tax_code, draft }),
        _ => Err(ValidationError { violations }),
    }
}

/// Validates an update request. The record's tax code is ignored.
pub fn validate_person_update(record: &PersonRecord) -> Result<PersonDraft, ValidationError> {
    let mut violations = Vec::new();
    let draft = collect_draft(record, &mut violations);
    match draft {
        Some(draft) if violations.is_empty() => Ok(draft),
        _ => Err(ValidationError { violations }),
    }
}

/// Validates a standalone address, as accepted by find-or-create.
pub fn validate_address(record: &AddressRecord) -> Result<ValidatedAddress, ValidationError> {
    let mut violations = Vec::new();
    let address = collect_address(record, &mut violations);
    if violations.is_empty() {
        Ok(address)
    } else {
        Err(ValidationError { violations })
    }
}

fn collect_draft(
    record: &PersonRecord,
    violations: &mut Vec<FieldViolation>,
) -> Option<PersonDraft> {
    require_not_blank(&record.name, "name", violations);
    require_not_blank(&record.surname, "surname", violations);

    let Some(address) = record.address.as_ref() else {
        violations.push(FieldViolation {
            field: "address",
            message: "is required",
        });
        return None;
    };

    let address = collect_address(address, violations);
    Some(PersonDraft {
        name: record.name.clone(),
        surname: record.surname.clone(),
        address,
    })
}

fn collect_address(
    address: &AddressRecord,
    violations: &mut Vec<FieldViolation>,
) -> ValidatedAddress {
    require_not_blank(&address.street, "address.street", violations);
    require_not_blank(&address.street_no, "address.streetNo", violations);
    require_not_blank(&address.city, "address.city", violations);
    require_not_blank(&address.country, "address.country", violations);

    let province = normalize_province(&address.province);
    if !PROVINCE_RE.is_match(&province) {
        violations.push(FieldViolation {
            field: "address.province",
            message: "must be 2 letters",
        });
    }

    ValidatedAddress {
        fields: AddressFields {
            province,
            ..AddressFields::from(address)
        },
    }
}

fn require_not_blank(value: &str, field: &'static str, violations: &mut Vec<FieldViolation>) {
    if value.trim().is_empty() {
        violations.push(FieldViolation {
            field,
            message: "must not be blank",
        });
    }
}
