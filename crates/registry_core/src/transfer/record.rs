use crate::model::address::AddressFields;
use serde::{Deserialize, Serialize};

/// Person as exchanged with callers.
///
/// Missing fields deserialize as empty strings so that validation, not the
/// decoder, reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    #[serde(default)]
    pub tax_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    /// `None` on output when the stored reference could not be resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressRecord>,
}

/// Address as exchanged with callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub street_no: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub country: String,
}

impl From<&AddressFields> for AddressRecord {
    fn from(value: &AddressFields) -> Self {
        Self {
            street: value.street.clone(),
            street_no: value.street_no.clone(),
            city: value.city.clone(),
            province: value.province.clone(),
            country: value.country.clone(),
        }
    }
}

impl From<&AddressRecord> for AddressFields {
    fn from(value: &AddressRecord) -> Self {
        AddressFields::new(
            value.street.as_str(),
            value.street_no.as_str(),
            value.city.as_str(),
            value.province.as_str(),
            value.country.as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{AddressRecord, PersonRecord};

    #[test]
    fn absent_address_is_not_serialized() {
        let record = PersonRecord {
            tax_code: "ABCD12345E67F890".to_string(),
            name: "Mario".to_string(),
            surname: "Rossi".to_string(),
            address: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["taxCode"], "ABCD12345E67F890");
        assert!(json.get("address").is_none());
    }

    #[test]
    fn uses_camel_case_field_names() {
        let record: PersonRecord = serde_json::from_str(
            r#"{
                "taxCode": "x",
                "name": "n",
                "surname": "s",
                "address": {
                    "street": "Via Roma",
                    "streetNo": "10",
                    "city": "Milano",
                    "province": "mi",
                    "country": "Italy"
                }
            }"#,
        )
        .unwrap();
        let address = record.address.unwrap();
        assert_eq!(address.street_no, "10");
        assert_eq!(
            address,
            AddressRecord {
                street: "Via Roma".into(),
                street_no: "10".into(),
                city: "Milano".into(),
                province: "mi".into(),
                country: "Italy".into(),
            }
        );
    }
}
