use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    /// Contact person.
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SupplierInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    #[validate(custom = "validate_optional_email")]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl Supplier {
    pub fn from_input(id: String, input: SupplierInput) -> Self {
        Self {
            id,
            name: input.name,
            contact: input.contact,
            email: input.email,
            phone: input.phone,
            address: input.address,
        }
    }
}

fn validate_optional_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || validator::validate_email(email) {
        Ok(())
    } else {
        let mut err = ValidationError::new("email");
        err.message = Some("email must be empty or a valid address".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_optional_but_checked_when_present() {
        let mut input = SupplierInput {
            name: "TechCorp Inc.".into(),
            ..Default::default()
        };
        assert!(input.validate().is_ok());

        input.email = "john@techcorp.com".into();
        assert!(input.validate().is_ok());

        input.email = "not-an-email".into();
        assert!(input.validate().is_err());
    }

    #[test]
    fn missing_contact_fields_default_to_empty() {
        let supplier: Supplier = serde_json::from_str(r#"{"id":"9","name":"Acme"}"#).unwrap();
        assert_eq!(supplier.contact, "");
        assert_eq!(supplier.address, "");
    }
}
