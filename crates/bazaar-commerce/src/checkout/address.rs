//! Shipping address captured at checkout.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// A postal address snapshot stored on the order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Recipient's full name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Street address.
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
}

impl ShippingAddress {
    /// Check that every required field is filled in.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let required = [
            ("full_name", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CommerceError::validation(field, "is required"));
            }
        }
        if !self.email.contains('@') {
            return Err(CommerceError::validation("email", "is not an email address"));
        }
        Ok(())
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        [&self.address, &self.city, &self.state, &self.zip_code, &self.country]
            .into_iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
