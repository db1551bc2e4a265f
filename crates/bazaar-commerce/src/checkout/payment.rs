//! Payment gateway data.

use crate::error::CommerceError;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// What the gateway hands back to the browser after a successful charge.
///
/// Every field is optional on the wire; [`PaymentConfirmation::validate`]
/// turns it into [`PaymentDetails`] once all three are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentConfirmation {
    #[serde(default, alias = "razorpay_payment_id")]
    pub payment_id: Option<String>,
    #[serde(default, alias = "razorpay_order_id")]
    pub gateway_order_id: Option<String>,
    #[serde(default, alias = "razorpay_signature")]
    pub signature: Option<String>,
}

impl PaymentConfirmation {
    pub fn new(
        payment_id: impl Into<String>,
        gateway_order_id: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            payment_id: Some(payment_id.into()),
            gateway_order_id: Some(gateway_order_id.into()),
            signature: Some(signature.into()),
        }
    }

    /// Check the confirmation is structurally complete.
    pub fn validate(&self) -> Result<PaymentDetails, CommerceError> {
        fn required(value: &Option<String>, name: &str) -> Result<String, CommerceError> {
            match value.as_deref().map(str::trim) {
                Some(v) if !v.is_empty() => Ok(v.to_string()),
                _ => Err(CommerceError::PaymentValidation(format!("missing {}", name))),
            }
        }

        Ok(PaymentDetails {
            payment_id: required(&self.payment_id, "payment_id")?,
            gateway_order_id: required(&self.gateway_order_id, "gateway_order_id")?,
            signature: required(&self.signature, "signature")?,
        })
    }
}

/// Verified payment identifiers stored on an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentDetails {
    pub payment_id: String,
    pub gateway_order_id: String,
    pub signature: String,
}

/// A payment handle issued by the gateway before the customer pays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewayOrder {
    /// Gateway-side order id.
    pub id: String,
    /// Amount to be charged.
    pub amount: Money,
    /// Our receipt reference.
    pub receipt: String,
}
