//! Payment gateway seam.

use std::collections::HashSet;

use async_trait::async_trait;
use bazaar_commerce::checkout::{GatewayOrder, PaymentDetails};
use bazaar_commerce::money::Money;
use tokio::sync::RwLock;

use crate::{ShopError, ShopResult};

/// The external payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a gateway order for `amount` before the customer pays.
    async fn create_order(&self, amount: Money, receipt: &str) -> ShopResult<GatewayOrder>;

    /// Check a payment confirmation. `Ok(false)` means the gateway rejected it.
    async fn verify(&self, payment: &PaymentDetails) -> ShopResult<bool>;
}

/// A gateway that runs without a network connection.
///
/// Issues local order handles. In the default mode it accepts any complete
/// confirmation; in strict mode only confirmations for orders it issued,
/// each of which is accepted once.
#[derive(Debug, Default)]
pub struct OfflineGateway {
    key_id: String,
    strict: bool,
    issued: RwLock<HashSet<String>>,
}

impl OfflineGateway {
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            ..Default::default()
        }
    }

    /// Only accept confirmations for gateway orders created here.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }
}

#[async_trait]
impl PaymentGateway for OfflineGateway {
    async fn create_order(&self, amount: Money, receipt: &str) -> ShopResult<GatewayOrder> {
        if amount.amount_minor <= 0 {
            return Err(ShopError::Upstream(format!(
                "gateway refused amount {}",
                amount
            )));
        }
        let id = format!("order_{:016x}", rand::random::<u64>());
        self.issued.write().await.insert(id.clone());
        Ok(GatewayOrder {
            id,
            amount,
            receipt: receipt.to_string(),
        })
    }

    async fn verify(&self, payment: &PaymentDetails) -> ShopResult<bool> {
        if !self.strict {
            return Ok(true);
        }
        // A confirmed gateway order cannot be confirmed twice.
        Ok(self.issued.write().await.remove(&payment.gateway_order_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_commerce::money::Currency;

    fn details(order_id: &str) -> PaymentDetails {
        PaymentDetails {
            payment_id: "pay_1".to_string(),
            gateway_order_id: order_id.to_string(),
            signature: "sig".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_order() {
        let gateway = OfflineGateway::new("rzp_test");
        let order = gateway
            .create_order(Money::new(25_000, Currency::INR), "rcpt_1")
            .await
            .unwrap();
        assert!(order.id.starts_with("order_"));
        assert_eq!(order.receipt, "rcpt_1");
        assert_eq!(gateway.key_id(), "rzp_test");
    }

    #[tokio::test]
    async fn test_zero_amount_refused() {
        let gateway = OfflineGateway::new("k");
        let err = gateway
            .create_order(Money::zero(Currency::INR), "rcpt")
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_strict_verification() {
        let gateway = OfflineGateway::new("k").strict();
        let order = gateway
            .create_order(Money::new(100, Currency::INR), "rcpt")
            .await
            .unwrap();

        assert!(!gateway.verify(&details("order_forged")).await.unwrap());
        assert!(gateway.verify(&details(&order.id)).await.unwrap());
        assert!(OfflineGateway::new("k").verify(&details("any")).await.unwrap());
    }

    #[tokio::test]
    async fn test_strict_confirmation_is_single_use() {
        let gateway = OfflineGateway::new("k").strict();
        let first = gateway
            .create_order(Money::new(100, Currency::INR), "rcpt_1")
            .await
            .unwrap();
        let second = gateway
            .create_order(Money::new(200, Currency::INR), "rcpt_2")
            .await
            .unwrap();
        assert_eq!(gateway.issued.read().await.len(), 2);

        assert!(gateway.verify(&details(&first.id)).await.unwrap());
        assert!(!gateway.verify(&details(&first.id)).await.unwrap());
        assert_eq!(gateway.issued.read().await.len(), 1);
        assert!(gateway.verify(&details(&second.id)).await.unwrap());
        assert!(gateway.issued.read().await.is_empty());
    }
}
