//! Checkout module.
//!
//! Contains types for shipping addresses, payment data, and orders.

mod address;
mod order;
mod payment;

pub use address::ShippingAddress;
pub use order::{Order, OrderLineItem, OrderStatus};
pub use payment::{GatewayOrder, PaymentConfirmation, PaymentDetails};
