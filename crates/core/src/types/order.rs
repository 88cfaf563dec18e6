//! Order wire type for the catalog API.
//!
//! Orders are owned by the backend. This layer displays them and requests
//! status transitions; it never constructs one except in tests.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderId, OrderStatus};

/// An order as served by `GET /api/orders/user/email/{email}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub total: Decimal,
    #[serde(default)]
    pub payment: PaymentInfo,
    #[serde(default)]
    pub delivery: DeliveryInfo,
}

/// Payment summary attached to an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Delivery summary attached to an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInfo {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub expected_by: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_order() {
        let json = r#"{
            "orderId": 1001,
            "status": "processing",
            "createdAt": "2026-08-01T10:30:00Z",
            "total": "89.97",
            "payment": { "method": "card", "transactionId": "tx-9" },
            "delivery": { "address": "1 Elm St" }
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_id, OrderId::new(1001));
        assert_eq!(order.status, OrderStatus::Processing);
        assert!(order.status.is_cancellable());
        assert_eq!(order.payment.method, "card");
        assert!(order.delivery.expected_by.is_none());
    }

    #[test]
    fn test_deserialize_order_without_payment_block() {
        let json = r#"{
            "orderId": 2,
            "status": "delivered",
            "createdAt": "2026-07-15T08:00:00Z",
            "total": "12.00"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert!(order.payment.method.is_empty());
        assert!(order.status.is_terminal());
    }
}
