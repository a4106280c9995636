use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::Node;
use crate::priority::PriorityBreakdown;
use crate::routing::distance_serde;

pub type OrderId = u64;

/// Order lifecycle. `Assigned` and `OutForDelivery` orders live in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Assigned,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// True while a partner is bound to the order.
    pub fn is_in_flight(self) -> bool {
        matches!(self, OrderStatus::Assigned | OrderStatus::OutForDelivery)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Assigned => "assigned",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// Caller-supplied order data, before the engine assigns an id and a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub customer_name: String,
    pub restaurant: String,
    #[serde(default)]
    pub items: Vec<String>,
    pub order_value: f64,
    pub destination: Node,
}

impl OrderRequest {
    pub fn new(
        customer_name: impl Into<String>,
        restaurant: impl Into<String>,
        order_value: f64,
        destination: impl Into<Node>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            restaurant: restaurant.into(),
            items: Vec::new(),
            order_value,
            destination: destination.into(),
        }
    }

    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }
}

/// A delivery order as tracked by the engine.
///
/// `priority_score` is fixed at intake. Lifecycle timestamps stay `None` until
/// the matching transition happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub restaurant: String,
    pub items: Vec<String>,
    pub order_value: f64,
    pub destination: Node,
    pub status: OrderStatus,
    pub priority_score: f64,
    #[serde(with = "distance_serde")]
    pub actual_distance: f64,
    pub priority: PriorityBreakdown,
    pub created_at: DateTime<Utc>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub assigned_partner: Option<String>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Order {
    pub(crate) fn pending(
        id: OrderId,
        request: OrderRequest,
        priority: PriorityBreakdown,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer_name: request.customer_name,
            restaurant: request.restaurant,
            items: request.items,
            order_value: request.order_value,
            destination: request.destination,
            status: OrderStatus::Pending,
            priority_score: priority.score,
            actual_distance: priority.actual_distance,
            priority,
            created_at,
            assigned_at: None,
            assigned_partner: None,
            delivered_at: None,
            cancelled_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).expect("json");
        assert_eq!(json, "\"out_for_delivery\"");
        assert_eq!(OrderStatus::OutForDelivery.to_string(), "out_for_delivery");
    }

    #[test]
    fn only_assigned_and_out_for_delivery_are_in_flight() {
        assert!(OrderStatus::Assigned.is_in_flight());
        assert!(OrderStatus::OutForDelivery.is_in_flight());
        assert!(!OrderStatus::Pending.is_in_flight());
        assert!(!OrderStatus::Delivered.is_in_flight());
        assert!(!OrderStatus::Cancelled.is_in_flight());
    }

    #[test]
    fn pending_order_copies_request_and_score() {
        let request = OrderRequest::new("Alice", "Pizza Palace", 450.0, "E")
            .with_items(["Large Pizza", "Coke"]);
        let priority = PriorityBreakdown::compute(6.0, 450.0);
        let order = Order::pending(7, request, priority, DateTime::<Utc>::default());

        assert_eq!(order.id, 7);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items, vec!["Large Pizza", "Coke"]);
        assert_eq!(order.priority_score, priority.score);
        assert_eq!(order.actual_distance, 6.0);
        assert!(order.assigned_at.is_none());
        assert!(order.delivered_at.is_none());
    }

    #[test]
    fn request_items_default_when_missing() {
        let request: OrderRequest = serde_json::from_str(
            r#"{"customer_name":"Bob","restaurant":"Burger Hub","order_value":320,"destination":"C"}"#,
        )
        .expect("request");
        assert!(request.items.is_empty());
        assert_eq!(request.destination, Node::from("C"));
    }
}
