//! Active-assignment ledger: in-flight deliveries in assignment order.
//!
//! Entries live in an owned `Vec` (oldest first) with an order-id index on the
//! side. Partner lookups scan; there are few partners and one delivery each.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::Node;
use crate::orders::{Order, OrderId, OrderStatus};
use crate::partners::PartnerId;
use crate::routing::distance_serde;

/// Binding of one order to one partner, with both route legs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub order_id: OrderId,
    pub partner_id: PartnerId,
    pub partner_name: String,
    #[serde(with = "distance_serde")]
    pub partner_to_pickup_distance: f64,
    pub partner_to_pickup_path: Vec<Node>,
    #[serde(with = "distance_serde")]
    pub pickup_to_destination_distance: f64,
    pub pickup_to_destination_path: Vec<Node>,
    #[serde(with = "distance_serde")]
    pub total_distance: f64,
    #[serde(with = "distance_serde")]
    pub estimated_delivery_time_minutes: f64,
    pub assigned_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    /// The order being carried; its status tracks the delivery.
    pub order: Order,
}

impl Assignment {
    pub fn status(&self) -> OrderStatus {
        self.order.status
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentLedger {
    entries: Vec<Assignment>,
    by_order: HashMap<OrderId, usize>,
}

impl AssignmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, assignment: Assignment) {
        self.by_order
            .insert(assignment.order_id, self.entries.len());
        self.entries.push(assignment);
    }

    /// Remove the entry for `order_id`, keeping the relative order of the rest.
    pub fn remove_by_order_id(&mut self, order_id: OrderId) -> Option<Assignment> {
        let idx = self.by_order.remove(&order_id)?;
        let removed = self.entries.remove(idx);
        for entry in &self.entries[idx..] {
            if let Some(slot) = self.by_order.get_mut(&entry.order_id) {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn get_by_order_id(&self, order_id: OrderId) -> Option<&Assignment> {
        self.by_order.get(&order_id).map(|&idx| &self.entries[idx])
    }

    pub(crate) fn get_mut_by_order_id(&mut self, order_id: OrderId) -> Option<&mut Assignment> {
        let idx = *self.by_order.get(&order_id)?;
        self.entries.get_mut(idx)
    }

    pub fn get_by_partner_id(&self, partner_id: PartnerId) -> Option<&Assignment> {
        self.entries
            .iter()
            .find(|assignment| assignment.partner_id == partner_id)
    }

    /// Snapshot in insertion order (oldest assignment first).
    pub fn all(&self) -> Vec<Assignment> {
        self.entries.clone()
    }

    pub fn by_status(&self, status: OrderStatus) -> Vec<Assignment> {
        self.entries
            .iter()
            .filter(|assignment| assignment.status() == status)
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_order.clear();
    }
}
