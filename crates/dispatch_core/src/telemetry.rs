//! Engine counters and read-only snapshots for presentation layers.

use serde::{Deserialize, Serialize};

use crate::graph::Node;
use crate::ledger::Assignment;
use crate::orders::Order;
use crate::partners::Partner;

/// Aggregated counts at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchStatus {
    pub pending: usize,
    pub active: usize,
    pub completed: usize,
    pub cancelled: usize,
    /// Orders ever accepted since construction or the last reset.
    pub total_ever_created: u64,
}

impl DispatchStatus {
    /// Every accepted order is pending, active, completed or cancelled.
    pub fn is_conserved(&self) -> bool {
        (self.pending + self.active + self.completed + self.cancelled) as u64
            == self.total_ever_created
    }
}

/// Full engine view: counters plus cloned orders, assignments and partners.
/// `pending` is in dispatch order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub status: DispatchStatus,
    pub pickup: Node,
    pub pending: Vec<Order>,
    pub active: Vec<Assignment>,
    pub completed: Vec<Assignment>,
    pub partners: Vec<Partner>,
}

impl EngineSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
