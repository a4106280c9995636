//! Delivery partners and the registry that owns them.
//!
//! The registry is the single canonical copy of partner state. The engine is its
//! only writer; everything handed out is a clone.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, DispatchResult};
use crate::graph::Node;
use crate::orders::OrderId;

pub type PartnerId = u64;

/// A mobile agent that carries one delivery at a time.
///
/// `is_available == false` exactly when `current_order` is set. Partners taken
/// off shift keep `is_available` but are skipped by matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub id: PartnerId,
    pub name: String,
    pub location: Node,
    pub is_available: bool,
    pub current_order: Option<OrderId>,
    #[serde(default = "default_on_shift")]
    pub on_shift: bool,
}

fn default_on_shift() -> bool {
    true
}

impl Partner {
    pub fn new(id: PartnerId, name: impl Into<String>, location: impl Into<Node>) -> Self {
        Self {
            id,
            name: name.into(),
            location: location.into(),
            is_available: true,
            current_order: None,
            on_shift: true,
        }
    }

    pub fn off_shift(mut self) -> Self {
        self.on_shift = false;
        self
    }

    /// Free and on shift.
    pub fn can_dispatch(&self) -> bool {
        self.is_available && self.on_shift
    }

    fn assign(&mut self, order_id: OrderId) {
        self.is_available = false;
        self.current_order = Some(order_id);
    }

    fn release_at(&mut self, location: Node) {
        self.is_available = true;
        self.current_order = None;
        self.location = location;
    }
}

/// Seed data for a partner, as found in scenario files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerSeed {
    pub id: PartnerId,
    pub name: String,
    pub location: Node,
    /// Initial availability. An unavailable seed has no order to carry, so it
    /// registers as off shift.
    #[serde(default = "default_on_shift")]
    pub is_available: bool,
}

impl From<PartnerSeed> for Partner {
    fn from(seed: PartnerSeed) -> Self {
        let partner = Partner::new(seed.id, seed.name, seed.location);
        if seed.is_available {
            partner
        } else {
            partner.off_shift()
        }
    }
}

/// Insertion-ordered partner store with id lookup.
#[derive(Debug, Clone, Default)]
pub struct PartnerRegistry {
    partners: Vec<Partner>,
    index: HashMap<PartnerId, usize>,
}

impl PartnerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, partner: Partner) -> DispatchResult<()> {
        if self.index.contains_key(&partner.id) {
            return Err(DispatchError::DuplicatePartner(partner.id));
        }
        self.index.insert(partner.id, self.partners.len());
        self.partners.push(partner);
        Ok(())
    }

    pub fn get(&self, id: PartnerId) -> Option<&Partner> {
        self.index.get(&id).map(|&idx| &self.partners[idx])
    }

    /// Partners in registration order, which is also the matching tie-break order.
    pub fn iter(&self) -> impl Iterator<Item = &Partner> {
        self.partners.iter()
    }

    pub fn len(&self) -> usize {
        self.partners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    pub fn snapshot(&self) -> Vec<Partner> {
        self.partners.clone()
    }

    /// Bind a dispatchable partner to an order. Returns false (and changes
    /// nothing) if the partner is unknown or not dispatchable.
    pub(crate) fn assign(&mut self, id: PartnerId, order_id: OrderId) -> bool {
        match self.get_mut(id) {
            Some(partner) if partner.can_dispatch() => {
                partner.assign(order_id);
                true
            }
            _ => false,
        }
    }

    /// Free a partner at the place it finished its delivery.
    pub(crate) fn release(&mut self, id: PartnerId, location: Node) -> bool {
        match self.get_mut(id) {
            Some(partner) => {
                partner.release_at(location);
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_on_shift(&mut self, id: PartnerId, on_shift: bool) -> DispatchResult<()> {
        let partner = self
            .get_mut(id)
            .ok_or(DispatchError::UnknownPartner(id))?;
        partner.on_shift = on_shift;
        Ok(())
    }

    fn get_mut(&mut self, id: PartnerId) -> Option<&mut Partner> {
        let idx = *self.index.get(&id)?;
        self.partners.get_mut(idx)
    }
}
