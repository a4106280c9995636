#![allow(dead_code)]

use dispatch_core::{DispatchEngine, OrderStatus};

/// Check the cross-structure invariants: scheduler, ledger, archives and
/// partner registry must agree with each other.
pub fn assert_engine_invariants(engine: &DispatchEngine) {
    let partners = engine.partners();
    let active = engine.active_assignments();

    for partner in &partners {
        assert_eq!(
            partner.is_available,
            partner.current_order.is_none(),
            "partner {} availability out of sync with current order",
            partner.id
        );
    }

    for assignment in &active {
        assert!(
            assignment.order.status.is_in_flight(),
            "active order {} has status {}",
            assignment.order_id,
            assignment.order.status
        );
        let carriers: Vec<_> = partners
            .iter()
            .filter(|p| p.current_order == Some(assignment.order_id))
            .collect();
        assert_eq!(carriers.len(), 1, "order {} carriers", assignment.order_id);
        assert_eq!(carriers[0].id, assignment.partner_id);
    }

    let busy = partners.iter().filter(|p| p.current_order.is_some()).count();
    assert_eq!(busy, active.len(), "busy partners vs active assignments");

    for order in engine.pending_orders() {
        assert_eq!(order.status, OrderStatus::Pending);
    }
    for assignment in engine.completed_assignments() {
        assert_eq!(assignment.order.status, OrderStatus::Delivered);
        assert!(engine.active_assignment(assignment.order_id).is_none());
        assert!(assignment.delivered_at.is_some());
    }
    for order in engine.cancelled_orders() {
        assert_eq!(order.status, OrderStatus::Cancelled);
    }

    let status = engine.status();
    assert!(status.is_conserved(), "conservation violated: {status:?}");
}

/// Pending order ids in the order they would be dispatched.
pub fn ranked_ids(engine: &DispatchEngine) -> Vec<u64> {
    engine.pending_orders_ranked().iter().map(|o| o.id).collect()
}
