//! Dispatch engine: order intake, partner matching, assignment and completion.
//!
//! The engine owns the scheduler, the ledger, the archives and the partner
//! registry, and is the only code that mutates any of them. Every public
//! operation runs to completion synchronously; see [`crate::auto`] for sharing
//! an engine between tasks.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{DispatchError, DispatchResult};
use crate::graph::{Node, WeightedGraph};
use crate::ledger::{Assignment, AssignmentLedger};
use crate::matching::find_nearest_partner;
use crate::orders::{Order, OrderId, OrderRequest, OrderStatus};
use crate::partners::{Partner, PartnerId, PartnerRegistry};
use crate::priority::{estimated_delivery_time_minutes, PriorityBreakdown};
use crate::routing::{build_route_provider, RouteProvider, ShortestPath};
use crate::scenario::EngineConfig;
use crate::scheduler::OrderScheduler;
use crate::telemetry::{DispatchStatus, EngineSnapshot};

pub struct DispatchEngine {
    graph: Arc<WeightedGraph>,
    pickup: Node,
    router: Box<dyn RouteProvider>,
    scheduler: OrderScheduler,
    ledger: AssignmentLedger,
    completed: Vec<Assignment>,
    cancelled: Vec<Order>,
    next_order_id: OrderId,
    partners: PartnerRegistry,
    /// Partners as registered, restored by [`DispatchEngine::reset`].
    seeded_partners: PartnerRegistry,
    clock: Box<dyn Clock>,
    config: EngineConfig,
}

impl DispatchEngine {
    /// Create an engine dispatching from `pickup`. Fails if `pickup` is not a
    /// node of `graph`.
    pub fn new(
        graph: Arc<WeightedGraph>,
        pickup: impl Into<Node>,
        config: EngineConfig,
    ) -> DispatchResult<Self> {
        let pickup = pickup.into();
        if !graph.contains(pickup.as_str()) {
            return Err(DispatchError::UnknownNode(pickup));
        }
        let router = build_route_provider(&config.route_provider, Arc::clone(&graph));
        Ok(Self {
            graph,
            pickup,
            router,
            scheduler: OrderScheduler::new(),
            ledger: AssignmentLedger::new(),
            completed: Vec::new(),
            cancelled: Vec::new(),
            next_order_id: 1,
            partners: PartnerRegistry::new(),
            seeded_partners: PartnerRegistry::new(),
            clock: Box::new(SystemClock),
            config,
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the route provider built from the config.
    pub fn with_route_provider(mut self, router: Box<dyn RouteProvider>) -> Self {
        self.router = router;
        self
    }

    /// Register a partner. Its location must be a graph node and its id unused.
    pub fn add_partner(&mut self, partner: impl Into<Partner>) -> DispatchResult<()> {
        let partner = partner.into();
        if !self.graph.contains(partner.location.as_str()) {
            return Err(DispatchError::UnknownNode(partner.location));
        }
        self.partners.insert(partner.clone())?;
        info!(partner_id = partner.id, name = %partner.name, location = %partner.location, "partner registered");
        self.seeded_partners.insert(partner)
    }

    /// Put a partner on or off shift. Off-shift partners finish their current
    /// delivery but are not matched to new ones.
    pub fn set_partner_on_shift(&mut self, id: PartnerId, on_shift: bool) -> DispatchResult<()> {
        self.partners.set_on_shift(id, on_shift)?;
        debug!(partner_id = id, on_shift, "partner shift changed");
        Ok(())
    }

    /// Validate, score and queue a new order.
    ///
    /// Unknown destinations and negative or non-finite values are rejected. A
    /// known but unreachable destination is accepted with a saturated distance term.
    pub fn add_order(&mut self, request: OrderRequest) -> DispatchResult<Order> {
        if !request.order_value.is_finite() || request.order_value < 0.0 {
            return Err(DispatchError::InvalidOrderValue(request.order_value));
        }
        if !self.graph.contains(request.destination.as_str()) {
            return Err(DispatchError::UnknownNode(request.destination));
        }

        let route = self.router.route(&self.pickup, &request.destination);
        if !route.is_reachable() {
            warn!(destination = %request.destination, "destination unreachable from pickup");
        }
        let priority = PriorityBreakdown::compute(route.distance, request.order_value);

        let id = self.next_order_id;
        self.next_order_id += 1;
        let order = Order::pending(id, request, priority, self.clock.now());
        info!(
            order_id = id,
            priority_score = order.priority_score,
            distance = order.actual_distance,
            "order queued"
        );
        self.scheduler.enqueue(order.clone());
        Ok(order)
    }

    /// Dispatch the highest-priority pending order to the nearest free partner.
    ///
    /// Returns `None` when nothing is pending, or when no partner can take the
    /// order; in the latter case the order goes back to the queue with its score.
    pub fn process_next_order(&mut self) -> Option<Assignment> {
        let mut order = self.scheduler.dequeue()?;
        debug!(order_id = order.id, priority_score = order.priority_score, "processing order");

        let Some(candidate) =
            find_nearest_partner(self.partners.iter(), self.router.as_ref(), &self.pickup)
        else {
            warn!(order_id = order.id, "no available partner; order requeued");
            self.scheduler.enqueue(order);
            return None;
        };

        if !self.partners.assign(candidate.partner_id, order.id) {
            warn!(order_id = order.id, partner_id = candidate.partner_id, "partner vanished; order requeued");
            self.scheduler.enqueue(order);
            return None;
        }

        let delivery: ShortestPath = self.router.route(&self.pickup, &order.destination);
        if !delivery.is_reachable() {
            warn!(order_id = order.id, destination = %order.destination, "delivery leg unreachable");
        }

        let now = self.clock.now();
        order.status = OrderStatus::Assigned;
        order.assigned_at = Some(now);
        order.assigned_partner = Some(candidate.partner_name.clone());

        let total_distance = candidate.distance + delivery.distance;
        let assignment = Assignment {
            order_id: order.id,
            partner_id: candidate.partner_id,
            partner_name: candidate.partner_name,
            partner_to_pickup_distance: candidate.distance,
            partner_to_pickup_path: candidate.path,
            pickup_to_destination_distance: delivery.distance,
            pickup_to_destination_path: delivery.path,
            total_distance,
            estimated_delivery_time_minutes: estimated_delivery_time_minutes(total_distance),
            assigned_at: now,
            delivered_at: None,
            order,
        };
        info!(
            order_id = assignment.order_id,
            partner_id = assignment.partner_id,
            total_distance,
            eta_minutes = assignment.estimated_delivery_time_minutes,
            "order assigned"
        );

        self.ledger.add(assignment.clone());
        Some(assignment)
    }

    /// Dispatch up to `max` orders, stopping at the first order that cannot be placed.
    pub fn process_batch(&mut self, max: usize) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        while assignments.len() < max {
            match self.process_next_order() {
                Some(assignment) => assignments.push(assignment),
                None => break,
            }
        }
        assignments
    }

    /// [`DispatchEngine::process_batch`] with the configured batch size.
    pub fn process_default_batch(&mut self) -> Vec<Assignment> {
        self.process_batch(self.config.batch_size)
    }

    /// Finish an in-flight delivery. The partner is freed at the destination.
    /// Returns false if `order_id` has no active assignment.
    pub fn complete_delivery(&mut self, order_id: OrderId) -> bool {
        let Some(mut assignment) = self.ledger.remove_by_order_id(order_id) else {
            debug!(order_id, "no active delivery to complete");
            return false;
        };

        let now = self.clock.now();
        if !self
            .partners
            .release(assignment.partner_id, assignment.order.destination.clone())
        {
            warn!(order_id, partner_id = assignment.partner_id, "assigned partner missing from registry");
        }
        assignment.order.status = OrderStatus::Delivered;
        assignment.order.delivered_at = Some(now);
        assignment.delivered_at = Some(now);

        info!(order_id, partner_id = assignment.partner_id, "order delivered");
        self.completed.push(assignment);
        true
    }

    /// Cancel an order that is still pending. In-flight orders are not affected.
    pub fn cancel_order(&mut self, order_id: OrderId) -> bool {
        let Some(mut order) = self.scheduler.remove_by_id(order_id) else {
            debug!(order_id, "order not pending; cannot cancel");
            return false;
        };
        order.status = OrderStatus::Cancelled;
        order.cancelled_at = Some(self.clock.now());
        info!(order_id, "order cancelled");
        self.cancelled.push(order);
        true
    }

    /// Move an assigned order to `OutForDelivery`.
    pub fn mark_out_for_delivery(&mut self, order_id: OrderId) -> bool {
        match self.ledger.get_mut_by_order_id(order_id) {
            Some(assignment) if assignment.order.status == OrderStatus::Assigned => {
                assignment.order.status = OrderStatus::OutForDelivery;
                info!(order_id, "order out for delivery");
                true
            }
            _ => false,
        }
    }

    /// Status transition entry point for presentation layers. Only
    /// `OutForDelivery` and `Delivered` are caller-driven transitions.
    pub fn update_order_status(&mut self, order_id: OrderId, status: OrderStatus) -> bool {
        match status {
            OrderStatus::OutForDelivery => self.mark_out_for_delivery(order_id),
            OrderStatus::Delivered => self.complete_delivery(order_id),
            OrderStatus::Cancelled => self.cancel_order(order_id),
            OrderStatus::Pending | OrderStatus::Assigned => false,
        }
    }

    /// Drop all orders and restore partners to their registered state. The
    /// order id counter restarts at 1.
    pub fn reset(&mut self) {
        self.scheduler.clear();
        self.ledger.clear();
        self.completed.clear();
        self.cancelled.clear();
        self.next_order_id = 1;

        self.partners = self.seeded_partners.clone();
        info!("dispatch engine reset");
    }

    pub fn status(&self) -> DispatchStatus {
        DispatchStatus {
            pending: self.scheduler.len(),
            active: self.ledger.len(),
            completed: self.completed.len(),
            cancelled: self.cancelled.len(),
            total_ever_created: self.next_order_id - 1,
        }
    }

    /// `10 + 2 * total_distance` minutes.
    pub fn estimated_delivery_time(&self, total_distance: f64) -> f64 {
        estimated_delivery_time_minutes(total_distance)
    }

    /// Pending orders in heap-array order (not sorted).
    pub fn pending_orders(&self) -> Vec<Order> {
        self.scheduler.snapshot()
    }

    /// Pending orders in dispatch order.
    pub fn pending_orders_ranked(&self) -> Vec<Order> {
        self.scheduler.ranked()
    }

    pub fn next_pending(&self) -> Option<&Order> {
        self.scheduler.peek()
    }

    /// Active assignments, oldest first.
    pub fn active_assignments(&self) -> Vec<Assignment> {
        self.ledger.all()
    }

    pub fn assignments_with_status(&self, status: OrderStatus) -> Vec<Assignment> {
        self.ledger.by_status(status)
    }

    pub fn active_assignment(&self, order_id: OrderId) -> Option<&Assignment> {
        self.ledger.get_by_order_id(order_id)
    }

    pub fn assignment_for_partner(&self, partner_id: PartnerId) -> Option<&Assignment> {
        self.ledger.get_by_partner_id(partner_id)
    }

    /// Completed assignments in completion order.
    pub fn completed_assignments(&self) -> Vec<Assignment> {
        self.completed.clone()
    }

    pub fn cancelled_orders(&self) -> Vec<Order> {
        self.cancelled.clone()
    }

    pub fn partners(&self) -> Vec<Partner> {
        self.partners.snapshot()
    }

    pub fn partner(&self, id: PartnerId) -> Option<Partner> {
        self.partners.get(id).cloned()
    }

    /// Look an order up wherever it currently lives.
    pub fn order(&self, id: OrderId) -> Option<Order> {
        self.scheduler
            .get(id)
            .or_else(|| self.ledger.get_by_order_id(id).map(|a| &a.order))
            .or_else(|| {
                self.completed
                    .iter()
                    .find(|a| a.order_id == id)
                    .map(|a| &a.order)
            })
            .or_else(|| self.cancelled.iter().find(|o| o.id == id))
            .cloned()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            status: self.status(),
            pickup: self.pickup.clone(),
            pending: self.pending_orders_ranked(),
            active: self.active_assignments(),
            completed: self.completed_assignments(),
            partners: self.partners(),
        }
    }

    pub fn pickup(&self) -> &Node {
        &self.pickup
    }

    pub fn graph(&self) -> &Arc<WeightedGraph> {
        &self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Route between two nodes through the engine's provider.
    pub fn route(&self, from: &Node, to: &Node) -> ShortestPath {
        self.router.route(from, to)
    }
}
