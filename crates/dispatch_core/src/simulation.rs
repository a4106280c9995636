//! Simulated activity for auto-processing.
//!
//! [`run_tick`] is one step of demo traffic: maybe submit a generated order,
//! dispatch the next pending order, maybe complete one active delivery. It only
//! uses the engine's public operations, so the engine stays unaware of ticks.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::engine::DispatchEngine;
use crate::error::DispatchResult;
use crate::graph::Node;
use crate::ledger::Assignment;
use crate::orders::{OrderId, OrderRequest};
use crate::scenario::AutoProcessConfig;

/// Customer/restaurant combination used to generate orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTemplate {
    pub customer_name: String,
    pub restaurant: String,
    pub items: Vec<String>,
}

impl OrderTemplate {
    pub fn new(customer_name: &str, restaurant: &str, items: &[&str]) -> Self {
        Self {
            customer_name: customer_name.to_string(),
            restaurant: restaurant.to_string(),
            items: items.iter().map(|item| item.to_string()).collect(),
        }
    }
}

pub fn default_templates() -> Vec<OrderTemplate> {
    vec![
        OrderTemplate::new(
            "Alice Johnson",
            "Pizza Palace",
            &["Large Margherita Pizza", "Garlic Bread", "Coke"],
        ),
        OrderTemplate::new("Bob Smith", "Burger King", &["Whopper Meal", "Fries"]),
        OrderTemplate::new(
            "Carol Davis",
            "Sushi Express",
            &["Premium Sushi Platter", "Miso Soup", "Green Tea"],
        ),
        OrderTemplate::new("David Wilson", "Taco Bell", &["Taco Combo"]),
        OrderTemplate::new(
            "Eva Martinez",
            "Pizza Palace",
            &["Medium Pepperoni", "Wings", "Sprite"],
        ),
        OrderTemplate::new("Frank Chen", "Chinese Garden", &["Fried Rice", "Sweet & Sour Pork"]),
        OrderTemplate::new("Grace Kim", "Korean BBQ", &["BBQ Platter", "Kimchi", "Rice"]),
    ]
}

/// Seeded source of simulated activity.
#[derive(Debug, Clone)]
pub struct TickPolicy {
    config: AutoProcessConfig,
    rng: StdRng,
    templates: Vec<OrderTemplate>,
    destinations: Vec<Node>,
}

impl TickPolicy {
    pub fn new(config: AutoProcessConfig, destinations: Vec<Node>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            templates: default_templates(),
            destinations,
        }
    }

    /// Policy delivering to every graph node except the pickup point.
    pub fn for_engine(engine: &DispatchEngine, config: AutoProcessConfig) -> Self {
        let destinations = engine
            .graph()
            .nodes()
            .iter()
            .filter(|node| *node != engine.pickup())
            .cloned()
            .collect();
        Self::new(config, destinations)
    }

    pub fn with_templates(mut self, templates: Vec<OrderTemplate>) -> Self {
        self.templates = templates;
        self
    }

    pub fn config(&self) -> &AutoProcessConfig {
        &self.config
    }

    fn roll(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() < probability
    }

    /// A random order from the templates, or `None` if there is nothing to
    /// draw from.
    pub fn generate_order(&mut self) -> Option<OrderRequest> {
        let template = self.templates.choose(&mut self.rng)?.clone();
        let destination = self.destinations.choose(&mut self.rng)?.clone();

        let first_name = template
            .customer_name
            .split_whitespace()
            .next()
            .unwrap_or("Customer");
        let suffix: u32 = self.rng.gen_range(0..100);
        let (min, max) = (self.config.min_order_value, self.config.max_order_value);
        let order_value = if max > min {
            self.rng.gen_range(min..max).floor()
        } else {
            min
        };

        Some(
            OrderRequest::new(
                format!("{first_name} {suffix}"),
                template.restaurant,
                order_value,
                destination,
            )
            .with_items(template.items),
        )
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub added: Option<OrderId>,
    pub assigned: Option<Assignment>,
    pub completed: Option<OrderId>,
}

/// Run one tick of simulated activity against `engine`.
pub fn run_tick(engine: &mut DispatchEngine, policy: &mut TickPolicy) -> DispatchResult<TickReport> {
    let mut report = TickReport::default();

    let add_probability = policy.config.add_order_probability;
    if policy.roll(add_probability) {
        if let Some(request) = policy.generate_order() {
            report.added = Some(engine.add_order(request)?.id);
        }
    }

    if engine.status().pending > 0 {
        report.assigned = engine.process_next_order();
    }

    let complete_probability = policy.config.complete_probability;
    if policy.roll(complete_probability) {
        let active = engine.active_assignments();
        if !active.is_empty() {
            let order_id = active[policy.pick_index(active.len())].order_id;
            if engine.complete_delivery(order_id) {
                report.completed = Some(order_id);
            }
        }
    }

    debug!(
        added = ?report.added,
        assigned = ?report.assigned.as_ref().map(|a| a.order_id),
        completed = ?report.completed,
        "tick finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::reference_engine;

    #[test]
    fn same_seed_generates_same_orders() {
        let destinations = vec![Node::from("B"), Node::from("J")];
        let mut first = TickPolicy::new(AutoProcessConfig::default().with_seed(7), destinations.clone());
        let mut second = TickPolicy::new(AutoProcessConfig::default().with_seed(7), destinations);

        for _ in 0..5 {
            assert_eq!(first.generate_order(), second.generate_order());
        }
    }

    #[test]
    fn generated_orders_respect_value_range_and_destinations() {
        let engine = reference_engine();
        let mut policy = TickPolicy::for_engine(&engine, AutoProcessConfig::default().with_seed(3));
        for _ in 0..50 {
            let order = policy.generate_order().expect("order");
            assert!((200.0..1000.0).contains(&order.order_value));
            assert_eq!(order.order_value, order.order_value.floor());
            assert_ne!(order.destination, Node::from("A"));
            assert!(engine.graph().contains(order.destination.as_str()));
            assert!(!order.items.is_empty());
        }
    }

    #[test]
    fn empty_templates_generate_nothing() {
        let mut policy = TickPolicy::new(AutoProcessConfig::default(), vec![Node::from("B")])
            .with_templates(Vec::new());
        assert!(policy.generate_order().is_none());
    }

    #[test]
    fn always_add_never_complete_tick() {
        let mut engine = reference_engine();
        let config = AutoProcessConfig::default().with_probabilities(1.0, 0.0);
        let mut policy = TickPolicy::for_engine(&engine, config);

        let report = run_tick(&mut engine, &mut policy).expect("tick");
        let added = report.added.expect("order added");
        assert_eq!(report.assigned.as_ref().map(|a| a.order_id), Some(added));
        assert!(report.completed.is_none());
        assert_eq!(engine.status().active, 1);
    }

    #[test]
    fn always_complete_tick_frees_a_partner() {
        let mut engine = reference_engine();
        let config = AutoProcessConfig::default().with_probabilities(1.0, 1.0);
        let mut policy = TickPolicy::for_engine(&engine, config);

        let report = run_tick(&mut engine, &mut policy).expect("tick");
        assert_eq!(report.completed, report.added);
        let status = engine.status();
        assert_eq!(status.active, 0);
        assert_eq!(status.completed, 1);
        assert!(status.is_conserved());
    }
}
