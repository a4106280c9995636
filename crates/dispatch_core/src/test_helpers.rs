//! Test helpers for common test setup and utilities.
//!
//! Everything here is built on the reference city from
//! [`ScenarioParams::reference_city`] so unit tests, integration tests and
//! benchmarks share one geography.

use std::sync::Arc;

use crate::clock::ManualClock;
use crate::engine::DispatchEngine;
use crate::graph::WeightedGraph;
use crate::orders::OrderRequest;
use crate::partners::Partner;
use crate::scenario::{build_engine, build_graph, EngineConfig, ScenarioParams};

/// The ten-node reference graph.
///
/// # Panics
///
/// Panics if the built-in reference edges are invalid (should never happen).
pub fn reference_graph() -> Arc<WeightedGraph> {
    Arc::new(
        build_graph(&ScenarioParams::reference_city()).expect("reference city edges are valid"),
    )
}

/// Reference partners: Ravi@A, Neha@D, Arjun@H.
pub fn reference_partners() -> Vec<Partner> {
    ScenarioParams::reference_city()
        .partners
        .into_iter()
        .map(Partner::from)
        .collect()
}

/// Engine over the reference city with its three partners and a clock frozen
/// at the Unix epoch.
///
/// # Panics
///
/// Panics if the reference scenario fails to build (should never happen).
pub fn reference_engine() -> DispatchEngine {
    build_engine(&ScenarioParams::reference_city())
        .expect("reference scenario builds")
        .with_clock(ManualClock::at_epoch())
}

/// Engine over the reference city with no partners registered.
///
/// # Panics
///
/// Panics if the reference scenario fails to build (should never happen).
pub fn engine_without_partners() -> DispatchEngine {
    DispatchEngine::new(reference_graph(), "A", EngineConfig::default())
        .expect("A is in the reference graph")
        .with_clock(ManualClock::at_epoch())
}

/// Minimal order request with the given value and destination.
pub fn order_request(order_value: f64, destination: &str) -> OrderRequest {
    OrderRequest::new("Test Customer", "Test Kitchen", order_value, destination)
}
