//! Scenario setup: graph, depot, partner seeds and engine settings.
//!
//! Scenarios are plain serde structs so they can be written by hand, loaded
//! from JSON files, or built from [`ScenarioParams::reference_city`].

mod build;
mod params;

pub use build::{build_engine, build_graph, load_scenario};
pub use params::{AutoProcessConfig, EdgeSpec, EngineConfig, ScenarioParams};
