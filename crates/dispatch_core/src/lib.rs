pub mod auto;
pub mod clock;
pub mod engine;
pub mod error;
pub mod graph;
pub mod ledger;
pub mod matching;
pub mod orders;
pub mod partners;
pub mod priority;
pub mod routing;
pub mod scenario;
pub mod scheduler;
pub mod simulation;
pub mod telemetry;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use engine::DispatchEngine;
pub use error::{DispatchError, DispatchResult, GraphError};
pub use graph::{GraphBuilder, Node, WeightedGraph};
pub use ledger::{Assignment, AssignmentLedger};
pub use orders::{Order, OrderId, OrderRequest, OrderStatus};
pub use partners::{Partner, PartnerId, PartnerSeed};
pub use routing::{shortest_path, RouteProvider, ShortestPath};
pub use scheduler::OrderScheduler;
pub use telemetry::{DispatchStatus, EngineSnapshot};
