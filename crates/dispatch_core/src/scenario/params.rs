use serde::{Deserialize, Serialize};

use crate::graph::Node;
use crate::orders::OrderRequest;
use crate::partners::PartnerSeed;
use crate::routing::RouteProviderKind;

/// Default number of orders dispatched by a batch run.
const DEFAULT_BATCH_SIZE: usize = 3;

/// Default auto-processing tick interval: 2 seconds.
const DEFAULT_TICK_INTERVAL_MS: u64 = 2_000;

/// Engine-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub route_provider: RouteProviderKind,
    /// Orders dispatched by [`process_default_batch`](crate::engine::DispatchEngine::process_default_batch).
    pub batch_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            route_provider: RouteProviderKind::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl EngineConfig {
    pub fn with_route_provider(mut self, kind: RouteProviderKind) -> Self {
        self.route_provider = kind;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Simulated activity for each auto-processing tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoProcessConfig {
    pub tick_interval_ms: u64,
    /// Seed for RNG (for reproducibility).
    pub seed: u64,
    /// Probability (0.0–1.0) that a tick submits a new order.
    pub add_order_probability: f64,
    /// Probability (0.0–1.0) that a tick completes one random active delivery.
    pub complete_probability: f64,
    /// Generated order values are drawn uniformly from `[min, max)`.
    pub min_order_value: f64,
    pub max_order_value: f64,
}

impl Default for AutoProcessConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            seed: 0,
            add_order_probability: 0.3,
            complete_probability: 0.4,
            min_order_value: 200.0,
            max_order_value: 1000.0,
        }
    }
}

impl AutoProcessConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_tick_interval_ms(mut self, interval_ms: u64) -> Self {
        self.tick_interval_ms = interval_ms;
        self
    }

    pub fn with_probabilities(mut self, add_order: f64, complete: f64) -> Self {
        self.add_order_probability = add_order.clamp(0.0, 1.0);
        self.complete_probability = complete.clamp(0.0, 1.0);
        self
    }
}

/// One directed edge of the scenario graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub from: Node,
    pub to: Node,
    pub weight: f64,
}

impl EdgeSpec {
    pub fn new(from: impl Into<Node>, to: impl Into<Node>, weight: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight,
        }
    }
}

/// Everything needed to stand up an engine: graph, depot, partners and
/// optional seed orders. Edge order fixes neighbor iteration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub edges: Vec<EdgeSpec>,
    /// Nodes without outgoing edges that should still exist.
    #[serde(default)]
    pub extra_nodes: Vec<Node>,
    pub pickup: Node,
    #[serde(default)]
    pub partners: Vec<PartnerSeed>,
    #[serde(default)]
    pub orders: Vec<OrderRequest>,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub auto_process: AutoProcessConfig,
}

/// The ten-node reference city, as adjacency lists in neighbor order.
const REFERENCE_CITY: &[(&str, &[(&str, f64)])] = &[
    ("A", &[("B", 4.0), ("C", 2.0)]),
    ("B", &[("A", 4.0), ("C", 1.0), ("D", 5.0), ("E", 3.0)]),
    ("C", &[("A", 2.0), ("B", 1.0), ("D", 8.0), ("F", 10.0)]),
    ("D", &[("B", 5.0), ("C", 8.0), ("E", 2.0), ("G", 3.0)]),
    ("E", &[("B", 3.0), ("D", 2.0), ("F", 4.0), ("H", 6.0)]),
    ("F", &[("C", 10.0), ("E", 4.0), ("I", 1.0)]),
    ("G", &[("D", 3.0), ("H", 2.0), ("J", 4.0)]),
    ("H", &[("E", 6.0), ("G", 2.0), ("I", 3.0), ("J", 1.0)]),
    ("I", &[("F", 1.0), ("H", 3.0), ("J", 2.0)]),
    ("J", &[("G", 4.0), ("H", 1.0), ("I", 2.0)]),
];

impl ScenarioParams {
    /// Reference city: ten nodes A–J, depot at A, partners Ravi@A, Neha@D, Arjun@H.
    pub fn reference_city() -> Self {
        let edges = REFERENCE_CITY
            .iter()
            .flat_map(|(from, neighbors)| {
                neighbors
                    .iter()
                    .map(move |(to, weight)| EdgeSpec::new(*from, *to, *weight))
            })
            .collect();
        let partners = [(1, "Ravi", "A"), (2, "Neha", "D"), (3, "Arjun", "H")]
            .into_iter()
            .map(|(id, name, location)| PartnerSeed {
                id,
                name: name.to_string(),
                location: Node::from(location),
                is_available: true,
            })
            .collect();

        Self {
            edges,
            extra_nodes: Vec::new(),
            pickup: Node::from("A"),
            partners,
            orders: Vec::new(),
            engine: EngineConfig::default(),
            auto_process: AutoProcessConfig::default(),
        }
    }

    pub fn with_engine_config(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_orders(mut self, orders: Vec<OrderRequest>) -> Self {
        self.orders = orders;
        self
    }

    pub fn with_auto_process(mut self, auto_process: AutoProcessConfig) -> Self {
        self.auto_process = auto_process;
        self
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
