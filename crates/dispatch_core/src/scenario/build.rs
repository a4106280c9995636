use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::engine::DispatchEngine;
use crate::error::DispatchResult;
use crate::graph::{GraphBuilder, WeightedGraph};
use crate::scenario::params::ScenarioParams;

/// Build the scenario graph. Edges are added in file order.
pub fn build_graph(params: &ScenarioParams) -> DispatchResult<WeightedGraph> {
    let mut builder = GraphBuilder::new();
    for edge in &params.edges {
        builder.add_edge(edge.from.clone(), edge.to.clone(), edge.weight)?;
    }
    for node in &params.extra_nodes {
        builder.add_node(node.clone());
    }
    Ok(builder.build())
}

/// Build an engine from a scenario: graph, partners, then seed orders.
pub fn build_engine(params: &ScenarioParams) -> DispatchResult<DispatchEngine> {
    let graph = Arc::new(build_graph(params)?);
    let mut engine = DispatchEngine::new(graph, params.pickup.clone(), params.engine.clone())?;
    for seed in &params.partners {
        engine.add_partner(seed.clone())?;
    }
    for request in &params.orders {
        engine.add_order(request.clone())?;
    }
    info!(
        nodes = engine.graph().node_count(),
        partners = params.partners.len(),
        orders = params.orders.len(),
        pickup = %params.pickup,
        "scenario built"
    );
    Ok(engine)
}

/// Read a JSON scenario file.
pub fn load_scenario(path: impl AsRef<Path>) -> DispatchResult<ScenarioParams> {
    let raw = std::fs::read_to_string(path)?;
    Ok(ScenarioParams::from_json_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DispatchError;
    use crate::graph::Node;
    use crate::orders::OrderRequest;
    use crate::scenario::params::EdgeSpec;

    #[test]
    fn reference_city_builds_with_partners() {
        let engine = build_engine(&ScenarioParams::reference_city()).expect("engine");
        assert_eq!(engine.graph().node_count(), 10);
        assert_eq!(engine.graph().edge_count(), 34);
        assert_eq!(engine.partners().len(), 3);
        assert_eq!(engine.pickup(), &Node::from("A"));
    }

    #[test]
    fn seed_orders_are_queued() {
        let params = ScenarioParams::reference_city().with_orders(vec![
            OrderRequest::new("Alice", "Pizza Palace", 450.0, "E"),
            OrderRequest::new("Bob", "Burger Hub", 320.0, "C"),
        ]);
        let engine = build_engine(&params).expect("engine");
        assert_eq!(engine.status().pending, 2);
    }

    #[test]
    fn invalid_edge_weight_fails_the_build() {
        let mut params = ScenarioParams::reference_city();
        params.edges.push(EdgeSpec::new("J", "A", -1.0));
        assert!(matches!(build_engine(&params), Err(DispatchError::Graph(_))));
    }

    #[test]
    fn pickup_outside_graph_fails_the_build() {
        let mut params = ScenarioParams::reference_city();
        params.pickup = Node::from("Q");
        assert!(matches!(
            build_engine(&params),
            Err(DispatchError::UnknownNode(_))
        ));

        params.extra_nodes.push(Node::from("Q"));
        assert!(build_engine(&params).is_ok());
    }
}
