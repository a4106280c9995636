//! Static location graph: nodes and directed, weighted travel costs.
//!
//! The graph is built once through [`GraphBuilder`] (or [`WeightedGraph::from_edges`])
//! and shared read-only afterwards, usually behind an `Arc`. Nodes are interned to
//! dense indices so the router can work on plain vectors; neighbor lists keep
//! insertion order, which pins shortest-path tie-breaking.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Opaque location identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node(String);

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Node {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Node {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&Node> for Node {
    fn from(node: &Node) -> Self {
        node.clone()
    }
}

impl Borrow<str> for Node {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directed weighted graph with deterministic neighbor order.
#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    nodes: Vec<Node>,
    index: HashMap<Node, usize>,
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl WeightedGraph {
    /// Build a graph from `(from, to, weight)` triples, in order.
    pub fn from_edges<I, N>(edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (N, N, f64)>,
        N: Into<Node>,
    {
        let mut builder = GraphBuilder::new();
        for (from, to, weight) in edges {
            builder.add_edge(from, to, weight)?;
        }
        Ok(builder.build())
    }

    pub fn contains(&self, node: &str) -> bool {
        self.index.contains_key(node)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Outgoing edges of `node` in insertion order. Unknown nodes have no neighbors.
    pub fn neighbors<'a>(&'a self, node: &str) -> impl Iterator<Item = (&'a Node, f64)> + 'a {
        self.node_index(node)
            .map(|idx| self.adjacency[idx].as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&(to, weight)| (&self.nodes[to], weight))
    }

    /// Weight of the direct edge `from -> to`, if present.
    pub fn weight(&self, from: &str, to: &str) -> Option<f64> {
        let from = self.node_index(from)?;
        let to = self.node_index(to)?;
        self.adjacency[from]
            .iter()
            .find(|(neighbor, _)| *neighbor == to)
            .map(|(_, weight)| *weight)
    }

    pub(crate) fn node_index(&self, node: &str) -> Option<usize> {
        self.index.get(node).copied()
    }

    pub(crate) fn node_at(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub(crate) fn adjacent(&self, idx: usize) -> &[(usize, f64)] {
        &self.adjacency[idx]
    }
}

/// Incremental builder for [`WeightedGraph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: WeightedGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node without edges. Returns its dense index.
    pub fn add_node(&mut self, node: impl Into<Node>) -> usize {
        let node = node.into();
        if let Some(idx) = self.graph.index.get(&node) {
            return *idx;
        }
        let idx = self.graph.nodes.len();
        self.graph.index.insert(node.clone(), idx);
        self.graph.nodes.push(node);
        self.graph.adjacency.push(Vec::new());
        idx
    }

    /// Add the directed edge `from -> to`. Re-adding an edge replaces its weight
    /// but keeps its original position in the neighbor list.
    pub fn add_edge(
        &mut self,
        from: impl Into<Node>,
        to: impl Into<Node>,
        weight: f64,
    ) -> Result<&mut Self, GraphError> {
        let from = from.into();
        let to = to.into();
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidWeight { from, to, weight });
        }

        let from_idx = self.add_node(from);
        let to_idx = self.add_node(to);
        let edges = &mut self.graph.adjacency[from_idx];
        match edges.iter_mut().find(|(neighbor, _)| *neighbor == to_idx) {
            Some(edge) => edge.1 = weight,
            None => edges.push((to_idx, weight)),
        }
        Ok(self)
    }

    /// Add `a -> b` and `b -> a` with the same weight.
    pub fn add_undirected_edge(
        &mut self,
        a: impl Into<Node>,
        b: impl Into<Node>,
        weight: f64,
    ) -> Result<&mut Self, GraphError> {
        let a = a.into();
        let b = b.into();
        self.add_edge(a.clone(), b.clone(), weight)?;
        self.add_edge(b, a, weight)
    }

    pub fn build(self) -> WeightedGraph {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_keep_insertion_order() {
        let graph =
            WeightedGraph::from_edges([("A", "C", 2.0), ("A", "B", 4.0), ("B", "A", 4.0)])
                .expect("graph");

        let neighbors: Vec<(&str, f64)> = graph
            .neighbors("A")
            .map(|(node, weight)| (node.as_str(), weight))
            .collect();
        assert_eq!(neighbors, vec![("C", 2.0), ("B", 4.0)]);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn graph_need_not_be_symmetric() {
        let graph = WeightedGraph::from_edges([("A", "B", 1.0)]).expect("graph");
        assert_eq!(graph.weight("A", "B"), Some(1.0));
        assert_eq!(graph.weight("B", "A"), None);
        assert!(graph.contains("B"));
        assert_eq!(graph.neighbors("B").count(), 0);
    }

    #[test]
    fn unknown_node_has_no_neighbors() {
        let graph = WeightedGraph::from_edges([("A", "B", 1.0)]).expect("graph");
        assert!(!graph.contains("Z"));
        assert_eq!(graph.neighbors("Z").count(), 0);
    }

    #[test]
    fn re_adding_edge_overwrites_weight_in_place() {
        let mut builder = GraphBuilder::new();
        builder
            .add_edge("A", "B", 1.0)
            .and_then(|b| b.add_edge("A", "C", 2.0))
            .and_then(|b| b.add_edge("A", "B", 5.0))
            .expect("edges");
        let graph = builder.build();

        let order: Vec<&str> = graph.neighbors("A").map(|(n, _)| n.as_str()).collect();
        assert_eq!(order, vec!["B", "C"]);
        assert_eq!(graph.weight("A", "B"), Some(5.0));
    }

    #[test]
    fn rejects_negative_and_non_finite_weights() {
        let mut builder = GraphBuilder::new();
        assert!(matches!(
            builder.add_edge("A", "B", -1.0),
            Err(GraphError::InvalidWeight { .. })
        ));
        assert!(builder.add_edge("A", "B", f64::NAN).is_err());
        assert!(builder.add_edge("A", "B", f64::INFINITY).is_err());
        assert_eq!(builder.build().node_count(), 0);
    }

    #[test]
    fn isolated_nodes_are_members() {
        let mut builder = GraphBuilder::new();
        builder.add_node("X");
        builder.add_undirected_edge("A", "B", 3.0).expect("edge");
        let graph = builder.build();

        assert!(graph.contains("X"));
        assert_eq!(graph.weight("B", "A"), Some(3.0));
        let nodes: Vec<&str> = graph.nodes().iter().map(Node::as_str).collect();
        assert_eq!(nodes, vec!["X", "A", "B"]);
    }
}
