//! Shortest-path routing over a [`WeightedGraph`].
//!
//! [`shortest_path`] is a single-source/single-target Dijkstra with a binary-heap
//! frontier. The engine does not call it directly; it goes through the
//! [`RouteProvider`] trait, selectable via [`RouteProviderKind`]:
//!
//! - **`DijkstraRouteProvider`**: runs the search on every query.
//! - **`CachedRouteProvider`**: LRU-cached wrapper around any provider. The graph
//!   is immutable for the engine's lifetime, so cached routes never go stale.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::{Node, WeightedGraph};

/// Serde form for distances that may be `f64::INFINITY`: finite values as
/// numbers, unreachable as `null`. JSON has no infinity.
pub(crate) mod distance_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(distance: &f64, ser: S) -> Result<S::Ok, S::Error> {
        let raw = distance.is_finite().then_some(*distance);
        raw.serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
        let raw = Option::<f64>::deserialize(de)?;
        Ok(raw.unwrap_or(f64::INFINITY))
    }
}

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// Result of a route query: total cost and the node sequence from source to target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShortestPath {
    /// Total edge weight; `f64::INFINITY` when the target cannot be reached.
    #[serde(with = "distance_serde")]
    pub distance: f64,
    /// Nodes from source to target inclusive; empty when unreachable.
    pub path: Vec<Node>,
}

impl ShortestPath {
    pub fn unreachable() -> Self {
        Self {
            distance: f64::INFINITY,
            path: Vec::new(),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.distance.is_finite()
    }
}

/// Frontier entry. Ordered so that `BinaryHeap` pops the smallest tentative
/// distance first, and among equal distances the entry pushed first.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    distance: f64,
    seq: u64,
    node: usize,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Dijkstra from `source` to `target`.
///
/// Stale frontier entries are skipped when popped rather than removed eagerly.
/// Relaxation uses strict `<`, so among equal-cost paths the predecessor recorded
/// first wins; with insertion-ordered neighbors the result is reproducible.
/// Unknown or unreachable targets yield [`ShortestPath::unreachable`].
pub fn shortest_path(graph: &WeightedGraph, source: &str, target: &str) -> ShortestPath {
    let (Some(src), Some(dst)) = (graph.node_index(source), graph.node_index(target)) else {
        return ShortestPath::unreachable();
    };

    let node_count = graph.node_count();
    let mut distance: Vec<Option<f64>> = vec![None; node_count];
    let mut previous: Vec<Option<usize>> = vec![None; node_count];
    let mut finalized = vec![false; node_count];
    let mut frontier = BinaryHeap::new();
    let mut seq = 0u64;

    distance[src] = Some(0.0);
    frontier.push(FrontierEntry {
        distance: 0.0,
        seq,
        node: src,
    });

    while let Some(FrontierEntry { distance: base, node, .. }) = frontier.pop() {
        if finalized[node] {
            continue;
        }
        finalized[node] = true;
        if node == dst {
            break;
        }

        for &(neighbor, weight) in graph.adjacent(node) {
            let candidate = base + weight;
            if distance[neighbor].map_or(true, |current| candidate < current) {
                distance[neighbor] = Some(candidate);
                previous[neighbor] = Some(node);
                seq += 1;
                frontier.push(FrontierEntry {
                    distance: candidate,
                    seq,
                    node: neighbor,
                });
            }
        }
    }

    let Some(total) = distance[dst] else {
        return ShortestPath::unreachable();
    };

    let mut path = vec![graph.node_at(dst).clone()];
    let mut current = dst;
    while let Some(prev) = previous[current] {
        path.push(graph.node_at(prev).clone());
        current = prev;
    }
    path.reverse();

    ShortestPath {
        distance: total,
        path,
    }
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// Which routing backend the engine uses.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteProviderKind {
    /// Run Dijkstra on every query.
    #[default]
    Dijkstra,
    /// Dijkstra behind a directional LRU cache of the given capacity.
    Cached { capacity: usize },
}

/// Trait for routing backends. `Send + Sync` so a shared engine can move
/// between threads.
pub trait RouteProvider: Send + Sync {
    /// Shortest route between two nodes; unreachable routes have infinite distance.
    fn route(&self, from: &Node, to: &Node) -> ShortestPath;
}

/// Plain Dijkstra over a shared graph.
pub struct DijkstraRouteProvider {
    graph: Arc<WeightedGraph>,
}

impl DijkstraRouteProvider {
    pub fn new(graph: Arc<WeightedGraph>) -> Self {
        Self { graph }
    }
}

impl RouteProvider for DijkstraRouteProvider {
    fn route(&self, from: &Node, to: &Node) -> ShortestPath {
        shortest_path(&self.graph, from.as_str(), to.as_str())
    }
}

/// LRU-cached wrapper around any [`RouteProvider`].
///
/// Cache key is `(from, to)` (directional). Unreachable results are cached too.
pub struct CachedRouteProvider {
    inner: Box<dyn RouteProvider>,
    cache: Mutex<LruCache<(Node, Node), ShortestPath>>,
}

impl CachedRouteProvider {
    pub fn new(inner: Box<dyn RouteProvider>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached routes.
    pub fn cached_routes(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }
}

impl RouteProvider for CachedRouteProvider {
    fn route(&self, from: &Node, to: &Node) -> ShortestPath {
        let key = (from.clone(), to.clone());

        if let Ok(mut cache) = self.cache.lock() {
            if let Some(cached) = cache.get(&key) {
                return cached.clone();
            }
        }

        let result = self.inner.route(from, to);
        debug!(%from, %to, distance = result.distance, "route cache miss");

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, result.clone());
        }
        result
    }
}

/// Construct a boxed [`RouteProvider`] from a [`RouteProviderKind`] descriptor.
pub fn build_route_provider(
    kind: &RouteProviderKind,
    graph: Arc<WeightedGraph>,
) -> Box<dyn RouteProvider> {
    let dijkstra = Box::new(DijkstraRouteProvider::new(graph));
    match kind {
        RouteProviderKind::Dijkstra => dijkstra,
        RouteProviderKind::Cached { capacity } => {
            Box::new(CachedRouteProvider::new(dijkstra, *capacity))
        }
    }
}
