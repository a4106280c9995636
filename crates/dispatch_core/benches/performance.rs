//! Performance benchmarks for dispatch_core using Criterion.rs.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dispatch_core::routing::{CachedRouteProvider, DijkstraRouteProvider};
use dispatch_core::scenario::AutoProcessConfig;
use dispatch_core::simulation::{run_tick, TickPolicy};
use dispatch_core::test_helpers::{order_request, reference_engine, reference_graph};
use dispatch_core::{shortest_path, GraphBuilder, Node, RouteProvider, WeightedGraph};

/// Square grid with bidirectional edges between orthogonal neighbors.
fn grid_graph(size: usize) -> WeightedGraph {
    let name = |r: usize, c: usize| format!("r{r}c{c}");
    let mut builder = GraphBuilder::new();
    for r in 0..size {
        for c in 0..size {
            let weight = ((r * 31 + c * 17) % 9 + 1) as f64;
            if c + 1 < size {
                builder
                    .add_undirected_edge(name(r, c), name(r, c + 1), weight)
                    .expect("valid weight");
            }
            if r + 1 < size {
                builder
                    .add_undirected_edge(name(r, c), name(r + 1, c), weight)
                    .expect("valid weight");
            }
        }
    }
    builder.build()
}

fn bench_shortest_path(c: &mut Criterion) {
    let reference = reference_graph();
    c.bench_function("shortest_path_reference_a_to_j", |b| {
        b.iter(|| black_box(shortest_path(&reference, black_box("A"), black_box("J"))));
    });

    let mut group = c.benchmark_group("shortest_path_grid");
    for size in [10usize, 30, 60] {
        let graph = grid_graph(size);
        let target = format!("r{}c{}", size - 1, size - 1);
        group.bench_with_input(BenchmarkId::from_parameter(size), &graph, |b, graph| {
            b.iter(|| black_box(shortest_path(graph, "r0c0", &target)));
        });
    }
    group.finish();
}

fn bench_route_providers(c: &mut Criterion) {
    let graph = Arc::new(grid_graph(30));
    let from = Node::from("r0c0");
    let to = Node::from("r29c29");

    let mut group = c.benchmark_group("route_providers");
    let dijkstra = DijkstraRouteProvider::new(Arc::clone(&graph));
    group.bench_function("dijkstra", |b| {
        b.iter(|| black_box(dijkstra.route(&from, &to)));
    });

    let cached = CachedRouteProvider::new(Box::new(DijkstraRouteProvider::new(graph)), 64);
    group.bench_function("cached_warm", |b| {
        b.iter(|| black_box(cached.route(&from, &to)));
    });
    group.finish();
}

fn bench_dispatch_cycle(c: &mut Criterion) {
    c.bench_function("dispatch_add_assign_complete", |b| {
        b.iter(|| {
            let mut engine = reference_engine();
            for dest in ["B", "E", "J", "G", "I", "D"] {
                engine.add_order(order_request(500.0, dest)).expect("order");
            }
            while let Some(assignment) = engine.process_next_order() {
                engine.complete_delivery(assignment.order_id);
            }
            black_box(engine.status())
        });
    });

    c.bench_function("simulated_ticks_100", |b| {
        b.iter(|| {
            let mut engine = reference_engine();
            let config = AutoProcessConfig::default().with_seed(42);
            let mut policy = TickPolicy::for_engine(&engine, config);
            for _ in 0..100 {
                run_tick(&mut engine, &mut policy).expect("tick");
            }
            black_box(engine.status())
        });
    });
}

criterion_group!(
    benches,
    bench_shortest_path,
    bench_route_providers,
    bench_dispatch_cycle
);
criterion_main!(benches);
