//! Benchmarks for cycle-checked graph construction and ordering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use symdag_graph::Dag;

/// A layered graph where every node points at each node of the next layer.
fn layered(layers: u32, width: u32) -> Dag<u32> {
    let mut graph = Dag::new();
    for layer in 0..layers.saturating_sub(1) {
        for i in 0..width {
            for j in 0..width {
                let src = layer * width + i;
                let dst = (layer + 1) * width + j;
                graph.add_edge(src, dst).unwrap();
            }
        }
    }
    graph
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("dag_build");

    for layers in [4, 8, 16] {
        group.bench_with_input(BenchmarkId::new("layered", layers), &layers, |b, &layers| {
            b.iter(|| black_box(layered(layers, 4)));
        });
    }

    group.bench_function("rejected_back_edge", |b| {
        let mut graph = layered(8, 4);
        b.iter(|| black_box(graph.add_edge(31, 0).is_err()));
    });

    group.finish();
}

fn bench_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("dag_order");

    for layers in [8, 32] {
        let graph = layered(layers, 4);
        group.bench_with_input(BenchmarkId::new("topological_sort", layers), &graph, |b, g| {
            b.iter(|| black_box(g.topological_sort()));
        });
        group.bench_with_input(BenchmarkId::new("has_cycle", layers), &graph, |b, g| {
            b.iter(|| black_box(g.has_cycle()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_construction, bench_ordering);
criterion_main!(benches);
