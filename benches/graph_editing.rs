//! Benchmarks for the editing hot paths: history snapshots, ordering and
//! validation of mid-sized pipelines.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mlcanvas::config::HistorySettings;
use mlcanvas::graph::{topological_order, CyclePolicy};
use mlcanvas::history::HistoryAction;
use mlcanvas::{ComponentLibrary, GraphModel, HistoryManager, ValidationEngine};
use serde_json::json;

/// A chain of `len` preprocessing steps behind a loader.
fn chain(library: &ComponentLibrary, len: usize) -> GraphModel {
    let mut graph = GraphModel::new();
    let loader = library.get("csv-loader").expect("builtin loader");
    let scaler = library.get("standard-scaler").expect("builtin scaler");

    let mut previous = graph.add_node(loader, 0.0, 0.0).id;
    for i in 0..len {
        let node = graph.add_node(scaler, (i as f64 + 1.0) * 300.0, 0.0);
        let _ = graph.connect(&previous, &node.id);
        previous = node.id;
    }
    graph
}

fn bench_history(c: &mut Criterion) {
    let library = ComponentLibrary::builtin();
    let mut group = c.benchmark_group("history_record");

    for size in [10, 50, 200] {
        let snapshot = chain(&library, size).snapshot();
        group.bench_with_input(BenchmarkId::from_parameter(size), &snapshot, |b, snapshot| {
            let mut history = HistoryManager::new(&HistorySettings::default());
            b.iter(|| {
                history.record_state(black_box(snapshot), HistoryAction::AddNode, json!({}));
            });
        });
    }

    group.finish();
}

fn bench_ordering(c: &mut Criterion) {
    let library = ComponentLibrary::builtin();
    let mut group = c.benchmark_group("topological_order");

    for size in [10, 50, 200] {
        let graph = chain(&library, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &graph, |b, graph| {
            b.iter(|| topological_order(black_box(graph.nodes()), graph.edges(), CyclePolicy::Strict));
        });
    }

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let library = ComponentLibrary::builtin();
    let graph = chain(&library, 50);
    let engine = ValidationEngine::new(&library);

    c.bench_function("validate_50_nodes", |b| {
        b.iter(|| engine.validate(black_box(&graph)));
    });
}

criterion_group!(benches, bench_history, bench_ordering, bench_validation);
criterion_main!(benches);
