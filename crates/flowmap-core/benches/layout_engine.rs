//! Benchmarks for step layout and scene building.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use flowmap_core::config::LayoutConfig;
use flowmap_core::graph::{AnswerOption, FlowGraph, Node, NodeId, Question};
use flowmap_core::layout::{compute_positions, connections};
use flowmap_core::nav::Step;
use flowmap_core::scene::build_scene;
use flowmap_core::text::{Lang, LocalizedText};
use flowmap_core::Strings;

/// A chain of `depth` questions with `fan` options each; option `i % fan`
/// of question `i` leads on to question `i + 1`.
fn generate_chain(depth: usize, fan: usize) -> (FlowGraph, Vec<Step>) {
    let mut graph = FlowGraph::new();
    let mut steps = Vec::with_capacity(depth);
    for i in 0..depth {
        let options = (0..fan)
            .map(|o| AnswerOption {
                label: LocalizedText::from(format!("q{i} option {o}").as_str()),
                note: None,
                next: (o == i % fan && i + 1 < depth).then(|| NodeId::new(format!("q{}", i + 1))),
            })
            .collect();
        graph.insert(
            NodeId::new(format!("q{i}")),
            Node::Question(Question {
                title: Some(LocalizedText::from(format!("Question {i}").as_str())),
                text: None,
                description: None,
                options,
            }),
        );
        steps.push(Step {
            node_id: NodeId::new(format!("q{i}")),
            option_index: (i + 1 < depth).then_some(i % fan),
        });
    }
    (graph, steps)
}

fn bench_positions(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_positions");
    let config = LayoutConfig::default();

    for depth in [10, 100, 1000] {
        let (graph, steps) = generate_chain(depth, 4);
        group.bench_with_input(
            BenchmarkId::new("compute_positions", depth),
            &(&graph, &steps),
            |b, (graph, steps)| {
                b.iter(|| {
                    let positions = compute_positions(steps, *graph, &config);
                    connections(&positions, &config)
                });
            },
        );
    }

    group.finish();
}

fn bench_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene");
    let config = LayoutConfig::default();
    let strings = Strings::builtin();

    for depth in [10, 100] {
        let (graph, steps) = generate_chain(depth, 6);
        group.bench_with_input(
            BenchmarkId::new("build_scene", depth),
            &(&graph, &steps),
            |b, (graph, steps)| {
                b.iter(|| build_scene(steps, None, *graph, &config, &strings, Lang::En, true));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_positions, bench_scene);
criterion_main!(benches);
