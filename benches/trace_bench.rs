/// Benchmarks for call-tree building and step sequencing.
///
/// Run with: `cargo bench`

use calltrace::domain::sequence::linearize;
use calltrace::domain::symbol::{TraceResult, TreeNode};
use calltrace::domain::view_tree::CallTree;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// ═══════════════════════════════════════════════════════════════════════════
// Synthetic Data Generators
// ═══════════════════════════════════════════════════════════════════════════

/// Complete tree with `fanout` children per node, `depth` levels below the root.
fn synthetic_tree(name: &str, depth: usize, fanout: usize) -> TreeNode {
    fn build(prefix: &str, level: usize, depth: usize, fanout: usize) -> TreeNode {
        let children = if level < depth {
            (0..fanout)
                .map(|i| build(&format!("{}_{}", prefix, i), level + 1, depth, fanout))
                .collect()
        } else {
            Vec::new()
        };
        TreeNode {
            name: prefix.to_string(),
            qualified_name: format!("pkg.{}", prefix),
            file: format!("src/{}.py", level),
            line: level * 10 + 1,
            depth: level,
            children,
            ..Default::default()
        }
    }
    build(name, 0, depth, fanout)
}

fn synthetic_trace(depth: usize, fanout: usize) -> TraceResult {
    TraceResult {
        start: "pkg.target".to_string(),
        callers: Some(synthetic_tree("caller", depth, fanout)),
        callees: Some(synthetic_tree("callee", depth, fanout)),
    }
}

fn bench_build_and_linearize(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace");

    for (depth, fanout) in [(3, 4), (5, 4), (6, 5)] {
        let trace = synthetic_trace(depth, fanout);
        let nodes = trace.callers.as_ref().map_or(0, TreeNode::len) * 2;
        group.throughput(Throughput::Elements(nodes as u64));

        group.bench_with_input(
            BenchmarkId::new("build", format!("d{}_f{}", depth, fanout)),
            &trace,
            |b, trace| {
                let mut tree = CallTree::new();
                b.iter(|| {
                    tree.build_from_trace(black_box(trace));
                    black_box(tree.len())
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("build_and_linearize", format!("d{}_f{}", depth, fanout)),
            &trace,
            |b, trace| {
                let mut tree = CallTree::new();
                b.iter(|| {
                    tree.build_from_trace(black_box(trace));
                    black_box(linearize(&tree).len())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_build_and_linearize);
criterion_main!(benches);
