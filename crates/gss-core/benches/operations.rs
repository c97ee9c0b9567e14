use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use gss_core::{GraphEntry, Gss, blank_node, create_graph};

const TIERS: [usize; 3] = [100, 1_000, 10_000];

/// A wide, shallow DAG: every node hangs under `node / 4`, and every tenth
/// node also under `node / 7`, written leaves-first.
fn synthetic_entries(size: usize) -> Vec<GraphEntry<String, u64>> {
    let mut entries = Vec::with_capacity(size + size / 10);
    for node in (0..size).rev() {
        let key = format!("n{node}");
        let contents = Some(node as u64);
        if node == 0 {
            entries.push(GraphEntry::root(key, contents));
            continue;
        }
        entries.push(GraphEntry::child(key.clone(), contents, format!("n{}", node / 4)));
        if node % 10 == 0 && node / 7 != node / 4 {
            entries.push(GraphEntry::child(key, None, format!("n{}", node / 7)));
        }
    }
    entries
}

fn bench_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("operations.tiered");

    for size in TIERS {
        let entries = synthetic_entries(size);
        group.throughput(Throughput::Elements(entries.len() as u64));

        group.bench_with_input(BenchmarkId::new("create_graph", size), &entries, |b, entries| {
            b.iter(|| {
                let mut gss = Gss::with_capacity(size);
                black_box(create_graph(&mut gss, entries, blank_node))
            });
        });

        let mut gss = Gss::with_capacity(size);
        let roots = create_graph(&mut gss, &entries, blank_node);

        group.bench_with_input(BenchmarkId::new("sort", size), &roots, |b, roots| {
            b.iter(|| {
                let mut graph = gss.clone();
                let mut roots = roots.clone();
                graph.sort_node_list_by(&mut roots, |x, y| y.key().cmp(&x.key()));
                black_box(roots)
            });
        });

        let target = format!("n{}", size - 1);
        group.bench_with_input(BenchmarkId::new("find_descendant", size), &roots, |b, roots| {
            b.iter(|| black_box(gss.find_descendant(roots[0], target.as_str())));
        });

        group.bench_with_input(
            BenchmarkId::new("checked_descendants_count", size),
            &roots,
            |b, roots| b.iter(|| black_box(gss.checked_descendants_count(roots[0]).ok())),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_operations);
criterion_main!(benches);
