use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bst_map::OrderedMap;

/// Returns how many nodes are needed to fill a binary tree with `num_levels` levels.
fn num_nodes_in_full_tree(num_levels: u32) -> usize {
    2usize.pow(num_levels) - 1
}

/// Builds a map by inserting keys in ascending order. Nothing rebalances the tree so every node
/// ends up as the right child of the previous one.
fn get_unbalanced_map(num_levels: u32) -> OrderedMap<i32, i32> {
    let mut map = OrderedMap::new();
    for x in (0..).take(num_nodes_in_full_tree(num_levels)) {
        map.insert(x, x);
    }

    map
}

/// Builds a map by inserting keys in an order that leaves the tree perfectly balanced with
/// `num_levels` full levels.
fn get_balanced_map(num_levels: u32) -> OrderedMap<i32, i32> {
    let mut map = OrderedMap::new();
    let xs = (0..).take(num_nodes_in_full_tree(num_levels)).collect::<Vec<_>>();
    fill_balanced_map(&mut map, &xs);
    map
}

/// Recursive helper for [`get_balanced_map`].
fn fill_balanced_map(map: &mut OrderedMap<i32, i32>, xs: &[i32]) {
    if !xs.is_empty() {
        let mid = xs.len() / 2;
        map.insert(xs[mid], xs[mid]);
        fill_balanced_map(map, &xs[..mid]);
        fill_balanced_map(map, &xs[mid + 1..]);
    }
}

/// Helper to bench a function on a map.
/// It creates a group for the given name and closure and runs tests for various sizes and
/// shapes of trees before finishing the group.
fn bench_helper(c: &mut Criterion, name: &str, f: impl Fn(&mut OrderedMap<i32, i32>, i32)) {
    let mut group = c.benchmark_group(name);

    for num_levels in [3, 7, 11, 13] {
        let tree_tests = [
            ("unbalanced", get_unbalanced_map(num_levels)),
            ("balanced", get_balanced_map(num_levels)),
        ];
        for (name, map) in tree_tests {
            // The deepest key in the unbalanced tree and a leaf in the balanced one.
            let largest_key = *map.max_key_value().expect("benchmark maps are non-empty").0;
            let id = BenchmarkId::new(name, largest_key);

            group.bench_function(id, |b| {
                b.iter_custom(|iters| {
                    let mut time = std::time::Duration::ZERO;
                    for _ in 0..iters {
                        let mut map = black_box(map.clone());
                        let instant = std::time::Instant::now();
                        f(&mut map, black_box(largest_key));
                        let elapsed = instant.elapsed();
                        time += elapsed;
                    }
                    time
                })
            });
        }
    }

    group.finish();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_helper(c, "find", |map, i| {
        let _value = black_box(map.find(&i));
    });
    bench_helper(c, "delete", |map, i| {
        let _value = black_box(map.delete(&i));
    });
    bench_helper(c, "delete-root", |map, _| {
        let root = map.root().expect("benchmark maps are non-empty");
        let _entry = black_box(map.remove_node(root));
    });

    bench_helper(c, "insert", |map, i| {
        map.insert(i + 1, i + 1);
    });

    bench_helper(c, "min", |map, _| {
        let _value = black_box(map.min());
    });

    bench_helper(c, "find-miss", |map, i| {
        let _value = black_box(map.find(&(i + 1)));
    });
    bench_helper(c, "delete-miss", |map, i| {
        let _value = black_box(map.delete(&(i + 1)));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
