// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Size;
use understory_tree_layout::{Direction, LayoutEngine, LayoutOptions, NodeId, Tree};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

/// Random tree with a bounded fan-out so depth stays realistic for a mind map.
fn gen_tree(n: usize, seed: u64) -> (Tree<u32>, NodeId, Vec<NodeId>) {
    let mut rng = Rng::new(seed);
    let mut tree = Tree::new();
    let root = tree.insert(None, 0);
    let mut ids = vec![root];
    for i in 1..n {
        let window = ids.len().min(64);
        let parent = ids[ids.len() - 1 - rng.below(window)];
        let id = tree.insert(Some(parent), i as u32);
        ids.push(id);
    }
    for id in &ids {
        let w = 40.0 + rng.next_f64() * 160.0;
        let h = 18.0 + rng.next_f64() * 60.0;
        tree.set_size(*id, Size::new(w, h));
    }
    (tree, root, ids)
}

fn engine(direction: Direction) -> LayoutEngine {
    LayoutEngine::new(LayoutOptions {
        direction,
        ..Default::default()
    })
}

fn bench_full_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_layout");
    for &n in &[100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(n as u64));
        for direction in [Direction::TopToBottom, Direction::RightToLeft, Direction::Centered] {
            let (mut tree, root, _) = gen_tree(n, 0xDEAD_BEEF_0000_0001);
            let mut engine = engine(direction);
            group.bench_function(format!("{direction:?}_n{n}"), |b| {
                b.iter(|| black_box(engine.layout(&mut tree, root)));
            });
        }
    }
    group.finish();
}

fn bench_partial_relayout(c: &mut Criterion) {
    let mut group = c.benchmark_group("partial_relayout");
    for &n in &[1_000usize, 10_000] {
        let (mut tree, root, ids) = gen_tree(n, 0x1234_5678_9ABC_DEF0);
        let mut engine = engine(Direction::LeftToRight);
        engine.layout(&mut tree, root);
        let mut rng = Rng::new(7);
        let batches: Vec<Vec<(NodeId, Size)>> = (0..64)
            .map(|_| {
                (0..10)
                    .map(|_| {
                        let id = ids[rng.below(ids.len())];
                        (id, Size::new(50.0 + rng.next_f64() * 100.0, 30.0))
                    })
                    .collect()
            })
            .collect();
        let mut next = 0;
        group.bench_function(format!("ten_changes_n{n}"), |b| {
            b.iter(|| {
                let batch = &batches[next % batches.len()];
                next += 1;
                let changed: Vec<NodeId> = batch.iter().map(|(id, _)| *id).collect();
                for (id, size) in batch {
                    tree.set_size(*id, *size);
                }
                black_box(engine.relayout(&mut tree, root, &changed))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_full_layout, bench_partial_relayout);
criterion_main!(benches);
