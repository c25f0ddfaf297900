// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_tree_layout::{Direction, LayoutEngine, LayoutOptions, Tree};
use understory_tree_view::{CullOptions, PackedRTree, ViewportCuller};

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
}

fn gen_rects(n: usize, seed: u64) -> Vec<(Rect, u32)> {
    let mut rng = Rng::new(seed);
    (0..n)
        .map(|i| {
            let x = rng.next_f64() * 10_000.0;
            let y = rng.next_f64() * 10_000.0;
            let w = 40.0 + rng.next_f64() * 160.0;
            let h = 18.0 + rng.next_f64() * 60.0;
            (Rect::new(x, y, x + w, y + h), i as u32)
        })
        .collect()
}

fn bench_bulk_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("packed_rtree_bulk_load");
    for &n in &[1_000usize, 10_000, 100_000] {
        let rects = gen_rects(n, 0xC0FF_EE00_1234_5678);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("n{n}"), |b| {
            b.iter(|| black_box(PackedRTree::bulk_load(rects.iter().copied())));
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("packed_rtree_query");
    for &n in &[1_000usize, 10_000, 100_000] {
        let idx = PackedRTree::bulk_load(gen_rects(n, 0xFACE_FEED_0000_0001));
        let viewport = Rect::new(4_000.0, 4_000.0, 5_920.0, 5_080.0);
        group.bench_function(format!("viewport_n{n}"), |b| {
            b.iter(|| black_box(idx.query_rect(viewport)));
        });
    }
    group.finish();
}

fn bench_culler(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport_culler");
    let mut rng = Rng::new(42);
    let mut tree = Tree::new();
    let root = tree.insert(None, 0_u32);
    let mut ids = vec![root];
    for i in 1..20_000_u32 {
        let parent = ids[(rng.next_u64() % ids.len() as u64) as usize];
        ids.push(tree.insert(Some(parent), i));
    }
    for id in &ids {
        tree.set_size(*id, Size::new(60.0 + rng.next_f64() * 80.0, 24.0));
    }
    let mut engine = LayoutEngine::new(LayoutOptions {
        direction: Direction::Centered,
        ..Default::default()
    });
    let summary = engine.layout(&mut tree, root).expect("live root");
    let center = summary.bounds.center();
    let viewport = Rect::from_center_size(center, Size::new(1920.0, 1080.0));

    let mut culler = ViewportCuller::new(CullOptions::default());
    group.bench_function("rebuild_n20000", |b| {
        b.iter(|| culler.rebuild(&tree, engine.visited()));
    });
    culler.rebuild(&tree, engine.visited());
    let padded = culler.viewport_with_padding(viewport);
    group.bench_function("find_visible_n20000", |b| {
        b.iter(|| black_box(culler.find_visible(padded)));
    });
    group.bench_function("find_visible_edges_n20000", |b| {
        b.iter(|| black_box(culler.find_visible_edges(&tree, padded)));
    });
    group.finish();
}

criterion_group!(benches, bench_bulk_load, bench_query, bench_culler);
criterion_main!(benches);
