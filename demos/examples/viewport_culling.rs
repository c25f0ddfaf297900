// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport culling with debounced re-layout.
//!
//! Simulate a renderer: nodes report their measured sizes over a few frames,
//! the view coalesces them into layout passes, and each frame asks which nodes
//! and edges fall inside a padded camera viewport.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_tree_demos --example viewport_culling`

use core::time::Duration;

use kurbo::{Point, Rect, Size};
use understory_tree_layout::{Direction, LayoutOptions, NodeId, Tree};
use understory_tree_view::{TreeView, Update, ViewOptions};

const FRAME: Duration = Duration::from_millis(16);

fn main() {
    env_logger::init();

    let mut tree = Tree::new();
    let root = tree.insert(None, 0_u32);
    let mut ids: Vec<NodeId> = vec![root];
    for i in 1..400_u32 {
        // Shallow, bushy map: each node hangs off one of the first few dozen.
        let parent = ids[(i as usize * 7) % ids.len().min(40)];
        ids.push(tree.insert(Some(parent), i));
    }

    let mut view = TreeView::new(
        tree,
        ViewOptions {
            layout: LayoutOptions {
                direction: Direction::Centered,
                ..Default::default()
            },
            ..Default::default()
        },
    );
    let mut now = Duration::ZERO;
    view.set_root(root, now);

    // Frame by frame, a batch of nodes mounts and reports its size.
    for (frame, batch) in ids.chunks(100).enumerate() {
        now += FRAME;
        for id in batch {
            let label = view.tree().get(*id).expect("live node").content;
            let width = 60.0 + f64::from(label % 5) * 20.0;
            view.on_size_change(*id, width, 24.0, now);
        }
        if let Some(update) = view.poll(now) {
            println!("frame {frame}: {update:?}");
        }
    }
    // Let the debounce window close.
    now += Duration::from_millis(100);
    match view.poll(now) {
        Some(Update::Full(summary)) => println!(
            "full pass: {} nodes, bounds {:.0}x{:.0}",
            summary.visited,
            summary.bounds.width(),
            summary.bounds.height()
        ),
        other => println!("unexpected flush: {other:?}"),
    }

    let camera = Rect::from_center_size(Point::ZERO, Size::new(800.0, 600.0));
    let padded = view.culler().viewport_with_padding(camera);
    let visible = view.find_visible(padded);
    let edges = view.find_visible_edges(padded);
    println!(
        "{} of {} nodes and {} edges near the camera",
        visible.len(),
        view.culler().len(),
        edges.len()
    );
    assert!(visible.contains(&root));

    // One node grows: a small change set yields a partial update.
    now += FRAME;
    view.on_size_change(ids[1], 240.0, 48.0, now);
    now += Duration::from_millis(60);
    if let Some(Update::Partial(update)) = view.poll(now) {
        println!(
            "partial pass rewrote {:?} and {} edges",
            update.nodes,
            update.edges.len()
        );
    }

    // Jitter below the size epsilon is dropped outright.
    assert!(!view.on_size_change(ids[1], 240.4, 48.2, now));
    log::info!("done");
}
