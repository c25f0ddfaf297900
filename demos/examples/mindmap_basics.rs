// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mind map basics.
//!
//! Build a small topic tree, lay it out in every direction, and fold a branch.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_tree_demos --example mindmap_basics`

use kurbo::Size;
use understory_tree_layout::{Direction, LayoutEngine, LayoutOptions, NodeId, Tree};

fn print_tree(tree: &Tree<&str>, root: NodeId) {
    for id in tree.descendants(root) {
        let node = tree.get(id).expect("live node");
        let depth = node.state().depth as usize;
        let r = node.rect();
        println!(
            "{:indent$}{:<10} ({:>7.1}, {:>7.1}) {:>5.1}x{:<5.1} {:?}",
            "",
            node.content,
            r.x0,
            r.y0,
            r.width(),
            r.height(),
            node.direction(),
            indent = depth * 2
        );
    }
}

fn main() {
    env_logger::init();

    let mut tree = Tree::new();
    let root = tree.insert(None, "rust");
    let lang = tree.insert(Some(root), "language");
    let tools = tree.insert(Some(root), "tooling");
    let eco = tree.insert(Some(root), "ecosystem");
    for topic in ["ownership", "traits", "macros"] {
        tree.insert(Some(lang), topic);
    }
    for topic in ["cargo", "clippy"] {
        tree.insert(Some(tools), topic);
    }
    let crates = tree.insert(Some(eco), "crates");
    tree.insert(Some(crates), "kurbo");
    tree.insert(Some(crates), "hashbrown");

    // Sizes would normally come from text measurement.
    for id in tree.descendants(root) {
        let label = tree.get(id).expect("live node").content;
        tree.set_size(id, Size::new(8.0 * label.len() as f64, 24.0));
    }

    let mut engine = LayoutEngine::new(LayoutOptions::default());
    for direction in Direction::ALL {
        engine.set_options(LayoutOptions {
            direction,
            node_padding: 8.0,
            ..Default::default()
        });
        let summary = engine.layout(&mut tree, root).expect("live root");
        println!(
            "\n{direction:?}: {} nodes in {:.1}x{:.1}",
            summary.visited,
            summary.bounds.width(),
            summary.bounds.height()
        );
        print_tree(&tree, root);
    }

    // A topic can override the direction for its whole subtree.
    tree.set_preferred_direction(root, Some(Direction::TopToBottom));
    let summary = engine.layout(&mut tree, root).expect("live root");
    assert_eq!(summary.direction, Direction::TopToBottom);
    tree.set_preferred_direction(root, None);

    // Folding hides descendants without losing them.
    tree.set_folded(eco, true);
    let summary = engine.layout(&mut tree, root).expect("live root");
    println!("\nfolded 'ecosystem': {} nodes laid out", summary.visited);
    assert!(!engine.visited().contains(&crates));

    tree.toggle_fold(eco, false);
    let summary = engine.layout(&mut tree, root).expect("live root");
    println!("unfolded: {} nodes laid out", summary.visited);
    assert!(engine.visited().contains(&crates));
}
