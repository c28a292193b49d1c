// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tri-state selection over a JSON-described forest.
//!
//! This example parses a two-root forest (Fruits and Vegetables), plays a
//! sequence of clicks against a `Selection`, and prints the tree after each
//! one with `[x]`, `[ ]`, and `[-]` markers. The keys each click reports as
//! changed are listed too; a renderer would repaint exactly those rows.
//!
//! Run:
//! - `cargo run -p understory_demos --example check_tree_walkthrough`

use understory_check_tree::{CheckState, NodeId, NodeKey, Selection, TreeDescription};

const FOREST: &str = r#"[
    { "id": 1, "label": "Fruits", "children": [
        { "id": 2, "label": "Citrus", "children": [
            { "id": 3, "label": "Orange" },
            { "id": 4, "label": "Lemon" }
        ]},
        { "id": 5, "label": "Berries", "children": [
            { "id": 6, "label": "Strawberry" },
            { "id": 7, "label": "Blueberry" }
        ]}
    ]},
    { "id": 8, "label": "Vegetables", "children": [
        { "id": 9, "label": "Spinach", "checked": true },
        { "id": 10, "label": "Carrot" }
    ]}
]"#;

fn marker(state: CheckState) -> &'static str {
    match state {
        CheckState::Checked => "[x]",
        CheckState::Unchecked => "[ ]",
        CheckState::Indeterminate => "[-]",
    }
}

fn print_tree(selection: &Selection) {
    let tree = selection.tree();
    let mut cursor = tree.roots().first().copied();
    while let Some(id) = cursor {
        print_row(selection, id);
        cursor = tree.next_depth_first(id);
    }
}

fn print_row(selection: &Selection, id: NodeId) {
    let tree = selection.tree();
    let depth = tree.depth_of(id).unwrap_or(0);
    let state = selection.state(id).unwrap_or_default();
    let label = tree.label_of(id).unwrap_or("?");
    println!(
        "  {:indent$}{} {}",
        "",
        marker(state),
        label,
        indent = depth * 4
    );
}

fn click(
    selection: &mut Selection,
    title: &str,
    key: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let key = NodeKey::from(key);
    let changes = selection.toggle(&key)?;
    let changed: Vec<String> = changes.iter().map(ToString::to_string).collect();
    println!("\n== {title}: toggle({key}) ==");
    println!("changed: {}", changed.join(", "));
    print_tree(selection);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let description: TreeDescription = serde_json::from_str(FOREST)?;
    let mut selection = Selection::from_description(description)?;

    println!("== Seeded from the description ==");
    print_tree(&selection);

    click(&mut selection, "A: one leaf", 3)?;
    click(&mut selection, "B: complete the group", 4)?;
    click(&mut selection, "C: check the other group", 5)?;
    click(&mut selection, "D: uncheck the whole root", 1)?;

    let changes = selection.clear();
    println!("\n== E: clear() ==");
    println!("changed: {} node(s)", changes.len());
    print_tree(&selection);

    // Leaves are the canonical selection a form would submit.
    selection.toggle(&NodeKey::from(2_i64))?;
    let picked: Vec<String> = selection
        .checked_leaf_ids()
        .map(ToString::to_string)
        .collect();
    println!("\nchecked leaves after toggling Citrus: {}", picked.join(", "));

    // Indeterminate is derived and cannot be requested.
    if let Err(err) = selection.set_state(&NodeKey::from(1_i64), CheckState::Indeterminate) {
        println!("rejected: {err}");
    }

    Ok(())
}
