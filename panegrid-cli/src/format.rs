//! Text rendering of layout trees.

use std::fmt::Write as _;

use panegrid_core::layout::{LayoutNode, LayoutTree, PaneId};

/// Renders a layout as an indented tree.
///
/// `label` produces the text shown for each pane.
pub fn render_tree(tree: &LayoutTree, label: &dyn Fn(PaneId) -> String) -> String {
    let Some(root) = tree.root() else {
        return "(empty)\n".to_string();
    };
    let mut out = String::new();
    render_node(root, label, "", "", &mut out);
    out
}

fn render_node(
    node: &LayoutNode,
    label: &dyn Fn(PaneId) -> String,
    lead: &str,
    indent: &str,
    out: &mut String,
) {
    match node {
        LayoutNode::Leaf(leaf) => {
            let _ = writeln!(out, "{lead}{}", label(leaf.id));
        }
        LayoutNode::Split(split) => {
            let sizes: Vec<String> = split.sizes.iter().map(|size| format_percent(*size)).collect();
            let _ = writeln!(out, "{lead}split {} [{}]", split.direction, sizes.join(", "));
            let last = split.children.len().saturating_sub(1);
            for (index, child) in split.children.iter().enumerate() {
                let (branch, next) = if index == last {
                    ("└── ", "    ")
                } else {
                    ("├── ", "│   ")
                };
                render_node(
                    child,
                    label,
                    &format!("{indent}{branch}"),
                    &format!("{indent}{next}"),
                    out,
                );
            }
        }
    }
}

/// Formats a percentage with at most two decimals and no trailing zeros.
pub fn format_percent(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{text}%")
}
