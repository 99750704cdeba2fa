//! Graphviz DOT output for syntax trees and automata.
//! Only the DOT source is produced, turning it into an image is up to the `dot` tool.

use std::fmt::Write;

use crate::automaton::Automaton;
use crate::report::{StateLabel, StateNames};
use crate::syntax::Node;

fn escape(text: &str) -> String {
    let mut res = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => res.push_str("\\\""),
            '\\' => res.push_str("\\\\"),
            '\n' => res.push_str("\\n"),
            _ => res.push(ch),
        }
    }
    res
}

fn node_label(node: &Node) -> String {
    match node {
        Node::Leaf { symbol, position } => format!("{}\n{}", symbol, position),
        Node::Concat { .. } => ".".to_string(),
        Node::Union { .. } => "|".to_string(),
        Node::Star { .. } => "*".to_string(),
    }
}

fn write_tree_node(dot: &mut String, node: &Node, next_id: &mut usize) -> usize {
    let id = *next_id;
    *next_id += 1;

    let shape = match node {
        Node::Leaf { .. } => "box",
        _ => "ellipse",
    };
    // Writing to a String can't fail
    let _ = writeln!(dot, "n{} [label = \"{}\" shape = {}];", id, escape(&node_label(node)), shape);

    for child in node.children() {
        let child_id = write_tree_node(dot, child, next_id);
        let _ = writeln!(dot, "n{} -> n{};", id, child_id);
    }
    id
}

/// The syntax tree, operator nodes as ellipses and leaves as boxes labelled with symbol and position.
pub fn tree_to_dot(root: &Node) -> String {
    let mut dot = "digraph tree {\nnode [fontname = \"Helvetica\" fontsize = 10];\n".to_owned();
    let mut next_id = 0;
    write_tree_node(&mut dot, root, &mut next_id);
    dot.push_str("}\n");
    dot
}

/// The automaton left to right, states named `<prefix>0`, `<prefix>1`... (start first) and
/// labelled with what they contain; accepting states are double circles.
pub fn automaton_to_dot<A: Automaton>(automaton: &A, prefix: &str) -> String where A::State: StateLabel {
    let names = StateNames::new(automaton, prefix);

    let mut dot = "digraph automaton {\nrankdir = LR;\nnode [shape = circle fontname = \"Helvetica\" fontsize = 10];\n".to_owned();
    dot.push_str("__start__ [label = \"\" shape = none];\n");

    for (state, name) in names.iter() {
        let shape = if automaton.is_accepting(state) { "doublecircle" } else { "circle" };
        let label = format!("{}\n{}", name, state.label());
        let _ = writeln!(dot, "{} [label = \"{}\" shape = {}];", name, escape(&label), shape);
    }

    if let Some(start) = names.name(automaton.start()) {
        let _ = writeln!(dot, "__start__ -> {};", start);
    }

    for (from, symbol, to) in automaton.edges() {
        if let (Some(from), Some(to)) = (names.name(from), names.name(to)) {
            let _ = writeln!(dot, "{} -> {} [label = \"{}\"];", from, to, escape(&symbol.to_string()));
        }
    }
    dot.push_str("}\n");
    dot
}
