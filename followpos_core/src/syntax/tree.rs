use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::fmt;

use crate::error::ConstructionError;
use crate::syntax::alphabet::check_symbol;
use crate::syntax::CharClass;
use crate::util::Position;

/// Symbol of the leaf that closes every pattern, it's never part of the input alphabet.
pub const END_MARKER: char = '#';

/// A node of the regex syntax tree.
/// Every child is owned by exactly one parent so the tree can't contain cycles or shared nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Leaf { symbol: char, position: Position },
    Concat { left: Box<Node>, right: Box<Node> },
    Union { left: Box<Node>, right: Box<Node> },
    Star { child: Box<Node> },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum NodeKind {
    Leaf,
    Concat,
    Union,
    Star,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            NodeKind::Leaf => "Leaf",
            NodeKind::Concat => "Concat",
            NodeKind::Union => "Union",
            NodeKind::Star => "Star",
        })
    }
}

impl Node {
    pub fn leaf(symbol: char, position: Position) -> Node {
        Node::Leaf { symbol, position }
    }

    pub fn concat(left: Node, right: Node) -> Node {
        Node::Concat { left: Box::new(left), right: Box::new(right) }
    }

    pub fn union(left: Node, right: Node) -> Node {
        Node::Union { left: Box::new(left), right: Box::new(right) }
    }

    pub fn star(child: Node) -> Node {
        Node::Star { child: Box::new(child) }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Leaf { .. } => NodeKind::Leaf,
            Node::Concat { .. } => NodeKind::Concat,
            Node::Union { .. } => NodeKind::Union,
            Node::Star { .. } => NodeKind::Star,
        }
    }

    pub fn is_end_marker(&self) -> bool {
        matches!(self, Node::Leaf { symbol: END_MARKER, .. })
    }

    /// Direct children, left to right.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Leaf { .. } => vec![],
            Node::Concat { left, right } | Node::Union { left, right } => vec![left.as_ref(), right.as_ref()],
            Node::Star { child } => vec![child.as_ref()],
        }
    }

    /// Every node of the tree in pre-order (parent first, then children left to right).
    pub fn nodes(&self) -> Vec<&Node> {
        let mut res = Vec::new();
        let mut work = vec![self];
        while let Some(node) = work.pop() {
            res.push(node);
            // Reversed so that the left child is visited first
            work.extend(node.children().into_iter().rev());
        }
        res
    }

    /// Maps every leaf position to the leaf symbol.
    pub fn leaves(&self) -> BTreeMap<Position, char> {
        self.nodes().into_iter()
            .filter_map(|node| match node {
                Node::Leaf { symbol, position } => Some((*position, *symbol)),
                _ => None,
            })
            .collect()
    }

    /// Same as [`Node::leaves`] but fails with `InvalidArgument` unless every position is used by
    /// exactly one leaf and the positions are exactly `1..=n`.
    pub fn checked_leaves(&self) -> Result<BTreeMap<Position, char>, ConstructionError> {
        let mut res = BTreeMap::new();
        for node in self.nodes() {
            if let Node::Leaf { symbol, position } = node {
                if let Some(prev) = res.insert(*position, *symbol) {
                    return Err(ConstructionError::InvalidArgument(format!(
                        "position {} is used by both {:?} and {:?}", position, prev, symbol
                    )));
                }
            }
        }

        if let Some((index, &position)) = res.keys().enumerate().find(|&(i, &x)| x as usize != i + 1) {
            return Err(ConstructionError::InvalidArgument(format!(
                "positions must be dense from 1, found {} where {} was expected", position, index + 1
            )));
        }
        Ok(res)
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes().iter().filter(|x| x.kind() == NodeKind::Leaf).count()
    }

    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(|x| x.depth()).max().unwrap_or(0)
    }
}

impl Display for Node {
    /// Writes the tree back in the usual regex notation, parenthesizing every operator node.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf { symbol, .. } => write!(f, "{}", symbol),
            Node::Concat { left, right } => write!(f, "({}{})", left, right),
            Node::Union { left, right } => write!(f, "({}|{})", left, right),
            Node::Star { child } => write!(f, "{}*", child),
        }
    }
}

/// Joins the nodes with `Union`, pairing them two at a time on every round (an odd node at the end
/// of a round is carried to the next one unchanged) so that the result has logarithmic depth.
pub fn balanced_union(mut nodes: Vec<Node>) -> Result<Node, ConstructionError> {
    if nodes.is_empty() {
        return Err(ConstructionError::InvalidArgument("cannot build a union of zero alternatives".to_string()));
    }

    while nodes.len() > 1 {
        let mut next = Vec::with_capacity((nodes.len() + 1) / 2);
        let mut iter = nodes.into_iter();
        while let Some(left) = iter.next() {
            match iter.next() {
                Some(right) => next.push(Node::union(left, right)),
                None => next.push(left),
            }
        }
        nodes = next;
    }

    // The loop leaves exactly one node
    nodes.pop().ok_or_else(|| ConstructionError::InvalidArgument("empty union".to_string()))
}

/// Creates leaves with dense positions starting from 1, in creation order.
#[derive(Debug)]
pub struct TreeBuilder {
    next_position: Position,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        TreeBuilder::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder { next_position: 1 }
    }

    /// The position the next leaf will receive.
    pub fn next_position(&self) -> Position {
        self.next_position
    }

    fn allocate_position(&mut self) -> Position {
        let curr = self.next_position;
        self.next_position += 1;
        curr
    }

    /// Leaf for an input symbol.
    pub fn symbol(&mut self, symbol: char) -> Result<Node, ConstructionError> {
        check_symbol(symbol)?;
        Ok(Node::leaf(symbol, self.allocate_position()))
    }

    /// Leaf for the end marker, it should be the last leaf created.
    pub fn end_marker(&mut self) -> Node {
        Node::leaf(END_MARKER, self.allocate_position())
    }

    /// One leaf per character of the class, joined in a balanced union.
    pub fn class(&mut self, class: &CharClass) -> Result<Node, ConstructionError> {
        let leaves = class.chars().iter()
            .map(|&ch| self.symbol(ch))
            .collect::<Result<Vec<Node>, ConstructionError>>()?;
        balanced_union(leaves)
    }
}

/// Builds `first rest* #` as `Concat(Concat(X, Star(Y)), #)` where `X` and `Y` are balanced unions
/// of the class characters.
pub fn identifier_tree(first: &CharClass, rest: &CharClass) -> Result<Node, ConstructionError> {
    let mut builder = TreeBuilder::new();
    let x = builder.class(first)?;
    let y = builder.class(rest)?;
    let end = builder.end_marker();

    Ok(Node::concat(Node::concat(x, Node::star(y)), end))
}

/// The tree for `[A-Za-z_][A-Za-z0-9_]*#`.
/// Positions 1..=53 belong to the first character, 54..=116 to the others and 117 to the end marker.
pub fn java_identifier_tree() -> Node {
    // Both classes are built from fixed ASCII ranges: non empty, without `#`
    identifier_tree(&CharClass::identifier_start(), &CharClass::identifier_part())
        .expect("the identifier classes are never empty and never contain the end marker")
}
