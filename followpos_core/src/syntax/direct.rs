use std::collections::BTreeMap;

use crate::syntax::{Node, NodeKind};
use crate::util::{Position, PositionSet};

// The four functions below match on every variant without a fallback arm: adding a node kind
// won't compile until each of them handles it.

/// Whether the language of the subtree contains the empty string.
pub fn nullable(node: &Node) -> bool {
    match node {
        Node::Leaf { .. } => false,
        Node::Concat { left, right } => nullable(left) && nullable(right),
        Node::Union { left, right } => nullable(left) || nullable(right),
        Node::Star { .. } => true,
    }
}

/// Positions that can match the first symbol of a string generated by the subtree.
pub fn firstpos(node: &Node) -> PositionSet {
    match node {
        Node::Leaf { position, .. } => PositionSet::singleton(*position),
        Node::Union { left, right } => firstpos(left).union(&firstpos(right)),
        Node::Concat { left, right } => {
            if nullable(left) {
                firstpos(left).union(&firstpos(right))
            } else {
                firstpos(left)
            }
        },
        Node::Star { child } => firstpos(child),
    }
}

/// Positions that can match the last symbol of a string generated by the subtree.
pub fn lastpos(node: &Node) -> PositionSet {
    match node {
        Node::Leaf { position, .. } => PositionSet::singleton(*position),
        Node::Union { left, right } => lastpos(left).union(&lastpos(right)),
        Node::Concat { left, right } => {
            if nullable(right) {
                lastpos(left).union(&lastpos(right))
            } else {
                lastpos(right)
            }
        },
        Node::Star { child } => lastpos(child),
    }
}

/// followpos(i) for every leaf position i of a tree.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FollowposTable(BTreeMap<Position, PositionSet>);

impl FollowposTable {
    /// A table with an empty set for every leaf of the tree.
    pub fn for_tree(root: &Node) -> Self {
        FollowposTable(
            root.leaves().keys().map(|&position| (position, PositionSet::create_empty())).collect()
        )
    }

    /// The followpos set of a position, positions that aren't in the table follow nothing.
    pub fn get(&self, position: Position) -> Option<&PositionSet> {
        self.0.get(&position)
    }

    pub fn iter(&self) -> std::collections::btree_map::Iter<Position, PositionSet> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn add_all(&mut self, from: &PositionSet, to: &PositionSet) {
        for &i in from.iter() {
            self.0.entry(i)
                .or_insert_with(PositionSet::create_empty)
                .extend_from(to);
        }
    }
}

/// Adds the followpos edges generated by every node of the subtree to `table`.
/// Only `Concat` and `Star` generate edges, but the visit goes through every node: a `Concat`
/// nested inside a `Union` still has to contribute.
pub fn compute_followpos(node: &Node, table: &mut FollowposTable) {
    match node {
        Node::Leaf { .. } => {},
        Node::Concat { left, right } => {
            table.add_all(&lastpos(left), &firstpos(right));
            compute_followpos(left, table);
            compute_followpos(right, table);
        },
        Node::Union { left, right } => {
            compute_followpos(left, table);
            compute_followpos(right, table);
        },
        Node::Star { child } => {
            table.add_all(&lastpos(child), &firstpos(child));
            compute_followpos(child, table);
        },
    }
}

/// The complete followpos table of a tree.
pub fn followpos(root: &Node) -> FollowposTable {
    let mut table = FollowposTable::for_tree(root);
    compute_followpos(root, &mut table);
    table
}

/// The direct-construction attributes of a single node, as shown by the node table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeAttributes {
    /// 1-based pre-order index of the node
    pub id: usize,
    pub kind: NodeKind,
    pub position: Option<Position>,
    pub symbol: Option<char>,
    pub nullable: bool,
    pub firstpos: PositionSet,
    pub lastpos: PositionSet,
}

/// Computes the attributes of every node, in pre-order.
pub fn attribute_table(root: &Node) -> Vec<NodeAttributes> {
    root.nodes().into_iter()
        .enumerate()
        .map(|(index, node)| {
            let (position, symbol) = match node {
                Node::Leaf { symbol, position } => (Some(*position), Some(*symbol)),
                _ => (None, None),
            };
            NodeAttributes {
                id: index + 1,
                kind: node.kind(),
                position,
                symbol,
                nullable: nullable(node),
                firstpos: firstpos(node),
                lastpos: lastpos(node),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::syntax::*;
    use crate::util::PositionSet;

    fn set(x: &[u32]) -> PositionSet {
        x.iter().copied().collect()
    }

    /// (a|b)*abb# with positions 1..=6, the textbook example
    fn textbook_tree() -> Node {
        let mut b = TreeBuilder::new();
        let a1 = b.symbol('a').unwrap();
        let b2 = b.symbol('b').unwrap();
        let star = Node::star(Node::union(a1, b2));
        let a3 = b.symbol('a').unwrap();
        let b4 = b.symbol('b').unwrap();
        let b5 = b.symbol('b').unwrap();
        let end = b.end_marker();
        Node::concat(Node::concat(Node::concat(Node::concat(star, a3), b4), b5), end)
    }

    #[test]
    fn test_nullable() {
        assert!(!nullable(&Node::leaf('a', 1)));
        assert!(nullable(&Node::star(Node::leaf('a', 1))));
        assert!(nullable(&Node::union(Node::leaf('a', 1), Node::star(Node::leaf('b', 2)))));
        assert!(!nullable(&Node::concat(Node::leaf('a', 1), Node::star(Node::leaf('b', 2)))));
        assert!(!nullable(&textbook_tree()));
    }

    #[test]
    fn test_first_last() {
        let tree = textbook_tree();
        assert_eq!(firstpos(&tree), set(&[1, 2, 3]));
        assert_eq!(lastpos(&tree), set(&[6]));

        // a* b* : both sides are nullable
        let tree = Node::concat(Node::star(Node::leaf('a', 1)), Node::star(Node::leaf('b', 2)));
        assert_eq!(firstpos(&tree), set(&[1, 2]));
        assert_eq!(lastpos(&tree), set(&[1, 2]));
    }

    #[test]
    fn test_followpos_textbook() {
        let table = followpos(&textbook_tree());
        assert_eq!(table.len(), 6);
        assert_eq!(table.get(1), Some(&set(&[1, 2, 3])));
        assert_eq!(table.get(2), Some(&set(&[1, 2, 3])));
        assert_eq!(table.get(3), Some(&set(&[4])));
        assert_eq!(table.get(4), Some(&set(&[5])));
        assert_eq!(table.get(5), Some(&set(&[6])));
        assert_eq!(table.get(6), Some(&set(&[])));
    }

    #[test]
    fn test_followpos_inside_union() {
        // (ab | c)# : the concat lives below a union and must still produce 1 -> 2
        let mut b = TreeBuilder::new();
        let a = b.symbol('a').unwrap();
        let bb = b.symbol('b').unwrap();
        let c = b.symbol('c').unwrap();
        let end = b.end_marker();
        let tree = Node::concat(Node::union(Node::concat(a, bb), c), end);

        let table = followpos(&tree);
        assert_eq!(table.get(1), Some(&set(&[2])));
        assert_eq!(table.get(2), Some(&set(&[4])));
        assert_eq!(table.get(3), Some(&set(&[4])));
        assert_eq!(table.get(4), Some(&set(&[])));
    }

    #[test]
    fn test_java_identifier_followpos() {
        let tree = java_identifier_tree();
        let table = followpos(&tree);
        let tail: PositionSet = (54..=117).collect();
        for (&position, follow) in table.iter() {
            if position == 117 {
                assert!(follow.is_empty());
            } else {
                assert_eq!(follow, &tail);
            }
        }
        assert_eq!(firstpos(&tree), (1..=53).collect::<PositionSet>());
        assert_eq!(lastpos(&tree), set(&[117]));
    }

    #[test]
    fn test_attribute_table() {
        let rows = attribute_table(&textbook_tree());
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].kind, NodeKind::Concat);
        assert_eq!(rows[0].firstpos, set(&[1, 2, 3]));
        let end = rows.iter().find(|x| x.symbol == Some(END_MARKER)).unwrap();
        assert_eq!(end.position, Some(6));
        assert!(!end.nullable);
        let star = rows.iter().find(|x| x.kind == NodeKind::Star).unwrap();
        assert!(star.nullable);
        assert_eq!(star.lastpos, set(&[1, 2]));
    }
}
