use std::collections::BTreeSet;
use std::fmt::{Display, Error, Formatter};
use std::iter::FromIterator;

/// Index of a leaf in the syntax tree, 1-based and unique across the whole tree.
pub type Position = u32;

/// Ordered set of leaf positions.
/// Two DFA states built from the same positions are the same state, so the set itself is used
/// as the state identity (that's why it needs Ord + Hash).
#[derive(Debug, PartialEq, Eq, Clone, Hash, PartialOrd, Ord, Default)]
pub struct PositionSet(BTreeSet<Position>);

impl PositionSet {
    pub fn create_empty() -> Self {
        PositionSet(BTreeSet::new())
    }

    pub fn singleton(x: Position) -> Self {
        let mut set = BTreeSet::new();
        set.insert(x);
        PositionSet(set)
    }

    pub fn insert(&mut self, x: Position) {
        self.0.insert(x);
    }

    pub fn contains(&self, x: Position) -> bool {
        self.0.contains(&x)
    }

    /// Adds every position of `other` to this set.
    pub fn extend_from(&mut self, other: &PositionSet) {
        self.0.extend(other.iter().copied())
    }

    pub fn union(&self, other: &PositionSet) -> PositionSet {
        PositionSet(self.0.union(&other.0).copied().collect())
    }

    pub fn iter(&self) -> std::collections::btree_set::Iter<Position> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<Position> {
        self.0.iter().next().copied()
    }

    pub fn last(&self) -> Option<Position> {
        self.0.iter().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for PositionSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{:?}", self.0)
    }
}

impl FromIterator<Position> for PositionSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        PositionSet(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PositionSet {
    type Item = &'a Position;
    type IntoIter = std::collections::btree_set::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::PositionSet;

    #[test]
    fn test_identity_ignores_insertion_order() {
        let a: PositionSet = vec![3, 1, 2].into_iter().collect();
        let b: PositionSet = vec![1, 2, 3, 2].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.first(), Some(1));
        assert_eq!(a.last(), Some(3));
    }

    #[test]
    fn test_union() {
        let mut a = PositionSet::singleton(4);
        let b: PositionSet = vec![1, 4, 7].into_iter().collect();
        assert_eq!(a.union(&b), b);
        a.extend_from(&b);
        assert_eq!(a, b);
        assert!(PositionSet::create_empty().is_empty());
        assert_eq!(format!("{}", b), "{1, 4, 7}");
    }
}
