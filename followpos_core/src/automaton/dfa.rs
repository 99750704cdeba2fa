use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::automaton::Automaton;
use crate::error::ConstructionError;
use crate::syntax::{firstpos, followpos, Node, END_MARKER};
use crate::util::{Position, PositionSet};

/// A DFA built by direct construction: every state is the set of tree positions it can be at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dfa {
    states: BTreeSet<PositionSet>,
    alphabet: BTreeSet<char>,
    start: PositionSet,
    accepts: BTreeSet<PositionSet>,
    transitions: BTreeMap<PositionSet, BTreeMap<char, PositionSet>>,
    end_position: Position,
}

impl Dfa {
    /// Builds the DFA recognizing the language of `root` (which must contain the end marker
    /// exactly once and number its leaves 1..=n) straight from the followpos relation, without
    /// any intermediate NFA.
    pub fn from_tree(root: &Node) -> Result<Dfa, ConstructionError> {
        let leaves = root.checked_leaves()?;

        let end_positions: Vec<Position> = leaves.iter()
            .filter(|(_, symbol)| **symbol == END_MARKER)
            .map(|(&position, _)| position)
            .collect();
        let end_position = match end_positions.as_slice() {
            [] => return Err(ConstructionError::MissingEndMarker),
            [position] => *position,
            _ => return Err(ConstructionError::InvalidArgument(
                format!("the end marker appears {} times", end_positions.len())
            )),
        };

        let follow = followpos(root);
        let alphabet: BTreeSet<char> = leaves.values()
            .copied()
            .filter(|&symbol| symbol != END_MARKER)
            .collect();

        let start = firstpos(root);

        let mut states = BTreeSet::new();
        states.insert(start.clone());
        let mut transitions = BTreeMap::new();

        let mut unmarked = VecDeque::new();
        unmarked.push_back(start.clone());

        while let Some(current) = unmarked.pop_front() {
            // Grouping the positions of the state by their symbol gives, for every symbol `a`,
            // the union of followpos(i) over the positions i labelled `a`.
            let mut row: BTreeMap<char, PositionSet> = BTreeMap::new();
            for &position in current.iter() {
                let symbol = match leaves.get(&position) {
                    Some(&x) if x != END_MARKER => x,
                    _ => continue,
                };
                let target = row.entry(symbol).or_insert_with(PositionSet::create_empty);
                if let Some(next) = follow.get(position) {
                    target.extend_from(next);
                }
            }

            // An empty destination is the dead state, it's represented by the missing transition
            row.retain(|_, next| !next.is_empty());

            for next in row.values() {
                if !states.contains(next) {
                    states.insert(next.clone());
                    unmarked.push_back(next.clone());
                }
            }

            if !row.is_empty() {
                transitions.insert(current, row);
            }
        }

        let accepts = states.iter()
            .filter(|state| state.contains(end_position))
            .cloned()
            .collect();

        Ok(Dfa {
            states,
            alphabet,
            start,
            accepts,
            transitions,
            end_position,
        })
    }

    /// Position of the end marker leaf, a state is accepting iff it contains it.
    pub fn end_position(&self) -> Position {
        self.end_position
    }

    pub fn transitions(&self) -> &BTreeMap<PositionSet, BTreeMap<char, PositionSet>> {
        &self.transitions
    }
}

impl Automaton for Dfa {
    type State = PositionSet;

    fn states(&self) -> &BTreeSet<PositionSet> {
        &self.states
    }

    fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    fn start(&self) -> &PositionSet {
        &self.start
    }

    fn accepts(&self) -> &BTreeSet<PositionSet> {
        &self.accepts
    }

    fn outgoing(&self, state: &PositionSet) -> Option<&BTreeMap<char, PositionSet>> {
        self.transitions.get(state)
    }
}
