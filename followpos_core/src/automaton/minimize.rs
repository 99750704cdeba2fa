use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use crate::automaton::Automaton;
use crate::error::ConstructionError;
use crate::util::PositionSet;

/// A set of original states that behave the same way on every input.
pub type Block<S> = BTreeSet<S>;

/// The result of minimizing an automaton: every state is a block of original states.
/// It doesn't borrow from the original automaton, which is left untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinimizedDfa<S = PositionSet> {
    new_states: BTreeSet<Block<S>>,
    alphabet: BTreeSet<char>,
    start: Block<S>,
    accepts: BTreeSet<Block<S>>,
    transitions: BTreeMap<Block<S>, BTreeMap<char, Block<S>>>,
}

impl<S: Clone + Ord + Debug> MinimizedDfa<S> {
    pub fn new_states(&self) -> &BTreeSet<Block<S>> {
        &self.new_states
    }

    /// The block an original state ended up in.
    pub fn block_of(&self, state: &S) -> Option<&Block<S>> {
        self.new_states.iter().find(|block| block.contains(state))
    }

    pub fn transitions(&self) -> &BTreeMap<Block<S>, BTreeMap<char, Block<S>>> {
        &self.transitions
    }
}

impl<S: Clone + Ord + Debug> Automaton for MinimizedDfa<S> {
    type State = Block<S>;

    fn states(&self) -> &BTreeSet<Block<S>> {
        &self.new_states
    }

    fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    fn start(&self) -> &Block<S> {
        &self.start
    }

    fn accepts(&self) -> &BTreeSet<Block<S>> {
        &self.accepts
    }

    fn outgoing(&self, state: &Block<S>) -> Option<&BTreeMap<char, Block<S>>> {
        self.transitions.get(state)
    }
}

/// The behaviour of a state against the current partition: for each symbol (in alphabet order)
/// the index of the block its transition lands in, `None` when the transition is missing.
/// `None` never collides with a real block index.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct StateBehaviour(Vec<Option<usize>>);

/// The current partition plus the state to block lookup.
struct PartitionRegistry<'a, S: Ord> {
    blocks: Vec<Vec<&'a S>>,
    state_to_block: BTreeMap<&'a S, usize>,
}

impl<'a, S: Ord> PartitionRegistry<'a, S> {
    fn from_blocks(blocks: Vec<Vec<&'a S>>) -> Self {
        let mut state_to_block = BTreeMap::new();
        for (index, block) in blocks.iter().enumerate() {
            for &state in block.iter() {
                state_to_block.insert(state, index);
            }
        }

        PartitionRegistry {
            blocks,
            state_to_block,
        }
    }

    fn search_state_block(&self, state: &S) -> Option<usize> {
        self.state_to_block.get(state).copied()
    }

    fn get_behaviour<A>(&self, automaton: &A, alphabet: &[char], state: &S) -> StateBehaviour
        where A: Automaton<State = S> {
        StateBehaviour(
            alphabet.iter()
                .map(|&ch| automaton.next(state, ch).and_then(|to| self.search_state_block(to)))
                .collect()
        )
    }

    /// Splits a block into groups of states with the same behaviour.
    /// Two states of the same block that jump to different blocks on some symbol (or where only
    /// one of them jumps) can be told apart by some input, so they can't stay together.
    fn split_block<A>(&self, automaton: &A, alphabet: &[char], block: &[&'a S]) -> Vec<Vec<&'a S>>
        where A: Automaton<State = S> {
        // A block with just one state is already refined.
        if block.len() == 1 {
            return vec![block.to_vec()];
        }

        let mut states_by_behaviour = BTreeMap::new();
        for &state in block.iter() {
            states_by_behaviour.entry(self.get_behaviour(automaton, alphabet, state))
                .or_insert_with(Vec::new)
                .push(state);
        }

        states_by_behaviour.into_iter().map(|(_behaviour, states)| states).collect()
    }
}

/// Minimizes the automaton taking the first state of every block as its representative.
pub fn minimize<A: Automaton>(automaton: &A) -> Result<MinimizedDfa<A::State>, ConstructionError> {
    // Blocks are only built from the non empty groups of a refinement, `choose` never sees an empty one
    minimize_with(automaton, |block| block.iter().next().expect("blocks are never empty"))
}

/// Minimizes the automaton by partition refinement.
///
/// The partition starts as {accepting, non accepting} and every round splits each block by the
/// behaviour of its states against the previous round, until a round splits nothing.
/// The transitions of a block are read from the state picked by `choose`: after refinement every
/// state of a block has the same behaviour, so any choice gives the same automaton.
pub fn minimize_with<A, F>(automaton: &A, choose: F) -> Result<MinimizedDfa<A::State>, ConstructionError>
    where A: Automaton, F: Fn(&Block<A::State>) -> &A::State {
    if automaton.states().is_empty() {
        return Err(ConstructionError::InvalidState("cannot minimize an automaton without states".to_string()));
    }

    let alphabet: Vec<char> = automaton.alphabet().iter().copied().collect();

    let (accepting, rejecting): (Vec<&A::State>, Vec<&A::State>) = automaton.states().iter()
        .partition(|state| automaton.is_accepting(state));
    let initial = vec![accepting, rejecting].into_iter()
        .filter(|block| !block.is_empty())
        .collect();

    let mut registry = PartitionRegistry::from_blocks(initial);
    loop {
        let mut next_blocks = Vec::with_capacity(registry.blocks.len());
        let mut changed = false;

        for block in registry.blocks.iter() {
            let splitted = registry.split_block(automaton, &alphabet, block);
            if splitted.len() > 1 {
                changed = true;
            }
            next_blocks.extend(splitted);
        }

        if !changed {
            break;
        }
        registry = PartitionRegistry::from_blocks(next_blocks);
    }

    // Each block of the final partition is a state of the minimized automaton
    let blocks: Vec<Block<A::State>> = registry.blocks.iter()
        .map(|block| block.iter().map(|&state| state.clone()).collect())
        .collect();

    let start_index = registry.search_state_block(automaton.start())
        .ok_or_else(|| ConstructionError::InvalidState("the start state is not a state of the automaton".to_string()))?;
    let start = blocks[start_index].clone();

    // The initial split keeps accepting and non accepting states apart, so "any" is "all" here
    let accepts = blocks.iter()
        .filter(|block| block.iter().any(|state| automaton.is_accepting(state)))
        .cloned()
        .collect();

    let mut transitions = BTreeMap::new();
    for block in blocks.iter() {
        let representative = choose(block);
        let mut row = BTreeMap::new();

        if let Some(outgoing) = automaton.outgoing(representative) {
            for (&ch, to) in outgoing.iter() {
                // A destination outside of every block would be a bug in the refinement, it's
                // treated as the dead state like a missing transition.
                if let Some(to_index) = registry.search_state_block(to) {
                    row.insert(ch, blocks[to_index].clone());
                }
            }
        }

        if !row.is_empty() {
            transitions.insert(block.clone(), row);
        }
    }

    Ok(MinimizedDfa {
        new_states: blocks.into_iter().collect(),
        alphabet: automaton.alphabet().clone(),
        start,
        accepts,
        transitions,
    })
}

impl crate::automaton::Dfa {
    pub fn minimize(&self) -> Result<MinimizedDfa, ConstructionError> {
        minimize(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use crate::automaton::{minimize, minimize_with, Automaton, Dfa, MinimizedDfa};
    use crate::error::ConstructionError;
    use crate::syntax::*;
    use crate::util::PositionSet;

    fn set(x: &[u32]) -> PositionSet {
        x.iter().copied().collect()
    }

    /// (a b* | c b*)#
    fn redundant_tree() -> Node {
        let mut b = TreeBuilder::new();
        let a = b.symbol('a').unwrap();
        let b1 = b.symbol('b').unwrap();
        let left = Node::concat(a, Node::star(b1));
        let c = b.symbol('c').unwrap();
        let b2 = b.symbol('b').unwrap();
        let right = Node::concat(c, Node::star(b2));
        let end = b.end_marker();
        Node::concat(Node::union(left, right), end)
    }

    #[test]
    fn test_merges_equivalent_states() {
        let dfa = Dfa::from_tree(&redundant_tree()).unwrap();
        assert_eq!(dfa.state_count(), 3);

        let min = dfa.minimize().unwrap();
        assert_eq!(min.state_count(), 2);

        let tail = min.block_of(&set(&[2, 5])).unwrap();
        assert_eq!(tail, min.block_of(&set(&[4, 5])).unwrap());
        assert_eq!(tail.len(), 2);
        assert!(min.is_accepting(tail));

        let start = min.start();
        assert_eq!(start, min.block_of(&set(&[1, 3])).unwrap());
        assert!(!min.is_accepting(start));
        assert_eq!(min.next(start, 'a'), Some(tail));
        assert_eq!(min.next(start, 'c'), Some(tail));
        assert_eq!(min.next(start, 'b'), None);
        assert_eq!(min.next(tail, 'b'), Some(tail));
        assert_eq!(min.alphabet(), dfa.alphabet());
    }

    #[test]
    fn test_java_identifier_is_minimal() {
        let dfa = Dfa::from_tree(&java_identifier_tree()).unwrap();
        let min = dfa.minimize().unwrap();
        assert_eq!(min.state_count(), 2);
        assert_eq!(min.accepts().len(), 1);
        assert!(min.new_states().iter().all(|block| block.len() == 1));
    }

    #[test]
    fn test_representative_choice() {
        let dfa = Dfa::from_tree(&redundant_tree()).unwrap();
        let first = minimize_with(&dfa, |block| block.iter().next().unwrap()).unwrap();
        let last = minimize_with(&dfa, |block| block.iter().next_back().unwrap()).unwrap();
        assert_eq!(first, last);
    }

    #[test]
    fn test_minimize_twice() {
        let dfa = Dfa::from_tree(&redundant_tree()).unwrap();
        let once = minimize(&dfa).unwrap();
        let twice = minimize(&once).unwrap();
        assert_eq!(once.state_count(), twice.state_count());
        assert_eq!(once.edges().len(), twice.edges().len());
        assert!(twice.new_states().iter().all(|block| block.len() == 1));
    }

    /// An automaton with no states, only reachable through the trait
    struct Empty {
        states: BTreeSet<u32>,
        alphabet: BTreeSet<char>,
        start: u32,
    }

    impl Automaton for Empty {
        type State = u32;

        fn states(&self) -> &BTreeSet<u32> {
            &self.states
        }

        fn alphabet(&self) -> &BTreeSet<char> {
            &self.alphabet
        }

        fn start(&self) -> &u32 {
            &self.start
        }

        fn accepts(&self) -> &BTreeSet<u32> {
            &self.states
        }

        fn outgoing(&self, _state: &u32) -> Option<&BTreeMap<char, u32>> {
            None
        }
    }

    #[test]
    fn test_no_states() {
        let empty = Empty { states: BTreeSet::new(), alphabet: BTreeSet::new(), start: 0 };
        let res: Result<MinimizedDfa<u32>, ConstructionError> = minimize(&empty);
        assert!(matches!(res, Err(ConstructionError::InvalidState(_))));
    }
}
