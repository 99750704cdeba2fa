use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

mod dfa;
mod minimize;
mod simulate;
mod table;

pub use dfa::Dfa;
pub use minimize::{minimize, minimize_with, Block, MinimizedDfa};
pub use simulate::{simulate, trace, Trace, Visit};
pub use table::DfaTable;

/// Read-only view over a deterministic automaton.
/// Both the DFA built from the syntax tree and its minimized form expose their structure through
/// this trait, so simulation, minimization, reports and rendering work with either of them.
/// A missing transition means the input is rejected (implicit dead state).
pub trait Automaton {
    type State: Clone + Ord + Debug;

    fn states(&self) -> &BTreeSet<Self::State>;

    fn alphabet(&self) -> &BTreeSet<char>;

    fn start(&self) -> &Self::State;

    fn accepts(&self) -> &BTreeSet<Self::State>;

    /// The transitions leaving `state`, `None` if it has none.
    fn outgoing(&self, state: &Self::State) -> Option<&BTreeMap<char, Self::State>>;

    fn next(&self, state: &Self::State, symbol: char) -> Option<&Self::State> {
        self.outgoing(state).and_then(|row| row.get(&symbol))
    }

    fn is_accepting(&self, state: &Self::State) -> bool {
        self.accepts().contains(state)
    }

    fn state_count(&self) -> usize {
        self.states().len()
    }

    /// Every defined transition as (source, symbol, destination), sorted by source then symbol.
    fn edges(&self) -> Vec<(&Self::State, char, &Self::State)> {
        let mut res = Vec::new();
        for from in self.states() {
            if let Some(row) = self.outgoing(from) {
                for (ch, to) in row {
                    res.push((from, *ch, to));
                }
            }
        }
        res
    }
}
