use crate::automaton::Automaton;

/// A state visited while running an automaton.
#[derive(Debug, PartialEq, Eq)]
pub enum Visit<'a, S> {
    Live(&'a S),
    /// The implicit state reached through a missing transition, it rejects everything.
    Dead,
}

// Manual impls: deriving would require S: Copy
impl<'a, S> Clone for Visit<'a, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, S> Copy for Visit<'a, S> {}

impl<'a, S> Visit<'a, S> {
    pub fn state(&self) -> Option<&'a S> {
        match self {
            Visit::Live(x) => Some(*x),
            Visit::Dead => None,
        }
    }
}

/// Every state visited during a run, starting with the start state and then one entry for
/// each consumed symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trace<'a, S> {
    pub symbols: Vec<char>,
    pub states: Vec<Visit<'a, S>>,
    pub accepted: bool,
}

impl<'a, S> Trace<'a, S> {
    /// The state the run ended in.
    pub fn last(&self) -> Visit<'a, S> {
        // states always contains at least the start state
        self.states.last().copied().unwrap_or(Visit::Dead)
    }

    /// Index of the symbol that killed the run, if any.
    pub fn dead_at(&self) -> Option<usize> {
        self.states.iter()
            .position(|x| x.state().is_none())
            .map(|index| index - 1)
    }
}

/// Runs the automaton on `input` and tells whether it's accepted.
/// A missing transition (symbols outside the alphabet included) moves to the dead state and the
/// run can't recover from there: this never fails, it only rejects.
pub fn simulate<A: Automaton>(automaton: &A, input: &str) -> bool {
    let mut state = Some(automaton.start());
    for ch in input.chars() {
        state = state.and_then(|x| automaton.next(x, ch));
        if state.is_none() {
            return false;
        }
    }
    state.map_or(false, |x| automaton.is_accepting(x))
}

/// Same as [`simulate`] but records the visited states.
pub fn trace<'a, A: Automaton>(automaton: &'a A, input: &str) -> Trace<'a, A::State> {
    let mut state = Some(automaton.start());
    let mut states = vec![Visit::Live(automaton.start())];
    let mut symbols = Vec::new();

    for ch in input.chars() {
        state = state.and_then(|x| automaton.next(x, ch));
        symbols.push(ch);
        states.push(state.map_or(Visit::Dead, Visit::Live));
    }

    let accepted = state.map_or(false, |x| automaton.is_accepting(x));
    Trace { symbols, states, accepted }
}
