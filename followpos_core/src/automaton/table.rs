use std::collections::BTreeMap;

use crate::automaton::Automaton;
use crate::error::ConstructionError;

/// Flat, index based form of a DFA.
/// State 0 is the start state, `next` holds one row of `alphabet.len()` entries per state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DfaTable {
    alphabet: Vec<char>,
    accepting: Vec<bool>,
    next: Vec<Option<u32>>,
}

impl DfaTable {
    /// Numbers the states of the automaton (the start state gets 0, the others follow in their
    /// natural order) and lays out the transitions.
    pub fn from_automaton<A: Automaton>(automaton: &A) -> Self {
        let start = automaton.start();
        let order: Vec<&A::State> = std::iter::once(start)
            .chain(automaton.states().iter().filter(|&state| state != start))
            .collect();
        let index: BTreeMap<&A::State, u32> = order.iter()
            .enumerate()
            .map(|(i, &state)| (state, i as u32))
            .collect();

        let alphabet: Vec<char> = automaton.alphabet().iter().copied().collect();
        let accepting = order.iter().map(|&state| automaton.is_accepting(state)).collect();

        let mut next = Vec::with_capacity(order.len() * alphabet.len());
        for &state in order.iter() {
            for &ch in alphabet.iter() {
                next.push(automaton.next(state, ch).and_then(|to| index.get(to).copied()));
            }
        }

        DfaTable { alphabet, accepting, next }
    }

    pub fn from_raw(alphabet: Vec<char>, accepting: Vec<bool>, next: Vec<Option<u32>>) -> Result<DfaTable, ConstructionError> {
        if accepting.is_empty() {
            return Err(ConstructionError::InvalidState("a table needs at least the start state".to_string()));
        }
        if alphabet.windows(2).any(|x| x[0] >= x[1]) {
            return Err(ConstructionError::InvalidState("the alphabet must be sorted and without duplicates".to_string()));
        }
        if next.len() != accepting.len() * alphabet.len() {
            return Err(ConstructionError::InvalidState(format!(
                "expected {} transitions, found {}", accepting.len() * alphabet.len(), next.len()
            )));
        }
        if next.iter().flatten().any(|&to| to as usize >= accepting.len()) {
            return Err(ConstructionError::InvalidState("transition to an unknown state".to_string()));
        }
        Ok(DfaTable { alphabet, accepting, next })
    }

    pub fn into_raw(self) -> (Vec<char>, Vec<bool>, Vec<Option<u32>>) {
        (self.alphabet, self.accepting, self.next)
    }

    #[cfg(feature = "codegen")]
    pub fn to_raw_code(&self) -> proc_macro2::TokenStream {
        use quote::quote;

        let alphabet = self.alphabet.iter();
        let accepting = self.accepting.iter();
        let next = self.next.iter().map(|x| {
            match x {
                None => quote!(None),
                Some(index) => quote!(Some(#index)),
            }
        });

        quote! {
            vec![#(#alphabet), *],
            vec![#(#accepting), *],
            vec![#(#next), *]
        }
    }

    pub fn state_count(&self) -> u32 {
        self.accepting.len() as u32
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn is_accepting(&self, state: u32) -> bool {
        self.accepting.get(state as usize).copied().unwrap_or(false)
    }

    pub fn get_next(&self, state: u32, ch: char) -> Option<u32> {
        let column = self.alphabet.binary_search(&ch).ok()?;
        self.next.get(state as usize * self.alphabet.len() + column).copied().flatten()
    }

    pub fn matches(&self, input: &str) -> bool {
        let mut state = Some(0);
        for ch in input.chars() {
            state = state.and_then(|x| self.get_next(x, ch));
        }
        state.map_or(false, |x| self.is_accepting(x))
    }
}
