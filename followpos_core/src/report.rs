use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::fmt;

use crate::automaton::{Automaton, Trace, Visit};
use crate::syntax::{attribute_table, firstpos, lastpos, nullable, FollowposTable, Node, NodeAttributes};
use crate::util::PositionSet;

/// How a state is written in reports and renderings.
pub trait StateLabel {
    fn label(&self) -> String;
}

impl StateLabel for PositionSet {
    fn label(&self) -> String {
        self.to_string()
    }
}

impl<S: StateLabel> StateLabel for BTreeSet<S> {
    fn label(&self) -> String {
        let inner: Vec<String> = self.iter().map(|x| x.label()).collect();
        format!("[{}]", inner.join(", "))
    }
}

/// Short names for the states of an automaton: the start state is `<prefix>0`, the other ones
/// are numbered in their natural order.
pub struct StateNames<'a, S> {
    order: Vec<&'a S>,
    names: BTreeMap<&'a S, String>,
}

impl<'a, S: Ord> StateNames<'a, S> {
    pub fn new<A: Automaton<State = S>>(automaton: &'a A, prefix: &str) -> Self {
        let start = automaton.start();
        let order: Vec<&S> = std::iter::once(start)
            .chain(automaton.states().iter().filter(|&x| x != start))
            .collect();
        let names = order.iter()
            .enumerate()
            .map(|(index, &state)| (state, format!("{}{}", prefix, index)))
            .collect();
        StateNames { order, names }
    }

    pub fn name(&self, state: &S) -> Option<&str> {
        self.names.get(state).map(|x| x.as_str())
    }

    /// Every state with its name, start state first.
    pub fn iter(&self) -> impl Iterator<Item = (&'a S, &str)> + '_ {
        self.order.iter().map(move |&state| (state, self.names[state].as_str()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn name_or_dash(&self, state: Option<&S>) -> &str {
        state.and_then(|x| self.name(x)).unwrap_or("-")
    }
}

fn write_set(f: &mut Formatter<'_>, set: &PositionSet, width: usize) -> fmt::Result {
    write!(f, "{:<width$}", set.to_string(), width = width)
}

/// The attributes of every node of a tree, one line each in pre-order.
pub struct NodeTable(Vec<NodeAttributes>);

impl NodeTable {
    pub fn new(root: &Node) -> Self {
        NodeTable(attribute_table(root))
    }

    pub fn rows(&self) -> &[NodeAttributes] {
        &self.0
    }
}

impl Display for NodeTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let first_width = self.0.iter().map(|x| x.firstpos.to_string().len()).max().unwrap_or(0).max(8);
        writeln!(f, "{:<5}|{:<7}|{:<4}|{:<4}|{:<9}|{:<w$}|{}", "Id", "Kind", "Pos", "Sym", "Nullable", "Firstpos", "Lastpos", w = first_width)?;
        for row in self.0.iter() {
            let position = row.position.map(|x| x.to_string()).unwrap_or_default();
            let symbol = row.symbol.map(|x| x.to_string()).unwrap_or_default();
            write!(f, "{:<5}|{:<7}|{:<4}|{:<4}|{:<9}|", row.id, row.kind, position, symbol, row.nullable)?;
            write_set(f, &row.firstpos, first_width)?;
            writeln!(f, "|{}", row.lastpos)?;
        }
        Ok(())
    }
}

/// nullable, firstpos and lastpos of the root alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootSummary {
    pub nullable: bool,
    pub firstpos: PositionSet,
    pub lastpos: PositionSet,
}

impl RootSummary {
    pub fn new(root: &Node) -> Self {
        RootSummary {
            nullable: nullable(root),
            firstpos: firstpos(root),
            lastpos: lastpos(root),
        }
    }
}

impl Display for RootSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "nullable(root) = {}", self.nullable)?;
        writeln!(f, "firstpos(root) = {}", self.firstpos)?;
        writeln!(f, "lastpos(root)  = {}", self.lastpos)
    }
}

pub struct FollowposReport<'a> {
    leaves: BTreeMap<u32, char>,
    table: &'a FollowposTable,
}

impl<'a> FollowposReport<'a> {
    pub fn new(root: &Node, table: &'a FollowposTable) -> Self {
        FollowposReport { leaves: root.leaves(), table }
    }
}

impl<'a> Display for FollowposReport<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Leaf\tSymbol\tFollow Pos")?;
        for (position, follow) in self.table.iter() {
            let symbol = self.leaves.get(position).map(|x| x.to_string()).unwrap_or_default();
            writeln!(f, "{}\t{}\t{}", position, symbol, follow)?;
        }
        Ok(())
    }
}

/// Orders symbols as uppercase letters, lowercase letters, `_`, digits and then everything else.
pub fn column_order(alphabet: &BTreeSet<char>) -> Vec<char> {
    let group = |ch: char| match ch {
        'A'..='Z' => 0,
        'a'..='z' => 1,
        '_' => 2,
        '0'..='9' => 3,
        _ => 4,
    };
    let mut res: Vec<char> = alphabet.iter().copied().collect();
    res.sort_by_key(|&ch| (group(ch), ch));
    res
}

/// The transition function as a table, one row per state (start first) and one column per symbol.
/// Accepting states are marked with `*`, missing transitions are written as `-`.
/// The state names are followed by the states they stand for.
pub struct TransitionTable<'a, A: Automaton> {
    automaton: &'a A,
    names: StateNames<'a, A::State>,
    columns: Vec<char>,
}

impl<'a, A: Automaton> TransitionTable<'a, A> {
    pub fn new(automaton: &'a A, prefix: &str) -> Self {
        TransitionTable {
            automaton,
            names: StateNames::new(automaton, prefix),
            columns: column_order(automaton.alphabet()),
        }
    }

    pub fn names(&self) -> &StateNames<'a, A::State> {
        &self.names
    }
}

impl<'a, A: Automaton> Display for TransitionTable<'a, A> where A::State: StateLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let width = self.names.iter().map(|(_, name)| name.len()).max().unwrap_or(1) + 1;

        write!(f, "{:w$}", "", w = width + 1)?;
        for ch in self.columns.iter() {
            write!(f, "|{:^w$}", ch, w = width)?;
        }
        writeln!(f)?;

        for (state, name) in self.names.iter() {
            let mark = if self.automaton.is_accepting(state) { "*" } else { " " };
            write!(f, "{}{:<w$}", mark, name, w = width)?;
            for &ch in self.columns.iter() {
                write!(f, "|{:^w$}", self.names.name_or_dash(self.automaton.next(state, ch)), w = width)?;
            }
            writeln!(f)?;
        }

        writeln!(f)?;
        for (state, name) in self.names.iter() {
            writeln!(f, "{} = {}", name, state.label())?;
        }
        Ok(())
    }
}

/// A simulation run written as `S0 -a-> S1 -b-> S1` followed by the verdict.
pub struct TraceReport<'a, 'b, S> {
    input: &'b str,
    trace: &'b Trace<'a, S>,
    names: &'b StateNames<'a, S>,
}

impl<'a, 'b, S: Ord> TraceReport<'a, 'b, S> {
    pub fn new(input: &'b str, trace: &'b Trace<'a, S>, names: &'b StateNames<'a, S>) -> Self {
        TraceReport { input, trace, names }
    }
}

impl<'a, 'b, S: Ord> Display for TraceReport<'a, 'b, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: ", self.input)?;
        let name = |visit: &Visit<'a, S>| match visit {
            Visit::Live(x) => self.names.name(x).unwrap_or("?").to_string(),
            Visit::Dead => "dead".to_string(),
        };
        if let Some(first) = self.trace.states.first() {
            write!(f, "{}", name(first))?;
        }
        for (ch, visit) in self.trace.symbols.iter().zip(self.trace.states.iter().skip(1)) {
            write!(f, " -{}-> {}", ch, name(visit))?;
        }
        write!(f, " => {}", if self.trace.accepted { "accepted" } else { "rejected" })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::automaton::{trace, Dfa};
    use crate::report::*;
    use crate::syntax::*;

    /// ab*#
    fn small_tree() -> Node {
        let mut b = TreeBuilder::new();
        let a = b.symbol('a').unwrap();
        let bb = b.symbol('b').unwrap();
        let end = b.end_marker();
        Node::concat(Node::concat(a, Node::star(bb)), end)
    }

    #[test]
    fn test_state_names() {
        let dfa = Dfa::from_tree(&small_tree()).unwrap();
        let names = StateNames::new(&dfa, "S");
        assert_eq!(names.len(), 2);
        let listed: Vec<&str> = names.iter().map(|(_, name)| name).collect();
        assert_eq!(listed, vec!["S0", "S1"]);
        assert_eq!(names.name(dfa.start()), Some("S0"));
    }

    #[test]
    fn test_root_summary() {
        let summary = RootSummary::new(&small_tree());
        assert!(!summary.nullable);
        assert_eq!(summary.to_string(), "nullable(root) = false\nfirstpos(root) = {1}\nlastpos(root)  = {3}\n");
    }

    #[test]
    fn test_followpos_report() {
        let tree = small_tree();
        let table = followpos(&tree);
        let text = FollowposReport::new(&tree, &table).to_string();
        assert_eq!(text, "Leaf\tSymbol\tFollow Pos\n1\ta\t{2, 3}\n2\tb\t{2, 3}\n3\t#\t{}\n");
    }

    #[test]
    fn test_node_table() {
        let tree = small_tree();
        let table = NodeTable::new(&tree);
        assert_eq!(table.rows().len(), 6);
        let text = table.to_string();
        assert_eq!(text.lines().count(), 7);
        assert!(text.lines().next().unwrap().starts_with("Id   |Kind   |"));
        assert!(text.contains("|Star   |"));
    }

    #[test]
    fn test_column_order() {
        let alphabet: BTreeSet<char> = "9a_Zb0A$".chars().collect();
        assert_eq!(column_order(&alphabet), vec!['A', 'Z', 'a', 'b', '_', '0', '9', '$']);
    }

    #[test]
    fn test_transition_table() {
        let dfa = Dfa::from_tree(&small_tree()).unwrap();
        let text = TransitionTable::new(&dfa, "S").to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "    | a | b ");
        assert_eq!(lines[1], " S0 |S1 | - ");
        assert_eq!(lines[2], "*S1 | - |S1 ");
        assert_eq!(lines[4], "S0 = {1}");
        assert_eq!(lines[5], "S1 = {2, 3}");

        let min = dfa.minimize().unwrap();
        let text = TransitionTable::new(&min, "Q").to_string();
        assert!(text.contains("Q1 = [{2, 3}]"));
    }

    #[test]
    fn test_trace_report() {
        let dfa = Dfa::from_tree(&small_tree()).unwrap();
        let names = StateNames::new(&dfa, "S");

        let t = trace(&dfa, "abb");
        assert_eq!(TraceReport::new("abb", &t, &names).to_string(), "\"abb\": S0 -a-> S1 -b-> S1 -b-> S1 => accepted");

        let t = trace(&dfa, "ba");
        assert_eq!(TraceReport::new("ba", &t, &names).to_string(), "\"ba\": S0 -b-> dead -a-> dead => rejected");
    }
}
