use std::fmt::Write;

use anyhow::{Context, Result};
use followpos_codegen::direct_dfa;
use followpos_core::automaton::{trace, Automaton, Dfa};
use followpos_core::render::{automaton_to_dot, tree_to_dot};
use followpos_core::report::{FollowposReport, NodeTable, RootSummary, StateNames, TraceReport, TransitionTable};
use followpos_core::syntax::{followpos, identifier_tree, CharClass, Node};

direct_dfa! {
    JavaIdentifier = ['A'..='Z' 'a'..='z' '_'] ['A'..='Z' 'a'..='z' '_' '0'..='9']* ;
}

/// The tree of `[first][rest]*#`, classes are written like `A-Za-z_`.
pub fn build_tree(first: &str, rest: &str) -> Result<Node> {
    let first: CharClass = first.parse()
        .with_context(|| format!("invalid first character class {:?}", first))?;
    let rest: CharClass = rest.parse()
        .with_context(|| format!("invalid rest character class {:?}", rest))?;
    Ok(identifier_tree(&first, &rest)?)
}

pub fn tree_report(tree: &Node, dot: bool) -> String {
    if dot {
        return tree_to_dot(tree);
    }
    format!("{}\nleaves: {}, depth: {}\n", tree, tree.leaf_count(), tree.depth())
}

/// Node table, root summary and followpos table.
pub fn functions_report(tree: &Node) -> String {
    let follow = followpos(tree);
    format!("{}\n{}\n{}", NodeTable::new(tree), RootSummary::new(tree), FollowposReport::new(tree, &follow))
}

pub fn dfa_report(tree: &Node, dot: bool) -> Result<String> {
    let dfa = Dfa::from_tree(tree)?;
    if dot {
        return Ok(automaton_to_dot(&dfa, "S"));
    }
    Ok(format!("states: {}\n\n{}", dfa.state_count(), TransitionTable::new(&dfa, "S")))
}

pub fn minimize_report(tree: &Node, dot: bool) -> Result<String> {
    let dfa = Dfa::from_tree(tree)?;
    let min = dfa.minimize()?;
    if dot {
        return Ok(automaton_to_dot(&min, "Q"));
    }
    Ok(format!("states: {} -> {}\n\n{}", dfa.state_count(), min.state_count(), TransitionTable::new(&min, "Q")))
}

fn run_words<A: Automaton>(automaton: &A, prefix: &str, words: &[String], show_trace: bool) -> String {
    let names = StateNames::new(automaton, prefix);
    let mut res = String::new();
    for word in words.iter() {
        let run = trace(automaton, word);
        // Writing to a String can't fail
        let _ = if show_trace {
            writeln!(res, "{}", TraceReport::new(word, &run, &names))
        } else {
            writeln!(res, "{:?}: {}", word, if run.accepted { "accepted" } else { "rejected" })
        };
    }
    res
}

pub fn simulate_report(tree: &Node, words: &[String], minimized: bool, show_trace: bool) -> Result<String> {
    let dfa = Dfa::from_tree(tree)?;
    let res = if minimized {
        run_words(&dfa.minimize()?, "Q", words, show_trace)
    } else {
        run_words(&dfa, "S", words, show_trace)
    };
    Ok(res)
}

/// Checks the words against the Java identifier matcher built at compile time.
pub fn check_report(words: &[String]) -> String {
    let mut res = String::new();
    for word in words.iter() {
        let verdict = if java_identifier::matches(word) { "accepted" } else { "rejected" };
        let _ = writeln!(res, "{:?}: {}", word, verdict);
    }
    res
}

#[cfg(test)]
mod tests {
    use followpos_core::automaton::{simulate, Dfa};
    use followpos_core::syntax::java_identifier_tree;

    use crate::*;

    fn words(x: &[&str]) -> Vec<String> {
        x.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn test_default_classes() {
        let tree = build_tree("A-Za-z_", "A-Za-z_0-9").unwrap();
        assert_eq!(tree, java_identifier_tree());
        assert!(build_tree("", "a").is_err());
        assert!(build_tree("a", "z-a").is_err());
        assert!(build_tree("a#", "a").is_err());
    }

    #[test]
    fn test_compiled_matcher() {
        let dfa = Dfa::from_tree(&java_identifier_tree()).unwrap();
        let table = java_identifier::build_dfa();
        assert_eq!(table.state_count(), 2);
        for word in &["PotionBrewer", "_ok9", "MUSHROOM_PRICE", "2Bad", "", "a-b", "x", "9"] {
            assert_eq!(java_identifier::matches(word), simulate(&dfa, word), "word {:?}", word);
        }
    }

    #[test]
    fn test_reports() {
        let tree = build_tree("ab", "b").unwrap();
        assert!(tree_report(&tree, false).starts_with("(((a|b)b*)#)\n"));
        assert!(tree_report(&tree, true).starts_with("digraph tree {"));

        let functions = functions_report(&tree);
        assert!(functions.contains("firstpos(root) = {1, 2}"));
        assert!(functions.contains("Leaf\tSymbol\tFollow Pos\n1\ta\t{3, 4}\n"));

        let dfa = dfa_report(&tree, false).unwrap();
        assert!(dfa.starts_with("states: 2\n"));
        assert!(dfa_report(&tree, true).unwrap().contains("__start__ -> S0;"));

        let min = minimize_report(&tree, false).unwrap();
        assert!(min.starts_with("states: 2 -> 2\n"));
        assert!(minimize_report(&tree, true).unwrap().contains("__start__ -> Q0;"));
    }

    #[test]
    fn test_simulate() {
        let tree = java_identifier_tree();
        let out = simulate_report(&tree, &words(&["PotionBrewer", "2Bad"]), false, false).unwrap();
        assert_eq!(out, "\"PotionBrewer\": accepted\n\"2Bad\": rejected\n");

        let out = simulate_report(&tree, &words(&["ab", "1"]), true, true).unwrap();
        assert_eq!(out, "\"ab\": Q0 -a-> Q1 -b-> Q1 => accepted\n\"1\": Q0 -1-> dead => rejected\n");
    }

    #[test]
    fn test_check() {
        let out = check_report(&words(&["_ok9", ""]));
        assert_eq!(out, "\"_ok9\": accepted\n\"\": rejected\n");
    }
}
