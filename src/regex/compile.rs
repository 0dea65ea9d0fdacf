// src/regex/compile.rs
// Thompson construction: every `Node` becomes a fragment with exactly one
// start and one accept state inside a shared NFA arena.

use super::parse::Node;
use crate::automata::{Fragment, Nfa};

pub fn compile_node(nfa: &mut Nfa, node: &Node) -> Fragment {
    match node {
        Node::Set(symbols) => {
            let start = nfa.add_state();
            let accept = nfa.add_state();
            for &sym in symbols {
                nfa.add_edge(start, sym, accept);
            }
            Fragment { start, accept }
        }
        Node::Concat(items) => {
            let mut frags = items.iter().map(|n| compile_node(nfa, n)).collect::<Vec<_>>();
            match frags.len() {
                0 => empty(nfa),
                1 => frags.remove(0),
                _ => {
                    for pair in frags.windows(2) {
                        nfa.add_epsilon(pair[0].accept, pair[1].start);
                    }
                    Fragment {
                        start: frags[0].start,
                        accept: frags[frags.len() - 1].accept,
                    }
                }
            }
        }
        Node::Alt(branches) => {
            let start = nfa.add_state();
            let accept = nfa.add_state();
            for b in branches {
                let f = compile_node(nfa, b);
                nfa.add_epsilon(start, f.start);
                nfa.add_epsilon(f.accept, accept);
            }
            Fragment { start, accept }
        }
        Node::Repeat { node, min, max } => compile_repeat(nfa, node, *min, *max),
    }
}

/// States `compile_node` will allocate for `node`, saturating at `usize::MAX`.
pub fn state_count(node: &Node) -> usize {
    match node {
        Node::Set(_) => 2,
        Node::Concat(items) if items.is_empty() => 2,
        Node::Concat(items) => items
            .iter()
            .fold(0usize, |acc, n| acc.saturating_add(state_count(n))),
        Node::Alt(branches) => branches
            .iter()
            .fold(2usize, |acc, n| acc.saturating_add(state_count(n))),
        Node::Repeat { node, min, max } => {
            let one = state_count(node);
            // min chained copies, then either a loop copy + hub or the optional copies
            let extra = match max {
                None => one.saturating_add(1),
                Some(max) => one.saturating_mul((max - min) as usize),
            };
            one.saturating_mul(*min as usize)
                .saturating_add(extra)
                .saturating_add(2)
        }
    }
}

/// Matches only the empty string.
fn empty(nfa: &mut Nfa) -> Fragment {
    let start = nfa.add_state();
    let accept = nfa.add_state();
    nfa.add_epsilon(start, accept);
    Fragment { start, accept }
}

fn compile_repeat(nfa: &mut Nfa, node: &Node, min: u32, max: Option<u32>) -> Fragment {
    let start = nfa.add_state();
    let accept = nfa.add_state();
    let mut tail = start;

    // mandatory copies, chained
    for _ in 0..min {
        let f = compile_node(nfa, node);
        nfa.add_epsilon(tail, f.start);
        tail = f.accept;
    }

    match max {
        // unbounded: one more copy that loops back on itself
        None => {
            let f = compile_node(nfa, node);
            let hub = nfa.add_state();
            nfa.add_epsilon(tail, hub);
            nfa.add_epsilon(hub, f.start);
            nfa.add_epsilon(f.accept, hub);
            nfa.add_epsilon(hub, accept);
        }
        // bounded: unrolled optional copies, each may bail out to accept
        Some(max) => {
            for _ in min..max {
                let f = compile_node(nfa, node);
                nfa.add_epsilon(tail, accept);
                nfa.add_epsilon(tail, f.start);
                tail = f.accept;
            }
            nfa.add_epsilon(tail, accept);
        }
    }
    Fragment { start, accept }
}
