// src/automata/nfa.rs
use std::collections::BTreeSet;

use super::{FiniteStateMachine, StateId, StateMachine};
use crate::{alphabet::Symbol, error::AutomatonStateError};

/// Priority metadata attached to a pattern's accept state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AcceptTag {
    /// Declaration index of the pattern.
    pub pattern: usize,
    pub strong: bool,
}

impl AcceptTag {
    /// Strong beats weak; then lower declaration index wins.
    pub fn beats(&self, other: &AcceptTag) -> bool {
        (!self.strong, self.pattern) < (!other.strong, other.pattern)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NfaState {
    /// Labeled edges (symbol, target).
    pub edges: Vec<(Symbol, StateId)>,
    /// Epsilon edges.
    pub epsilon: Vec<StateId>,
    pub accept: Option<AcceptTag>,
}

/// One designated entry and one designated exit inside an [`Nfa`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start: StateId,
    pub accept: StateId,
}

/// Arena-indexed nondeterministic automaton.
///
/// Loop-back and join edges are plain indices, so cycles need no shared
/// ownership. The arena only grows while a pattern set is being compiled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nfa {
    states: Vec<NfaState>,
}

impl Nfa {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(NfaState::default());
        id
    }

    pub fn add_edge(&mut self, from: StateId, sym: Symbol, to: StateId) {
        self.states[from as usize].edges.push((sym, to));
    }

    pub fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.states[from as usize].epsilon.push(to);
    }

    pub fn set_accept(&mut self, s: StateId, tag: AcceptTag) {
        self.states[s as usize].accept = Some(tag);
    }

    pub fn state(&self, s: StateId) -> Option<&NfaState> {
        self.states.get(s as usize)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Every state reachable from `seeds` through epsilon edges alone.
    pub fn epsilon_closure(&self, seeds: impl IntoIterator<Item = StateId>) -> BTreeSet<StateId> {
        let mut closure = BTreeSet::new();
        let mut stack: Vec<StateId> = Vec::new();
        for s in seeds {
            if closure.insert(s) {
                stack.push(s);
            }
        }
        while let Some(s) = stack.pop() {
            let Some(state) = self.states.get(s as usize) else {
                continue;
            };
            for &t in &state.epsilon {
                if closure.insert(t) {
                    stack.push(t);
                }
            }
        }
        closure
    }

    /// Targets of all `sym` edges leaving any state in `set` (before closure).
    /// Subset construction gathers all symbols in one pass instead.
    #[cfg(test)]
    pub(crate) fn step(&self, set: &BTreeSet<StateId>, sym: Symbol) -> BTreeSet<StateId> {
        set.iter()
            .filter_map(|&s| self.states.get(s as usize))
            .flat_map(|st| st.edges.iter())
            .filter(|&&(label, _)| label == sym)
            .map(|&(_, to)| to)
            .collect()
    }

    /// The winning tag among the accept states in `set`.
    pub fn best_accept(&self, set: &BTreeSet<StateId>) -> Option<AcceptTag> {
        set.iter()
            .filter_map(|&s| self.states.get(s as usize)?.accept)
            .fold(None, |best: Option<AcceptTag>, tag| match best {
                Some(b) if b.beats(&tag) => Some(b),
                _ => Some(tag),
            })
    }

    /// Whether the fragment can reach its accept state without consuming input.
    pub fn accepts_empty(&self, frag: Fragment) -> bool {
        self.epsilon_closure([frag.start]).contains(&frag.accept)
    }
}

impl StateMachine for Nfa {
    type Output = AcceptTag;

    fn valid_state(&self, s: StateId) -> bool {
        (s as usize) < self.states.len()
    }

    fn output(&self, s: StateId) -> Result<Option<&AcceptTag>, AutomatonStateError> {
        self.check_state(s)?;
        Ok(self.states[s as usize].accept.as_ref())
    }

    fn with_accepting_state(&self, s: StateId, output: AcceptTag) -> Result<Self, AutomatonStateError> {
        self.check_state(s)?;
        let mut out = self.clone();
        out.set_accept(s, output);
        Ok(out)
    }
}

impl FiniteStateMachine for Nfa {
    fn number_of_states(&self) -> usize {
        self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_follows_epsilon_cycles() {
        let mut nfa = Nfa::new();
        let a = nfa.add_state();
        let b = nfa.add_state();
        let c = nfa.add_state();
        nfa.add_epsilon(a, b);
        nfa.add_epsilon(b, a);
        nfa.add_edge(b, 5, c);

        let cl = nfa.epsilon_closure([a]);
        assert_eq!(cl.into_iter().collect::<Vec<_>>(), vec![a, b]);
        let moved = nfa.step(&nfa.epsilon_closure([a]), 5);
        assert!(moved.contains(&c));
    }

    #[test]
    fn strong_tags_win_then_declaration_order() {
        let weak0 = AcceptTag { pattern: 0, strong: false };
        let strong3 = AcceptTag { pattern: 3, strong: true };
        let strong1 = AcceptTag { pattern: 1, strong: true };
        assert!(strong3.beats(&weak0));
        assert!(strong1.beats(&strong3));
        assert!(!weak0.beats(&strong1));
    }

    #[test]
    fn tagging_is_non_destructive() {
        let mut nfa = Nfa::new();
        let s = nfa.add_state();
        let tag = AcceptTag { pattern: 0, strong: false };
        let tagged = nfa.with_accepting_state(s, tag).unwrap();
        assert!(!nfa.is_accepting(s));
        assert!(tagged.is_accepting(s));
        assert!(nfa.with_accepting_state(4, tag).is_err());
    }
}
