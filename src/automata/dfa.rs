// src/automata/dfa.rs
use hashbrown::HashMap;

use super::{DeterministicStateMachine, FiniteStateMachine, StateId, StateMachine};
use crate::{alphabet::Symbol, error::AutomatonStateError};

/// Table-driven DFA: one symbol map per state plus a single accepting map.
///
/// The state count is fixed when the table is created; every edit returns a
/// new automaton and leaves `self` untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa<O> {
    next: Vec<HashMap<Symbol, StateId>>, // [state] -> symbol -> state
    accepting: HashMap<StateId, O>,
}

impl<O> Dfa<O> {
    /// `n` states, no edges, nothing accepting.
    pub fn empty(n: usize) -> Self {
        Self {
            next: vec![HashMap::new(); n],
            accepting: HashMap::new(),
        }
    }

    /// Build from finished rows, validating every referenced state.
    pub fn from_parts(
        next: Vec<HashMap<Symbol, StateId>>,
        accepting: HashMap<StateId, O>,
    ) -> Result<Self, AutomatonStateError> {
        let bound = next.len();
        let check = |s: StateId| {
            if (s as usize) < bound {
                Ok(())
            } else {
                Err(AutomatonStateError { requested: s, bound })
            }
        };
        for row in &next {
            for &to in row.values() {
                check(to)?;
            }
        }
        for &s in accepting.keys() {
            check(s)?;
        }
        Ok(Self { next, accepting })
    }

    /// Outgoing edges of `s` (empty if `s` is out of range).
    pub fn edges(&self, s: StateId) -> impl Iterator<Item = (Symbol, StateId)> + '_ {
        self.next
            .get(s as usize)
            .into_iter()
            .flat_map(|row| row.iter().map(|(&sym, &to)| (sym, to)))
    }

    pub fn accepting_states(&self) -> impl Iterator<Item = (StateId, &O)> + '_ {
        self.accepting.iter().map(|(&s, o)| (s, o))
    }

    pub fn transition_count(&self) -> usize {
        self.next.iter().map(|row| row.len()).sum()
    }
}

impl<O: Clone> StateMachine for Dfa<O> {
    type Output = O;

    fn valid_state(&self, s: StateId) -> bool {
        (s as usize) < self.next.len()
    }

    fn output(&self, s: StateId) -> Result<Option<&O>, AutomatonStateError> {
        self.check_state(s)?;
        Ok(self.accepting.get(&s))
    }

    #[inline]
    fn is_accepting(&self, s: StateId) -> bool {
        self.accepting.contains_key(&s)
    }

    fn with_accepting_state(&self, s: StateId, output: O) -> Result<Self, AutomatonStateError> {
        self.check_state(s)?;
        let mut out = self.clone();
        out.accepting.insert(s, output);
        Ok(out)
    }
}

impl<O: Clone> FiniteStateMachine for Dfa<O> {
    fn number_of_states(&self) -> usize {
        self.next.len()
    }
}

impl<O: Clone> DeterministicStateMachine for Dfa<O> {
    #[inline]
    fn next_state(&self, s: StateId, input: Symbol) -> Option<StateId> {
        self.next.get(s as usize)?.get(&input).copied()
    }

    fn with_edge(&self, from: StateId, to: StateId, input: Symbol) -> Result<Self, AutomatonStateError> {
        self.with_edges(&[from], to, &[input])
    }

    fn with_edges(
        &self,
        froms: &[StateId],
        to: StateId,
        inputs: &[Symbol],
    ) -> Result<Self, AutomatonStateError> {
        self.check_state(to)?;
        for &from in froms {
            self.check_state(from)?;
        }
        let mut out = self.clone();
        for &from in froms {
            let row = &mut out.next[from as usize];
            for &sym in inputs {
                row.insert(sym, to);
            }
        }
        Ok(out)
    }
}
