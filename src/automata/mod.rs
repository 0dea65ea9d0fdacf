// src/automata/mod.rs
//! Automaton shapes as independent capability contracts.
//!
//! `FiniteStateMachine` and `DeterministicStateMachine` both refine
//! `StateMachine` but not each other; consumers bound on only what they use.

pub mod dfa;
pub mod io;
pub mod nfa;
pub mod subset;

pub use dfa::Dfa;
pub use nfa::{AcceptTag, Fragment, Nfa};
pub use subset::{compile_patterns, subset_construction};

use crate::{alphabet::Symbol, error::AutomatonStateError};

/// Index of a state inside its owning automaton.
pub type StateId = u32;

pub trait StateMachine {
    type Output;

    /// Whether `s` names a state. Unbounded machines accept every index.
    fn valid_state(&self, s: StateId) -> bool {
        let _ = s;
        true
    }

    /// The output bound to `s`, or `None` if `s` is not accepting.
    fn output(&self, s: StateId) -> Result<Option<&Self::Output>, AutomatonStateError>;

    fn is_accepting(&self, s: StateId) -> bool {
        matches!(self.output(s), Ok(Some(_)))
    }

    /// A copy of this machine where `s` accepts with `output`.
    fn with_accepting_state(&self, s: StateId, output: Self::Output) -> Result<Self, AutomatonStateError>
    where
        Self: Sized;
}

pub trait FiniteStateMachine: StateMachine {
    fn number_of_states(&self) -> usize;

    /// `Ok` iff `0 <= s < number_of_states()`.
    fn check_state(&self, s: StateId) -> Result<(), AutomatonStateError> {
        if (s as usize) < self.number_of_states() {
            Ok(())
        } else {
            Err(AutomatonStateError {
                requested: s,
                bound: self.number_of_states(),
            })
        }
    }
}

pub trait DeterministicStateMachine: StateMachine {
    /// Follow the single edge out of `s` on `input`; `None` means rejection.
    fn next_state(&self, s: StateId, input: Symbol) -> Option<StateId>;

    fn with_edge(&self, from: StateId, to: StateId, input: Symbol) -> Result<Self, AutomatonStateError>
    where
        Self: Sized;

    /// Insert `from -input-> to` for every pair in `froms × inputs`.
    fn with_edges(
        &self,
        froms: &[StateId],
        to: StateId,
        inputs: &[Symbol],
    ) -> Result<Self, AutomatonStateError>
    where
        Self: Sized;
}
