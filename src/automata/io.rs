// src/automata/io.rs
use std::{
    collections::BTreeMap,
    io::{BufWriter, Write},
    path::Path,
};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use thiserror::Error;

use super::{Dfa, FiniteStateMachine, StateId};
use crate::{
    alphabet::{Alphabet, Symbol},
    error::AutomatonStateError,
};

pub const TABLES_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum TablesError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tables JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported tables version {found} (expected {TABLES_VERSION})")]
    Version { found: u32 },
    #[error("tables were built for an alphabet of {found} symbols, not {expected}")]
    AlphabetMismatch { found: u32, expected: u32 },
    #[error("header says {declared} states but {rows} rows are present")]
    StateCount { declared: usize, rows: usize },
    #[error("state {state} has an edge on symbol {symbol}, outside the alphabet")]
    SymbolOutOfRange { state: StateId, symbol: Symbol },
    #[error(transparent)]
    State(#[from] AutomatonStateError),
}

// -------------------- JSON (de)serialization --------------------

// BTreeMaps keep the output stable across runs.
#[serde_as]
#[derive(Serialize, Deserialize)]
struct DfaDisk {
    version: u32,
    alphabet_size: u32,
    n_states: usize,
    #[serde_as(as = "Vec<Vec<(_, _)>>")]
    next: Vec<BTreeMap<Symbol, StateId>>,
    #[serde_as(as = "Vec<(_, _)>")]
    accepting: BTreeMap<StateId, usize>,
}

impl DfaDisk {
    fn new(dfa: &Dfa<usize>, alphabet: &dyn Alphabet) -> Self {
        let n = dfa.number_of_states();
        Self {
            version: TABLES_VERSION,
            alphabet_size: alphabet.size(),
            n_states: n,
            next: (0..n as StateId).map(|s| dfa.edges(s).collect()).collect(),
            accepting: dfa.accepting_states().map(|(s, &p)| (s, p)).collect(),
        }
    }

    fn into_dfa(self, alphabet: &dyn Alphabet) -> Result<Dfa<usize>, TablesError> {
        if self.version != TABLES_VERSION {
            return Err(TablesError::Version { found: self.version });
        }
        if self.alphabet_size != alphabet.size() {
            return Err(TablesError::AlphabetMismatch {
                found: self.alphabet_size,
                expected: alphabet.size(),
            });
        }
        if self.n_states != self.next.len() {
            return Err(TablesError::StateCount {
                declared: self.n_states,
                rows: self.next.len(),
            });
        }
        let size: Symbol = alphabet.size();
        let mut rows = Vec::with_capacity(self.next.len());
        for (state, row) in self.next.into_iter().enumerate() {
            if let Some(&symbol) = row.keys().find(|&&sym| sym >= size) {
                return Err(TablesError::SymbolOutOfRange {
                    state: state as StateId,
                    symbol,
                });
            }
            rows.push(row.into_iter().collect::<HashMap<_, _>>());
        }
        Ok(Dfa::from_parts(rows, self.accepting.into_iter().collect())?)
    }
}

pub fn to_json_string(dfa: &Dfa<usize>, alphabet: &dyn Alphabet) -> Result<String, TablesError> {
    Ok(serde_json::to_string(&DfaDisk::new(dfa, alphabet))?)
}

pub fn save_tables_json(
    path: &Path,
    dfa: &Dfa<usize>,
    alphabet: &dyn Alphabet,
) -> Result<(), TablesError> {
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer(&mut w, &DfaDisk::new(dfa, alphabet))?;
    w.flush()?;
    log::debug!(
        "[tables] wrote {} states / {} edges to {}",
        dfa.number_of_states(),
        dfa.transition_count(),
        path.display()
    );
    Ok(())
}

/// Parse and validate tables written by [`save_tables_json`].
pub fn load_tables_json_bytes(
    data: &[u8],
    alphabet: &dyn Alphabet,
) -> Result<Dfa<usize>, TablesError> {
    serde_json::from_slice::<DfaDisk>(data)?.into_dfa(alphabet)
}

pub fn load_tables_json(path: &Path, alphabet: &dyn Alphabet) -> Result<Dfa<usize>, TablesError> {
    let data = std::fs::read(path)?;
    load_tables_json_bytes(&data, alphabet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        alphabet::{Ascii, Latin1},
        automata::{DeterministicStateMachine, StateMachine, compile_patterns},
        config::BuildConfig,
    };

    fn sample() -> Dfa<usize> {
        compile_patterns(
            [("[a-z]+", false), ("if", true), ("[0-9]+", false)],
            &Ascii,
            &BuildConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn json_round_trip_preserves_the_automaton() {
        let dfa = sample();
        let text = to_json_string(&dfa, &Ascii).unwrap();
        let back = load_tables_json_bytes(text.as_bytes(), &Ascii).unwrap();
        assert_eq!(back, dfa);
    }

    #[test]
    fn rejects_tables_for_another_alphabet() {
        let text = to_json_string(&sample(), &Ascii).unwrap();
        let err = load_tables_json_bytes(text.as_bytes(), &Latin1).unwrap_err();
        assert!(matches!(
            err,
            TablesError::AlphabetMismatch { found: 128, expected: 256 }
        ));
    }

    #[test]
    fn rejects_dangling_targets_and_foreign_symbols() {
        let dangling = r#"{"version":1,"alphabet_size":128,"n_states":1,"next":[[[97,4]]],"accepting":[]}"#;
        assert!(matches!(
            load_tables_json_bytes(dangling.as_bytes(), &Ascii),
            Err(TablesError::State(AutomatonStateError { requested: 4, bound: 1 }))
        ));

        let foreign = r#"{"version":1,"alphabet_size":128,"n_states":1,"next":[[[200,0]]],"accepting":[]}"#;
        assert!(matches!(
            load_tables_json_bytes(foreign.as_bytes(), &Ascii),
            Err(TablesError::SymbolOutOfRange { state: 0, symbol: 200 })
        ));

        let old = r#"{"version":0,"alphabet_size":128,"n_states":0,"next":[],"accepting":[]}"#;
        assert!(matches!(
            load_tables_json_bytes(old.as_bytes(), &Ascii),
            Err(TablesError::Version { found: 0 })
        ));
    }

    #[test]
    fn loaded_tables_still_walk() {
        let text = to_json_string(&sample(), &Ascii).unwrap();
        let dfa = load_tables_json_bytes(text.as_bytes(), &Ascii).unwrap();
        let s = dfa
            .next_state(0, 'i' as u32)
            .and_then(|s| dfa.next_state(s, 'f' as u32))
            .unwrap();
        assert_eq!(dfa.output(s).unwrap(), Some(&1));
    }
}
