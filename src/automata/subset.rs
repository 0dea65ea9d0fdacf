// src/automata/subset.rs
// Pattern merge + subset construction.
//
// All patterns are compiled into one NFA arena under a fresh start state.
// DFA states are epsilon-closed NFA state sets, interned by their sorted
// member list. Same-length ambiguity is settled here, once: each accepting
// DFA state keeps the single best `AcceptTag` of its members.

use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    time::Instant,
};

use hashbrown::HashMap;

use super::{AcceptTag, Dfa, FiniteStateMachine, Nfa, StateId};
use crate::{
    alphabet::{Alphabet, Symbol},
    config::BuildConfig,
    error::BuildError,
    regex,
};

/// Compile `(source, strong)` patterns, in declaration order, into one DFA
/// whose accepting states output the winning pattern's index.
pub fn compile_patterns<'p, I>(
    patterns: I,
    alphabet: &dyn Alphabet,
    config: &BuildConfig,
) -> Result<Dfa<usize>, BuildError>
where
    I: IntoIterator<Item = (&'p str, bool)>,
{
    let t0 = Instant::now();
    let mut nfa = Nfa::new();
    let start = nfa.add_state();
    let mut count = 0usize;

    for (index, (source, strong)) in patterns.into_iter().enumerate() {
        let frag = regex::compile_into(&mut nfa, source, alphabet, config)
            .map_err(|source| BuildError::Regex { index, source })?;
        nfa.set_accept(frag.accept, AcceptTag { pattern: index, strong });
        nfa.add_epsilon(start, frag.start);
        if nfa.accepts_empty(frag) {
            log::warn!("pattern #{index} {source:?} matches the empty string; zero-length tokens are never produced");
        }
        count += 1;
    }
    if count == 0 {
        return Err(BuildError::NoPatterns);
    }
    log::debug!(
        "[subset] {count} patterns -> {} NFA states ({:?})",
        nfa.len(),
        t0.elapsed()
    );

    let dfa = subset_construction(&nfa, start, config.max_dfa_states)?;
    log::debug!(
        "[subset] DFA: {} states, {} transitions (total {:?})",
        dfa.number_of_states(),
        dfa.transition_count(),
        t0.elapsed()
    );
    Ok(dfa)
}

/// Determinize `nfa` from `start`. DFA state 0 is the start closure.
pub fn subset_construction(nfa: &Nfa, start: StateId, max_states: usize) -> Result<Dfa<usize>, BuildError> {
    let mut ids: HashMap<Vec<StateId>, StateId> = HashMap::new();
    let mut sets: Vec<BTreeSet<StateId>> = Vec::new();
    let mut rows: Vec<HashMap<Symbol, StateId>> = Vec::new();
    let mut accepting: HashMap<StateId, usize> = HashMap::new();
    let mut work: VecDeque<StateId> = VecDeque::new();

    let mut intern = |set: BTreeSet<StateId>,
                      sets: &mut Vec<BTreeSet<StateId>>,
                      work: &mut VecDeque<StateId>|
     -> Result<StateId, BuildError> {
        let key: Vec<StateId> = set.iter().copied().collect();
        if let Some(&id) = ids.get(&key) {
            return Ok(id);
        }
        if sets.len() >= max_states {
            return Err(BuildError::TooManyStates { limit: max_states });
        }
        let id = sets.len() as StateId;
        ids.insert(key, id);
        sets.push(set);
        work.push_back(id);
        Ok(id)
    };

    intern(nfa.epsilon_closure([start]), &mut sets, &mut work)?;

    while let Some(id) = work.pop_front() {
        let set = sets[id as usize].clone();

        if let Some(tag) = nfa.best_accept(&set) {
            accepting.insert(id, tag.pattern);
            log_shadowed(nfa, &set, id, tag);
        }

        // symbol -> union of targets, gathered from member edges
        let mut moves: BTreeMap<Symbol, BTreeSet<StateId>> = BTreeMap::new();
        for &s in &set {
            if let Some(st) = nfa.state(s) {
                for &(sym, to) in &st.edges {
                    moves.entry(sym).or_default().insert(to);
                }
            }
        }

        let mut row = HashMap::with_capacity(moves.len());
        for (sym, targets) in moves {
            let target = intern(nfa.epsilon_closure(targets), &mut sets, &mut work)?;
            row.insert(sym, target);
        }
        if rows.len() <= id as usize {
            rows.resize_with(id as usize + 1, HashMap::new);
        }
        rows[id as usize] = row;
    }
    rows.resize_with(sets.len(), HashMap::new);

    Ok(Dfa::from_parts(rows, accepting)?)
}

fn log_shadowed(nfa: &Nfa, set: &BTreeSet<StateId>, id: StateId, winner: AcceptTag) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    let losers: Vec<usize> = set
        .iter()
        .filter_map(|&s| nfa.state(s)?.accept)
        .filter(|t| *t != winner)
        .map(|t| t.pattern)
        .collect();
    if !losers.is_empty() {
        log::debug!(
            "[subset] DFA state {id}: pattern #{} wins over {losers:?}",
            winner.pattern
        );
    }
}
