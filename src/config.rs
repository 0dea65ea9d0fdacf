// src/config.rs
use crate::regex::DEFAULT_MAX_REPEAT;

/// Default cap on subset-construction output.
pub const DEFAULT_MAX_DFA_STATES: usize = 1 << 16;

/// Default cap on the merged NFA, checked before each pattern is built.
pub const DEFAULT_MAX_NFA_STATES: usize = 1 << 20;

/// Knobs for turning a pattern set into a DFA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildConfig {
    /// Abort subset construction past this many DFA states.
    pub max_dfa_states: usize,
    /// Reject a pattern set whose NFA would grow past this many states.
    pub max_nfa_states: usize,
    /// Largest `n`/`m` accepted in `{n,m}`.
    pub max_repeat: u32,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            max_dfa_states: DEFAULT_MAX_DFA_STATES,
            max_nfa_states: DEFAULT_MAX_NFA_STATES,
            max_repeat: DEFAULT_MAX_REPEAT,
        }
    }
}

impl BuildConfig {
    /// Defaults overridden by `SHRIKE_MAX_DFA_STATES`, `SHRIKE_MAX_NFA_STATES`
    /// and `SHRIKE_MAX_REPEAT`.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            max_dfa_states: env_parse("SHRIKE_MAX_DFA_STATES", d.max_dfa_states),
            max_nfa_states: env_parse("SHRIKE_MAX_NFA_STATES", d.max_nfa_states),
            max_repeat: env_parse("SHRIKE_MAX_REPEAT", d.max_repeat),
        }
    }

    pub fn with_max_dfa_states(mut self, n: usize) -> Self {
        self.max_dfa_states = n;
        self
    }

    pub fn with_max_nfa_states(mut self, n: usize) -> Self {
        self.max_nfa_states = n;
        self
    }

    pub fn with_max_repeat(mut self, n: u32) -> Self {
        self.max_repeat = n;
        self
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(s) => s.trim().parse::<T>().unwrap_or_else(|_| {
            log::warn!("ignoring unparsable {name}={s:?}");
            default
        }),
        Err(_) => default,
    }
}
