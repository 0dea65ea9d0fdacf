// src/regex/mod.rs
//! Pattern text -> NFA fragment.
//!
//! Supported: literals, `.`, escapes (`\d \D \s \S \w \W \n \r \t \f \v`
//! and escaped metacharacters), classes `[a-z_]` / `[^"]`, grouping,
//! alternation, and the quantifiers `* + ? {n} {n,} {n,m}`.
//! Not supported: back-references, anchors, lookaround, lazy or possessive
//! quantifiers.

mod compile;
mod parse;

pub use parse::Node;

use crate::{
    alphabet::Alphabet,
    automata::{Fragment, Nfa},
    config::BuildConfig,
    error::{RegexErrorKind, RegexSyntaxError},
};

/// Default upper bound for `{n,m}` repetition counts.
pub const DEFAULT_MAX_REPEAT: u32 = 1000;

/// Parse `pattern` into a syntax tree over `alphabet`'s symbols.
pub fn parse(pattern: &str, alphabet: &dyn Alphabet, max_repeat: u32) -> Result<Node, RegexSyntaxError> {
    parse::Parser::new(pattern, alphabet, max_repeat).parse()
}

/// Compile `pattern` into `nfa`, returning its fragment.
///
/// On error the arena is left as it was: the pattern is parsed and sized
/// completely before any state is allocated.
pub fn compile_into(
    nfa: &mut Nfa,
    pattern: &str,
    alphabet: &dyn Alphabet,
    config: &BuildConfig,
) -> Result<Fragment, RegexSyntaxError> {
    let node = parse(pattern, alphabet, config.max_repeat)?;
    let states = nfa.len().saturating_add(compile::state_count(&node));
    if states > config.max_nfa_states {
        return Err(RegexSyntaxError {
            pattern: pattern.to_string(),
            position: 0,
            kind: RegexErrorKind::TooManyStates {
                states,
                limit: config.max_nfa_states,
            },
        });
    }
    Ok(compile::compile_node(nfa, &node))
}

/// Compile a single pattern into a fresh NFA with default limits.
pub fn compile(pattern: &str, alphabet: &dyn Alphabet) -> Result<(Nfa, Fragment), RegexSyntaxError> {
    let mut nfa = Nfa::new();
    let frag = compile_into(&mut nfa, pattern, alphabet, &BuildConfig::default())?;
    Ok((nfa, frag))
}
