// src/lexer/mod.rs
//! Longest-match lexer over a compiled DFA.
//!
//! A [`Lexer`] is immutable and cheap to clone; any number of sessions may
//! share one. Each session threads its own [`PositionContext`] from call to
//! call.

pub mod context;
pub mod pattern;
pub mod spec_file;
pub mod stream;
pub mod tokens;

use std::sync::Arc;

use rayon::prelude::*;

pub use context::PositionContext;
pub use pattern::{Action, Pattern};
pub use stream::TokenStream;
pub use tokens::{Token, TokenKind, default_patterns};

use crate::{
    alphabet::Alphabet,
    automata::{
        DeterministicStateMachine, Dfa, FiniteStateMachine, StateId, StateMachine, compile_patterns,
    },
    config::BuildConfig,
    error::{BuildError, LexError},
};

/// Outcome of one [`Lexer::build`] call.
#[derive(Debug, Clone)]
pub struct Scan<'a, T> {
    /// Text of the token; empty on failure.
    pub lexeme: &'a str,
    pub result: Result<T, LexError>,
    /// Context after the token. On failure: the same position, with the memo
    /// extended by whatever the failed walk proved.
    pub context: PositionContext,
    /// Unconsumed input.
    pub remainder: &'a str,
}

impl<'a, T> Scan<'a, T> {
    pub fn is_accepted(&self) -> bool {
        self.result.is_ok()
    }
}

/// Why the DFA walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Halt {
    Exhausted,
    NoEdge,
    /// Hit a memoized dead end that reached this far.
    Known(usize),
}

#[derive(Debug, Clone, Copy)]
struct Mark {
    chars: usize,
    bytes: usize,
    pattern: usize,
}

pub struct Lexer<T> {
    dfa: Arc<Dfa<usize>>,
    actions: Arc<[Action<T>]>,
    alphabet: Arc<dyn Alphabet>,
}

impl<T> Clone for Lexer<T> {
    fn clone(&self) -> Self {
        Self {
            dfa: Arc::clone(&self.dfa),
            actions: Arc::clone(&self.actions),
            alphabet: Arc::clone(&self.alphabet),
        }
    }
}

impl<T> std::fmt::Debug for Lexer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("states", &self.dfa.number_of_states())
            .field("patterns", &self.actions.len())
            .field("alphabet", &self.alphabet)
            .finish()
    }
}

impl<T> Lexer<T> {
    /// Pair a compiled DFA (outputs are pattern indices) with its rules.
    pub fn from_tables(
        dfa: Dfa<usize>,
        patterns: &[Pattern<T>],
        alphabet: Arc<dyn Alphabet>,
    ) -> Result<Self, BuildError> {
        for (state, &pattern) in dfa.accepting_states() {
            if pattern >= patterns.len() {
                return Err(BuildError::UnknownPattern {
                    state,
                    pattern,
                    available: patterns.len(),
                });
            }
        }
        Ok(Self {
            dfa: Arc::new(dfa),
            actions: patterns.iter().map(|p| Arc::clone(p.action())).collect(),
            alphabet,
        })
    }

    pub fn dfa(&self) -> &Dfa<usize> {
        &self.dfa
    }

    pub fn alphabet(&self) -> &dyn Alphabet {
        self.alphabet.as_ref()
    }

    /// Produce the next token from `input`, starting at `ctx`.
    ///
    /// Returns `None` when `input` is empty (end of stream).
    pub fn build<'a>(&self, input: &'a str, ctx: &PositionContext) -> Option<Scan<'a, T>> {
        if input.is_empty() {
            return None;
        }

        let mut state: StateId = 0;
        let mut mark: Option<Mark> = None;
        let mut since_mark: Vec<(usize, StateId)> = Vec::new();
        let mut chars = 0usize;
        let mut bytes = 0usize;
        let mut halt = Halt::Exhausted;

        for c in input.chars() {
            let here = ctx.offset() + chars;
            if let Some(reach) = ctx.dead_end_reach(here, state) {
                halt = Halt::Known(reach);
                break;
            }
            since_mark.push((here, state));

            let next = self
                .alphabet
                .classify(c)
                .and_then(|sym| self.dfa.next_state(state, sym));
            let Some(next) = next else {
                halt = Halt::NoEdge;
                break;
            };
            state = next;
            chars += 1;
            bytes += c.len_utf8();

            if let Ok(Some(&pattern)) = self.dfa.output(state) {
                mark = Some(Mark { chars, bytes, pattern });
                since_mark.clear();
            }
        }

        let farthest = match halt {
            Halt::Known(reach) => reach.max(ctx.offset() + chars),
            _ => ctx.offset() + chars,
        };
        // exhaustion proves nothing: more input could still be accepted
        let ctx = match halt {
            Halt::Exhausted => ctx.clone(),
            _ => ctx.with_dead_ends(since_mark, farthest),
        };

        let Some(m) = mark else {
            let err = locate(&ctx, input, farthest);
            log::trace!("[scan] failed at {farthest} ({halt:?})");
            return Some(Scan {
                lexeme: "",
                result: Err(err),
                context: ctx,
                remainder: input,
            });
        };

        let (lexeme, remainder) = input.split_at(m.bytes);
        let token = (self.actions[m.pattern])(lexeme, &ctx);
        let next = ctx.advance(lexeme, remainder.chars().next());
        log::trace!(
            "[scan] pattern #{} matched {} chars at {}",
            m.pattern,
            m.chars,
            ctx.offset()
        );
        Some(Scan {
            lexeme,
            result: Ok(token),
            context: next,
            remainder,
        })
    }

    /// Lazily lex all of `input` from `ctx`.
    pub fn stream<'l, 'a>(&'l self, input: &'a str, ctx: PositionContext) -> TokenStream<'l, 'a, T> {
        TokenStream::new(self, input, ctx)
    }

    /// Lex all of `input` from the start of a fresh session.
    pub fn tokenize(&self, input: &str) -> Result<Vec<T>, LexError> {
        self.stream(input, PositionContext::new()).collect()
    }
}

impl<T: Send> Lexer<T> {
    /// Lex independent sources in parallel, one private session each.
    pub fn tokenize_many<S>(&self, sources: &[S]) -> Vec<Result<Vec<T>, LexError>>
    where
        S: AsRef<str> + Sync,
    {
        sources.par_iter().map(|src| self.tokenize(src.as_ref())).collect()
    }
}

/// Position of character offset `reach` inside `input` (which starts at `ctx`).
fn locate(ctx: &PositionContext, input: &str, reach: usize) -> LexError {
    let n = reach.saturating_sub(ctx.offset());
    let split = input.char_indices().nth(n).map_or(input.len(), |(i, _)| i);
    let (before, after) = input.split_at(split);
    let at = ctx.advance(before, after.chars().next());
    LexError {
        offset: reach,
        line: at.line(),
        column: at.column(),
    }
}

/// Collects rules and compiles them into a [`Lexer`].
pub struct LexerBuilder<T> {
    alphabet: Arc<dyn Alphabet>,
    config: BuildConfig,
    patterns: Vec<Pattern<T>>,
}

impl<T> LexerBuilder<T> {
    pub fn new(alphabet: impl Alphabet + 'static) -> Self {
        Self::with_alphabet(Arc::new(alphabet))
    }

    pub fn with_alphabet(alphabet: Arc<dyn Alphabet>) -> Self {
        Self {
            alphabet,
            config: BuildConfig::default(),
            patterns: Vec::new(),
        }
    }

    pub fn config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    pub fn pattern(mut self, pattern: Pattern<T>) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn patterns(mut self, patterns: impl IntoIterator<Item = Pattern<T>>) -> Self {
        self.patterns.extend(patterns);
        self
    }

    /// Compile the rules into a DFA without binding actions.
    pub fn compile(&self) -> Result<Dfa<usize>, BuildError> {
        compile_patterns(
            self.patterns.iter().map(|p| (p.source(), p.is_strong())),
            self.alphabet.as_ref(),
            &self.config,
        )
    }

    pub fn build(self) -> Result<Lexer<T>, BuildError> {
        let dfa = self.compile()?;
        Lexer::from_tables(dfa, &self.patterns, self.alphabet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Ascii;

    fn digits_then_letters() -> Lexer<&'static str> {
        LexerBuilder::new(Ascii)
            .pattern(Pattern::new("[0-9]+", |_, _| "num"))
            .pattern(Pattern::new("[0-9]+[a-z]+x", |_, _| "tagged"))
            .build()
            .unwrap()
    }

    #[test]
    fn falls_back_to_last_accept_mark() {
        let lx = digits_then_letters();
        let scan = lx.build("12ab;", &PositionContext::new()).unwrap();
        assert_eq!(scan.lexeme, "12");
        assert_eq!(scan.result, Ok("num"));
        assert_eq!(scan.remainder, "ab;");
        assert_eq!(scan.context.column(), 3);
    }

    #[test]
    fn failed_walk_is_memoized_and_replayed() {
        let lx = digits_then_letters();
        let start = PositionContext::new();
        let first = lx.build("12ab;", &start).unwrap();
        // the walk past "12" died on ';' without accepting again
        let after_12 = lx
            .dfa()
            .next_state(0, '1' as u32)
            .and_then(|s| lx.dfa().next_state(s, '2' as u32))
            .unwrap();
        assert!(first.context.is_dead_end(2, after_12));

        // a backtracking caller resumes at the same spot with the newer memo
        let again = lx.build("12ab;", &first.context.resume_at(&start)).unwrap();
        assert_eq!(again.lexeme, "12");
        assert_eq!(again.context.offset(), 2);
    }

    #[test]
    fn cached_failure_reports_the_same_position() {
        let lx = LexerBuilder::new(Ascii)
            .pattern(Pattern::new("abc", |_, _| ()))
            .build()
            .unwrap();
        let start = PositionContext::new();
        let first = lx.build("abx", &start).unwrap();
        let err = first.result.unwrap_err();
        assert_eq!(err.offset, 2);
        assert!(first.context.is_dead_end(0, 0));

        let second = lx.build("abx", &first.context).unwrap();
        assert_eq!(second.result.unwrap_err(), err);
    }

    #[test]
    fn empty_input_is_end_of_stream() {
        let lx = digits_then_letters();
        assert!(lx.build("", &PositionContext::new()).is_none());
    }

    #[test]
    fn from_tables_rejects_unknown_pattern_indices() {
        let dfa = Dfa::empty(2).with_accepting_state(1, 3).unwrap();
        let patterns = vec![Pattern::new("a", |_, _| ())];
        let err = Lexer::from_tables(dfa, &patterns, Arc::new(Ascii)).unwrap_err();
        assert_eq!(
            err,
            BuildError::UnknownPattern {
                state: 1,
                pattern: 3,
                available: 1
            }
        );
    }
}
