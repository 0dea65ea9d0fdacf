// src/error.rs
//! Error types shared by the automaton builder and the lexer runtime.
//!
//! Construction-time failures (`RegexSyntaxError`, `AutomatonStateError`,
//! `BuildError`) are kept apart from the lex-time `LexError`, which is an
//! expected outcome of scanning input that no pattern accepts.

use thiserror::Error;

use crate::automata::StateId;

/// An edge or accept insertion referenced a state outside `[0, bound)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("state {requested} is out of range for an automaton with {bound} states")]
pub struct AutomatonStateError {
    pub requested: StateId,
    pub bound: usize,
}

/// Why a pattern was rejected by the regex compiler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegexErrorKind {
    #[error("empty pattern")]
    EmptyPattern,
    #[error("unterminated character class")]
    UnterminatedClass,
    #[error("empty character class")]
    EmptyClass,
    #[error("character class matches no symbol of the alphabet")]
    ClassMatchesNothing,
    #[error("inverted range {0:?}-{1:?} in character class")]
    InvertedRange(char, char),
    #[error("range starting at {0:?} must end in a single character, not a class")]
    InvalidRangeEnd(char),
    #[error("unterminated group")]
    UnterminatedGroup,
    #[error("empty group")]
    EmptyGroup,
    #[error("empty alternative")]
    EmptyAlternative,
    #[error("unmatched closing {0:?}")]
    UnmatchedClose(char),
    #[error("quantifier {0:?} has nothing to repeat")]
    DanglingQuantifier(char),
    #[error("quantifier {0:?} follows another quantifier")]
    StackedQuantifier(char),
    #[error("unterminated repetition bound")]
    UnterminatedBound,
    #[error("repetition bound is not a non-negative integer")]
    InvalidBound,
    #[error("repetition bounds out of order: {{{min},{max}}}")]
    BoundsOutOfOrder { min: u32, max: u32 },
    #[error("repetition bound {bound} exceeds the limit of {limit}")]
    BoundTooLarge { bound: u32, limit: u32 },
    #[error("trailing backslash")]
    TrailingEscape,
    #[error("back-references are not supported (\\{0})")]
    BackReference(char),
    #[error("unknown escape \\{0}")]
    UnknownEscape(char),
    #[error("character {0:?} is outside the alphabet")]
    OutsideAlphabet(char),
    #[error("character {0:?} shares its symbol with other characters in this alphabet")]
    FoldedCharacter(char),
    #[error("pattern needs {states} NFA states, over the limit of {limit}")]
    TooManyStates { states: usize, limit: usize },
}

/// A pattern failed to compile. No automaton is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pattern {pattern:?} at {position}: {kind}")]
pub struct RegexSyntaxError {
    pub pattern: String,
    /// Character offset into `pattern` where the problem was detected.
    pub position: usize,
    pub kind: RegexErrorKind,
}

impl RegexSyntaxError {
    /// Human-readable reason, without the pattern text.
    pub fn reason(&self) -> String {
        self.kind.to_string()
    }
}

/// Failure while building a lexer from a pattern set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("pattern #{index}: {source}")]
    Regex {
        index: usize,
        #[source]
        source: RegexSyntaxError,
    },
    #[error(transparent)]
    State(#[from] AutomatonStateError),
    #[error("subset construction exceeded {limit} DFA states")]
    TooManyStates { limit: usize },
    #[error("no patterns were registered")]
    NoPatterns,
    #[error("accepting state {state} names pattern #{pattern} but only {available} patterns exist")]
    UnknownPattern {
        state: StateId,
        pattern: usize,
        available: usize,
    },
}

/// No pattern accepted any prefix of the remaining input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unexpected character at line {line}, column {column} (offset {offset})")]
pub struct LexError {
    /// Farthest absolute character offset the scan reached.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}
